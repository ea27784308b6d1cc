use crate::cli::RescaleArgs;
use crate::error::Result;
use ancblend::workflows::rescale;

pub fn run(args: RescaleArgs) -> Result<()> {
    let written = rescale::run(&args.log, &args.tree, &args.output)?;
    for path in &written {
        println!("{}", path.display());
    }
    Ok(())
}
