use crate::cli::HarmonizeArgs;
use crate::error::{CliError, Result};
use ancblend::workflows::harmonize;

pub fn run(args: HarmonizeArgs) -> Result<()> {
    if !(0.0..=1.0).contains(&args.cutoff) {
        return Err(CliError::Argument(format!(
            "cutoff must lie in [0, 1], got {}",
            args.cutoff
        )));
    }

    let calls = harmonize::run(&args.first, &args.second, args.cutoff)?;
    for call in &calls {
        println!(
            "{} {} {} {}",
            call.first_ml,
            call.second_ml,
            call.call,
            call.matches_second()
        );
    }
    Ok(())
}
