use crate::cli::ReconcileArgs;
use crate::error::Result;
use ancblend::engine::config::{ReconcileConfig, ReconcileConfigBuilder, ReconcileConfigFile};
use ancblend::engine::progress::{Progress, ProgressReporter};
use ancblend::workflows::reconcile;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use tracing::info;

pub fn run(args: ReconcileArgs, quiet: bool) -> Result<()> {
    let config = build_config(args)?;
    info!(?config, "Resolved reconciliation configuration.");

    let bar_slot: Mutex<Option<ProgressBar>> = Mutex::new(None);
    let reporter = if quiet {
        ProgressReporter::new()
    } else {
        ProgressReporter::with_callback(Box::new(|event| {
            let mut slot = bar_slot.lock().unwrap();
            match event {
                Progress::StageStart { name, steps } => {
                    let bar = if steps > 0 {
                        ProgressBar::new(steps).with_style(
                            ProgressStyle::with_template(
                                "{msg:30} [{bar:30}] {pos}/{len}",
                            )
                            .unwrap_or_else(|_| ProgressStyle::default_bar()),
                        )
                    } else {
                        ProgressBar::new_spinner()
                    };
                    bar.set_message(name);
                    *slot = Some(bar);
                }
                Progress::StageAdvance => {
                    if let Some(bar) = slot.as_ref() {
                        bar.inc(1);
                    }
                }
                Progress::StageFinish => {
                    if let Some(bar) = slot.take() {
                        bar.finish_and_clear();
                    }
                }
            }
        }))
    };

    let summary = reconcile::run(&config, &reporter)?;
    drop(reporter);

    println!(
        "Reconciled {} node(s) x {} site(s) across {} classes -> {}",
        summary.nodes,
        summary.sites,
        summary.classes,
        summary.output_dir.display()
    );
    Ok(())
}

fn build_config(args: ReconcileArgs) -> Result<ReconcileConfig> {
    let file = match &args.config {
        Some(path) => ReconcileConfigFile::load(path)?,
        None => ReconcileConfigFile::default(),
    };

    let mut builder = ReconcileConfigBuilder::from_file(file);
    if let Some(path) = args.alignment {
        builder = builder.alignment_path(path);
    }
    if let Some(path) = args.log {
        builder = builder.log_path(path);
    }
    if let Some(path) = args.class_root {
        builder = builder.class_root(path);
    }
    if let Some(prefix) = args.class_prefix {
        builder = builder.class_dir_prefix(prefix);
    }
    if let Some(path) = args.output {
        builder = builder.output_dir(path);
    }
    Ok(builder.build()?)
}
