use anyhow::Context;
use clap::Parser;
use cropmark::{cli, config, metadata, scanner};
use cropmark::{analyze_with_progress, BatchProgress, ProcessDetector};
use cli::{Cli, Commands};
use config::Config;
use cropmark_common::AnalyzeOptions;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Analyze { path, debug, save_crops, output } => {
            let config = Config::load()?;
            let detector = ProcessDetector::from_config(&config);
            let options = AnalyzeOptions {
                is_debug: debug,
                save_debug_crops: save_crops,
            };

            let progress = ProgressBar::new(0);
            progress.set_style(
                ProgressStyle::with_template("{bar:30} {pos}/{len} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );

            let response = analyze_with_progress(&detector, &path, &options, |p: BatchProgress<'_>| {
                progress.set_length(p.total as u64);
                progress.set_position(p.index as u64);
                progress.set_message(p.image.display().to_string());
            })
            .await;

            if response.is_error() {
                progress.abandon();
            } else {
                progress.finish_and_clear();
            }

            let json = serde_json::to_string_pretty(&response)?;
            match output {
                Some(output) => {
                    std::fs::write(&output, json)
                        .with_context(|| format!("cannot write {}", output.display()))?;
                    eprintln!("✔ result saved: {}", output.display());
                }
                None => println!("{}", json),
            }

            if response.is_error() {
                std::process::exit(2);
            }
        }

        Commands::List { folder } => {
            for name in scanner::list_images(&folder)? {
                println!("{}", name);
            }
        }

        Commands::Inspect { image } => match metadata::read_comment(&image)? {
            Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
            None => eprintln!("no embedded metadata in {}", image.display()),
        },

        Commands::Config { set_python, set_script, set_timeout, show } => {
            let mut config = Config::load_file()?;
            let changed = set_python.is_some() || set_script.is_some() || set_timeout.is_some();

            if let Some(python) = set_python {
                config.python_path = python;
            }
            if let Some(script) = set_script {
                config.detector_script = script;
            }
            if let Some(timeout) = set_timeout {
                config.timeout_seconds = timeout;
            }
            if changed {
                config.save()?;
                println!("✔ configuration saved: {}", Config::config_path()?.display());
            }

            if show || !changed {
                println!("Configuration:");
                println!("  python:   {}", config.python_path);
                println!("  detector: {}", config.detector_script.display());
                println!("  timeout:  {}s", config.timeout_seconds);
            }
        }
    }

    Ok(())
}
