/*!
 * Command-line interface for dirdoc
 */

use std::io;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};

use dirdoc::config::{Args, Config, Settings};
use dirdoc::report::{ReportFormat, Reporter, ScanReport};
use dirdoc::source::DiskSource;
use dirdoc::writer::Assembler;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> dirdoc::Result<()> {
    if let Some(shell) = args.generate {
        clap_complete::generate(shell, &mut Args::command(), "dirdoc", &mut io::stdout());
        return Ok(());
    }

    // Load settings and build configuration
    let settings_path = Settings::locate(args.config.as_deref())?;
    let settings = Settings::load(&settings_path)?;
    let config = Config::from_args(&args, &settings)?;
    log::debug!("Settings loaded from {}", settings_path.display());
    log::debug!("Resolved configuration: {:?}", config);

    // Nothing is written unless the configuration is valid
    config.validate()?;

    let progress = if args.quiet {
        ProgressBar::hidden()
    } else {
        let progress = ProgressBar::new(0);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} {prefix:.bold.cyan} {wide_msg:.dim.white} {pos}/{len}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        progress.enable_steady_tick(std::time::Duration::from_millis(100));
        progress.set_prefix("📊 Documenting");
        progress.set_message(format!("📂 Walking {}", config.root.display()));
        progress
    };

    let start_time = Instant::now();
    let assembler = Assembler::new(&config, &DiskSource, Arc::new(progress.clone()));
    let result = assembler.write();
    progress.finish_and_clear();
    let statistics = result?;

    log::info!("Artifact written to {}", config.output_file.display());

    if !args.quiet {
        let report = ScanReport {
            output_file: config.output_file.display().to_string(),
            format: config.output_format(),
            duration: start_time.elapsed(),
            statistics,
        };
        Reporter::new(ReportFormat::ConsoleTable).print_report(&report);
    }

    Ok(())
}
