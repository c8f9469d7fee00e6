//! modeljar CLI - package content models into a module jar

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use modeljar::ops::{remove_partial_output, repackage, RepackError, RepackOptions, RepackReport};
use modeljar::util::config::{global_config_path, load_config, project_config_path};
use modeljar::util::Diagnostic;

mod cli;

use cli::Cli;

fn main() {
    if let Err(e) = run() {
        match e.downcast_ref::<RepackError>() {
            Some(err) => eprint!("{}", err.to_diagnostic().format(std::io::stderr().is_terminal())),
            None => eprintln!("error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("modeljar=debug")
    } else {
        EnvFilter::new("modeljar=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let cwd = std::env::current_dir()?;
    let config = load_config(
        global_config_path().as_deref(),
        &project_config_path(&cwd),
        cli.config.as_deref(),
    )?;

    let output = cli.output.clone().unwrap_or_else(|| config.output_path());
    let manifest = config.manifest_settings(cli.built_by.clone(), std::env::var("USER").ok());
    let opts = RepackOptions::new(&cli.zip, &output)
        .with_manifest(manifest)
        .with_dry_run(cli.dry_run);

    let report = match repackage(&opts) {
        Ok(report) => report,
        Err(err) => {
            if matches!(err, RepackError::WriteOutput { .. } | RepackError::Zip { .. }) {
                remove_partial_output(&output);
            }
            return Err(err.into());
        }
    };

    print_report(&report);
    Ok(())
}

fn print_report(report: &RepackReport) {
    if !report.previous.is_declared() {
        let diag = Diagnostic::warning(format!(
            "no module.version found for `{}`, started from {}",
            report.identity.name(),
            report.previous.version()
        ));
        eprint!("{}", diag.format(std::io::stderr().is_terminal()));
    }

    if report.written {
        println!(
            "Successfully created JAR file {} with {} model files (version {})",
            report.output.display(),
            report.model_count(),
            report.identity.version()
        );
    } else {
        for path in &report.model_paths {
            println!("{}", path);
        }
        println!(
            "Would create JAR file {} with {} model files (version {})",
            report.output.display(),
            report.model_count(),
            report.identity.version()
        );
    }
}
