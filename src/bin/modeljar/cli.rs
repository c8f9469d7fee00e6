//! CLI definitions using clap.

use std::path::PathBuf;

use clap::Parser;

/// modeljar - package content model XML files from an archive into a module jar
#[derive(Parser, Debug)]
#[command(name = "modeljar")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the ZIP (or jar, amp, tar, tar.gz) file to process
    #[arg(short = 'z', long = "zip", value_name = "PATH")]
    pub zip: PathBuf,

    /// Output JAR file name [default: models.jar]
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Value of the manifest `Built-By` header [default: config, then $USER]
    #[arg(long, value_name = "NAME")]
    pub built_by: Option<String>,

    /// Additional configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Scan and report without writing the output archive
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
