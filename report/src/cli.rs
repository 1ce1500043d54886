use crate::config::ReportConfig;
use clap::Parser;
use std::path::PathBuf;

/// Render benchmark reports into markdown tables
#[derive(Parser, Debug, Default)]
#[command(name = "render-table", author, version)]
pub struct Cli {
    /// Thread count the benchmarks ran with, used as is in report file names [default: 4]
    pub threads: Option<String>,

    /// Only accept reports with exactly four lines
    #[arg(long)]
    pub strict: bool,

    /// YAML file replacing the built-in package catalog
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory containing the package directories
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Only render packages matching this glob, may be repeated
    #[arg(short, long = "package", value_name = "GLOB")]
    pub packages: Vec<String>,
}

impl Cli {
    /// command line values take precedence over the config file
    pub fn apply(&self, config: &mut ReportConfig) {
        if let Some(threads) = &self.threads {
            config.threads = threads.clone();
        }
        if let Some(root) = &self.root {
            config.root = root.clone();
        }
        config.strict_line_count |= self.strict;
    }
}
