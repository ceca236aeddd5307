use crate::app::Outcome;
use anyhow::{anyhow, Result};
use clap::Parser;
use qkit_config::Config;
use qkit_markdown::{render_report, HeadingIndex, ScanOptions};
use std::io::Write;
use std::path::PathBuf;

/// Detect duplicate Markdown headings under a directory.
#[derive(Parser, Debug, Clone)]
pub struct Headings {
    /// Root directory to scan.
    #[clap(index = 1)]
    root: PathBuf,

    /// Directory name to skip, replaces the configured list. Can be repeated.
    #[clap(long = "ignore-dir")]
    ignore_dirs: Vec<String>,
}

impl Headings {
    fn scan_options(&self, config: &Config) -> ScanOptions {
        let ignore_dirs = if self.ignore_dirs.is_empty() {
            config.headings.ignore_dirs.clone()
        } else {
            self.ignore_dirs.clone()
        };
        ScanOptions {
            ignore_dirs,
            extensions: config.headings.extensions.clone(),
        }
    }

    pub fn run(self, config: &Config) -> Result<Outcome> {
        if !self.root.is_dir() {
            return Err(anyhow!("{} is not a directory", self.root.display()));
        }

        let index = HeadingIndex::scan(&self.root, &self.scan_options(config));
        let duplicates = index.duplicates();

        tracing::debug!(
            headings = index.len(),
            duplicates = duplicates.len(),
            "Scanned {}",
            self.root.display()
        );

        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        write!(lock, "{}", render_report(&duplicates))?;

        Ok(Outcome::problems_if(!duplicates.is_empty()))
    }
}
