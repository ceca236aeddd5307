use crate::command;
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
pub enum RunCmd {
    /// Report Markdown headings repeated across files or within a file.
    #[clap(name = "headings")]
    Headings(command::headings::Headings),
    /// Merge coverage, mutation and test reports and check the quality thresholds.
    #[clap(name = "metrics")]
    Metrics(command::metrics::Metrics),
    /// Print the table of contents of a Markdown file.
    #[clap(name = "toc")]
    Toc(command::toc::Toc),
}

/// qkit CLI arguments.
#[derive(Parser, Debug)]
pub struct Args {
    /// Write the logs to this file instead of stderr.
    #[clap(long, global = true)]
    pub log: Option<PathBuf>,

    /// Specify the path of the config file.
    ///
    /// `qkit.toml` in the working directory is used if it exists.
    #[clap(long, global = true)]
    pub config_file: Option<PathBuf>,
}

/// Result of a command run, mapped to the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to report, exit code 0.
    Clean,
    /// Duplicates found or thresholds not met, exit code 1.
    Problems,
}

impl Outcome {
    pub fn problems_if(condition: bool) -> Self {
        if condition {
            Self::Problems
        } else {
            Self::Clean
        }
    }
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Clean => ExitCode::SUCCESS,
            Outcome::Problems => ExitCode::FAILURE,
        }
    }
}

impl RunCmd {
    pub fn run(self, args: Args) -> Result<Outcome> {
        let (config, config_err) = qkit_config::load_config(args.config_file.as_deref());

        let log_file = args.log.or_else(|| config.log.log_file.clone());
        // Flushes the file logs on drop.
        let _guard = crate::logging::init(&config.log.max_level, log_file.as_deref())?;

        if let Some(err) = config_err {
            tracing::warn!("invalid config file, using the default config: {err}");
        }

        match self {
            Self::Headings(headings) => headings.run(&config),
            Self::Metrics(metrics) => metrics.run(&config),
            Self::Toc(toc) => toc.run(&config),
        }
    }
}
