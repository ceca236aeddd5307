use crate::app::Outcome;
use anyhow::{Context, Result};
use clap::Parser;
use qkit_config::Config;
use qkit_markdown::{generate_toc, TocConfig};
use std::io::Write;
use std::path::PathBuf;

/// Print the table of contents of a Markdown file to stdout.
#[derive(Parser, Debug, Clone)]
pub struct Toc {
    /// Markdown file, defaults to `toc.input-file` of the config.
    #[clap(index = 1)]
    input: Option<PathBuf>,

    /// Do not print the header line.
    #[clap(long)]
    no_header: bool,
}

impl Toc {
    fn toc_config(&self, config: &Config) -> TocConfig {
        TocConfig {
            indent: config.toc.indent,
            header: if self.no_header {
                None
            } else {
                config.toc.header.clone()
            },
            ..Default::default()
        }
    }

    pub fn run(self, config: &Config) -> Result<Outcome> {
        let toc_config = self.toc_config(config);
        let input = self.input.unwrap_or_else(|| config.toc.input_file.clone());

        let markdown = std::fs::read_to_string(&input)
            .with_context(|| format!("failed to read {}", input.display()))?;

        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        if let Some(header) = &toc_config.header {
            writeln!(lock, "{header}")?;
            writeln!(lock)?;
        }
        writeln!(lock, "{}", generate_toc(&markdown, &toc_config))?;

        Ok(Outcome::Clean)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toc_config() {
        let toc = Toc {
            input: None,
            no_header: true,
        };
        let toc_config = toc.toc_config(&Config::default());
        assert_eq!(toc_config.header, None);
        assert_eq!(toc_config.indent, 2);
    }

    #[test]
    fn test_missing_input() {
        let toc = Toc {
            input: Some(PathBuf::from("/nonexistent/README.md")),
            no_header: false,
        };
        assert!(toc.run(&Config::default()).is_err());
    }

    #[test]
    fn test_run() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("guide.md");
        std::fs::write(&input, "# Guide\n## Install\n### From source\n").unwrap();
        let toc = Toc {
            input: Some(input),
            no_header: false,
        };
        assert_eq!(toc.run(&Config::default()).unwrap(), Outcome::Clean);
    }
}
