use once_cell::sync::Lazy;
use regex::Regex;
use std::str::FromStr;

static NON_SLUG_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s-]").unwrap());
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static TOC_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#{2,6})\s+(.*)").unwrap());

/// Converts a heading title into the anchor GitHub-style renderers generate.
///
/// Punctuation and emoji are dropped, whitespace runs become a single `-`.
pub fn slugify(text: &str) -> String {
    let stripped = NON_SLUG_CHARS.replace_all(text, "");
    WHITESPACE_RUN
        .replace_all(&stripped.trim().to_lowercase(), "-")
        .into_owned()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocConfig {
    pub bullet: String,
    /// Number of spaces per nesting level.
    pub indent: usize,
    pub header: Option<String>,
}

impl Default for TocConfig {
    fn default() -> Self {
        Self {
            bullet: String::from("-"),
            indent: 2,
            header: Some(String::from("## Table of Contents")),
        }
    }
}

/// A level 2-6 heading line, the document title (`#`) is never part of the TOC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// Number of leading `#`.
    pub depth: usize,
    pub title: String,
}

impl FromStr for Heading {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = TOC_HEADING.captures(s).ok_or(())?;
        Ok(Heading {
            depth: caps[1].len(),
            title: caps[2].trim().to_owned(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub title: String,
    pub anchor: String,
    /// 1 for `##`, 2 for `###`, ...
    pub level: usize,
}

impl From<Heading> for TocEntry {
    fn from(heading: Heading) -> Self {
        Self {
            anchor: slugify(&heading.title),
            level: heading.depth - 1,
            title: heading.title,
        }
    }
}

impl TocEntry {
    fn format(&self, config: &TocConfig) -> String {
        let Self {
            title,
            anchor,
            level,
        } = self;
        let indent = " ".repeat(config.indent * level.saturating_sub(1));
        let bullet = &config.bullet;
        format!("{indent}{bullet} [{title}](#{anchor})")
    }
}

/// Returns the TOC entries of `markdown` in document order.
pub fn toc_entries(markdown: &str) -> Vec<TocEntry> {
    markdown
        .lines()
        .filter_map(|line| line.parse::<Heading>().ok())
        .map(Into::into)
        .collect()
}

pub fn render_toc(entries: &[TocEntry], config: &TocConfig) -> String {
    entries
        .iter()
        .map(|entry| entry.format(config))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Markdown text in, TOC text out. The header is not included.
pub fn generate_toc(markdown: &str, config: &TocConfig) -> String {
    render_toc(&toc_entries(markdown), config)
}
