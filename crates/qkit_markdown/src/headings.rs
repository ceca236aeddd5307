//! Detects Markdown headings whose text is repeated across a directory tree.
//!
//! Heading text is compared case-insensitively. A text is reported when it shows up
//! in more than one file, or more than once at the same level within a single file.
//! Reusing a text at a different level in the same file (`# Overview` followed by
//! `## Overview`) is allowed.

use ignore::WalkBuilder;
use indexmap::IndexMap;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

static HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#+)\s+(.*)$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Directory names that are never descended into.
    pub ignore_dirs: Vec<String>,
    /// File extensions to scan, compared case-insensitively.
    pub extensions: Vec<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            ignore_dirs: vec![".git".into(), "out".into(), "node_modules".into()],
            extensions: vec!["md".into()],
        }
    }
}

impl ScanOptions {
    fn is_ignored_dir(&self, name: &str) -> bool {
        self.ignore_dirs.iter().any(|dir| dir == name)
    }

    fn has_markdown_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                self.extensions
                    .iter()
                    .any(|wanted| wanted.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }
}

/// Returns a lazy iterator over the Markdown files under `root`, in file name order.
///
/// Hidden files and files listed in `.gitignore` are not skipped, only the directories
/// named in [`ScanOptions::ignore_dirs`].
pub fn markdown_files<'a>(
    root: &Path,
    options: &'a ScanOptions,
) -> impl Iterator<Item = PathBuf> + 'a {
    let prune = options.clone();
    WalkBuilder::new(root)
        .standard_filters(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(move |entry| {
            let is_dir = entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false);
            // The root itself is always walked.
            if !is_dir || entry.depth() == 0 {
                return true;
            }
            !prune.is_ignored_dir(&entry.file_name().to_string_lossy())
        })
        .build()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!("skipping unreadable entry: {err}");
                None
            }
        })
        .map(ignore::DirEntry::into_path)
        // Resolves symlinks, a link to a Markdown file is scanned like the file itself.
        .filter(|path| path.is_file())
        .filter(move |path| options.has_markdown_extension(path))
}

/// Parses an ATX heading line into `(level, text)`.
pub fn parse_heading(line: &str) -> Option<(usize, &str)> {
    let caps = HEADING.captures(line.trim_end())?;
    let level = caps.get(1)?.as_str().len();
    let text = caps.get(2)?.as_str().trim();
    Some((level, text))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingOccurrence {
    pub path: PathBuf,
    /// 1-based.
    pub line: usize,
    /// Trimmed, original case.
    pub text: String,
    pub level: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateHeading {
    /// Lower-cased heading text.
    pub key: String,
    pub occurrences: Vec<HeadingOccurrence>,
}

impl DuplicateHeading {
    /// Original-case text of the first occurrence.
    pub fn text(&self) -> &str {
        self.occurrences
            .first()
            .map(|o| o.text.as_str())
            .unwrap_or(&self.key)
    }
}

/// Lower-cased heading text to its occurrences, keys kept in first-seen order.
#[derive(Debug, Default)]
pub struct HeadingIndex {
    headings: IndexMap<String, Vec<HeadingOccurrence>>,
}

impl HeadingIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the index of every Markdown file under `root`.
    pub fn scan(root: &Path, options: &ScanOptions) -> Self {
        let mut index = Self::new();
        for path in markdown_files(root, options) {
            index.scan_file(&path);
        }
        index
    }

    /// Indexes the headings of a single file.
    ///
    /// Unreadable files are reported and skipped. Headings read before an error in the
    /// middle of a file stay indexed.
    pub fn scan_file(&mut self, path: &Path) {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) => {
                tracing::warn!("cannot read {}: {err}", path.display());
                return;
            }
        };

        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    tracing::warn!("cannot read {}: {err}", path.display());
                    return;
                }
            };
            if let Some((level, text)) = parse_heading(&line) {
                self.insert(HeadingOccurrence {
                    path: path.to_path_buf(),
                    line: idx + 1,
                    text: text.to_owned(),
                    level,
                });
            }
        }
    }

    pub fn insert(&mut self, occurrence: HeadingOccurrence) {
        self.headings
            .entry(occurrence.text.to_lowercase())
            .or_default()
            .push(occurrence);
    }

    pub fn len(&self) -> usize {
        self.headings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headings.is_empty()
    }

    pub fn get(&self, text: &str) -> Option<&[HeadingOccurrence]> {
        self.headings
            .get(&text.to_lowercase())
            .map(Vec::as_slice)
    }

    /// Heading keys in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.headings.keys().map(String::as_str)
    }

    /// Returns the flagged heading texts in first-seen order.
    pub fn duplicates(&self) -> Vec<DuplicateHeading> {
        self.headings
            .iter()
            .filter(|(_, occurrences)| is_duplicate(occurrences))
            .map(|(key, occurrences)| DuplicateHeading {
                key: key.clone(),
                occurrences: occurrences.clone(),
            })
            .collect()
    }
}

fn is_duplicate(occurrences: &[HeadingOccurrence]) -> bool {
    if occurrences.len() < 2 {
        return false;
    }

    let multi_file = occurrences.iter().map(|o| &o.path).unique().count() > 1;

    multi_file
        || occurrences
            .iter()
            .map(|o| (&o.path, o.level))
            .counts()
            .values()
            .any(|&n| n > 1)
}

pub fn render_report(duplicates: &[DuplicateHeading]) -> String {
    if duplicates.is_empty() {
        return String::from("No duplicate headings found.\n");
    }

    let mut out = String::from("Duplicate headings detected:\n\n");
    for duplicate in duplicates {
        let _ = writeln!(out, "-- '{}'", duplicate.text());
        for o in &duplicate.occurrences {
            let _ = writeln!(out, "   {}:{} (level {})", o.path.display(), o.line, o.level);
        }
        out.push('\n');
    }
    let _ = writeln!(out, "Total duplicate heading texts: {}", duplicates.len());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(root: &Path, rel: &str, content: &str) -> PathBuf {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    fn scan(root: &Path) -> Vec<DuplicateHeading> {
        HeadingIndex::scan(root, &ScanOptions::default()).duplicates()
    }

    #[test]
    fn test_parse_heading() {
        assert_eq!(parse_heading("## Setup"), Some((2, "Setup")));
        assert_eq!(parse_heading("#   Spaced out   \n"), Some((1, "Spaced out")));
        assert_eq!(parse_heading("###### Deep"), Some((6, "Deep")));
        assert_eq!(parse_heading("#hashtag"), None);
        assert_eq!(parse_heading("#   "), None);
        assert_eq!(parse_heading("  ## indented"), None);
    }

    #[test]
    fn test_unique_headings_are_clean() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.md", "# Title\n## Install\n");
        write(dir.path(), "b.md", "# Other\n## Usage\n");
        assert!(scan(dir.path()).is_empty());
    }

    #[test]
    fn test_duplicate_across_files() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a.md", "## Setup\n");
        let b = write(dir.path(), "docs/b.md", "text\n## setup\n");

        let duplicates = scan(dir.path());
        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[0].key, "setup");
        assert_eq!(duplicates[0].text(), "Setup");
        let locations: Vec<_> = duplicates[0]
            .occurrences
            .iter()
            .map(|o| (o.path.clone(), o.line, o.level))
            .collect();
        assert_eq!(locations, vec![(a, 1, 2), (b, 2, 2)]);
    }

    #[test]
    fn test_duplicate_same_file_same_level() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.md", "## Setup\nbody\n## Setup\n");
        let duplicates = scan(dir.path());
        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[0].occurrences.len(), 2);
    }

    #[test]
    fn test_same_file_different_level_is_allowed() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.md", "# Setup\n\n## Setup\n");
        assert!(scan(dir.path()).is_empty());
    }

    #[test]
    fn test_ignored_dirs_and_extensions() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.md", "## Setup\n");
        write(dir.path(), "node_modules/pkg/README.md", "## Setup\n");
        write(dir.path(), ".git/notes.md", "## Setup\n");
        write(dir.path(), "out/site.md", "## Setup\n");
        write(dir.path(), "notes.txt", "## Setup\n");
        write(dir.path(), "UPPER.MD", "## Other\n");

        let files: Vec<_> = markdown_files(dir.path(), &ScanOptions::default()).collect();
        assert_eq!(files, vec![dir.path().join("UPPER.MD"), dir.path().join("a.md")]);
        assert!(scan(dir.path()).is_empty());
    }

    #[test]
    fn test_keys_in_first_seen_order() {
        let mut index = HeadingIndex::new();
        for (line, text) in ["Zeta", "alpha", "ZETA", "Mid"].into_iter().enumerate() {
            index.insert(HeadingOccurrence {
                path: PathBuf::from("a.md"),
                line: line + 1,
                text: text.into(),
                level: 2,
            });
        }
        assert_eq!(index.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
        assert_eq!(index.get("Zeta").map(<[_]>::len), Some(2));

        let duplicates = index.duplicates();
        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[0].text(), "Zeta");
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_file_is_scanned() {
        let dir = tempfile::tempdir().unwrap();
        let shared = tempfile::tempdir().unwrap();
        write(dir.path(), "a.md", "## Setup\n");
        let target = write(shared.path(), "shared.md", "## Setup\n");
        std::os::unix::fs::symlink(&target, dir.path().join("linked.md")).unwrap();

        let files: Vec<_> = markdown_files(dir.path(), &ScanOptions::default()).collect();
        assert_eq!(files, vec![dir.path().join("a.md"), dir.path().join("linked.md")]);

        let duplicates = scan(dir.path());
        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[0].occurrences[1].path, dir.path().join("linked.md"));
    }

    #[test]
    fn test_invalid_utf8_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.md", "## Setup\n");
        fs::write(dir.path().join("b.md"), b"\xff\xfe## Setup\n").unwrap();
        assert!(scan(dir.path()).is_empty());
    }

    #[test]
    fn test_render_report() {
        let occurrence = |path: &str, line| HeadingOccurrence {
            path: PathBuf::from(path),
            line,
            text: "Setup".into(),
            level: 2,
        };
        let duplicates = vec![DuplicateHeading {
            key: "setup".into(),
            occurrences: vec![occurrence("a.md", 3), occurrence("b.md", 7)],
        }];
        assert_eq!(
            render_report(&duplicates),
            "\
Duplicate headings detected:

-- 'Setup'
   a.md:3 (level 2)
   b.md:7 (level 2)

Total duplicate heading texts: 1
"
        );
        assert_eq!(render_report(&[]), "No duplicate headings found.\n");
    }
}
