//! Markdown tooling: duplicate heading detection and table of contents generation.

pub mod headings;
pub mod toc;

pub use self::headings::{
    markdown_files, render_report, DuplicateHeading, HeadingIndex, HeadingOccurrence, ScanOptions,
};
pub use self::toc::{generate_toc, slugify, TocConfig, TocEntry};
