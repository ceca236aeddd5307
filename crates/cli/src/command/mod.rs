pub mod headings;
pub mod metrics;
pub mod toc;
