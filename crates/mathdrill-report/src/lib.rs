//! mathdrill-report: Self-contained HTML rendering of practice session reports.

pub mod html;

pub use html::{generate_html, write_html_report};
