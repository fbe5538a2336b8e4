//! The `mathdrill report` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use mathdrill_core::report::SessionReport;
use mathdrill_report::html::generate_html;

pub fn execute(session_path: PathBuf, format: String, output: Option<PathBuf>) -> Result<()> {
    let report = SessionReport::load_json(&session_path)?;

    let rendered = match format.as_str() {
        "markdown" | "md" => report.to_markdown(),
        "html" => generate_html(&report),
        "json" => serde_json::to_string_pretty(&report)?,
        "text" => report.to_text(),
        other => anyhow::bail!("unknown report format: {other}"),
    };

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("Report written to: {}", path.display());
        }
        None => print!("{rendered}"),
    }

    Ok(())
}
