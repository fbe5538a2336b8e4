//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined. Answer and
//! question markup keeps its `<sup>`/`<sub>` tags so exponents render as
//! real superscripts; everything else is escaped.

use anyhow::{Context, Result};
use std::path::Path;

use mathdrill_core::display::decode_entities;
use mathdrill_core::report::SessionReport;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Tags that survive escaping in answer and question markup.
const ALLOWED_TAGS: [&str; 7] = ["sup", "/sup", "sub", "/sub", "br", "br/", "br /"];

/// Escape markup, then restore the bare formatting tags it may contain.
fn render_markup(s: &str) -> String {
    let mut html = html_escape(&decode_entities(s));
    for tag in ALLOWED_TAGS {
        html = html.replace(&format!("&lt;{tag}&gt;"), &format!("<{tag}>"));
    }
    html
}

/// Generate an HTML report from a session report.
pub fn generate_html(report: &SessionReport) -> String {
    let mut html = String::new();
    let stats = &report.summary;

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>mathdrill session: {}</title>\n",
        html_escape(&report.exercise_set.name)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    let minutes = (report.finished_at - report.started_at).num_minutes();
    html.push_str("<header>\n");
    html.push_str("<h1>mathdrill session</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Exercise set: <strong>{}</strong> | {} exercises | seed {} | {} | {} min</p>\n",
        html_escape(&report.exercise_set.name),
        report.exercise_set.exercise_count,
        report.seed,
        report.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
        minutes
    ));
    html.push_str("</header>\n");

    // Summary dashboard
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Summary</h2>\n");
    html.push_str("<table class=\"summary\">\n");
    html.push_str("<thead><tr><th>Answers</th><th>Correct</th><th>Incorrect</th><th>Accuracy</th><th>Best streak</th></tr></thead>\n");
    html.push_str(&format!(
        "<tbody><tr><td>{}</td><td>{}</td><td>{}</td><td>{:.1}%</td><td>{}</td></tr></tbody></table>\n",
        stats.attempts(),
        stats.correct,
        stats.incorrect,
        stats.accuracy() * 100.0,
        stats.best_streak
    ));

    if !report.attempts.is_empty() {
        html.push_str(&generate_bar_chart(report));
    }

    html.push_str("</section>\n");

    // Attempts
    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>Answers</h2>\n");
    html.push_str("<table class=\"results-table\" id=\"results\">\n");
    html.push_str("<thead><tr><th onclick=\"sortTable(0)\">#</th><th onclick=\"sortTable(1)\">Exercise</th><th onclick=\"sortTable(2)\">Question</th><th onclick=\"sortTable(3)\">Answer</th><th onclick=\"sortTable(4)\">Result</th><th onclick=\"sortTable(5)\">Expected</th></tr></thead>\n");
    html.push_str("<tbody>\n");

    for (i, a) in report.attempts.iter().enumerate() {
        let (class, text) = if a.verdict.correct {
            ("pass", "correct".to_string())
        } else {
            ("fail", format!("incorrect: {}", a.verdict.reason))
        };

        html.push_str(&format!(
            "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            class,
            i + 1,
            html_escape(&a.exercise_id),
            render_markup(&a.question),
            render_markup(&a.answer),
            html_escape(&text),
            render_markup(&a.verdict.expected)
        ));
    }

    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    if !stats.incorrect_exercises.is_empty() {
        html.push_str("<section class=\"review\">\n<h2>To review</h2>\n<ul>\n");
        for id in &stats.incorrect_exercises {
            html.push_str(&format!("<li>{}</li>\n", html_escape(id)));
        }
        html.push_str("</ul>\n</section>\n");
    }

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(report).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    // JavaScript for sorting
    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(report: &SessionReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("failed to write HTML report to {}", path.display()))?;
    Ok(())
}

/// Share of correct answers per exercise, in first-attempt order.
fn per_exercise(report: &SessionReport) -> Vec<(&str, u32, u32)> {
    let mut rows: Vec<(&str, u32, u32)> = Vec::new();
    for a in &report.attempts {
        let idx = match rows.iter().position(|(id, _, _)| *id == a.exercise_id) {
            Some(idx) => idx,
            None => {
                rows.push((a.exercise_id.as_str(), 0, 0));
                rows.len() - 1
            }
        };
        rows[idx].2 += 1;
        if a.verdict.correct {
            rows[idx].1 += 1;
        }
    }
    rows
}

fn generate_bar_chart(report: &SessionReport) -> String {
    let bar_height = 24;
    let max_width = 400;
    let padding = 8;
    let label_width = 160;

    let rows = per_exercise(report);
    let total_height = rows.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 90,
        total_height
    );

    for (i, (id, correct, total)) in rows.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        let score = f64::from(*correct) / f64::from(*total);
        let width = (score * max_width as f64) as usize;

        let color = if score >= 0.8 {
            "#22c55e"
        } else if score >= 0.5 {
            "#eab308"
        } else {
            "#ef4444"
        };

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            html_escape(id)
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"4\"/>\n",
            label_width, y, width, bar_height, color
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{}/{}</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            correct,
            total
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --fail: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --fail: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); cursor: pointer; }
.pass { background: var(--pass); }
.fail { background: var(--fail); }
sup, sub { font-size: 0.75em; }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;

const JS: &str = r#"
function sortTable(col) {
  const table = document.getElementById('results');
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  rows.sort((a, b) => {
    const va = a.cells[col].textContent;
    const vb = b.cells[col].textContent;
    const na = parseFloat(va), nb = parseFloat(vb);
    const cmp = !isNaN(na) && !isNaN(nb) ? na - nb : va.localeCompare(vb);
    return asc ? cmp : -cmp;
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use mathdrill_core::grader::{Reason, Verdict};
    use mathdrill_core::report::ExerciseSetSummary;
    use mathdrill_core::session::{Attempt, SessionStats};

    fn attempt(id: &str, answer: &str, correct: bool) -> Attempt {
        Attempt {
            exercise_id: id.into(),
            question: "Distance in 10<sup>3</sup>&nbsp;s?".into(),
            answer: answer.into(),
            verdict: Verdict {
                correct,
                reason: if correct {
                    Reason::WithinTolerance
                } else {
                    Reason::OutOfTolerance
                },
                value: Some(1.0),
                unit: "m".into(),
                converted: None,
                expected: "3 * 10<sup>8</sup> m".into(),
            },
            answered_at: chrono::Utc::now(),
        }
    }

    fn make_test_report() -> SessionReport {
        SessionReport {
            id: uuid::Uuid::nil(),
            started_at: chrono::Utc::now(),
            finished_at: chrono::Utc::now(),
            exercise_set: ExerciseSetSummary {
                id: "test-set".into(),
                name: "Test <Set>".into(),
                exercise_count: 2,
            },
            seed: 42,
            attempts: vec![
                attempt("light", "3 * 10<sup>8</sup> m", true),
                attempt("sound", "<script>alert(1)</script> m", false),
                attempt("light", "4 m", false),
            ],
            summary: SessionStats {
                correct: 1,
                incorrect: 2,
                streak: 0,
                best_streak: 1,
                incorrect_exercises: vec!["sound".into(), "light".into()],
            },
        }
    }

    #[test]
    fn html_report_contains_required_elements() {
        let html = generate_html(&make_test_report());

        assert!(html.contains("<html"));
        assert!(html.contains("</html>"));
        assert!(html.contains("Test &lt;Set&gt;"));
        assert!(html.contains("seed 42"));
        assert!(html.contains("33.3%"));
        assert!(html.contains("incorrect: out of tolerance"));
        assert!(html.contains("<h2>To review</h2>"));
    }

    #[test]
    fn superscripts_render_and_scripts_do_not() {
        let html = generate_html(&make_test_report());

        assert!(html.contains("<td>3 * 10<sup>8</sup> m</td>"));
        assert!(html.contains("Distance in 10<sup>3</sup> s?"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt; m"));
        assert!(!html.contains("<script>alert"));
    }

    #[test]
    fn render_markup_keeps_only_formatting_tags() {
        assert_eq!(render_markup("v<sub>0</sub>"), "v<sub>0</sub>");
        assert_eq!(render_markup("a<br>b"), "a<br>b");
        assert_eq!(render_markup("<b>x</b>"), "&lt;b&gt;x&lt;/b&gt;");
        assert_eq!(render_markup("1 &lt; 2"), "1 &lt; 2");
    }

    #[test]
    fn chart_counts_per_exercise() {
        let report = make_test_report();
        let rows = per_exercise(&report);
        assert_eq!(rows, vec![("light", 1, 2), ("sound", 0, 1)]);
        let svg = generate_bar_chart(&report);
        assert!(svg.contains(">1/2</text>"));
        assert!(svg.contains(">0/1</text>"));
    }

    #[test]
    fn html_report_write_to_file() {
        let report = make_test_report();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("session.html");

        write_html_report(&report, &path).unwrap();
        assert!(path.exists());

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<html"));
    }
}
