//! The `mathdrill practice` command.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;

use mathdrill_core::display::strip_markup;
use mathdrill_core::input::caret_to_markup;
use mathdrill_core::report::SessionReport;
use mathdrill_core::session::Session;
use mathdrill_report::html::write_html_report;

use crate::DataArgs;

pub fn execute(
    data: DataArgs,
    seed: Option<u64>,
    limit: Option<usize>,
    caret: bool,
    output: Option<PathBuf>,
    format: String,
) -> Result<()> {
    let config = super::load_config(&data)?;
    let catalog = super::load_catalog(&config)?;
    let set = super::load_exercises(&config)?;
    let grader = config.grader(catalog);

    let mut session = Session::new(set, seed.or(config.seed))?;
    println!(
        "{}: {} exercises (seed {}). Type :s to skip, :q to quit.",
        session.exercise_set().name,
        session.exercise_set().exercises.len(),
        session.seed()
    );

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    let mut stdout = std::io::stdout();
    let mut answered = 0;

    while limit.map_or(true, |l| answered < l) {
        let exercise = session.current();
        println!("\n[{}] {}", exercise.id, strip_markup(&exercise.question));
        let label = if exercise.answer_text.is_empty() {
            ">"
        } else {
            exercise.answer_text.as_str()
        };
        print!("{label} ");
        stdout.flush()?;

        let Some(line) = lines.next() else {
            println!();
            break;
        };
        let line = line?;
        let input = line.trim();

        match input {
            ":q" | ":quit" => break,
            ":s" | ":skip" => {
                session.next();
                continue;
            }
            "" => continue,
            _ => {}
        }

        let answer = if caret {
            caret_to_markup(input)
        } else {
            input.to_string()
        };
        let verdict = session.submit(&grader, &answer)?;
        if verdict.correct {
            println!("correct");
        } else {
            println!("incorrect, expected {}", strip_markup(&verdict.expected));
        }
        answered += 1;
        session.next();
    }

    let report = SessionReport::from_session(&session);
    print_summary(&report);

    let output = output.unwrap_or_else(|| config.output_dir.clone());
    let formats: Vec<&str> = match format.as_str() {
        "all" => vec!["json", "html"],
        "none" => vec![],
        other => other.split(',').collect(),
    };

    for fmt in &formats {
        match *fmt {
            "json" => {
                let path = output.join(format!("{}.json", report.file_stem()));
                report.save_json(&path)?;
                eprintln!("Session saved to: {}", path.display());
            }
            "html" => {
                let path = output.join(format!("{}.html", report.file_stem()));
                write_html_report(&report, &path)?;
                eprintln!("HTML report: {}", path.display());
            }
            _ => {
                eprintln!("Unknown format: {fmt}");
            }
        }
    }

    Ok(())
}

fn print_summary(report: &SessionReport) {
    use comfy_table::{Cell, Table};

    let stats = &report.summary;
    let mut table = Table::new();
    table.set_header(vec!["Answers", "Correct", "Incorrect", "Accuracy", "Best streak"]);
    table.add_row(vec![
        Cell::new(stats.attempts()),
        Cell::new(stats.correct),
        Cell::new(stats.incorrect),
        Cell::new(format!("{:.1}%", stats.accuracy() * 100.0)),
        Cell::new(stats.best_streak),
    ]);

    println!("\n{table}");
    if !stats.incorrect_exercises.is_empty() {
        println!("To review: {}", stats.incorrect_exercises.join(", "));
    }
}
