//! Session report types with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::display::strip_markup;
use crate::session::{Attempt, Session, SessionStats};

/// A finished practice session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// Unique report identifier.
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Summary of the exercise set.
    pub exercise_set: ExerciseSetSummary,
    /// Seed of the exercise deck, for replaying the same order.
    pub seed: u64,
    /// Every graded answer, in order.
    pub attempts: Vec<Attempt>,
    pub summary: SessionStats,
}

/// Summary of an exercise set (without the exercises themselves).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseSetSummary {
    pub id: String,
    pub name: String,
    pub exercise_count: usize,
}

impl SessionReport {
    /// Snapshot a session, stamping it as finished now.
    pub fn from_session(session: &Session) -> Self {
        let set = session.exercise_set();
        Self {
            id: Uuid::new_v4(),
            started_at: session.started_at(),
            finished_at: Utc::now(),
            exercise_set: ExerciseSetSummary {
                id: set.id.clone(),
                name: set.name.clone(),
                exercise_count: set.exercises.len(),
            },
            seed: session.seed(),
            attempts: session.attempts().to_vec(),
            summary: session.stats().clone(),
        }
    }

    /// File name used when saving into an output directory.
    pub fn file_stem(&self) -> String {
        format!(
            "session-{}-{}",
            self.started_at.format("%Y%m%d-%H%M%S"),
            &self.id.simple().to_string()[..8]
        )
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: SessionReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Format the report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();
        let s = &self.summary;

        md.push_str(&format!("## {}\n\n", self.exercise_set.name));
        md.push_str(&format!(
            "**Summary:** {} correct, {} incorrect ({:.1}%), best streak {}\n\n",
            s.correct,
            s.incorrect,
            s.accuracy() * 100.0,
            s.best_streak
        ));

        if !self.attempts.is_empty() {
            md.push_str("| # | Exercise | Answer | Result | Expected |\n");
            md.push_str("|---|----------|--------|--------|----------|\n");
            for (i, a) in self.attempts.iter().enumerate() {
                let result = if a.verdict.correct {
                    "correct".to_string()
                } else {
                    format!("incorrect ({})", a.verdict.reason)
                };
                md.push_str(&format!(
                    "| {} | {} | {} | {} | {} |\n",
                    i + 1,
                    a.exercise_id,
                    cell(&a.answer),
                    result,
                    cell(&a.verdict.expected)
                ));
            }
            md.push('\n');
        }

        if !s.incorrect_exercises.is_empty() {
            md.push_str("### To review\n\n");
            for id in &s.incorrect_exercises {
                md.push_str(&format!("- {id}\n"));
            }
        }

        md
    }

    /// Plain-text summary for the terminal.
    pub fn to_text(&self) -> String {
        let s = &self.summary;
        let mut out = format!(
            "{} ({} exercises)\nstarted {}, finished {}\n{} correct, {} incorrect, accuracy {:.1}%, best streak {}\n",
            self.exercise_set.name,
            self.exercise_set.exercise_count,
            self.started_at.format("%Y-%m-%d %H:%M:%S"),
            self.finished_at.format("%Y-%m-%d %H:%M:%S"),
            s.correct,
            s.incorrect,
            s.accuracy() * 100.0,
            s.best_streak
        );
        for a in self.attempts.iter().filter(|a| !a.verdict.correct) {
            out.push_str(&format!(
                "  {}: answered {}, expected {}\n",
                a.exercise_id,
                strip_markup(&a.answer),
                strip_markup(&a.verdict.expected)
            ));
        }
        out
    }
}

fn cell(markup: &str) -> String {
    strip_markup(markup).replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grader::Grader;
    use crate::model::{Answer, Exercise, ExerciseSet, UnitCatalog, UnitConversion, UnitSet};

    fn session() -> Session {
        let catalog = UnitCatalog::new(vec![UnitSet {
            main_unit: "m".into(),
            units: vec![UnitConversion {
                unit: "km".into(),
                conversion: "/1000".into(),
            }],
        }]);
        let set = ExerciseSet {
            id: "distances".into(),
            name: "Distances".into(),
            description: String::new(),
            exercises: vec![Exercise {
                id: "far".into(),
                question: "How far is 10<sup>21</sup> m in km?".into(),
                answer: Answer::Number(1e21),
                answer_text: "d =".into(),
                answer_units: "m".into(),
                main_unit: "m".into(),
                answer_power: None,
                tolerance: None,
                tags: vec![],
            }],
        };
        let grader = Grader::new(catalog);
        let mut session = Session::new(set, Some(1)).unwrap();
        session.submit(&grader, "10<sup>18</sup> km").unwrap();
        session.next();
        session.submit(&grader, "5 m").unwrap();
        session
    }

    #[test]
    fn snapshot_of_session() {
        let report = SessionReport::from_session(&session());
        assert_eq!(report.exercise_set.id, "distances");
        assert_eq!(report.exercise_set.exercise_count, 1);
        assert_eq!(report.seed, 1);
        assert_eq!(report.attempts.len(), 2);
        assert_eq!(report.summary.correct, 1);
        assert_eq!(report.summary.incorrect, 1);
        assert!(report.finished_at >= report.started_at);
        assert!(report.file_stem().starts_with("session-"));
    }

    #[test]
    fn json_roundtrip() {
        let report = SessionReport::from_session(&session());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("report.json");

        report.save_json(&path).unwrap();
        let loaded = SessionReport::load_json(&path).unwrap();

        assert_eq!(loaded.id, report.id);
        assert_eq!(loaded.attempts, report.attempts);
        assert_eq!(loaded.summary, report.summary);
    }

    #[test]
    fn load_missing_file() {
        let err = SessionReport::load_json(Path::new("/nonexistent/report.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read report"));
    }

    #[test]
    fn markdown_output() {
        let md = SessionReport::from_session(&session()).to_markdown();
        assert!(md.contains("## Distances"));
        assert!(md.contains("1 correct, 1 incorrect (50.0%)"));
        assert!(md.contains("| 1 | far | 10^18 km | correct |"));
        assert!(md.contains("incorrect (out of tolerance)"));
        assert!(md.contains("1 * 10^21 m"));
        assert!(md.contains("### To review"));
    }

    #[test]
    fn text_output_lists_misses() {
        let text = SessionReport::from_session(&session()).to_text();
        assert!(text.contains("Distances (1 exercises)"));
        assert!(text.contains("far: answered 5 m, expected 1 * 10^21 m"));
    }
}
