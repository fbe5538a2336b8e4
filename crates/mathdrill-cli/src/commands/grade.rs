//! The `mathdrill grade` command.

use anyhow::{Context, Result};

use mathdrill_core::display::strip_markup;
use mathdrill_core::input::caret_to_markup;

use crate::DataArgs;

pub fn execute(
    data: DataArgs,
    exercise_key: String,
    answer: String,
    caret: bool,
    json: bool,
    fail_on_incorrect: bool,
) -> Result<()> {
    let config = super::load_config(&data)?;
    let catalog = super::load_catalog(&config)?;
    let set = super::load_exercises(&config)?;

    let exercise = set
        .find(&exercise_key)
        .with_context(|| format!("no exercise '{exercise_key}' in {}", set.name))?;

    let answer = if caret {
        caret_to_markup(&answer)
    } else {
        answer
    };

    let verdict = config.grader(catalog).grade(exercise, &answer);

    if json {
        println!("{}", serde_json::to_string_pretty(&verdict)?);
    } else {
        println!("{}", strip_markup(&exercise.question));
        if verdict.correct {
            println!("correct");
        } else {
            println!("incorrect ({})", verdict.reason);
            println!("expected: {}", strip_markup(&verdict.expected));
        }
    }

    if fail_on_incorrect && !verdict.correct {
        std::process::exit(1);
    }

    Ok(())
}
