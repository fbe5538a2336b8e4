//! The `mathdrill init` command.

use std::path::Path;

use anyhow::{Context, Result};

/// Write `content` to `path` unless the file already exists.
fn create(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
        return Ok(());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))?;
    println!("Created {}", path.display());
    Ok(())
}

pub fn execute() -> Result<()> {
    create(Path::new("mathdrill.toml"), SAMPLE_CONFIG)?;
    create(Path::new("units.json"), SAMPLE_UNITS)?;
    create(Path::new("exercises/example.json"), EXAMPLE_EXERCISES)?;

    println!("\nNext steps:");
    println!("  1. Add unit sets to units.json and exercises under exercises/");
    println!("  2. Run: mathdrill validate");
    println!("  3. Run: mathdrill practice");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# mathdrill configuration

units = "units.json"
exercises = "exercises"
output_dir = "./mathdrill-results"

# How a <sup> group after a number is read:
#   "power"       2<sup>3</sup> = 8
#   "scientific"  2<sup>3</sup> = 2000
exponent_style = "power"

# Fixed exercise order; remove for a random one.
# seed = 42

[tolerance]
relative = 0.01

[[tolerance.exceptions]]
reference = 222000
relative = 0.1
"#;

const SAMPLE_UNITS: &str = r#"{
  "unit_set": [
    {
      "main_unit": "m",
      "units": [
        { "unit": "km", "conversion": "/1000" },
        { "unit": "cm", "conversion": "*100" },
        { "unit": "mm", "conversion": "*1000" }
      ]
    },
    {
      "main_unit": "s",
      "units": [
        { "unit": "min", "conversion": "/60" },
        { "unit": "h", "conversion": "/3600" }
      ]
    },
    {
      "main_unit": "m/s",
      "units": [
        { "unit": "km/h", "conversion": "*3.6" }
      ]
    }
  ]
}
"#;

const EXAMPLE_EXERCISES: &str = r#"{
  "id": "example",
  "name": "Example Exercises",
  "exercises": [
    {
      "id": "walk",
      "question": "You walk 3 km in 30 min. What is your average speed?",
      "answer": 6,
      "answer_text": "v =",
      "answer_units": "km/h",
      "main_unit": "m/s"
    },
    {
      "id": "sprint",
      "question": "How long does a 100 m sprint at 10 m/s take?",
      "answer": 10,
      "answer_text": "t =",
      "answer_units": "s",
      "main_unit": "s"
    },
    {
      "id": "square",
      "question": "What is 12<sup>2</sup>?",
      "answer": 144,
      "answer_text": "x ="
    }
  ]
}
"#;
