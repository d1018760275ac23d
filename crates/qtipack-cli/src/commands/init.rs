//! The `qtipack init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create qtipack.toml
    if std::path::Path::new("qtipack.toml").exists() {
        println!("qtipack.toml already exists, skipping.");
    } else {
        std::fs::write("qtipack.toml", SAMPLE_CONFIG)?;
        println!("Created qtipack.toml");
    }

    // Create example question bank
    if std::path::Path::new("questions.json").exists() {
        println!("questions.json already exists, skipping.");
    } else {
        std::fs::write("questions.json", EXAMPLE_BANK)?;
        println!("Created questions.json");
    }

    println!("\nNext steps:");
    println!("  1. Add your questions to questions.json");
    println!("  2. Run: qtipack validate --bank questions.json");
    println!("  3. Run: qtipack build --bank questions.json");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# qtipack configuration

output = "qtipack-package.zip"

[package]
strip_prefixes = true
convert_math = true
shuffle = true
item_name_prefix = "Item"
"#;

const EXAMPLE_BANK: &str = r#"[
  {
    "question": "Which processes move water from the land surface to the atmosphere?",
    "options": {
      "A) Evaporation": true,
      "B) Transpiration": true,
      "C) Infiltration": false,
      "D) Percolation": false
    },
    "success": "Correct: evaporation and transpiration together make up evapotranspiration.",
    "error": "Not quite. Infiltration and percolation move water downward into the soil."
  },
  {
    "question": "Discharge is computed as $Q = v A$. Which statements hold?",
    "options": {
      "A) $v$ is the mean flow velocity": true,
      "B) $A$ is the catchment area": false,
      "C) $A$ is the wetted cross-section": true
    },
    "success": "Well done.",
    "error": "Check what $A$ refers to in the continuity equation."
  }
]
"#;
