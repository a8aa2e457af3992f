//! The `examranger init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create examranger.toml
    if std::path::Path::new("examranger.toml").exists() {
        println!("examranger.toml already exists, skipping.");
    } else {
        std::fs::write("examranger.toml", SAMPLE_CONFIG)?;
        println!("Created examranger.toml");
    }

    // Create example catalog
    std::fs::create_dir_all("catalogs")?;
    let example_path = std::path::Path::new("catalogs/example.toml");
    if example_path.exists() {
        println!("catalogs/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_CATALOG)?;
        println!("Created catalogs/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: examranger validate --catalog catalogs/example.toml");
    println!("  2. Run: examranger import --catalog catalogs/example.toml");
    println!("  3. Run: examranger submit --user alice --exam geo-capitals --answers 1,0,2");
    println!("  4. Run: examranger rankings --exam geo-capitals");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# examranger configuration

data_file = "./examranger-data.json"

# Refuse submissions to exams that have no questions instead of scoring them 0%.
reject_empty_exams = false

[generator]
delay_ms = 2000
jitter_ms = 1000
default_count = 30
# seed = 42
"#;

const EXAMPLE_CATALOG: &str = r#"[[subjects]]
id = "geography"
name = "Geography"
syllabus = "Capitals, Rivers, Mountains, Climate, Population"

[[exams]]
id = "geo-capitals"
title = "World Capitals"
description = "A short quiz on capital cities."
subject = "geography"
duration = 10

[[exams.questions]]
text = "What is the capital of Australia?"
options = ["Sydney", "Canberra", "Melbourne", "Perth"]
correct = 1
explanation = "Canberra was purpose-built as the capital."

[[exams.questions]]
text = "What is the capital of Canada?"
options = ["Ottawa", "Toronto", "Vancouver", "Montreal"]
correct = 0

[[exams.questions]]
text = "What is the capital of Japan?"
options = ["Osaka", "Kyoto", "Tokyo", "Nagoya"]
correct = 2
"#;
