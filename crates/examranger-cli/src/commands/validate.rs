//! The `examranger validate` command.

use std::path::PathBuf;

use anyhow::Result;

use examranger_core::parser::{load_catalog, validate_catalog};

pub fn execute(catalog_path: PathBuf, config_path: Option<PathBuf>) -> Result<()> {
    let catalog = load_catalog(&catalog_path)?;

    // Subjects already in the data file satisfy exam references.
    let (_, store) = super::open_store(config_path.as_deref())?;
    let known: Vec<String> = store.store().subjects().iter().map(|s| s.id.clone()).collect();

    println!(
        "Catalog: {} subjects, {} exams, {} questions",
        catalog.subjects.len(),
        catalog.exams.len(),
        catalog.question_count()
    );

    let warnings = validate_catalog(&catalog, &known);
    for w in &warnings {
        let prefix = w
            .item_id
            .as_ref()
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Catalog valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
