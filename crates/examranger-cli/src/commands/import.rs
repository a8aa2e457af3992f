//! The `examranger import` command.

use std::path::PathBuf;

use anyhow::Result;

use examranger_core::parser::{load_catalog, validate_catalog};

pub fn execute(catalog_path: PathBuf, config_path: Option<PathBuf>) -> Result<()> {
    let catalog = load_catalog(&catalog_path)?;
    let (_, mut store) = super::open_store(config_path.as_deref())?;

    let known: Vec<String> = store.store().subjects().iter().map(|s| s.id.clone()).collect();
    for w in validate_catalog(&catalog, &known) {
        let id = w.item_id.unwrap_or_default();
        eprintln!("  [{id}] WARNING: {}", w.message);
    }

    let summary = store.update(|s| s.import_catalog(catalog))?;

    println!(
        "Imported {} subject(s) ({} replaced) and {} exam(s) ({} replaced) into {}",
        summary.subjects_added + summary.subjects_replaced,
        summary.subjects_replaced,
        summary.exams_added + summary.exams_replaced,
        summary.exams_replaced,
        store.path().display()
    );

    Ok(())
}
