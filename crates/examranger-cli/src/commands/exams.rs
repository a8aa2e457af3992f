//! The `examranger exams` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

pub fn execute(subject: Option<String>, config_path: Option<PathBuf>) -> Result<()> {
    let (_, store) = super::open_store(config_path.as_deref())?;
    let store = store.store();

    let exams: Vec<_> = match &subject {
        Some(id) => {
            if store.subject(id).is_none() {
                anyhow::bail!("subject not found: {id}");
            }
            store.exams_by_subject(id)
        }
        None => store.exams().iter().collect(),
    };

    if exams.is_empty() {
        println!("No exams found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Title", "Subject", "Questions", "Duration", "Active"]);
    for exam in exams {
        let subject_name = store
            .subject(&exam.subject_id)
            .map(|s| s.name.as_str())
            .unwrap_or("-");
        table.add_row(vec![
            Cell::new(&exam.id),
            Cell::new(&exam.title),
            Cell::new(subject_name),
            Cell::new(exam.question_count()),
            Cell::new(format!("{} min", exam.duration)),
            Cell::new(if exam.is_active { "yes" } else { "no" }),
        ]);
    }

    println!("{table}");
    Ok(())
}
