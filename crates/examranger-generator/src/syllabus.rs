//! Syllabus validation.

use examranger_core::model::split_topics;

pub const MIN_SYLLABUS_CHARS: usize = 10;
pub const MAX_SYLLABUS_CHARS: usize = 5000;
pub const MIN_TOPICS: usize = 3;

/// Check whether a syllabus is usable for question generation.
///
/// Returns every problem found; an empty list means the syllabus is valid.
pub fn validate_syllabus(syllabus: &str) -> Vec<String> {
    let mut errors = Vec::new();
    let chars = syllabus.chars().count();

    if syllabus.trim().is_empty() {
        errors.push("syllabus cannot be empty".to_string());
    }
    if chars < MIN_SYLLABUS_CHARS {
        errors.push(format!(
            "syllabus must be at least {MIN_SYLLABUS_CHARS} characters long"
        ));
    }
    if chars > MAX_SYLLABUS_CHARS {
        errors.push(format!(
            "syllabus is too long (maximum {MAX_SYLLABUS_CHARS} characters)"
        ));
    }
    if split_topics(syllabus).len() < MIN_TOPICS {
        errors.push(format!(
            "syllabus should contain at least {MIN_TOPICS} topics (separated by commas)"
        ));
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_syllabus() {
        assert!(validate_syllabus("Algebra, Calculus, Geometry").is_empty());
    }

    #[test]
    fn empty_syllabus_reports_everything() {
        let errors = validate_syllabus("   ");
        assert_eq!(errors.len(), 3);
        assert!(errors[0].contains("cannot be empty"));
    }

    #[test]
    fn short_syllabus() {
        let errors = validate_syllabus("a,b,c");
        assert_eq!(errors, vec!["syllabus must be at least 10 characters long"]);
    }

    #[test]
    fn long_syllabus() {
        let topic = "x".repeat(2000);
        let syllabus = format!("{topic}, {topic}, {topic}");
        let errors = validate_syllabus(&syllabus);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("too long"));
    }

    #[test]
    fn blank_topics_do_not_count() {
        let errors = validate_syllabus("Algebra, , Calculus,   ");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("at least 3 topics"));
    }
}
