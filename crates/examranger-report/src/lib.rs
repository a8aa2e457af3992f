//! examranger-report: HTML report generation.

pub mod html;

pub use html::{generate_rankings_html, generate_review_html, write_rankings_html, write_review_html};
