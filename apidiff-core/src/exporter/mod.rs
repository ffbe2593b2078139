//! Document exporters.
//!
//! Diff lines are wrapped into Markdown documents, one per module, plus an
//! optional index. Documents are keyed by a stable identifier that the
//! filesystem sink turns into `{id}.md`.

pub mod markdown;

/// Identifier of a module document in the result mapping.
pub fn document_id(title: Option<&str>, module: &str) -> String {
    match title {
        Some(title) => format!("{}_{}", title, module),
        None => module.to_string(),
    }
}
