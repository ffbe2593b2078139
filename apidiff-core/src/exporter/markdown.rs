//! Markdown diff documents.

use crate::render::DiffLine;

/// Module file extensions dropped from document titles.
const MODULE_EXTENSIONS: &[&str] = &[".dll", ".exe", ".winmd"];

/// Title of a module document: the module name without its file extension.
pub fn display_name(module: &str) -> &str {
    MODULE_EXTENSIONS
        .iter()
        .find_map(|ext| {
            let cut = module.len().checked_sub(ext.len())?;
            let tail = module.get(cut..)?;
            tail.eq_ignore_ascii_case(ext).then(|| &module[..cut])
        })
        .unwrap_or(module)
}

/// Export one module's diff lines.
pub fn export(module: &str, lines: &[DiffLine]) -> String {
    let mut output = String::new();
    output.push_str(&format!("# {}\n\n", display_name(module)));
    output.push_str("```diff\n");
    for line in lines {
        output.push_str(&line.to_string());
        output.push('\n');
    }
    output.push_str("```\n");
    output
}

/// Export the aggregate index linking to every module document.
pub fn export_index<S: AsRef<str>>(title: &str, modules: &[S]) -> String {
    let mut names: Vec<&str> = modules.iter().map(|m| m.as_ref()).collect();
    names.sort_unstable();

    let mut lines = vec![format!("# {}", title), String::new()];
    for name in names {
        lines.push(format!("- [{}]({}_{}.md)", name, title, name));
    }

    let mut output = lines.join("\n");
    output.push('\n');
    output
}
