//! Diff command - API surface diff between two sets of module files
//!
//! Loads the declaration trees of the "before" and "after" versions, runs the
//! diff engine on a blocking worker and either prints the Markdown documents
//! or writes them to an output directory.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use apidiff_core::differ::{AttributeExclusions, DiffSummary, DEFAULT_EXCLUDED_ATTRIBUTES};
use apidiff_core::{CancellationToken, DiffOptions, DiffRun};
use colored::Colorize;
use serde::Serialize;

use crate::config::ApiDiffConfig;
use crate::loader::JsonIndex;
use crate::output::{Output, OutputConfig, Outputter, TableOutput};

/// Command-line arguments of `apidiff diff`.
#[derive(Debug, Clone, Default)]
pub struct DiffArgs {
    pub before: PathBuf,
    pub after: PathBuf,
    pub output_dir: Option<PathBuf>,
    pub title: Option<String>,
    pub exclude_attributes: Vec<String>,
    pub no_default_attribute_exclusions: bool,
    pub exclude_apis: Vec<String>,
    pub exclude_api_file: Option<PathBuf>,
    pub hide_implicit_default_constructors: bool,
    pub add_partial_modifier: bool,
    pub jobs: Option<usize>,
}

/// One produced document.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentEntry {
    pub id: String,
    pub lines: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Result of a diff run, as reported to the user.
#[derive(Debug, Serialize)]
pub struct DiffReport {
    pub before: String,
    pub after: String,
    pub documents: Vec<DocumentEntry>,
    /// Rendered documents; omitted when they were written to disk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contents: Option<BTreeMap<String, String>>,
    pub failures: BTreeMap<String, String>,
    pub summary: DiffSummary,
    pub duration_ms: u64,
}

impl DiffReport {
    fn failure_lines(&self, config: &OutputConfig) -> String {
        let mut output = String::new();
        for (module, error) in &self.failures {
            if config.use_colors() {
                output.push_str(&format!("{} {}: {}\n", "FAILED:".red().bold(), module, error));
            } else {
                output.push_str(&format!("FAILED: {}: {}\n", module, error));
            }
        }
        output
    }
}

/// Colorize a rendered document for the terminal.
fn colorize(document: &str) -> String {
    document
        .lines()
        .map(|line| {
            if line.starts_with("+ ") {
                line.green().to_string()
            } else if line.starts_with("- ") {
                line.red().to_string()
            } else if line.starts_with('#') {
                line.cyan().bold().to_string()
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

impl Outputter for DiffReport {
    fn to_table(&self, config: &OutputConfig) -> String {
        let mut output = String::new();

        match &self.contents {
            Some(contents) => {
                for document in contents.values() {
                    if config.use_colors() {
                        output.push_str(&colorize(document));
                        output.push('\n');
                    } else {
                        output.push_str(document);
                    }
                    output.push('\n');
                }
            }
            None => {
                let rows: Vec<Vec<String>> = self
                    .documents
                    .iter()
                    .map(|d| {
                        vec![
                            d.path.clone().unwrap_or_else(|| d.id.clone()),
                            d.lines.to_string(),
                        ]
                    })
                    .collect();
                output.push_str(&TableOutput::format_rows(&["Document", "Lines"], &rows, config));
                output.push('\n');
            }
        }

        output.push_str(&self.failure_lines(config));

        let summary = format!("{} ({}ms)", self.summary.text(), self.duration_ms);
        if config.use_colors() {
            output.push_str(&format!("{} {}\n", "SUMMARY:".cyan().bold(), summary));
        } else {
            output.push_str(&format!("SUMMARY: {}\n", summary));
        }
        output
    }

    fn to_markdown(&self, _config: &OutputConfig) -> String {
        match &self.contents {
            Some(contents) => contents.values().cloned().collect::<Vec<_>>().join("\n"),
            None => self
                .documents
                .iter()
                .map(|d| format!("- {}\n", d.path.as_deref().unwrap_or(&d.id)))
                .collect(),
        }
    }
}

/// Read an API exclusion file: one identity per line, `#` starts a comment.
pub fn read_exclusion_file(path: &Path) -> anyhow::Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read exclusion file {}", path.display()))?;
    Ok(parse_exclusions(&content))
}

fn parse_exclusions(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| line.split('#').next().unwrap_or_default().trim())
        .filter(|line| !line.is_empty())
        .map(|line| line.to_string())
        .collect()
}

/// Combine configuration defaults with command-line flags.
pub fn build_options(args: &DiffArgs, config: &ApiDiffConfig) -> anyhow::Result<DiffOptions> {
    let mut options = config.diff_options();

    let mut attributes = match options.attributes_to_exclude {
        AttributeExclusions::UseBuiltInDefaults => None,
        AttributeExclusions::UseExactList(ids) => Some(ids),
    };
    if args.no_default_attribute_exclusions {
        attributes.get_or_insert_with(BTreeSet::new);
    }
    if !args.exclude_attributes.is_empty() {
        attributes
            .get_or_insert_with(|| {
                DEFAULT_EXCLUDED_ATTRIBUTES
                    .iter()
                    .map(|id| id.to_string())
                    .collect()
            })
            .extend(args.exclude_attributes.iter().cloned());
    }
    options.attributes_to_exclude = match attributes {
        None => AttributeExclusions::UseBuiltInDefaults,
        Some(ids) => AttributeExclusions::UseExactList(ids),
    };

    options.apis_to_exclude.extend(args.exclude_apis.iter().cloned());
    if let Some(ref path) = args.exclude_api_file {
        options.apis_to_exclude.extend(read_exclusion_file(path)?);
    }

    options.hide_implicit_default_constructors |= args.hide_implicit_default_constructors;
    options.add_partial_modifier |= args.add_partial_modifier;
    if args.title.is_some() {
        options.table_of_contents_title = args.title.clone();
    }
    if args.jobs.is_some() {
        options.num_threads = args.jobs;
    }
    Ok(options)
}

/// Write every document as `{id}.md` under `dir`.
fn write_documents(dir: &Path, run: &DiffRun) -> anyhow::Result<Vec<DocumentEntry>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let mut written = Vec::with_capacity(run.documents.len());
    for (id, document) in &run.documents {
        let path = dir.join(format!("{}.md", id));
        std::fs::write(&path, document)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::debug!("Wrote {}", path.display());
        written.push(DocumentEntry {
            id: id.clone(),
            lines: document.lines().count(),
            path: Some(path.display().to_string()),
        });
    }
    Ok(written)
}

/// Run the diff command
pub async fn run(args: DiffArgs, config: &ApiDiffConfig, output: OutputConfig) -> anyhow::Result<()> {
    let start = Instant::now();
    let options = build_options(&args, config)?;

    let before = JsonIndex::open(&args.before)
        .with_context(|| format!("Failed to open before modules at {}", args.before.display()))?;
    let after = JsonIndex::open(&args.after)
        .with_context(|| format!("Failed to open after modules at {}", args.after.display()))?;
    tracing::info!(
        "Comparing {} modules in {} with {} modules in {}",
        before.len(),
        before.root().display(),
        after.len(),
        after.root().display()
    );

    let cancel = CancellationToken::new();
    let worker_cancel = cancel.clone();
    let mut task = tokio::task::spawn_blocking(move || {
        apidiff_core::run(&before, &after, &options, &worker_cancel)
    });

    let joined = tokio::select! {
        joined = &mut task => joined,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Interrupted, cancelling diff run");
            cancel.cancel();
            task.await
        }
    };
    let diff_run = joined.context("Diff worker failed")??;

    let (documents, contents) = match args.output_dir {
        Some(ref dir) => (write_documents(dir, &diff_run)?, None),
        None => {
            let entries = diff_run
                .documents
                .iter()
                .map(|(id, document)| DocumentEntry {
                    id: id.clone(),
                    lines: document.lines().count(),
                    path: None,
                })
                .collect();
            (entries, Some(diff_run.documents.clone()))
        }
    };

    let report = DiffReport {
        before: args.before.display().to_string(),
        after: args.after.display().to_string(),
        documents,
        contents,
        failures: diff_run
            .failures
            .iter()
            .map(|(module, error)| (module.clone(), error.to_string()))
            .collect(),
        summary: diff_run.summary.clone(),
        duration_ms: start.elapsed().as_millis() as u64,
    };
    Output::with_config(report, output).render()?;

    if !diff_run.is_success() {
        anyhow::bail!("{} module(s) failed to diff", diff_run.failures.len());
    }
    Ok(())
}
