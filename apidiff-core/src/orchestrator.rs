//! Diff orchestrator: runs the engine over every module of two versions.
//!
//! Modules are independent, so they are diffed in parallel using rayon and
//! merged afterwards in sorted module order. The output is identical
//! regardless of completion order.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::differ::changes::{DiffSummary, MatchStatus};
use crate::differ::comparator::Matcher;
use crate::differ::filter::{AttributeExclusions, ExclusionFilter};
use crate::error::{DiffError, Result};
use crate::exporter::{self, markdown};
use crate::render::{self, DiffLine, RenderOptions};
use crate::types::Module;

/// Source of declaration trees for one version of a set of modules.
///
/// Implementations do their own I/O; a load failure is reported for that
/// module only.
pub trait SymbolIndex: Sync {
    /// Names of every module this version contains.
    fn module_names(&self) -> Vec<String>;

    /// Build the declaration tree of one module.
    fn load(&self, module: &str) -> Result<Module>;
}

/// In-memory symbol index over already-built modules.
#[derive(Clone, Debug, Default)]
pub struct ModuleSet {
    modules: BTreeMap<String, Module>,
}

impl ModuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, module: Module) {
        self.modules.insert(module.name.clone(), module);
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl FromIterator<Module> for ModuleSet {
    fn from_iter<I: IntoIterator<Item = Module>>(iter: I) -> Self {
        let mut set = Self::new();
        for module in iter {
            set.insert(module);
        }
        set
    }
}

impl SymbolIndex for ModuleSet {
    fn module_names(&self) -> Vec<String> {
        self.modules.keys().cloned().collect()
    }

    fn load(&self, module: &str) -> Result<Module> {
        self.modules
            .get(module)
            .cloned()
            .ok_or_else(|| DiffError::SymbolIndex {
                module: module.to_string(),
                message: "module not found".to_string(),
            })
    }
}

/// Caller-facing configuration of a diff run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffOptions {
    pub attributes_to_exclude: AttributeExclusions,
    pub apis_to_exclude: BTreeSet<String>,
    pub hide_implicit_default_constructors: bool,
    pub add_partial_modifier: bool,
    /// When set, module documents are keyed `{title}_{module}` and an index
    /// document keyed by the title is emitted.
    pub table_of_contents_title: Option<String>,
    /// Worker threads; `None` uses the global rayon pool.
    pub num_threads: Option<usize>,
}

impl DiffOptions {
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            hide_implicit_default_constructors: self.hide_implicit_default_constructors,
            add_partial_modifier: self.add_partial_modifier,
        }
    }

    pub fn exclusion_filter(&self) -> ExclusionFilter {
        ExclusionFilter::new(&self.attributes_to_exclude, &self.apis_to_exclude)
    }
}

/// Cooperative cancellation flag shared between a host and a run.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Outcome of a whole run.
#[derive(Debug, Default)]
pub struct DiffRun {
    /// Rendered documents by identifier.
    pub documents: BTreeMap<String, String>,
    /// Modules whose diff could not be produced.
    pub failures: BTreeMap<String, DiffError>,
    pub summary: DiffSummary,
}

impl DiffRun {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// The rendered diff of one module.
#[derive(Clone, Debug)]
pub struct ModuleDiff {
    pub module: String,
    pub lines: Vec<DiffLine>,
    pub summary: DiffSummary,
}

/// Diff a single module. A module missing from one side renders entirely
/// as added or removed.
pub fn diff_module(
    name: &str,
    before: Option<&Module>,
    after: Option<&Module>,
    filter: &ExclusionFilter,
    options: &RenderOptions,
) -> Result<ModuleDiff> {
    let matcher = Matcher::new(filter, options);
    let results = matcher.match_modules(before, after)?;
    let lines = render::render(&results, options);

    let mut summary = DiffSummary::new();
    for result in &results {
        summary.record_tree(result, options.hide_implicit_default_constructors);
    }
    if !lines.is_empty() {
        let status = match (before, after) {
            (None, Some(_)) => MatchStatus::Added,
            (Some(_), None) => MatchStatus::Removed,
            _ => MatchStatus::Changed,
        };
        summary.record_module(status);
    }

    Ok(ModuleDiff {
        module: name.to_string(),
        lines,
        summary,
    })
}

fn load_side(index: &dyn SymbolIndex, names: &BTreeSet<String>, module: &str) -> Result<Option<Module>> {
    if names.contains(module) {
        index.load(module).map(Some)
    } else {
        Ok(None)
    }
}

/// Dedicated pool for a fixed thread count. A pool that cannot be built is
/// logged and the global pool is used instead.
fn worker_pool(num_threads: Option<usize>) -> Option<rayon::ThreadPool> {
    let n = num_threads?;
    match rayon::ThreadPoolBuilder::new().num_threads(n).build() {
        Ok(pool) => Some(pool),
        Err(e) => {
            warn!("Failed to build a pool of {} threads, using the global pool: {}", n, e);
            None
        }
    }
}

/// Diff every module present in either version.
///
/// Per-module failures land in [`DiffRun::failures`] without affecting other
/// modules. Cancellation is checked before each module; a cancelled run
/// returns [`DiffError::Cancelled`] and no partial result.
pub fn run(
    before: &dyn SymbolIndex,
    after: &dyn SymbolIndex,
    options: &DiffOptions,
    cancel: &CancellationToken,
) -> Result<DiffRun> {
    let before_names: BTreeSet<String> = before.module_names().into_iter().collect();
    let after_names: BTreeSet<String> = after.module_names().into_iter().collect();
    let modules: Vec<&String> = before_names.union(&after_names).collect();

    let filter = options.exclusion_filter();
    let render_options = options.render_options();

    debug!("Diffing {} modules", modules.len());

    let diff_fn = |name: &&String| -> Result<ModuleDiff> {
        if cancel.is_cancelled() {
            return Err(DiffError::Cancelled);
        }
        debug!("Diffing module {}", name);
        let b = load_side(before, &before_names, name)?;
        let a = load_side(after, &after_names, name)?;
        diff_module(name, b.as_ref(), a.as_ref(), &filter, &render_options)
    };

    let pool = worker_pool(options.num_threads);

    let outcomes: Vec<Result<ModuleDiff>> = match pool {
        Some(pool) => pool.install(|| modules.par_iter().map(diff_fn).collect()),
        None => modules.par_iter().map(diff_fn).collect(),
    };

    if cancel.is_cancelled() {
        return Err(DiffError::Cancelled);
    }

    let title = options.table_of_contents_title.as_deref();
    let mut diff_run = DiffRun::default();
    let mut documented = Vec::new();

    for (name, outcome) in modules.into_iter().zip(outcomes) {
        match outcome {
            Ok(diff) if diff.lines.is_empty() => {
                debug!("Module {} has no API changes", name);
            }
            Ok(diff) => {
                diff_run.summary.merge(&diff.summary);
                diff_run.documents.insert(
                    exporter::document_id(title, name),
                    markdown::export(name, &diff.lines),
                );
                documented.push(name.clone());
            }
            Err(DiffError::Cancelled) => return Err(DiffError::Cancelled),
            Err(e) => {
                warn!("Failed to diff module {}: {}", name, e);
                diff_run.failures.insert(name.clone(), e);
            }
        }
    }

    if let Some(title) = title {
        if !documented.is_empty() {
            diff_run
                .documents
                .insert(title.to_string(), markdown::export_index(title, &documented));
        }
    }

    Ok(diff_run)
}
