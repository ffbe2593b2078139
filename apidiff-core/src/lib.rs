//! apidiff core - API surface diff engine.
//!
//! Compares the public declarations of two versions of a set of modules
//! and renders a reviewable, deterministic diff per module.
//!
//! # Features
//!
//! - **Stable identities**: documentation-comment-ID style keys correlate
//!   declarations across versions
//! - **Exclusions**: hide attribute types or whole APIs
//! - **Deterministic order**: namespaces alphabetically, enum members by value,
//!   special members in fixed buckets, additions appended
//! - **Markdown documents**: one fenced `diff` block per module plus an index
//! - **Parallel runs**: modules are diffed concurrently using Rayon
//!
//! # Usage
//!
//! ```
//! use apidiff_core::orchestrator::{self, CancellationToken, DiffOptions, ModuleSet};
//! use apidiff_core::types::{Declaration, Module};
//!
//! let before: ModuleSet = [Module::new("Lib.dll", vec![Declaration::namespace("N")])]
//!     .into_iter()
//!     .collect();
//! let after: ModuleSet = [Module::new(
//!     "Lib.dll",
//!     vec![Declaration::namespace("N").with_child(Declaration::class("C"))],
//! )]
//! .into_iter()
//! .collect();
//!
//! let run = orchestrator::run(&before, &after, &DiffOptions::default(), &CancellationToken::new())
//!     .unwrap();
//! assert!(run.documents["Lib.dll"].contains("+     public class C"));
//! ```

pub mod differ;
pub mod error;
pub mod exporter;
pub mod orchestrator;
pub mod render;
pub mod types;

pub use error::{DiffError, ErrorKind, Result};
pub use orchestrator::{run, CancellationToken, DiffOptions, DiffRun, ModuleSet, SymbolIndex};
