//! Surface diff engine for comparing declaration trees.
//!
//! Correlates the declarations of two versions of a module and produces an
//! ordered tree of match results, ready for rendering.
//!
//! # Stages
//!
//! - **Identity**: version-stable keys for declarations and attribute usages
//! - **Filter**: attribute and API exclusions, applied before matching
//! - **Comparator**: recursive key-based matching with validation
//! - **Ordering**: presentation order of siblings
//!
//! # Example
//!
//! ```
//! use apidiff_core::differ::{ExclusionFilter, Matcher, MatchStatus};
//! use apidiff_core::render::RenderOptions;
//! use apidiff_core::types::{Declaration, Module};
//!
//! let before = Module::new("Lib.dll", vec![Declaration::namespace("N")]);
//! let after = Module::new(
//!     "Lib.dll",
//!     vec![Declaration::namespace("N").with_child(Declaration::class("C"))],
//! );
//!
//! let filter = ExclusionFilter::default();
//! let options = RenderOptions::default();
//! let results = Matcher::new(&filter, &options)
//!     .match_modules(Some(&before), Some(&after))
//!     .unwrap();
//!
//! assert_eq!(results[0].status, MatchStatus::Changed);
//! assert_eq!(results[0].children[0].status, MatchStatus::Added);
//! ```

pub mod changes;
pub mod comparator;
pub mod filter;
pub mod identity;
pub mod ordering;

pub use changes::{AttributeMatch, DiffSummary, MatchResult, MatchStatus, Versions};
pub use comparator::Matcher;
pub use filter::{AttributeExclusions, ExclusionFilter, DEFAULT_EXCLUDED_ATTRIBUTES};
pub use identity::IdentityKey;
