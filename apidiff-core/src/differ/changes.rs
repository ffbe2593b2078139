//! Match results and summary statistics for an API diff.

use serde::{Deserialize, Serialize};

use crate::differ::identity::IdentityKey;
use crate::types::{Declaration, Symbol};

/// Outcome of correlating one declaration across versions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    Added,
    Removed,
    Changed,
    Unchanged,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Added => "added",
            MatchStatus::Removed => "removed",
            MatchStatus::Changed => "changed",
            MatchStatus::Unchanged => "unchanged",
        }
    }
}

/// The declarations paired by one match result.
#[derive(Clone, Copy, Debug)]
pub enum Versions<'a> {
    Before(&'a Declaration),
    After(&'a Declaration),
    Both {
        before: &'a Declaration,
        after: &'a Declaration,
    },
}

impl<'a> Versions<'a> {
    /// The newest available version of the declaration.
    pub fn current(&self) -> &'a Declaration {
        match *self {
            Versions::Before(d) | Versions::After(d) => d,
            Versions::Both { after, .. } => after,
        }
    }

    pub fn before(&self) -> Option<&'a Declaration> {
        match *self {
            Versions::Before(d) => Some(d),
            Versions::After(_) => None,
            Versions::Both { before, .. } => Some(before),
        }
    }

    pub fn after(&self) -> Option<&'a Declaration> {
        match *self {
            Versions::Before(_) => None,
            Versions::After(d) => Some(d),
            Versions::Both { after, .. } => Some(after),
        }
    }
}

/// Correlation of one attribute usage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeMatch {
    pub key: IdentityKey,
    pub status: MatchStatus,
    /// Rendered `[...]` line in the before version.
    pub before: Option<String>,
    /// Rendered `[...]` line in the after version.
    pub after: Option<String>,
}

/// Correlation of one declaration and, for composites, its children.
#[derive(Clone, Debug)]
pub struct MatchResult<'a> {
    pub key: IdentityKey,
    pub status: MatchStatus,
    pub versions: Versions<'a>,
    /// Declaration line (without attributes) of the before version.
    pub before_line: Option<String>,
    /// Declaration line (without attributes) of the after version.
    pub after_line: Option<String>,
    pub attributes: Vec<AttributeMatch>,
    pub children: Vec<MatchResult<'a>>,
}

impl<'a> MatchResult<'a> {
    pub fn declaration(&self) -> &'a Declaration {
        self.versions.current()
    }

    pub fn is_composite(&self) -> bool {
        self.declaration().is_composite()
    }

    pub fn attributes_changed(&self) -> bool {
        self.attributes
            .iter()
            .any(|a| a.status != MatchStatus::Unchanged)
    }

    /// Whether the declaration line itself differs between versions.
    pub fn line_changed(&self) -> bool {
        match (&self.before_line, &self.after_line) {
            (Some(before), Some(after)) => before != after,
            _ => false,
        }
    }

    /// Number of direct children that are not unchanged.
    pub fn changed_children(&self) -> usize {
        self.children
            .iter()
            .filter(|c| c.status != MatchStatus::Unchanged)
            .count()
    }

    /// Whether this child of a retained type is left out of the output when
    /// implicit default constructors are hidden.
    ///
    /// Only an added or removed implicit default constructor qualifies, and
    /// only when some sibling changed too. Wholesale added or removed types
    /// never consult this, so their implicit constructors stay visible even
    /// with hiding on.
    pub fn is_hidden_constructor(&self, hide: bool, sibling_changes: usize) -> bool {
        hide
            && matches!(self.status, MatchStatus::Added | MatchStatus::Removed)
            && self.declaration().is_implicit_default_constructor()
            && sibling_changes > 1
    }
}

/// Summary statistics for a diff run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    pub modules_added: u32,
    pub modules_removed: u32,
    pub modules_changed: u32,

    pub namespaces_added: u32,
    pub namespaces_removed: u32,
    pub namespaces_changed: u32,

    pub types_added: u32,
    pub types_removed: u32,
    pub types_changed: u32,

    pub members_added: u32,
    pub members_removed: u32,
    pub members_changed: u32,

    pub attributes_added: u32,
    pub attributes_removed: u32,
    pub attributes_changed: u32,
}

impl DiffSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment the counter for one declaration outcome.
    pub fn record(&mut self, decl: &Declaration, status: MatchStatus) {
        let (added, removed, changed) = match decl.symbol {
            Symbol::Namespace => (
                &mut self.namespaces_added,
                &mut self.namespaces_removed,
                &mut self.namespaces_changed,
            ),
            Symbol::Type(_) => (
                &mut self.types_added,
                &mut self.types_removed,
                &mut self.types_changed,
            ),
            _ => (
                &mut self.members_added,
                &mut self.members_removed,
                &mut self.members_changed,
            ),
        };
        match status {
            MatchStatus::Added => *added += 1,
            MatchStatus::Removed => *removed += 1,
            MatchStatus::Changed => *changed += 1,
            MatchStatus::Unchanged => {}
        }
    }

    /// Record a whole match tree. Descendants of an added or removed
    /// declaration are not counted separately, and neither are implicit
    /// constructors the renderer hides.
    pub fn record_tree(&mut self, result: &MatchResult<'_>, hide_implicit_constructors: bool) {
        self.record(result.declaration(), result.status);
        for attribute in &result.attributes {
            match attribute.status {
                MatchStatus::Added => self.attributes_added += 1,
                MatchStatus::Removed => self.attributes_removed += 1,
                MatchStatus::Changed => self.attributes_changed += 1,
                MatchStatus::Unchanged => {}
            }
        }
        if result.status == MatchStatus::Changed {
            let changes = result.changed_children();
            for child in &result.children {
                if child.is_hidden_constructor(hide_implicit_constructors, changes) {
                    continue;
                }
                self.record_tree(child, hide_implicit_constructors);
            }
        }
    }

    pub fn record_module(&mut self, status: MatchStatus) {
        match status {
            MatchStatus::Added => self.modules_added += 1,
            MatchStatus::Removed => self.modules_removed += 1,
            MatchStatus::Changed => self.modules_changed += 1,
            MatchStatus::Unchanged => {}
        }
    }

    /// Fold another summary into this one.
    pub fn merge(&mut self, other: &DiffSummary) {
        self.modules_added += other.modules_added;
        self.modules_removed += other.modules_removed;
        self.modules_changed += other.modules_changed;
        self.namespaces_added += other.namespaces_added;
        self.namespaces_removed += other.namespaces_removed;
        self.namespaces_changed += other.namespaces_changed;
        self.types_added += other.types_added;
        self.types_removed += other.types_removed;
        self.types_changed += other.types_changed;
        self.members_added += other.members_added;
        self.members_removed += other.members_removed;
        self.members_changed += other.members_changed;
        self.attributes_added += other.attributes_added;
        self.attributes_removed += other.attributes_removed;
        self.attributes_changed += other.attributes_changed;
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Generate human-readable summary string.
    pub fn text(&self) -> String {
        let groups = [
            ("modules", self.modules_added, self.modules_removed, self.modules_changed),
            (
                "namespaces",
                self.namespaces_added,
                self.namespaces_removed,
                self.namespaces_changed,
            ),
            ("types", self.types_added, self.types_removed, self.types_changed),
            ("members", self.members_added, self.members_removed, self.members_changed),
            (
                "attributes",
                self.attributes_added,
                self.attributes_removed,
                self.attributes_changed,
            ),
        ];

        let mut parts = Vec::new();
        for (label, added, removed, changed) in groups {
            let mut counts = Vec::new();
            if added > 0 {
                counts.push(format!("{} added", added));
            }
            if removed > 0 {
                counts.push(format!("{} removed", removed));
            }
            if changed > 0 {
                counts.push(format!("{} changed", changed));
            }
            if !counts.is_empty() {
                parts.push(format!("{}: {}", label, counts.join(", ")));
            }
        }

        if parts.is_empty() {
            "No changes".to_string()
        } else {
            parts.join("; ")
        }
    }
}
