//! Exclusion of attributes and declarations from the diff.

use std::collections::{BTreeSet, HashSet};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Attribute types hidden from the diff unless the caller supplies its own list.
pub const DEFAULT_EXCLUDED_ATTRIBUTES: &[&str] = &[
    "T:System.AttributeUsageAttribute",
    "T:System.ComponentModel.EditorBrowsableAttribute",
    "T:System.Diagnostics.CodeAnalysis.RequiresDynamicCodeAttribute",
    "T:System.Diagnostics.CodeAnalysis.RequiresUnreferencedCodeAttribute",
    "T:System.Runtime.CompilerServices.CompilerGeneratedAttribute",
    "T:System.Runtime.Versioning.ObsoletedOSPlatformAttribute",
    "T:System.Runtime.Versioning.SupportedOSPlatformAttribute",
    "T:System.Runtime.Versioning.UnsupportedOSPlatformAttribute",
];

static DEFAULT_ATTRIBUTE_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| DEFAULT_EXCLUDED_ATTRIBUTES.iter().copied().collect());

/// Which attribute types to suppress.
///
/// An exact empty list suppresses nothing; it is not the same as using the defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeExclusions {
    #[default]
    UseBuiltInDefaults,
    UseExactList(BTreeSet<String>),
}

impl AttributeExclusions {
    pub fn exact<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AttributeExclusions::UseExactList(ids.into_iter().map(Into::into).collect())
    }
}

/// Membership test for identities that must not appear in the diff.
///
/// Patterns are exact identities; a pattern that matches nothing is harmless.
#[derive(Clone, Debug)]
pub struct ExclusionFilter {
    attributes: Option<HashSet<String>>,
    apis: HashSet<String>,
}

impl ExclusionFilter {
    pub fn new(attributes: &AttributeExclusions, apis: &BTreeSet<String>) -> Self {
        let attributes = match attributes {
            AttributeExclusions::UseBuiltInDefaults => None,
            AttributeExclusions::UseExactList(ids) => Some(ids.iter().cloned().collect()),
        };
        Self {
            attributes,
            apis: apis.iter().cloned().collect(),
        }
    }

    /// Whether a declaration (and with it, its whole subtree) is excluded.
    pub fn is_excluded(&self, identity: &str) -> bool {
        self.apis.contains(identity)
    }

    /// Whether usages of the given attribute type are hidden.
    pub fn is_attribute_excluded(&self, attribute_type: &str) -> bool {
        match &self.attributes {
            None => DEFAULT_ATTRIBUTE_SET.contains(attribute_type),
            Some(ids) => ids.contains(attribute_type),
        }
    }
}

impl Default for ExclusionFilter {
    fn default() -> Self {
        Self::new(&AttributeExclusions::UseBuiltInDefaults, &BTreeSet::new())
    }
}
