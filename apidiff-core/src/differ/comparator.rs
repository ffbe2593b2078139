//! Tree matcher: correlates before/after declaration trees by identity key.

use std::collections::{HashMap, HashSet};

use crate::differ::changes::{AttributeMatch, MatchResult, MatchStatus, Versions};
use crate::differ::filter::ExclusionFilter;
use crate::differ::identity::{self, IdentityKey};
use crate::differ::ordering::{self, Scope};
use crate::error::{DiffError, Result, Side};
use crate::render::{syntax, RenderOptions};
use crate::types::{AttributeUsage, Declaration, Module, Symbol, TypeKind};

/// Correlates declaration trees, applying exclusions and presentation order.
///
/// Matching is purely by identity key and declaration kind; there is no
/// similarity matching, so a rename is always one removal plus one addition.
pub struct Matcher<'o> {
    filter: &'o ExclusionFilter,
    options: &'o RenderOptions,
}

impl<'o> Matcher<'o> {
    pub fn new(filter: &'o ExclusionFilter, options: &'o RenderOptions) -> Self {
        Self { filter, options }
    }

    /// Match the namespaces of two versions of a module.
    ///
    /// A missing side is treated as an empty module.
    pub fn match_modules<'a>(
        &self,
        before: Option<&'a Module>,
        after: Option<&'a Module>,
    ) -> Result<Vec<MatchResult<'a>>> {
        let before = before.map(|m| m.namespaces.as_slice()).unwrap_or_default();
        let after = after.map(|m| m.namespaces.as_slice()).unwrap_or_default();
        self.match_children(None, "", before, after)
    }

    /// Match the children of one scope.
    ///
    /// `parent` is the enclosing declaration (`None` at the module root) and
    /// `scope` its qualified name, used to key the children.
    pub fn match_children<'a>(
        &self,
        parent: Option<&'a Declaration>,
        scope: &str,
        before: &'a [Declaration],
        after: &'a [Declaration],
    ) -> Result<Vec<MatchResult<'a>>> {
        let before = self.keyed(parent, scope, before, Side::Before)?;
        let after = self.keyed(parent, scope, after, Side::After)?;

        let after_by_key: HashMap<&IdentityKey, &'a Declaration> =
            after.iter().map(|(k, d)| (k, *d)).collect();
        let mut paired: HashSet<&IdentityKey> = HashSet::new();
        let mut results = Vec::with_capacity(before.len().max(after.len()));

        for (key, b) in &before {
            let b: &'a Declaration = *b;
            match after_by_key.get(key) {
                // A kind change under the same identity is a removal plus an addition.
                Some(&a) if b.same_kind(a) => {
                    paired.insert(key);
                    results.push(self.match_pair(parent, scope, key.clone(), b, a)?);
                }
                _ => {
                    let removed = Versions::Before(b);
                    results.push(self.match_whole(parent, scope, key.clone(), removed)?);
                }
            }
        }

        for (key, a) in &after {
            if !paired.contains(key) {
                let added = Versions::After(*a);
                results.push(self.match_whole(parent, scope, key.clone(), added)?);
            }
        }

        Ok(ordering::order(results, Scope::of(parent)))
    }

    /// Key, validate and filter one side's children.
    fn keyed<'a>(
        &self,
        parent: Option<&Declaration>,
        scope: &str,
        children: &'a [Declaration],
        side: Side,
    ) -> Result<Vec<(IdentityKey, &'a Declaration)>> {
        let mut seen = HashSet::new();
        let mut keyed = Vec::with_capacity(children.len());
        for child in children {
            let key = identity::key(scope, child);
            if self.filter.is_excluded(key.as_str()) {
                continue;
            }
            check_placement(parent, child, &key)?;
            if !seen.insert(key.clone()) {
                return Err(DiffError::DuplicateIdentity {
                    identity: key.to_string(),
                    side,
                });
            }
            keyed.push((key, child));
        }
        Ok(keyed)
    }

    /// A declaration present in both versions.
    fn match_pair<'a>(
        &self,
        parent: Option<&'a Declaration>,
        scope: &str,
        key: IdentityKey,
        before: &'a Declaration,
        after: &'a Declaration,
    ) -> Result<MatchResult<'a>> {
        let container = container_name(parent);
        let before_line = syntax::declaration_line(before, container, &key, self.options)?;
        let after_line = syntax::declaration_line(after, container, &key, self.options)?;
        let attributes = self.match_attributes(&before.attributes, &after.attributes);

        let children = if after.is_composite() {
            let child_scope = identity::qualified_name(scope, after);
            self.match_children(Some(after), &child_scope, &before.children, &after.children)?
        } else {
            check_leaf(before, &key)?;
            check_leaf(after, &key)?;
            Vec::new()
        };

        let changed = before_line != after_line
            || attributes.iter().any(|a| a.status != MatchStatus::Unchanged)
            || children.iter().any(|c| c.status != MatchStatus::Unchanged);

        Ok(MatchResult {
            key,
            status: if changed {
                MatchStatus::Changed
            } else {
                MatchStatus::Unchanged
            },
            versions: Versions::Both { before, after },
            before_line: Some(before_line),
            after_line: Some(after_line),
            attributes,
            children,
        })
    }

    /// A declaration present in only one version, with its whole subtree.
    fn match_whole<'a>(
        &self,
        parent: Option<&'a Declaration>,
        scope: &str,
        key: IdentityKey,
        versions: Versions<'a>,
    ) -> Result<MatchResult<'a>> {
        let decl = versions.current();
        let line = syntax::declaration_line(decl, container_name(parent), &key, self.options)?;

        let children = if decl.is_composite() {
            let child_scope = identity::qualified_name(scope, decl);
            match versions {
                Versions::Before(_) => {
                    self.match_children(Some(decl), &child_scope, &decl.children, &[])?
                }
                _ => self.match_children(Some(decl), &child_scope, &[], &decl.children)?,
            }
        } else {
            check_leaf(decl, &key)?;
            Vec::new()
        };

        let (status, before_line, after_line, attributes) = match versions {
            Versions::Before(d) => (
                MatchStatus::Removed,
                Some(line),
                None,
                self.match_attributes(&d.attributes, &[]),
            ),
            _ => (
                MatchStatus::Added,
                None,
                Some(line),
                self.match_attributes(&[], &decl.attributes),
            ),
        };

        Ok(MatchResult {
            key,
            status,
            versions,
            before_line,
            after_line,
            attributes,
            children,
        })
    }

    /// Pair attribute usages by attribute type, skipping excluded types.
    pub fn match_attributes(
        &self,
        before: &[AttributeUsage],
        after: &[AttributeUsage],
    ) -> Vec<AttributeMatch> {
        let visible = |attrs: &[AttributeUsage]| -> Vec<(IdentityKey, String)> {
            let kept: Vec<&AttributeUsage> = attrs
                .iter()
                .filter(|a| !self.filter.is_attribute_excluded(&a.type_id))
                .collect();
            identity::attribute_keys(&kept)
                .into_iter()
                .zip(kept)
                .map(|(key, attr)| (key, format!("[{}]", attr.text)))
                .collect()
        };
        let before = visible(before);
        let after = visible(after);

        let after_by_key: HashMap<&IdentityKey, &String> =
            after.iter().map(|(k, text)| (k, text)).collect();
        let mut matches = Vec::with_capacity(before.len().max(after.len()));

        for (key, text) in &before {
            let m = match after_by_key.get(key) {
                Some(after_text) => AttributeMatch {
                    key: key.clone(),
                    status: if *after_text == text {
                        MatchStatus::Unchanged
                    } else {
                        MatchStatus::Changed
                    },
                    before: Some(text.clone()),
                    after: Some((*after_text).clone()),
                },
                None => AttributeMatch {
                    key: key.clone(),
                    status: MatchStatus::Removed,
                    before: Some(text.clone()),
                    after: None,
                },
            };
            matches.push(m);
        }

        let before_keys: HashSet<&IdentityKey> = before.iter().map(|(k, _)| k).collect();
        for (key, text) in &after {
            if !before_keys.contains(key) {
                matches.push(AttributeMatch {
                    key: key.clone(),
                    status: MatchStatus::Added,
                    before: None,
                    after: Some(text.clone()),
                });
            }
        }

        matches
    }
}

/// Simple name of the enclosing type, used to spell constructors.
fn container_name(parent: Option<&Declaration>) -> &str {
    match parent {
        Some(p) if matches!(p.symbol, Symbol::Type(_)) => p.name.as_str(),
        _ => "",
    }
}

fn check_leaf(decl: &Declaration, key: &IdentityKey) -> Result<()> {
    if decl.children.is_empty() {
        Ok(())
    } else {
        Err(DiffError::unsupported(
            key,
            format!("a {} cannot contain declarations", decl.kind_name()),
        ))
    }
}

/// Reject declaration shapes that cannot be rendered as nested blocks.
fn check_placement(
    parent: Option<&Declaration>,
    child: &Declaration,
    key: &IdentityKey,
) -> Result<()> {
    let allowed = match (parent.map(|p| &p.symbol), &child.symbol) {
        (None, Symbol::Namespace) => true,
        (None, _) => false,
        (Some(Symbol::Namespace), Symbol::Type(_)) => true,
        (Some(Symbol::Namespace), _) => false,
        (Some(Symbol::Type(t)), Symbol::EnumMember(_)) => t.type_kind == TypeKind::Enum,
        (Some(Symbol::Type(_)), Symbol::Namespace) => false,
        (Some(Symbol::Type(t)), _) => {
            !matches!(t.type_kind, TypeKind::Enum | TypeKind::Delegate)
        }
        (Some(_), _) => false,
    };
    if allowed {
        return Ok(());
    }
    let place = match parent {
        Some(p) => format!("a {}", p.kind_name()),
        None => "the module root".to_string(),
    };
    Err(DiffError::unsupported(
        key,
        format!("a {} cannot be declared in {}", child.kind_name(), place),
    ))
}
