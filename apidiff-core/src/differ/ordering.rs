//! Presentation order of sibling declarations.
//!
//! Rules per parent scope:
//!
//! - module root: namespaces alphabetically
//! - namespace: declaration order
//! - enum: members by underlying value
//! - other types: declaration order, except special members which move to
//!   fixed buckets (see [`OPERATOR_TABLE`] and [`OBJECT_OVERRIDES`])
//!
//! Added declarations always follow every retained or removed sibling.

use std::collections::HashMap;

use crate::differ::changes::{MatchResult, MatchStatus};
use crate::types::{Declaration, MethodKind, OperatorKind, Symbol, TypeKind};

/// Kind of parent whose children are being ordered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scope {
    Root,
    Namespace,
    Enum,
    Type,
}

impl Scope {
    pub fn of(parent: Option<&Declaration>) -> Self {
        match parent.map(|p| &p.symbol) {
            None => Scope::Root,
            Some(Symbol::Namespace) => Scope::Namespace,
            Some(Symbol::Type(t)) if t.type_kind == TypeKind::Enum => Scope::Enum,
            Some(_) => Scope::Type,
        }
    }
}

/// Member buckets in presentation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Bucket {
    Constructors,
    Destructor,
    Regular,
    ObjectOverrides,
    Equality,
    Operators,
    Comparison,
    IncrementDecrement,
    Conversions,
}

/// Operators with a fixed position. Unlisted operators go to
/// [`Bucket::Operators`] in encounter order.
pub const OPERATOR_TABLE: &[(OperatorKind, Bucket, u8)] = &[
    (OperatorKind::Equality, Bucket::Equality, 0),
    (OperatorKind::Inequality, Bucket::Equality, 1),
    (OperatorKind::GreaterThan, Bucket::Comparison, 0),
    (OperatorKind::LessThan, Bucket::Comparison, 1),
    (OperatorKind::GreaterThanOrEqual, Bucket::Comparison, 2),
    (OperatorKind::LessThanOrEqual, Bucket::Comparison, 3),
    (OperatorKind::Increment, Bucket::IncrementDecrement, 0),
    (OperatorKind::Decrement, Bucket::IncrementDecrement, 1),
];

/// `object` overrides that are grouped together.
pub const OBJECT_OVERRIDES: &[(&str, u8)] = &[("Equals", 0), ("GetHashCode", 1)];

type SortKey = (Bucket, usize, u8, usize);

/// Reorder sibling match results for presentation.
pub fn order<'a>(results: Vec<MatchResult<'a>>, scope: Scope) -> Vec<MatchResult<'a>> {
    let (added, retained): (Vec<_>, Vec<_>) = results
        .into_iter()
        .partition(|r| r.status == MatchStatus::Added);

    let mut ordered = sort_siblings(retained, scope);
    ordered.extend(sort_siblings(added, scope));
    ordered
}

fn sort_siblings(mut results: Vec<MatchResult<'_>>, scope: Scope) -> Vec<MatchResult<'_>> {
    match scope {
        Scope::Root => {
            results.sort_by(|a, b| a.declaration().name.cmp(&b.declaration().name));
            results
        }
        Scope::Namespace => results,
        Scope::Enum => {
            results.sort_by_key(|r| enum_value(r.declaration()));
            results
        }
        Scope::Type => {
            let decls: Vec<&Declaration> = results.iter().map(|r| r.declaration()).collect();
            let keys = member_keys(&decls);
            let mut keyed: Vec<(SortKey, MatchResult<'_>)> =
                keys.into_iter().zip(results).collect();
            keyed.sort_by(|a, b| a.0.cmp(&b.0));
            keyed.into_iter().map(|(_, r)| r).collect()
        }
    }
}

fn enum_value(decl: &Declaration) -> i64 {
    match decl.symbol {
        Symbol::EnumMember(ref e) => e.value,
        _ => i64::MAX,
    }
}

/// Sort keys for the members of one type, in encounter order.
fn member_keys(members: &[&Declaration]) -> Vec<SortKey> {
    let mut conversion_groups: HashMap<&str, usize> = HashMap::new();

    members
        .iter()
        .enumerate()
        .map(|(index, decl)| {
            let Symbol::Method(ref m) = decl.symbol else {
                return (Bucket::Regular, 0, 0, index);
            };
            match m.method_kind {
                MethodKind::Constructor | MethodKind::StaticConstructor => {
                    (Bucket::Constructors, 0, 0, index)
                }
                MethodKind::Destructor => (Bucket::Destructor, 0, 0, index),
                MethodKind::Ordinary => match object_override_rank(decl) {
                    Some(rank) => (Bucket::ObjectOverrides, 0, rank, index),
                    None => (Bucket::Regular, 0, 0, index),
                },
                MethodKind::Operator(op) => {
                    match OPERATOR_TABLE.iter().find(|(kind, _, _)| *kind == op) {
                        Some(&(_, bucket, rank)) => (bucket, 0, rank, index),
                        None => (Bucket::Operators, 0, 0, index),
                    }
                }
                MethodKind::Conversion(kind) => {
                    // Group by target type; checked variants precede unchecked ones.
                    let target = m.return_type.as_deref().unwrap_or_default();
                    let next = conversion_groups.len();
                    let group = *conversion_groups.entry(target).or_insert(next);
                    let rank = if kind.is_checked() { 0 } else { 1 };
                    (Bucket::Conversions, group, rank, index)
                }
            }
        })
        .collect()
}

fn object_override_rank(decl: &Declaration) -> Option<u8> {
    if !decl.modifiers.is_override {
        return None;
    }
    OBJECT_OVERRIDES
        .iter()
        .find(|(name, _)| *name == decl.name)
        .map(|&(_, rank)| rank)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::differ::changes::Versions;
    use crate::differ::identity::IdentityKey;
    use crate::types::{ConversionKind, Modifiers, Parameter};

    fn make_result(decl: &Declaration, status: MatchStatus) -> MatchResult<'_> {
        let versions = match status {
            MatchStatus::Added => Versions::After(decl),
            MatchStatus::Removed => Versions::Before(decl),
            _ => Versions::Both {
                before: decl,
                after: decl,
            },
        };
        MatchResult {
            key: IdentityKey::new(decl.name.clone()),
            status,
            versions,
            before_line: None,
            after_line: None,
            attributes: vec![],
            children: vec![],
        }
    }

    fn names(results: &[MatchResult<'_>]) -> Vec<String> {
        results.iter().map(|r| r.declaration().name.clone()).collect()
    }

    fn binary(op: OperatorKind) -> Declaration {
        Declaration::operator(
            op,
            "System.Boolean",
            vec![Parameter::new("a", "N.C"), Parameter::new("b", "N.C")],
        )
    }

    #[test]
    fn test_scope_of() {
        assert_eq!(Scope::of(None), Scope::Root);
        assert_eq!(Scope::of(Some(&Declaration::namespace("N"))), Scope::Namespace);
        assert_eq!(Scope::of(Some(&Declaration::enumeration("E"))), Scope::Enum);
        assert_eq!(Scope::of(Some(&Declaration::structure("S"))), Scope::Type);
    }

    #[test]
    fn test_root_namespaces_are_alphabetical() {
        let decls = vec![
            Declaration::namespace("Zeta"),
            Declaration::namespace("Alpha"),
            Declaration::namespace("Mid"),
        ];
        let results = decls
            .iter()
            .map(|d| make_result(d, MatchStatus::Changed))
            .collect();
        assert_eq!(names(&order(results, Scope::Root)), vec!["Alpha", "Mid", "Zeta"]);
    }

    #[test]
    fn test_enum_members_by_value() {
        let decls = vec![
            Declaration::enum_member("What", 3),
            Declaration::enum_member("Foo", 1),
            Declaration::enum_member("Bar", 2),
            Declaration::enum_member("Default", 0),
        ];
        let results = decls
            .iter()
            .map(|d| make_result(d, MatchStatus::Added))
            .collect();
        assert_eq!(
            names(&order(results, Scope::Enum)),
            vec!["Default", "Foo", "Bar", "What"]
        );
    }

    #[test]
    fn test_added_are_appended() {
        let decls = vec![
            Declaration::method("First", None, vec![]),
            Declaration::method("Inserted", None, vec![]),
            Declaration::method("Last", None, vec![]),
        ];
        let results = vec![
            make_result(&decls[0], MatchStatus::Unchanged),
            make_result(&decls[1], MatchStatus::Added),
            make_result(&decls[2], MatchStatus::Changed),
        ];
        assert_eq!(
            names(&order(results, Scope::Type)),
            vec!["First", "Last", "Inserted"]
        );
    }

    #[test]
    fn test_namespace_keeps_declaration_order() {
        let decls = vec![Declaration::class("B"), Declaration::class("A")];
        let results = decls
            .iter()
            .map(|d| make_result(d, MatchStatus::Removed))
            .collect();
        assert_eq!(names(&order(results, Scope::Namespace)), vec!["B", "A"]);
    }

    #[test]
    fn test_special_member_buckets() {
        let equals = Declaration::method(
            "Equals",
            Some("System.Boolean"),
            vec![Parameter::new("o", "System.Object")],
        )
        .with_modifiers(Modifiers::new().with_override());
        let hash = Declaration::method("GetHashCode", Some("System.Int32"), vec![])
            .with_modifiers(Modifiers::new().with_override());
        let decls = vec![
            binary(OperatorKind::LessThanOrEqual),
            binary(OperatorKind::Inequality),
            hash,
            binary(OperatorKind::Addition),
            binary(OperatorKind::LessThan),
            Declaration::method("Regular", None, vec![]),
            binary(OperatorKind::Equality),
            binary(OperatorKind::GreaterThan),
            Declaration::operator(OperatorKind::Increment, "N.C", vec![Parameter::new("a", "N.C")]),
            equals,
            binary(OperatorKind::GreaterThanOrEqual),
            binary(OperatorKind::Subtraction),
            Declaration::constructor(vec![]),
        ];
        let results = decls
            .iter()
            .map(|d| make_result(d, MatchStatus::Added))
            .collect();

        assert_eq!(
            names(&order(results, Scope::Type)),
            vec![
                ".ctor",
                "Regular",
                "Equals",
                "GetHashCode",
                "op_Equality",
                "op_Inequality",
                "op_Addition",
                "op_Subtraction",
                "op_GreaterThan",
                "op_LessThan",
                "op_GreaterThanOrEqual",
                "op_LessThanOrEqual",
                "op_Increment",
            ]
        );
    }

    #[test]
    fn test_checked_conversion_precedes_unchecked_of_same_target() {
        let source = || Parameter::new("value", "N.C");
        let decls = vec![
            Declaration::conversion(ConversionKind::Explicit, "System.Int32", source()),
            Declaration::conversion(ConversionKind::Explicit, "System.Byte", source()),
            Declaration::conversion(ConversionKind::CheckedExplicit, "System.Byte", source()),
            Declaration::conversion(ConversionKind::CheckedExplicit, "System.Int32", source()),
            Declaration::method("Before", None, vec![]),
        ];
        let results = decls
            .iter()
            .map(|d| make_result(d, MatchStatus::Added))
            .collect();
        let ordered = order(results, Scope::Type);

        let rendered: Vec<String> = ordered
            .iter()
            .map(|r| match &r.declaration().symbol {
                Symbol::Method(m) => format!(
                    "{}:{}",
                    r.declaration().name,
                    m.return_type.clone().unwrap_or_default()
                ),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(
            rendered,
            vec![
                "Before:",
                "op_CheckedExplicit:System.Int32",
                "op_Explicit:System.Int32",
                "op_CheckedExplicit:System.Byte",
                "op_Explicit:System.Byte",
            ]
        );
    }
}
