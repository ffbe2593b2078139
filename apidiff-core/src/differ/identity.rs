//! Version-independent identity keys for declarations.
//!
//! Keys follow the documentation-comment ID scheme (`N:`, `T:`, `M:`, `P:`,
//! `F:`, `E:`). They are derived from the declaration's scope, name and
//! overload shape only, so a changed return type or field type keeps its
//! identity and is reported as a change rather than a removal plus addition.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::types::{AttributeUsage, Declaration, MethodKind, Parameter, Symbol};

/// Identity of a declaration across versions.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct IdentityKey(String);

impl IdentityKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Join a containing scope and a simple name.
pub fn qualify(scope: &str, name: &str) -> String {
    if scope.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", scope, name)
    }
}

/// Fully-qualified name that children of `decl` are keyed under.
pub fn qualified_name(scope: &str, decl: &Declaration) -> String {
    match &decl.symbol {
        Symbol::Namespace => decl.name.clone(),
        Symbol::Type(t) if !t.type_parameters.is_empty() => {
            format!("{}`{}", qualify(scope, &decl.name), t.type_parameters.len())
        }
        _ => qualify(scope, &decl.name),
    }
}

/// Compute the identity key of `decl` declared inside `scope`.
///
/// Declaration kind is deliberately not part of the key.
pub fn key(scope: &str, decl: &Declaration) -> IdentityKey {
    let key = match &decl.symbol {
        Symbol::Namespace => format!("N:{}", decl.name),
        Symbol::Type(_) => format!("T:{}", qualified_name(scope, decl)),
        Symbol::Method(m) => {
            let name = match m.method_kind {
                MethodKind::Ordinary => decl.name.as_str(),
                MethodKind::Constructor => "#ctor",
                MethodKind::StaticConstructor => "#cctor",
                MethodKind::Destructor => "Finalize",
                MethodKind::Operator(op) => op.metadata_name(),
                MethodKind::Conversion(kind) => kind.metadata_name(),
            };
            let mut key = format!("M:{}", qualify(scope, name));
            if !m.type_parameters.is_empty() {
                key.push_str(&format!("``{}", m.type_parameters.len()));
            }
            key.push_str(&parameter_list(&m.parameters));
            // Conversions from one source type differ only by their target.
            if let MethodKind::Conversion(_) = m.method_kind {
                key.push('~');
                key.push_str(&key_type(m.return_type.as_deref().unwrap_or("System.Void")));
            }
            key
        }
        Symbol::Property(p) => format!(
            "P:{}{}",
            qualify(scope, &decl.name),
            parameter_list(&p.parameters)
        ),
        Symbol::Field(_) | Symbol::EnumMember(_) => format!("F:{}", qualify(scope, &decl.name)),
        Symbol::Event(_) => format!("E:{}", qualify(scope, &decl.name)),
    };
    IdentityKey(key)
}

/// Identity keys for a declaration's attribute usages, in order.
///
/// Repeated usages of one attribute type get an occurrence suffix (`#1`, `#2`, ...)
/// so they pair up positionally across versions.
pub fn attribute_keys(attributes: &[&AttributeUsage]) -> Vec<IdentityKey> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    attributes
        .iter()
        .map(|attr| {
            let count = seen.entry(attr.type_id.as_str()).or_insert(0);
            let key = if *count == 0 {
                attr.type_id.clone()
            } else {
                format!("{}#{}", attr.type_id, count)
            };
            *count += 1;
            IdentityKey(key)
        })
        .collect()
}

fn parameter_list(parameters: &[Parameter]) -> String {
    if parameters.is_empty() {
        return String::new();
    }
    let types: Vec<String> = parameters
        .iter()
        .map(|p| {
            let mut ty = key_type(&p.ty);
            if p.modifier.is_some_and(|m| m.is_by_ref()) {
                ty.push('@');
            }
            ty
        })
        .collect();
    format!("({})", types.join(","))
}

/// Normalize a type reference for use inside a key.
fn key_type(ty: &str) -> String {
    ty.chars()
        .filter(|c| !c.is_whitespace() && *c != '?')
        .map(|c| match c {
            '<' => '{',
            '>' => '}',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        Accessor, ConversionKind, OperatorKind, ParameterModifier, TypeKind, TypeSymbol,
    };

    fn int_param(name: &str) -> Parameter {
        Parameter::new(name, "System.Int32")
    }

    #[test]
    fn test_namespace_and_type_keys() {
        let ns = Declaration::namespace("MyNamespace");
        assert_eq!(key("", &ns).as_str(), "N:MyNamespace");

        let class = Declaration::class("MyClass");
        assert_eq!(key("MyNamespace", &class).as_str(), "T:MyNamespace.MyClass");

        let mut generic = TypeSymbol::new(TypeKind::Class);
        generic.type_parameters = vec!["TKey".to_string(), "TValue".to_string()];
        let generic = Declaration::new("Map", Symbol::Type(generic));
        assert_eq!(key("N", &generic).as_str(), "T:N.Map`2");
        assert_eq!(qualified_name("N", &generic), "N.Map`2");
    }

    #[test]
    fn test_kind_is_not_part_of_key() {
        let s = Declaration::structure("S");
        let c = Declaration::class("S");
        assert_eq!(key("N", &s), key("N", &c));
    }

    #[test]
    fn test_method_keys_ignore_return_type_and_parameter_names() {
        let a = Declaration::method("Run", None, vec![int_param("a")]);
        let b = Declaration::method("Run", Some("System.String"), vec![int_param("count")]);
        assert_eq!(key("N.C", &a), key("N.C", &b));
        assert_eq!(key("N.C", &a).as_str(), "M:N.C.Run(System.Int32)");

        let parameterless = Declaration::method("Run", None, vec![]);
        assert_eq!(key("N.C", &parameterless).as_str(), "M:N.C.Run");
    }

    #[test]
    fn test_overloads_have_distinct_keys() {
        let by_value = Declaration::method("Swap", None, vec![int_param("x")]);
        let by_ref = Declaration::method(
            "Swap",
            None,
            vec![int_param("x").with_modifier(ParameterModifier::Ref)],
        );
        assert_ne!(key("N.C", &by_value), key("N.C", &by_ref));
        assert_eq!(key("N.C", &by_ref).as_str(), "M:N.C.Swap(System.Int32@)");
    }

    #[test]
    fn test_special_method_keys() {
        let ctor = Declaration::constructor(vec![int_param("x")]);
        assert_eq!(key("N.C", &ctor).as_str(), "M:N.C.#ctor(System.Int32)");

        let op = Declaration::operator(
            OperatorKind::Addition,
            "N.C",
            vec![Parameter::new("a", "N.C"), Parameter::new("b", "N.C")],
        );
        assert_eq!(key("N.C", &op).as_str(), "M:N.C.op_Addition(N.C,N.C)");
    }

    #[test]
    fn test_conversion_keys_include_target() {
        let to_int = Declaration::conversion(
            ConversionKind::Explicit,
            "System.Int32",
            Parameter::new("value", "MyNamespace.MyClass"),
        );
        let to_byte = Declaration::conversion(
            ConversionKind::Explicit,
            "System.Byte",
            Parameter::new("value", "MyNamespace.MyClass"),
        );
        assert_eq!(
            key("MyNamespace.MyClass", &to_int).as_str(),
            "M:MyNamespace.MyClass.op_Explicit(MyNamespace.MyClass)~System.Int32"
        );
        assert_ne!(key("MyNamespace.MyClass", &to_int), key("MyNamespace.MyClass", &to_byte));
    }

    #[test]
    fn test_member_keys_by_name_only() {
        let a = Declaration::property("Name", "System.String", vec![Accessor::get()]);
        let b = Declaration::property("Name", "System.Object", vec![Accessor::get(), Accessor::set()]);
        assert_eq!(key("N.C", &a), key("N.C", &b));
        assert_eq!(key("N.C", &a).as_str(), "P:N.C.Name");

        assert_eq!(key("N.C", &Declaration::field("F", "System.Int32")).as_str(), "F:N.C.F");
        assert_eq!(key("N.C", &Declaration::event("E", "System.EventHandler")).as_str(), "E:N.C.E");
        assert_eq!(key("N.E", &Declaration::enum_member("A", 1)).as_str(), "F:N.E.A");
    }

    #[test]
    fn test_key_type_normalization() {
        assert_eq!(
            key_type("System.Collections.Generic.List<System.String?>"),
            "System.Collections.Generic.List{System.String}"
        );
        assert_eq!(key_type("System.Collections.Generic.Dictionary<K, V>"), "System.Collections.Generic.Dictionary{K,V}");
    }

    #[test]
    fn test_attribute_keys_number_repeated_usages() {
        let a = AttributeUsage::new("T:N.TagAttribute", "N.Tag(\"a\")");
        let b = AttributeUsage::new("T:N.TagAttribute", "N.Tag(\"b\")");
        let c = AttributeUsage::new("T:System.ObsoleteAttribute", "System.Obsolete");
        let keys = attribute_keys(&[&a, &c, &b]);
        let keys: Vec<&str> = keys.iter().map(|k| k.as_str()).collect();
        assert_eq!(
            keys,
            vec!["T:N.TagAttribute", "T:System.ObsoleteAttribute", "T:N.TagAttribute#1"]
        );
    }
}
