//! Pseudo-declaration syntax for a single declaration line.
//!
//! Bodies are never reproduced: methods get `{ }` or `{ throw null; }`,
//! property and event accessors get one placeholder per accessor.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::differ::identity::IdentityKey;
use crate::error::{DiffError, Result};
use crate::types::{
    Accessor, AccessorKind, ConversionKind, Declaration, FieldSymbol, MethodKind, MethodSymbol,
    Modifiers, OperatorKind, Parameter, PropertySymbol, Symbol, TypeKind, TypeSymbol,
};

use super::RenderOptions;

static PRIMITIVE_TYPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\bSystem\.(Boolean|Byte|SByte|Char|Decimal|Double|Single|Int16|Int32|Int64|UInt16|UInt32|UInt64|IntPtr|UIntPtr|Object|String|Void)\b",
    )
    .unwrap()
});

const THROW_BODY: &str = "{ throw null; }";
const EMPTY_BODY: &str = "{ }";

/// Display form of a type reference: well-known primitives use their keywords.
pub fn display_type(ty: &str) -> Cow<'_, str> {
    PRIMITIVE_TYPE.replace_all(ty, |caps: &Captures| {
        match &caps[1] {
            "Boolean" => "bool",
            "Byte" => "byte",
            "SByte" => "sbyte",
            "Char" => "char",
            "Decimal" => "decimal",
            "Double" => "double",
            "Single" => "float",
            "Int16" => "short",
            "Int32" => "int",
            "Int64" => "long",
            "UInt16" => "ushort",
            "UInt32" => "uint",
            "UInt64" => "ulong",
            "IntPtr" => "nint",
            "UIntPtr" => "nuint",
            "Object" => "object",
            "String" => "string",
            _ => "void",
        }
        .to_string()
    })
}

fn is_void(return_type: Option<&str>) -> bool {
    matches!(return_type, None | Some("System.Void") | Some("void"))
}

fn parameter(p: &Parameter) -> String {
    let mut s = String::new();
    if let Some(modifier) = p.modifier {
        s.push_str(modifier.as_str());
        s.push(' ');
    }
    s.push_str(&display_type(&p.ty));
    s.push(' ');
    s.push_str(&p.name);
    if let Some(ref value) = p.default_value {
        s.push_str(" = ");
        s.push_str(value);
    }
    s
}

fn parameters(params: &[Parameter]) -> String {
    params.iter().map(parameter).collect::<Vec<_>>().join(", ")
}

fn type_parameters(params: &[String]) -> String {
    if params.is_empty() {
        String::new()
    } else {
        format!("<{}>", params.join(", "))
    }
}

fn constraints(clauses: &[String]) -> String {
    clauses.iter().map(|c| format!(" where {}", c)).collect()
}

/// Member modifier keywords in declaration order.
fn member_modifiers(m: &Modifiers) -> Vec<&'static str> {
    let mut words = Vec::new();
    if m.is_new {
        words.push("new");
    }
    if m.is_static {
        words.push("static");
    }
    if m.is_abstract {
        words.push("abstract");
    }
    if m.is_virtual {
        words.push("virtual");
    }
    if m.is_sealed {
        words.push("sealed");
    }
    if m.is_override {
        words.push("override");
    }
    if m.is_readonly {
        words.push("readonly");
    }
    words
}

/// Render the line for `decl`, without its attributes.
///
/// `container` is the simple name of the enclosing type; constructors and
/// destructors are spelled with it.
pub fn declaration_line(
    decl: &Declaration,
    container: &str,
    identity: &IdentityKey,
    options: &RenderOptions,
) -> Result<String> {
    match &decl.symbol {
        Symbol::Namespace => Ok(format!("namespace {}", decl.name)),
        Symbol::Type(t) => Ok(type_header(decl, t, options)),
        Symbol::Method(m) => method(decl, m, container, identity),
        Symbol::Property(p) => property(decl, p, identity),
        Symbol::Field(f) => Ok(field(decl, f)),
        Symbol::Event(e) => {
            let mut words = vec![decl.accessibility.as_str()];
            words.extend(member_modifiers(&decl.modifiers));
            let head = format!("{} event {} {}", words.join(" "), display_type(&e.ty), decl.name);
            if decl.modifiers.is_abstract {
                Ok(format!("{};", head))
            } else {
                Ok(format!("{} {{ add {{ }} remove {{ }} }}", head))
            }
        }
        Symbol::EnumMember(e) => Ok(format!("{} = {},", decl.name, e.value)),
    }
}

fn type_header(decl: &Declaration, t: &TypeSymbol, options: &RenderOptions) -> String {
    let mut words = vec![decl.accessibility.as_str()];
    let m = &decl.modifiers;
    if m.is_new {
        words.push("new");
    }
    match t.type_kind {
        TypeKind::Class | TypeKind::Record => {
            if m.is_static {
                words.push("static");
            }
            if m.is_abstract {
                words.push("abstract");
            }
            if m.is_sealed {
                words.push("sealed");
            }
        }
        TypeKind::Struct | TypeKind::RecordStruct => {
            if m.is_readonly {
                words.push("readonly");
            }
            if m.is_ref {
                words.push("ref");
            }
        }
        TypeKind::Interface | TypeKind::Enum | TypeKind::Delegate => {}
    }
    if options.add_partial_modifier && t.type_kind.allows_partial() {
        words.push("partial");
    }
    words.push(t.type_kind.keyword());

    let mut line = words.join(" ");
    line.push(' ');

    if t.type_kind == TypeKind::Delegate {
        line.push_str(&display_type(t.return_type.as_deref().unwrap_or("System.Void")));
        line.push(' ');
    }

    line.push_str(&decl.name);
    line.push_str(&type_parameters(&t.type_parameters));

    match t.type_kind {
        TypeKind::Delegate => {
            line.push_str(&format!("({})", parameters(&t.parameters)));
            line.push_str(&constraints(&t.constraints));
            line.push(';');
            return line;
        }
        TypeKind::Record | TypeKind::RecordStruct if !t.parameters.is_empty() => {
            line.push_str(&format!("({})", parameters(&t.parameters)));
        }
        TypeKind::Enum => {
            if let Some(ref underlying) = t.underlying_type {
                line.push_str(" : ");
                line.push_str(&display_type(underlying));
            }
        }
        _ => {}
    }

    if !t.base_types.is_empty() {
        let bases: Vec<Cow<'_, str>> = t.base_types.iter().map(|b| display_type(b)).collect();
        line.push_str(" : ");
        line.push_str(&bases.join(", "));
    }
    line.push_str(&constraints(&t.constraints));
    line
}

fn method(
    decl: &Declaration,
    m: &MethodSymbol,
    container: &str,
    identity: &IdentityKey,
) -> Result<String> {
    let params = parameters(&m.parameters);
    let line = match m.method_kind {
        MethodKind::Constructor => format!(
            "{} {}({}) {}",
            decl.accessibility.as_str(),
            container,
            params,
            EMPTY_BODY
        ),
        MethodKind::StaticConstructor => format!("static {}() {}", container, EMPTY_BODY),
        MethodKind::Destructor => format!("~{}() {}", container, EMPTY_BODY),
        MethodKind::Ordinary => {
            let mut words = vec![decl.accessibility.as_str()];
            words.extend(member_modifiers(&decl.modifiers));
            let ret = display_type(m.return_type.as_deref().unwrap_or("System.Void"));
            let head = format!(
                "{} {} {}{}({}){}",
                words.join(" "),
                ret,
                decl.name,
                type_parameters(&m.type_parameters),
                params,
                constraints(&m.constraints)
            );
            if decl.modifiers.is_abstract {
                format!("{};", head)
            } else if is_void(m.return_type.as_deref()) {
                format!("{} {}", head, EMPTY_BODY)
            } else {
                format!("{} {}", head, THROW_BODY)
            }
        }
        MethodKind::Operator(op) => operator(decl, m, op, identity)?,
        MethodKind::Conversion(kind) => conversion(decl, m, kind, identity)?,
    };
    Ok(line)
}

fn operator_prefix(decl: &Declaration) -> String {
    let mut words = vec![decl.accessibility.as_str(), "static"];
    if decl.modifiers.is_abstract {
        words.push("abstract");
    } else if decl.modifiers.is_virtual {
        words.push("virtual");
    }
    words.join(" ")
}

fn operator_body(decl: &Declaration) -> &'static str {
    if decl.modifiers.is_abstract {
        ";"
    } else {
        " { throw null; }"
    }
}

fn operator(
    decl: &Declaration,
    m: &MethodSymbol,
    op: OperatorKind,
    identity: &IdentityKey,
) -> Result<String> {
    if m.parameters.is_empty() || m.parameters.len() > 2 {
        return Err(DiffError::unsupported(
            identity,
            format!("operator {} takes {} parameters", op.token(), m.parameters.len()),
        ));
    }
    let ret = m
        .return_type
        .as_deref()
        .ok_or_else(|| DiffError::unsupported(identity, "operator without a return type"))?;
    Ok(format!(
        "{} {} operator {}({}){}",
        operator_prefix(decl),
        display_type(ret),
        op.token(),
        parameters(&m.parameters),
        operator_body(decl)
    ))
}

fn conversion(
    decl: &Declaration,
    m: &MethodSymbol,
    kind: ConversionKind,
    identity: &IdentityKey,
) -> Result<String> {
    if m.parameters.len() != 1 {
        return Err(DiffError::unsupported(
            identity,
            format!("conversion operator takes {} parameters", m.parameters.len()),
        ));
    }
    let target = match m.return_type.as_deref() {
        Some(target) if !is_void(Some(target)) => target,
        _ => {
            return Err(DiffError::unsupported(
                identity,
                "conversion operator without a target type",
            ))
        }
    };
    let keyword = match kind {
        ConversionKind::Implicit => "implicit",
        ConversionKind::Explicit | ConversionKind::CheckedExplicit => "explicit",
    };
    let checked = if kind.is_checked() { "checked " } else { "" };
    Ok(format!(
        "{} {} operator {}{}({}){}",
        operator_prefix(decl),
        keyword,
        checked,
        display_type(target),
        parameters(&m.parameters),
        operator_body(decl)
    ))
}

fn accessor(a: &Accessor, is_abstract: bool) -> String {
    let mut s = String::new();
    if let Some(access) = a.accessibility {
        s.push_str(access.as_str());
        s.push(' ');
    }
    s.push_str(a.kind.keyword());
    if is_abstract {
        s.push(';');
    } else {
        s.push(' ');
        s.push_str(match a.kind {
            AccessorKind::Get => THROW_BODY,
            AccessorKind::Set | AccessorKind::Init => EMPTY_BODY,
        });
    }
    s
}

fn property(decl: &Declaration, p: &PropertySymbol, identity: &IdentityKey) -> Result<String> {
    if p.accessors.is_empty() {
        return Err(DiffError::unsupported(identity, "property without accessors"));
    }
    let mut words = vec![decl.accessibility.as_str()];
    words.extend(member_modifiers(&decl.modifiers));
    let name = if p.parameters.is_empty() {
        decl.name.clone()
    } else {
        format!("this[{}]", parameters(&p.parameters))
    };
    let accessors: Vec<String> = p
        .accessors
        .iter()
        .map(|a| accessor(a, decl.modifiers.is_abstract))
        .collect();
    Ok(format!(
        "{} {} {} {{ {} }}",
        words.join(" "),
        display_type(&p.ty),
        name,
        accessors.join(" ")
    ))
}

fn field(decl: &Declaration, f: &FieldSymbol) -> String {
    match f.constant_value {
        Some(ref value) => format!(
            "{} const {} {} = {};",
            decl.accessibility.as_str(),
            display_type(&f.ty),
            decl.name,
            value
        ),
        None => {
            let mut words = vec![decl.accessibility.as_str()];
            words.extend(member_modifiers(&decl.modifiers));
            format!("{} {} {};", words.join(" "), display_type(&f.ty), decl.name)
        }
    }
}
