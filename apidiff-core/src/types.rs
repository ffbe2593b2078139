//! Declaration model for the public API surface of a module.
//!
//! A [`Module`] holds namespace declarations and every [`Declaration`] owns
//! its children, so a declaration tree is always acyclic. The kind-specific
//! signature shape lives in [`Symbol`], a closed sum type that each stage
//! matches on exactly once per tree level.
//!
//! Type references are fully-qualified metadata names (`System.Int32`,
//! `MyNamespace.MyClass`); the renderer decides how they are displayed.

use serde::{Deserialize, Serialize};

/// Declared accessibility of a type or member.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accessibility {
    #[default]
    Public,
    Protected,
    ProtectedInternal,
    PrivateProtected,
    Internal,
    Private,
}

impl Accessibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Accessibility::Public => "public",
            Accessibility::Protected => "protected",
            Accessibility::ProtectedInternal => "protected internal",
            Accessibility::PrivateProtected => "private protected",
            Accessibility::Internal => "internal",
            Accessibility::Private => "private",
        }
    }
}

/// Declaration modifiers that show up in rendered headers and signatures.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub is_static: bool,
    pub is_abstract: bool,
    pub is_virtual: bool,
    pub is_override: bool,
    pub is_sealed: bool,
    pub is_readonly: bool,
    /// Hides an inherited member (`new`).
    pub is_new: bool,
    /// `ref struct`.
    pub is_ref: bool,
}

impl Modifiers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn with_abstract(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn with_virtual(mut self) -> Self {
        self.is_virtual = true;
        self
    }

    pub fn with_override(mut self) -> Self {
        self.is_override = true;
        self
    }

    pub fn with_sealed(mut self) -> Self {
        self.is_sealed = true;
        self
    }

    pub fn with_readonly(mut self) -> Self {
        self.is_readonly = true;
        self
    }
}

/// Passing convention of a parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterModifier {
    Ref,
    Out,
    In,
    Params,
    This,
}

impl ParameterModifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterModifier::Ref => "ref",
            ParameterModifier::Out => "out",
            ParameterModifier::In => "in",
            ParameterModifier::Params => "params",
            ParameterModifier::This => "this",
        }
    }

    /// By-reference parameters are distinct overloads.
    pub fn is_by_ref(&self) -> bool {
        matches!(
            self,
            ParameterModifier::Ref | ParameterModifier::Out | ParameterModifier::In
        )
    }
}

/// A method, operator, indexer, delegate or record parameter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifier: Option<ParameterModifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            modifier: None,
            default_value: None,
        }
    }

    pub fn with_modifier(mut self, modifier: ParameterModifier) -> Self {
        self.modifier = Some(modifier);
        self
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}

/// An attribute applied to a declaration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeUsage {
    /// Identity of the attribute type, e.g. `T:System.ObsoleteAttribute`.
    pub type_id: String,
    /// Rendered usage without the surrounding brackets, e.g. `System.Obsolete("Use Bar")`.
    pub text: String,
}

impl AttributeUsage {
    pub fn new(type_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            type_id: type_id.into(),
            text: text.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
    Enum,
    Delegate,
    Record,
    RecordStruct,
}

impl TypeKind {
    /// Declaration keyword.
    pub fn keyword(&self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Struct => "struct",
            TypeKind::Interface => "interface",
            TypeKind::Enum => "enum",
            TypeKind::Delegate => "delegate",
            TypeKind::Record => "record",
            TypeKind::RecordStruct => "record struct",
        }
    }

    /// Whether the type can carry the `partial` modifier.
    pub fn allows_partial(&self) -> bool {
        !matches!(self, TypeKind::Enum | TypeKind::Delegate)
    }
}

/// Signature fragment of a type declaration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSymbol {
    pub type_kind: TypeKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_parameters: Vec<String>,
    /// Raw constraint clauses, e.g. `T : class`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub base_types: Vec<String>,
    /// Record primary constructor or delegate parameters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    /// Delegate return type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
    /// Enum underlying type when it is not `System.Int32`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underlying_type: Option<String>,
}

impl TypeSymbol {
    pub fn new(type_kind: TypeKind) -> Self {
        Self {
            type_kind,
            type_parameters: Vec::new(),
            constraints: Vec::new(),
            base_types: Vec::new(),
            parameters: Vec::new(),
            return_type: None,
            underlying_type: None,
        }
    }
}

/// User-defined operators, named after their metadata names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorKind {
    Addition,
    Subtraction,
    Multiply,
    Division,
    Modulus,
    BitwiseAnd,
    BitwiseOr,
    ExclusiveOr,
    LeftShift,
    RightShift,
    UnsignedRightShift,
    UnaryPlus,
    UnaryNegation,
    LogicalNot,
    OnesComplement,
    True,
    False,
    Equality,
    Inequality,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
    Increment,
    Decrement,
}

impl OperatorKind {
    pub fn metadata_name(&self) -> &'static str {
        match self {
            OperatorKind::Addition => "op_Addition",
            OperatorKind::Subtraction => "op_Subtraction",
            OperatorKind::Multiply => "op_Multiply",
            OperatorKind::Division => "op_Division",
            OperatorKind::Modulus => "op_Modulus",
            OperatorKind::BitwiseAnd => "op_BitwiseAnd",
            OperatorKind::BitwiseOr => "op_BitwiseOr",
            OperatorKind::ExclusiveOr => "op_ExclusiveOr",
            OperatorKind::LeftShift => "op_LeftShift",
            OperatorKind::RightShift => "op_RightShift",
            OperatorKind::UnsignedRightShift => "op_UnsignedRightShift",
            OperatorKind::UnaryPlus => "op_UnaryPlus",
            OperatorKind::UnaryNegation => "op_UnaryNegation",
            OperatorKind::LogicalNot => "op_LogicalNot",
            OperatorKind::OnesComplement => "op_OnesComplement",
            OperatorKind::True => "op_True",
            OperatorKind::False => "op_False",
            OperatorKind::Equality => "op_Equality",
            OperatorKind::Inequality => "op_Inequality",
            OperatorKind::GreaterThan => "op_GreaterThan",
            OperatorKind::LessThan => "op_LessThan",
            OperatorKind::GreaterThanOrEqual => "op_GreaterThanOrEqual",
            OperatorKind::LessThanOrEqual => "op_LessThanOrEqual",
            OperatorKind::Increment => "op_Increment",
            OperatorKind::Decrement => "op_Decrement",
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            OperatorKind::Addition | OperatorKind::UnaryPlus => "+",
            OperatorKind::Subtraction | OperatorKind::UnaryNegation => "-",
            OperatorKind::Multiply => "*",
            OperatorKind::Division => "/",
            OperatorKind::Modulus => "%",
            OperatorKind::BitwiseAnd => "&",
            OperatorKind::BitwiseOr => "|",
            OperatorKind::ExclusiveOr => "^",
            OperatorKind::LeftShift => "<<",
            OperatorKind::RightShift => ">>",
            OperatorKind::UnsignedRightShift => ">>>",
            OperatorKind::LogicalNot => "!",
            OperatorKind::OnesComplement => "~",
            OperatorKind::True => "true",
            OperatorKind::False => "false",
            OperatorKind::Equality => "==",
            OperatorKind::Inequality => "!=",
            OperatorKind::GreaterThan => ">",
            OperatorKind::LessThan => "<",
            OperatorKind::GreaterThanOrEqual => ">=",
            OperatorKind::LessThanOrEqual => "<=",
            OperatorKind::Increment => "++",
            OperatorKind::Decrement => "--",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionKind {
    Implicit,
    Explicit,
    CheckedExplicit,
}

impl ConversionKind {
    pub fn metadata_name(&self) -> &'static str {
        match self {
            ConversionKind::Implicit => "op_Implicit",
            ConversionKind::Explicit => "op_Explicit",
            ConversionKind::CheckedExplicit => "op_CheckedExplicit",
        }
    }

    pub fn is_checked(&self) -> bool {
        matches!(self, ConversionKind::CheckedExplicit)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodKind {
    #[default]
    Ordinary,
    Constructor,
    StaticConstructor,
    Destructor,
    Operator(OperatorKind),
    Conversion(ConversionKind),
}

/// Signature fragment of methods, constructors, destructors and operators.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSymbol {
    #[serde(default)]
    pub method_kind: MethodKind,
    /// `None` means `void`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_parameters: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessorKind {
    Get,
    Set,
    Init,
}

impl AccessorKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            AccessorKind::Get => "get",
            AccessorKind::Set => "set",
            AccessorKind::Init => "init",
        }
    }
}

/// A property accessor; `accessibility` is set only when it differs from the property's.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accessor {
    pub kind: AccessorKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessibility: Option<Accessibility>,
}

impl Accessor {
    pub fn get() -> Self {
        Self {
            kind: AccessorKind::Get,
            accessibility: None,
        }
    }

    pub fn set() -> Self {
        Self {
            kind: AccessorKind::Set,
            accessibility: None,
        }
    }

    pub fn init() -> Self {
        Self {
            kind: AccessorKind::Init,
            accessibility: None,
        }
    }

    pub fn with_accessibility(mut self, accessibility: Accessibility) -> Self {
        self.accessibility = Some(accessibility);
        self
    }
}

/// Properties and indexers (an indexer is a property with parameters).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySymbol {
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub accessors: Vec<Accessor>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSymbol {
    #[serde(rename = "type")]
    pub ty: String,
    /// Present for `const` fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constant_value: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSymbol {
    #[serde(rename = "type")]
    pub ty: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumMemberSymbol {
    pub value: i64,
}

/// Kind-specific part of a declaration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Symbol {
    Namespace,
    Type(TypeSymbol),
    Method(MethodSymbol),
    Property(PropertySymbol),
    Field(FieldSymbol),
    Event(EventSymbol),
    EnumMember(EnumMemberSymbol),
}

/// One node of the public API surface.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    /// Simple name; namespaces carry their full dotted name.
    pub name: String,
    #[serde(default)]
    pub accessibility: Accessibility,
    #[serde(default)]
    pub modifiers: Modifiers,
    /// Compiler-synthesized (e.g. the default constructor of a class).
    #[serde(default)]
    pub is_implicit: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<AttributeUsage>,
    pub symbol: Symbol,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Declaration>,
}

impl Declaration {
    pub fn new(name: impl Into<String>, symbol: Symbol) -> Self {
        Self {
            name: name.into(),
            accessibility: Accessibility::Public,
            modifiers: Modifiers::default(),
            is_implicit: false,
            attributes: Vec::new(),
            symbol,
            children: Vec::new(),
        }
    }

    pub fn namespace(name: impl Into<String>) -> Self {
        Self::new(name, Symbol::Namespace)
    }

    pub fn type_decl(name: impl Into<String>, type_kind: TypeKind) -> Self {
        Self::new(name, Symbol::Type(TypeSymbol::new(type_kind)))
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::type_decl(name, TypeKind::Class)
    }

    pub fn structure(name: impl Into<String>) -> Self {
        Self::type_decl(name, TypeKind::Struct)
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self::type_decl(name, TypeKind::Interface)
    }

    pub fn enumeration(name: impl Into<String>) -> Self {
        Self::type_decl(name, TypeKind::Enum)
    }

    pub fn delegate(
        name: impl Into<String>,
        return_type: Option<&str>,
        parameters: Vec<Parameter>,
    ) -> Self {
        let mut symbol = TypeSymbol::new(TypeKind::Delegate);
        symbol.return_type = return_type.map(|s| s.to_string());
        symbol.parameters = parameters;
        Self::new(name, Symbol::Type(symbol))
    }

    pub fn record(name: impl Into<String>, parameters: Vec<Parameter>) -> Self {
        let mut symbol = TypeSymbol::new(TypeKind::Record);
        symbol.parameters = parameters;
        Self::new(name, Symbol::Type(symbol))
    }

    /// Ordinary method; `return_type` of `None` means `void`.
    pub fn method(
        name: impl Into<String>,
        return_type: Option<&str>,
        parameters: Vec<Parameter>,
    ) -> Self {
        Self::new(
            name,
            Symbol::Method(MethodSymbol {
                method_kind: MethodKind::Ordinary,
                return_type: return_type.map(|s| s.to_string()),
                parameters,
                ..MethodSymbol::default()
            }),
        )
    }

    pub fn constructor(parameters: Vec<Parameter>) -> Self {
        Self::new(
            ".ctor",
            Symbol::Method(MethodSymbol {
                method_kind: MethodKind::Constructor,
                parameters,
                ..MethodSymbol::default()
            }),
        )
    }

    /// Compiler-synthesized public parameterless constructor.
    pub fn implicit_constructor() -> Self {
        let mut ctor = Self::constructor(Vec::new());
        ctor.is_implicit = true;
        ctor
    }

    pub fn operator(op: OperatorKind, return_type: &str, parameters: Vec<Parameter>) -> Self {
        Self::new(
            op.metadata_name(),
            Symbol::Method(MethodSymbol {
                method_kind: MethodKind::Operator(op),
                return_type: Some(return_type.to_string()),
                parameters,
                ..MethodSymbol::default()
            }),
        )
        .with_modifiers(Modifiers::new().with_static())
    }

    pub fn conversion(kind: ConversionKind, target: &str, source: Parameter) -> Self {
        Self::new(
            kind.metadata_name(),
            Symbol::Method(MethodSymbol {
                method_kind: MethodKind::Conversion(kind),
                return_type: Some(target.to_string()),
                parameters: vec![source],
                ..MethodSymbol::default()
            }),
        )
        .with_modifiers(Modifiers::new().with_static())
    }

    pub fn property(name: impl Into<String>, ty: &str, accessors: Vec<Accessor>) -> Self {
        Self::new(
            name,
            Symbol::Property(PropertySymbol {
                ty: ty.to_string(),
                parameters: Vec::new(),
                accessors,
            }),
        )
    }

    pub fn field(name: impl Into<String>, ty: &str) -> Self {
        Self::new(
            name,
            Symbol::Field(FieldSymbol {
                ty: ty.to_string(),
                constant_value: None,
            }),
        )
    }

    pub fn event(name: impl Into<String>, ty: &str) -> Self {
        Self::new(name, Symbol::Event(EventSymbol { ty: ty.to_string() }))
    }

    pub fn enum_member(name: impl Into<String>, value: i64) -> Self {
        Self::new(name, Symbol::EnumMember(EnumMemberSymbol { value }))
    }

    pub fn with_children(mut self, children: Vec<Declaration>) -> Self {
        self.children = children;
        self
    }

    pub fn with_child(mut self, child: Declaration) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_attribute(mut self, attribute: AttributeUsage) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn with_accessibility(mut self, accessibility: Accessibility) -> Self {
        self.accessibility = accessibility;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Short kind label used in errors and summaries.
    pub fn kind_name(&self) -> &'static str {
        match &self.symbol {
            Symbol::Namespace => "namespace",
            Symbol::Type(t) => t.type_kind.keyword(),
            Symbol::Method(m) => match m.method_kind {
                MethodKind::Ordinary => "method",
                MethodKind::Constructor | MethodKind::StaticConstructor => "constructor",
                MethodKind::Destructor => "destructor",
                MethodKind::Operator(_) => "operator",
                MethodKind::Conversion(_) => "conversion operator",
            },
            Symbol::Property(p) if !p.parameters.is_empty() => "indexer",
            Symbol::Property(_) => "property",
            Symbol::Field(_) => "field",
            Symbol::Event(_) => "event",
            Symbol::EnumMember(_) => "enum member",
        }
    }

    /// Namespaces and every type except delegates render as a block with children.
    pub fn is_composite(&self) -> bool {
        match &self.symbol {
            Symbol::Namespace => true,
            Symbol::Type(t) => t.type_kind != TypeKind::Delegate,
            _ => false,
        }
    }

    pub fn type_kind(&self) -> Option<TypeKind> {
        match &self.symbol {
            Symbol::Type(t) => Some(t.type_kind),
            _ => None,
        }
    }

    /// Whether two declarations with the same identity are the same kind of thing.
    pub fn same_kind(&self, other: &Declaration) -> bool {
        match (&self.symbol, &other.symbol) {
            (Symbol::Type(a), Symbol::Type(b)) => a.type_kind == b.type_kind,
            (Symbol::Method(a), Symbol::Method(b)) => {
                std::mem::discriminant(&a.method_kind) == std::mem::discriminant(&b.method_kind)
            }
            (a, b) => std::mem::discriminant(a) == std::mem::discriminant(b),
        }
    }

    /// A public, parameterless, compiler-synthesized instance constructor.
    pub fn is_implicit_default_constructor(&self) -> bool {
        match &self.symbol {
            Symbol::Method(m) => {
                self.is_implicit
                    && m.method_kind == MethodKind::Constructor
                    && m.parameters.is_empty()
                    && self.accessibility == Accessibility::Public
            }
            _ => false,
        }
    }
}

/// The declaration tree of one compared module.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    /// Module name, e.g. `MyAssembly.dll`.
    pub name: String,
    #[serde(default)]
    pub namespaces: Vec<Declaration>,
}

impl Module {
    pub fn new(name: impl Into<String>, namespaces: Vec<Declaration>) -> Self {
        Self {
            name: name.into(),
            namespaces,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessibility_as_str() {
        assert_eq!(Accessibility::Public.as_str(), "public");
        assert_eq!(Accessibility::ProtectedInternal.as_str(), "protected internal");
        assert_eq!(Accessibility::PrivateProtected.as_str(), "private protected");
    }

    #[test]
    fn test_is_composite() {
        assert!(Declaration::namespace("N").is_composite());
        assert!(Declaration::class("C").is_composite());
        assert!(Declaration::enumeration("E").is_composite());
        assert!(!Declaration::delegate("D", None, vec![]).is_composite());
        assert!(!Declaration::field("F", "System.Int32").is_composite());
    }

    #[test]
    fn test_same_kind() {
        assert!(Declaration::class("S").same_kind(&Declaration::class("S")));
        assert!(!Declaration::structure("S").same_kind(&Declaration::class("S")));
        assert!(!Declaration::constructor(vec![])
            .same_kind(&Declaration::method("M", None, vec![])));
    }

    #[test]
    fn test_implicit_default_constructor() {
        assert!(Declaration::implicit_constructor().is_implicit_default_constructor());
        assert!(!Declaration::constructor(vec![]).is_implicit_default_constructor());

        let protected_ctor =
            Declaration::implicit_constructor().with_accessibility(Accessibility::Protected);
        assert!(!protected_ctor.is_implicit_default_constructor());
    }

    #[test]
    fn test_deserialize_declaration_json() {
        let json = r#"{
            "name": "MyClass",
            "symbol": { "kind": "type", "type_kind": "class", "base_types": ["System.Attribute"] },
            "attributes": [{ "type_id": "T:System.ObsoleteAttribute", "text": "System.Obsolete" }],
            "children": [
                { "name": "Count", "symbol": { "kind": "property", "type": "System.Int32", "accessors": [{ "kind": "get" }] } },
                { "name": "op_Explicit", "modifiers": { "is_static": true },
                  "symbol": { "kind": "method", "method_kind": { "conversion": "explicit" },
                              "return_type": "System.Int32",
                              "parameters": [{ "name": "value", "type": "MyNamespace.MyClass" }] } },
                { "name": "A", "symbol": { "kind": "enum_member", "value": -1 } }
            ]
        }"#;

        let decl: Declaration = serde_json::from_str(json).unwrap();
        assert_eq!(decl.type_kind(), Some(TypeKind::Class));
        assert_eq!(decl.accessibility, Accessibility::Public);
        assert_eq!(decl.attributes.len(), 1);
        assert_eq!(decl.children.len(), 3);
        assert_eq!(decl.children[0].kind_name(), "property");
        assert_eq!(decl.children[1].kind_name(), "conversion operator");
        assert!(decl.children[1].modifiers.is_static);
        assert_eq!(
            decl.children[2].symbol,
            Symbol::EnumMember(EnumMemberSymbol { value: -1 })
        );
    }

    #[test]
    fn test_module_round_trips_through_json() {
        let module = Module::new(
            "MyAssembly.dll",
            vec![Declaration::namespace("MyNamespace")
                .with_child(Declaration::class("MyClass").with_child(Declaration::implicit_constructor()))],
        );
        let json = serde_json::to_string(&module).unwrap();
        let back: Module = serde_json::from_str(&json).unwrap();
        assert_eq!(module, back);
    }
}
