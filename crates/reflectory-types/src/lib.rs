//! Declaration snapshot types for Reflectory.
//!
//! This crate defines the serializable declarations that a type system is
//! built from: classes, interfaces and traits with their methods, properties,
//! parameters and attached attributes. A [`CodebaseSnapshot`] is what a host
//! runtime or an extractor hands over; the reflection layer only reads it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Type names that never refer to a class.
pub const BUILTIN_TYPES: &[&str] = &[
    "int", "float", "string", "bool", "array", "callable", "iterable", "object", "mixed", "void",
    "null", "never", "false", "true",
];

/// Checks whether a type name is a builtin (non-class) type.
pub fn is_builtin_type(name: &str) -> bool {
    BUILTIN_TYPES
        .iter()
        .any(|builtin| builtin.eq_ignore_ascii_case(name))
}

// ============================================================================
// Codebase Snapshot
// ============================================================================

/// All declarations known to a type system.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CodebaseSnapshot {
    /// Classes, interfaces and traits
    #[serde(default)]
    pub classes: Vec<ClassDecl>,
    /// Free functions
    #[serde(default)]
    pub functions: Vec<FunctionDecl>,
}

// ============================================================================
// Class-like Declarations
// ============================================================================

/// The structural kind of a class-like declaration.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ClassKind {
    #[default]
    Class,
    Interface,
    Trait,
}

impl fmt::Display for ClassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassKind::Class => f.write_str("class"),
            ClassKind::Interface => f.write_str("interface"),
            ClassKind::Trait => f.write_str("trait"),
        }
    }
}

/// A class, interface or trait declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassDecl {
    /// Fully qualified name
    pub name: String,
    #[serde(default)]
    pub kind: ClassKind,
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default)]
    pub is_final: bool,
    /// Parent class (classes only)
    #[serde(default)]
    pub parent: Option<String>,
    /// Directly implemented interfaces, or extended interfaces for an interface
    #[serde(default)]
    pub interfaces: Vec<String>,
    /// Traits whose members are copied into this declaration
    #[serde(default)]
    pub traits: Vec<String>,
    /// Methods declared in the body
    #[serde(default)]
    pub methods: Vec<MethodDecl>,
    /// Properties declared in the body
    #[serde(default)]
    pub properties: Vec<PropertyDecl>,
    #[serde(default)]
    pub attributes: Vec<AttributeRecord>,
}

/// Member visibility.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

/// A method declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodDecl {
    pub name: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default)]
    pub is_final: bool,
    /// Declared return type, if any
    #[serde(default)]
    pub return_type: Option<TypeRef>,
    #[serde(default)]
    pub parameters: Vec<ParamDecl>,
    #[serde(default)]
    pub attributes: Vec<AttributeRecord>,
}

/// A free function declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub name: String,
    #[serde(default)]
    pub return_type: Option<TypeRef>,
    #[serde(default)]
    pub parameters: Vec<ParamDecl>,
    #[serde(default)]
    pub attributes: Vec<AttributeRecord>,
}

/// A parameter of a method or function.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamDecl {
    /// Name without the `$` sigil
    pub name: String,
    /// Declared type, if any
    #[serde(default)]
    pub ty: Option<TypeRef>,
    /// Whether the parameter has a default value
    #[serde(default)]
    pub is_optional: bool,
    #[serde(default)]
    pub is_variadic: bool,
    #[serde(default)]
    pub attributes: Vec<AttributeRecord>,
}

/// A property declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyDecl {
    pub name: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_readonly: bool,
    #[serde(default)]
    pub ty: Option<TypeRef>,
    #[serde(default)]
    pub attributes: Vec<AttributeRecord>,
}

// ============================================================================
// Attributes
// ============================================================================

/// A metadata record attached to a declaration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttributeRecord {
    /// Name of the attribute class
    pub name: String,
    /// Constructor arguments, instantiated by deserialization
    #[serde(default)]
    pub arguments: serde_json::Value,
}

// ============================================================================
// Type References
// ============================================================================

/// A declared type of a parameter, property or return value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeRef {
    /// A single named type, possibly a self-reference like `self` or `static`
    Named {
        name: String,
        #[serde(default)]
        nullable: bool,
    },
    /// `A|B`
    Union { types: Vec<TypeRef> },
    /// `A&B`
    Intersection { types: Vec<TypeRef> },
}

impl TypeRef {
    /// Creates a non-nullable named type.
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named {
            name: name.into(),
            nullable: false,
        }
    }

    /// Gets the name if this is a single named type.
    ///
    /// A union of exactly one named type and `null` counts as the nullable
    /// form of that named type.
    pub fn single_name(&self) -> Option<&str> {
        match self {
            TypeRef::Named { name, .. } => Some(name),
            TypeRef::Union { types } => {
                let mut names = types.iter().filter_map(|t| match t {
                    TypeRef::Named { name, .. } => Some(name.as_str()),
                    _ => None,
                });
                let (Some(first), Some(second), None) = (names.next(), names.next(), names.next())
                else {
                    return None;
                };
                if types.len() != 2 {
                    return None;
                }
                match (
                    first.eq_ignore_ascii_case("null"),
                    second.eq_ignore_ascii_case("null"),
                ) {
                    (true, false) => Some(second),
                    (false, true) => Some(first),
                    _ => None,
                }
            }
            TypeRef::Intersection { .. } => None,
        }
    }

    /// Gets the name if this is a single named type that is not builtin.
    ///
    /// Self-references are returned as written.
    pub fn single_class_name(&self) -> Option<&str> {
        self.single_name().filter(|name| !is_builtin_type(name))
    }

    /// Checks whether `null` is an accepted value.
    pub fn allows_null(&self) -> bool {
        match self {
            TypeRef::Named { name, nullable } => {
                *nullable || name.eq_ignore_ascii_case("null") || name.eq_ignore_ascii_case("mixed")
            }
            TypeRef::Union { types } => types.iter().any(TypeRef::allows_null),
            TypeRef::Intersection { .. } => false,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named { name, nullable } => {
                if *nullable {
                    f.write_str("?")?;
                }
                f.write_str(name)
            }
            TypeRef::Union { types } => write_joined(f, types, "|"),
            TypeRef::Intersection { types } => write_joined(f, types, "&"),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, types: &[TypeRef], separator: &str) -> fmt::Result {
    for (i, ty) in types.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        match ty {
            TypeRef::Named { .. } => write!(f, "{ty}")?,
            _ => write!(f, "({ty})")?,
        }
    }
    Ok(())
}
