//! The native type-system contract.
//!
//! Everything in this module is what the host runtime provides on its own:
//! loading a type with all of its ancestors, listing and looking up members,
//! declared types, and attribute records. The descriptors in this crate only
//! consume these primitives.

use std::fmt;

use bitflags::bitflags;
use reflectory_types::{AttributeRecord, ClassKind, TypeRef, Visibility};

bitflags! {
    /// Member modifiers, also used as the native "any of" member filter.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u32 {
        const STATIC = 1 << 0;
        const PUBLIC = 1 << 1;
        const PROTECTED = 1 << 2;
        const PRIVATE = 1 << 3;
        const ABSTRACT = 1 << 4;
        const FINAL = 1 << 5;
        const READONLY = 1 << 6;
    }
}

impl Modifiers {
    pub fn from_visibility(visibility: Visibility) -> Self {
        match visibility {
            Visibility::Public => Modifiers::PUBLIC,
            Visibility::Protected => Modifiers::PROTECTED,
            Visibility::Private => Modifiers::PRIVATE,
        }
    }

    /// Checks a member against a native filter: `None` keeps everything,
    /// otherwise the member needs at least one of the filter's modifiers.
    pub fn matches_filter(self, filter: Option<Modifiers>) -> bool {
        filter.is_none_or(|filter| self.intersects(filter))
    }
}

/// How attribute names are matched against a filter name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AttributeFlags {
    /// Only attributes of exactly the given class.
    #[default]
    Exact,
    /// Attributes whose class is the given class or one of its subtypes.
    InstanceOf,
}

/// Why a type could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error("{name} does not exist")]
    NotFound { name: String },

    #[error("{name} depends on {missing}, which does not exist")]
    MissingDependency { name: String, missing: String },

    #[error("{name} cannot depend on {dependency}, which is not {expected}")]
    InvalidDependency {
        name: String,
        dependency: String,
        expected: ClassKind,
    },

    #[error("{name} depends on itself")]
    CircularDependency { name: String },
}

// ============================================================================
// Native Handles
// ============================================================================

/// The function or method a parameter belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParameterOwner {
    /// A method, identified by its declaring class
    Method { class: String, method: String },
    /// A free function
    Function { name: String },
}

impl ParameterOwner {
    /// Get the declaring class, if the owner is a method.
    pub fn class_name(&self) -> Option<&str> {
        match self {
            ParameterOwner::Method { class, .. } => Some(class),
            ParameterOwner::Function { .. } => None,
        }
    }

    /// Get the method or function name.
    pub fn function_name(&self) -> &str {
        match self {
            ParameterOwner::Method { method, .. } => method,
            ParameterOwner::Function { name } => name,
        }
    }
}

impl fmt::Display for ParameterOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterOwner::Method { class, method } => write!(f, "{class}::{method}()"),
            ParameterOwner::Function { name } => f.write_str(name),
        }
    }
}

/// A parameter as reported by the type system.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeParameter {
    pub owner: ParameterOwner,
    pub name: String,
    /// Zero-based position in the signature
    pub position: usize,
    pub ty: Option<TypeRef>,
    pub is_optional: bool,
    pub is_variadic: bool,
    pub attributes: Vec<AttributeRecord>,
}

/// A method as reported by the type system.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeMethod {
    /// The declaring class
    pub class: String,
    pub name: String,
    pub modifiers: Modifiers,
    pub return_type: Option<TypeRef>,
    pub parameters: Vec<NativeParameter>,
    pub attributes: Vec<AttributeRecord>,
}

impl NativeMethod {
    pub fn is_static(&self) -> bool {
        self.modifiers.contains(Modifiers::STATIC)
    }

    pub fn is_public(&self) -> bool {
        self.modifiers.contains(Modifiers::PUBLIC)
    }

    pub fn is_protected(&self) -> bool {
        self.modifiers.contains(Modifiers::PROTECTED)
    }

    pub fn is_private(&self) -> bool {
        self.modifiers.contains(Modifiers::PRIVATE)
    }

    pub fn is_abstract(&self) -> bool {
        self.modifiers.contains(Modifiers::ABSTRACT)
    }

    pub fn is_final(&self) -> bool {
        self.modifiers.contains(Modifiers::FINAL)
    }

    pub fn is_constructor(&self) -> bool {
        self.name.eq_ignore_ascii_case("__construct")
    }

    pub fn is_destructor(&self) -> bool {
        self.name.eq_ignore_ascii_case("__destruct")
    }

    /// Get a parameter by name.
    pub fn parameter(&self, name: &str) -> Option<&NativeParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

/// A property as reported by the type system.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeProperty {
    /// The declaring class
    pub class: String,
    pub name: String,
    pub modifiers: Modifiers,
    pub ty: Option<TypeRef>,
    pub attributes: Vec<AttributeRecord>,
}

impl NativeProperty {
    pub fn is_static(&self) -> bool {
        self.modifiers.contains(Modifiers::STATIC)
    }

    pub fn is_public(&self) -> bool {
        self.modifiers.contains(Modifiers::PUBLIC)
    }

    pub fn is_protected(&self) -> bool {
        self.modifiers.contains(Modifiers::PROTECTED)
    }

    pub fn is_private(&self) -> bool {
        self.modifiers.contains(Modifiers::PRIVATE)
    }

    pub fn is_readonly(&self) -> bool {
        self.modifiers.contains(Modifiers::READONLY)
    }
}

/// A free function as reported by the type system.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeFunction {
    pub name: String,
    pub return_type: Option<TypeRef>,
    pub parameters: Vec<NativeParameter>,
    pub attributes: Vec<AttributeRecord>,
}

/// A fully loaded class, interface or trait.
///
/// Member tables include inherited members, each reporting its own declaring
/// class.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeClass {
    pub name: String,
    pub kind: ClassKind,
    /// Only `ABSTRACT` and `FINAL` are meaningful here
    pub modifiers: Modifiers,
    pub parent: Option<String>,
    /// All implemented interfaces, including inherited ones
    pub interface_names: Vec<String>,
    pub methods: Vec<NativeMethod>,
    pub properties: Vec<NativeProperty>,
    pub attributes: Vec<AttributeRecord>,
}

impl NativeClass {
    pub fn is_interface(&self) -> bool {
        self.kind == ClassKind::Interface
    }

    pub fn is_trait(&self) -> bool {
        self.kind == ClassKind::Trait
    }

    pub fn is_abstract(&self) -> bool {
        self.modifiers.contains(Modifiers::ABSTRACT)
    }

    pub fn is_final(&self) -> bool {
        self.modifiers.contains(Modifiers::FINAL)
    }

    /// Get a method by name, including inherited methods.
    pub fn method(&self, name: &str) -> Option<&NativeMethod> {
        self.methods
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(name))
    }

    /// Take a method out of the loaded class.
    pub fn into_method(self, name: &str) -> Option<NativeMethod> {
        self.methods
            .into_iter()
            .find(|m| m.name.eq_ignore_ascii_case(name))
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.method(name).is_some()
    }

    pub fn constructor(&self) -> Option<&NativeMethod> {
        self.methods.iter().find(|m| m.is_constructor())
    }

    /// Checks whether `new` can be used on this class.
    pub fn is_instantiable(&self) -> bool {
        self.kind == ClassKind::Class
            && !self.is_abstract()
            && self.constructor().is_none_or(NativeMethod::is_public)
    }

    /// Iterate methods that pass a native modifier filter.
    pub fn methods_matching(&self, filter: Option<Modifiers>) -> impl Iterator<Item = &NativeMethod> {
        self.methods
            .iter()
            .filter(move |m| m.modifiers.matches_filter(filter))
    }

    /// Iterate properties that pass a native modifier filter.
    pub fn properties_matching(
        &self,
        filter: Option<Modifiers>,
    ) -> impl Iterator<Item = &NativeProperty> {
        self.properties
            .iter()
            .filter(move |p| p.modifiers.matches_filter(filter))
    }
}

// ============================================================================
// Type System Contract
// ============================================================================

/// A read-only type system the descriptors query.
///
/// Implementations must answer the same way every time they are asked about
/// the same name.
pub trait TypeSystem: fmt::Debug + Send + Sync {
    /// Load a class-like type together with all of its ancestors.
    fn load_class(&self, name: &str) -> Result<NativeClass, LoadError>;

    /// Load a free function.
    fn load_function(&self, name: &str) -> Result<NativeFunction, LoadError>;

    /// Checks whether `class` is `ancestor`, extends it, or implements it.
    fn is_subtype_of(&self, class: &str, ancestor: &str) -> bool;

    /// Select the attribute records matching a name filter.
    fn filter_attributes(
        &self,
        records: &[AttributeRecord],
        name: Option<&str>,
        flags: AttributeFlags,
    ) -> Vec<AttributeRecord> {
        records
            .iter()
            .filter(|record| match (name, flags) {
                (None, _) => true,
                (Some(name), AttributeFlags::Exact) => record.name == name,
                (Some(name), AttributeFlags::InstanceOf) => {
                    record.name == name || self.is_subtype_of(&record.name, name)
                }
            })
            .cloned()
            .collect()
    }
}
