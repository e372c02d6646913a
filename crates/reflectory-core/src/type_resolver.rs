//! Resolution of declared types to class names.
//!
//! A declared type names a class only if it is a single named, non-builtin
//! type. Two names are self-references and depend on where they are read:
//! `self` means the class that declares the member, `static` means the class
//! the member was requested against.

use reflectory_types::TypeRef;

/// A self-referential type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelfReference {
    /// `self`: the class that declares the member
    DeclaringScope,
    /// `static`: the class the member is called on
    LateBinding,
}

impl SelfReference {
    pub fn parse(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("self") {
            Some(SelfReference::DeclaringScope)
        } else if name.eq_ignore_ascii_case("static") {
            Some(SelfReference::LateBinding)
        } else {
            None
        }
    }
}

/// The two classes a self-reference can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scopes<'a> {
    pub declaring: &'a str,
    pub requested: &'a str,
}

impl<'a> Scopes<'a> {
    /// Scopes where both self-references mean the declaring class.
    pub fn declaring_only(declaring: &'a str) -> Self {
        Self {
            declaring,
            requested: declaring,
        }
    }

    pub fn resolve(&self, reference: SelfReference) -> &'a str {
        match reference {
            SelfReference::DeclaringScope => self.declaring,
            SelfReference::LateBinding => self.requested,
        }
    }
}

/// Resolve a declared type to a class name.
///
/// Returns `None` if the type is absent or not a single class type.
pub fn resolve_class_name(ty: Option<&TypeRef>, scopes: Scopes<'_>) -> Option<String> {
    let name = ty?.single_class_name()?;
    let resolved = match SelfReference::parse(name) {
        Some(reference) => scopes.resolve(reference),
        None => name,
    };
    Some(resolved.to_string())
}
