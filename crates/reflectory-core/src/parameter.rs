//! Parameter descriptors.

use std::sync::Arc;

use log::debug;
use reflectory_types::TypeRef;

use crate::attributes::{Attribute, AttributesHaving};
use crate::class::ClassReflection;
use crate::names::NameHaving;
use crate::native::{AttributeFlags, NativeParameter, ParameterOwner};
use crate::type_resolver::{Scopes, SelfReference, resolve_class_name};
use crate::{Error, Introspector, Result};

/// A reflected parameter of a method, constructor or free function.
///
/// Unlike method return types, `self` and `static` in a parameter type both
/// mean the declaring class, even when the method was requested against a
/// subclass.
#[derive(Debug, Clone)]
pub struct ParameterReflection {
    native: Arc<NativeParameter>,
    introspector: Introspector,
}

impl ParameterReflection {
    pub(crate) fn from_native(native: NativeParameter, introspector: Introspector) -> Self {
        Self {
            native: Arc::new(native),
            introspector,
        }
    }

    /// Look up a parameter of the method `class::method`.
    pub fn for_method(
        introspector: &Introspector,
        class: &str,
        method: &str,
        name: &str,
    ) -> Result<Self> {
        let native = introspector
            .system()
            .load_class(class)
            .map_err(|source| Error::ClassNotAvailable {
                name: class.to_string(),
                source,
            })?
            .into_method(method)
            .ok_or_else(|| Error::MethodNotFound {
                class: class.to_string(),
                method: method.to_string(),
            })?;

        let owner = format!("{}::{}()", class, native.name);
        let parameter = native
            .parameters
            .into_iter()
            .find(|p| p.name == name)
            .ok_or_else(|| Error::ParameterNotFound {
                owner,
                name: name.to_string(),
            })?;

        Ok(Self::from_native(parameter, introspector.clone()))
    }

    /// Look up a parameter of a free function.
    pub fn for_function(introspector: &Introspector, function: &str, name: &str) -> Result<Self> {
        let native = introspector
            .system()
            .load_function(function)
            .map_err(|source| Error::FunctionNotAvailable {
                name: function.to_string(),
                source,
            })?;

        let parameter = native
            .parameters
            .into_iter()
            .find(|p| p.name == name)
            .ok_or_else(|| Error::ParameterNotFound {
                owner: function.to_string(),
                name: name.to_string(),
            })?;

        Ok(Self::from_native(parameter, introspector.clone()))
    }

    pub fn name(&self) -> &str {
        &self.native.name
    }

    /// Get the zero-based position in the signature.
    pub fn position(&self) -> usize {
        self.native.position
    }

    pub fn type_ref(&self) -> Option<&TypeRef> {
        self.native.ty.as_ref()
    }

    pub fn is_optional(&self) -> bool {
        self.native.is_optional
    }

    pub fn is_variadic(&self) -> bool {
        self.native.is_variadic
    }

    /// Checks whether `null` can be passed. Untyped parameters accept it.
    pub fn allows_null(&self) -> bool {
        self.native.ty.as_ref().is_none_or(TypeRef::allows_null)
    }

    pub fn owner(&self) -> &ParameterOwner {
        &self.native.owner
    }

    /// Get the class declaring the owning method, or `None` for a function.
    pub fn declaring_class_name(&self) -> Option<&str> {
        self.native.owner.class_name()
    }

    /// Get the name of the owning method or function.
    pub fn declaring_function_name(&self) -> &str {
        self.native.owner.function_name()
    }

    pub fn native(&self) -> &NativeParameter {
        &self.native
    }

    /// Get the class name the parameter type refers to, if it is a single
    /// class type.
    ///
    /// # Panics
    ///
    /// Panics if a free function parameter is typed `self` or `static`.
    pub fn param_class_name(&self) -> Option<String> {
        let ty = self.native.ty.as_ref();
        match self.native.owner.class_name() {
            Some(class) => resolve_class_name(ty, Scopes::declaring_only(class)),
            None => {
                let name = ty?.single_class_name()?;
                if SelfReference::parse(name).is_some() {
                    crate::consistency_violation(
                        &self.debug_name(),
                        &format!("unexpected {name} parameter type outside a class"),
                    );
                }
                Some(name.to_string())
            }
        }
    }

    /// Get the class the parameter type refers to.
    pub fn param_class(&self) -> Result<Option<ClassReflection>> {
        self.param_class_name()
            .map(|name| ClassReflection::new(&self.introspector, &name))
            .transpose()
    }

    /// Get the class the parameter type refers to, if it is available.
    pub fn param_class_if_exists(&self) -> Option<ClassReflection> {
        self.param_class().unwrap_or_else(|err| {
            debug!("ignoring type of {}: {}", self.debug_name(), err);
            None
        })
    }
}

impl AttributesHaving for ParameterReflection {
    fn attributes(&self, name: Option<&str>, flags: AttributeFlags) -> Vec<Attribute> {
        self.introspector
            .system()
            .filter_attributes(&self.native.attributes, name, flags)
            .into_iter()
            .map(|record| Attribute::new(record, self.debug_name()))
            .collect()
    }
}

impl NameHaving for ParameterReflection {
    fn debug_name(&self) -> String {
        format!("parameter ${} of {}", self.native.name, self.native.owner)
    }

    fn full_name(&self) -> String {
        format!("{}${}", self.native.owner, self.native.name)
    }
}
