//! Factory reflection over a pluggable type system.
//!
//! This crate presents classes and methods through one contract,
//! [`FactoryReflector`], so that calling code can treat "construct class X"
//! and "call method M on class X" the same way. A class answers as its own
//! static constructor-factory; a method remembers the class it was requested
//! against, which may differ from the class that declares it.
//!
//! # Example
//!
//! ```ignore
//! use reflectory_core::{Codebase, FactoryReflector, Introspector};
//!
//! let introspector = Introspector::new(Codebase::from_json_file("codebase.json")?);
//!
//! let derived = introspector.class("App\\Derived")?;
//! for factory in derived.factories() {
//!     println!("{} -> {:?}", factory.debug_name(), factory.return_class_name());
//! }
//!
//! // `make()` is declared on `App\Base` and returns `static`.
//! let make = introspector.method("App\\Derived", "make")?;
//! assert!(make.is_inherited());
//! assert_eq!(make.return_class_name().as_deref(), Some("App\\Derived"));
//! ```

#![recursion_limit = "256"]

use std::fmt;
use std::sync::Arc;

pub mod attributes;
pub mod class;
pub mod codebase;
pub mod factory;
pub mod method;
pub mod names;
pub mod native;
pub mod parameter;
pub mod type_resolver;

#[cfg(test)]
pub(crate) mod testing;

pub use attributes::{Attribute, AttributesHaving};
pub use class::{ClassReflection, MethodFilter, PropertyFilter};
pub use codebase::Codebase;
pub use factory::{Factory, FactoryReflection, FactoryReflector, Reflector};
pub use method::{MethodReflection, StaticCallable};
pub use names::NameHaving;
pub use native::{
    AttributeFlags, LoadError, Modifiers, NativeClass, NativeFunction, NativeMethod,
    NativeParameter, NativeProperty, ParameterOwner, TypeSystem,
};
pub use parameter::ParameterReflection;
pub use reflectory_types::{ClassKind, TypeRef, Visibility};

/// Errors that can occur when reflecting on a type system.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The class does not exist, or one of its ancestors cannot be loaded.
    ///
    /// Both cases are reported the same way; callers should not inspect the
    /// source to tell them apart.
    #[error("Class {name} is not available: {source}")]
    ClassNotAvailable {
        name: String,
        #[source]
        source: LoadError,
    },

    #[error("Method {class}::{method}() does not exist")]
    MethodNotFound { class: String, method: String },

    #[error("Function {name}() is not available: {source}")]
    FunctionNotAvailable {
        name: String,
        #[source]
        source: LoadError,
    },

    #[error("Parameter ${name} of {owner} does not exist")]
    ParameterNotFound { owner: String, name: String },

    #[error("Failed to instantiate attribute {name} on {target}: {source}")]
    AttributeInstance {
        name: String,
        target: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read codebase: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse codebase: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Duplicate declaration of {0}")]
    DuplicateDeclaration(String),
}

impl Error {
    /// Checks whether this is a lookup error: a requested class, method,
    /// function or parameter is not available.
    pub fn is_lookup(&self) -> bool {
        matches!(
            self,
            Error::ClassNotAvailable { .. }
                | Error::MethodNotFound { .. }
                | Error::FunctionNotAvailable { .. }
                | Error::ParameterNotFound { .. }
        )
    }
}

/// Result type for reflection operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Aborts on a lookup that must succeed for inputs the type system already
/// vouched for.
#[track_caller]
pub(crate) fn consistency_violation(context: &str, error: &dyn fmt::Display) -> ! {
    panic!("Inconsistent type system while processing {context}: {error}")
}

/// A runtime value that knows its class.
///
/// Descriptors can be created from such a value instead of a class name.
pub trait Object {
    fn class_name(&self) -> &str;
}

// ============================================================================
// Entry Point
// ============================================================================

/// Handle to a type system, the entry point for creating descriptors.
///
/// Cloning is cheap. Every descriptor keeps a clone so it can navigate to
/// related classes later.
#[derive(Clone)]
pub struct Introspector {
    system: Arc<dyn TypeSystem>,
}

impl Introspector {
    pub fn new(system: impl TypeSystem + 'static) -> Self {
        Self {
            system: Arc::new(system),
        }
    }

    pub fn from_arc(system: Arc<dyn TypeSystem>) -> Self {
        Self { system }
    }

    /// Get the underlying type system.
    pub fn system(&self) -> &dyn TypeSystem {
        self.system.as_ref()
    }

    /// Reflect on a class, interface or trait.
    pub fn class(&self, name: &str) -> Result<ClassReflection> {
        ClassReflection::new(self, name)
    }

    /// Reflect on a class, or get `None` if it is not available.
    pub fn class_if_exists(&self, name: &str) -> Option<ClassReflection> {
        ClassReflection::create_if_exists(self, name)
    }

    /// Reflect on a class that is known to exist.
    ///
    /// # Panics
    ///
    /// Panics if the class cannot be loaded after all.
    pub fn known_class(&self, name: &str) -> ClassReflection {
        ClassReflection::create_known(self, name)
    }

    /// Reflect on the class of a runtime value.
    pub fn class_for_object(&self, object: &dyn Object) -> Result<ClassReflection> {
        ClassReflection::for_object(self, object)
    }

    /// Reflect on a method as seen from `class`.
    pub fn method(&self, class: &str, method: &str) -> Result<MethodReflection> {
        MethodReflection::new(self, class, method)
    }

    /// Reflect on a method as seen from the class of a runtime value.
    pub fn method_for_object(&self, object: &dyn Object, method: &str) -> Result<MethodReflection> {
        MethodReflection::for_object(self, object, method)
    }

    /// Get the parameters of a free function.
    pub fn function_parameters(&self, function: &str) -> Result<Vec<ParameterReflection>> {
        let native = self
            .system
            .load_function(function)
            .map_err(|source| Error::FunctionNotAvailable {
                name: function.to_string(),
                source,
            })?;
        Ok(native
            .parameters
            .into_iter()
            .map(|parameter| ParameterReflection::from_native(parameter, self.clone()))
            .collect())
    }

    /// Convert any reflector into a factory descriptor, if possible.
    pub fn factory_for(&self, reflector: Reflector) -> Option<Factory> {
        FactoryReflection::from_reflector(self, reflector)
    }
}

impl fmt::Debug for Introspector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Introspector")
            .field("system", &self.system)
            .finish()
    }
}
