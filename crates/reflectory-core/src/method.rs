//! Method descriptors.
//!
//! A [`MethodReflection`] remembers two classes: the one the method was
//! requested against and the one that declares it. The requested class is
//! what `static` return types resolve to and what names are built from.

use std::fmt;
use std::sync::Arc;

use log::debug;
use reflectory_types::TypeRef;

use crate::attributes::{Attribute, AttributesHaving};
use crate::class::ClassReflection;
use crate::factory::FactoryReflector;
use crate::names::NameHaving;
use crate::native::{AttributeFlags, Modifiers, NativeMethod};
use crate::parameter::ParameterReflection;
use crate::type_resolver::{Scopes, resolve_class_name};
use crate::{Error, Introspector, Object, Result};

/// A reflected method, bound to the class it was requested against.
#[derive(Debug, Clone)]
pub struct MethodReflection {
    original_class: String,
    native: Arc<NativeMethod>,
    introspector: Introspector,
}

impl MethodReflection {
    /// Look up a method as seen from `class`.
    ///
    /// Fails if the class is not available or has no such method. Method
    /// names are matched case-insensitively.
    pub fn new(introspector: &Introspector, class: &str, method: &str) -> Result<Self> {
        let native = introspector
            .system()
            .load_class(class)
            .map_err(|source| {
                debug!("class {} is not available: {}", class, source);
                Error::ClassNotAvailable {
                    name: class.to_string(),
                    source,
                }
            })?
            .into_method(method)
            .ok_or_else(|| Error::MethodNotFound {
                class: class.to_string(),
                method: method.to_string(),
            })?;

        Ok(Self {
            original_class: class.to_string(),
            native: Arc::new(native),
            introspector: introspector.clone(),
        })
    }

    /// Look up a method on the class of a runtime value.
    pub fn for_object(introspector: &Introspector, object: &dyn Object, method: &str) -> Result<Self> {
        Self::new(introspector, object.class_name(), method)
    }

    /// Get the method name as declared.
    pub fn name(&self) -> &str {
        &self.native.name
    }

    /// Get the class the method was requested against.
    pub fn original_class_name(&self) -> &str {
        &self.original_class
    }

    /// Get the class that declares the method.
    pub fn declaring_class_name(&self) -> &str {
        &self.native.class
    }

    /// # Panics
    ///
    /// Panics if the declaring class cannot be loaded anymore.
    pub fn declaring_class(&self) -> ClassReflection {
        ClassReflection::create_known(&self.introspector, &self.native.class)
    }

    pub fn modifiers(&self) -> Modifiers {
        self.native.modifiers
    }

    pub fn is_public(&self) -> bool {
        self.native.is_public()
    }

    pub fn is_protected(&self) -> bool {
        self.native.is_protected()
    }

    pub fn is_private(&self) -> bool {
        self.native.is_private()
    }

    pub fn is_final(&self) -> bool {
        self.native.is_final()
    }

    pub fn native(&self) -> &NativeMethod {
        &self.native
    }

    /// Get a `(class, method)` pair for invoking the method statically on
    /// the requested class.
    pub fn static_callable(&self) -> StaticCallable {
        StaticCallable {
            class: self.original_class.clone(),
            method: self.native.name.clone(),
        }
    }

    fn scopes(&self) -> Scopes<'_> {
        Scopes {
            declaring: &self.native.class,
            requested: &self.original_class,
        }
    }
}

/// A static method reference, bound late to `class`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StaticCallable {
    pub class: String,
    pub method: String,
}

impl fmt::Display for StaticCallable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.class, self.method)
    }
}

impl AttributesHaving for MethodReflection {
    fn attributes(&self, name: Option<&str>, flags: AttributeFlags) -> Vec<Attribute> {
        self.introspector
            .system()
            .filter_attributes(&self.native.attributes, name, flags)
            .into_iter()
            .map(|record| Attribute::new(record, self.debug_name()))
            .collect()
    }
}

impl NameHaving for MethodReflection {
    fn debug_name(&self) -> String {
        format!("{}::{}()", self.original_class, self.native.name)
    }

    fn full_name(&self) -> String {
        format!("{}::{}", self.original_class, self.native.name)
    }
}

impl FactoryReflector for MethodReflection {
    fn class_name(&self) -> &str {
        &self.original_class
    }

    fn class(&self) -> ClassReflection {
        ClassReflection::create_known(&self.introspector, &self.original_class)
    }

    fn method_name(&self) -> Option<&str> {
        Some(&self.native.name)
    }

    fn is_class_like(&self) -> bool {
        false
    }

    fn is_class(&self) -> bool {
        false
    }

    fn is_interface(&self) -> bool {
        false
    }

    fn is_trait(&self) -> bool {
        false
    }

    fn is_inherited(&self) -> bool {
        self.original_class != self.native.class
    }

    fn parameters(&self) -> Vec<ParameterReflection> {
        self.native
            .parameters
            .iter()
            .map(|parameter| {
                ParameterReflection::for_method(
                    &self.introspector,
                    &self.native.class,
                    &self.native.name,
                    &parameter.name,
                )
                .unwrap_or_else(|err| {
                    crate::consistency_violation(&format!("parameters of {}", self.debug_name()), &err)
                })
            })
            .collect()
    }

    fn is_abstract(&self) -> bool {
        self.native.is_abstract()
    }

    fn is_static(&self) -> bool {
        self.native.is_static()
    }

    /// Checks whether the method can be called from outside. Constructors
    /// are reached through the class instead.
    fn is_callable(&self) -> bool {
        self.native.is_public() && !self.native.is_abstract() && !self.native.is_constructor()
    }

    fn is_constructor(&self) -> bool {
        self.native.is_constructor()
    }

    fn is_destructor(&self) -> bool {
        self.native.is_destructor()
    }

    fn return_type(&self) -> Option<TypeRef> {
        self.native.return_type.clone()
    }

    /// `static` resolves to the requested class, `self` to the declaring one.
    fn return_class_name(&self) -> Option<String> {
        resolve_class_name(self.native.return_type.as_ref(), self.scopes())
    }

    fn return_class(&self) -> Result<Option<ClassReflection>> {
        self.return_class_name()
            .map(|name| ClassReflection::new(&self.introspector, &name))
            .transpose()
    }

    fn return_class_if_exists(&self) -> Option<ClassReflection> {
        match self.return_class() {
            Ok(class) => class,
            Err(err) => {
                debug!("ignoring return type of {}: {}", self.debug_name(), err);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn test_static_return_binds_late() {
        let introspector = testing::introspector();

        let make = introspector.method("App\\Derived", "make").unwrap();
        assert_eq!(make.class_name(), "App\\Derived");
        assert_eq!(make.declaring_class_name(), "App\\Base");
        assert!(make.is_inherited());
        assert_eq!(make.return_class_name().as_deref(), Some("App\\Derived"));
        assert_eq!(make.return_class().unwrap().unwrap().name(), "App\\Derived");

        let base_make = introspector.method("App\\Base", "make").unwrap();
        assert!(!base_make.is_inherited());
        assert_eq!(base_make.return_class_name().as_deref(), Some("App\\Base"));
    }

    #[test]
    fn test_static_return_binds_to_grandchild() {
        let introspector = testing::introspector();

        let make = introspector.method("App\\Leaf", "make").unwrap();
        assert_eq!(make.declaring_class_name(), "App\\Base");
        assert!(make.is_inherited());
        assert_eq!(make.return_class_name().as_deref(), Some("App\\Leaf"));

        let self_make = introspector.method("App\\Leaf", "selfMake").unwrap();
        assert_eq!(self_make.return_class_name().as_deref(), Some("App\\Base"));

        let leaf = introspector.class("App\\Leaf").unwrap();
        let factories = leaf.factories();
        let make = factories
            .iter()
            .find(|f| f.method_name() == Some("make"))
            .unwrap();
        assert_eq!(make.class_name(), "App\\Leaf");
        assert_eq!(make.return_class_name().as_deref(), Some("App\\Leaf"));
    }

    #[test]
    fn test_self_return_binds_to_declaring_class() {
        let introspector = testing::introspector();
        let self_make = introspector.method("App\\Derived", "selfMake").unwrap();
        assert_eq!(self_make.return_class_name().as_deref(), Some("App\\Base"));
    }

    #[test]
    fn test_return_classes() {
        let introspector = testing::introspector();

        let missing = introspector.method("App\\Base", "missing").unwrap();
        assert_eq!(missing.return_class_name().as_deref(), Some("App\\Nowhere"));
        assert!(missing.return_class().unwrap_err().is_lookup());
        assert!(missing.return_class_if_exists().is_none());

        let both = introspector.method("App\\Base", "both").unwrap();
        assert_eq!(both.return_class_name(), None);
        assert!(both.return_class().unwrap().is_none());

        let internal = introspector.method("App\\Derived", "internal").unwrap();
        assert_eq!(internal.return_class_name().as_deref(), Some("App\\Dependency"));
        assert_eq!(
            internal.return_class_if_exists().unwrap().name(),
            "App\\Dependency"
        );

        let run = introspector.method("App\\Base", "run").unwrap();
        assert_eq!(run.return_class_name(), None);
        assert_eq!(run.return_type(), Some(TypeRef::named("void")));

        let destructor = introspector.method("App\\Base", "__destruct").unwrap();
        assert!(destructor.is_destructor());
        assert_eq!(destructor.return_type(), None);
        assert!(destructor.return_class().unwrap().is_none());

        let broken = introspector.method("App\\Broken\\Factory", "broken").unwrap();
        assert!(broken.return_class().unwrap_err().is_lookup());
        assert!(broken.return_class_if_exists().is_none());
    }

    #[test]
    fn test_names_use_requested_class() {
        let introspector = testing::introspector();
        let create = introspector.method("App\\Derived", "create").unwrap();

        assert_eq!(create.debug_name(), "App\\Derived::create()");
        assert_eq!(create.full_name(), "App\\Derived::create");
        assert_eq!(create.method_name(), Some("create"));
        assert_eq!(create.class().name(), "App\\Derived");
        assert_eq!(create.declaring_class().name(), "App\\Base");
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let introspector = testing::introspector();

        let make = introspector.method("App\\Derived", "MAKE").unwrap();
        assert_eq!(make.name(), "make");
        assert_eq!(make.debug_name(), "App\\Derived::make()");

        let err = introspector.method("App\\derived", "make").unwrap_err();
        assert!(matches!(err, Error::ClassNotAvailable { .. }));
    }

    #[test]
    fn test_static_callable() {
        let introspector = testing::introspector();
        let make = introspector.method("App\\Derived", "make").unwrap();

        let callable = make.static_callable();
        assert_eq!(callable.class, "App\\Derived");
        assert_eq!(callable.to_string(), "App\\Derived::make");
    }

    #[test]
    fn test_modifiers_and_callability() {
        let introspector = testing::introspector();

        let f = introspector.method("App\\Statics", "f").unwrap();
        assert!(f.is_static());
        assert!(f.is_public());
        assert!(f.is_callable());

        let g = introspector.method("App\\Statics", "g").unwrap();
        assert!(g.is_private());
        assert!(!g.is_callable());

        let h = introspector.method("App\\Statics", "h").unwrap();
        assert!(!h.is_static());
        assert!(h.is_callable());

        let internal = introspector.method("App\\Base", "internal").unwrap();
        assert!(internal.is_protected());
        assert!(!internal.is_callable());

        let run = introspector.method("App\\AbstractWorker", "run").unwrap();
        assert!(run.is_abstract());
        assert!(run.is_inherited());
        assert_eq!(run.declaring_class_name(), "App\\ServiceInterface");
        assert!(!run.is_callable());

        let constructor = introspector.method("App\\Derived", "__construct").unwrap();
        assert!(constructor.is_public());
        assert!(!constructor.is_callable());

        let extra = introspector.method("App\\Derived", "extra").unwrap();
        assert!(extra.is_final());
        assert!(extra.modifiers().contains(Modifiers::FINAL));
    }

    #[test]
    fn test_trait_methods_are_declared_by_user() {
        let introspector = testing::introspector();

        let log = introspector.method("App\\Derived", "log").unwrap();
        assert_eq!(log.declaring_class_name(), "App\\Base");
        assert!(log.is_inherited());

        let parameters = log.parameters();
        assert_eq!(parameters.len(), 1);
        assert_eq!(parameters[0].declaring_class_name(), Some("App\\Base"));
    }

    #[test]
    fn test_method_not_found() {
        let introspector = testing::introspector();

        let err = introspector.method("App\\Dependency", "__construct").unwrap_err();
        assert!(matches!(err, Error::MethodNotFound { .. }));
        assert!(err.is_lookup());

        let err = introspector.method("App\\Missing", "make").unwrap_err();
        assert!(matches!(err, Error::ClassNotAvailable { .. }));
    }
}
