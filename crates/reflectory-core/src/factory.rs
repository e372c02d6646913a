//! The factory contract shared by classes and methods.
//!
//! A class is modelled as a factory producing instances of itself; a method
//! as a factory producing whatever its return type names. [`Factory`] holds
//! either one, and [`FactoryReflection::from_reflector`] converts arbitrary
//! reflectors into it.

use reflectory_types::TypeRef;

use crate::attributes::{Attribute, AttributesHaving};
use crate::class::ClassReflection;
use crate::method::MethodReflection;
use crate::names::NameHaving;
use crate::native::{
    AttributeFlags, NativeClass, NativeFunction, NativeMethod, NativeParameter, NativeProperty,
};
use crate::parameter::ParameterReflection;
use crate::{Introspector, Result};

/// A class or method seen as "something that produces an instance".
pub trait FactoryReflector: AttributesHaving + NameHaving {
    /// Get the class this factory was requested for.
    ///
    /// Differs from the declaring class if a method is inherited.
    fn class_name(&self) -> &str;

    /// Get the class this factory was requested for.
    ///
    /// # Panics
    ///
    /// Panics if a class that was loadable before cannot be loaded anymore.
    fn class(&self) -> ClassReflection;

    /// Get the method name, or `None` for a class.
    fn method_name(&self) -> Option<&str>;

    fn is_method(&self) -> bool {
        self.method_name().is_some()
    }

    /// Checks whether this is a class, interface or trait.
    fn is_class_like(&self) -> bool;

    /// Checks whether this is a class (not an interface, trait or method).
    fn is_class(&self) -> bool;

    fn is_interface(&self) -> bool;

    fn is_trait(&self) -> bool;

    /// Checks whether a method is declared in an ancestor. Always false for
    /// classes.
    fn is_inherited(&self) -> bool;

    /// Get the parameters of the method, or of the class constructor.
    fn parameters(&self) -> Vec<ParameterReflection>;

    fn has_required_parameters(&self) -> bool {
        self.parameters().iter().any(|p| !p.is_optional())
    }

    fn is_abstract(&self) -> bool;

    /// Checks whether no receiver is needed. Always true for classes.
    fn is_static(&self) -> bool;

    /// Checks whether the class is instantiable, or the method is callable.
    fn is_callable(&self) -> bool;

    fn is_constructor(&self) -> bool;

    fn is_destructor(&self) -> bool;

    /// Get the declared return type. For a class, the class itself.
    fn return_type(&self) -> Option<TypeRef>;

    /// Get the returned class name, if it is unique.
    fn return_class_name(&self) -> Option<String>;

    /// Get the returned class, if it is unique.
    ///
    /// Fails with a lookup error if the named class is not available.
    fn return_class(&self) -> Result<Option<ClassReflection>>;

    /// Get the returned class, if it is unique and available.
    fn return_class_if_exists(&self) -> Option<ClassReflection>;
}

// ============================================================================
// Factory Enum
// ============================================================================

/// Either kind of factory descriptor.
#[derive(Debug, Clone)]
pub enum Factory {
    Class(ClassReflection),
    Method(MethodReflection),
}

impl Factory {
    pub fn as_class(&self) -> Option<&ClassReflection> {
        match self {
            Factory::Class(class) => Some(class),
            Factory::Method(_) => None,
        }
    }

    pub fn as_method(&self) -> Option<&MethodReflection> {
        match self {
            Factory::Class(_) => None,
            Factory::Method(method) => Some(method),
        }
    }
}

impl From<ClassReflection> for Factory {
    fn from(class: ClassReflection) -> Self {
        Factory::Class(class)
    }
}

impl From<MethodReflection> for Factory {
    fn from(method: MethodReflection) -> Self {
        Factory::Method(method)
    }
}

macro_rules! dispatch {
    ($self:ident, $inner:ident => $body:expr) => {
        match $self {
            Factory::Class($inner) => $body,
            Factory::Method($inner) => $body,
        }
    };
}

impl AttributesHaving for Factory {
    fn attributes(&self, name: Option<&str>, flags: AttributeFlags) -> Vec<Attribute> {
        dispatch!(self, f => f.attributes(name, flags))
    }
}

impl NameHaving for Factory {
    fn debug_name(&self) -> String {
        dispatch!(self, f => f.debug_name())
    }

    fn full_name(&self) -> String {
        dispatch!(self, f => f.full_name())
    }
}

impl FactoryReflector for Factory {
    fn class_name(&self) -> &str {
        dispatch!(self, f => f.class_name())
    }

    fn class(&self) -> ClassReflection {
        dispatch!(self, f => f.class())
    }

    fn method_name(&self) -> Option<&str> {
        dispatch!(self, f => f.method_name())
    }

    fn is_class_like(&self) -> bool {
        dispatch!(self, f => f.is_class_like())
    }

    fn is_class(&self) -> bool {
        dispatch!(self, f => f.is_class())
    }

    fn is_interface(&self) -> bool {
        dispatch!(self, f => f.is_interface())
    }

    fn is_trait(&self) -> bool {
        dispatch!(self, f => f.is_trait())
    }

    fn is_inherited(&self) -> bool {
        dispatch!(self, f => f.is_inherited())
    }

    fn parameters(&self) -> Vec<ParameterReflection> {
        dispatch!(self, f => f.parameters())
    }

    fn is_abstract(&self) -> bool {
        dispatch!(self, f => f.is_abstract())
    }

    fn is_static(&self) -> bool {
        dispatch!(self, f => f.is_static())
    }

    fn is_callable(&self) -> bool {
        dispatch!(self, f => f.is_callable())
    }

    fn is_constructor(&self) -> bool {
        dispatch!(self, f => f.is_constructor())
    }

    fn is_destructor(&self) -> bool {
        dispatch!(self, f => f.is_destructor())
    }

    fn return_type(&self) -> Option<TypeRef> {
        dispatch!(self, f => f.return_type())
    }

    fn return_class_name(&self) -> Option<String> {
        dispatch!(self, f => f.return_class_name())
    }

    fn return_class(&self) -> Result<Option<ClassReflection>> {
        dispatch!(self, f => f.return_class())
    }

    fn return_class_if_exists(&self) -> Option<ClassReflection> {
        dispatch!(self, f => f.return_class_if_exists())
    }
}

// ============================================================================
// Conversion Facade
// ============================================================================

/// Any reflector, native or already wrapped.
#[derive(Debug, Clone)]
pub enum Reflector {
    Factory(Factory),
    Class(NativeClass),
    Method(NativeMethod),
    Function(NativeFunction),
    Parameter(NativeParameter),
    Property(NativeProperty),
}

impl From<Factory> for Reflector {
    fn from(factory: Factory) -> Self {
        Reflector::Factory(factory)
    }
}

impl From<ClassReflection> for Reflector {
    fn from(class: ClassReflection) -> Self {
        Reflector::Factory(Factory::Class(class))
    }
}

impl From<MethodReflection> for Reflector {
    fn from(method: MethodReflection) -> Self {
        Reflector::Factory(Factory::Method(method))
    }
}

impl From<ParameterReflection> for Reflector {
    fn from(parameter: ParameterReflection) -> Self {
        Reflector::Parameter(parameter.native().clone())
    }
}

impl From<NativeClass> for Reflector {
    fn from(class: NativeClass) -> Self {
        Reflector::Class(class)
    }
}

impl From<NativeMethod> for Reflector {
    fn from(method: NativeMethod) -> Self {
        Reflector::Method(method)
    }
}

/// Static conversions into factory descriptors.
pub struct FactoryReflection;

impl FactoryReflection {
    /// Convert a reflector into a factory descriptor.
    ///
    /// Returns `None` for reflectors that are neither classes nor methods.
    ///
    /// # Panics
    ///
    /// Panics if a native class or method cannot be reloaded by name, since
    /// the handle itself proves it exists.
    pub fn from_reflector(introspector: &Introspector, reflector: Reflector) -> Option<Factory> {
        match reflector {
            Reflector::Factory(factory) => Some(factory),
            Reflector::Class(class) => Some(Factory::Class(ClassReflection::create_known(
                introspector,
                &class.name,
            ))),
            Reflector::Method(method) => {
                match MethodReflection::new(introspector, &method.class, &method.name) {
                    Ok(reflection) => Some(Factory::Method(reflection)),
                    Err(err) => crate::consistency_violation(
                        &format!("{}::{}()", method.class, method.name),
                        &err,
                    ),
                }
            }
            Reflector::Function(_) | Reflector::Parameter(_) | Reflector::Property(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn test_factory_passes_through() {
        let introspector = testing::introspector();
        let class = introspector.class("App\\Derived").unwrap();

        let factory = FactoryReflection::from_reflector(&introspector, class.into()).unwrap();
        assert_eq!(factory.debug_name(), "App\\Derived");
        assert!(factory.as_class().is_some());
    }

    #[test]
    fn test_native_class_and_method_conversion() {
        let introspector = testing::introspector();
        let native = introspector.system().load_class("App\\Derived").unwrap();
        let make = native.method("make").unwrap().clone();

        let class = introspector.factory_for(native.into()).unwrap();
        assert!(class.is_class());
        assert_eq!(class.class_name(), "App\\Derived");

        // A native method only knows its declaring class.
        let method = introspector.factory_for(make.into()).unwrap();
        assert_eq!(method.method_name(), Some("make"));
        assert_eq!(method.class_name(), "App\\Base");
        assert!(!method.is_inherited());
    }

    #[test]
    fn test_no_conversion_for_other_reflectors() {
        let introspector = testing::introspector();
        let native = introspector.system().load_class("App\\Base").unwrap();

        let property = Reflector::Property(native.properties[0].clone());
        assert!(introspector.factory_for(property).is_none());

        let function = introspector.system().load_function("build_service").unwrap();
        assert!(introspector.factory_for(Reflector::Function(function)).is_none());

        let parameter = introspector.function_parameters("build_service").unwrap().remove(0);
        assert!(introspector.factory_for(parameter.into()).is_none());
    }

    #[test]
    #[should_panic(expected = "Inconsistent type system")]
    fn test_stale_native_class_is_a_consistency_violation() {
        let introspector = testing::introspector();
        let mut stale = introspector.system().load_class("App\\Base").unwrap();
        stale.name = "App\\Vanished".to_string();

        introspector.factory_for(stale.into());
    }

    #[test]
    fn test_factory_dispatch() {
        let introspector = testing::introspector();
        let factories = introspector.class("App\\Base").unwrap().factories();

        let class = &factories[0];
        assert!(class.is_class_like());
        assert!(class.is_static());
        assert!(!class.is_method());
        assert!(class.has_required_parameters());

        let make = factories
            .iter()
            .find(|f| f.method_name() == Some("make"))
            .unwrap();
        assert!(make.is_method());
        assert!(!make.is_class_like());
        assert!(!make.has_required_parameters());
        assert_eq!(make.return_class_name().as_deref(), Some("App\\Base"));
        assert_eq!(make.full_name(), "App\\Base::make");
        assert!(make.as_method().is_some());
    }
}
