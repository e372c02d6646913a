//! Class descriptors.
//!
//! A [`ClassReflection`] is an immutable view of a class, interface or trait
//! loaded together with all of its ancestors. As a factory it stands for its
//! own constructor and produces itself.

use std::sync::Arc;

use log::debug;
use reflectory_types::{ClassKind, TypeRef};

use crate::attributes::{Attribute, AttributesHaving};
use crate::factory::{Factory, FactoryReflector};
use crate::method::MethodReflection;
use crate::names::NameHaving;
use crate::native::{AttributeFlags, Modifiers, NativeClass, NativeMethod, NativeProperty};
use crate::parameter::ParameterReflection;
use crate::{Error, Introspector, Object, Result};

/// Filters for [`ClassReflection::filtered_methods`].
///
/// `None` ignores a dimension, `Some(b)` requires an exact match. All
/// dimensions must match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MethodFilter {
    /// Native filter: keep methods having any of these modifiers
    pub modifiers: Option<Modifiers>,
    pub is_static: Option<bool>,
    pub is_public: Option<bool>,
    pub is_protected: Option<bool>,
    pub is_private: Option<bool>,
    pub is_abstract: Option<bool>,
    pub is_final: Option<bool>,
    pub is_constructor: Option<bool>,
}

impl MethodFilter {
    pub fn matches(&self, method: &NativeMethod) -> bool {
        method.modifiers.matches_filter(self.modifiers)
            && check(self.is_static, method.is_static())
            && check(self.is_public, method.is_public())
            && check(self.is_protected, method.is_protected())
            && check(self.is_private, method.is_private())
            && check(self.is_abstract, method.is_abstract())
            && check(self.is_final, method.is_final())
            && check(self.is_constructor, method.is_constructor())
    }
}

/// Filters for [`ClassReflection::filtered_properties`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropertyFilter {
    pub modifiers: Option<Modifiers>,
    pub is_static: Option<bool>,
    pub is_public: Option<bool>,
    pub is_protected: Option<bool>,
    pub is_private: Option<bool>,
    pub is_readonly: Option<bool>,
}

impl PropertyFilter {
    pub fn matches(&self, property: &NativeProperty) -> bool {
        property.modifiers.matches_filter(self.modifiers)
            && check(self.is_static, property.is_static())
            && check(self.is_public, property.is_public())
            && check(self.is_protected, property.is_protected())
            && check(self.is_private, property.is_private())
            && check(self.is_readonly, property.is_readonly())
    }
}

fn check(expected: Option<bool>, actual: bool) -> bool {
    expected.is_none_or(|expected| expected == actual)
}

/// A reflected class, interface or trait.
#[derive(Debug, Clone)]
pub struct ClassReflection {
    native: Arc<NativeClass>,
    introspector: Introspector,
}

impl ClassReflection {
    /// Load a class by name.
    ///
    /// Fails if the class does not exist or if any parent, interface or used
    /// trait is missing. The two cases are reported alike.
    pub fn new(introspector: &Introspector, name: &str) -> Result<Self> {
        match introspector.system().load_class(name) {
            Ok(native) => Ok(Self {
                native: Arc::new(native),
                introspector: introspector.clone(),
            }),
            Err(source) => {
                debug!("class {} is not available: {}", name, source);
                Err(Error::ClassNotAvailable {
                    name: name.to_string(),
                    source,
                })
            }
        }
    }

    /// Load the class of a runtime value.
    pub fn for_object(introspector: &Introspector, object: &dyn Object) -> Result<Self> {
        Self::new(introspector, object.class_name())
    }

    /// Load a class that is known to exist.
    ///
    /// # Panics
    ///
    /// Panics if the class cannot be loaded.
    pub fn create_known(introspector: &Introspector, name: &str) -> Self {
        match Self::new(introspector, name) {
            Ok(class) => class,
            Err(err) => crate::consistency_violation(&format!("known class {name}"), &err),
        }
    }

    /// Load a class, or get `None` if it is not available.
    pub fn create_if_exists(introspector: &Introspector, name: &str) -> Option<Self> {
        Self::new(introspector, name).ok()
    }

    /// Get the qualified class name.
    pub fn name(&self) -> &str {
        &self.native.name
    }

    pub fn kind(&self) -> ClassKind {
        self.native.kind
    }

    /// Get the native handle this descriptor wraps.
    pub fn native(&self) -> &NativeClass {
        &self.native
    }

    pub fn parent_class_name(&self) -> Option<&str> {
        self.native.parent.as_deref()
    }

    pub fn is_instantiable(&self) -> bool {
        self.native.is_instantiable()
    }

    pub fn is_final(&self) -> bool {
        self.native.is_final()
    }

    /// Get the class itself followed by all non-constructor methods.
    ///
    /// Methods that are not callable are included as well, so that callers
    /// can inspect them, e.g. to report attributes placed on the wrong method.
    pub fn factories(&self) -> Vec<Factory> {
        let filter = MethodFilter {
            is_constructor: Some(false),
            ..MethodFilter::default()
        };
        std::iter::once(Factory::Class(self.clone()))
            .chain(self.filtered_methods(&filter).into_iter().map(Factory::Method))
            .collect()
    }

    /// Get methods, including inherited ones, passing a native modifier filter.
    pub fn methods(&self, filter: Option<Modifiers>) -> Vec<MethodReflection> {
        self.native
            .methods_matching(filter)
            .map(|method| self.rebind(method))
            .collect()
    }

    /// Get concrete, public, non-constructor methods.
    pub fn callable_methods(&self, filter: Option<Modifiers>) -> Vec<MethodReflection> {
        self.native
            .methods_matching(filter)
            .filter(|m| !m.is_abstract() && !m.is_constructor() && m.is_public())
            .map(|method| self.rebind(method))
            .collect()
    }

    /// Get methods matching all given filters.
    pub fn filtered_methods(&self, filter: &MethodFilter) -> Vec<MethodReflection> {
        self.native
            .methods_matching(filter.modifiers)
            .filter(|m| filter.matches(m))
            .map(|method| self.rebind(method))
            .collect()
    }

    /// Get a method by name, as seen from this class.
    pub fn method(&self, name: &str) -> Result<MethodReflection> {
        MethodReflection::new(&self.introspector, self.name(), name)
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.native.has_method(name)
    }

    /// Get the constructor, declared here or inherited.
    pub fn constructor(&self) -> Option<MethodReflection> {
        self.native.constructor().map(|method| self.rebind(method))
    }

    /// Get properties matching all given filters.
    pub fn filtered_properties(&self, filter: &PropertyFilter) -> Vec<NativeProperty> {
        self.native
            .properties_matching(filter.modifiers)
            .filter(|p| filter.matches(p))
            .cloned()
            .collect()
    }

    /// Get all implemented interfaces, including inherited ones.
    pub fn interface_names(&self) -> &[String] {
        &self.native.interface_names
    }

    /// Get the interface name, if exactly one interface is implemented.
    ///
    /// With `inclusive`, an interface counts itself, and only itself: it
    /// yields its own name if it extends no other interface.
    pub fn only_interface_name(&self, inclusive: bool) -> Option<&str> {
        let interfaces = self.interface_names();
        if inclusive && self.native.is_interface() {
            return interfaces.is_empty().then(|| self.name());
        }
        match interfaces {
            [only] => Some(only.as_str()),
            _ => None,
        }
    }

    /// Get interface names, preceded by this interface itself if it is one.
    pub fn inclusive_interface_names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.native.interface_names.len() + 1);
        if self.native.is_interface() {
            names.push(self.native.name.clone());
        }
        names.extend(self.native.interface_names.iter().cloned());
        names
    }

    /// Create a method descriptor for a member that was just enumerated.
    fn rebind(&self, method: &NativeMethod) -> MethodReflection {
        match MethodReflection::new(&self.introspector, self.name(), &method.name) {
            Ok(reflection) => reflection,
            Err(err) => crate::consistency_violation(
                &format!("{}::{}()", self.name(), method.name),
                &err,
            ),
        }
    }
}

impl AttributesHaving for ClassReflection {
    fn attributes(&self, name: Option<&str>, flags: AttributeFlags) -> Vec<Attribute> {
        self.introspector
            .system()
            .filter_attributes(&self.native.attributes, name, flags)
            .into_iter()
            .map(|record| Attribute::new(record, self.debug_name()))
            .collect()
    }
}

impl NameHaving for ClassReflection {
    fn debug_name(&self) -> String {
        self.native.name.clone()
    }

    fn full_name(&self) -> String {
        self.native.name.clone()
    }
}

impl FactoryReflector for ClassReflection {
    fn class_name(&self) -> &str {
        self.name()
    }

    fn class(&self) -> ClassReflection {
        self.clone()
    }

    fn method_name(&self) -> Option<&str> {
        None
    }

    fn is_class_like(&self) -> bool {
        true
    }

    fn is_class(&self) -> bool {
        self.native.kind == ClassKind::Class
    }

    fn is_interface(&self) -> bool {
        self.native.is_interface()
    }

    fn is_trait(&self) -> bool {
        self.native.is_trait()
    }

    fn is_inherited(&self) -> bool {
        false
    }

    fn parameters(&self) -> Vec<ParameterReflection> {
        self.constructor()
            .map(|constructor| constructor.parameters())
            .unwrap_or_default()
    }

    fn is_abstract(&self) -> bool {
        self.native.is_abstract()
    }

    /// Constructing an instance needs no receiver.
    fn is_static(&self) -> bool {
        true
    }

    fn is_callable(&self) -> bool {
        self.is_instantiable()
    }

    fn is_constructor(&self) -> bool {
        false
    }

    fn is_destructor(&self) -> bool {
        false
    }

    fn return_type(&self) -> Option<TypeRef> {
        Some(TypeRef::named(self.name()))
    }

    fn return_class_name(&self) -> Option<String> {
        Some(self.name().to_string())
    }

    fn return_class(&self) -> Result<Option<ClassReflection>> {
        Ok(Some(self.clone()))
    }

    fn return_class_if_exists(&self) -> Option<ClassReflection> {
        Some(self.clone())
    }
}
