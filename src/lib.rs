//! # Reflectory - Factory Reflection
//!
//! Reflectory answers one question about a codebase: *what can produce an
//! instance of this class?* Classes and methods are described through the
//! same [`FactoryReflector`] contract. A class is its own constructor, always
//! static and never inherited. A method remembers which class it was looked up
//! on, so `static` return types bind late and inherited factories name the
//! subclass they were found on.
//!
//! ## Quick Start
//!
//! ```ignore
//! use reflectory::{Codebase, FactoryReflector, Introspector, NameHaving};
//!
//! let introspector = Introspector::new(Codebase::from_json_file("codebase.json")?);
//!
//! let derived = introspector.class("App\\Derived")?;
//! for factory in derived.factories() {
//!     if factory.is_callable() {
//!         println!("{} produces {:?}", factory.debug_name(), factory.return_class_name());
//!     }
//! }
//! ```
//!
//! ## Architecture
//!
//! - **[`reflectory_core`]**: descriptors, the [`TypeSystem`] contract and the
//!   in-memory [`Codebase`]
//! - **[`reflectory_types`]**: serializable declaration snapshots
//!
//! ## Type Systems
//!
//! Descriptors never read declarations directly. They ask a [`TypeSystem`] to
//! load a class with all its ancestors, so any host that can answer those
//! queries can be plugged in. [`Codebase`] is the bundled implementation,
//! built from a JSON [`CodebaseSnapshot`].

// Re-export the descriptors
pub use reflectory_core::{
    Attribute, AttributesHaving, ClassReflection, Factory, FactoryReflection, FactoryReflector,
    MethodFilter, MethodReflection, NameHaving, ParameterReflection, PropertyFilter, Reflector,
    StaticCallable,
};

// Re-export the entry point and errors
pub use reflectory_core::{Error, Introspector, Object, Result};

// Re-export the native layer for custom type systems
pub use reflectory_core::{
    AttributeFlags, Codebase, LoadError, Modifiers, NativeClass, NativeFunction, NativeMethod,
    NativeParameter, NativeProperty, ParameterOwner, TypeSystem,
};

// Re-export snapshot types
pub use reflectory_types::{
    AttributeRecord, ClassDecl, ClassKind, CodebaseSnapshot, FunctionDecl, MethodDecl, ParamDecl,
    PropertyDecl, TypeRef, Visibility,
};
