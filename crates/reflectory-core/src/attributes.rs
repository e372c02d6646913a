//! Access to attributes attached to declarations.
//!
//! Matching is entirely up to [`TypeSystem::filter_attributes`]; this module
//! only wraps the records and turns them into typed values.
//!
//! [`TypeSystem::filter_attributes`]: crate::native::TypeSystem::filter_attributes

use reflectory_types::AttributeRecord;
use serde::de::DeserializeOwned;

use crate::native::AttributeFlags;
use crate::{Error, Result};

/// An attribute attached to a class, method or parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    record: AttributeRecord,
    target: String,
}

impl Attribute {
    pub(crate) fn new(record: AttributeRecord, target: String) -> Self {
        Self { record, target }
    }

    /// Get the attribute class name.
    pub fn name(&self) -> &str {
        &self.record.name
    }

    /// Get the raw arguments.
    pub fn arguments(&self) -> &serde_json::Value {
        &self.record.arguments
    }

    /// Get the debug name of the declaration this is attached to.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Instantiate the attribute by deserializing its arguments.
    pub fn new_instance<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.record.arguments.clone()).map_err(|source| {
            Error::AttributeInstance {
                name: self.record.name.clone(),
                target: self.target.clone(),
                source,
            }
        })
    }
}

/// A declaration that can carry attributes.
pub trait AttributesHaving {
    /// Get attributes, optionally filtered by attribute class.
    fn attributes(&self, name: Option<&str>, flags: AttributeFlags) -> Vec<Attribute>;

    /// Checks whether any matching attribute exists.
    fn has_attributes(&self, name: Option<&str>, flags: AttributeFlags) -> bool {
        !self.attributes(name, flags).is_empty()
    }

    /// Get matching attributes as typed instances.
    ///
    /// Instantiation errors are not suppressed.
    fn attribute_instances<T: DeserializeOwned>(
        &self,
        name: &str,
        flags: AttributeFlags,
    ) -> Result<Vec<T>>
    where
        Self: Sized,
    {
        self.attributes(Some(name), flags)
            .iter()
            .map(Attribute::new_instance::<T>)
            .collect()
    }
}
