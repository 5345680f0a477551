//! Population manifest.
//!
//! A manifest is the data form of the population input: one record per
//! type and per member, as produced by whatever front end discovered them.
//! Closures cannot travel as data, so manifest members are metadata-only.
//!
//! ```json
//! {
//!   "types": [
//!     { "id": 1, "name": "Person", "full_name": "Demo.Person",
//!       "is_reference_type": true, "property_ids": [10, 11] }
//!   ],
//!   "properties": [
//!     { "id": 10, "owner": 1, "name": "Name", "type": "String" },
//!     { "id": 11, "owner": 1, "name": "Age", "type": 2 }
//!   ]
//! }
//! ```
//!
//! Member types are either a type id (keyed reference) or a string (name
//! only).

use crate::descriptor::{
    FieldDescriptor, MethodDescriptor, PropertyDescriptor, TypeDescriptor, TypeLink,
};
use crate::error::PopulationError;
use crate::flags::{PropertyAccess, TypeFlags};
use crate::store::StoreBuilder;
use serde::{Deserialize, Serialize};
use std::io::Read;
use tracing::debug;
use typestore_common::{FieldKey, MethodKey, PropertyKey, TypeKey};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    pub types: Vec<TypeRecord>,
    pub fields: Vec<FieldRecord>,
    pub properties: Vec<PropertyRecord>,
    pub methods: Vec<MethodRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeRecord {
    pub id: TypeKey,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assembly_qualified_name: Option<String>,
    #[serde(default)]
    pub is_value_type: bool,
    #[serde(default)]
    pub is_reference_type: bool,
    #[serde(default)]
    pub is_generic_type: bool,
    #[serde(default)]
    pub is_nullable: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub field_ids: Vec<FieldKey>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub property_ids: Vec<PropertyKey>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub method_ids: Vec<MethodKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underlying_type_id: Option<TypeKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generic_type_argument_ids: Option<Vec<TypeKey>>,
}

/// A member's type: a type id, or a bare name when no descriptor exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeRefRecord {
    Id(TypeKey),
    Name(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRecord {
    pub id: FieldKey,
    pub owner: TypeKey,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: TypeRefRecord,
    #[serde(default)]
    pub is_read_only: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyRecord {
    pub id: PropertyKey,
    pub owner: TypeKey,
    pub name: String,
    #[serde(rename = "type")]
    pub property_type: TypeRefRecord,
    #[serde(default = "default_true")]
    pub can_read: bool,
    #[serde(default = "default_true")]
    pub can_write: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodRecord {
    pub id: MethodKey,
    pub owner: TypeKey,
    pub name: String,
    pub return_type: TypeRefRecord,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameter_types: Vec<TypeRefRecord>,
}

fn default_true() -> bool {
    true
}

impl Manifest {
    pub fn from_json(text: &str) -> Result<Self, PopulationError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, PopulationError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, PopulationError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Register every record with `builder`: type shells first, then
    /// fields, properties and methods.
    pub fn populate(&self, builder: &mut StoreBuilder) -> Result<(), PopulationError> {
        for record in &self.types {
            builder.register_type(TypeDescriptor::from(record))?;
        }
        for record in &self.fields {
            builder.register_field(record.owner, FieldDescriptor::from(record))?;
        }
        for record in &self.properties {
            builder.register_property(record.owner, PropertyDescriptor::from(record))?;
        }
        for record in &self.methods {
            builder.register_method(record.owner, MethodDescriptor::from(record))?;
        }
        debug!(
            types = self.types.len(),
            fields = self.fields.len(),
            properties = self.properties.len(),
            methods = self.methods.len(),
            "Manifest::populate"
        );
        Ok(())
    }
}

impl From<&TypeRefRecord> for TypeLink {
    fn from(record: &TypeRefRecord) -> Self {
        match record {
            TypeRefRecord::Id(key) => TypeLink::Key(*key),
            TypeRefRecord::Name(name) => TypeLink::named(name.as_str()),
        }
    }
}

impl From<&TypeRecord> for TypeDescriptor {
    fn from(record: &TypeRecord) -> Self {
        let flags = TypeFlags::from_parts(
            record.is_value_type,
            record.is_reference_type,
            record.is_generic_type,
            record.is_nullable,
        );
        let full_name = record.full_name.as_deref().unwrap_or(&record.name);
        let qualified = record
            .assembly_qualified_name
            .as_deref()
            .unwrap_or(full_name);

        let mut descriptor = TypeDescriptor::new(record.id, record.name.as_str())
            .with_full_name(full_name)
            .with_assembly_qualified_name(qualified)
            .with_flags(flags)
            .with_fields(record.field_ids.iter().copied())
            .with_properties(record.property_ids.iter().copied())
            .with_methods(record.method_ids.iter().copied());
        descriptor.underlying_type = record.underlying_type_id.map(TypeLink::Key);
        descriptor.generic_type_arguments = record
            .generic_type_argument_ids
            .as_ref()
            .map(|ids| ids.iter().copied().map(TypeLink::Key).collect());
        descriptor
    }
}

impl From<&FieldRecord> for FieldDescriptor {
    fn from(record: &FieldRecord) -> Self {
        FieldDescriptor::new(record.id, record.name.as_str(), &record.field_type)
            .read_only(record.is_read_only)
    }
}

impl From<&PropertyRecord> for PropertyDescriptor {
    fn from(record: &PropertyRecord) -> Self {
        PropertyDescriptor::new(record.id, record.name.as_str(), &record.property_type)
            .with_access(PropertyAccess::from_parts(record.can_read, record.can_write))
    }
}

impl From<&MethodRecord> for MethodDescriptor {
    fn from(record: &MethodRecord) -> Self {
        MethodDescriptor::new(record.id, record.name.as_str(), &record.return_type)
            .with_static(record.is_static)
            .with_parameters(record.parameter_types.iter())
    }
}

#[cfg(test)]
#[path = "../tests/manifest_tests.rs"]
mod tests;
