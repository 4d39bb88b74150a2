// ── Resources ──
//
// A `Resource` is a typed group of properties plus owned child resources.
// Its `Schema` is a static table selected through a `Registry` by type tag;
// resources reference the table and never mutate it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::CoreError;
use crate::property::{Property, PropertySpec, RawProperty};
use crate::value::Decoder;

/// Name of the cross-reference property linking scoped children to parents.
pub const TMP_ID: &str = "tmp-id";

/// Ordered property table for one resource type.
#[derive(Debug, PartialEq, Eq)]
pub struct Schema {
    pub type_tag: &'static str,
    pub properties: &'static [PropertySpec],
}

impl Schema {
    pub const fn new(type_tag: &'static str, properties: &'static [PropertySpec]) -> Self {
        Self {
            type_tag,
            properties,
        }
    }

    pub fn decoder_for(&self, name: &str) -> Option<Decoder> {
        self.properties
            .iter()
            .find(|spec| spec.name == name)
            .map(|spec| spec.decoder)
    }

    pub fn declares(&self, name: &str) -> bool {
        self.decoder_for(name).is_some()
    }

    pub fn property_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.properties.iter().map(|spec| spec.name)
    }

    /// `get_props` definitions for `names` (all declared names when `None`),
    /// in schema order.
    pub fn definitions(&self, names: Option<&[&str]>) -> Vec<Value> {
        self.properties
            .iter()
            .filter(|spec| names.is_none_or(|names| names.contains(&spec.name)))
            .map(PropertySpec::definition)
            .collect()
    }
}

/// Type tag → schema lookup.
#[derive(Debug)]
pub struct Registry {
    schemas: &'static [&'static Schema],
}

impl Registry {
    pub const fn new(schemas: &'static [&'static Schema]) -> Self {
        Self { schemas }
    }

    pub fn schema_for(&self, type_tag: &str) -> Result<&'static Schema, CoreError> {
        self.schemas
            .iter()
            .copied()
            .find(|schema| schema.type_tag == type_tag)
            .ok_or_else(|| CoreError::UnknownResourceType {
                type_tag: type_tag.to_owned(),
            })
    }
}

/// A resource as the daemon reports it from `getResources`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawResource {
    #[serde(rename = "type")]
    pub type_tag: String,
    #[serde(default)]
    pub properties: Vec<RawProperty>,
    /// Set on scoped results: `"{type},tmp-id={n}"` of the logical parent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

/// A decoded resource and its children.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    schema: &'static Schema,
    properties: Vec<Property>,
    children: Vec<Resource>,
}

impl Resource {
    pub fn empty(schema: &'static Schema) -> Self {
        Self {
            schema,
            properties: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Decode `raw` with the schema registered for its type tag.
    pub fn from_raw(registry: &Registry, raw: &RawResource) -> Result<Self, CoreError> {
        Self::load(registry.schema_for(&raw.type_tag)?, &raw.properties)
    }

    /// Decode a flat property list. Unset entries are skipped; names the
    /// schema does not declare fall back to string (or array) decoding.
    pub fn load(schema: &'static Schema, raw_properties: &[RawProperty]) -> Result<Self, CoreError> {
        let mut resource = Self::empty(schema);
        for raw in raw_properties.iter().filter(|raw| !raw.is_unset()) {
            let decoder = schema.decoder_for(&raw.name).unwrap_or_else(|| {
                warn!(
                    property = %raw.name,
                    resource = schema.type_tag,
                    "property not declared for resource, decoding as string"
                );
                if raw.has_list() {
                    Decoder::Array
                } else {
                    Decoder::String
                }
            });
            resource.properties.push(Property::decode(raw, decoder)?);
        }
        Ok(resource)
    }

    pub fn type_tag(&self) -> &'static str {
        self.schema.type_tag
    }

    pub fn schema(&self) -> &'static Schema {
        self.schema
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn into_properties(self) -> Vec<Property> {
        self.properties
    }

    pub fn children(&self) -> &[Resource] {
        &self.children
    }

    pub fn push_child(&mut self, child: Resource) {
        self.children.push(child);
    }

    pub fn set_children(&mut self, children: Vec<Resource>) {
        self.children = children;
    }

    /// The single property called `name`. Two properties with the same
    /// name is a modeling error.
    pub fn get(&self, name: &str) -> Result<Option<&Property>, CoreError> {
        let mut matches = self.properties.iter().filter(|p| p.name() == name);
        let first = matches.next();
        if matches.next().is_some() {
            return Err(CoreError::DuplicateProperty {
                resource: self.type_tag().to_owned(),
                name: name.to_owned(),
            });
        }
        Ok(first)
    }

    /// Properties then children as an ordered JSON object. Children whose
    /// schema declares `tmp-id` repeat, so they are collected in a list
    /// under their type tag; others are set as a single nested object.
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        for prop in self.properties.iter().filter(|p| p.value().is_present()) {
            map.insert(prop.name().to_owned(), prop.value().to_json());
        }
        for child in &self.children {
            let value = child.to_json();
            if child.schema.declares(TMP_ID) {
                let slot = map
                    .entry(child.type_tag())
                    .or_insert_with(|| Value::Array(Vec::new()));
                if let Value::Array(items) = slot {
                    items.push(value);
                } else {
                    warn!(
                        type_tag = child.type_tag(),
                        "key already holds a property, child left out of the JSON view"
                    );
                }
            } else {
                map.insert(child.type_tag().to_owned(), value);
            }
        }
        Value::Object(map)
    }
}
