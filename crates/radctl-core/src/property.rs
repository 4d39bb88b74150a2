// ── Properties ──
//
// `RawProperty` is the wire shape (`{name, value, listvalue}`); `Property`
// is the decoded form bound to the decoder its schema declared.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::CoreError;
use crate::value::{Decoder, PropertyValue};

/// One schema entry: a property name and its decoding rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropertySpec {
    pub name: &'static str,
    pub decoder: Decoder,
}

impl PropertySpec {
    pub const fn new(name: &'static str, decoder: Decoder) -> Self {
        Self { name, decoder }
    }

    /// `get_props` request entry: `{"name": ..}` plus `integer_val` for numerics.
    pub fn definition(&self) -> Value {
        if self.decoder.is_integer() {
            json!({ "name": self.name, "integer_val": true })
        } else {
            json!({ "name": self.name })
        }
    }
}

/// A property as the daemon reports it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawProperty {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listvalue: Option<Vec<Value>>,
}

impl RawProperty {
    pub fn scalar(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
            listvalue: None,
        }
    }

    pub fn list(name: impl Into<String>, items: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        Self {
            name: name.into(),
            value: None,
            listvalue: Some(items.into_iter().map(Into::into).collect()),
        }
    }

    /// Neither a value nor list items: the property is not set.
    pub fn is_unset(&self) -> bool {
        let value_empty = match &self.value {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.is_empty(),
            Some(_) => false,
        };
        let list_empty = self.listvalue.as_ref().is_none_or(Vec::is_empty);
        value_empty && list_empty
    }

    pub fn has_list(&self) -> bool {
        self.listvalue.as_ref().is_some_and(|items| !items.is_empty())
    }

    /// The wire value to decode: list items when present, else the scalar.
    pub fn wire_value(&self) -> Value {
        match (&self.listvalue, &self.value) {
            (Some(items), _) if !items.is_empty() => Value::Array(items.clone()),
            (_, Some(value)) => value.clone(),
            _ => Value::Null,
        }
    }
}

/// A decoded property.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    name: String,
    value: PropertyValue,
    decoder: Decoder,
}

impl Property {
    pub fn decode(raw: &RawProperty, decoder: Decoder) -> Result<Self, CoreError> {
        let value = decoder
            .decode(&raw.wire_value())
            .map_err(|source| CoreError::Decode {
                property: raw.name.clone(),
                source,
            })?;
        Ok(Self {
            name: raw.name.clone(),
            value,
            decoder,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &PropertyValue {
        &self.value
    }

    pub fn decoder(&self) -> Decoder {
        self.decoder
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}
