// ── Typed property values ──
//
// RAD reports every property value as a string (sometimes a bare JSON
// number). Each schema entry names exactly one `Decoder`, which turns the
// wire scalar into a `PropertyValue`. `Display` is the inverse encoding.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

use serde_json::Value;
use strum::IntoStaticStr;
use thiserror::Error;

const SIZE_UNITS: [&str; 7] = ["", "K", "M", "G", "T", "P", "E"];

/// Why a wire value could not become a [`PropertyValue`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("'{raw}' is not a valid {expected}")]
    Invalid { expected: &'static str, raw: String },

    #[error("boolean value '{raw}' is neither '{truthy}' nor '{falsy}'")]
    Boolean {
        raw: String,
        truthy: &'static str,
        falsy: &'static str,
    },

    #[error("expected a {expected} value, got {found}")]
    Shape {
        expected: &'static str,
        found: &'static str,
    },

    #[error("cannot compare a {left} value with a {right} value")]
    Incomparable {
        left: &'static str,
        right: &'static str,
    },
}

/// The literal pair a boolean property uses on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoolLiterals {
    pub truthy: &'static str,
    pub falsy: &'static str,
}

impl BoolLiterals {
    pub const TRUE_FALSE: Self = Self {
        truthy: "true",
        falsy: "false",
    };
    /// Zone configuration and zpool flavor.
    pub const ON_OFF: Self = Self {
        truthy: "on",
        falsy: "off",
    };

    pub fn literal(self, value: bool) -> &'static str {
        if value { self.truthy } else { self.falsy }
    }
}

impl Default for BoolLiterals {
    fn default() -> Self {
        Self::TRUE_FALSE
    }
}

/// Decoding rule declared for one property name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum Decoder {
    String,
    Boolean(BoolLiterals),
    Integer,
    /// Integer when parseable, otherwise the raw text (`ncpus` ranges like `1-4`).
    IntegerOrString,
    Float,
    /// Filesystem path; `-` means absent.
    Path,
    /// Unitless binary size (`1.00 G`).
    Size,
    /// Byte count (`1.00 GB`).
    Bytes,
    Array,
}

impl Decoder {
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Numeric decoders ask `get_props` for integer values.
    pub fn is_integer(self) -> bool {
        matches!(self, Self::Integer | Self::Size | Self::Bytes)
    }

    /// Decode one wire value. Scalars may be JSON strings or numbers;
    /// arrays accept a JSON list or a comma-separated string.
    pub fn decode(self, raw: &Value) -> Result<PropertyValue, DecodeError> {
        if let Self::Array = self {
            return decode_array(raw);
        }

        let text = scalar_text(raw).ok_or(DecodeError::Shape {
            expected: self.name(),
            found: json_kind(raw),
        })?;
        let text = text.as_ref();

        let invalid = || DecodeError::Invalid {
            expected: self.name(),
            raw: text.to_owned(),
        };

        match self {
            Self::String => Ok(PropertyValue::String(text.to_owned())),
            Self::Boolean(literals) => {
                if text == literals.truthy {
                    Ok(PropertyValue::Boolean {
                        value: true,
                        literals,
                    })
                } else if text == literals.falsy {
                    Ok(PropertyValue::Boolean {
                        value: false,
                        literals,
                    })
                } else {
                    Err(DecodeError::Boolean {
                        raw: text.to_owned(),
                        truthy: literals.truthy,
                        falsy: literals.falsy,
                    })
                }
            }
            Self::Integer => text
                .trim()
                .parse()
                .map(PropertyValue::Integer)
                .map_err(|_| invalid()),
            Self::IntegerOrString => Ok(text.trim().parse().map_or_else(
                |_| PropertyValue::String(text.to_owned()),
                PropertyValue::Integer,
            )),
            Self::Float => text
                .trim()
                .parse()
                .map(PropertyValue::Float)
                .map_err(|_| invalid()),
            Self::Path => Ok(PropertyValue::Path(
                (text != "-").then(|| text.to_owned()),
            )),
            Self::Size => text
                .trim()
                .parse()
                .map(PropertyValue::Size)
                .map_err(|_| invalid()),
            Self::Bytes => text
                .trim()
                .parse()
                .map(PropertyValue::Bytes)
                .map_err(|_| invalid()),
            Self::Array => decode_array(raw),
        }
    }
}

fn decode_array(raw: &Value) -> Result<PropertyValue, DecodeError> {
    match raw {
        Value::Array(items) => items
            .iter()
            .map(|item| {
                scalar_text(item)
                    .map(Cow::into_owned)
                    .ok_or(DecodeError::Shape {
                        expected: "array element",
                        found: json_kind(item),
                    })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(PropertyValue::Array),
        Value::String(s) if s.is_empty() => Ok(PropertyValue::Array(Vec::new())),
        Value::String(s) => Ok(PropertyValue::Array(
            s.split(',').map(str::to_owned).collect(),
        )),
        other => Err(DecodeError::Shape {
            expected: "array",
            found: json_kind(other),
        }),
    }
}

fn scalar_text(raw: &Value) -> Option<Cow<'_, str>> {
    match raw {
        Value::String(s) => Some(Cow::Borrowed(s)),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::Bool(b) => Some(Cow::Owned(b.to_string())),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn json_kind(raw: &Value) -> &'static str {
    match raw {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Render a count with binary unit steps and two decimals: `1.00 G`.
/// Magnitudes below 1024 are not scaled; the sign is kept.
pub fn format_size(n: i64) -> String {
    let (size, unit) = scale(n);
    format!("{size:.2} {unit}").trim_end().to_owned()
}

/// [`format_size`] with a trailing `B`: `1.00 GB`, `512.00 B`.
pub fn format_bytes(n: i64) -> String {
    let (size, unit) = scale(n);
    format!("{size:.2} {unit}B")
}

#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
fn scale(n: i64) -> (f64, &'static str) {
    let mut size = n.unsigned_abs() as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    let size = if n < 0 { -size } else { size };
    (size, SIZE_UNITS.get(unit).copied().unwrap_or_default())
}

/// One decoded property value.
#[derive(Debug, Clone, PartialEq, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum PropertyValue {
    String(String),
    Boolean { value: bool, literals: BoolLiterals },
    Integer(i64),
    Float(f64),
    Path(Option<String>),
    Size(i64),
    Bytes(i64),
    Array(Vec<String>),
}

impl PropertyValue {
    pub fn kind(&self) -> &'static str {
        self.into()
    }

    /// `false` only for a path decoded from `-`.
    pub fn is_present(&self) -> bool {
        !matches!(self, Self::Path(None))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Path(Some(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean { value, .. } => Some(*value),
            _ => None,
        }
    }

    /// Integers and byte counts.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(n) | Self::Size(n) | Self::Bytes(n) => Some(*n),
            _ => None,
        }
    }

    /// Decoded value as JSON. Sizes stay integers; absent paths are null.
    pub fn to_json(&self) -> Value {
        match self {
            Self::String(s) => Value::String(s.clone()),
            Self::Boolean { value, .. } => Value::Bool(*value),
            Self::Integer(n) => Value::from(*n),
            Self::Float(f) => serde_json::Number::from_f64(*f).map_or(Value::Null, Value::Number),
            Self::Path(p) => p.clone().map_or(Value::Null, Value::String),
            Self::Size(n) | Self::Bytes(n) => Value::from(*n),
            Self::Array(items) => items.iter().cloned().map(Value::String).collect(),
        }
    }

    /// Order two values of the same kind. Mixed kinds are an error.
    pub fn try_cmp(&self, other: &Self) -> Result<Ordering, DecodeError> {
        let incomparable = || DecodeError::Incomparable {
            left: self.kind(),
            right: other.kind(),
        };
        match (self, other) {
            (Self::String(a), Self::String(b)) => Ok(a.cmp(b)),
            (Self::Boolean { value: a, .. }, Self::Boolean { value: b, .. }) => Ok(a.cmp(b)),
            (Self::Integer(a), Self::Integer(b)) => Ok(a.cmp(b)),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b).ok_or_else(incomparable),
            (Self::Path(a), Self::Path(b)) => Ok(a.cmp(b)),
            (Self::Size(a), Self::Size(b)) | (Self::Bytes(a), Self::Bytes(b)) => Ok(a.cmp(b)),
            (Self::Array(a), Self::Array(b)) => Ok(a.cmp(b)),
            _ => Err(incomparable()),
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Boolean { value, literals } => f.write_str(literals.literal(*value)),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Path(Some(p)) => f.write_str(p),
            Self::Path(None) => f.write_str("-"),
            Self::Size(n) => f.write_str(&format_size(*n)),
            Self::Bytes(n) => f.write_str(&format_bytes(*n)),
            Self::Array(items) => f.write_str(&items.join(",")),
        }
    }
}
