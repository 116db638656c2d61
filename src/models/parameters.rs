//! Template parameter sources and how they flatten into one mapping.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Flat name → value mapping used as the template context.
pub type Parameters = Map<String, Value>;

/// Keys that wrap the real parameters inside a mapping, checked in order.
const WRAPPER_KEYS: [&str; 3] = ["properties", "templateParameters", "parameters"];

/// A parameter source as it arrives on the wire.
///
/// The shape is decided once during deserialization. Variant order matters
/// for the untagged decode: objects become `Mapping`, arrays `PairList`, and
/// every other JSON value lands in `Unrecognized`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterSource {
    Mapping(Map<String, Value>),
    /// Ordered `{ "name": ..., "value": ... }` items.
    PairList(Vec<Value>),
    Unrecognized(Value),
}

impl ParameterSource {
    /// Flattens the source into a new mapping.
    ///
    /// A mapping with an object-valued `properties`, `templateParameters` or
    /// `parameters` key (first match wins) resolves to that inner object.
    /// Pair-list items without a string `name` or without a `value`
    /// key are skipped; later pairs overwrite earlier ones.
    pub fn resolve(&self) -> Parameters {
        match self {
            ParameterSource::Mapping(map) => WRAPPER_KEYS
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_object))
                .unwrap_or(map)
                .clone(),
            ParameterSource::PairList(items) => items
                .iter()
                .filter_map(property_value)
                .map(|(name, value)| (name.to_string(), value.clone()))
                .collect(),
            ParameterSource::Unrecognized(_) => Parameters::new(),
        }
    }
}

impl From<Parameters> for ParameterSource {
    fn from(map: Parameters) -> Self {
        ParameterSource::Mapping(map)
    }
}

fn property_value(item: &Value) -> Option<(&str, &Value)> {
    let object = item.as_object()?;
    let name = object.get("name")?.as_str()?;
    let value = object.get("value")?;
    Some((name, value))
}

/// Resolves `primary` and overlays `secondary` on top of it.
///
/// On a key collision the secondary value wins.
pub fn resolve_parameters(
    primary: Option<&ParameterSource>,
    secondary: Option<&Parameters>,
) -> Parameters {
    let mut parameters = primary.map(ParameterSource::resolve).unwrap_or_default();

    if let Some(secondary) = secondary {
        for (key, value) in secondary {
            parameters.insert(key.clone(), value.clone());
        }
    }

    parameters
}
