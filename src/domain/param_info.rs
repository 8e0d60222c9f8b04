//! Declarative parameter schema.
//!
//! A [`ParamInfo`] describes one editable parameter: its label, the identifier
//! fragment used when minting field names, and the kind tag that selects the
//! widget responsible for it. Composite kinds carry their children inline.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Kind tags understood by the default widget registry.
pub mod kinds {
    pub const STRING: &str = "string";
    pub const INT: &str = "int";
    pub const FLOAT: &str = "float";
    pub const BOOLEAN: &str = "boolean";
    pub const CHOICE: &str = "choice";
    pub const COLLECTION: &str = "collection";
    pub const ARRAY: &str = "array";
    pub const TESTCASE: &str = "testcase";
}

/// Schema node for a single parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamInfo {
    /// Display label
    pub name: String,
    /// Identifier fragment used in generated field names
    pub short_name: String,
    #[serde(default)]
    pub description: String,
    /// Tag selecting the widget constructor
    #[serde(rename = "type", alias = "kind")]
    pub kind: String,
    /// Options for `choice`, in document order
    #[serde(default, skip_serializing_if = "Choices::is_empty")]
    pub choices: Choices,
    /// Children of a `collection`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subparameters: Vec<ParamInfo>,
    /// Element template of an `array` or `testcase`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subparameter: Option<Box<ParamInfo>>,
    /// Seed for `testcase` elements beyond the stored value's length
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
}

impl ParamInfo {
    /// Create a childless schema node of the given kind.
    pub fn new(kind: &str, name: &str, short_name: &str) -> Self {
        Self {
            name: name.to_string(),
            short_name: short_name.to_string(),
            description: String::new(),
            kind: kind.to_string(),
            choices: Choices::default(),
            subparameters: Vec::new(),
            subparameter: None,
            default_value: None,
        }
    }

    pub fn string(name: &str, short_name: &str) -> Self {
        Self::new(kinds::STRING, name, short_name)
    }

    pub fn boolean(name: &str, short_name: &str) -> Self {
        Self::new(kinds::BOOLEAN, name, short_name)
    }

    pub fn choice<K, L>(name: &str, short_name: &str, options: impl IntoIterator<Item = (K, L)>) -> Self
    where
        K: Into<String>,
        L: Into<String>,
    {
        let mut info = Self::new(kinds::CHOICE, name, short_name);
        info.choices = options.into_iter().collect();
        info
    }

    pub fn collection(name: &str, short_name: &str, subparameters: Vec<ParamInfo>) -> Self {
        let mut info = Self::new(kinds::COLLECTION, name, short_name);
        info.subparameters = subparameters;
        info
    }

    pub fn array(name: &str, short_name: &str, subparameter: ParamInfo) -> Self {
        let mut info = Self::new(kinds::ARRAY, name, short_name);
        info.subparameter = Some(Box::new(subparameter));
        info
    }

    pub fn testcase(
        name: &str,
        short_name: &str,
        subparameter: ParamInfo,
        default_value: Value,
    ) -> Self {
        let mut info = Self::new(kinds::TESTCASE, name, short_name);
        info.subparameter = Some(Box::new(subparameter));
        info.default_value = Some(default_value);
        info
    }
}

// ============================================================================
// Ordered choices
// ============================================================================

/// One option of a `choice` parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub key: String,
    pub label: String,
}

/// Ordered option list, (de)serialized as a map while keeping document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Choices(Vec<Choice>);

impl Choices {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Choice> {
        self.0.iter()
    }
}

impl<K: Into<String>, L: Into<String>> FromIterator<(K, L)> for Choices {
    fn from_iter<I: IntoIterator<Item = (K, L)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, label)| Choice {
                    key: key.into(),
                    label: label.into(),
                })
                .collect(),
        )
    }
}

impl Serialize for Choices {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for choice in &self.0 {
            map.serialize_entry(&choice.key, &choice.label)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Choices {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ChoicesVisitor;

        impl<'de> Visitor<'de> for ChoicesVisitor {
            type Value = Choices;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map from option key to display label")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Choices, A::Error> {
                let mut out = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, label)) = access.next_entry::<String, String>()? {
                    out.push(Choice { key, label });
                }
                Ok(Choices(out))
            }
        }

        deserializer.deserialize_map(ChoicesVisitor)
    }
}
