//! Field naming scheme.
//!
//! Every form control is named `prefix + short_name`. A composite passes
//! `prefix + short_name + "_" + key + "_"` to each child, where `key` is the
//! child's position (collection) or element index (array). Element indices are
//! never reused, so names stay unique after rows are removed and re-added.

use std::fmt;

/// Accumulated name segment carried down the widget recursion.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FieldPrefix(String);

impl FieldPrefix {
    /// Caller-supplied root, used verbatim.
    pub fn root(prefix: impl Into<String>) -> Self {
        Self(prefix.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the control owned by the parameter `short_name`.
    pub fn field_name(&self, short_name: &str) -> String {
        format!("{}{}", self.0, short_name)
    }

    /// Prefix handed to the child stored under `key` of `short_name`.
    pub fn child(&self, short_name: &str, key: impl fmt::Display) -> Self {
        Self(format!("{}{}_{}_", self.0, short_name, key))
    }
}

impl fmt::Display for FieldPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Array element identifiers
// ============================================================================

/// Hidden marker input carrying each live element index.
pub fn has_row_name(array_key: &str) -> String {
    format!("{}_has_row", array_key)
}

pub fn row_id(array_key: &str, index: usize) -> String {
    format!("{}_row_{}", array_key, index)
}

pub fn table_id(array_key: &str) -> String {
    format!("element_table_{}", array_key)
}

pub fn add_control_id(array_key: &str) -> String {
    format!("add_element_{}", array_key)
}

pub fn remove_control_id(array_key: &str, index: usize) -> String {
    format!("remove_element_{}_{}", array_key, index)
}
