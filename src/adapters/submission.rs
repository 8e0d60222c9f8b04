//! Rebuild a value tree from submitted form fields.
//!
//! Works purely from the naming scheme: a field's name is derived the same way
//! the widgets derived it, and array membership comes from the `_has_row`
//! markers, so gaps left by removed rows are skipped. Values are not
//! validated; numbers that fail to parse are kept as strings.

use serde_json::{Number, Value};
use std::collections::HashMap;

use crate::domain::param_info::{kinds, ParamInfo};
use crate::widgets::naming::{self, FieldPrefix};

/// Submitted `(name, value)` pairs, indexed by name.
#[derive(Debug, Default)]
pub struct Submission {
    fields: HashMap<String, Vec<String>>,
}

impl Submission {
    pub fn new<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut fields: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in pairs {
            fields.entry(name.into()).or_default().push(value.into());
        }
        Self { fields }
    }

    fn first(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    fn all(&self, name: &str) -> &[String] {
        self.fields.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }
}

/// Decode the parameter `schema` rooted at `prefix`.
pub fn decode_submission(
    schema: &ParamInfo,
    prefix: &str,
    submission: &Submission,
    testcases: usize,
) -> Value {
    decode(schema, &FieldPrefix::root(prefix), submission, testcases)
}

fn decode(info: &ParamInfo, prefix: &FieldPrefix, submission: &Submission, testcases: usize) -> Value {
    let name = prefix.field_name(&info.short_name);
    match info.kind.as_str() {
        kinds::BOOLEAN => Value::Bool(submission.contains(&name)),
        kinds::INT | kinds::FLOAT => submission
            .first(&name)
            .map(|raw| parse_number(raw, info.kind == kinds::INT))
            .unwrap_or(Value::Null),
        kinds::COLLECTION => Value::Array(
            info.subparameters
                .iter()
                .enumerate()
                .map(|(position, sub)| {
                    decode(sub, &prefix.child(&info.short_name, position), submission, testcases)
                })
                .collect(),
        ),
        kinds::ARRAY => {
            let Some(sub) = info.subparameter.as_deref() else {
                return Value::Null;
            };
            let indices = submission
                .all(&naming::has_row_name(&name))
                .iter()
                .filter_map(|raw| raw.trim().parse::<usize>().ok());
            Value::Array(
                indices
                    .map(|index| decode(sub, &prefix.child(&info.short_name, index), submission, testcases))
                    .collect(),
            )
        }
        kinds::TESTCASE => {
            let Some(sub) = info.subparameter.as_deref() else {
                return Value::Null;
            };
            Value::Array(
                (0..testcases)
                    .map(|index| decode(sub, &prefix.child(&info.short_name, index), submission, testcases))
                    .collect(),
            )
        }
        // string, choice and custom kinds travel as plain text
        _ => submission
            .first(&name)
            .map(|raw| Value::String(raw.to_string()))
            .unwrap_or(Value::Null),
    }
}

fn parse_number(raw: &str, integer: bool) -> Value {
    let trimmed = raw.trim();
    if integer {
        if let Ok(n) = trimmed.parse::<i64>() {
            return Value::Number(n.into());
        }
    } else if let Some(n) = trimmed.parse::<f64>().ok().and_then(Number::from_f64) {
        return Value::Number(n);
    }
    Value::String(raw.to_string())
}
