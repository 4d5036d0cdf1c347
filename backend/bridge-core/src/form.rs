//! Flattening of nested data into hidden form inputs.
//!
//! Nested keys become `parent[child]`, list entries `parent[0]`. Leaves are
//! rendered as text: dates in ISO-8601 with milliseconds, `Null` as an
//! empty string.

use crate::error::form::FormError;
use crate::host::Document;

use common::ErrorLocation;

use std::panic::Location;
use std::time::SystemTime;

use serde_json::Value;

pub const OWNER_DOCUMENT_MESSAGE: &str =
    "The \"ownerDocument\" of the \"form\" should be the a reference to the parent window!";

const INPUT_TAG: &str = "input";
const HIDDEN_TYPE: &str = "hidden";

/// Data a request submits.
#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    Date(SystemTime),
    List(Vec<FormValue>),
    /// Entries keep their insertion order.
    Map(Vec<(String, FormValue)>),
}

impl FormValue {
    pub fn map<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, FormValue)>,
    {
        FormValue::Map(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        )
    }

    fn render(&self) -> String {
        match self {
            FormValue::Null => String::new(),
            FormValue::Bool(value) => value.to_string(),
            FormValue::Number(value) => value.to_string(),
            FormValue::Text(value) => value.clone(),
            FormValue::Date(value) => humantime::format_rfc3339_millis(*value).to_string(),
            FormValue::List(_) | FormValue::Map(_) => String::new(),
        }
    }
}

impl From<&str> for FormValue {
    fn from(value: &str) -> Self {
        FormValue::Text(value.to_string())
    }
}

impl From<String> for FormValue {
    fn from(value: String) -> Self {
        FormValue::Text(value)
    }
}

impl From<bool> for FormValue {
    fn from(value: bool) -> Self {
        FormValue::Bool(value)
    }
}

impl From<f64> for FormValue {
    fn from(value: f64) -> Self {
        FormValue::Number(value)
    }
}

impl From<SystemTime> for FormValue {
    fn from(value: SystemTime) -> Self {
        FormValue::Date(value)
    }
}

impl From<Value> for FormValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => FormValue::Null,
            Value::Bool(value) => FormValue::Bool(value),
            Value::Number(number) => number
                .as_f64()
                .map(FormValue::Number)
                .unwrap_or_else(|| FormValue::Text(number.to_string())),
            Value::String(value) => FormValue::Text(value),
            Value::Array(items) => FormValue::List(items.into_iter().map(FormValue::from).collect()),
            Value::Object(entries) => FormValue::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, FormValue::from(value)))
                    .collect(),
            ),
        }
    }
}

/// Append `data` to `form` as hidden inputs.
///
/// `None` appends nothing. Fails when `form` was not created by `document`.
#[track_caller]
pub fn append_data_to_form<D: Document>(
    document: &D,
    form: &D::Element,
    data: Option<&FormValue>,
) -> Result<(), FormError> {
    let Some(data) = data else {
        return Ok(());
    };

    if !document.owns(form) {
        return Err(FormError::OwnerDocument {
            message: OWNER_DOCUMENT_MESSAGE.to_string(),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    append_value(document, form, data, "");
    Ok(())
}

fn append_value<D: Document>(document: &D, form: &D::Element, value: &FormValue, name: &str) {
    match value {
        FormValue::Map(entries) => {
            for (key, child) in entries {
                append_value(document, form, child, &nested_name(name, key));
            }
        }
        FormValue::List(items) => {
            for (index, child) in items.iter().enumerate() {
                append_value(document, form, child, &nested_name(name, &index.to_string()));
            }
        }
        leaf => append_input(document, form, name, &leaf.render()),
    }
}

fn nested_name(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}[{key}]")
    }
}

fn append_input<D: Document>(document: &D, form: &D::Element, name: &str, value: &str) {
    let input = document.create_element(INPUT_TAG);
    document.set_attribute(&input, "name", name);
    document.set_attribute(&input, "value", value);
    document.set_attribute(&input, "type", HIDDEN_TYPE);
    document.append_child(form, &input);
}
