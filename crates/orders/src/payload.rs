//! Incoming JSON payloads and their field-level validation.
//!
//! Fields are held as raw JSON values so a wrongly typed field turns into a
//! message under that field instead of rejecting the whole body.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use orderdesk_core::{DomainError, DomainResult, FieldErrors, OrderTagId};

use crate::{NewOrder, NewOrderTag, DATE_FORMAT, TAG_NAME_MAX_LEN};

pub(crate) const REQUIRED: &str = "This field is required.";
pub(crate) const BLANK: &str = "This field may not be blank.";
pub(crate) const NULL: &str = "This field may not be null.";
pub(crate) const BAD_DATE: &str = "Date has wrong format. Use one of these formats instead: YYYY-MM-DD.";
const NOT_A_STRING: &str = "Not a valid string.";
const NOT_A_BOOLEAN: &str = "Must be a valid boolean.";

pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

/// Keeps an explicit `null` apart from an absent key (`None`).
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Type name used in "got type"/"received" messages.
fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "NoneType",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

fn required_date(field: &str, raw: Option<&Value>, errors: &mut FieldErrors) -> Option<NaiveDate> {
    let message = match raw {
        None => REQUIRED,
        Some(Value::Null) => NULL,
        Some(Value::String(raw)) => match parse_date(raw) {
            Some(date) => return Some(date),
            None => BAD_DATE,
        },
        Some(_) => BAD_DATE,
    };
    errors.add(field, message);
    None
}

fn tag_ref(item: &Value) -> Result<OrderTagId, String> {
    let id = match item {
        Value::Null => return Err(NULL.to_string()),
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    id.map(OrderTagId::new).ok_or_else(|| {
        format!("Incorrect type. Expected pk value, received {}.", type_name(item))
    })
}

/// Body of `POST /` (order creation).
///
/// `is_active` is not accepted here: every order starts active.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderPayload {
    #[serde(default, deserialize_with = "present")]
    pub start_date: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub embargo_date: Option<Value>,
    /// List of tag pks; optional.
    #[serde(default, deserialize_with = "present")]
    pub tags: Option<Value>,
}

impl OrderPayload {
    /// Well-formed tag ids referenced by the payload, distinct and ascending.
    pub fn tag_ids(&self) -> Vec<OrderTagId> {
        self.parse_tags().0.into_iter().collect()
    }

    fn parse_tags(&self) -> (BTreeSet<OrderTagId>, Vec<String>) {
        let mut ids = BTreeSet::new();
        let mut problems = Vec::new();
        match &self.tags {
            None => {}
            Some(Value::Null) => problems.push(NULL.to_string()),
            Some(Value::Array(items)) => {
                for item in items {
                    match tag_ref(item) {
                        Ok(id) => {
                            ids.insert(id);
                        }
                        Err(message) => problems.push(message),
                    }
                }
            }
            Some(other) => problems.push(format!(
                "Expected a list of items but got type \"{}\".",
                type_name(other)
            )),
        }
        (ids, problems)
    }

    /// Validate against the set of tag ids known to exist.
    ///
    /// All problems are collected before returning so the caller gets every
    /// field message in one response.
    pub fn validate(self, existing_tags: &[OrderTagId]) -> DomainResult<NewOrder> {
        let mut errors = FieldErrors::new();

        let start_date = required_date("start_date", self.start_date.as_ref(), &mut errors);
        let embargo_date = required_date("embargo_date", self.embargo_date.as_ref(), &mut errors);

        let (tags, problems) = self.parse_tags();
        for message in problems {
            errors.add("tags", message);
        }
        for tag in &tags {
            if !existing_tags.contains(tag) {
                errors.add("tags", format!("Invalid pk \"{tag}\" - object does not exist."));
            }
        }

        errors.into_result()?;
        // Both dates parsed whenever no field error was recorded.
        let (Some(start_date), Some(embargo_date)) = (start_date, embargo_date) else {
            return Err(DomainError::validation("start_date", REQUIRED));
        };

        Ok(NewOrder {
            start_date,
            embargo_date,
            tags: tags.into_iter().collect(),
        })
    }
}

/// Body of `POST /tags/`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderTagPayload {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub is_active: Option<Value>,
}

fn parse_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::Number(n) => match n.as_i64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "t" | "1" | "yes" | "y" | "on" => Some(true),
            "false" | "f" | "0" | "no" | "n" | "off" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

impl OrderTagPayload {
    pub fn validate(self) -> DomainResult<NewOrderTag> {
        let mut errors = FieldErrors::new();

        let raw_name = match &self.name {
            None => Err(REQUIRED),
            Some(Value::Null) => Err(NULL),
            Some(Value::String(s)) => Ok(s.trim().to_string()),
            Some(Value::Number(n)) => Ok(n.to_string()),
            Some(_) => Err(NOT_A_STRING),
        };
        let name = match raw_name {
            Err(message) => {
                errors.add("name", message);
                String::new()
            }
            Ok(name) if name.is_empty() => {
                errors.add("name", BLANK);
                String::new()
            }
            Ok(name) if name.chars().count() > TAG_NAME_MAX_LEN => {
                errors.add(
                    "name",
                    format!("Ensure this field has no more than {TAG_NAME_MAX_LEN} characters."),
                );
                String::new()
            }
            Ok(name) => name,
        };

        let is_active = match &self.is_active {
            None => true,
            Some(Value::Null) => {
                errors.add("is_active", NULL);
                true
            }
            Some(value) => parse_flag(value).unwrap_or_else(|| {
                errors.add("is_active", NOT_A_BOOLEAN);
                true
            }),
        };

        errors.into_result()?;
        Ok(NewOrderTag { name, is_active })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn order(body: Value) -> OrderPayload {
        serde_json::from_value(body).unwrap()
    }

    fn tag(body: Value) -> OrderTagPayload {
        serde_json::from_value(body).unwrap()
    }

    fn messages(err: &DomainError, field: &str) -> Vec<String> {
        err.field_errors()
            .and_then(|f| f.get(field))
            .map(<[String]>::to_vec)
            .unwrap_or_default()
    }

    #[test]
    fn valid_payload_produces_new_order() {
        let known = [OrderTagId::new(1), OrderTagId::new(2)];
        let new = order(json!({"start_date": "2024-01-01", "embargo_date": "2024-12-31", "tags": [2, 1, 2]}))
            .validate(&known)
            .unwrap();

        assert_eq!(new.start_date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(new.embargo_date, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
        assert_eq!(new.tags, vec![OrderTagId::new(1), OrderTagId::new(2)]);
    }

    #[test]
    fn inverted_window_is_accepted() {
        let new = order(json!({"start_date": "2024-12-31", "embargo_date": "2024-01-01"}))
            .validate(&[])
            .unwrap();
        assert!(new.start_date > new.embargo_date);
        assert!(new.tags.is_empty());
    }

    #[test]
    fn missing_fields_are_reported_together() {
        let err = order(json!({})).validate(&[]).unwrap_err();

        assert_eq!(messages(&err, "start_date"), vec![REQUIRED]);
        assert_eq!(messages(&err, "embargo_date"), vec![REQUIRED]);
        assert!(messages(&err, "tags").is_empty());
    }

    #[test]
    fn malformed_date_and_unknown_tag_are_reported() {
        let err = order(json!({"start_date": "01/02/2024", "embargo_date": "2024-12-31", "tags": [9]}))
            .validate(&[OrderTagId::new(1)])
            .unwrap_err();

        assert_eq!(messages(&err, "start_date"), vec![BAD_DATE]);
        assert_eq!(messages(&err, "tags"), vec!["Invalid pk \"9\" - object does not exist."]);
        assert!(messages(&err, "embargo_date").is_empty());
    }

    #[test]
    fn wrongly_typed_order_fields_are_field_errors() {
        let err = order(json!({"start_date": 20240101, "embargo_date": null, "tags": null}))
            .validate(&[])
            .unwrap_err();

        assert_eq!(messages(&err, "start_date"), vec![BAD_DATE]);
        assert_eq!(messages(&err, "embargo_date"), vec![NULL]);
        assert_eq!(messages(&err, "tags"), vec![NULL]);
    }

    #[test]
    fn tags_must_be_a_list_of_pks() {
        let dates = |tags: Value| json!({"start_date": "2024-01-01", "embargo_date": "2024-12-31", "tags": tags});

        let err = order(dates(json!("1"))).validate(&[]).unwrap_err();
        assert_eq!(messages(&err, "tags"), vec!["Expected a list of items but got type \"str\"."]);

        let err = order(dates(json!([true, "x", 1.5]))).validate(&[]).unwrap_err();
        assert_eq!(
            messages(&err, "tags"),
            vec![
                "Incorrect type. Expected pk value, received bool.",
                "Incorrect type. Expected pk value, received str.",
                "Incorrect type. Expected pk value, received float.",
            ]
        );

        let payload = order(dates(json!(["3", 1])));
        assert_eq!(payload.tag_ids(), vec![OrderTagId::new(1), OrderTagId::new(3)]);
    }

    #[test]
    fn tag_name_is_trimmed_and_defaults_active() {
        let new = tag(json!({"name": "  priority "})).validate().unwrap();

        assert_eq!(new.name, "priority");
        assert!(new.is_active);
    }

    #[test]
    fn tag_name_rules() {
        let missing = tag(json!({})).validate().unwrap_err();
        assert_eq!(messages(&missing, "name"), vec![REQUIRED]);

        let blank = tag(json!({"name": "   "})).validate().unwrap_err();
        assert_eq!(messages(&blank, "name"), vec![BLANK]);

        let long = tag(json!({"name": "x".repeat(TAG_NAME_MAX_LEN + 1), "is_active": false}))
            .validate()
            .unwrap_err();
        assert_eq!(messages(&long, "name").len(), 1);

        let exact = tag(json!({"name": "x".repeat(TAG_NAME_MAX_LEN), "is_active": false}))
            .validate()
            .unwrap();
        assert!(!exact.is_active);
    }

    #[test]
    fn wrongly_typed_tag_fields_are_field_errors() {
        let err = tag(json!({"name": null, "is_active": "maybe"})).validate().unwrap_err();
        assert_eq!(messages(&err, "name"), vec![NULL]);
        assert_eq!(messages(&err, "is_active"), vec![NOT_A_BOOLEAN]);

        let err = tag(json!({"name": ["a"]})).validate().unwrap_err();
        assert_eq!(messages(&err, "name"), vec![NOT_A_STRING]);

        let new = tag(json!({"name": 42, "is_active": "false"})).validate().unwrap();
        assert_eq!(new.name, "42");
        assert!(!new.is_active);
    }
}
