//! Form fields to nested JSON payload.

use serde_json::{Map, Value};

use super::form::{FieldKey, FormFields};

/// Nested JSON object built from one form submission.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload {
    root: Map<String, Value>,
}

impl Payload {
    pub fn group(&self, name: &str) -> Option<&Map<String, Value>> {
        self.root.get(name).and_then(Value::as_object)
    }

    pub fn group_mut(&mut self, name: &str) -> Option<&mut Map<String, Value>> {
        self.root.get_mut(name).and_then(Value::as_object_mut)
    }

    /// Remove a group so it can be replaced with a normalized form.
    pub fn take_group(&mut self, name: &str) -> Option<Map<String, Value>> {
        match self.root.remove(name) {
            Some(Value::Object(map)) => Some(map),
            Some(other) => {
                self.root.insert(name.to_string(), other);
                None
            }
            None => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.root.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.root.insert(key.into(), value);
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.root
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.root)
    }
}

/// Regroup `group[field]` names into nested objects; other names map
/// straight through.
pub fn build_payload(fields: &FormFields) -> Payload {
    let mut root = Map::new();
    for (name, value) in fields.iter() {
        let text = Value::String(value.as_text().to_string());
        match FieldKey::parse(name) {
            FieldKey::Flat(key) => {
                // A group of the same name already owns this slot.
                if !matches!(root.get(key), Some(Value::Object(_))) {
                    root.insert(key.to_string(), text);
                }
            }
            FieldKey::Grouped { group, field } => {
                let slot = root
                    .entry(group.to_string())
                    .or_insert_with(|| Value::Object(Map::new()));
                if !slot.is_object() {
                    *slot = Value::Object(Map::new());
                }
                if let Value::Object(map) = slot {
                    map.insert(field.to_string(), text);
                }
            }
        }
    }
    Payload { root }
}

/// Turn checkbox strings into booleans: `"on"` is true, `"off"` is false.
/// Objects are walked recursively; arrays are left alone.
pub fn coerce_checkboxes(value: &mut Value) {
    let checked = match value {
        Value::String(text) => match text.as_str() {
            "on" => Some(true),
            "off" => Some(false),
            _ => None,
        },
        Value::Object(map) => {
            map.values_mut().for_each(coerce_checkboxes);
            None
        }
        _ => None,
    };
    if let Some(checked) = checked {
        *value = Value::Bool(checked);
    }
}

impl Payload {
    pub fn coerce_checkboxes(&mut self) {
        self.root.values_mut().for_each(coerce_checkboxes);
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> FormFields {
        pairs.iter().copied().collect()
    }

    #[test]
    fn bracket_keys_become_nested_objects() {
        let payload = build_payload(&fields(&[
            ("genTarget", "s3"),
            ("targetPoint[provider]", "aws"),
            ("targetPoint[bucket]", "b1"),
            ("sourceFilter[minSize]", "1"),
        ]));

        assert_eq!(
            payload.into_value(),
            json!({
                "genTarget": "s3",
                "targetPoint": {"provider": "aws", "bucket": "b1"},
                "sourceFilter": {"minSize": "1"}
            })
        );
    }

    #[test]
    fn no_bracketed_key_survives_at_top_level() {
        let payload = build_payload(&fields(&[("a[x]", "1"), ("a[y]", "2")]));
        assert!(payload.get("a[x]").is_none());
        assert!(payload.get("a[y]").is_none());
        assert_eq!(payload.get("a"), Some(&json!({"x": "1", "y": "2"})));
    }

    #[test]
    fn group_wins_over_flat_key_of_same_name() {
        let before = build_payload(&fields(&[("a", "flat"), ("a[x]", "1")]));
        let after = build_payload(&fields(&[("a[x]", "1"), ("a", "flat")]));
        assert_eq!(before.get("a"), Some(&json!({"x": "1"})));
        assert_eq!(after.get("a"), Some(&json!({"x": "1"})));
    }

    #[test]
    fn flat_input_is_unchanged() {
        let input = fields(&[("path", "/tmp"), ("host", "db")]);
        let once = build_payload(&input);
        assert_eq!(once.clone().into_value(), json!({"path": "/tmp", "host": "db"}));

        let mut again = FormFields::new();
        for (key, value) in once.as_map() {
            again.push_text(key.clone(), value.as_str().unwrap_or_default());
        }
        assert_eq!(build_payload(&again), once);
    }

    #[test]
    fn checkbox_strings_become_booleans_recursively() {
        let mut value = json!({
            "checkCSV": "on",
            "checkSQL": "off",
            "sizeCSV": "10",
            "dummy": {"checkZIP": "on", "nested": {"checkTXT": "off"}},
            "tags": ["on", "off"]
        });
        coerce_checkboxes(&mut value);
        assert_eq!(
            value,
            json!({
                "checkCSV": true,
                "checkSQL": false,
                "sizeCSV": "10",
                "dummy": {"checkZIP": true, "nested": {"checkTXT": false}},
                "tags": ["on", "off"]
            })
        );
    }

    #[test]
    fn other_strings_pass_through() {
        for raw in ["On", "true", "", "off ", "1"] {
            let mut value = Value::String(raw.to_string());
            coerce_checkboxes(&mut value);
            assert_eq!(value, Value::String(raw.to_string()));
        }
    }

    #[test]
    fn take_group_leaves_scalars_in_place() {
        let mut payload = build_payload(&fields(&[("sourceFilter", "x")]));
        assert!(payload.take_group("sourceFilter").is_none());
        assert_eq!(payload.get("sourceFilter"), Some(&json!("x")));
    }
}
