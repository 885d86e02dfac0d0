use serde_json::{Map, Value};

use crate::{
    error::{AppError, Result},
    models::{ParameterGroup, ParameterItem},
};

/// Decodes the `parameters` field: a JSON array of `{title, items}` groups.
pub fn parse_parameters(raw: &str) -> Result<Vec<ParameterGroup>> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|_| AppError::BadRequest("Invalid parameters format".to_string()))?;

    let Value::Array(groups) = value else {
        return Err(AppError::BadRequest(
            "Parameters must be an array".to_string(),
        ));
    };

    Ok(normalize_parameters(&groups))
}

/// Drops entries that are not JSON objects and fills missing strings with `""`.
pub fn normalize_parameters(groups: &[Value]) -> Vec<ParameterGroup> {
    groups
        .iter()
        .filter_map(Value::as_object)
        .map(|group| ParameterGroup {
            title: string_field(group, "title"),
            items: group
                .get("items")
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .filter_map(Value::as_object)
                        .map(|item| ParameterItem {
                            title: string_field(item, "title"),
                            subtitle: string_field(item, "subtitle"),
                        })
                        .collect()
                })
                .unwrap_or_default(),
        })
        .collect()
}

fn string_field(object: &Map<String, Value>, key: &str) -> String {
    object
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
