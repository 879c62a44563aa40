//! Schema path resolution
//!
//! Raw schema documents are held as `serde_json::Value`, whatever format they
//! arrived in. Lookups only ever use the first segment of a dotted type path:
//! `Postgres.PostgresSpec.UserSpec` resolves `definitions["typedir.Postgres"]`.

use crate::error::DiscoveryError;
use serde_json::{Map, Value};

/// Prefix of the definition keys looked up for a kind
pub const DEFINITION_PREFIX: &str = "typedir.";

/// Split a dotted type path into its first segment (the kind) and its last segment
///
/// A path without dots yields the same segment twice.
pub fn split_type_path(path: &str) -> (&str, &str) {
    let kind = path.split('.').next().unwrap_or(path);
    let leaf = path.rsplit('.').next().unwrap_or(path);
    (kind, leaf)
}

/// Definition key for a kind
pub fn definition_key(kind: &str) -> String {
    format!("{}{}", DEFINITION_PREFIX, kind)
}

/// Parse raw schema bytes as JSON, falling back to YAML
pub fn parse_schema(raw: &[u8]) -> Result<Value, DiscoveryError> {
    match serde_json::from_slice::<Value>(raw) {
        Ok(value) => Ok(value),
        Err(json_err) => serde_yaml::from_slice::<Value>(raw).map_err(|yaml_err| {
            DiscoveryError::SchemaMalformed(format!(
                "not valid JSON ({}) or YAML ({})",
                json_err, yaml_err
            ))
        }),
    }
}

/// The `definitions` section of a schema document
pub fn definitions(document: &Value) -> Result<&Map<String, Value>, DiscoveryError> {
    let root = document.as_object().ok_or_else(|| {
        DiscoveryError::SchemaMalformed(format!(
            "expected a mapping at the document root, found {}",
            value_type(document)
        ))
    })?;

    match root.get("definitions") {
        Some(Value::Object(defs)) => Ok(defs),
        Some(other) => Err(DiscoveryError::SchemaMalformed(format!(
            "expected `definitions` to be a mapping, found {}",
            value_type(other)
        ))),
        None => Err(DiscoveryError::DefinitionNotFound(
            "definitions".to_string(),
        )),
    }
}

/// Look up the definition for the kind named by `dotted_path` and serialize it
pub fn resolve(document: &Value, dotted_path: &str) -> Result<String, DiscoveryError> {
    let (kind, _leaf) = split_type_path(dotted_path);
    let key = definition_key(kind);

    let definition = definitions(document)?
        .get(&key)
        .ok_or_else(|| DiscoveryError::DefinitionNotFound(key.clone()))?;

    serde_json::to_string(definition)
        .map_err(|e| DiscoveryError::SchemaMalformed(format!("cannot serialize {}: {}", key, e)))
}

fn value_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_split_type_path() {
        assert_eq!(
            split_type_path("Postgres.PostgresSpec.UserSpec"),
            ("Postgres", "UserSpec")
        );
        assert_eq!(split_type_path("Postgres"), ("Postgres", "Postgres"));
        assert_eq!(split_type_path(""), ("", ""));
    }

    #[test]
    fn test_resolve_ignores_trailing_segments() {
        let doc = json!({
            "definitions": {
                "typedir.Postgres": {
                    "properties": {"spec": {"type": "object"}}
                },
                "typedir.UserSpec": {"type": "string"}
            }
        });

        let resolved = resolve(&doc, "Postgres.PostgresSpec.UserSpec").unwrap();
        assert_eq!(resolved, r#"{"properties":{"spec":{"type":"object"}}}"#);
    }

    #[test]
    fn test_resolve_missing_definition() {
        let doc = json!({"definitions": {"typedir.Moodle": {}}});
        assert_eq!(
            resolve(&doc, "Postgres.PostgresSpec"),
            Err(DiscoveryError::DefinitionNotFound(
                "typedir.Postgres".to_string()
            ))
        );
    }

    #[test]
    fn test_resolve_rejects_non_mapping_documents() {
        assert!(matches!(
            resolve(&json!(["definitions"]), "Postgres"),
            Err(DiscoveryError::SchemaMalformed(_))
        ));
        assert!(matches!(
            resolve(&json!({"definitions": "nope"}), "Postgres"),
            Err(DiscoveryError::SchemaMalformed(_))
        ));
    }

    #[test]
    fn test_parse_schema_accepts_yaml() {
        let raw = b"definitions:\n  typedir.Postgres:\n    type: object\n";
        let doc = parse_schema(raw).unwrap();
        assert_eq!(resolve(&doc, "Postgres").unwrap(), r#"{"type":"object"}"#);
    }

    #[test]
    fn test_parse_schema_rejects_garbage() {
        assert!(matches!(
            parse_schema(b"{ not: [valid"),
            Err(DiscoveryError::SchemaMalformed(_))
        ));
    }
}
