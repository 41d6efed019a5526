use serde::Serialize;

pub const DEGREE_SCHEMA_NAME: &str = "degree schema";
pub const DEGREE_SCHEMA_VERSION: &str = "1.0";

/// Degree schema attributes, in the order they are offered.
pub const DEGREE_SCHEMA_ATTRS: [&str; 5] = ["name", "date", "degree", "birthdate_dateint", "timestamp"];

/// Revocation registry size used when `TAILS_FILE_COUNT` is not set.
pub const DEFAULT_TAILS_FILE_COUNT: u32 = 100;

#[derive(Debug, Clone, Serialize)]
pub struct SchemaRequest {
    pub schema_name: String,
    pub schema_version: String,
    pub attributes: Vec<String>,
}

impl SchemaRequest {
    pub fn degree() -> Self {
        Self {
            schema_name: DEGREE_SCHEMA_NAME.to_string(),
            schema_version: DEGREE_SCHEMA_VERSION.to_string(),
            attributes: DEGREE_SCHEMA_ATTRS.iter().map(|a| a.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CredentialDefinitionRequest {
    pub schema_id: String,
    pub tag: String,
    pub support_revocation: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revocation_registry_size: Option<u32>,
}

impl CredentialDefinitionRequest {
    /// Credential definition over `schema_id`. Registry size is only sent
    /// when revocation is supported.
    pub fn new(schema_id: &str, revocation: bool, tails_file_count: u32) -> Self {
        Self {
            schema_id: schema_id.to_string(),
            tag: "default".to_string(),
            support_revocation: revocation,
            revocation_registry_size: revocation.then_some(tails_file_count),
        }
    }
}

/// Read `key` from a ledger-write response, which carries it either at the
/// top level or under `sent` depending on the agent version.
pub fn ledger_id(resp: &serde_json::Value, key: &str) -> Option<String> {
    resp.get(key)
        .or_else(|| resp.get("sent").and_then(|s| s.get(key)))
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_degree_schema_body() {
        let body = serde_json::to_value(SchemaRequest::degree()).unwrap();
        assert_eq!(
            body,
            json!({
                "schema_name": "degree schema",
                "schema_version": "1.0",
                "attributes": ["name", "date", "degree", "birthdate_dateint", "timestamp"],
            })
        );
    }

    #[test]
    fn test_cred_def_without_revocation_omits_registry_size() {
        let body = serde_json::to_value(CredentialDefinitionRequest::new("S:1", false, 100)).unwrap();
        assert_eq!(body["support_revocation"], json!(false));
        assert!(body.get("revocation_registry_size").is_none());
    }

    #[test]
    fn test_cred_def_with_revocation() {
        let body = serde_json::to_value(CredentialDefinitionRequest::new("S:1", true, 50)).unwrap();
        assert_eq!(body["revocation_registry_size"], json!(50));
        assert_eq!(body["tag"], json!("default"));
    }

    #[test]
    fn test_ledger_id_top_level_and_sent() {
        assert_eq!(
            ledger_id(&json!({"schema_id": "a"}), "schema_id").as_deref(),
            Some("a")
        );
        assert_eq!(
            ledger_id(&json!({"sent": {"schema_id": "b"}}), "schema_id").as_deref(),
            Some("b")
        );
        assert!(ledger_id(&json!({"txn": {}}), "schema_id").is_none());
    }
}
