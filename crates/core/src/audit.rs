//! Activity log action types and detail sanitising.
//!
//! Activity entries are append-only. Every mutating operation writes one
//! with a human-readable `detail` and, where it helps, structured metadata.

/// Known action types for activity entries.
pub mod action_types {
    pub const ORGANIZATION_CREATE: &str = "organization_create";
    pub const BRAND_UPDATE: &str = "brand_update";
    pub const CUSTOMER_CREATE: &str = "customer_create";
    pub const CUSTOMER_UPDATE: &str = "customer_update";
    pub const CUSTOMER_DELETE: &str = "customer_delete";
    pub const CUSTOMER_IMPORT: &str = "customer_import";
    pub const CAMPAIGN_CREATE: &str = "campaign_create";
    pub const CAMPAIGN_BULK_CREATE: &str = "campaign_bulk_create";
    pub const TEMPLATE_SETTINGS_UPDATE: &str = "template_settings_update";
    pub const CANVA_CONNECT: &str = "canva_connect";
    pub const CANVA_DISCONNECT: &str = "canva_disconnect";
}

/// Fields that must never be written into activity metadata.
pub const SENSITIVE_FIELDS: &[&str] = &[
    "token",
    "secret",
    "access_token",
    "refresh_token",
    "code_verifier",
    "authorization",
    "password",
];

/// Redact sensitive keys from activity metadata, recursively.
pub fn redact_sensitive_fields(value: &serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => {
            let mut redacted = serde_json::Map::new();
            for (key, val) in map {
                let lower_key = key.to_lowercase();
                if SENSITIVE_FIELDS.iter().any(|f| lower_key.contains(f)) {
                    redacted.insert(
                        key.clone(),
                        serde_json::Value::String("[REDACTED]".to_string()),
                    );
                } else {
                    redacted.insert(key.clone(), redact_sensitive_fields(val));
                }
            }
            serde_json::Value::Object(redacted)
        }
        serde_json::Value::Array(arr) => {
            serde_json::Value::Array(arr.iter().map(redact_sensitive_fields).collect())
        }
        other => other.clone(),
    }
}
