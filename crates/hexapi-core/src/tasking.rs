//! # Tasking Module
//!
//! URL building and contract discovery for the Airbus Tasking API.

use serde_json::Value;

/// Tasking listing path. `{cisContractId}` is replaced per contract.
pub const TASKING_URI_TEMPLATE: &str = "/api/v1/{cisContractId}/taskings";

/// Tasking listing URL for one CIS contract.
pub fn tasking_url(base: &str, contract_id: &str) -> String {
    format!(
        "{}{}",
        base.trim_end_matches('/'),
        TASKING_URI_TEMPLATE.replace("{cisContractId}", contract_id)
    )
}

/// Collect CIS contract ids from a `/api/v1/me/services` document.
///
/// Every string `cisContractId` in the `items` array is returned once, in
/// order of first appearance.
pub fn cis_contract_ids(services: &Value) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    let items = services
        .get("items")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    for item in items {
        if let Some(id) = item.get("cisContractId").and_then(Value::as_str) {
            if !id.is_empty() && !ids.iter().any(|known| known == id) {
                ids.push(id.to_string());
            }
        }
    }
    ids
}
