//! Provider profile rows as stored by the backend and the completeness rule
//! that gates writes to the session store.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Columns selected from the `Providers` table. Any of them may be null.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderRow {
    #[serde(default)]
    pub practice: Option<Value>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// A provider profile where every field carries a usable value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderProfile {
    pub provider_id: Uuid,
    pub practice_id: String,
    pub first_name: String,
    pub last_name: String,
}

impl ProviderProfile {
    /// Builds a profile only when the practice and both names are present and
    /// non-empty. A practice id of `0`, `false` or `""` counts as missing.
    #[must_use]
    pub fn from_row(provider_id: Uuid, row: &ProviderRow) -> Option<Self> {
        let practice_id = row.practice.as_ref().and_then(practice_id)?;
        let first_name = non_empty(row.first_name.as_deref())?;
        let last_name = non_empty(row.last_name.as_deref())?;

        Some(Self {
            provider_id,
            practice_id,
            first_name,
            last_name,
        })
    }
}

fn practice_id(value: &Value) -> Option<String> {
    match value {
        Value::String(id) => non_empty(Some(id)),
        Value::Number(number) => {
            if number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()) {
                Some(number.to_string())
            } else {
                None
            }
        }
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}
