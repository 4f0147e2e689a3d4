//! Authentication response payloads.

use gopark_core::Role;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// JSON body shared by every endpoint.
///
/// Successful responses carry `data`, failed ones carry `error`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Extracts the payload of a successful response.
    pub fn into_data(self) -> Result<T> {
        self.data
            .ok_or_else(|| Error::Decode("response is missing the `data` field".to_owned()))
    }
}

/// Data returned by a successful login.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginData {
    /// Opaque identity token.
    pub token: String,
    /// Role of the account; unknown values read as [`Role::Guest`].
    #[serde(default, deserialize_with = "deserialize_role")]
    pub role: Role,
}

impl std::fmt::Debug for LoginData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginData")
            .field("token", &"[redacted]")
            .field("role", &self.role)
            .finish()
    }
}

/// Human-readable outcome of a non-login call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageData {
    pub message: String,
}

/// Account behind an identity token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileData {
    pub email: String,
    #[serde(default, deserialize_with = "deserialize_role")]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

fn deserialize_role<'de, D>(deserializer: D) -> std::result::Result<Role, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.as_deref().map(Role::from_stored).unwrap_or_default())
}
