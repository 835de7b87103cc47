// Wire types for the Cacophony user API.
//
// Field names follow the API's JSON (`groupname`, `devicename`, `saltId`,
// `nameMatches`); the Rust side uses snake_case.

use serde::{Deserialize, Serialize};

use crate::auth::TokenTtl;

/// A device lookup term sent to the name-translation endpoint.
///
/// An empty `group_name` matches the device name in any group and is left
/// out of the request entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceName {
    #[serde(rename = "groupname", skip_serializing_if = "String::is_empty")]
    pub group_name: String,
    #[serde(rename = "devicename")]
    pub device_name: String,
}

/// A device returned by the name-translation endpoint.
///
/// `salt_id` is `None` for devices that were never given one (`null` or
/// missing in the JSON).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    #[serde(rename = "groupname", default)]
    pub group_name: String,
    #[serde(rename = "devicename")]
    pub device_name: String,
    #[serde(rename = "saltId", default)]
    pub salt_id: Option<u32>,
}

/// Response body of `GET /api/v1/devices/query`.
///
/// `devices` were matched through a group or a `group:device` pair,
/// `name_matches` through a bare device name.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeviceResponse {
    #[serde(default)]
    pub devices: Vec<Device>,
    #[serde(rename = "nameMatches", default)]
    pub name_matches: Vec<Device>,
}

// ── Authentication payloads ─────────────────────────────────────────

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    #[serde(rename = "nameOrEmail")]
    pub name_or_email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct TokenRequest {
    pub ttl: TokenTtl,
    pub access: TokenAccess,
}

#[derive(Debug, Serialize)]
pub(crate) struct TokenAccess {
    pub devices: &'static str,
}

/// Shared shape of `/authenticate_user` and `/token` responses.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    #[serde(default)]
    pub success: bool,
    pub token: Option<String>,
    #[serde(default)]
    pub messages: Vec<String>,
}

/// Error body: `{ "success": false, "messages": [...] }` or `{ "message": "..." }`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub messages: Vec<String>,
    pub message: Option<String>,
}
