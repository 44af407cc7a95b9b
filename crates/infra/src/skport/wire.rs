//! Request and response bodies of the account and zonai services
//!
//! Every field has a default: the services omit fields freely and a missing
//! value is handled by the caller's checks, not by the decoder. An explicit
//! `null` decodes to the same default as a missing field.

use std::collections::HashMap;

use endfield_domain::constants::UNKNOWN_ERROR;
use serde::{Deserialize, Deserializer, Serialize};

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Account service (as.gryphline.com)
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BasicInfoResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub status: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub msg: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantRequest<'a> {
    pub token: &'a str,
    pub app_code: &'a str,
    #[serde(rename = "type")]
    pub kind: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GrantResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub status: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub msg: String,
    pub data: Option<GrantData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GrantData {
    #[serde(deserialize_with = "null_as_default")]
    pub code: String,
}

// ---------------------------------------------------------------------------
// Zonai service (zonai.skport.com)
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct GenerateCredRequest<'a> {
    pub code: &'a str,
    pub kind: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GenerateCredResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub code: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub message: String,
    pub data: Option<GenerateCredData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerateCredData {
    #[serde(deserialize_with = "null_as_default")]
    pub cred: String,
    #[serde(deserialize_with = "null_as_default")]
    pub token: String,
    #[serde(deserialize_with = "null_as_default")]
    pub user_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BindingResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub code: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub message: String,
    pub data: Option<BindingData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BindingData {
    #[serde(deserialize_with = "null_as_default")]
    pub list: Vec<BindingApp>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BindingApp {
    #[serde(deserialize_with = "null_as_default")]
    pub app_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub binding_list: Vec<BindingEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BindingEntry {
    #[serde(deserialize_with = "null_as_default")]
    pub roles: Vec<BindingRole>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BindingRole {
    #[serde(deserialize_with = "null_as_default")]
    pub nickname: String,
    #[serde(deserialize_with = "null_as_default")]
    pub level: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub server_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub server_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub role_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AttendanceStatusResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub code: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub message: String,
    pub data: Option<AttendanceStatusData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AttendanceStatusData {
    #[serde(deserialize_with = "null_as_default")]
    pub has_today: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub records: Vec<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AttendanceClaimResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub code: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub message: String,
    pub data: Option<AttendanceClaimData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AttendanceClaimData {
    #[serde(deserialize_with = "null_as_default")]
    pub award_ids: Vec<AwardId>,
    #[serde(deserialize_with = "null_as_default")]
    pub resource_info_map: HashMap<String, ResourceInfo>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AwardId {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ResourceInfo {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub count: i64,
}

/// Message to report for a rejected response: the API's own message, else
/// the raw body, else a generic placeholder.
pub fn api_message(message: &str, body: &str) -> String {
    [message, body]
        .into_iter()
        .find(|candidate| !candidate.is_empty())
        .unwrap_or(UNKNOWN_ERROR)
        .to_string()
}
