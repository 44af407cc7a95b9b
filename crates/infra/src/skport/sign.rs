//! Request signature (`Sign` header)
//!
//! `md5_hex(hmac_sha256_hex(salt, path + timestamp + header_json))`, where
//! `header_json` is the compact JSON of [`SignatureHeaders`] in declaration
//! order. The server recomputes this from the `Timestamp` header, so a
//! signature is only valid together with the timestamp it was built from.

use endfield_domain::constants::{PLATFORM, VNAME};
use hmac::{Hmac, Mac};
use md5::{Digest, Md5};
use serde::Serialize;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Header object folded into the signed string. Field order is significant.
#[derive(Serialize)]
struct SignatureHeaders<'a> {
    platform: &'a str,
    timestamp: &'a str,
    #[serde(rename = "dId")]
    device_id: &'a str,
    #[serde(rename = "vName")]
    version_name: &'a str,
}

/// Canonical string the HMAC is computed over.
pub fn canonical_string(path: &str, timestamp: &str) -> String {
    let headers =
        SignatureHeaders { platform: PLATFORM, timestamp, device_id: "", version_name: VNAME };
    // A struct of string slices always serializes.
    let header_json = serde_json::to_string(&headers).unwrap_or_default();
    format!("{path}{timestamp}{header_json}")
}

/// Compute the `Sign` header value: 32 lowercase hex characters.
pub fn compute_signature(path: &str, timestamp: &str, salt: &str) -> String {
    let message = canonical_string(path, timestamp);

    let mut mac = match HmacSha256::new_from_slice(salt.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => unreachable!("HMAC accepts keys of any length"),
    };
    mac.update(message.as_bytes());
    let hmac_hex = hex::encode(mac.finalize().into_bytes());

    hex::encode(Md5::digest(hmac_hex.as_bytes()))
}
