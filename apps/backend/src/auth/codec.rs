//! Token wire format: `hex(claims_json ++ mac)`.
//!
//! `mac` is the 32-byte keyed BLAKE3 hash of `claims_json` under the key held
//! in `SecurityConfig`. The MAC is checked before the payload is parsed, so a
//! forged token never yields partially trusted claims.

use thiserror::Error;

use crate::auth::claims::Claims;

/// Length in bytes of the trailing MAC.
pub const MAC_LEN: usize = blake3::OUT_LEN;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DecodeError {
    #[error("token is not valid hex: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("token is too short to carry a MAC")]
    TooShort,
    #[error("token MAC does not match")]
    BadMac,
    #[error("token payload is not a claims record: {0}")]
    Payload(String),
}

/// Encode claims into a transport string.
///
/// Fails only if JSON serialization fails, which does not happen for `Claims`.
pub fn encode(claims: &Claims, key: &[u8; 32]) -> Result<String, serde_json::Error> {
    let payload = serde_json::to_vec(claims)?;
    Ok(seal(&payload, key))
}

/// Append the MAC to arbitrary payload bytes and hex-encode the result.
pub fn seal(payload: &[u8], key: &[u8; 32]) -> String {
    let mac = blake3::keyed_hash(key, payload);
    let mut framed = Vec::with_capacity(payload.len() + MAC_LEN);
    framed.extend_from_slice(payload);
    framed.extend_from_slice(mac.as_bytes());
    hex::encode(framed)
}

/// Decode a transport string back into claims.
pub fn decode(token: &str, key: &[u8; 32]) -> Result<Claims, DecodeError> {
    let framed = hex::decode(token)?;
    if framed.len() < MAC_LEN {
        return Err(DecodeError::TooShort);
    }

    let (payload, tag) = framed.split_at(framed.len() - MAC_LEN);
    let tag: [u8; MAC_LEN] = tag.try_into().map_err(|_| DecodeError::TooShort)?;

    // blake3::Hash equality is constant-time
    if blake3::keyed_hash(key, payload) != blake3::Hash::from_bytes(tag) {
        return Err(DecodeError::BadMac);
    }

    serde_json::from_slice(payload).map_err(|e| DecodeError::Payload(e.to_string()))
}
