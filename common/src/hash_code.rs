//! Deterministic 32-bit string hash.
//!
//! The loader proves to the content script that it is talking to the
//! expected parent by sending the hash of the session id before the id
//! itself. Both sides must agree bit for bit, so the algorithm is fixed:
//! `hash = hash * 31 + unit` over UTF-16 code units, wrapping at 32 bits.

/// Hash a string with the polynomial rolling hash over its UTF-16 code units.
///
/// Returns `0` for the empty string. The result may be negative.
pub fn hash_code(value: &str) -> i32 {
    value.encode_utf16().fold(0i32, |hash, unit| {
        (hash << 5).wrapping_sub(hash).wrapping_add(i32::from(unit))
    })
}

/// The challenge value exchanged during the handshake: the base-10 hash of `session_id`.
pub fn handshake_secret(session_id: &str) -> String {
    hash_code(session_id).to_string()
}
