//! Reversible encoding of arbitrary text into HTTP header values.
//!
//! Header values are restricted to visible ISO-8859-1 bytes. Text that fits is sent
//! as-is (one byte per character); anything else is sent as its UTF-8 bytes in
//! base64 behind the [`BASE64_MARKER`] prefix, which browsers can detect and undo.

use axum::http::HeaderValue;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::fmt;

/// Prefix that marks a base64-wrapped header value.
///
/// `:` is outside the base64 alphabet, so the marker can never occur inside the
/// encoded payload itself.
pub const BASE64_MARKER: &str = "base64:";

/// Header codec errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CodecError {
    #[error("Invalid base64 payload: {0}")]
    InvalidBase64(String),

    #[error("Decoded payload is not valid UTF-8: {0}")]
    InvalidUtf8(String),
}

/// A header-safe representation of some text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodedHeaderValue {
    /// Text that is representable as-is
    Plain(String),
    /// Base64 of the UTF-8 bytes, without the marker
    Base64(String),
}

impl EncodedHeaderValue {
    /// Raw header bytes: ISO-8859-1 for plain text, ASCII for the wrapper.
    pub fn to_header_bytes(&self) -> Vec<u8> {
        match self {
            // Every char was checked to be <= U+00FF in `encode`
            EncodedHeaderValue::Plain(text) => text.chars().map(|c| c as u32 as u8).collect(),
            EncodedHeaderValue::Base64(payload) => {
                format!("{BASE64_MARKER}{payload}").into_bytes()
            }
        }
    }

    /// Convert into an axum header value.
    pub fn to_header_value(&self) -> HeaderValue {
        match HeaderValue::from_bytes(&self.to_header_bytes()) {
            Ok(value) => value,
            // `encode` only produces bytes HTTP accepts; wrap as a last resort
            Err(_) => {
                let wrapped = format!("{BASE64_MARKER}{}", STANDARD.encode(self.to_string()));
                HeaderValue::from_bytes(wrapped.as_bytes())
                    .unwrap_or_else(|_| HeaderValue::from_static(""))
            }
        }
    }
}

impl fmt::Display for EncodedHeaderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodedHeaderValue::Plain(text) => write!(f, "{text}"),
            EncodedHeaderValue::Base64(payload) => write!(f, "{BASE64_MARKER}{payload}"),
        }
    }
}

/// Whether a character may travel unchanged in a header value.
///
/// ISO-8859-1 range, minus the control characters HTTP forbids (TAB is allowed).
fn is_header_safe(c: char) -> bool {
    let code = c as u32;
    code <= 0xFF && (code == 0x09 || (code >= 0x20 && code != 0x7F))
}

/// Encode text for transport in a header.
///
/// Never fails. Plain text that happens to start with the marker is wrapped too,
/// so [`decode`] can never mistake it for an encoded value.
pub fn encode(text: &str) -> EncodedHeaderValue {
    if !text.starts_with(BASE64_MARKER) && text.chars().all(is_header_safe) {
        EncodedHeaderValue::Plain(text.to_string())
    } else {
        EncodedHeaderValue::Base64(STANDARD.encode(text.as_bytes()))
    }
}

/// Decode a header value produced by [`encode`], given as text.
pub fn decode(value: &str) -> Result<String, CodecError> {
    match value.strip_prefix(BASE64_MARKER) {
        Some(payload) => {
            let bytes = STANDARD
                .decode(payload.trim())
                .map_err(|e| CodecError::InvalidBase64(e.to_string()))?;
            String::from_utf8(bytes).map_err(|e| CodecError::InvalidUtf8(e.to_string()))
        }
        None => Ok(value.to_string()),
    }
}

/// Decode raw header bytes (as read off the wire) produced by [`encode`].
pub fn decode_bytes(bytes: &[u8]) -> Result<String, CodecError> {
    let text: String = bytes.iter().map(|&b| b as char).collect();
    decode(&text)
}
