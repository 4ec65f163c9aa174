//! Cursor codec: opaque album identifiers are base64-encoded resource URIs.
//!
//! # Design
//! `decode` is deliberately lenient about padding so cursors that went
//! through URL mangling still resolve; `encode` always produces the padded
//! canonical form. Round-tripping an alias through `decode` + `encode`
//! therefore yields the canonical cursor for the same resource.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::Engine;

use crate::error::ClientError;

/// Accepts both padded and unpadded input.
const RELAXED: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decode a cursor into the resource URI it names.
///
/// Fails with [`ClientError::Decode`] on anything that is not base64 over
/// UTF-8 text; no network request may be issued for a cursor this rejects.
pub fn decode(cursor: &str) -> Result<String, ClientError> {
    let cursor = cursor.trim();
    if cursor.is_empty() {
        return Err(ClientError::Decode("empty cursor".to_string()));
    }
    let bytes = RELAXED
        .decode(cursor)
        .map_err(|e| ClientError::Decode(e.to_string()))?;
    let uri = String::from_utf8(bytes)
        .map_err(|_| ClientError::Decode("decoded identifier is not valid UTF-8".to_string()))?;
    if uri.is_empty() {
        return Err(ClientError::Decode("empty resource identifier".to_string()));
    }
    Ok(uri)
}

/// Encode a resource URI into its canonical cursor form.
pub fn encode(uri: &str) -> String {
    STANDARD.encode(uri)
}
