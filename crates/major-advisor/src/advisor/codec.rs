//! Share tokens: a recommendation serialized to JSON and wrapped in URL-safe
//! base64 so it can travel as a query parameter without any server state.

use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine;
use tracing::debug;

use super::domain::Recommendation;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("unable to serialize recommendation: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Encodes a recommendation as an unpadded URL-safe token.
pub fn encode(recommendation: &Recommendation) -> Result<String, CodecError> {
    let json = serde_json::to_vec(recommendation)?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

/// Inverse of [`encode`]. Any malformed, truncated or inconsistent token
/// yields `None`.
///
/// Tokens in the standard base64 alphabet, padded or not, are also accepted.
pub fn decode(token: &str) -> Option<Recommendation> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }

    let bytes = match decode_bytes(token) {
        Some(bytes) => bytes,
        None => {
            debug!("share token is not valid base64");
            return None;
        }
    };

    let recommendation: Recommendation = match serde_json::from_slice(&bytes) {
        Ok(recommendation) => recommendation,
        Err(err) => {
            debug!(%err, "share token does not contain a recommendation");
            return None;
        }
    };

    if let Some(defect) = recommendation.structural_defect() {
        debug!(defect, "share token rejected");
        return None;
    }

    Some(recommendation)
}

fn decode_bytes(token: &str) -> Option<Vec<u8>> {
    let unpadded = token.trim_end_matches('=');
    URL_SAFE_NO_PAD
        .decode(unpadded)
        .or_else(|_| STANDARD_NO_PAD.decode(unpadded))
        .or_else(|_| STANDARD.decode(token))
        .ok()
}
