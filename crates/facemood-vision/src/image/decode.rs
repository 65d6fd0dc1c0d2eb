// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image decoder — turns a base64 payload (optionally a `data:` URI) into a
// BGR `ColorImage`.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use facemood_core::error::{FacemoodError, Result};
use tracing::{debug, instrument};

use super::color::ColorImage;

/// Drop a `data:image/...;base64,` header if present.
///
/// Everything up to and including the first comma is removed. Payloads
/// without a comma are returned unchanged.
pub fn strip_data_uri(payload: &str) -> &str {
    match payload.split_once(',') {
        Some((_header, body)) => body,
        None => payload,
    }
}

/// Decode a base64 image payload into a BGR color image.
///
/// Accepts any container format the `image` crate was built with (PNG,
/// JPEG, ...). ASCII whitespace in the base64 text is ignored so that
/// line-wrapped encodings decode.
///
/// # Errors
///
/// Returns [`FacemoodError::Decode`] for an empty payload, malformed base64,
/// or bytes that are not a decodable image.
#[instrument(skip(payload), fields(payload_len = payload.len()))]
pub fn decode(payload: &str) -> Result<ColorImage> {
    let body = strip_data_uri(payload);
    let compact: String = body.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if compact.is_empty() {
        return Err(FacemoodError::Decode("image payload is empty".into()));
    }

    let bytes = BASE64
        .decode(compact.as_bytes())
        .map_err(|err| FacemoodError::Decode(format!("invalid base64: {}", err)))?;

    let decoded = image::load_from_memory(&bytes)
        .map_err(|err| FacemoodError::Decode(format!("unreadable image data: {}", err)))?;

    debug!(
        width = decoded.width(),
        height = decoded.height(),
        bytes = bytes.len(),
        "Image decoded from payload"
    );
    Ok(ColorImage::from_dynamic(decoded))
}
