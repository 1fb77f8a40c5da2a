//! Encodes payment requests as QR images and decodes scanned images back.
//!
//! The payload is a compact JSON object with exactly two required fields,
//! `identifier` and `amount`. Extra fields are ignored on decode. The
//! payload carries no signature and no expiry, so a generated code stays
//! scannable for as long as it is displayed.

use image::{GrayImage, Luma};
use qrcode::QrCode;

use crate::{Error, account::AccountRef};

/// The minimum rendered size of a payment request QR image, in pixels.
pub const QR_MIN_SIZE: u32 = 300;

/// A request for a payer to send `amount` points to `identifier`.
///
/// Ephemeral: encoded into a QR image, decoded on scan, and converted into
/// a transfer. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    /// The account that wants to receive the points.
    pub identifier: AccountRef,
    /// The number of points requested. Always positive.
    pub amount: i64,
}

/// Render a payment request as a scannable two-tone QR image with a quiet
/// zone border.
///
/// # Errors
/// Returns [Error::InvalidAmount] if the requested amount is not positive,
/// or [Error::QrEncoding] if the QR symbol could not be built.
pub fn encode_payment_request(request: &PaymentRequest) -> Result<GrayImage, Error> {
    if request.amount <= 0 {
        return Err(Error::InvalidAmount(request.amount));
    }

    let payload = serde_json::json!({
        "identifier": request.identifier.as_str(),
        "amount": request.amount,
    })
    .to_string();

    let code =
        QrCode::new(payload.as_bytes()).map_err(|error| Error::QrEncoding(error.to_string()))?;

    Ok(code
        .render::<Luma<u8>>()
        .min_dimensions(QR_MIN_SIZE, QR_MIN_SIZE)
        .quiet_zone(true)
        .dark_color(Luma([0u8]))
        .light_color(Luma([255u8]))
        .build())
}

/// Render a payment request as PNG bytes, for serving over HTTP.
///
/// # Errors
/// Returns the same errors as [encode_payment_request], or
/// [Error::QrEncoding] if the PNG could not be written.
pub fn encode_payment_request_png(request: &PaymentRequest) -> Result<Vec<u8>, Error> {
    let image = encode_payment_request(request)?;

    let mut bytes = Vec::new();
    image::DynamicImage::ImageLuma8(image)
        .write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .map_err(|error| Error::QrEncoding(error.to_string()))?;

    Ok(bytes)
}

/// Decode a scanned image back into a payment request.
///
/// # Errors
/// Returns [Error::MalformedPayload] if the image contains no readable QR
/// code, the payload is not a JSON object, or the required fields are
/// missing or invalid.
pub fn decode_payment_request(image: &GrayImage) -> Result<PaymentRequest, Error> {
    let text = extract_payload_text(image).ok_or_else(|| {
        Error::MalformedPayload("no readable QR code found in the image".to_owned())
    })?;

    let value = json_payload(&text)
        .ok_or_else(|| Error::MalformedPayload("payload is not valid JSON".to_owned()))?;

    payment_request_from_value(&value)
}

/// Locate and decode a QR code in `image`, returning its text payload.
///
/// Returns `None` when no code is found or the symbol cannot be decoded;
/// most frames handed to the scanner are not QR codes at all.
pub(crate) fn extract_payload_text(image: &GrayImage) -> Option<String> {
    let mut prepared = rqrr::PreparedImage::prepare(image.clone());

    prepared
        .detect_grids()
        .into_iter()
        .find_map(|grid| grid.decode().ok().map(|(_, content)| content))
}

/// Parse a payload string as JSON, returning `None` for non-JSON noise.
pub(crate) fn json_payload(text: &str) -> Option<serde_json::Value> {
    serde_json::from_str(text).ok()
}

/// Build a payment request from a parsed JSON payload.
///
/// `identifier` may be a string or a number (backends differ on identifier
/// shape); any fields beyond the two required ones are ignored.
///
/// # Errors
/// Returns [Error::MalformedPayload] if either required field is missing,
/// the identifier is empty, or the amount is not a positive integer.
pub(crate) fn payment_request_from_value(
    value: &serde_json::Value,
) -> Result<PaymentRequest, Error> {
    let object = value
        .as_object()
        .ok_or_else(|| Error::MalformedPayload("payload is not a JSON object".to_owned()))?;

    let identifier = match object.get("identifier") {
        Some(serde_json::Value::String(identifier)) if !identifier.is_empty() => {
            identifier.clone()
        }
        Some(serde_json::Value::Number(identifier)) => identifier.to_string(),
        Some(_) | None => {
            return Err(Error::MalformedPayload(
                "missing or invalid \"identifier\" field".to_owned(),
            ));
        }
    };

    let amount = object
        .get("amount")
        .and_then(serde_json::Value::as_i64)
        .ok_or_else(|| {
            Error::MalformedPayload("missing or non-integer \"amount\" field".to_owned())
        })?;

    if amount <= 0 {
        return Err(Error::MalformedPayload(format!(
            "amount must be positive, got {amount}"
        )));
    }

    Ok(PaymentRequest {
        identifier: AccountRef::new(identifier),
        amount,
    })
}
