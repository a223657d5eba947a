//! Enhancement request and input validation.
//!
//! The request is ephemeral: it lives for exactly one `enhance` call and the
//! size gate runs before any remote call is made.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use thiserror::Error;

/// Maximum accepted image payload: 10 MiB.
pub const MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024;

/// Rejection reasons for the input gate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("no image data provided")]
    Empty,

    #[error("image size exceeds 10MB limit")]
    TooLarge { size: usize },
}

/// Caller-supplied enhancement input.
///
/// Construction is the validation: a value of this type always holds a
/// non-empty payload within the size limit.
#[derive(Debug, Clone)]
pub struct EnhancementRequest {
    image_bytes: Vec<u8>,
}

impl EnhancementRequest {
    pub fn new(image_bytes: Vec<u8>) -> Result<Self, RequestError> {
        if image_bytes.is_empty() {
            return Err(RequestError::Empty);
        }
        if image_bytes.len() > MAX_IMAGE_SIZE {
            return Err(RequestError::TooLarge {
                size: image_bytes.len(),
            });
        }
        Ok(Self { image_bytes })
    }

    pub fn image_bytes(&self) -> &[u8] {
        &self.image_bytes
    }

    /// Media type sniffed from magic bytes.
    ///
    /// JPEG is the fallback for unrecognized payloads; the provider decodes
    /// the image itself, so a wrong label here only affects the data URI.
    pub fn media_type(&self) -> &'static str {
        const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";
        const JPEG_MAGIC: &[u8] = b"\xff\xd8\xff";

        let bytes = &self.image_bytes;
        if bytes.starts_with(PNG_MAGIC) {
            "image/png"
        } else if bytes.starts_with(JPEG_MAGIC) {
            "image/jpeg"
        } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
            "image/webp"
        } else {
            "image/jpeg"
        }
    }

    /// Embeds the payload as a `data:` URI the provider can consume inline.
    pub fn to_data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.media_type(),
            BASE64.encode(&self.image_bytes)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_payload_is_rejected() {
        assert_eq!(EnhancementRequest::new(vec![]).unwrap_err(), RequestError::Empty);
    }

    #[test]
    fn payload_at_the_limit_is_accepted() {
        let request = EnhancementRequest::new(vec![0u8; MAX_IMAGE_SIZE]).expect("at limit");
        assert_eq!(request.image_bytes().len(), MAX_IMAGE_SIZE);
    }

    #[test]
    fn payload_over_the_limit_is_rejected() {
        let err = EnhancementRequest::new(vec![0u8; MAX_IMAGE_SIZE + 1]).unwrap_err();
        assert_eq!(
            err,
            RequestError::TooLarge {
                size: MAX_IMAGE_SIZE + 1
            }
        );
        assert_eq!(err.to_string(), "image size exceeds 10MB limit");
    }

    #[test]
    fn media_type_sniffs_known_magics() {
        let png = EnhancementRequest::new(b"\x89PNG\r\n\x1a\n rest".to_vec()).unwrap();
        assert_eq!(png.media_type(), "image/png");

        let jpeg = EnhancementRequest::new(b"\xff\xd8\xff\xe0 rest".to_vec()).unwrap();
        assert_eq!(jpeg.media_type(), "image/jpeg");

        let webp = EnhancementRequest::new(b"RIFF\x00\x00\x00\x00WEBPVP8 ".to_vec()).unwrap();
        assert_eq!(webp.media_type(), "image/webp");
    }

    #[test]
    fn unknown_payload_falls_back_to_jpeg() {
        let request = EnhancementRequest::new(b"definitely not an image".to_vec()).unwrap();
        assert_eq!(request.media_type(), "image/jpeg");
    }

    #[test]
    fn data_uri_has_media_type_and_base64_payload() {
        let request = EnhancementRequest::new(b"\x89PNG\r\n\x1a\nabc".to_vec()).unwrap();
        let uri = request.to_data_uri();
        assert!(uri.starts_with("data:image/png;base64,"));

        let payload = uri.split(',').nth(1).expect("base64 section");
        assert_eq!(BASE64.decode(payload).unwrap(), request.image_bytes());
    }
}
