use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }
}

/// A thumbnail submitted inline by the admin form as a
/// `data:<content-type>;base64,<payload>` URI.
#[derive(Debug, Clone)]
pub struct InlineImage {
    pub format: ImageFormat,
    pub bytes: Vec<u8>,
}

impl InlineImage {
    pub fn parse(data_url: &str) -> Result<Self, String> {
        let rest = data_url
            .strip_prefix("data:")
            .ok_or_else(|| "image must be a base64 data URI".to_string())?;
        let (content_type, payload) = rest
            .split_once(";base64,")
            .ok_or_else(|| "image must be a base64 data URI".to_string())?;
        let format = match content_type {
            "image/jpeg" => ImageFormat::Jpeg,
            "image/png" => ImageFormat::Png,
            other => {
                return Err(format!(
                    "unsupported image content type `{other}`, expected image/jpeg or image/png"
                ));
            }
        };
        let bytes = BASE64
            .decode(payload.trim())
            .map_err(|_| "image payload is not valid base64".to_string())?;
        Ok(Self { format, bytes })
    }
}
