//! Image type detection for fetched bytes.

/// Decides whether a byte buffer is an image.
pub trait ImageTypeValidator: Send + Sync {
    fn is_image(&self, bytes: &[u8]) -> bool;
}

/// Sniffs format signatures; never decodes pixel data.
#[derive(Debug, Clone, Copy, Default)]
pub struct MagicBytesValidator;

/// ISO-BMFF brands of still-image containers (HEIF/HEIC/AVIF).
const HEIF_BRANDS: &[&[u8; 4]] = &[
    b"heic", b"heix", b"hevc", b"hevx", b"heim", b"heis", b"hevm", b"hevs", b"mif1", b"msf1",
    b"avif", b"avis",
];

impl MagicBytesValidator {
    pub fn new() -> Self {
        Self
    }

    /// HEIF family: `ftyp` box at offset 4 with a still-image major brand.
    fn is_heif(bytes: &[u8]) -> bool {
        if bytes.len() < 12 || &bytes[4..8] != b"ftyp" {
            return false;
        }
        HEIF_BRANDS.iter().any(|brand| &bytes[8..12] == brand.as_slice())
    }

    /// TIFF headers, which also open most camera raw formats (CR2, NEF, DNG).
    fn is_tiff(bytes: &[u8]) -> bool {
        bytes.len() >= 4
            && (bytes[..4] == [b'I', b'I', 0x2A, 0x00] || bytes[..4] == [b'M', b'M', 0x00, 0x2A])
    }
}

impl ImageTypeValidator for MagicBytesValidator {
    fn is_image(&self, bytes: &[u8]) -> bool {
        if bytes.len() < 4 {
            return false;
        }
        match image::guess_format(bytes) {
            Ok(format) => {
                tracing::trace!("Detected image format {:?}", format);
                true
            }
            Err(_) => Self::is_tiff(bytes) || Self::is_heif(bytes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_image(bytes: &[u8]) -> bool {
        MagicBytesValidator::new().is_image(bytes)
    }

    #[test]
    fn test_magic_bytes_jpeg() {
        assert!(is_image(&[0xFF, 0xD8, 0xFF, 0xE1, 0, 0, 0, 0, 0, 0, 0, 0]));
    }

    #[test]
    fn test_magic_bytes_png() {
        assert!(is_image(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0]));
    }

    #[test]
    fn test_magic_bytes_webp() {
        assert!(is_image(b"RIFF\0\0\0\0WEBPVP8 "));
    }

    #[test]
    fn test_magic_bytes_tiff() {
        assert!(is_image(&[b'I', b'I', 0x2A, 0x00, 8, 0, 0, 0]));
        assert!(is_image(&[b'M', b'M', 0x00, 0x2A, 0, 0, 0, 8]));
    }

    #[test]
    fn test_magic_bytes_heic() {
        assert!(is_image(b"\0\0\0\x18ftypheic\0\0\0\0"));
    }

    #[test]
    fn test_mp4_is_not_an_image() {
        assert!(!is_image(b"\0\0\0\x18ftypisom\0\0\0\0"));
    }

    #[test]
    fn test_html_is_not_an_image() {
        assert!(!is_image(b"<!DOCTYPE html><html></html>"));
        assert!(!is_image(b"{\"error\":\"not found\"}"));
    }

    #[test]
    fn test_too_short() {
        assert!(!is_image(&[0xFF, 0xD8]));
        assert!(!is_image(&[]));
    }
}
