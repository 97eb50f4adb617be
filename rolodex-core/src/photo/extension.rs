//! Filename and extension rules for stored contact photos.

use crate::error::{ContactError, Result};

/// Used when the uploaded filename has no usable suffix.
pub const DEFAULT_PHOTO_EXTENSION: &str = ".png";

/// Maps an uploaded filename to the extension the photo is stored under.
///
/// Everything after the last `.` is kept verbatim, including case. Missing
/// names, names without a dot, trailing dots, and suffixes that contain a path
/// separator all resolve to [`DEFAULT_PHOTO_EXTENSION`].
pub fn photo_extension(original: Option<&str>) -> String {
    original
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, suffix)| suffix)
        .filter(|suffix| !suffix.is_empty() && !has_forbidden_char(suffix))
        .map(|suffix| format!(".{suffix}"))
        .unwrap_or_else(|| DEFAULT_PHOTO_EXTENSION.to_string())
}

/// `<contact id><resolved extension>`
pub fn stored_filename(id: &str, original: Option<&str>) -> String {
    format!("{id}{}", photo_extension(original))
}

/// Rejects anything that could resolve outside the photo directory, and
/// dot-prefixed names, which are reserved for in-flight temp files.
pub fn validate_filename(name: &str) -> Result<&str> {
    if name.is_empty() || name.starts_with('.') || has_forbidden_char(name) {
        return Err(ContactError::InvalidFilename(name.to_string()));
    }
    Ok(name)
}

/// Content type served for a stored photo, inferred from its extension.
pub fn content_type_for(filename: &str) -> &'static str {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

fn has_forbidden_char(value: &str) -> bool {
    value.contains(['/', '\\', '\0'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_suffix_after_last_dot() {
        assert_eq!(photo_extension(Some("photo.jpg")), ".jpg");
        assert_eq!(photo_extension(Some("archive.tar.gz")), ".gz");
        assert_eq!(photo_extension(Some("SHOUTY.JPEG")), ".JPEG");
        assert_eq!(photo_extension(Some(".hidden")), ".hidden");
    }

    #[test]
    fn falls_back_to_png() {
        assert_eq!(photo_extension(Some("noext")), ".png");
        assert_eq!(photo_extension(Some("trailing.")), ".png");
        assert_eq!(photo_extension(Some("")), ".png");
        assert_eq!(photo_extension(None), ".png");
    }

    #[test]
    fn separators_in_suffix_fall_back_to_png() {
        assert_eq!(photo_extension(Some("../../etc/passwd")), ".png");
        assert_eq!(photo_extension(Some("a.b\\c")), ".png");
    }

    #[test]
    fn stored_filename_joins_id_and_extension() {
        assert_eq!(stored_filename("c-42", Some("me.jpg")), "c-42.jpg");
        assert_eq!(stored_filename("c-42", Some("me")), "c-42.png");
    }

    #[test]
    fn validate_filename_rejects_traversal() {
        for bad in ["", ".", "..", "../c.png", "a/b.png", "a\\b.png", "a\0.png"]
        {
            assert!(
                matches!(
                    validate_filename(bad),
                    Err(ContactError::InvalidFilename(_))
                ),
                "{bad:?} should be rejected"
            );
        }
        assert_eq!(validate_filename("c-1.png").unwrap(), "c-1.png");
        assert_eq!(validate_filename("c..1.png").unwrap(), "c..1.png");
    }

    #[test]
    fn validate_filename_rejects_hidden_and_temp_files() {
        for bad in [".hidden", "..c.png", ".c-1.jpg.0f3a9c.tmp"] {
            assert!(
                validate_filename(bad).is_err(),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn content_types_follow_extension() {
        assert_eq!(content_type_for("a.png"), "image/png");
        assert_eq!(content_type_for("a.JPG"), "image/jpeg");
        assert_eq!(content_type_for("a.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("a.webp"), "image/webp");
        assert_eq!(content_type_for("a.bin"), "application/octet-stream");
        assert_eq!(content_type_for("noext"), "application/octet-stream");
    }
}
