use std::path::Path;

pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Infers a content type from the file name's extension.
pub fn detect(file_name: &str) -> String {
    let Some(extension) = Path::new(file_name)
        .extension()
        .and_then(|value| value.to_str())
    else {
        return DEFAULT_MIME_TYPE.to_string();
    };
    mime_guess::from_ext(&extension.to_ascii_lowercase())
        .first()
        .map(|mime| mime.essence_str().to_string())
        .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string())
}
