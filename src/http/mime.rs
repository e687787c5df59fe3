//! Content type detection from file extensions.

use std::path::Path;

/// Fallback for `.html`, files without an extension and anything unrecognized.
pub const DEFAULT_MIME: &str = "text/html";

const MIME_TABLE: &[(&str, &str)] = &[
    ("js", "application/javascript"),
    ("css", "text/css"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("svg", "image/svg+xml"),
    ("json", "application/json"),
    ("woff", "font/woff2"),
    ("woff2", "font/woff2"),
    ("ttf", "font/ttf"),
    ("otf", "font/otf"),
    ("mp3", "audio/mpeg"),
    ("wav", "audio/wav"),
    ("ogg", "audio/ogg"),
    ("webp", "image/webp"),
];

/// Returns the MIME type for `path` based on its extension.
///
/// The extension is lower-cased before lookup, so `LOGO.PNG` and `logo.png`
/// resolve the same way.
///
/// # Example
///
/// ```
/// # use localserve::http::mime::mime_type;
/// assert_eq!(mime_type("/app.js"), "application/javascript");
/// assert_eq!(mime_type("/index.html"), "text/html");
/// assert_eq!(mime_type("/README"), "text/html");
/// ```
pub fn mime_type(path: impl AsRef<Path>) -> &'static str {
    let Some(ext) = path.as_ref().extension().and_then(|e| e.to_str()) else {
        return DEFAULT_MIME;
    };
    let ext = ext.to_ascii_lowercase();

    MIME_TABLE
        .iter()
        .find(|(suffix, _)| *suffix == ext)
        .map(|(_, mime)| *mime)
        .unwrap_or(DEFAULT_MIME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_case_insensitive() {
        assert_eq!(mime_type("/Sprites/HERO.PNG"), "image/png");
        assert_eq!(mime_type("/bgm/Title.Ogg"), "audio/ogg");
    }

    #[test]
    fn query_like_suffix_is_not_an_extension() {
        // The resolver strips queries first; raw input keeps the default.
        assert_eq!(mime_type("/app.js?v=3"), DEFAULT_MIME);
    }
}
