use localserve::http::mime::{DEFAULT_MIME, mime_type};

#[test]
fn test_mime_table() {
    let cases = [
        ("/app.js", "application/javascript"),
        ("/style.css", "text/css"),
        ("/icon.png", "image/png"),
        ("/photo.jpg", "image/jpeg"),
        ("/photo.jpeg", "image/jpeg"),
        ("/anim.gif", "image/gif"),
        ("/logo.svg", "image/svg+xml"),
        ("/data.json", "application/json"),
        ("/font.woff", "font/woff2"),
        ("/font.woff2", "font/woff2"),
        ("/font.ttf", "font/ttf"),
        ("/font.otf", "font/otf"),
        ("/bgm.mp3", "audio/mpeg"),
        ("/se.wav", "audio/wav"),
        ("/se.ogg", "audio/ogg"),
        ("/sprite.webp", "image/webp"),
    ];

    for (path, expected) in cases {
        assert_eq!(mime_type(path), expected, "path {path}");
    }
}

#[test]
fn test_mime_default() {
    assert_eq!(mime_type("/index.html"), DEFAULT_MIME);
    assert_eq!(mime_type("/notes.txt"), "text/html");
    assert_eq!(mime_type("/LICENSE"), "text/html");
    assert_eq!(mime_type("/.hidden"), "text/html");
}

#[test]
fn test_mime_uses_last_extension() {
    assert_eq!(mime_type("/bundle.min.js"), "application/javascript");
    assert_eq!(mime_type("/archive.js.map"), "text/html");
}
