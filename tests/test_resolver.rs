use std::path::PathBuf;

use localserve::fs::resolve;

fn canonical_root() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<html>ok</html>").unwrap();
    std::fs::create_dir(dir.path().join("img")).unwrap();
    std::fs::write(dir.path().join("img/hero.png"), b"\x89P").unwrap();
    let root = dir.path().canonicalize().unwrap();
    (dir, root)
}

#[tokio::test]
async fn test_root_maps_to_index() {
    let (_dir, root) = canonical_root();

    let resolved = resolve("/", &root, "index.html").await;

    assert!(resolved.exists);
    assert_eq!(resolved.absolute_path, root.join("index.html"));
    assert_eq!(resolved.content_type, "text/html");
}

#[tokio::test]
async fn test_custom_index_file() {
    let (_dir, root) = canonical_root();
    std::fs::write(root.join("main.html"), "main").unwrap();

    let resolved = resolve("/", &root, "main.html").await;

    assert_eq!(resolved.absolute_path, root.join("main.html"));
}

#[tokio::test]
async fn test_nested_file() {
    let (_dir, root) = canonical_root();

    let resolved = resolve("/img/hero.png", &root, "index.html").await;

    assert!(resolved.exists);
    assert_eq!(resolved.absolute_path, root.join("img/hero.png"));
    assert_eq!(resolved.content_type, "image/png");
}

#[tokio::test]
async fn test_dot_segments_inside_root_are_allowed() {
    let (_dir, root) = canonical_root();

    let resolved = resolve("/img/../index.html", &root, "index.html").await;

    assert!(resolved.exists);
    assert_eq!(resolved.absolute_path, root.join("index.html"));
}

#[tokio::test]
async fn test_missing_file() {
    let (_dir, root) = canonical_root();

    let resolved = resolve("/missing.txt", &root, "index.html").await;

    assert!(!resolved.exists);
}

#[tokio::test]
async fn test_directory_is_not_a_file() {
    let (_dir, root) = canonical_root();

    assert!(!resolve("/img", &root, "index.html").await.exists);
    assert!(!resolve("/img/", &root, "index.html").await.exists);
}

#[tokio::test]
async fn test_escape_via_parent_segments() {
    let outer = tempfile::tempdir().unwrap();
    std::fs::write(outer.path().join("secret.txt"), "secret").unwrap();
    let root = outer.path().join("www");
    std::fs::create_dir(&root).unwrap();
    let root = root.canonicalize().unwrap();

    let resolved = resolve("/../secret.txt", &root, "index.html").await;

    assert!(!resolved.exists);
}

#[tokio::test]
async fn test_double_slash_does_not_become_absolute() {
    let (_dir, root) = canonical_root();

    let resolved = resolve("//etc/passwd", &root, "index.html").await;

    assert!(!resolved.exists);
}

#[tokio::test]
async fn test_query_is_stripped_before_lookup() {
    let (_dir, root) = canonical_root();

    let resolved = resolve("/img/hero.png?cache=1#x", &root, "index.html").await;

    assert!(resolved.exists);
    assert_eq!(resolved.content_type, "image/png");
}
