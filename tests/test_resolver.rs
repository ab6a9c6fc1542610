use std::fs;

use hearth::serve::{PathResolver, ResolvedPath};
use tempfile::TempDir;

fn site() -> (TempDir, PathResolver) {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("index.html"), "Hi").unwrap();
    fs::create_dir(dir.path().join("assets")).unwrap();
    fs::write(dir.path().join("assets").join("a.png"), [0x89, b'P']).unwrap();
    fs::write(dir.path().join("my file.txt"), "spaced").unwrap();

    let resolver = PathResolver::new(dir.path().canonicalize().unwrap());
    (dir, resolver)
}

#[test]
fn test_root_maps_to_index() {
    let (_dir, resolver) = site();
    let root = resolver.web_root().to_path_buf();

    assert_eq!(resolver.resolve("/"), ResolvedPath::File(root.join("index.html")));
}

#[test]
fn test_file_and_directory_classification() {
    let (_dir, resolver) = site();
    let root = resolver.web_root().to_path_buf();

    assert_eq!(
        resolver.resolve("/assets/a.png"),
        ResolvedPath::File(root.join("assets").join("a.png"))
    );
    assert_eq!(
        resolver.resolve("/assets/"),
        ResolvedPath::Directory(root.join("assets"))
    );
    assert_eq!(
        resolver.resolve("/assets"),
        ResolvedPath::Directory(root.join("assets"))
    );
}

#[test]
fn test_missing() {
    let (_dir, resolver) = site();

    assert!(matches!(resolver.resolve("/missing.txt"), ResolvedPath::Missing(_)));
}

#[test]
fn test_query_and_fragment_ignored() {
    let (_dir, resolver) = site();

    assert!(matches!(resolver.resolve("/index.html?v=2"), ResolvedPath::File(_)));
    assert!(matches!(resolver.resolve("/index.html#top"), ResolvedPath::File(_)));
}

#[test]
fn test_percent_escapes_decoded() {
    let (_dir, resolver) = site();

    assert!(matches!(resolver.resolve("/my%20file.txt"), ResolvedPath::File(_)));
}

#[test]
fn test_dot_segments_inside_root_allowed() {
    let (_dir, resolver) = site();

    assert!(matches!(
        resolver.resolve("/assets/../index.html"),
        ResolvedPath::File(_)
    ));
    assert!(matches!(resolver.resolve("/./assets/./a.png"), ResolvedPath::File(_)));
}

#[test]
fn test_traversal_forbidden_however_encoded() {
    let (_dir, resolver) = site();

    for path in [
        "/../secret.txt",
        "/assets/../../secret.txt",
        "/%2e%2e/secret.txt",
        "/%2E%2E%2Fsecret.txt",
        "/..%2fsecret.txt",
        "/..\\secret.txt",
    ] {
        assert_eq!(resolver.resolve(path), ResolvedPath::Forbidden, "{}", path);
    }
}

#[test]
fn test_nul_byte_forbidden() {
    let (_dir, resolver) = site();

    assert_eq!(resolver.resolve("/index.html%00.png"), ResolvedPath::Forbidden);
}

#[cfg(unix)]
#[test]
fn test_symlink_out_of_root_forbidden() {
    let outside = TempDir::new().unwrap();
    fs::write(outside.path().join("secret.txt"), "top secret").unwrap();

    let (dir, resolver) = site();
    std::os::unix::fs::symlink(outside.path().join("secret.txt"), dir.path().join("link.txt"))
        .unwrap();

    assert_eq!(resolver.resolve("/link.txt"), ResolvedPath::Forbidden);
}

#[cfg(unix)]
#[test]
fn test_classify_rejects_symlinked_index_out_of_root() {
    let outside = TempDir::new().unwrap();
    fs::write(outside.path().join("secret.html"), "TOP-SECRET").unwrap();

    let (_dir, resolver) = site();
    let sub = resolver.web_root().join("sub");
    fs::create_dir(&sub).unwrap();
    std::os::unix::fs::symlink(outside.path().join("secret.html"), sub.join("index.html"))
        .unwrap();

    assert_eq!(resolver.resolve("/sub/index.html"), ResolvedPath::Forbidden);
    assert_eq!(resolver.classify(sub.join("index.html")), ResolvedPath::Forbidden);
    assert_eq!(resolver.resolve("/sub/"), ResolvedPath::Directory(sub));
}

#[test]
fn test_resolved_paths_stay_under_root() {
    let (_dir, resolver) = site();
    let root = resolver.web_root().to_path_buf();

    for path in ["/", "/assets", "/assets/a.png", "/x/../assets/./a.png"] {
        match resolver.resolve(path) {
            ResolvedPath::File(p) | ResolvedPath::Directory(p) => assert!(p.starts_with(&root)),
            other => panic!("unexpected {:?} for {}", other, path),
        }
    }
}
