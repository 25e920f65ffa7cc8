use std::fs;
use std::path::{Path, PathBuf};

use lumen_math::Vec3;
use lumen_obj::{load, ObjError, Pool, RecordFault};

/// A file in the system temp dir that is removed on drop.
struct TempFile(PathBuf);

impl TempFile {
    fn new(name: &str, contents: &str) -> Self {
        let path = std::env::temp_dir().join(format!("lumen-obj-{}-{name}", std::process::id()));
        fs::write(&path, contents).unwrap();
        Self(path)
    }

    fn path(&self) -> &Path {
        &self.0
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.0);
    }
}

#[test]
fn loads_a_triangle_from_disk() {
    let file = TempFile::new("triangle.obj", "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n");
    let scene = load(file.path()).unwrap();

    assert_eq!(scene.meshes.len(), 1);
    assert_eq!(scene.meshes[0].triangles.len(), 1);
    assert_eq!(
        scene.meshes[0].triangles[0].positions,
        [Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)]
    );
}

#[test]
fn loads_two_objects_as_two_meshes() {
    let file = TempFile::new(
        "objects.obj",
        "v 0 0 0\nv 1 0 0\nv 0 1 0\no a\nf 1 2 3\no b\nf 1 2 3\n",
    );
    let scene = load(file.path()).unwrap();

    assert_eq!(scene.meshes.len(), 2);
    assert!(scene.meshes.iter().all(|m| m.triangles.len() == 1));
}

#[test]
fn out_of_range_face_fails_without_a_scene() {
    let file = TempFile::new("bad-index.obj", "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 5\n");

    match load(file.path()) {
        Err(ObjError::MalformedRecord { path, line, content, fault }) => {
            assert_eq!(path, file.path().display().to_string());
            assert_eq!(line, 4);
            assert_eq!(content, "f 1 2 5");
            assert_eq!(fault, RecordFault::IndexOutOfRange { pool: Pool::Vertex, index: 5, len: 3 });
        }
        other => panic!("expected MalformedRecord, got {other:?}"),
    }
}

#[test]
fn wrong_extension_is_rejected_before_opening() {
    // The file does not exist; a format check that opened it would report Io.
    let err = load("definitely/not/here/model.txt").unwrap_err();
    assert!(matches!(err, ObjError::FormatMismatch { .. }), "{err:?}");
}

#[test]
fn wrong_extension_is_rejected_even_when_the_file_exists() {
    let file = TempFile::new("triangle.txt", "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n");
    assert!(matches!(load(file.path()), Err(ObjError::FormatMismatch { .. })));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = load("definitely/not/here/model.obj").unwrap_err();
    match err {
        ObjError::Io { source, .. } => assert_eq!(source.kind(), std::io::ErrorKind::NotFound),
        other => panic!("expected Io, got {other:?}"),
    }
}

#[test]
fn invalid_utf8_is_an_io_error() {
    let path = std::env::temp_dir().join(format!("lumen-obj-{}-binary.obj", std::process::id()));
    fs::write(&path, [b'v', b' ', 0xff, 0xfe, b'\n']).unwrap();
    let result = load(&path);
    let _ = fs::remove_file(&path);

    assert!(matches!(result, Err(ObjError::Io { .. })));
}
