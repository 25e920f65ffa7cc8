use std::collections::HashSet;
use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::mem;
use std::path::Path;

use lumen_math::{Vec2, Vec3};

use crate::directive::Directive;
use crate::error::{ObjError, Pool, RecordFault};
use crate::scene::{Mesh, Scene, Triangle};

/// Name of the mesh that collects faces declared before any `o` line.
const DEFAULT_MESH: &str = "default";

/// Name used for an `o` line without a name.
const UNNAMED_MESH: &str = "unnamed";

// ── Parser ────────────────────────────────────────────────────────────────

/// Single-run parser state. Attribute pools live only as long as the run.
struct Parser<'s> {
    source: &'s str,
    line: usize,

    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    tex_coords: Vec<Vec2>,

    scene: Scene,
    current: Mesh,

    /// Unrecognized keywords already reported, so each is logged once.
    skipped: HashSet<String>,
}

/// One resolved face corner.
#[derive(Debug, Copy, Clone)]
struct Corner {
    position: Vec3,
    tex_coord: Option<Vec2>,
    normal: Option<Vec3>,
}

impl<'s> Parser<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            line: 0,
            positions: Vec::new(),
            normals: Vec::new(),
            tex_coords: Vec::new(),
            scene: Scene::default(),
            current: Mesh::new(DEFAULT_MESH),
            skipped: HashSet::new(),
        }
    }

    fn run<R: BufRead>(mut self, mut reader: R) -> Result<Scene, ObjError> {
        let mut buf = String::new();

        loop {
            buf.clear();
            let read = reader.read_line(&mut buf).map_err(|source| ObjError::Io {
                path: self.source.to_owned(),
                source,
            })?;
            if read == 0 {
                break;
            }
            self.line += 1;

            if let Err(fault) = self.parse_line(&buf) {
                return Err(ObjError::MalformedRecord {
                    path: self.source.to_owned(),
                    line: self.line,
                    content: buf.trim_end().to_owned(),
                    fault,
                });
            }
        }

        log::debug!(
            "{}: {} lines, {} positions, {} normals, {} texcoords",
            self.source,
            self.line,
            self.positions.len(),
            self.normals.len(),
            self.tex_coords.len()
        );

        Ok(self.finish())
    }

    fn finish(mut self) -> Scene {
        self.close_mesh(Mesh::default());
        self.scene
    }

    // ── Line dispatch ─────────────────────────────────────────────────────

    fn parse_line(&mut self, line: &str) -> Result<(), RecordFault> {
        let data = match line.find('#') {
            Some(i) => &line[..i],
            None => line,
        };

        let mut fields = data.split_whitespace();
        let Some(keyword) = fields.next() else {
            return Ok(());
        };

        match Directive::from_keyword(keyword) {
            Directive::Vertex => {
                let mut c = [0.0; 3];
                read_components(Directive::Vertex, fields, &mut c, 3)?;
                self.positions.push(Vec3::from(c));
            }
            Directive::Normal => {
                let mut c = [0.0; 3];
                read_components(Directive::Normal, fields, &mut c, 3)?;
                self.normals.push(Vec3::from(c));
            }
            Directive::TexCoord => {
                let mut c = [0.0; 2];
                read_components(Directive::TexCoord, fields, &mut c, 1)?;
                self.tex_coords.push(Vec2::from(c));
            }
            Directive::Face => self.parse_face(fields)?,
            Directive::Object => {
                let name = data.trim_start()[keyword.len()..].trim();
                let name = if name.is_empty() { UNNAMED_MESH } else { name };
                self.close_mesh(Mesh::new(name));
            }
            Directive::MaterialLibrary => {
                self.scene
                    .material_libraries
                    .extend(fields.map(str::to_owned));
            }
            Directive::UseMaterial => {
                log::trace!("{}:{}: ignoring `{}`", self.source, self.line, data.trim());
            }
            Directive::Unrecognized => {
                if self.skipped.insert(keyword.to_owned()) {
                    log::debug!(
                        "{}:{}: skipping unrecognized directive `{keyword}`",
                        self.source,
                        self.line
                    );
                }
            }
        }

        Ok(())
    }

    /// Replaces the in-progress mesh with `next`, keeping the old one only
    /// if it received triangles.
    fn close_mesh(&mut self, next: Mesh) {
        let done = mem::replace(&mut self.current, next);
        if !done.is_empty() {
            self.scene.meshes.push(done);
        }
    }

    // ── Faces ─────────────────────────────────────────────────────────────

    /// Resolves every corner, then fans the polygon around its first corner:
    /// `(0, i, i + 1)` for `i` in `1..n - 1`.
    fn parse_face<'a>(&mut self, fields: impl Iterator<Item = &'a str>) -> Result<(), RecordFault> {
        let corners = fields
            .map(|field| self.resolve_corner(field))
            .collect::<Result<Vec<_>, _>>()?;

        if corners.len() < 3 {
            return Err(RecordFault::TooFewVertices(corners.len()));
        }

        for i in 1..corners.len() - 1 {
            let tri = assemble([corners[0], corners[i], corners[i + 1]]);
            self.current.triangles.push(tri);
        }
        Ok(())
    }

    /// Parses `v`, `v/vt`, `v//vn` or `v/vt/vn`.
    fn resolve_corner(&self, field: &str) -> Result<Corner, RecordFault> {
        let mut parts = field.split('/');
        let v = parts.next().unwrap_or_default();
        let vt = parts.next().filter(|s| !s.is_empty());
        let vn = parts.next().filter(|s| !s.is_empty());
        if parts.next().is_some() {
            return Err(RecordFault::InvalidIndex(field.to_owned()));
        }

        let position = resolve(&self.positions, Pool::Vertex, parse_index(v, field)?)?;
        let tex_coord = vt
            .map(|s| resolve(&self.tex_coords, Pool::TexCoord, parse_index(s, field)?))
            .transpose()?;
        let normal = vn
            .map(|s| resolve(&self.normals, Pool::Normal, parse_index(s, field)?))
            .transpose()?;

        Ok(Corner {
            position,
            tex_coord,
            normal,
        })
    }
}

fn assemble(corners: [Corner; 3]) -> Triangle {
    let positions = corners.map(|c| c.position);

    let normals = match corners.map(|c| c.normal) {
        [Some(a), Some(b), Some(c)] => [a.normalized(), b.normalized(), c.normalized()],
        _ => {
            let [p0, p1, p2] = positions;
            [p1.minus(p0).cross(p2.minus(p0)).normalized(); 3]
        }
    };

    let tex_coords = match corners.map(|c| c.tex_coord) {
        [Some(a), Some(b), Some(c)] => Some([a, b, c]),
        _ => None,
    };

    Triangle {
        positions,
        normals,
        tex_coords,
    }
}

// ── Field helpers ─────────────────────────────────────────────────────────

/// Fills `out` from the leading fields. Fields past `out.len()` are ignored;
/// fewer than `required` is an error.
fn read_components<'a>(
    directive: Directive,
    fields: impl Iterator<Item = &'a str>,
    out: &mut [f32],
    required: usize,
) -> Result<(), RecordFault> {
    let mut found = 0;
    for (slot, field) in out.iter_mut().zip(fields) {
        let value: f32 = field
            .parse()
            .map_err(|_| RecordFault::InvalidNumber(field.to_owned()))?;
        // `parse` accepts `nan`/`inf` and overflows large magnitudes to inf.
        if !value.is_finite() {
            return Err(RecordFault::NonFiniteNumber(field.to_owned()));
        }
        *slot = value;
        found += 1;
    }

    if found < required {
        return Err(RecordFault::MissingValues {
            directive: directive.keyword(),
            expected: required,
            found,
        });
    }
    Ok(())
}

fn parse_index(part: &str, field: &str) -> Result<i64, RecordFault> {
    part.parse()
        .map_err(|_| RecordFault::InvalidIndex(field.to_owned()))
}

/// Maps a 1-based (or negative, end-relative) index onto `pool`.
fn resolve<T: Copy>(pool: &[T], kind: Pool, index: i64) -> Result<T, RecordFault> {
    let len = pool.len();
    let slot = if index > 0 {
        usize::try_from(index - 1).ok()
    } else if index < 0 {
        usize::try_from(index.unsigned_abs())
            .ok()
            .and_then(|back| len.checked_sub(back))
    } else {
        None
    };

    slot.and_then(|i| pool.get(i))
        .copied()
        .ok_or(RecordFault::IndexOutOfRange {
            pool: kind,
            index,
            len,
        })
}

// ── Public entry points ───────────────────────────────────────────────────

/// `true` if `path` ends in `.obj` (ASCII case-insensitive).
pub fn has_obj_extension(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| ext.eq_ignore_ascii_case("obj"))
}

/// Reads the `.obj` file at `path`.
///
/// The extension is checked before anything is opened. The file handle is
/// closed before this returns, on success and on every error.
pub fn load(path: impl AsRef<Path>) -> Result<Scene, ObjError> {
    let path = path.as_ref();
    if !has_obj_extension(path) {
        return Err(ObjError::FormatMismatch {
            path: path.to_path_buf(),
        });
    }

    let name = path.display().to_string();
    let file = File::open(path).map_err(|source| ObjError::Io {
        path: name.clone(),
        source,
    })?;

    let scene = parse_reader(&name, BufReader::new(file))?;
    log::info!(
        "{name}: {} meshes, {} triangles",
        scene.meshes.len(),
        scene.triangle_count()
    );
    Ok(scene)
}

/// Parses `.obj` text from any buffered reader. `source` labels diagnostics.
pub fn parse_reader<R: BufRead>(source: &str, reader: R) -> Result<Scene, ObjError> {
    Parser::new(source).run(reader)
}

/// Parses `.obj` text held in memory. `source` labels diagnostics.
pub fn parse_str(source: &str, text: &str) -> Result<Scene, ObjError> {
    parse_reader(source, text.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(src: &str) -> Scene {
        parse_str("test.obj", src).unwrap()
    }

    fn fault(src: &str) -> (usize, RecordFault) {
        match parse_str("test.obj", src).unwrap_err() {
            ObjError::MalformedRecord { line, fault, .. } => (line, fault),
            other => panic!("expected a malformed record, got {other:?}"),
        }
    }

    const TRIANGLE: &str = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";

    // ── basic geometry ────────────────────────────────────────────────────

    #[test]
    fn single_triangle_keeps_position_order() {
        let scene = ok(TRIANGLE);
        assert_eq!(scene.meshes.len(), 1);
        let mesh = &scene.meshes[0];
        assert_eq!(mesh.name, DEFAULT_MESH);
        assert_eq!(mesh.triangles.len(), 1);
        assert_eq!(
            mesh.triangles[0].positions,
            [
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ]
        );
    }

    #[test]
    fn missing_normals_use_the_face_normal() {
        let scene = ok(TRIANGLE);
        let t = &scene.meshes[0].triangles[0];
        assert_eq!(t.normals, [Vec3::new(0.0, 0.0, 1.0); 3]);
        assert_eq!(t.tex_coords, None);
    }

    #[test]
    fn file_normals_are_normalized_and_index_aligned() {
        let scene = ok("v 0 0 0\nv 1 0 0\nv 0 1 0\n\
                        vn 0 0 2\nvn 3 0 0\nvn 0 0.5 0\n\
                        f 1//2 2//3 3//1\n");
        let t = &scene.meshes[0].triangles[0];
        assert_eq!(
            t.normals,
            [
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(0.0, 0.0, 1.0),
            ]
        );
    }

    #[test]
    fn full_corner_syntax_carries_tex_coords() {
        let scene = ok("v 0 0 0\nv 1 0 0\nv 0 1 0\n\
                        vt 0 0\nvt 1 0\nvt 0.5\nvn 0 0 1\n\
                        f 1/1/1 2/2/1 3/3/1\n");
        let t = &scene.meshes[0].triangles[0];
        assert_eq!(
            t.tex_coords,
            Some([Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.5, 0.0)])
        );
    }

    #[test]
    fn degenerate_face_gets_zero_normals() {
        let scene = ok("v 0 0 0\nv 1 1 1\nv 2 2 2\nf 1 2 3\n");
        assert_eq!(scene.meshes[0].triangles[0].normals, [Vec3::ZERO; 3]);
    }

    #[test]
    fn extra_vertex_fields_are_ignored() {
        let scene = ok("v 0 0 0 1\nv 1 0 0 1 0.5 0.5 0.5\nv 0 1 0\nf 1 2 3\n");
        assert_eq!(scene.meshes[0].triangles[0].positions[1], Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn no_faces_gives_empty_scene() {
        let scene = ok("v 0 0 0\nv 1 0 0\n");
        assert!(scene.is_empty());
    }

    // ── polygons ──────────────────────────────────────────────────────────

    #[test]
    fn quad_is_fanned_around_first_corner() {
        let scene = ok("v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n");
        let tris = &scene.meshes[0].triangles;
        assert_eq!(tris.len(), 2);
        assert_eq!(
            tris[0].positions,
            [Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 0.0)]
        );
        assert_eq!(
            tris[1].positions,
            [Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 0.0), Vec3::new(0.0, 1.0, 0.0)]
        );
    }

    #[test]
    fn two_corner_face_is_rejected() {
        let (line, f) = fault("v 0 0 0\nv 1 0 0\nf 1 2\n");
        assert_eq!(line, 3);
        assert_eq!(f, RecordFault::TooFewVertices(2));
    }

    // ── indices ───────────────────────────────────────────────────────────

    #[test]
    fn negative_indices_count_from_the_end() {
        let scene = ok("v 9 9 9\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n");
        assert_eq!(scene.meshes[0].triangles[0].positions[0], Vec3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn index_past_pool_end_is_malformed() {
        let (line, f) = fault("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 5\n");
        assert_eq!(line, 4);
        assert_eq!(
            f,
            RecordFault::IndexOutOfRange { pool: Pool::Vertex, index: 5, len: 3 }
        );
    }

    #[test]
    fn index_zero_is_malformed() {
        let (_, f) = fault("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 0 1 2\n");
        assert!(matches!(f, RecordFault::IndexOutOfRange { index: 0, .. }));
    }

    #[test]
    fn index_is_checked_against_current_pool_size() {
        // Vertex 4 exists by end of file, but not when the face is read.
        let (line, _) = fault("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 4\nv 1 1 0\n");
        assert_eq!(line, 4);
    }

    #[test]
    fn missing_normal_reference_is_malformed() {
        let (_, f) = fault("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1//1 2//1 3//1\n");
        assert!(matches!(f, RecordFault::IndexOutOfRange { pool: Pool::Normal, .. }));
    }

    #[test]
    fn non_numeric_index_is_malformed() {
        let (_, f) = fault("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 x\n");
        assert_eq!(f, RecordFault::InvalidIndex("x".to_owned()));
    }

    // ── numbers ───────────────────────────────────────────────────────────

    #[test]
    fn non_numeric_coordinate_is_malformed() {
        let (line, f) = fault("v 0 0 0\nv 1 abc 0\n");
        assert_eq!(line, 2);
        assert_eq!(f, RecordFault::InvalidNumber("abc".to_owned()));
    }

    #[test]
    fn nan_and_infinity_are_malformed() {
        let (line, f) = fault("v 0 0 0\nv nan 0 0\n");
        assert_eq!(line, 2);
        assert_eq!(f, RecordFault::NonFiniteNumber("nan".to_owned()));

        let (_, f) = fault("vn 0 inf 0\n");
        assert_eq!(f, RecordFault::NonFiniteNumber("inf".to_owned()));

        let (_, f) = fault("vt -infinity\n");
        assert_eq!(f, RecordFault::NonFiniteNumber("-infinity".to_owned()));
    }

    #[test]
    fn out_of_range_magnitude_is_malformed() {
        let (line, f) = fault("v 1e40 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n");
        assert_eq!(line, 1);
        assert_eq!(f, RecordFault::NonFiniteNumber("1e40".to_owned()));
    }

    #[test]
    fn large_finite_values_are_kept() {
        let scene = ok("v 3e38 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n");
        assert_eq!(scene.meshes[0].triangles[0].positions[0].x, 3e38);
    }

    #[test]
    fn short_vertex_is_malformed() {
        let (_, f) = fault("v 1 2\n");
        assert_eq!(
            f,
            RecordFault::MissingValues { directive: "v", expected: 3, found: 2 }
        );
    }

    #[test]
    fn error_reports_source_line_and_content() {
        let err = parse_str("model.obj", "v 0 0 0\nvn 1 nope 0\n").unwrap_err();
        assert_eq!(err.line(), Some(2));
        let msg = err.to_string();
        assert!(msg.starts_with("model.obj:2:"), "{msg}");
        assert!(msg.contains("vn 1 nope 0"), "{msg}");
    }

    // ── objects ───────────────────────────────────────────────────────────

    #[test]
    fn each_object_becomes_a_mesh() {
        let scene = ok("v 0 0 0\nv 1 0 0\nv 0 1 0\n\
                        o first\nf 1 2 3\n\
                        o second\nf 3 2 1\n");
        let names: Vec<_> = scene.meshes.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["first", "second"]);
        assert!(scene.meshes.iter().all(|m| m.triangles.len() == 1));
    }

    #[test]
    fn empty_objects_are_dropped() {
        let scene = ok("o empty\nv 0 0 0\nv 1 0 0\nv 0 1 0\no full\nf 1 2 3\no trailing\n");
        assert_eq!(scene.meshes.len(), 1);
        assert_eq!(scene.meshes[0].name, "full");
    }

    #[test]
    fn faces_before_first_object_use_default_mesh() {
        let scene = ok("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\no named thing\nf 1 2 3\n");
        assert_eq!(scene.meshes[0].name, DEFAULT_MESH);
        assert_eq!(scene.meshes[1].name, "named thing");
    }

    #[test]
    fn object_without_name_is_unnamed() {
        let scene = ok("v 0 0 0\nv 1 0 0\nv 0 1 0\no\nf 1 2 3\n");
        assert_eq!(scene.meshes[0].name, UNNAMED_MESH);
    }

    // ── skipped input ─────────────────────────────────────────────────────

    #[test]
    fn materials_are_recorded_but_do_not_change_geometry() {
        let plain = ok(TRIANGLE);
        let with_mtl = ok("mtllib a.mtl b.mtl\nv 0 0 0\nv 1 0 0\nv 0 1 0\nusemtl red\nf 1 2 3\n");
        assert_eq!(with_mtl.meshes, plain.meshes);
        assert_eq!(with_mtl.material_libraries, ["a.mtl", "b.mtl"]);
    }

    #[test]
    fn unknown_directives_comments_and_blank_lines_are_skipped() {
        let scene = ok("# header\n\n   \ng group\ns off\nv 0 0 0 # origin\nv 1 0 0\nv 0 1 0\nf 1 2 3 # tri\n");
        assert_eq!(scene.triangle_count(), 1);
    }

    #[test]
    fn crlf_line_endings_are_accepted() {
        let scene = ok("v 0 0 0\r\nv 1 0 0\r\nv 0 1 0\r\nf 1 2 3\r\n");
        assert_eq!(scene.triangle_count(), 1);
    }

    #[test]
    fn extension_check_is_case_insensitive() {
        assert!(has_obj_extension(Path::new("a/b/model.obj")));
        assert!(has_obj_extension(Path::new("MODEL.OBJ")));
        assert!(!has_obj_extension(Path::new("model.stl")));
        assert!(!has_obj_extension(Path::new("obj")));
    }
}
