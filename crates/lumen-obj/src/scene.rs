use lumen_math::{Vec2, Vec3};

/// One triangle with per-corner attributes, index-aligned.
///
/// Normals produced by the reader are unit length, or zero for a degenerate
/// face without file normals.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Triangle {
    pub positions: [Vec3; 3],
    pub normals: [Vec3; 3],
    /// Present only when every corner referenced a texture coordinate.
    pub tex_coords: Option<[Vec2; 3]>,
}

impl Triangle {
    /// Geometric normal from the winding order (counter-clockwise is front).
    pub fn face_normal(&self) -> Vec3 {
        let [a, b, c] = self.positions;
        b.minus(a).cross(c.minus(a)).normalized()
    }
}

/// Triangles grouped under one object name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub name: String,
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            triangles: Vec::new(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}

/// Everything one ingestion run produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub meshes: Vec<Mesh>,
    /// `mtllib` names in declaration order. Recorded, never opened.
    pub material_libraries: Vec<String>,
}

impl Scene {
    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(|m| m.triangles.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Bounding box over every triangle position, `None` for an empty scene.
    pub fn bounds(&self) -> Option<Aabb> {
        self.meshes
            .iter()
            .flat_map(|m| m.triangles.iter())
            .flat_map(|t| t.positions)
            .fold(None, |acc: Option<Aabb>, p| {
                Some(match acc {
                    Some(b) => b.including(p),
                    None => Aabb { min: p, max: p },
                })
            })
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn including(self, p: Vec3) -> Self {
        Self {
            min: self.min.min(p),
            max: self.max.max(p),
        }
    }

    pub fn center(&self) -> Vec3 {
        self.min.plus(self.max).scale(0.5)
    }

    pub fn extent(&self) -> Vec3 {
        self.max.minus(self.min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> Triangle {
        Triangle {
            positions: [a.into(), b.into(), c.into()],
            normals: [Vec3::ZERO; 3],
            tex_coords: None,
        }
    }

    #[test]
    fn face_normal_follows_ccw_winding() {
        let t = tri([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        assert_eq!(t.face_normal(), Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn empty_scene_has_no_bounds() {
        assert_eq!(Scene::default().bounds(), None);
    }

    #[test]
    fn bounds_cover_all_meshes() {
        let mut a = Mesh::new("a");
        a.triangles.push(tri([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]));
        let mut b = Mesh::new("b");
        b.triangles.push(tri([-2.0, 0.0, 5.0], [0.0, 3.0, 0.0], [0.0, 0.0, -1.0]));
        let scene = Scene { meshes: vec![a, b], material_libraries: Vec::new() };

        let bounds = scene.bounds().unwrap();
        assert_eq!(bounds.min, Vec3::new(-2.0, 0.0, -1.0));
        assert_eq!(bounds.max, Vec3::new(1.0, 3.0, 5.0));
        assert_eq!(bounds.extent(), Vec3::new(3.0, 3.0, 6.0));
        assert_eq!(bounds.center(), Vec3::new(-0.5, 1.5, 2.0));
        assert_eq!(scene.triangle_count(), 2);
    }
}
