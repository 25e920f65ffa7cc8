//! Small fixed-arity vector types used across lumen.
//!
//! All components are `f32`, matching what the GPU side consumes. Vectors are
//! `Copy` values; every operation returns a new vector.
//!
//! | Type | Components |
//! |------|------------|
//! | [`Vec2`] | `x, y` |
//! | [`Vec3`] | `x, y, z` |
//! | [`Vec4`] | `x, y, z, w` |

#[macro_use]
mod macros;
mod vec2;
mod vec3;
mod vec4;

pub use vec2::Vec2;
pub use vec3::Vec3;
pub use vec4::Vec4;
