//! Reader for the WaveFront **`.obj`** geometry format.
//!
//! The reader streams a text source line by line and builds a [`Scene`]: a
//! list of named [`Mesh`]es, each a list of [`Triangle`]s carrying positions
//! and unit normals. Only geometry is read; material libraries are recorded
//! by name and never opened.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`directive`] | `Directive`, the closed set of recognized keywords |
//! | [`error`] | `ObjError`, `RecordFault`, `Pool` |
//! | [`parser`] | `load`, `parse_reader`, `parse_str` entry points |
//! | [`scene`] | `Scene`, `Mesh`, `Triangle`, `Aabb` |
//!
//! # Quick start
//!
//! ```rust
//! use lumen_obj::parse_str;
//!
//! let src = "
//!     v 0 0 0
//!     v 1 0 0
//!     v 0 1 0
//!     f 1 2 3
//! ";
//!
//! let scene = parse_str("inline", src).unwrap();
//! assert_eq!(scene.meshes.len(), 1);
//! assert_eq!(scene.triangle_count(), 1);
//! ```

pub mod directive;
pub mod error;
pub mod parser;
pub mod scene;

pub use directive::Directive;
pub use error::{ObjError, Pool, RecordFault};
pub use parser::{has_obj_extension, load, parse_reader, parse_str};
pub use scene::{Aabb, Mesh, Scene, Triangle};
