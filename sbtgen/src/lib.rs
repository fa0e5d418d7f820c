//! `sbtgen` compiles a shader binding table into dispatch code for a
//! software ray-tracing pipeline.
//!
//! A **shader binding table** (SBT) is an ordered list of records.  Each record
//! names the shaders (ray generation, closest-hit, any-hit, miss) bound to its
//! index.  At trace time, the pipeline computes a record index and needs to call
//! the matching shader; since OpenCL C has no function pointers, that call is
//! a generated `switch` statement.
//!
//! # Loading a table
//! Tables are stored as JSON, and parsed into an
//! [`SbtTable`](crate::table::SbtTable):
//! ```
//! use sbtgen::table::{SbtTable, Stage};
//!
//! let table: SbtTable = r#"[
//!     {"raygen": "rgen", "closestHit": "diffuse", "miss": "sky"},
//!     {"closestHit": "mirror"}
//! ]"#.parse()?;
//! assert_eq!(table.len(), 2);
//! assert_eq!(table.get(1).unwrap().symbol(Stage::ClosestHit), Some("mirror"));
//! # Ok::<(), sbtgen::Error>(())
//! ```
//!
//! # Generating dispatch code
//! A [`Variant`](crate::dispatch::Variant) selects the calling convention and
//! which dispatch functions are emitted.  The
//! [`compose`](crate::compose) module builds every function for a variant and
//! appends them to a base shader source:
//! ```
//! use sbtgen::{compose, dispatch::Variant, table::SbtTable};
//!
//! let table: SbtTable = r#"[{"closestHit": "diffuse", "miss": "sky"}]"#
//!     .parse()?;
//! let functions = compose::generate(&table, &Variant::legacy());
//! let out = compose::compose("// shader.cl\n", &functions);
//! assert!(out.contains("case 0: diffuse(payload, hitData, sceneData); break;"));
//! assert!(out.contains("case 0: sky(payload, sceneData); break;"));
//! # Ok::<(), sbtgen::Error>(())
//! ```
//!
//! There are two preset variants:
//! - [`Variant::legacy`](crate::dispatch::Variant::legacy) emits `callHit` and
//!   `callMiss`, each ending with a `default:` branch that prints an error when
//!   no shader is bound to the index.
//! - [`Variant::textured`](crate::dispatch::Variant::textured) emits
//!   `callAnyHit`, `callHit`, and `callMiss`, threading texture parameters
//!   through the `TEXTURE_TYPE` and `TEXTURE_PARAM` macros.  It has no
//!   `default:` branch, so an unbound index runs no shader.
#![warn(missing_docs)]

mod error;
pub use error::Error;

pub mod compose;
pub mod dispatch;
pub mod table;
