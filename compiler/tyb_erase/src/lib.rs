//! Mapping structural types onto the target's nominal type system.
//!
//! [`TypeEraser`] decides which target type expression stands for a
//! structural type in a given position. [`BoxingPolicy`] decides whether a
//! value travels in native or boxed form, and what adapter a boundary needs
//! when producer and consumer disagree.

mod boxing;
mod eraser;
mod error;
mod target;

pub use boxing::{check_boundary, BoundarySite, Boxing, BoxingAdapter, BoxingPolicy, Usage};
pub use eraser::{ErasureContext, TypeEraser};
pub use error::{BoxingMismatch, EraseError};
pub use target::{TargetType, TypeArg};
