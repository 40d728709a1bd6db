//! Declaration loader for compiled artifacts.
//!
//! Turns classes found in compiled artifacts back into model declarations,
//! lazily and at most once per name. Construction happens in two phases:
//!
//! 1. [`DeclarationLoader::load`] allocates the declaration with its type
//!    parameters, so that signatures referring to it can be built at once.
//! 2. [`DeclarationLoader::ensure_complete`] fills in members, signatures and
//!    supertypes the first time something needs them.
//!
//! Types come from the encoded metadata sidecars when present, otherwise
//! from the erased signatures through reverse erasure.

pub mod artifact;
mod classify;
mod config;
mod error;
mod loader;

pub use artifact::{
    ArtifactSet, ArtifactSource, ClassArtifact, ClassFlags, JvmType, MethodArtifact, MethodFlags,
    ParamArtifact, TypeParamArtifact,
};
pub use classify::{is_equals, MemberKind};
pub use config::LoaderConfig;
pub use error::LoadError;
pub use loader::{DeclarationKind, DeclarationLoader};
