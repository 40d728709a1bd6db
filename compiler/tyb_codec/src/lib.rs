//! Textual encoding of structural types and declaration metadata.
//!
//! Compiled artifacts only carry the target's erased signatures. The exact
//! source types travel next to them as text:
//!
//! ```text
//! type         := intersection ('|' intersection)*
//! intersection := primary ('&' primary)*
//! primary      := '(' type ')' | 'lang.Bottom' | name ('<' type (',' type)* '>')?
//! name         := ident ('.' ident)*
//! ```
//!
//! [`encode`] and [`decode`] are exact inverses for canonical types. The
//! [`metadata`] module bundles encoded types with the rest of what a
//! declaration needs to be reconstructed.

mod decode;
mod encode;
mod error;
pub mod metadata;
mod resolve;
mod sidecar;

pub use decode::decode;
pub use encode::encode;
pub use error::CodecError;
pub use metadata::{DeclMetadata, Marker, TypeParamInfo};
pub use resolve::{ModelResolver, TypeNameResolver};

/// Encoded form of the bottom type.
pub const BOTTOM: &str = "lang.Bottom";
