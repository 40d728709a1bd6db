//! Stack growth guard for recursive descent.
//!
//! Type decoding, erasure and declaration completion all recurse over
//! structures whose depth is bounded only by source nesting and supertype
//! chain length. Each recursive entry point wraps its body in
//! [`ensure_sufficient_stack`] so a pathological input grows the stack
//! instead of aborting the process.
//!
//! On `wasm32` the guard is a passthrough.

/// Remaining stack below which a new segment is allocated (128KB).
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment (1MB).
const SEGMENT_SIZE: usize = 1024 * 1024;

/// Run `f`, first growing the stack if less than the red zone remains.
///
/// ```text
/// fn erase(&self, ty: &Type) -> Result<TargetType, EraseError> {
///     ensure_sufficient_stack(|| self.erase_inner(ty))
/// }
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

/// Passthrough on targets that manage their own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
