//! Per-walk accounting.

/// Counters accumulated while walking one container.
///
/// Walkers take `&mut WalkReport` so progress made before a container-level
/// error is still visible to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkReport {
    /// Messages deleted by this run
    pub deleted: u64,
    /// Messages that were already gone when deleted (404)
    pub already_gone: u64,
    /// Messages skipped as undeletable (403, 400, missing channel)
    pub skipped: u64,
    /// Deletes answered with an unexpected status
    pub failed: u64,
}
