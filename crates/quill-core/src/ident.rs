//! Identifier generation.
//!
//! Entities that reach the builder without a caller-supplied id get one from
//! an `IdSource`. The default source draws a UUIDv4 suffix, which is
//! collision-resistant far beyond any single process's signer or attachment
//! counts. The trait exists so tests can inject a reproducible source.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

/// A source of fresh, prefix-tagged identifiers.
///
/// Implementations must return a string beginning with `prefix`. They are not
/// required to be deterministic, but must be injectable so callers can pin
/// down id assignment in tests.
pub trait IdSource: fmt::Debug + Send + Sync {
    fn new_id(&self, prefix: &str) -> String;
}

/// Default source: `prefix-<uuid v4, simple form>`.
#[derive(Debug, Clone, Default)]
pub struct RandomIdSource;

impl IdSource for RandomIdSource {
    fn new_id(&self, prefix: &str) -> String {
        format!("{prefix}-{}", Uuid::new_v4().simple())
    }
}

/// Counting source for tests: `prefix-1`, `prefix-2`, ...
#[derive(Debug, Default)]
pub struct SequenceIdSource {
    next: AtomicU64,
}

impl SequenceIdSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdSource for SequenceIdSource {
    fn new_id(&self, prefix: &str) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{prefix}-{n}")
    }
}
