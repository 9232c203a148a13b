//! Link Directory: maps (source world, portal kind) to a destination world.
//!
//! # Invariants
//! - At most one destination per (source, kind) pair.
//! - A missing link is a normal answer, not an error.

mod table;

pub use table::{LinkError, LinkTable};

use worldgate_common::{PortalKind, WorldKey};

/// Read-only query surface over an externally owned link mapping.
pub trait LinkDirectory {
    /// The world a portal of `kind` in `source` leads to, if one is linked.
    fn resolve(&self, source: &WorldKey, kind: PortalKind) -> Option<WorldKey>;
}

impl<T: LinkDirectory + ?Sized> LinkDirectory for &T {
    fn resolve(&self, source: &WorldKey, kind: PortalKind) -> Option<WorldKey> {
        (**self).resolve(source, kind)
    }
}
