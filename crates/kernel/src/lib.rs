//! World Kernel: the world and block surface the redirection engine reads and
//! writes, the built-in world classifier, and an in-memory host.
//!
//! # Invariants
//! - Built-in status is decided by identity key alone.
//! - Block writes that do not change a block are not recorded.

pub mod classifier;
pub mod universe;
pub mod world;

pub use classifier::{builtin_key, is_built_in};
pub use universe::{Universe, WorldHost};
pub use world::{BlockAccess, BlockEvent, World, WorldInfo};
