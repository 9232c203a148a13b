//! Shared vocabulary for the worldgate crates: world identity, dimension and
//! portal kinds, locations and block materials.

mod key;
mod types;

pub use key::{KeyError, WorldKey};
pub use types::{
    BlockPos, EntityId, EntityKind, EntityRef, Environment, Location, Material, ParseKindError,
    PortalKind,
};
