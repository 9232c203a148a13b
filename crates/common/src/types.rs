use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::WorldKey;

/// Unique identifier for an entity crossing a portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether an entity is player-controlled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    NonPlayer,
}

/// Reference to the entity carried by a teleport occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: EntityId,
    pub kind: EntityKind,
}

impl EntityRef {
    pub fn player(id: EntityId) -> Self {
        Self {
            id,
            kind: EntityKind::Player,
        }
    }

    pub fn non_player(id: EntityId) -> Self {
        Self {
            id,
            kind: EntityKind::NonPlayer,
        }
    }

    pub fn is_player(&self) -> bool {
        self.kind == EntityKind::Player
    }
}

/// Dimension kind of a world. Custom worlds pick one of the same three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Normal,
    Nether,
    End,
}

impl Environment {
    pub const ALL: [Self; 3] = [Self::Normal, Self::Nether, Self::End];

    /// Canonical string key used in configs and logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Nether => "nether",
            Self::End => "end",
        }
    }
}

/// Kind of dimension-crossing structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortalKind {
    Nether,
    End,
}

impl PortalKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Nether => "nether",
            Self::End => "end",
        }
    }
}

/// Errors from parsing an [`Environment`] or [`PortalKind`] name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {what} {value:?}")]
pub struct ParseKindError {
    what: &'static str,
    value: String,
}

impl FromStr for Environment {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "normal" | "overworld" => Ok(Self::Normal),
            "nether" | "the_nether" => Ok(Self::Nether),
            "end" | "the_end" => Ok(Self::End),
            _ => Err(ParseKindError {
                what: "environment",
                value: s.to_owned(),
            }),
        }
    }
}

impl FromStr for PortalKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nether" => Ok(Self::Nether),
            "end" => Ok(Self::End),
            _ => Err(ParseKindError {
                what: "portal kind",
                value: s.to_owned(),
            }),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl fmt::Display for PortalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Integer block coordinate. Ordered for deterministic iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// The block containing a world-space point.
    pub fn containing(point: DVec3) -> Self {
        let p = point.floor();
        Self::new(p.x as i32, p.y as i32, p.z as i32)
    }

    /// Bottom-center of this block, where an entity standing on the block
    /// below it would be placed.
    pub fn bottom_center(self) -> DVec3 {
        DVec3::new(self.x as f64 + 0.5, self.y as f64, self.z as f64 + 0.5)
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Block material as seen through the host's block surface.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Material {
    #[default]
    Air,
    Obsidian,
    /// Any other host material, by its registry name.
    Other(String),
}

impl Material {
    pub fn is_air(&self) -> bool {
        matches!(self, Self::Air)
    }
}

/// A position and facing inside a specific world.
///
/// Locations are values: transforms produce new locations rather than
/// mutating existing ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub world: WorldKey,
    pub position: DVec3,
    pub yaw: f32,
    pub pitch: f32,
}

impl Location {
    pub fn new(world: WorldKey, position: DVec3) -> Self {
        Self {
            world,
            position,
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    pub fn with_facing(self, yaw: f32, pitch: f32) -> Self {
        Self { yaw, pitch, ..self }
    }

    pub fn with_position(&self, position: DVec3) -> Self {
        Self {
            position,
            ..self.clone()
        }
    }

    pub fn block_pos(&self) -> BlockPos {
        BlockPos::containing(self.position)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:.2}, {:.2}, {:.2}) yaw={:.1} pitch={:.1}",
            self.world,
            self.position.x,
            self.position.y,
            self.position.z,
            self.yaw,
            self.pitch
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_id_uniqueness() {
        let a = EntityId::new();
        let b = EntityId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn environment_parses_aliases() {
        assert_eq!("overworld".parse::<Environment>(), Ok(Environment::Normal));
        assert_eq!("THE_END".parse::<Environment>(), Ok(Environment::End));
        assert!("void".parse::<Environment>().is_err());
        assert_eq!("nether".parse::<PortalKind>(), Ok(PortalKind::Nether));
        assert!("gateway".parse::<PortalKind>().is_err());
    }

    #[test]
    fn block_pos_containing_floors_negatives() {
        assert_eq!(
            BlockPos::containing(DVec3::new(-0.5, 64.9, 3.2)),
            BlockPos::new(-1, 64, 3)
        );
    }

    #[test]
    fn location_builders_do_not_mutate() {
        let world = WorldKey::new("worlds:hub").unwrap();
        let base = Location::new(world.clone(), DVec3::new(1.0, 2.0, 3.0)).with_facing(45.0, 10.0);
        let moved = base.with_position(DVec3::new(9.0, 2.0, 9.0));
        assert_eq!(base.position, DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(moved.yaw, 45.0);
        assert_eq!(moved.world, world);
    }

    #[test]
    fn material_defaults_to_air() {
        assert!(Material::default().is_air());
        assert!(!Material::Obsidian.is_air());
    }
}
