use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use worldgate_common::{BlockPos, Environment, Location, Material, WorldKey};

use crate::classifier;

/// Host-owned description of a world instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldInfo {
    pub key: WorldKey,
    /// Display name. Not unique and never used for identity.
    pub name: String,
    pub environment: Environment,
    pub spawn: Location,
}

impl WorldInfo {
    /// Describe a world whose spawn sits at `spawn` inside itself.
    pub fn new(
        key: WorldKey,
        name: impl Into<String>,
        environment: Environment,
        spawn: glam::DVec3,
    ) -> Self {
        Self {
            spawn: Location::new(key.clone(), spawn),
            key,
            name: name.into(),
            environment,
        }
    }

    pub fn is_built_in(&self) -> bool {
        classifier::is_built_in(&self.key)
    }
}

/// The block-level surface of a single world.
///
/// This is the only channel through which the redirection engine mutates
/// world state.
pub trait BlockAccess {
    fn info(&self) -> &WorldInfo;

    fn material_at(&self, pos: BlockPos) -> Material;

    /// Request a block change. Hosts may refuse (protected regions, unloaded
    /// chunks); callers verify by reading the block back.
    fn set_material(&mut self, pos: BlockPos, material: Material);
}

/// A recorded block change. Only writes that changed a block are recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockEvent {
    pub pos: BlockPos,
    pub old: Material,
    pub new: Material,
}

/// In-memory world used as the reference host.
///
/// Blocks are stored sparsely in a BTreeMap (absent means air) so iteration
/// and hashing are deterministic.
#[derive(Debug, Clone)]
pub struct World {
    info: WorldInfo,
    blocks: BTreeMap<BlockPos, Material>,
    /// Inclusive boxes in which writes are silently dropped.
    protected: Vec<(BlockPos, BlockPos)>,
    /// Append-only log of effective block changes.
    event_log: Vec<BlockEvent>,
}

impl World {
    pub fn new(info: WorldInfo) -> Self {
        Self {
            info,
            blocks: BTreeMap::new(),
            protected: Vec::new(),
            event_log: Vec::new(),
        }
    }

    pub fn key(&self) -> &WorldKey {
        &self.info.key
    }

    /// Number of non-air blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[BlockEvent] {
        &self.event_log
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<BlockEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Drop every write that lands inside the inclusive box `min..=max`.
    pub fn protect(&mut self, min: BlockPos, max: BlockPos) {
        self.protected.push((min, max));
    }

    fn is_protected(&self, pos: BlockPos) -> bool {
        self.protected.iter().any(|(min, max)| {
            (min.x..=max.x).contains(&pos.x)
                && (min.y..=max.y).contains(&pos.y)
                && (min.z..=max.z).contains(&pos.z)
        })
    }

    /// Compute a deterministic hash of the block state for comparison.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325; // FNV offset basis
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        mix(&mut h, self.info.key.as_str().as_bytes());
        for (pos, material) in &self.blocks {
            mix(&mut h, &pos.x.to_le_bytes());
            mix(&mut h, &pos.y.to_le_bytes());
            mix(&mut h, &pos.z.to_le_bytes());
            match material {
                Material::Air => mix(&mut h, &[0]),
                Material::Obsidian => mix(&mut h, &[1]),
                Material::Other(name) => {
                    mix(&mut h, &[2]);
                    mix(&mut h, name.as_bytes());
                }
            }
        }
        h
    }
}

impl BlockAccess for World {
    fn info(&self) -> &WorldInfo {
        &self.info
    }

    fn material_at(&self, pos: BlockPos) -> Material {
        self.blocks.get(&pos).cloned().unwrap_or_default()
    }

    fn set_material(&mut self, pos: BlockPos, material: Material) {
        if self.is_protected(pos) {
            tracing::debug!(world = %self.info.key, %pos, "write dropped in protected region");
            return;
        }
        let old = self.material_at(pos);
        if old == material {
            return;
        }
        if material.is_air() {
            self.blocks.remove(&pos);
        } else {
            self.blocks.insert(pos, material.clone());
        }
        self.event_log.push(BlockEvent {
            pos,
            old,
            new: material,
        });
    }
}
