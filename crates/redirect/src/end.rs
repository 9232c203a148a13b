//! End-type portal arrivals.
//!
//! Travel is directional: leaving a normal world lands on a generated
//! obsidian platform in the linked end world, leaving an end world lands on
//! the linked normal world's spawn point.

use worldgate_common::{BlockPos, Environment, Location, Material, PortalKind};
use worldgate_kernel::{BlockAccess, WorldInfo};

use crate::error::RedirectError;

/// Block an arriving entity stands in. The platform sits one block below.
pub const PLATFORM_ANCHOR: BlockPos = BlockPos::new(100, 50, 0);
/// Half-width of the square platform (5×5).
pub const PLATFORM_RADIUS: i32 = 2;
/// Layers of air kept open above every platform block.
pub const PLATFORM_CLEARANCE: i32 = 3;
/// Facing on arrival at the platform (west, level).
pub const ARRIVAL_YAW: f32 = 90.0;

/// Direction of an end-type crossing, decided by the source environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndDirection {
    /// Normal → End: arrive on the platform.
    Outbound,
    /// End → Normal: arrive at spawn.
    Return,
}

impl EndDirection {
    pub fn for_source(source: &WorldInfo) -> Result<Self, RedirectError> {
        match source.environment {
            Environment::Normal => Ok(Self::Outbound),
            Environment::End => Ok(Self::Return),
            Environment::Nether => Err(RedirectError::UnsupportedSource {
                world: source.key.clone(),
                environment: source.environment,
            }),
        }
    }

    /// Environment the linked destination must have.
    pub fn expected_destination(self) -> Environment {
        match self {
            Self::Outbound => Environment::End,
            Self::Return => Environment::Normal,
        }
    }
}

/// Where an end crossing lands.
#[derive(Debug, Clone, PartialEq)]
pub enum EndArrival {
    /// On the platform anchor; the platform must be built before use.
    Platform(Location),
    /// At the destination's spawn point.
    Spawn(Location),
}

impl EndArrival {
    pub fn location(&self) -> &Location {
        match self {
            Self::Platform(loc) | Self::Spawn(loc) => loc,
        }
    }

    pub fn into_location(self) -> Location {
        match self {
            Self::Platform(loc) | Self::Spawn(loc) => loc,
        }
    }
}

/// Decide the arrival for a crossing from `source` into the linked
/// `destination`, checking the link matches the travel direction.
pub fn plan_arrival(
    source: &WorldInfo,
    destination: &WorldInfo,
) -> Result<EndArrival, RedirectError> {
    let direction = EndDirection::for_source(source)?;
    let expected = direction.expected_destination();
    if destination.environment != expected {
        return Err(RedirectError::LinkKindMismatch {
            origin: source.key.clone(),
            destination: destination.key.clone(),
            kind: PortalKind::End,
            expected,
            actual: destination.environment,
        });
    }
    Ok(match direction {
        EndDirection::Outbound => EndArrival::Platform(platform_location(destination)),
        EndDirection::Return => EndArrival::Spawn(destination.spawn.clone()),
    })
}

/// Arrival point on top of the platform in `world`.
pub fn platform_location(world: &WorldInfo) -> Location {
    Location::new(world.key.clone(), PLATFORM_ANCHOR.bottom_center()).with_facing(ARRIVAL_YAW, 0.0)
}

/// Make sure the arrival platform exists: a 5×5 obsidian layer under the
/// anchor and three air layers above it.
///
/// Blocks already in the target state are not rewritten. Every write is read
/// back; a block the host refused to change aborts construction. Returns the
/// number of blocks written.
pub fn build_platform(world: &mut impl BlockAccess) -> Result<usize, RedirectError> {
    let mut written = 0;
    for dx in -PLATFORM_RADIUS..=PLATFORM_RADIUS {
        for dz in -PLATFORM_RADIUS..=PLATFORM_RADIUS {
            let column = PLATFORM_ANCHOR.offset(dx, 0, dz);
            written += ensure(world, column.offset(0, -1, 0), Material::Obsidian)?;
            for dy in 0..PLATFORM_CLEARANCE {
                written += ensure(world, column.offset(0, dy, 0), Material::Air)?;
            }
        }
    }
    if written > 0 {
        tracing::info!(world = %world.info().key, written, "end platform built");
    }
    Ok(written)
}

fn ensure(
    world: &mut impl BlockAccess,
    pos: BlockPos,
    material: Material,
) -> Result<usize, RedirectError> {
    if world.material_at(pos) == material {
        return Ok(0);
    }
    world.set_material(pos, material.clone());
    if world.material_at(pos) != material {
        return Err(RedirectError::BlockRejected {
            world: world.info().key.clone(),
            pos,
        });
    }
    Ok(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;
    use worldgate_common::WorldKey;
    use worldgate_kernel::World;

    fn info(key: &str, environment: Environment) -> WorldInfo {
        WorldInfo::new(
            WorldKey::new(key).unwrap(),
            key,
            environment,
            DVec3::new(12.5, 70.0, -3.5),
        )
    }

    #[test]
    fn direction_follows_source_environment() {
        assert_eq!(
            EndDirection::for_source(&info("worlds:a", Environment::Normal)),
            Ok(EndDirection::Outbound)
        );
        assert_eq!(
            EndDirection::for_source(&info("worlds:a", Environment::End)),
            Ok(EndDirection::Return)
        );
        assert!(matches!(
            EndDirection::for_source(&info("worlds:a", Environment::Nether)),
            Err(RedirectError::UnsupportedSource {
                environment: Environment::Nether,
                ..
            })
        ));
    }

    #[test]
    fn outbound_targets_platform_anchor() {
        let src = info("worlds:hub", Environment::Normal);
        let dst = info("worlds:void", Environment::End);
        let arrival = plan_arrival(&src, &dst).unwrap();
        let EndArrival::Platform(loc) = arrival else {
            panic!("expected platform arrival");
        };
        assert_eq!(loc.world, dst.key);
        assert_eq!(loc.position, DVec3::new(100.5, 50.0, 0.5));
        assert_eq!(loc.yaw, ARRIVAL_YAW);
    }

    #[test]
    fn return_targets_spawn() {
        let src = info("worlds:void", Environment::End);
        let dst = info("worlds:hub", Environment::Normal);
        let arrival = plan_arrival(&src, &dst).unwrap();
        assert_eq!(arrival, EndArrival::Spawn(dst.spawn.clone()));
        assert_eq!(arrival.location().position, DVec3::new(12.5, 70.0, -3.5));
    }

    #[test]
    fn outbound_to_normal_world_is_mismatch() {
        let src = info("worlds:hub", Environment::Normal);
        let dst = info("worlds:other", Environment::Normal);
        let err = plan_arrival(&src, &dst).unwrap_err();
        assert!(matches!(
            err,
            RedirectError::LinkKindMismatch {
                expected: Environment::End,
                actual: Environment::Normal,
                ..
            }
        ));
    }

    #[test]
    fn return_to_end_world_is_mismatch() {
        let src = info("worlds:void", Environment::End);
        let dst = info("worlds:void2", Environment::End);
        assert!(matches!(
            plan_arrival(&src, &dst),
            Err(RedirectError::LinkKindMismatch {
                expected: Environment::Normal,
                ..
            })
        ));
    }

    #[test]
    fn platform_shape() {
        let mut world = World::new(info("worlds:void", Environment::End));
        // Obstruct the arrival space and part of the floor.
        world.set_material(PLATFORM_ANCHOR.offset(0, 1, 0), Material::Other("end_stone".into()));
        world.set_material(PLATFORM_ANCHOR.offset(2, -1, 2), Material::Obsidian);

        let written = build_platform(&mut world).unwrap();
        // 25 floor blocks minus the one already in place, plus the cleared block.
        assert_eq!(written, 25);

        for dx in -2..=2 {
            for dz in -2..=2 {
                let col = PLATFORM_ANCHOR.offset(dx, 0, dz);
                assert_eq!(world.material_at(col.offset(0, -1, 0)), Material::Obsidian);
                for dy in 0..3 {
                    assert!(world.material_at(col.offset(0, dy, 0)).is_air());
                }
            }
        }
        assert!(world.material_at(PLATFORM_ANCHOR.offset(3, -1, 0)).is_air());
        assert_eq!(world.block_count(), 25);
    }

    #[test]
    fn platform_is_idempotent() {
        let mut world = World::new(info("worlds:void", Environment::End));
        build_platform(&mut world).unwrap();
        let hash = world.state_hash();
        let events = world.events().len();

        assert_eq!(build_platform(&mut world).unwrap(), 0);
        assert_eq!(world.state_hash(), hash);
        assert_eq!(world.events().len(), events);
    }

    #[test]
    fn refused_write_is_reported_and_retry_is_safe() {
        let mut world = World::new(info("worlds:void", Environment::End));
        let blocked = PLATFORM_ANCHOR.offset(1, -1, 1);
        world.protect(blocked, blocked);

        let err = build_platform(&mut world).unwrap_err();
        assert_eq!(
            err,
            RedirectError::BlockRejected {
                world: WorldKey::new("worlds:void").unwrap(),
                pos: blocked,
            }
        );
        // Everything written before the refusal is in its final state.
        assert!(world.block_count() > 0);
        for (pos, material) in world.events().iter().map(|e| (e.pos, &e.new)) {
            assert_eq!(&world.material_at(pos), material);
        }
    }
}
