use glam::DVec3;
use worldgate_common::Location;
use worldgate_kernel::WorldInfo;

use crate::config::RedirectConfig;
use crate::error::RedirectError;

/// Result of rescaling a nether crossing.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledTarget {
    pub location: Location,
    pub source_scale: f64,
    pub destination_scale: f64,
}

impl ScaledTarget {
    /// Multiplier applied to horizontal coordinates.
    pub fn ratio(&self) -> f64 {
        self.source_scale / self.destination_scale
    }
}

/// Rescale `source` into `destination` by the ratio of their environments'
/// scale factors.
///
/// Only x and z are scaled. Height and facing are carried over unchanged.
/// With the default factors a normal → nether crossing divides x and z by 8,
/// and the reverse multiplies them by 8.
pub fn scale_nether_target(
    source: &Location,
    source_world: &WorldInfo,
    destination: &WorldInfo,
    config: &RedirectConfig,
) -> Result<ScaledTarget, RedirectError> {
    let source_scale = config.scale_for(source_world.environment)?;
    let destination_scale = config.scale_for(destination.environment)?;
    let ratio = source_scale / destination_scale;

    let p = source.position;
    let location = Location {
        world: destination.key.clone(),
        position: DVec3::new(p.x * ratio, p.y, p.z * ratio),
        yaw: source.yaw,
        pitch: source.pitch,
    };
    tracing::debug!(
        from = %source.world,
        to = %destination.key,
        ratio,
        "scaled nether target"
    );
    Ok(ScaledTarget {
        location,
        source_scale,
        destination_scale,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use worldgate_common::{Environment, WorldKey};

    fn info(key: &str, environment: Environment) -> WorldInfo {
        WorldInfo::new(WorldKey::new(key).unwrap(), key, environment, DVec3::ZERO)
    }

    fn at(world: &WorldInfo, x: f64, y: f64, z: f64) -> Location {
        Location::new(world.key.clone(), DVec3::new(x, y, z)).with_facing(37.5, -12.0)
    }

    #[test]
    fn normal_to_nether_divides_by_eight() {
        let hub = info("worlds:hub", Environment::Normal);
        let deep = info("worlds:deep", Environment::Nether);
        let source = at(&hub, 800.0, 71.0, -400.0);
        let scaled = scale_nether_target(&source, &hub, &deep, &RedirectConfig::default()).unwrap();

        assert_eq!(scaled.location.world, deep.key);
        assert_eq!(scaled.location.position, DVec3::new(100.0, 71.0, -50.0));
        assert_eq!(scaled.location.yaw, 37.5);
        assert_eq!(scaled.location.pitch, -12.0);
        assert_eq!(scaled.source_scale, 1.0);
        assert_eq!(scaled.destination_scale, 8.0);
        assert_eq!(scaled.ratio(), 0.125);
    }

    #[test]
    fn custom_ratio_between_custom_worlds() {
        let mut config = RedirectConfig::default();
        config.scales.insert(Environment::Normal, 2.0);
        config.scales.insert(Environment::End, 3.0);
        let a = info("worlds:a", Environment::Normal);
        let b = info("worlds:b", Environment::End);

        let scaled = scale_nether_target(&at(&a, 30.0, 10.0, -60.0), &a, &b, &config).unwrap();
        assert!((scaled.location.position.x - 20.0).abs() < 1e-9);
        assert!((scaled.location.position.z + 40.0).abs() < 1e-9);
        assert_eq!(scaled.location.position.y, 10.0);
    }

    #[test]
    fn same_environment_keeps_coordinates() {
        let a = info("worlds:a", Environment::Normal);
        let b = info("worlds:b", Environment::Normal);
        let source = at(&a, 123.25, 64.0, -7.5);
        let scaled = scale_nether_target(&source, &a, &b, &RedirectConfig::default()).unwrap();
        assert_eq!(scaled.location.position, source.position);
    }

    #[test]
    fn round_trip_restores_horizontal_position() {
        let mut config = RedirectConfig::default();
        config.scales.insert(Environment::Nether, 3.0);
        let hub = info("worlds:hub", Environment::Normal);
        let deep = info("worlds:deep", Environment::Nether);
        let start = at(&hub, 1234.567, 80.0, -98.765);

        let there = scale_nether_target(&start, &hub, &deep, &config).unwrap();
        let back = scale_nether_target(&there.location, &deep, &hub, &config).unwrap();

        assert_eq!(back.location.world, hub.key);
        assert!((back.location.position.x - start.position.x).abs() < 1e-9);
        assert!((back.location.position.z - start.position.z).abs() < 1e-9);
        assert_eq!(back.location.position.y, start.position.y);
    }

    #[test]
    fn missing_source_scale_fails() {
        let mut config = RedirectConfig::default();
        config.scales.remove(&Environment::Normal);
        let hub = info("worlds:hub", Environment::Normal);
        let deep = info("worlds:deep", Environment::Nether);
        let err = scale_nether_target(&at(&hub, 1.0, 1.0, 1.0), &hub, &deep, &config).unwrap_err();
        assert_eq!(err, RedirectError::MissingScale(Environment::Normal));
    }

    #[test]
    fn missing_destination_scale_fails() {
        let mut config = RedirectConfig::default();
        config.scales.remove(&Environment::Nether);
        let hub = info("worlds:hub", Environment::Normal);
        let deep = info("worlds:deep", Environment::Nether);
        let err = scale_nether_target(&at(&hub, 1.0, 1.0, 1.0), &hub, &deep, &config).unwrap_err();
        assert_eq!(err, RedirectError::MissingScale(Environment::Nether));
    }
}
