use glam::DVec3;
use std::collections::BTreeMap;
use worldgate_common::{Environment, WorldKey};

use crate::classifier::builtin_key;
use crate::world::{BlockAccess, World, WorldInfo};

/// The host's world manager, as seen by the redirection engine.
pub trait WorldHost {
    type World: BlockAccess;

    fn world(&self, key: &WorldKey) -> Option<&Self::World>;

    fn world_mut(&mut self, key: &WorldKey) -> Option<&mut Self::World>;
}

/// In-memory collection of loaded worlds, keyed by identity.
#[derive(Debug, Clone, Default)]
pub struct Universe {
    worlds: BTreeMap<WorldKey, World>,
}

impl Universe {
    /// An empty universe with no worlds loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// A universe holding the three built-in dimensions at their vanilla
    /// spawn points.
    pub fn with_builtins() -> Self {
        let mut universe = Self::new();
        for (env, name, spawn) in [
            (Environment::Normal, "world", DVec3::new(0.5, 64.0, 0.5)),
            (Environment::Nether, "world_nether", DVec3::new(0.5, 64.0, 0.5)),
            (Environment::End, "world_the_end", DVec3::new(100.5, 50.0, 0.5)),
        ] {
            universe.insert(World::new(WorldInfo::new(builtin_key(env), name, env, spawn)));
        }
        universe
    }

    /// Load a world, replacing any world with the same key.
    pub fn insert(&mut self, world: World) -> Option<World> {
        let key = world.key().clone();
        tracing::debug!(world = %key, "world loaded");
        self.worlds.insert(key, world)
    }

    /// Unload a world, returning it if it was loaded.
    pub fn remove(&mut self, key: &WorldKey) -> Option<World> {
        self.worlds.remove(key)
    }

    /// Loaded world with this key.
    pub fn get(&self, key: &WorldKey) -> Option<&World> {
        self.worlds.get(key)
    }

    /// Mutable access to a loaded world, for block writes.
    pub fn get_mut(&mut self, key: &WorldKey) -> Option<&mut World> {
        self.worlds.get_mut(key)
    }

    /// Number of loaded worlds, built-ins included.
    pub fn len(&self) -> usize {
        self.worlds.len()
    }

    /// Whether no world is loaded.
    pub fn is_empty(&self) -> bool {
        self.worlds.is_empty()
    }

    /// Iterate worlds in key order.
    pub fn iter(&self) -> impl Iterator<Item = &World> {
        self.worlds.values()
    }
}

impl WorldHost for Universe {
    type World = World;

    fn world(&self, key: &WorldKey) -> Option<&World> {
        self.get(key)
    }

    fn world_mut(&mut self, key: &WorldKey) -> Option<&mut World> {
        self.get_mut(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_loaded() {
        let u = Universe::with_builtins();
        assert_eq!(u.len(), 3);
        for env in Environment::ALL {
            let world = u.get(&builtin_key(env)).unwrap();
            assert_eq!(world.info().environment, env);
            assert!(world.info().is_built_in());
        }
    }

    #[test]
    fn custom_world_can_share_a_builtin_name() {
        let mut u = Universe::with_builtins();
        let key = WorldKey::new("worlds:world").unwrap();
        u.insert(World::new(WorldInfo::new(
            key.clone(),
            "world",
            Environment::Normal,
            DVec3::ZERO,
        )));
        assert_eq!(u.len(), 4);
        assert!(!u.get(&key).unwrap().info().is_built_in());
    }

    #[test]
    fn insert_replaces_same_key() {
        let mut u = Universe::new();
        let key = WorldKey::new("worlds:a").unwrap();
        let info = WorldInfo::new(key.clone(), "a", Environment::Normal, DVec3::ZERO);
        assert!(u.insert(World::new(info.clone())).is_none());
        assert!(u.insert(World::new(info)).is_some());
        assert_eq!(u.len(), 1);
        assert!(u.remove(&key).is_some());
        assert!(u.is_empty());
    }

    #[test]
    fn iteration_is_key_ordered() {
        let u = Universe::with_builtins();
        let keys: Vec<&str> = u.iter().map(|w| w.key().as_str()).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }
}
