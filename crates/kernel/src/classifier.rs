use worldgate_common::{Environment, WorldKey};

/// Identity key of the host's built-in normal world.
pub const OVERWORLD: &str = "minecraft:overworld";
/// Identity key of the host's built-in nether world.
pub const THE_NETHER: &str = "minecraft:the_nether";
/// Identity key of the host's built-in end world.
pub const THE_END: &str = "minecraft:the_end";

const BUILT_IN: [&str; 3] = [OVERWORLD, THE_NETHER, THE_END];

/// Whether the key names one of the three built-in dimensions.
///
/// Compares identity keys by value. Display names and environment kinds are
/// deliberately not consulted: a custom world may be called "world" and be of
/// kind Normal without being the built-in overworld.
pub fn is_built_in(key: &WorldKey) -> bool {
    BUILT_IN.contains(&key.as_str())
}

/// The built-in world key for an environment kind.
pub fn builtin_key(environment: Environment) -> WorldKey {
    let raw = match environment {
        Environment::Normal => OVERWORLD,
        Environment::Nether => THE_NETHER,
        Environment::End => THE_END,
    };
    WorldKey::from_static(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_keys_are_built_in() {
        for env in Environment::ALL {
            assert!(is_built_in(&builtin_key(env)));
        }
    }

    #[test]
    fn custom_worlds_are_not_built_in() {
        let custom = WorldKey::new("worlds:mining").unwrap();
        assert!(!is_built_in(&custom));
    }

    #[test]
    fn bare_overworld_key_resolves_to_builtin() {
        // "overworld" parses into the minecraft namespace, same identity.
        let key = WorldKey::new("overworld").unwrap();
        assert!(is_built_in(&key));
    }

    #[test]
    fn same_path_other_namespace_is_custom() {
        let key = WorldKey::new("worlds:overworld").unwrap();
        assert!(!is_built_in(&key));
    }
}
