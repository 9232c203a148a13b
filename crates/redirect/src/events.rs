use serde::{Deserialize, Serialize};
use worldgate_common::{EntityId, EntityRef, Location, PortalKind, WorldKey};

/// Why the host is teleporting a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeleportCause {
    NetherPortal,
    EndPortal,
    EndGateway,
    Command,
    Plugin,
    EnderPearl,
    Unknown,
}

impl TeleportCause {
    /// Portal kind for the causes this engine routes.
    pub fn portal_kind(self) -> Option<PortalKind> {
        match self {
            Self::NetherPortal => Some(PortalKind::Nether),
            Self::EndPortal => Some(PortalKind::End),
            Self::EndGateway | Self::Command | Self::Plugin | Self::EnderPearl | Self::Unknown => {
                None
            }
        }
    }
}

/// An entity is about to use a portal; the host asks which world it leads to.
#[derive(Debug, Clone, PartialEq)]
pub struct PortalReady {
    pub source: WorldKey,
    pub kind: PortalKind,
    /// Output: the world the host should search for an exit portal in.
    pub target_world: Option<WorldKey>,
}

impl PortalReady {
    pub fn new(source: WorldKey, kind: PortalKind) -> Self {
        Self {
            source,
            kind,
            target_world: None,
        }
    }
}

/// A player is being teleported.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerTeleport {
    pub player: EntityId,
    pub cause: TeleportCause,
    pub from: Location,
    /// Output: the host's proposed destination, overwritten on redirect.
    pub to: Option<Location>,
}

/// A non-player entity is passing through a portal.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityTeleport {
    pub entity: EntityRef,
    pub kind: PortalKind,
    pub from: Location,
    /// Output: the host's proposed destination, overwritten on redirect.
    pub to: Option<Location>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_portal_causes_map_to_kinds() {
        assert_eq!(
            TeleportCause::NetherPortal.portal_kind(),
            Some(PortalKind::Nether)
        );
        assert_eq!(TeleportCause::EndPortal.portal_kind(), Some(PortalKind::End));
        assert_eq!(TeleportCause::EndGateway.portal_kind(), None);
        assert_eq!(TeleportCause::Command.portal_kind(), None);
    }
}
