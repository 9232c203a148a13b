use worldgate_common::{BlockPos, Environment, PortalKind, WorldKey};

/// Fatal, occurrence-scoped failures of the redirection engine.
///
/// A missing link is not an error and has no variant here.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RedirectError {
    #[error("no scale factor configured for {0} worlds")]
    MissingScale(Environment),
    #[error("scale factor for {environment} worlds must be positive and finite, got {value}")]
    InvalidScale { environment: Environment, value: f64 },
    #[error(
        "{kind} link {origin} -> {destination} leads to a {actual} world, expected {expected}"
    )]
    LinkKindMismatch {
        origin: WorldKey,
        destination: WorldKey,
        kind: PortalKind,
        expected: Environment,
        actual: Environment,
    },
    #[error("world {0} is not loaded")]
    UnknownWorld(WorldKey),
    #[error("end portals cannot be routed from {environment} world {world}")]
    UnsupportedSource {
        world: WorldKey,
        environment: Environment,
    },
    #[error("host refused block write at {pos} in {world}")]
    BlockRejected { world: WorldKey, pos: BlockPos },
}
