//! Portal Redirection Engine.
//!
//! Routes nether-type and end-type portal crossings out of custom worlds
//! through a link directory, rescales nether travel by per-environment scale
//! factors, and builds the arrival platform for end travel. Built-in world
//! traffic is never touched.
//!
//! # Invariants
//! - The link directory is never consulted for a built-in source world.
//! - Host event fields are written only by the orchestrator, and only on
//!   success.
//! - Fatal errors abort the current occurrence only.

pub mod config;
pub mod end;
pub mod error;
pub mod events;
pub mod notice;
pub mod orchestrator;
pub mod scale;

pub use config::{ConfigError, RedirectConfig};
pub use end::{EndArrival, EndDirection};
pub use error::RedirectError;
pub use events::{EntityTeleport, PlayerTeleport, PortalReady, TeleportCause};
pub use notice::{MessageCatalog, Notice, NoticeError, Notifier, RecordingNotifier, SilentNotifier};
pub use orchestrator::{Outcome, PortalRedirector};
pub use scale::{ScaledTarget, scale_nether_target};
