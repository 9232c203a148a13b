use worldgate_common::{EntityRef, Location, PortalKind, WorldKey};
use worldgate_kernel::{BlockAccess, WorldHost, WorldInfo, is_built_in};
use worldgate_links::LinkDirectory;

use crate::config::RedirectConfig;
use crate::end::{self, EndArrival, EndDirection};
use crate::error::RedirectError;
use crate::events::{EntityTeleport, PlayerTeleport, PortalReady};
use crate::notice::{MessageCatalog, Notice, Notifier};
use crate::scale::{ScaledTarget, scale_nether_target};

/// What an entry point did with an occurrence.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Built-in traffic or nothing to refine; the occurrence was not touched.
    Untouched,
    /// No usable link; the host's default behaviour stands.
    MissingLink,
    /// Entity routing is switched off in the configuration.
    Disabled,
    /// The output field was overwritten.
    Redirected,
    /// A fatal error aborted this occurrence; its fields were not touched.
    Failed(RedirectError),
}

impl Outcome {
    pub fn is_redirected(&self) -> bool {
        matches!(self, Self::Redirected)
    }

    pub fn error(&self) -> Option<&RedirectError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }
}

enum Resolution {
    Target(Location),
    NoLink,
    Skip,
}

/// Host-facing entry points of the redirection engine.
///
/// Holds everything a crossing needs besides the host itself: configuration,
/// the link directory and the notice sink. The redirector keeps no state
/// between calls.
pub struct PortalRedirector<L, N> {
    config: RedirectConfig,
    links: L,
    notifier: N,
    catalog: MessageCatalog,
}

impl<L: LinkDirectory, N: Notifier> PortalRedirector<L, N> {
    pub fn new(config: RedirectConfig, links: L, notifier: N) -> Self {
        let catalog = MessageCatalog::with_overrides(&config.messages);
        Self {
            config,
            links,
            notifier,
            catalog,
        }
    }

    pub fn links(&self) -> &L {
        &self.links
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Pick the target world for a nether portal about to be used in a
    /// custom world.
    pub fn on_portal_ready<H: WorldHost>(&self, host: &H, event: &mut PortalReady) -> Outcome {
        let _span =
            tracing::info_span!("portal_ready", source = %event.source, kind = %event.kind)
                .entered();
        if event.kind != PortalKind::Nether || is_built_in(&event.source) {
            return Outcome::Untouched;
        }
        match self.linked_world(host, &event.source, PortalKind::Nether) {
            Some(destination) => {
                tracing::debug!(target_world = %destination.key, "portal target set");
                event.target_world = Some(destination.key);
                Outcome::Redirected
            }
            None => Outcome::MissingLink,
        }
    }

    /// Refine a player teleport caused by a nether or end portal.
    pub fn on_player_teleport<H: WorldHost>(
        &self,
        host: &mut H,
        event: &mut PlayerTeleport,
    ) -> Outcome {
        let _span = tracing::info_span!(
            "player_teleport",
            player = %event.player.0,
            cause = ?event.cause,
            from = %event.from.world
        )
        .entered();
        let Some(kind) = event.cause.portal_kind() else {
            return Outcome::Untouched;
        };
        let entity = EntityRef::player(event.player);
        self.refine(host, entity, kind, &event.from, &mut event.to)
    }

    /// Refine a non-player entity passing through a portal.
    pub fn on_entity_teleport<H: WorldHost>(
        &self,
        host: &mut H,
        event: &mut EntityTeleport,
    ) -> Outcome {
        let _span = tracing::info_span!(
            "entity_teleport",
            entity = %event.entity.id.0,
            kind = %event.kind,
            from = %event.from.world
        )
        .entered();
        if !self.config.teleport_entities
            && !event.entity.is_player()
            && !is_built_in(&event.from.world)
        {
            tracing::debug!("entity portal routing disabled");
            return Outcome::Disabled;
        }
        self.refine(host, event.entity, event.kind, &event.from, &mut event.to)
    }

    fn refine<H: WorldHost>(
        &self,
        host: &mut H,
        entity: EntityRef,
        kind: PortalKind,
        from: &Location,
        to: &mut Option<Location>,
    ) -> Outcome {
        if is_built_in(&from.world) {
            return Outcome::Untouched;
        }
        let resolution = match kind {
            PortalKind::Nether => self.nether_target(host, entity, from, to.as_ref()),
            PortalKind::End => self.end_target(host, from),
        };
        match resolution {
            Ok(Resolution::Target(location)) => {
                tracing::debug!(%location, "destination redirected");
                *to = Some(location);
                Outcome::Redirected
            }
            Ok(Resolution::NoLink) => Outcome::MissingLink,
            Ok(Resolution::Skip) => Outcome::Untouched,
            Err(err) => {
                tracing::error!(%err, "portal redirect aborted");
                Outcome::Failed(err)
            }
        }
    }

    fn nether_target<H: WorldHost>(
        &self,
        host: &H,
        entity: EntityRef,
        from: &Location,
        proposed: Option<&Location>,
    ) -> Result<Resolution, RedirectError> {
        let Some(proposed) = proposed else {
            return Ok(Resolution::Skip);
        };
        let source = world_info(host, &from.world)?;
        let destination = world_info(host, &proposed.world)?;
        let scaled = scale_nether_target(from, source, destination, &self.config)?;
        if entity.is_player() && self.config.notify_scale {
            self.send_scale_notice(entity, &scaled);
        }
        Ok(Resolution::Target(scaled.location))
    }

    fn end_target<H: WorldHost>(
        &self,
        host: &mut H,
        from: &Location,
    ) -> Result<Resolution, RedirectError> {
        let source = world_info(host, &from.world)?.clone();
        EndDirection::for_source(&source)?;
        let Some(destination) = self.linked_world(host, &source.key, PortalKind::End) else {
            return Ok(Resolution::NoLink);
        };
        let arrival = end::plan_arrival(&source, &destination)?;
        if let EndArrival::Platform(_) = arrival {
            let world = host
                .world_mut(&destination.key)
                .ok_or_else(|| RedirectError::UnknownWorld(destination.key.clone()))?;
            end::build_platform(world)?;
        }
        Ok(Resolution::Target(arrival.into_location()))
    }

    /// The loaded world linked from `source`, warning when there is none.
    fn linked_world<H: WorldHost>(
        &self,
        host: &H,
        source: &WorldKey,
        kind: PortalKind,
    ) -> Option<WorldInfo> {
        let Some(destination) = self.links.resolve(source, kind) else {
            tracing::warn!(%source, %kind, "no portal link configured, keeping default behaviour");
            return None;
        };
        match host.world(&destination) {
            Some(world) => Some(world.info().clone()),
            None => {
                tracing::warn!(
                    %source,
                    %kind,
                    %destination,
                    "linked world is not loaded, keeping default behaviour"
                );
                None
            }
        }
    }

    fn send_scale_notice(&self, entity: EntityRef, scaled: &ScaledTarget) {
        let notice = Notice::ScaledTravel {
            source_scale: scaled.source_scale,
            destination_scale: scaled.destination_scale,
        };
        let message = self.catalog.render(&notice);
        if let Err(err) = self.notifier.notify(entity.id, &notice, &message) {
            tracing::debug!(%err, "scale notice not delivered");
        }
    }
}

fn world_info<'h, H: WorldHost>(
    host: &'h H,
    key: &WorldKey,
) -> Result<&'h WorldInfo, RedirectError> {
    host.world(key)
        .map(|world| world.info())
        .ok_or_else(|| RedirectError::UnknownWorld(key.clone()))
}
