mod manifest;

use clap::{Parser, Subcommand};
use glam::DVec3;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use worldgate_common::{EntityId, EntityRef, Environment, Location, PortalKind, WorldKey};
use worldgate_kernel::{BlockAccess, Universe, builtin_key};
use worldgate_redirect::{
    EntityTeleport, Outcome, PlayerTeleport, PortalReady, PortalRedirector, RecordingNotifier,
    TeleportCause,
};

use crate::manifest::Manifest;

#[derive(Parser)]
#[command(name = "worldgate-cli", about = "CLI tool for worldgate portal routing")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Load a server manifest and report worlds and broken links
    Check {
        /// Path to the manifest (YAML, or JSON with a .json extension)
        manifest: PathBuf,
    },
    /// Simulate a portal crossing against a server manifest
    Route {
        /// Path to the manifest (YAML, or JSON with a .json extension)
        manifest: PathBuf,
        /// Key of the world the portal is in
        #[arg(short, long)]
        world: WorldKey,
        /// Portal kind: nether or end
        #[arg(short, long, default_value = "nether")]
        kind: PortalKind,
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        x: f64,
        #[arg(long, default_value = "64", allow_hyphen_values = true)]
        y: f64,
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        z: f64,
        /// Route a non-player entity instead of a player
        #[arg(long)]
        entity: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("worldgate-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("built-in worlds:");
            for world in Universe::with_builtins().iter() {
                let info = world.info();
                println!("  {} ({}, {})", info.key, info.name, info.environment);
            }
        }
        Commands::Check { manifest } => {
            let manifest = Manifest::load(&manifest)?;
            let universe = manifest.universe()?;

            println!("Worlds: {}", universe.len());
            for world in universe.iter() {
                let info = world.info();
                println!(
                    "  {:<32} {:<8} {:<20} {}",
                    info.key.as_str(),
                    info.environment.as_str(),
                    info.name,
                    if info.is_built_in() { "built-in" } else { "custom" }
                );
            }

            println!(
                "Links: {} (conventional names: {})",
                manifest.links.len(),
                manifest.links.conventional_names
            );
            for kind in [PortalKind::Nether, PortalKind::End] {
                for (source, destination) in manifest.links.links(kind) {
                    println!("  {kind:<6} {source} -> {destination}");
                }
            }

            let problems = manifest.link_problems(&universe);
            for p in &problems {
                println!(
                    "  problem: {} link {} -> {}: {}",
                    p.kind, p.source, p.destination, p.reason
                );
            }
            if !problems.is_empty() {
                anyhow::bail!("{} link problem(s) found", problems.len());
            }
            println!("OK");
        }
        Commands::Route {
            manifest,
            world,
            kind,
            x,
            y,
            z,
            entity,
        } => {
            let manifest = Manifest::load(&manifest)?;
            let mut universe = manifest.universe()?;
            if universe.get(&world).is_none() {
                anyhow::bail!("world {world} is not in the manifest");
            }
            let redirector = PortalRedirector::new(
                manifest.redirect.clone(),
                &manifest.links,
                RecordingNotifier::new(),
            );
            let from = Location::new(world.clone(), DVec3::new(x, y, z));
            println!("From: {from}");

            // The host's own proposal: same coordinates in the readiness
            // target, or its native destination for the portal kind.
            let proposed = match kind {
                PortalKind::Nether => {
                    let mut ready = PortalReady::new(world.clone(), kind);
                    let outcome = redirector.on_portal_ready(&universe, &mut ready);
                    println!("Readiness: {}", describe(&outcome));
                    let target = ready
                        .target_world
                        .unwrap_or_else(|| native_destination(&world, kind));
                    Some(Location::new(target, DVec3::new(x, y, z)))
                }
                PortalKind::End => Some(Location::new(
                    native_destination(&world, kind),
                    DVec3::new(100.5, 50.0, 0.5),
                )),
            };

            let (outcome, to) = if entity {
                let mut event = EntityTeleport {
                    entity: EntityRef::non_player(EntityId::new()),
                    kind,
                    from,
                    to: proposed,
                };
                let outcome = redirector.on_entity_teleport(&mut universe, &mut event);
                (outcome, event.to)
            } else {
                let cause = match kind {
                    PortalKind::Nether => TeleportCause::NetherPortal,
                    PortalKind::End => TeleportCause::EndPortal,
                };
                let mut event = PlayerTeleport {
                    player: EntityId::new(),
                    cause,
                    from,
                    to: proposed,
                };
                let outcome = redirector.on_player_teleport(&mut universe, &mut event);
                (outcome, event.to)
            };

            println!("Teleport: {}", describe(&outcome));
            match to {
                Some(to) => println!("To: {to}"),
                None => println!("To: (host default)"),
            }
            for (_, _, message) in redirector.notifier().sent() {
                println!("Notice: {message}");
            }
            for world in universe.iter().filter(|w| !w.events().is_empty()) {
                println!("Blocks changed in {}: {}", world.key(), world.events().len());
            }
            if let Outcome::Failed(err) = outcome {
                return Err(err.into());
            }
        }
    }

    Ok(())
}

fn describe(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Untouched => "untouched (native routing)".into(),
        Outcome::MissingLink => "no link, host default stands".into(),
        Outcome::Disabled => "entity routing disabled".into(),
        Outcome::Redirected => "redirected".into(),
        Outcome::Failed(err) => format!("failed: {err}"),
    }
}

/// Where the host would send a crossing on its own.
fn native_destination(world: &WorldKey, kind: PortalKind) -> WorldKey {
    let env = match kind {
        PortalKind::Nether if *world == builtin_key(Environment::Nether) => Environment::Normal,
        PortalKind::Nether => Environment::Nether,
        PortalKind::End if *world == builtin_key(Environment::End) => Environment::Normal,
        PortalKind::End => Environment::End,
    };
    builtin_key(env)
}
