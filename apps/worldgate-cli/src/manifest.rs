//! Server manifest: the worlds a host has loaded, its link table and the
//! redirect configuration, in one YAML or JSON file.

use anyhow::Context;
use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::path::Path;
use worldgate_common::{Environment, PortalKind, WorldKey};
use worldgate_kernel::{BlockAccess, Universe, World, WorldInfo, is_built_in};
use worldgate_links::LinkTable;
use worldgate_redirect::RedirectConfig;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub worlds: Vec<WorldEntry>,
    #[serde(default)]
    pub links: LinkTable,
    #[serde(default)]
    pub redirect: RedirectConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldEntry {
    pub key: WorldKey,
    #[serde(default)]
    pub name: Option<String>,
    pub environment: Environment,
    #[serde(default)]
    pub spawn: Option<DVec3>,
}

/// A link that cannot work with the loaded worlds.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkProblem {
    pub source: WorldKey,
    pub kind: PortalKind,
    pub destination: WorldKey,
    pub reason: String,
}

impl Manifest {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading manifest {}", path.display()))?;
        let manifest: Self = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&text)?
        } else {
            serde_yaml::from_str(&text)?
        };
        manifest.redirect.validate()?;
        tracing::debug!(
            path = %path.display(),
            worlds = manifest.worlds.len(),
            links = manifest.links.len(),
            "manifest loaded"
        );
        Ok(manifest)
    }

    /// Built-in worlds plus every custom world in the manifest.
    pub fn universe(&self) -> anyhow::Result<Universe> {
        let mut universe = Universe::with_builtins();
        for entry in &self.worlds {
            if is_built_in(&entry.key) {
                anyhow::bail!("manifest redefines built-in world {}", entry.key);
            }
            let name = entry
                .name
                .clone()
                .unwrap_or_else(|| entry.key.path().to_owned());
            let spawn = entry.spawn.unwrap_or(DVec3::new(0.5, 64.0, 0.5));
            let info = WorldInfo::new(entry.key.clone(), name, entry.environment, spawn);
            if universe.insert(World::new(info)).is_some() {
                anyhow::bail!("world {} is listed twice", entry.key);
            }
        }
        Ok(universe)
    }

    /// Check every explicit link against the loaded worlds.
    pub fn link_problems(&self, universe: &Universe) -> Vec<LinkProblem> {
        let mut problems = Vec::new();
        for kind in [PortalKind::Nether, PortalKind::End] {
            for (source, destination) in self.links.links(kind) {
                let problem = |reason: String| LinkProblem {
                    source: source.clone(),
                    kind,
                    destination: destination.clone(),
                    reason,
                };
                if is_built_in(source) {
                    problems.push(problem("built-in worlds use native routing".into()));
                    continue;
                }
                let Some(src) = universe.get(source) else {
                    problems.push(problem("source world is not loaded".into()));
                    continue;
                };
                let Some(dst) = universe.get(destination) else {
                    problems.push(problem("destination world is not loaded".into()));
                    continue;
                };
                if kind == PortalKind::End {
                    let expected = match src.info().environment {
                        Environment::Normal => Environment::End,
                        Environment::End => Environment::Normal,
                        Environment::Nether => {
                            let reason = "end portals cannot lead out of nether worlds";
                            problems.push(problem(reason.into()));
                            continue;
                        }
                    };
                    let actual = dst.info().environment;
                    if actual != expected {
                        problems.push(problem(format!(
                            "destination is a {actual} world, expected {expected}"
                        )));
                    }
                }
            }
        }
        problems
    }
}
