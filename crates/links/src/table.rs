use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use worldgate_common::{PortalKind, WorldKey};

use crate::LinkDirectory;

const NETHER_SUFFIX: &str = "_nether";
const END_SUFFIX: &str = "_the_end";

/// Errors from editing or loading a link table.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("world {0} cannot link to itself")]
    SelfLink(WorldKey),
}

/// Reference link directory: one namespace per portal kind.
///
/// Serialized as:
/// ```yaml
/// conventional_names: true
/// nether:
///   worlds:mining: worlds:mining_deep
/// end:
///   worlds:mining: worlds:void
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkTable {
    /// Fall back to `<name>_nether` / `<name>_the_end` pairs when no
    /// explicit link exists.
    #[serde(default)]
    pub conventional_names: bool,
    #[serde(default)]
    nether: BTreeMap<WorldKey, WorldKey>,
    #[serde(default)]
    end: BTreeMap<WorldKey, WorldKey>,
}

impl LinkTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn namespace(&self, kind: PortalKind) -> &BTreeMap<WorldKey, WorldKey> {
        match kind {
            PortalKind::Nether => &self.nether,
            PortalKind::End => &self.end,
        }
    }

    fn namespace_mut(&mut self, kind: PortalKind) -> &mut BTreeMap<WorldKey, WorldKey> {
        match kind {
            PortalKind::Nether => &mut self.nether,
            PortalKind::End => &mut self.end,
        }
    }

    /// Add or replace the link for `(source, kind)`. Returns the previous
    /// destination.
    pub fn link(
        &mut self,
        source: WorldKey,
        kind: PortalKind,
        destination: WorldKey,
    ) -> Result<Option<WorldKey>, LinkError> {
        if source == destination {
            return Err(LinkError::SelfLink(source));
        }
        tracing::debug!(%source, %kind, %destination, "link set");
        Ok(self.namespace_mut(kind).insert(source, destination))
    }

    /// Link `a` and `b` to each other for `kind`.
    pub fn link_both(
        &mut self,
        a: WorldKey,
        kind: PortalKind,
        b: WorldKey,
    ) -> Result<(), LinkError> {
        self.link(a.clone(), kind, b.clone())?;
        self.link(b, kind, a)?;
        Ok(())
    }

    pub fn unlink(&mut self, source: &WorldKey, kind: PortalKind) -> Option<WorldKey> {
        self.namespace_mut(kind).remove(source)
    }

    /// Explicit links of one kind, in source-key order.
    pub fn links(&self, kind: PortalKind) -> impl Iterator<Item = (&WorldKey, &WorldKey)> {
        self.namespace(kind).iter()
    }

    pub fn len(&self) -> usize {
        self.nether.len() + self.end.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nether.is_empty() && self.end.is_empty()
    }

    /// Destination implied by world naming alone, e.g. `worlds:hub` ↔
    /// `worlds:hub_nether`.
    pub fn conventional_destination(source: &WorldKey, kind: PortalKind) -> Option<WorldKey> {
        let suffix = match kind {
            PortalKind::Nether => NETHER_SUFFIX,
            PortalKind::End => END_SUFFIX,
        };
        let path = source.path();
        let target = match path.strip_suffix(suffix) {
            Some(base) if !base.is_empty() => base.to_owned(),
            Some(_) => return None,
            None => format!("{path}{suffix}"),
        };
        source.with_path(&target).ok()
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, LinkError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a table from disk. `.json` files are read as JSON, anything else
    /// as YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LinkError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let table: Self = if is_json(path) {
            serde_json::from_str(&text)?
        } else {
            serde_yaml::from_str(&text)?
        };
        tracing::info!(path = %path.display(), links = table.len(), "link table loaded");
        Ok(table)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), LinkError> {
        let path = path.as_ref();
        let text = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            serde_yaml::to_string(self)?
        };
        std::fs::write(path, text)?;
        Ok(())
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

impl LinkDirectory for LinkTable {
    fn resolve(&self, source: &WorldKey, kind: PortalKind) -> Option<WorldKey> {
        if let Some(dest) = self.namespace(kind).get(source) {
            return Some(dest.clone());
        }
        if self.conventional_names {
            return Self::conventional_destination(source, kind);
        }
        None
    }
}
