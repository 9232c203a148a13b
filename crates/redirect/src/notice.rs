use std::cell::RefCell;
use std::collections::BTreeMap;
use worldgate_common::EntityId;

/// A player-facing message the engine may emit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Notice {
    /// A nether crossing rescaled horizontal coordinates.
    ScaledTravel {
        source_scale: f64,
        destination_scale: f64,
    },
}

impl Notice {
    /// Stable lookup key for the message template.
    pub fn key(&self) -> &'static str {
        match self {
            Self::ScaledTravel { .. } => "portal.scaled_travel",
        }
    }

    fn args(&self) -> [(&'static str, f64); 2] {
        match *self {
            Self::ScaledTravel {
                source_scale,
                destination_scale,
            } => [("source", source_scale), ("destination", destination_scale)],
        }
    }
}

/// Message templates keyed by [`Notice::key`], with `{name}` placeholders.
#[derive(Debug, Clone)]
pub struct MessageCatalog {
    templates: BTreeMap<String, String>,
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self {
            templates: BTreeMap::from([(
                "portal.scaled_travel".to_owned(),
                "This portal scales travel from {source} to {destination}.".to_owned(),
            )]),
        }
    }
}

impl MessageCatalog {
    /// Built-in templates with `overrides` applied on top.
    pub fn with_overrides(overrides: &BTreeMap<String, String>) -> Self {
        let mut catalog = Self::default();
        for (key, template) in overrides {
            if !catalog.templates.contains_key(key) {
                tracing::warn!(%key, "ignoring override for unknown message key");
                continue;
            }
            catalog.templates.insert(key.clone(), template.clone());
        }
        catalog
    }

    pub fn render(&self, notice: &Notice) -> String {
        let Some(template) = self.templates.get(notice.key()) else {
            return notice.key().to_owned();
        };
        notice
            .args()
            .iter()
            .fold(template.clone(), |text, (name, value)| {
                text.replace(&format!("{{{name}}}"), &value.to_string())
            })
    }
}

/// Errors a notification sink may report. The engine never escalates them.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NoticeError {
    #[error("player {0:?} is not online")]
    Offline(EntityId),
    #[error("notification sink failed: {0}")]
    Sink(String),
}

/// Best-effort, player-addressed message sink.
pub trait Notifier {
    fn notify(&self, player: EntityId, notice: &Notice, message: &str) -> Result<(), NoticeError>;
}

/// Discards every notice.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify(&self, _: EntityId, _: &Notice, _: &str) -> Result<(), NoticeError> {
        Ok(())
    }
}

/// Keeps every delivered notice in memory.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: RefCell<Vec<(EntityId, Notice, String)>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose every delivery fails. Nothing is recorded.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<(EntityId, Notice, String)> {
        self.sent.borrow().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, player: EntityId, notice: &Notice, message: &str) -> Result<(), NoticeError> {
        if self.fail {
            return Err(NoticeError::Sink("delivery disabled".into()));
        }
        self.sent
            .borrow_mut()
            .push((player, *notice, message.to_owned()));
        Ok(())
    }
}

impl<T: Notifier + ?Sized> Notifier for &T {
    fn notify(&self, player: EntityId, notice: &Notice, message: &str) -> Result<(), NoticeError> {
        (**self).notify(player, notice, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCALED: Notice = Notice::ScaledTravel {
        source_scale: 1.0,
        destination_scale: 8.0,
    };

    #[test]
    fn default_template_renders_both_scales() {
        let text = MessageCatalog::default().render(&SCALED);
        assert_eq!(text, "This portal scales travel from 1 to 8.");
    }

    #[test]
    fn override_replaces_template() {
        let overrides = BTreeMap::from([(
            "portal.scaled_travel".to_owned(),
            "Maßstab {source}:{destination}".to_owned(),
        )]);
        let text = MessageCatalog::with_overrides(&overrides).render(&SCALED);
        assert_eq!(text, "Maßstab 1:8");
    }

    #[test]
    fn unknown_override_is_ignored() {
        let overrides = BTreeMap::from([("portal.nope".to_owned(), "x".to_owned())]);
        let catalog = MessageCatalog::with_overrides(&overrides);
        assert!(catalog.render(&SCALED).starts_with("This portal"));
    }

    #[test]
    fn recording_notifier_records() {
        let sink = RecordingNotifier::new();
        let player = EntityId::new();
        sink.notify(player, &SCALED, "hi").unwrap();
        assert_eq!(sink.sent(), vec![(player, SCALED, "hi".to_owned())]);

        let failing = RecordingNotifier::failing();
        assert!(failing.notify(player, &SCALED, "hi").is_err());
        assert!(failing.sent().is_empty());
    }
}
