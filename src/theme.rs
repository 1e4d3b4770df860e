//! Light/dark theme preference.
//!
//! The preference lives under the `"theme"` key of a small JSON key/value
//! file, read once at startup and rewritten on every toggle. Subscribers get
//! the current value through a `watch` channel instead of reading shared
//! global state.

use anyhow::{Context, Result};
use ratatui::style::Color;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::watch;

pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "dark" => Some(Theme::Dark),
            "light" => Some(Theme::Light),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    /// Icon and text of the toggle control.
    pub fn indicator(self) -> (&'static str, &'static str) {
        match self {
            Theme::Light => ("☀", "Light"),
            Theme::Dark => ("☾", "Dark"),
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Dark => Palette {
                bg: Color::Rgb(13, 17, 23),
                surface: Color::Rgb(22, 27, 34),
                text: Color::Rgb(230, 237, 243),
                muted: Color::Rgb(125, 133, 144),
                accent: Color::Rgb(88, 166, 255),
                success: Color::Rgb(63, 185, 80),
                warning: Color::Rgb(210, 153, 34),
                error: Color::Rgb(248, 81, 73),
                info: Color::Rgb(121, 192, 255),
            },
            Theme::Light => Palette {
                bg: Color::Rgb(255, 255, 255),
                surface: Color::Rgb(246, 248, 250),
                text: Color::Rgb(31, 35, 40),
                muted: Color::Rgb(101, 109, 118),
                accent: Color::Rgb(9, 105, 218),
                success: Color::Rgb(26, 127, 55),
                warning: Color::Rgb(154, 103, 0),
                error: Color::Rgb(207, 34, 46),
                info: Color::Rgb(9, 105, 218),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub bg: Color,
    pub surface: Color,
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
}

/// Persistent string key/value storage backed by one JSON file.
#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.read_all().remove(key)
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut all = self.read_all();
        all.insert(key.to_string(), value.to_string());
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }
        let json = serde_json::to_string_pretty(&all)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }

    /// Missing or unreadable storage reads as empty.
    fn read_all(&self) -> BTreeMap<String, String> {
        std::fs::read_to_string(&self.path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }
}

pub struct ThemeManager {
    store: LocalStore,
    tx: watch::Sender<Theme>,
}

impl ThemeManager {
    /// Read the stored preference, defaulting to dark. Values other than
    /// `dark`/`light` are ignored.
    pub fn load(store: LocalStore) -> Self {
        let theme = match store.get(THEME_KEY) {
            None => Theme::default(),
            Some(raw) => Theme::parse(&raw).unwrap_or_else(|| {
                tracing::warn!(value = %raw, "ignoring unknown stored theme");
                Theme::default()
            }),
        };
        tracing::debug!(theme = theme.as_str(), path = %store.path().display(), "theme loaded");
        let (tx, _) = watch::channel(theme);
        Self { store, tx }
    }

    pub fn current(&self) -> Theme {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Theme> {
        self.tx.subscribe()
    }

    /// Flip, persist and publish. A failed write keeps the new theme for
    /// this session.
    pub fn toggle(&self) -> Theme {
        let next = self.current().toggled();
        if let Err(e) = self.store.set(THEME_KEY, next.as_str()) {
            tracing::warn!("failed to persist theme: {:#}", e);
        }
        self.tx.send_replace(next);
        next
    }
}
