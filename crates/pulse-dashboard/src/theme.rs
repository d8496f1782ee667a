#![forbid(unsafe_code)]

//! Light/dark theme state with optional persistence write-back.
//!
//! The theme store's initial value follows the startup precedence of the
//! dashboard: a persisted selection wins, then the host-reported system
//! preference, then light. When a persistence port is supplied, a
//! write-back subscriber stores every value (including the replayed
//! initial one) under [`THEME_KEY`]; without a port no side-effecting
//! subscriber is registered at all.

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use pulse_reactive::Store;

use crate::persist::Persistence;

/// Persistence key under which the theme selection is stored.
pub const THEME_KEY: &str = "theme";

/// Dashboard color scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// The other theme.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unrecognized theme name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseThemeError {
    name: String,
}

impl ParseThemeError {
    /// The rejected input.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for ParseThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown theme: {:?}", self.name)
    }
}

impl std::error::Error for ParseThemeError {}

impl FromStr for Theme {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(ParseThemeError {
                name: other.to_string(),
            }),
        }
    }
}

/// Build the theme store.
///
/// A stored value that fails to parse is treated as absent, so a corrupted
/// persistence entry degrades to the system preference rather than
/// poisoning startup.
pub fn theme_store(
    persistence: Option<Rc<dyn Persistence>>,
    system_preference: Option<Theme>,
) -> Store<Theme> {
    let stored = persistence
        .as_deref()
        .and_then(|port| port.get(THEME_KEY))
        .and_then(|raw| raw.parse().ok());
    let initial = stored.or(system_preference).unwrap_or_default();

    let store = Store::new(initial);
    if let Some(port) = persistence {
        let _writeback = store.subscribe(move |theme: &Theme| port.set(THEME_KEY, theme.as_str()));
    }
    store
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::MemoryPersistence;

    fn port_with(value: Option<&str>) -> Rc<MemoryPersistence> {
        let port = Rc::new(MemoryPersistence::new());
        if let Some(value) = value {
            port.set(THEME_KEY, value);
        }
        port
    }

    #[test]
    fn parse_and_display_roundtrip() {
        assert_eq!("light".parse(), Ok(Theme::Light));
        assert_eq!("dark".parse(), Ok(Theme::Dark));
        assert_eq!(Theme::Light.to_string(), "light");
        assert_eq!(Theme::Dark.to_string(), "dark");

        let error = "solarized".parse::<Theme>().unwrap_err();
        assert_eq!(error.name(), "solarized");
        assert!(error.to_string().contains("solarized"));
    }

    #[test]
    fn toggled_flips() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
    }

    #[test]
    fn stored_value_wins_over_system_preference() {
        let port = port_with(Some("dark"));
        let store = theme_store(Some(port as Rc<dyn Persistence>), Some(Theme::Light));
        assert_eq!(store.get(), Theme::Dark);
    }

    #[test]
    fn system_preference_wins_over_default() {
        let store = theme_store(None, Some(Theme::Dark));
        assert_eq!(store.get(), Theme::Dark);
    }

    #[test]
    fn defaults_to_light() {
        let store = theme_store(None, None);
        assert_eq!(store.get(), Theme::Light);
    }

    #[test]
    fn corrupted_stored_value_degrades_to_system_preference() {
        let port = port_with(Some("solarized"));
        let store = theme_store(Some(port as Rc<dyn Persistence>), Some(Theme::Dark));
        assert_eq!(store.get(), Theme::Dark);
    }

    #[test]
    fn changes_are_written_back() {
        let port = port_with(None);
        let store = theme_store(
            Some(Rc::clone(&port) as Rc<dyn Persistence>),
            Some(Theme::Light),
        );

        // Replay persisted the initial value at wiring time.
        assert_eq!(port.get(THEME_KEY), Some(String::from("light")));

        store.set(Theme::Dark);
        assert_eq!(port.get(THEME_KEY), Some(String::from("dark")));

        store.update(|theme| theme.toggled());
        assert_eq!(port.get(THEME_KEY), Some(String::from("light")));
    }

    #[test]
    fn no_port_registers_no_side_effect_subscriber() {
        let store = theme_store(None, None);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn persisted_selection_survives_rebuild() {
        let port = port_with(None);
        {
            let store = theme_store(
                Some(Rc::clone(&port) as Rc<dyn Persistence>),
                Some(Theme::Light),
            );
            store.set(Theme::Dark);
        }

        let store = theme_store(Some(port as Rc<dyn Persistence>), Some(Theme::Light));
        assert_eq!(store.get(), Theme::Dark);
    }
}
