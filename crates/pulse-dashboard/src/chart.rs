#![forbid(unsafe_code)]

//! Shared chart interaction state.
//!
//! One [`ChartContext`] is created per chart and handed to the widgets that
//! compose it. The context bundles a state store with mutation helpers;
//! widgets subscribe to [`ChartContext::state`] like any other subscriber.
//! The datum type is generic: a bar chart selects a category slice, a line
//! chart a monthly point.

use pulse_reactive::Store;

use crate::theme::Theme;

/// Default animation duration in milliseconds.
pub const DEFAULT_ANIMATION_SPEED_MS: u32 = 1_000;

/// Interaction state shared by the widgets of one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartState<D> {
    pub selected: Option<D>,
    pub hovered: Option<D>,
    pub animation_speed_ms: u32,
    pub theme: Theme,
}

impl<D> Default for ChartState<D> {
    fn default() -> Self {
        Self {
            selected: None,
            hovered: None,
            animation_speed_ms: DEFAULT_ANIMATION_SPEED_MS,
            theme: Theme::Light,
        }
    }
}

/// Handle bundling a chart's state store with its mutation helpers.
#[derive(Debug, Clone)]
pub struct ChartContext<D> {
    state: Store<ChartState<D>>,
}

impl<D: Clone + 'static> ChartContext<D> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Store::new(ChartState::default()),
        }
    }

    /// The underlying state store, for subscription.
    #[must_use]
    pub fn state(&self) -> &Store<ChartState<D>> {
        &self.state
    }

    /// Set or clear the selected datum.
    pub fn select(&self, datum: Option<D>) {
        self.state.update(|state| ChartState {
            selected: datum,
            ..state.clone()
        });
    }

    /// Set or clear the hovered datum.
    pub fn hover(&self, datum: Option<D>) {
        self.state.update(|state| ChartState {
            hovered: datum,
            ..state.clone()
        });
    }

    pub fn set_animation_speed(&self, speed_ms: u32) {
        self.state.update(|state| ChartState {
            animation_speed_ms: speed_ms,
            ..state.clone()
        });
    }

    pub fn set_theme(&self, theme: Theme) {
        self.state.update(|state| ChartState {
            theme,
            ..state.clone()
        });
    }
}

impl<D: Clone + 'static> Default for ChartContext<D> {
    fn default() -> Self {
        Self::new()
    }
}
