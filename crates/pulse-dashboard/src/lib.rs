#![forbid(unsafe_code)]

//! Dashboard state built on [`pulse-reactive`](pulse_reactive).
//!
//! This crate owns the application-level stores of the demo dashboard:
//!
//! - [`theme`]: light/dark selection with startup precedence and optional
//!   persistence write-back.
//! - [`data`]: sample dataset snapshots (monthly sales, category
//!   breakdown, users, headline summary).
//! - [`metrics`]: derived aggregates over the sales store.
//! - [`chart`]: per-chart interaction state (selection, hover, animation
//!   speed).
//! - [`context`]: the [`DashboardContext`] that wires all of the above,
//!   dependency-injected instead of ambient.
//!
//! Rendering is out of scope; a rendering layer subscribes to these stores
//! like any other consumer.

pub mod chart;
pub mod context;
pub mod data;
pub mod metrics;
pub mod persist;
pub mod theme;

pub use chart::{ChartContext, ChartState};
pub use context::{DashboardConfig, DashboardContext};
pub use data::{CategorySlice, DashboardSummary, MonthlySales, UserRecord};
pub use persist::{DirPersistence, MemoryPersistence, Persistence};
pub use theme::{THEME_KEY, Theme};
