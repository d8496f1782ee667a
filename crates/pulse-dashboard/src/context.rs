#![forbid(unsafe_code)]

//! Application-owned store wiring.
//!
//! Every store of the dashboard lives in one explicitly constructed
//! [`DashboardContext`], dependency-injected rather than ambient, so tests
//! build as many isolated contexts as they need.

use std::rc::Rc;

use pulse_reactive::{Derived, Store};

use crate::data::{self, CategorySlice, DashboardSummary, MonthlySales, UserRecord};
use crate::metrics;
use crate::persist::Persistence;
use crate::theme::{self, Theme};

/// Inputs for building a [`DashboardContext`].
#[derive(Default)]
pub struct DashboardConfig {
    /// Optional persistence port for theme write-back.
    pub persistence: Option<Rc<dyn Persistence>>,
    /// Host-reported theme preference, consulted when nothing is persisted.
    pub system_theme: Option<Theme>,
}

/// Every store of the dashboard, owned in one place.
pub struct DashboardContext {
    pub theme: Store<Theme>,
    pub sales: Store<Vec<MonthlySales>>,
    pub categories: Store<Vec<CategorySlice>>,
    pub users: Store<Vec<UserRecord>>,
    pub summary: Store<DashboardSummary>,
    pub total_sales: Derived<u64>,
    pub average_profit: Derived<f64>,
}

impl DashboardContext {
    /// Build a context seeded with the sample datasets.
    #[must_use]
    pub fn new(config: DashboardConfig) -> Self {
        let theme = theme::theme_store(config.persistence, config.system_theme);
        let sales = Store::new(data::sample_sales());
        let categories = Store::new(data::sample_categories());
        let users = Store::new(data::sample_users());
        let summary = Store::new(data::sample_summary());
        let total_sales = metrics::total_sales(&sales);
        let average_profit = metrics::average_profit(&sales);

        Self {
            theme,
            sales,
            categories,
            users,
            summary,
            total_sales,
            average_profit,
        }
    }

    /// Flip between light and dark.
    pub fn toggle_theme(&self) {
        self.theme.update(|current| current.toggled());
    }
}
