#![forbid(unsafe_code)]

//! Headless dashboard demo.
//!
//! Builds a [`DashboardContext`], registers logging subscribers as the
//! stand-in rendering layer, then runs a short scripted session: select a
//! chart datum, record a new month of sales, optionally toggle the theme.
//! With `--data-dir` the theme selection survives across runs.

mod cli;

use std::rc::Rc;

use pulse_dashboard::{
    ChartContext, DashboardConfig, DashboardContext, DirPersistence, MonthlySales, Persistence,
};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = cli::parse();
    let persistence: Option<Rc<dyn Persistence>> = args
        .data_dir
        .map(|dir| Rc::new(DirPersistence::new(dir)) as Rc<dyn Persistence>);

    let context = DashboardContext::new(DashboardConfig {
        persistence,
        system_theme: args.system_theme,
    });

    // The "rendering layer": plain subscribers that log what they would
    // draw. Each replays the current value at registration time.
    let _theme = context
        .theme
        .subscribe(|theme| tracing::info!(theme = %theme, "theme"));
    let _total = context
        .total_sales
        .subscribe(|total| tracing::info!(total = *total, "total sales"));
    let _average = context
        .average_profit
        .subscribe(|average| tracing::info!(average = *average, "average profit"));
    let _summary = context.summary.subscribe(|summary| {
        tracing::info!(
            total_users = summary.total_users,
            active_users = summary.active_users,
            "summary"
        );
    });

    // Chart interaction: select the largest category slice.
    let chart: ChartContext<String> = ChartContext::new();
    let _chart = chart.state().subscribe(|state| {
        tracing::info!(selected = ?state.selected, hovered = ?state.hovered, "chart");
    });
    let largest = context.categories.with(|slices| {
        slices
            .iter()
            .max_by_key(|slice| slice.value)
            .map(|slice| slice.category.clone())
    });
    chart.select(largest);

    if args.toggle_theme {
        context.toggle_theme();
    }

    // A new month of figures arrives; both derived metrics recompute and
    // their subscribers log the fresh values before update() returns.
    context.sales.update(|rows| {
        let mut next = rows.clone();
        next.push(MonthlySales {
            month: String::from("Jan+1"),
            sales: 70_000,
            profit: 41_000,
        });
        next
    });

    tracing::info!(theme = %context.theme.get(), "session finished");
}
