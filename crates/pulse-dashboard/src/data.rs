#![forbid(unsafe_code)]

//! Sample dashboard datasets.
//!
//! Plain data snapshots as a server lifecycle would hand them over; none of
//! these types know about stores.

/// One month of sales figures.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonthlySales {
    pub month: String,
    pub sales: u64,
    pub profit: u64,
}

/// One slice of the category breakdown, in percent.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CategorySlice {
    pub category: String,
    pub value: u64,
    /// Hex color the rendering layer uses for this slice.
    pub color: String,
}

/// One row of the user table.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UserRecord {
    pub name: String,
    pub age: u32,
    pub score: u32,
}

/// Headline dashboard figures.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DashboardSummary {
    pub total_users: u64,
    pub total_revenue: u64,
    pub conversion_rate: f64,
    pub active_users: u64,
}

/// A year of monthly sales.
#[must_use]
pub fn sample_sales() -> Vec<MonthlySales> {
    [
        ("Jan", 12_000, 8_000),
        ("Feb", 19_000, 12_000),
        ("Mar", 30_000, 18_000),
        ("Apr", 28_000, 16_000),
        ("May", 45_000, 25_000),
        ("Jun", 38_000, 22_000),
        ("Jul", 52_000, 30_000),
        ("Aug", 48_000, 28_000),
        ("Sep", 55_000, 32_000),
        ("Oct", 62_000, 36_000),
        ("Nov", 58_000, 34_000),
        ("Dec", 65_000, 38_000),
    ]
    .into_iter()
    .map(|(month, sales, profit)| MonthlySales {
        month: month.to_string(),
        sales,
        profit,
    })
    .collect()
}

/// Category breakdown; values sum to 100 percent.
#[must_use]
pub fn sample_categories() -> Vec<CategorySlice> {
    [
        ("Electronics", 35, "#3b82f6"),
        ("Clothing", 25, "#ef4444"),
        ("Books", 20, "#10b981"),
        ("Home & Garden", 15, "#f59e0b"),
        ("Sports", 5, "#8b5cf6"),
    ]
    .into_iter()
    .map(|(category, value, color)| CategorySlice {
        category: category.to_string(),
        value,
        color: color.to_string(),
    })
    .collect()
}

/// User table rows.
#[must_use]
pub fn sample_users() -> Vec<UserRecord> {
    [
        ("John Doe", 28, 85),
        ("Jane Smith", 32, 92),
        ("Mike Johnson", 25, 78),
        ("Sarah Wilson", 30, 88),
        ("David Brown", 35, 95),
        ("Lisa Davis", 27, 82),
        ("Tom Miller", 29, 90),
        ("Emma Garcia", 31, 87),
    ]
    .into_iter()
    .map(|(name, age, score)| UserRecord {
        name: name.to_string(),
        age,
        score,
    })
    .collect()
}

/// Headline figures.
#[must_use]
pub fn sample_summary() -> DashboardSummary {
    DashboardSummary {
        total_users: 1_247,
        total_revenue: 125_000,
        conversion_rate: 3.2,
        active_users: 892,
    }
}
