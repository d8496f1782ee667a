#![forbid(unsafe_code)]

//! Derived aggregate metrics over the sales dataset.

use pulse_reactive::{Derived, Readable};

use crate::data::MonthlySales;

/// Sum of sales across all months.
#[must_use]
pub fn total_sales(sales: &impl Readable<Vec<MonthlySales>>) -> Derived<u64> {
    Derived::map(sales, |rows: &Vec<MonthlySales>| {
        rows.iter().map(|row| row.sales).sum()
    })
}

/// Mean monthly profit; 0.0 for an empty dataset.
#[must_use]
pub fn average_profit(sales: &impl Readable<Vec<MonthlySales>>) -> Derived<f64> {
    Derived::map(sales, |rows: &Vec<MonthlySales>| {
        if rows.is_empty() {
            0.0
        } else {
            let total: u64 = rows.iter().map(|row| row.profit).sum();
            total as f64 / rows.len() as f64
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample_sales;
    use pulse_reactive::Store;
    use std::cell::Cell;
    use std::rc::Rc;

    fn row(month: &str, sales: u64, profit: u64) -> MonthlySales {
        MonthlySales {
            month: month.to_string(),
            sales,
            profit,
        }
    }

    #[test]
    fn total_over_sample_dataset() {
        let sales = Store::new(sample_sales());
        let total = total_sales(&sales);
        assert_eq!(total.get(), 512_000);
    }

    #[test]
    fn average_over_sample_dataset() {
        let sales = Store::new(sample_sales());
        let average = average_profit(&sales);
        assert!((average.get() - 299_000.0 / 12.0).abs() < 1e-9);
    }

    #[test]
    fn metrics_track_dataset_updates() {
        let sales = Store::new(vec![row("Jan", 100, 10)]);
        let total = total_sales(&sales);
        let average = average_profit(&sales);
        let observed = Rc::new(Cell::new(0u64));
        let sink = Rc::clone(&observed);
        let _sub = total.subscribe(move |value| sink.set(*value));

        sales.update(|rows| {
            let mut next = rows.clone();
            next.push(row("Feb", 250, 30));
            next
        });

        assert_eq!(total.get(), 350);
        assert_eq!(observed.get(), 350);
        assert!((average.get() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn empty_dataset_average_is_zero() {
        let sales = Store::new(Vec::new());
        let average = average_profit(&sales);
        assert!((average.get() - 0.0).abs() < f64::EPSILON);

        let total = total_sales(&sales);
        assert_eq!(total.get(), 0);
    }
}
