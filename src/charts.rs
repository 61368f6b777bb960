//! Chart-ready datasets derived from a (filtered) sales table.
//!
//! Grouping goes through `BTreeMap`, so groups come out ordered by key
//! (category name, or price in centavos). Sorting by total is stable, which
//! means equal totals keep that key order.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::fmt::money;
use crate::models::{PaymentMethod, SalesTable};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentSlice {
    pub method: PaymentMethod,
    pub label: &'static str,
    pub quantity: i64,
    /// Fraction of all payments, 0.0 when there are none.
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBar {
    pub category: String,
    pub total_sales: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceBar {
    pub price: f64,
    pub total_sales: i64,
    pub label: String,
}

/// Summed `Total Vendas` per category, keyed by category name.
pub fn category_totals(table: &SalesTable) -> BTreeMap<String, i64> {
    let mut totals: BTreeMap<String, i64> = BTreeMap::new();
    for row in table.rows() {
        *totals.entry(row.category.clone()).or_default() += row.total_sales;
    }
    totals
}

/// Summed `Total Vendas` per price (in centavos) for one category.
pub fn price_totals(table: &SalesTable, category: &str) -> BTreeMap<i64, i64> {
    let mut totals: BTreeMap<i64, i64> = BTreeMap::new();
    for row in table.rows().iter().filter(|r| r.category == category) {
        *totals.entry(row.price_cents()).or_default() += row.total_sales;
    }
    totals
}

pub fn payment_totals(table: &SalesTable) -> Vec<PaymentSlice> {
    let quantities: Vec<(PaymentMethod, i64)> = PaymentMethod::ALL
        .iter()
        .map(|m| (*m, table.payment_total(*m)))
        .collect();
    let total: i64 = quantities.iter().map(|(_, q)| q).sum();
    quantities
        .into_iter()
        .map(|(method, quantity)| PaymentSlice {
            method,
            label: method.label(),
            quantity,
            share: if total != 0 {
                quantity as f64 / total as f64
            } else {
                0.0
            },
        })
        .collect()
}

/// Categories ascending by total, so the largest lands on top of a horizontal bar layout.
pub fn category_ranking(table: &SalesTable) -> Vec<CategoryBar> {
    let mut bars: Vec<CategoryBar> = category_totals(table)
        .into_iter()
        .map(|(category, total_sales)| CategoryBar {
            category,
            total_sales,
        })
        .collect();
    bars.sort_by_key(|b| b.total_sales);
    bars
}

/// Prices of one category ascending by total, each with a display label.
pub fn price_ranking(table: &SalesTable, category: &str) -> Vec<PriceBar> {
    let mut bars: Vec<PriceBar> = price_totals(table, category)
        .into_iter()
        .map(|(cents, total_sales)| {
            let price = cents as f64 / 100.0;
            PriceBar {
                price,
                total_sales,
                label: money(price),
            }
        })
        .collect();
    bars.sort_by_key(|b| b.total_sales);
    bars
}

/// Distinct categories in first-appearance order (selection control choices).
pub fn category_choices(table: &SalesTable) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    table
        .rows()
        .iter()
        .filter(|r| seen.insert(r.category.as_str()))
        .map(|r| r.category.clone())
        .collect()
}
