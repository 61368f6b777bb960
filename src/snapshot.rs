use serde::Serialize;

use crate::charts::{self, CategoryBar, PaymentSlice, PriceBar};
use crate::filter::DateFilter;
use crate::insights::{self, Insights};
use crate::kpis::{self, Kpis};
use crate::models::SalesTable;

/// Everything one render pass needs, computed top to bottom from the loaded table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub filter: DateFilter,
    pub row_count: usize,
    pub insights: Insights,
    pub messages: Vec<String>,
    pub kpis: Kpis,
    pub payments: Vec<PaymentSlice>,
    pub category_ranking: Vec<CategoryBar>,
    pub categories: Vec<String>,
    pub selected_category: Option<String>,
    pub price_ranking: Vec<PriceBar>,
}

impl Snapshot {
    /// `selected_category` falls back to the first category of the subset when
    /// absent or not present after filtering.
    pub fn compute(
        table: &SalesTable,
        filter: &DateFilter,
        selected_category: Option<&str>,
    ) -> Self {
        let subset = table.filter(filter);
        tracing::debug!(
            filter = %filter.describe(),
            rows = subset.len(),
            "filtered sales table"
        );

        let insights = insights::compute(&subset);
        let messages = insights.sentences();
        let kpis = kpis::compute(&subset);
        let payments = charts::payment_totals(&subset);
        let category_ranking = charts::category_ranking(&subset);
        let categories = charts::category_choices(&subset);

        let selected_category = selected_category
            .filter(|c| categories.iter().any(|x| x == *c))
            .map(str::to_string)
            .or_else(|| categories.first().cloned());
        let price_ranking = selected_category
            .as_deref()
            .map(|c| charts::price_ranking(&subset, c))
            .unwrap_or_default();

        Self {
            filter: *filter,
            row_count: subset.len(),
            insights,
            messages,
            kpis,
            payments,
            category_ranking,
            categories,
            selected_category,
            price_ranking,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SaleRecord;
    use chrono::NaiveDate;

    fn record(month: u32, category: &str, price: f64, total_sales: i64) -> SaleRecord {
        SaleRecord {
            date: NaiveDate::from_ymd_opt(2025, month, 10).unwrap(),
            category: category.to_string(),
            price,
            total_sales,
            revenue: price * total_sales as f64,
            qty_pix: 0,
            qty_credit: total_sales,
            qty_debit: 0,
        }
    }

    fn sample() -> SalesTable {
        SalesTable::new(vec![
            record(1, "Café", 4.0, 10),
            record(1, "Bolo", 12.0, 3),
            record(2, "Bolo", 14.0, 6),
        ])
    }

    #[test]
    fn test_kpi_total_matches_subset_sum() {
        let table = sample();
        let filter = DateFilter::new(Some(2025), Some(1), None);
        let snap = Snapshot::compute(&table, &filter, None);
        let expected: i64 = table.filter(&filter).rows().iter().map(|r| r.total_sales).sum();
        assert_eq!(snap.kpis.total_sales, expected);
        assert_eq!(snap.row_count, 2);
    }

    #[test]
    fn test_default_category_is_first_in_subset() {
        let snap = Snapshot::compute(&sample(), &DateFilter::default(), None);
        assert_eq!(snap.categories, vec!["Café", "Bolo"]);
        assert_eq!(snap.selected_category.as_deref(), Some("Café"));
        assert_eq!(snap.price_ranking.len(), 1);
    }

    #[test]
    fn test_selected_category_drives_price_ranking() {
        let snap = Snapshot::compute(&sample(), &DateFilter::default(), Some("Bolo"));
        let prices: Vec<f64> = snap.price_ranking.iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![12.0, 14.0]);
    }

    #[test]
    fn test_selection_missing_from_subset_falls_back() {
        let filter = DateFilter::new(None, Some(2), None);
        let snap = Snapshot::compute(&sample(), &filter, Some("Café"));
        assert_eq!(snap.selected_category.as_deref(), Some("Bolo"));
    }

    #[test]
    fn test_empty_subset_degrades() {
        let filter = DateFilter::new(Some(1999), None, None);
        let snap = Snapshot::compute(&sample(), &filter, Some("Bolo"));
        assert_eq!(snap.messages, vec![insights::NO_DATA_MESSAGE.to_string()]);
        assert_eq!(snap.kpis.total_sales, 0);
        assert_eq!(snap.kpis.top_payment, None);
        assert!(snap.category_ranking.is_empty());
        assert!(snap.selected_category.is_none());
        assert!(snap.price_ranking.is_empty());
        assert_eq!(snap.payments.len(), 3);
    }

    #[test]
    fn test_serializes_to_json() {
        let snap = Snapshot::compute(&sample(), &DateFilter::default(), None);
        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["kpis"]["total_sales"], 19);
        assert_eq!(json["payments"][1]["label"], "Crédito");
        assert_eq!(json["filter"]["year"], serde_json::Value::Null);
    }
}
