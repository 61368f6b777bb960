use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::charts::{category_totals, price_totals};
use crate::kpis::dominant_payment;
use crate::models::{PaymentMethod, SalesTable};

pub const NO_DATA_MESSAGE: &str = "⚠️ Nenhum dado disponível para os filtros selecionados.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Trend {
    Rising,
    Falling,
    Stable,
}

impl Trend {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Rising => "alta",
            Self::Falling => "queda",
            Self::Stable => "estável",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightSummary {
    pub top_category: String,
    pub top_category_sales: i64,
    pub top_price: f64,
    pub top_price_sales: i64,
    pub top_payment: PaymentMethod,
    pub trend: Trend,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Insights {
    NoData,
    Summary(InsightSummary),
}

impl Insights {
    /// Sentences in display order: four findings then one recommendation,
    /// or the single "no data" message.
    pub fn sentences(&self) -> Vec<String> {
        let s = match self {
            Self::NoData => return vec![NO_DATA_MESSAGE.to_string()],
            Self::Summary(s) => s,
        };
        vec![
            format!(
                "📈 O produto mais vendido foi {} com {} vendas.",
                s.top_category, s.top_category_sales
            ),
            format!(
                "💰 Dentro dessa categoria, o preço campeão foi R$ {:.2} com {} vendas.",
                s.top_price, s.top_price_sales
            ),
            format!("💳 O método de pagamento mais usado foi {}.", s.top_payment),
            format!(
                "📊 As vendas estão em {} desde o início do período filtrado.",
                s.trend.label()
            ),
            recommendation(s),
        ]
    }
}

fn recommendation(s: &InsightSummary) -> String {
    match s.trend {
        Trend::Rising => format!("✅ Considere aumentar o estoque de {}.", s.top_category),
        Trend::Falling => {
            "⚠️ Vendas caíram, talvez seja hora de revisar preços ou promoções.".to_string()
        }
        Trend::Stable => "ℹ️ As vendas estão estáveis, mantenha a estratégia atual.".to_string(),
    }
}

/// First entry with the strictly largest value; earlier keys win ties.
fn first_max<K: Clone>(totals: &BTreeMap<K, i64>) -> Option<(K, i64)> {
    let mut best: Option<(&K, i64)> = None;
    for (key, &total) in totals {
        match best {
            Some((_, best_total)) if total <= best_total => {}
            _ => best = Some((key, total)),
        }
    }
    best.map(|(k, t)| (k.clone(), t))
}

/// Direction of daily totals between the first and last date present.
pub fn trend(table: &SalesTable) -> Trend {
    let mut daily: BTreeMap<NaiveDate, i64> = BTreeMap::new();
    for row in table.rows() {
        *daily.entry(row.date).or_default() += row.total_sales;
    }
    if daily.len() < 2 {
        return Trend::Stable;
    }
    let first = daily.values().next().copied().unwrap_or(0);
    let last = daily.values().next_back().copied().unwrap_or(0);
    match last.cmp(&first) {
        std::cmp::Ordering::Greater => Trend::Rising,
        std::cmp::Ordering::Less => Trend::Falling,
        std::cmp::Ordering::Equal => Trend::Stable,
    }
}

pub fn compute(table: &SalesTable) -> Insights {
    let Some((top_category, top_category_sales)) = first_max(&category_totals(table)) else {
        return Insights::NoData;
    };
    let Some((top_cents, top_price_sales)) = first_max(&price_totals(table, &top_category)) else {
        return Insights::NoData;
    };
    let Some(top_payment) = dominant_payment(table) else {
        return Insights::NoData;
    };
    let trend = trend(table);
    tracing::debug!(%top_category, ?trend, "computed insights");

    Insights::Summary(InsightSummary {
        top_category,
        top_category_sales,
        top_price: top_cents as f64 / 100.0,
        top_price_sales,
        top_payment,
        trend,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SaleRecord;

    fn record(day: u32, category: &str, price: f64, total_sales: i64) -> SaleRecord {
        SaleRecord {
            date: NaiveDate::from_ymd_opt(2025, 6, day).unwrap(),
            category: category.to_string(),
            price,
            total_sales,
            revenue: price * total_sales as f64,
            qty_pix: total_sales,
            qty_credit: 0,
            qty_debit: 0,
        }
    }

    fn summary(insights: &Insights) -> &InsightSummary {
        match insights {
            Insights::Summary(s) => s,
            Insights::NoData => panic!("expected a summary"),
        }
    }

    #[test]
    fn test_top_category_and_price() {
        let table = SalesTable::new(vec![
            record(1, "Cat A", 10.0, 5),
            record(1, "Cat A", 20.0, 3),
            record(1, "Cat B", 15.0, 9),
        ]);
        let insights = compute(&table);
        let s = summary(&insights);
        assert_eq!(s.top_category, "Cat B");
        assert_eq!(s.top_category_sales, 9);
        assert_eq!(s.top_price, 15.0);
        assert_eq!(s.top_price_sales, 9);
    }

    #[test]
    fn test_top_price_within_top_category() {
        let table = SalesTable::new(vec![
            record(1, "Bolo", 10.0, 2),
            record(2, "Bolo", 12.5, 4),
            record(3, "Bolo", 10.0, 1),
            record(3, "Café", 12.5, 6),
        ]);
        let insights = compute(&table);
        let s = summary(&insights);
        assert_eq!(s.top_category, "Bolo");
        assert_eq!(s.top_price, 12.5);
        assert_eq!(s.top_price_sales, 4);
    }

    #[test]
    fn test_ties_pick_first_name_and_lowest_price() {
        let table = SalesTable::new(vec![
            record(1, "Zeta", 30.0, 4),
            record(1, "Alfa", 20.0, 2),
            record(1, "Alfa", 10.0, 2),
        ]);
        let insights = compute(&table);
        let s = summary(&insights);
        assert_eq!(s.top_category, "Alfa");
        assert_eq!(s.top_price, 10.0);
    }

    #[test]
    fn test_trend_falling_recommends_price_review() {
        let table = SalesTable::new(vec![record(1, "Bolo", 10.0, 100), record(2, "Bolo", 10.0, 80)]);
        assert_eq!(trend(&table), Trend::Falling);
        let sentences = compute(&table).sentences();
        assert_eq!(
            sentences.last().unwrap(),
            "⚠️ Vendas caíram, talvez seja hora de revisar preços ou promoções."
        );
    }

    #[test]
    fn test_trend_uses_first_and_last_dates_not_row_order() {
        let table = SalesTable::new(vec![
            record(9, "Bolo", 10.0, 50),
            record(1, "Bolo", 10.0, 10),
            record(5, "Bolo", 10.0, 1),
            record(1, "Café", 4.0, 5),
        ]);
        // day 1 = 15, day 9 = 50
        assert_eq!(trend(&table), Trend::Rising);
    }

    #[test]
    fn test_trend_stable_cases() {
        let single_day = SalesTable::new(vec![record(1, "Bolo", 10.0, 1), record(1, "Café", 4.0, 9)]);
        assert_eq!(trend(&single_day), Trend::Stable);
        let equal = SalesTable::new(vec![record(1, "Bolo", 10.0, 7), record(3, "Bolo", 10.0, 7)]);
        assert_eq!(trend(&equal), Trend::Stable);
        assert_eq!(trend(&SalesTable::default()), Trend::Stable);
    }

    #[test]
    fn test_stable_sentences() {
        let table = SalesTable::new(vec![record(1, "Bolo", 10.0, 7), record(3, "Bolo", 10.0, 7)]);
        let sentences = compute(&table).sentences();
        assert_eq!(
            sentences[3],
            "📊 As vendas estão em estável desde o início do período filtrado."
        );
        assert_eq!(
            sentences[4],
            "ℹ️ As vendas estão estáveis, mantenha a estratégia atual."
        );
    }

    #[test]
    fn test_rising_sentences() {
        let table = SalesTable::new(vec![record(1, "Bolo", 12.5, 2), record(2, "Bolo", 12.5, 3)]);
        let sentences = compute(&table).sentences();
        assert_eq!(
            sentences,
            vec![
                "📈 O produto mais vendido foi Bolo com 5 vendas.",
                "💰 Dentro dessa categoria, o preço campeão foi R$ 12.50 com 5 vendas.",
                "💳 O método de pagamento mais usado foi PIX/Dinheiro.",
                "📊 As vendas estão em alta desde o início do período filtrado.",
                "✅ Considere aumentar o estoque de Bolo.",
            ]
        );
    }

    #[test]
    fn test_stable_recommendation() {
        let table = SalesTable::new(vec![record(1, "Bolo", 10.0, 1)]);
        let sentences = compute(&table).sentences();
        assert_eq!(sentences.len(), 5);
        assert_eq!(sentences[4], "ℹ️ As vendas estão estáveis, mantenha a estratégia atual.");
    }

    #[test]
    fn test_empty_subset_yields_single_no_data_message() {
        let insights = compute(&SalesTable::default());
        assert_eq!(insights, Insights::NoData);
        assert_eq!(insights.sentences(), vec![NO_DATA_MESSAGE.to_string()]);
    }
}
