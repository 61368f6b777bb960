use serde::Serialize;

use crate::models::{PaymentMethod, SalesTable};

/// Headline metrics for the filtered subset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpis {
    pub total_sales: i64,
    pub total_revenue: f64,
    /// `None` when the subset is empty.
    pub top_payment: Option<PaymentMethod>,
}

impl Kpis {
    pub fn top_payment_label(&self) -> &'static str {
        self.top_payment.map_or("-", |m| m.label())
    }
}

pub fn compute(table: &SalesTable) -> Kpis {
    Kpis {
        total_sales: table.total_sales(),
        total_revenue: table.total_revenue(),
        top_payment: dominant_payment(table),
    }
}

/// Payment method with the largest summed quantity. On a tie the method
/// declared first in `PaymentMethod::ALL` wins.
pub fn dominant_payment(table: &SalesTable) -> Option<PaymentMethod> {
    if table.is_empty() {
        return None;
    }
    let mut best: Option<(PaymentMethod, i64)> = None;
    for method in PaymentMethod::ALL {
        let total = table.payment_total(method);
        match best {
            Some((_, best_total)) if total <= best_total => {}
            _ => best = Some((method, total)),
        }
    }
    best.map(|(m, _)| m)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SaleRecord;
    use chrono::NaiveDate;

    fn record(total_sales: i64, revenue: f64, pay: (i64, i64, i64)) -> SaleRecord {
        SaleRecord {
            date: NaiveDate::from_ymd_opt(2025, 5, 2).unwrap(),
            category: "Bolo".to_string(),
            price: 10.0,
            total_sales,
            revenue,
            qty_pix: pay.0,
            qty_credit: pay.1,
            qty_debit: pay.2,
        }
    }

    #[test]
    fn test_kpis_sum_subset() {
        let table = SalesTable::new(vec![record(3, 30.0, (1, 1, 1)), record(7, 72.5, (5, 2, 0))]);
        let kpis = compute(&table);
        assert_eq!(kpis.total_sales, 10);
        assert_eq!(kpis.total_revenue, 102.5);
        assert_eq!(kpis.top_payment, Some(PaymentMethod::PixCash));
    }

    #[test]
    fn test_dominant_payment_pix() {
        let table = SalesTable::new(vec![record(1, 1.0, (10, 4, 2))]);
        assert_eq!(dominant_payment(&table).map(|m| m.label()), Some("PIX/Dinheiro"));
    }

    #[test]
    fn test_dominant_payment_strict_max() {
        let table = SalesTable::new(vec![record(1, 1.0, (1, 2, 9)), record(1, 1.0, (1, 2, 0))]);
        assert_eq!(dominant_payment(&table), Some(PaymentMethod::Debit));
    }

    #[test]
    fn test_dominant_payment_tie_prefers_declaration_order() {
        let table = SalesTable::new(vec![record(1, 1.0, (2, 5, 5))]);
        assert_eq!(dominant_payment(&table), Some(PaymentMethod::Credit));
        let table = SalesTable::new(vec![record(1, 1.0, (0, 0, 0))]);
        assert_eq!(dominant_payment(&table), Some(PaymentMethod::PixCash));
    }

    #[test]
    fn test_empty_subset_is_zero_and_blank() {
        let kpis = compute(&SalesTable::default());
        assert_eq!(kpis.total_sales, 0);
        assert_eq!(kpis.total_revenue, 0.0);
        assert_eq!(kpis.top_payment, None);
        assert_eq!(kpis.top_payment_label(), "-");
    }
}
