use chrono::NaiveDate;
use serde::Serialize;

/// One spreadsheet line.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleRecord {
    pub date: NaiveDate,
    pub category: String,
    pub price: f64,
    pub total_sales: i64,
    pub revenue: f64,
    pub qty_pix: i64,
    pub qty_credit: i64,
    pub qty_debit: i64,
}

impl SaleRecord {
    /// Display label combining category and price, e.g. "Bolo - R$ 12.50".
    pub fn produto(&self) -> String {
        format!("{} - R$ {:.2}", self.category, self.price)
    }

    pub fn quantity(&self, method: PaymentMethod) -> i64 {
        match method {
            PaymentMethod::PixCash => self.qty_pix,
            PaymentMethod::Credit => self.qty_credit,
            PaymentMethod::Debit => self.qty_debit,
        }
    }

    /// Price in whole centavos, used as a grouping key.
    pub fn price_cents(&self) -> i64 {
        (self.price * 100.0).round() as i64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PaymentMethod {
    PixCash,
    Credit,
    Debit,
}

impl PaymentMethod {
    /// Declaration order doubles as the tie-break order.
    pub const ALL: [PaymentMethod; 3] = [Self::PixCash, Self::Credit, Self::Debit];

    pub fn label(&self) -> &'static str {
        match self {
            Self::PixCash => "PIX/Dinheiro",
            Self::Credit => "Crédito",
            Self::Debit => "Débito",
        }
    }

    /// Spreadsheet header for this method's quantity column.
    pub fn column(&self) -> &'static str {
        match self {
            Self::PixCash => "Qty PIX/Dinheiro",
            Self::Credit => "Qty Crédito",
            Self::Debit => "Qty Débito",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// In-memory sales table. Never mutated after loading; filters produce new tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesTable {
    rows: Vec<SaleRecord>,
}

impl SalesTable {
    pub fn new(rows: Vec<SaleRecord>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[SaleRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Earliest and latest dates in the table.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.rows.iter().map(|r| r.date).min()?;
        let max = self.rows.iter().map(|r| r.date).max()?;
        Some((min, max))
    }

    pub fn total_sales(&self) -> i64 {
        self.rows.iter().map(|r| r.total_sales).sum()
    }

    pub fn total_revenue(&self) -> f64 {
        self.rows.iter().map(|r| r.revenue).sum()
    }

    pub fn payment_total(&self, method: PaymentMethod) -> i64 {
        self.rows.iter().map(|r| r.quantity(method)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(category: &str, price: f64) -> SaleRecord {
        SaleRecord {
            date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            category: category.to_string(),
            price,
            total_sales: 2,
            revenue: price * 2.0,
            qty_pix: 1,
            qty_credit: 1,
            qty_debit: 0,
        }
    }

    #[test]
    fn test_produto_label() {
        assert_eq!(record("Bolo", 12.5).produto(), "Bolo - R$ 12.50");
        assert_eq!(record("Café", 4.0).produto(), "Café - R$ 4.00");
    }

    #[test]
    fn test_price_cents_rounds_float_noise() {
        assert_eq!(record("Bolo", 0.1 + 0.2).price_cents(), 30);
        assert_eq!(record("Bolo", 19.99).price_cents(), 1999);
    }

    #[test]
    fn test_payment_labels_strip_qty_prefix() {
        for method in PaymentMethod::ALL {
            assert_eq!(method.column().strip_prefix("Qty "), Some(method.label()));
        }
    }

    #[test]
    fn test_table_totals() {
        let table = SalesTable::new(vec![record("Bolo", 10.0), record("Café", 5.0)]);
        assert_eq!(table.total_sales(), 4);
        assert_eq!(table.total_revenue(), 30.0);
        assert_eq!(table.payment_total(PaymentMethod::PixCash), 2);
        assert_eq!(table.payment_total(PaymentMethod::Debit), 0);
    }

    #[test]
    fn test_empty_table_has_no_date_range() {
        assert!(SalesTable::default().date_range().is_none());
    }
}
