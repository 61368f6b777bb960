use std::path::Path;

use chrono::NaiveDate;

use crate::error::{Result, SalesError};
use crate::models::{PaymentMethod, SaleRecord, SalesTable};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A spreadsheet cell reduced to the shapes the loader cares about.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RawCell {
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl RawCell {
    fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    fn display(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(s) => s.clone(),
            Self::Number(n) => n.to_string(),
            Self::Date(d) => d.to_string(),
        }
    }
}

pub fn parse_amount(raw: &str) -> Option<f64> {
    let s: String = raw
        .replace("R$", "")
        .chars()
        .filter(|c| *c != '"' && !c.is_whitespace())
        .collect();
    if s.is_empty() {
        return Some(0.0);
    }
    let normalized = if has_decimal_comma(&s) {
        s.replace('.', "").replace(',', ".")
    } else {
        s.replace(',', "")
    };
    normalized.parse().ok()
}

/// `12,50` and `1.234,56` carry a decimal comma; `1,234` and `1,234.56` use
/// the comma for thousands. Thousands groups always have three digits.
fn has_decimal_comma(s: &str) -> bool {
    let Some(comma) = s.rfind(',') else {
        return false;
    };
    match s.rfind('.') {
        Some(dot) => dot < comma,
        None => {
            let decimals = &s[comma + 1..];
            s.matches(',').count() == 1
                && (1..=2).contains(&decimals.len())
                && decimals.bytes().all(|b| b.is_ascii_digit())
        }
    }
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    for fmt in ["%Y-%m-%d", "%d/%m/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(d);
        }
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }
    None
}

pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    // Excel epoch is 1899-12-30 (accounting for the 1900 leap year bug)
    if !serial.is_finite() {
        return None;
    }
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    base.checked_add_signed(chrono::Duration::try_days(serial.floor() as i64)?)
}

// ---------------------------------------------------------------------------
// Column mapping
// ---------------------------------------------------------------------------

const COL_DATE: &str = "Date";
const COL_CATEGORY: &str = "Category";
const COL_PRICE: &str = "Price";
const COL_TOTAL_SALES: &str = "Total Vendas";
const COL_REVENUE: &str = "Valor Total";

struct Columns {
    date: usize,
    category: usize,
    price: usize,
    total_sales: usize,
    revenue: usize,
    qty_pix: usize,
    qty_credit: usize,
    qty_debit: usize,
}

impl Columns {
    fn from_header(header: &[RawCell]) -> Result<Self> {
        let names: Vec<String> = header.iter().map(|c| c.display().trim().to_string()).collect();
        let find = |name: &str| {
            names
                .iter()
                .position(|n| n == name)
                .ok_or_else(|| SalesError::MissingColumn(name.to_string()))
        };
        Ok(Self {
            date: find(COL_DATE)?,
            category: find(COL_CATEGORY)?,
            price: find(COL_PRICE)?,
            total_sales: find(COL_TOTAL_SALES)?,
            revenue: find(COL_REVENUE)?,
            qty_pix: find(PaymentMethod::PixCash.column())?,
            qty_credit: find(PaymentMethod::Credit.column())?,
            qty_debit: find(PaymentMethod::Debit.column())?,
        })
    }
}

static EMPTY_CELL: RawCell = RawCell::Empty;

fn cell(row: &[RawCell], idx: usize) -> &RawCell {
    row.get(idx).unwrap_or(&EMPTY_CELL)
}

fn date_cell(row: &[RawCell], idx: usize, row_num: usize) -> Result<NaiveDate> {
    let raw = cell(row, idx);
    let parsed = match raw {
        RawCell::Date(d) => Some(*d),
        RawCell::Number(n) => excel_serial_to_date(*n),
        RawCell::Text(s) => parse_date(s),
        RawCell::Empty => None,
    };
    parsed.ok_or_else(|| SalesError::InvalidDate {
        row: row_num,
        value: raw.display(),
    })
}

fn amount_cell(row: &[RawCell], idx: usize, column: &str, row_num: usize) -> Result<f64> {
    let raw = cell(row, idx);
    let parsed = match raw {
        RawCell::Number(n) => Some(*n),
        RawCell::Text(s) => parse_amount(s),
        RawCell::Empty => Some(0.0),
        RawCell::Date(_) => None,
    };
    parsed.filter(|n| n.is_finite()).ok_or_else(|| SalesError::InvalidNumber {
        row: row_num,
        column: column.to_string(),
        value: raw.display(),
    })
}

/// Largest per-row count accepted; keeps column sums well inside `i64`.
const MAX_COUNT: f64 = 1e12;

fn count_cell(row: &[RawCell], idx: usize, column: &str, row_num: usize) -> Result<i64> {
    let n = amount_cell(row, idx, column, row_num)?.round();
    if n.abs() > MAX_COUNT {
        return Err(SalesError::InvalidNumber {
            row: row_num,
            column: column.to_string(),
            value: cell(row, idx).display(),
        });
    }
    Ok(n as i64)
}

/// Turn a header row plus data rows into a table. Row numbers in errors are
/// 1-based spreadsheet rows (the header is row 1).
pub(crate) fn parse_rows(header: &[RawCell], rows: &[Vec<RawCell>]) -> Result<SalesTable> {
    let cols = Columns::from_header(header)?;
    let mut records = Vec::with_capacity(rows.len());

    for (i, row) in rows.iter().enumerate() {
        if row.iter().all(RawCell::is_empty) {
            continue;
        }
        let row_num = i + 2;
        records.push(SaleRecord {
            date: date_cell(row, cols.date, row_num)?,
            category: cell(row, cols.category).display().trim().to_string(),
            price: amount_cell(row, cols.price, COL_PRICE, row_num)?,
            total_sales: count_cell(row, cols.total_sales, COL_TOTAL_SALES, row_num)?,
            revenue: amount_cell(row, cols.revenue, COL_REVENUE, row_num)?,
            qty_pix: count_cell(row, cols.qty_pix, PaymentMethod::PixCash.column(), row_num)?,
            qty_credit: count_cell(row, cols.qty_credit, PaymentMethod::Credit.column(), row_num)?,
            qty_debit: count_cell(row, cols.qty_debit, PaymentMethod::Debit.column(), row_num)?,
        });
    }
    Ok(SalesTable::new(records))
}

// ---------------------------------------------------------------------------
// Source formats, dispatched on file extension
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SourceKind {
    Csv,
    #[cfg(feature = "xlsx")]
    Workbook,
}

impl SourceKind {
    pub fn detect(file_path: &Path) -> Option<Self> {
        let ext = file_path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            #[cfg(feature = "xlsx")]
            "xlsx" | "xlsm" | "xls" | "ods" => Some(Self::Workbook),
            _ => None,
        }
    }

    fn read(&self, file_path: &Path, sheet: Option<&str>) -> Result<(Vec<RawCell>, Vec<Vec<RawCell>>)> {
        match self {
            Self::Csv => {
                if sheet.is_some() {
                    tracing::warn!("sheet name ignored for CSV input");
                }
                read_csv(file_path)
            }
            #[cfg(feature = "xlsx")]
            Self::Workbook => read_workbook(file_path, sheet),
        }
    }
}

/// Load the sales spreadsheet. Any failure here is fatal for the caller.
pub fn load_table(file_path: &Path, sheet: Option<&str>) -> Result<SalesTable> {
    if !file_path.exists() {
        return Err(SalesError::NotFound(file_path.display().to_string()));
    }
    let kind = SourceKind::detect(file_path)
        .ok_or_else(|| SalesError::UnsupportedFormat(file_path.display().to_string()))?;

    let (header, rows) = kind.read(file_path, sheet)?;
    let table = parse_rows(&header, &rows)?;
    tracing::info!(
        path = %file_path.display(),
        rows = table.len(),
        "loaded sales table"
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

fn read_csv(file_path: &Path) -> Result<(Vec<RawCell>, Vec<Vec<RawCell>>)> {
    let file = std::fs::File::open(file_path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(std::io::BufReader::new(file));

    let to_cells = |record: &csv::StringRecord| -> Vec<RawCell> {
        record
            .iter()
            .map(|f| {
                if f.trim().is_empty() {
                    RawCell::Empty
                } else {
                    RawCell::Text(f.to_string())
                }
            })
            .collect()
    };

    let mut records = rdr.records();
    let header = match records.next() {
        Some(record) => to_cells(&record?),
        None => Vec::new(),
    };
    let mut rows = Vec::new();
    for result in records {
        rows.push(to_cells(&result?));
    }
    Ok((header, rows))
}

// ---------------------------------------------------------------------------
// Workbook reader (feature-gated)
// ---------------------------------------------------------------------------

#[cfg(feature = "xlsx")]
fn read_workbook(
    file_path: &Path,
    sheet: Option<&str>,
) -> Result<(Vec<RawCell>, Vec<Vec<RawCell>>)> {
    use calamine::{Data, Reader};

    let mut workbook = calamine::open_workbook_auto(file_path)?;
    let sheet_name = match sheet {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| SalesError::Other("Workbook has no sheets".into()))?,
    };
    tracing::debug!(sheet = %sheet_name, "reading worksheet");
    let range = workbook.worksheet_range(&sheet_name)?;

    let to_cell = |data: &Data| -> RawCell {
        match data {
            Data::Int(i) => RawCell::Number(*i as f64),
            Data::Float(f) => RawCell::Number(*f),
            Data::String(s) | Data::DateTimeIso(s) => RawCell::Text(s.clone()),
            Data::DateTime(dt) => match excel_serial_to_date(dt.as_f64()) {
                Some(d) => RawCell::Date(d),
                None => RawCell::Number(dt.as_f64()),
            },
            Data::Bool(b) => RawCell::Text(b.to_string()),
            _ => RawCell::Empty,
        }
    };

    let mut rows = range.rows();
    let header: Vec<RawCell> = rows
        .next()
        .map(|r| r.iter().map(to_cell).collect())
        .unwrap_or_default();
    let body: Vec<Vec<RawCell>> = rows.map(|r| r.iter().map(to_cell).collect()).collect();
    Ok((header, body))
}
