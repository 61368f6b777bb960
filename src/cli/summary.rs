use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::{open_source, FilterArgs, SourceArgs};
use crate::error::Result;
use crate::fmt::{money, number, percent};
use crate::snapshot::Snapshot;

pub fn run(source: &SourceArgs, filter: &FilterArgs) -> Result<()> {
    let (_, table) = open_source(source)?;
    let snapshot = Snapshot::compute(&table, &filter.date_filter(), filter.category.as_deref());
    println!("{}", format_summary(&snapshot));
    Ok(())
}

// ---------------------------------------------------------------------------
// Pure formatting (snapshot → String)
// ---------------------------------------------------------------------------

pub fn format_summary(snap: &Snapshot) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}\n{}\n\n",
        "📊 Dashboard de Vendas".bold(),
        snap.filter.describe()
    ));

    out.push_str(&format!("{}\n", "📌 Resumo e Sugestões".yellow().bold()));
    for message in &snap.messages {
        out.push_str(&format!("  {message}\n"));
    }
    out.push('\n');

    out.push_str(&format_kpis(snap));
    out.push_str("\n\n");
    out.push_str(&format_payments(snap));
    out.push_str("\n\n");
    out.push_str(&format_category_ranking(snap));
    if let Some(category) = &snap.selected_category {
        out.push_str("\n\n");
        out.push_str(&format_price_ranking(category, snap));
    }
    out
}

fn format_kpis(snap: &Snapshot) -> String {
    let mut table = Table::new();
    table.set_header(vec!["🛒 Total Vendas", "💰 Valor Total", "💳 Método mais usado"]);
    table.add_row(vec![
        Cell::new(number(snap.kpis.total_sales)),
        Cell::new(money(snap.kpis.total_revenue)),
        Cell::new(snap.kpis.top_payment_label()),
    ]);
    table.to_string()
}

fn format_payments(snap: &Snapshot) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Método", "Quantidade", "%"]);
    for slice in &snap.payments {
        table.add_row(vec![
            Cell::new(slice.label),
            Cell::new(number(slice.quantity)),
            Cell::new(percent(slice.share)),
        ]);
    }
    format!("{}\n{table}", "Formas de Pagamento".bold())
}

fn format_category_ranking(snap: &Snapshot) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Categoria", "Total Vendas"]);
    // Largest first, matching the top-down reading order of the bar chart.
    for bar in snap.category_ranking.iter().rev() {
        table.add_row(vec![Cell::new(&bar.category), Cell::new(number(bar.total_sales))]);
    }
    format!("{}\n{table}", "Ranking de Vendas por Categoria".bold())
}

fn format_price_ranking(category: &str, snap: &Snapshot) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Preço", "Total Vendas"]);
    for bar in snap.price_ranking.iter().rev() {
        table.add_row(vec![Cell::new(&bar.label), Cell::new(number(bar.total_sales))]);
    }
    let title = format!("Ranking de Vendas por Preço - {category}");
    format!("{}\n{table}", title.as_str().bold())
}
