use std::collections::BTreeSet;

use crate::cli::{open_source, SourceArgs};
use crate::charts::category_choices;
use crate::error::Result;
use crate::filter::FilterOptions;
use crate::fmt::{money, number};
use crate::settings::settings_path;

fn join<T: ToString>(values: &[T]) -> String {
    values.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

pub fn run(source: &SourceArgs) -> Result<()> {
    let (src, table) = open_source(source)?;

    println!("Settings:   {}", settings_path().display());
    println!("Data file:  {}", src.path.display());
    println!("Sheet:      {}", src.sheet.as_deref().unwrap_or("(first)"));

    println!();
    println!("Rows:          {}", number(table.len() as i64));
    match table.date_range() {
        Some((first, last)) => println!("Dates:         {first} to {last}"),
        None => println!("Dates:         (none)"),
    }
    println!("Total Vendas:  {}", number(table.total_sales()));
    println!("Valor Total:   {}", money(table.total_revenue()));
    println!("Categories:    {}", join(&category_choices(&table)));
    let products: BTreeSet<String> = table.rows().iter().map(|r| r.produto()).collect();
    println!("Products:      {}", number(products.len() as i64));

    let options = FilterOptions::from_table(&table);
    println!();
    println!("Years:   {}", join(&options.years));
    println!("Months:  {}", join(&options.months));
    println!("Days:    {}", join(&options.days));
    Ok(())
}
