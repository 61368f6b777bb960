use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph},
    Frame,
};

use crate::cli::{open_source, SourceArgs};
use crate::error::{Result, SalesError};
use crate::filter::{cycle, DateFilter, FilterOptions, ALL_LABEL};
use crate::fmt::{number, percent};
use crate::models::SalesTable;
use crate::snapshot::Snapshot;
use crate::tui::{
    money_span, ranking_chart, wrap_text, FOOTER_STYLE, HEADER_STYLE, PAYMENT_COLORS,
    SELECTED_STYLE, TITLE_STYLE,
};

/// Which selection control the arrow keys act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Year,
    Month,
    Day,
    Category,
}

impl Focus {
    const ORDER: [Focus; 4] = [Self::Year, Self::Month, Self::Day, Self::Category];

    fn step(self, delta: i32) -> Self {
        let pos = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0) as i32;
        Self::ORDER[(pos + delta).rem_euclid(Self::ORDER.len() as i32) as usize]
    }
}

#[derive(Debug, PartialEq)]
pub(crate) enum DashboardAction {
    Continue,
    Quit,
}

pub(crate) struct Dashboard<'a> {
    table: &'a SalesTable,
    options: FilterOptions,
    filter: DateFilter,
    category: Option<String>,
    focus: Focus,
    snapshot: Snapshot,
    source_label: String,
}

impl<'a> Dashboard<'a> {
    pub(crate) fn new(table: &'a SalesTable, source_label: String) -> Self {
        let filter = DateFilter::default();
        let snapshot = Snapshot::compute(table, &filter, None);
        Self {
            table,
            options: FilterOptions::from_table(table),
            filter,
            category: snapshot.selected_category.clone(),
            focus: Focus::Year,
            snapshot,
            source_label,
        }
    }

    /// Re-run the whole pipeline for the current selections.
    fn refresh(&mut self) {
        self.snapshot = Snapshot::compute(self.table, &self.filter, self.category.as_deref());
        self.category = self.snapshot.selected_category.clone();
    }

    fn cycle_focused(&mut self, delta: i32) {
        match self.focus {
            Focus::Year => self.filter.year = cycle(self.filter.year, &self.options.years, delta),
            Focus::Month => {
                self.filter.month = cycle(self.filter.month, &self.options.months, delta)
            }
            Focus::Day => self.filter.day = cycle(self.filter.day, &self.options.days, delta),
            Focus::Category => {
                let choices = &self.snapshot.categories;
                if choices.is_empty() {
                    return;
                }
                let pos = self
                    .category
                    .as_ref()
                    .and_then(|c| choices.iter().position(|x| x == c))
                    .unwrap_or(0) as i32;
                let next = (pos + delta).rem_euclid(choices.len() as i32) as usize;
                self.category = Some(choices[next].clone());
            }
        }
        self.refresh();
    }

    pub(crate) fn handle_key(&mut self, code: KeyCode) -> DashboardAction {
        match code {
            KeyCode::Char('q') => return DashboardAction::Quit,
            KeyCode::Tab => self.focus = self.focus.step(1),
            KeyCode::BackTab => self.focus = self.focus.step(-1),
            KeyCode::Left | KeyCode::Char('h') => self.cycle_focused(-1),
            KeyCode::Right | KeyCode::Char('l') => self.cycle_focused(1),
            KeyCode::Esc => {
                self.filter = DateFilter::default();
                self.refresh();
            }
            _ => {}
        }
        DashboardAction::Continue
    }

    // -----------------------------------------------------------------------
    // Drawing
    // -----------------------------------------------------------------------

    fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let insight_width = area.width.saturating_sub(3) as usize;
        let wrapped: Vec<(String, u16)> = self
            .snapshot
            .messages
            .iter()
            .map(|m| wrap_text(m, insight_width))
            .collect();
        let insight_rows: u16 = 1 + wrapped.iter().map(|(_, n)| n).sum::<u16>();

        let [header_area, sep1, filter_area, sep2, kpi_area, insight_area, sep3, charts_area, price_area, hints_area] =
            Layout::vertical([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(insight_rows),
                Constraint::Length(1),
                Constraint::Fill(1),
                Constraint::Fill(1),
                Constraint::Length(1),
            ])
            .areas(area);

        frame.render_widget(
            Paragraph::new(format!(
                " 📊 Dashboard de Vendas · Acompanhe suas vendas de forma simples.  ({})",
                self.source_label
            ))
            .style(HEADER_STYLE),
            header_area,
        );

        let sep_widget = Paragraph::new("━".repeat(area.width as usize)).style(FOOTER_STYLE);
        frame.render_widget(sep_widget.clone(), sep1);
        frame.render_widget(sep_widget.clone(), sep2);
        frame.render_widget(sep_widget, sep3);

        frame.render_widget(Paragraph::new(self.filter_line()), filter_area);
        self.draw_kpis(frame, kpi_area);

        let mut insight_lines = vec![Line::from(Span::styled(
            " 📌 Resumo e Sugestões",
            TITLE_STYLE,
        ))];
        for (text, _) in &wrapped {
            for line in text.lines() {
                insight_lines.push(Line::from(format!("  {line}")));
            }
        }
        frame.render_widget(Paragraph::new(insight_lines), insight_area);

        let [payments_area, ranking_area] =
            Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
                .areas(charts_area);
        self.draw_payments(frame, payments_area);

        let ranking: Vec<(String, i64)> = self
            .snapshot
            .category_ranking
            .iter()
            .rev()
            .map(|b| (b.category.clone(), b.total_sales))
            .collect();
        draw_ranking(frame, ranking_area, "Ranking de Vendas por Categoria".to_string(), &ranking);

        let price_title = match &self.snapshot.selected_category {
            Some(c) => format!("Ranking de Vendas por Preço - {c}"),
            None => "Ranking de Vendas por Preço".to_string(),
        };
        let prices: Vec<(String, i64)> = self
            .snapshot
            .price_ranking
            .iter()
            .rev()
            .map(|b| (b.label.clone(), b.total_sales))
            .collect();
        draw_ranking(frame, price_area, price_title, &prices);

        frame.render_widget(
            Paragraph::new(" Tab=next control  \u{2190}/\u{2192}=change  Esc=clear filters  q=quit")
                .style(FOOTER_STYLE),
            hints_area,
        );
    }

    fn filter_line(&self) -> Line<'static> {
        fn value<T: ToString>(v: Option<T>) -> String {
            v.map_or_else(|| ALL_LABEL.to_string(), |v| v.to_string())
        }
        let controls = [
            (Focus::Year, "Ano", value(self.filter.year)),
            (Focus::Month, "Mês", value(self.filter.month)),
            (Focus::Day, "Dia", value(self.filter.day)),
            (Focus::Category, "Categoria", self.category.clone().unwrap_or_else(|| "-".into())),
        ];
        let mut spans = Vec::new();
        for (focus, label, val) in controls {
            spans.push(Span::raw(format!(" {label}: ")));
            let style = if focus == self.focus {
                SELECTED_STYLE
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };
            spans.push(Span::styled(format!("\u{25c2} {val} \u{25b8}"), style));
            spans.push(Span::raw("  "));
        }
        Line::from(spans)
    }

    fn draw_kpis(&self, frame: &mut Frame, area: Rect) {
        let kpis = &self.snapshot.kpis;
        let [a, b, c] = Layout::horizontal([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .areas(area);

        let metric = |label: &str, value: Span<'static>| {
            Paragraph::new(vec![
                Line::from(Span::styled(format!(" {label}"), FOOTER_STYLE)),
                Line::from(vec![Span::raw(" "), value]),
            ])
        };
        frame.render_widget(
            metric("🛒 Total Vendas", Span::styled(number(kpis.total_sales), TITLE_STYLE)),
            a,
        );
        frame.render_widget(metric("💰 Valor Total", money_span(kpis.total_revenue)), b);
        frame.render_widget(
            metric(
                "💳 Método mais usado",
                Span::styled(kpis.top_payment_label(), TITLE_STYLE),
            ),
            c,
        );
    }

    fn draw_payments(&self, frame: &mut Frame, area: Rect) {
        let [title_area, g1, g2, g3, _] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .areas(area);

        frame.render_widget(
            Paragraph::new(Span::styled(" Formas de Pagamento", TITLE_STYLE)),
            title_area,
        );
        for ((slice, color), gauge_area) in self
            .snapshot
            .payments
            .iter()
            .zip(PAYMENT_COLORS)
            .zip([g1, g2, g3])
        {
            let gauge = Gauge::default()
                .gauge_style(Style::new().fg(color).bg(Color::Rgb(30, 30, 30)))
                .ratio(slice.share.clamp(0.0, 1.0))
                .label(format!(
                    "{} {} ({})",
                    slice.label,
                    number(slice.quantity),
                    percent(slice.share)
                ))
                .use_unicode(true);
            frame.render_widget(gauge, inset(gauge_area));
        }
    }
}

fn inset(area: Rect) -> Rect {
    Rect {
        x: area.x.saturating_add(1),
        width: area.width.saturating_sub(2),
        ..area
    }
}

fn draw_ranking(frame: &mut Frame, area: Rect, title: String, items: &[(String, i64)]) {
    if items.is_empty() {
        frame.render_widget(
            Paragraph::new(vec![
                Line::from(Span::styled(format!(" {title}"), TITLE_STYLE)),
                Line::from(Span::styled(" Sem dados para exibir.", FOOTER_STYLE)),
            ]),
            area,
        );
        return;
    }
    frame.render_widget(ranking_chart(format!(" {title}"), items), area);
}

// ---------------------------------------------------------------------------
// Main entry point
// ---------------------------------------------------------------------------

pub fn run(source: &SourceArgs) -> Result<()> {
    // Loaded once; every key press recomputes from this table.
    let (src, table) = open_source(source)?;
    let label = src
        .path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| src.path.display().to_string());
    let mut dashboard = Dashboard::new(&table, label);

    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        ratatui::restore();
        hook(info);
    }));

    let mut terminal = ratatui::init();

    let result: Result<()> = loop {
        if let Err(e) = terminal.draw(|frame| dashboard.draw(frame)) {
            break Err(SalesError::from(e));
        }

        match event::read() {
            Err(e) => break Err(e.into()),
            Ok(Event::Key(key)) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if key.modifiers.contains(KeyModifiers::CONTROL)
                    && key.code == KeyCode::Char('c')
                {
                    break Ok(());
                }
                if dashboard.handle_key(key.code) == DashboardAction::Quit {
                    break Ok(());
                }
            }
            _ => {}
        }
    };

    drop(terminal);
    ratatui::restore();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SaleRecord;
    use chrono::NaiveDate;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn record(y: i32, m: u32, d: u32, category: &str, price: f64, total_sales: i64) -> SaleRecord {
        SaleRecord {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            category: category.to_string(),
            price,
            total_sales,
            revenue: price * total_sales as f64,
            qty_pix: total_sales,
            qty_credit: 1,
            qty_debit: 0,
        }
    }

    fn sample() -> SalesTable {
        SalesTable::new(vec![
            record(2024, 12, 30, "Bolo", 12.0, 3),
            record(2025, 1, 2, "Café", 4.0, 10),
            record(2025, 1, 3, "Bolo", 14.0, 5),
        ])
    }

    fn screen_text(dashboard: &Dashboard) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| dashboard.draw(f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_year_control_cycles_and_refilters() {
        let table = sample();
        let mut dash = Dashboard::new(&table, "test.csv".into());
        assert_eq!(dash.snapshot.kpis.total_sales, 18);

        dash.handle_key(KeyCode::Right);
        assert_eq!(dash.filter.year, Some(2024));
        assert_eq!(dash.snapshot.kpis.total_sales, 3);

        dash.handle_key(KeyCode::Right);
        assert_eq!(dash.filter.year, Some(2025));
        assert_eq!(dash.snapshot.kpis.total_sales, 15);

        dash.handle_key(KeyCode::Right);
        assert_eq!(dash.filter.year, None);
    }

    #[test]
    fn test_tab_moves_focus_and_esc_clears() {
        let table = sample();
        let mut dash = Dashboard::new(&table, "test.csv".into());
        dash.handle_key(KeyCode::Tab);
        dash.handle_key(KeyCode::Right);
        assert_eq!(dash.filter.month, Some(1));
        dash.handle_key(KeyCode::Esc);
        assert_eq!(dash.filter, DateFilter::default());
        dash.handle_key(KeyCode::BackTab);
        assert_eq!(dash.focus, Focus::Year);
    }

    #[test]
    fn test_category_control_drives_price_ranking() {
        let table = sample();
        let mut dash = Dashboard::new(&table, "test.csv".into());
        assert_eq!(dash.category.as_deref(), Some("Bolo"));
        for _ in 0..3 {
            dash.handle_key(KeyCode::Tab);
        }
        dash.handle_key(KeyCode::Right);
        assert_eq!(dash.category.as_deref(), Some("Café"));
        assert_eq!(dash.snapshot.price_ranking.len(), 1);
        assert_eq!(dash.snapshot.price_ranking[0].label, "R$ 4.00");
    }

    #[test]
    fn test_quit_key() {
        let table = sample();
        let mut dash = Dashboard::new(&table, "test.csv".into());
        assert_eq!(dash.handle_key(KeyCode::Char('q')), DashboardAction::Quit);
        assert_eq!(dash.handle_key(KeyCode::Char('x')), DashboardAction::Continue);
    }

    #[test]
    fn test_draw_shows_kpis_and_charts() {
        let table = sample();
        let dash = Dashboard::new(&table, "test.csv".into());
        let text = screen_text(&dash);
        assert!(text.contains("Total Vendas"));
        assert!(text.contains("Formas de Pagamento"));
        assert!(text.contains("Ranking de Vendas por Categoria"));
        assert!(text.contains("Ranking de Vendas por Pre"));
    }

    #[test]
    fn test_draw_empty_subset() {
        let table = sample();
        let mut dash = Dashboard::new(&table, "test.csv".into());
        dash.filter = DateFilter::new(Some(2024), Some(1), None);
        dash.refresh();
        let text = screen_text(&dash);
        assert!(text.contains("Sem dados para exibir."));
        assert!(text.contains("Nenhum dado"));
    }
}
