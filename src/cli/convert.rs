use super::{rates::load_rates, ui};
use crate::core::{Quote, RateProvider, RateSnapshot, RateSource, convert};
use anyhow::Result;
use chrono::Utc;
use tracing::warn;

pub const QUICK_AMOUNTS: [f64; 4] = [1.0, 10.0, 100.0, 1000.0];

impl Quote {
    pub fn display(&self, snapshot: &RateSnapshot) -> String {
        let mut output = format!(
            "{} equals\n{}\n\n",
            ui::format_money(self.amount, &self.from),
            ui::style_text(
                &ui::format_money(self.result, &self.to),
                ui::StyleType::Highlight
            )
        );

        output.push_str(&format!(
            "{}\n{}\n",
            ui::style_text(
                &format!(
                    "1 {} = {} {}",
                    self.from,
                    ui::format_rate(self.rate),
                    self.to
                ),
                ui::StyleType::Label
            ),
            ui::style_text(
                &format!(
                    "1 {} = {} {}",
                    self.to,
                    ui::format_rate(self.inverse_rate),
                    self.from
                ),
                ui::StyleType::Subtle
            ),
        ));

        if !self.missing.is_empty() {
            output.push_str(&format!(
                "{}\n",
                ui::style_text(
                    &format!(
                        "No {} rate for {}, treated as 1:1",
                        snapshot.base,
                        self.missing.join(", ")
                    ),
                    ui::StyleType::Error
                )
            ));
        }

        output.push_str(&ui::style_text(
            &format!(
                "Rates as of {}, updated {}",
                snapshot.as_of,
                ui::format_updated(snapshot.retrieved_at, Utc::now())
            ),
            ui::StyleType::Subtle,
        ));
        output
    }
}

/// Conversions of the quick amounts, one row each.
pub fn quick_amounts_table(from: &str, to: &str, snapshot: &RateSnapshot) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell(from), ui::header_cell(to)]);

    for amount in QUICK_AMOUNTS {
        let result = convert(amount, from, to, &snapshot.table, &snapshot.base);
        table.add_row(vec![
            ui::amount_cell(ui::format_number(amount)),
            ui::amount_cell(ui::format_number(result)),
        ]);
    }
    table.to_string()
}

pub fn quote(amount: f64, from: &str, to: &str, snapshot: &RateSnapshot) -> Quote {
    let quote = Quote::new(amount, from, to, snapshot);
    if !quote.missing.is_empty() {
        warn!(
            base = %snapshot.base,
            missing = ?quote.missing,
            "Currency missing from rate table, converting at 1:1"
        );
    }
    quote
}

pub async fn run<S: RateSource>(source: S, amount: f64, from: &str, to: &str) -> Result<()> {
    let provider = RateProvider::new(source);
    // Rates are always anchored at the source currency.
    let snapshot = load_rates(&provider, from).await?;

    let quote = quote(amount, from, to, &snapshot);
    println!("{}", quote.display(&snapshot));
    ui::print_separator();
    println!("{}", quick_amounts_table(from, to, &snapshot));
    Ok(())
}
