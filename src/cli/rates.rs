use super::ui;
use crate::core::catalog;
use crate::core::{FetchState, RateProvider, RateSnapshot, RateSource};
use anyhow::{Result, anyhow};
use chrono::Utc;
use comfy_table::Cell;
use std::sync::Arc;

/// Selects `base` on the provider and waits for its rates behind a spinner.
pub async fn load_rates<S: RateSource>(
    provider: &RateProvider<S>,
    base: &str,
) -> Result<Arc<RateSnapshot>> {
    let spinner = ui::new_spinner(format!("Fetching {base} exchange rates"));
    let state = provider.select_base(base).await;
    spinner.finish_and_clear();

    match state? {
        FetchState::Ready(snapshot) => Ok(snapshot),
        FetchState::Failed(error) => Err(error.into()),
        FetchState::Idle | FetchState::Loading => {
            Err(anyhow!("Exchange rates for {base} are not available yet"))
        }
    }
}

impl RateSnapshot {
    pub fn display_as_table(&self) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Currency"),
            ui::header_cell("Name"),
            ui::header_cell(&format!("Per 1 {}", self.base)),
        ]);

        for (code, rate) in self.table.iter().filter(|(code, _)| *code != self.base) {
            let name = catalog::find(code).map_or("", |c| c.name);
            table.add_row(vec![
                Cell::new(code),
                Cell::new(name),
                ui::amount_cell(ui::format_rate(rate)),
            ]);
        }

        let mut output = format!(
            "Exchange rates for {}\n\n",
            ui::style_text(&self.base, ui::StyleType::Title)
        );
        output.push_str(&table.to_string());
        output.push_str(&format!(
            "\n\n{}",
            ui::style_text(
                &format!(
                    "Rates as of {}, updated {}",
                    self.as_of,
                    ui::format_updated(self.retrieved_at, Utc::now())
                ),
                ui::StyleType::Subtle
            )
        ));
        output
    }
}

pub async fn run<S: RateSource>(source: S, base: &str) -> Result<()> {
    let provider = RateProvider::new(source);
    let snapshot = load_rates(&provider, base).await?;
    println!("{}", snapshot.display_as_table());
    Ok(())
}
