use super::ui;
use crate::core::catalog::{self, CurrencyInfo};
use comfy_table::Cell;

pub fn display_currencies(currencies: &[&CurrencyInfo]) -> String {
    if currencies.is_empty() {
        return ui::style_text("No currencies found", ui::StyleType::Subtle);
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell(""),
        ui::header_cell("Code"),
        ui::header_cell("Name"),
        ui::header_cell("Symbol"),
    ]);
    for currency in currencies {
        table.add_row(vec![
            Cell::new(currency.flag),
            Cell::new(currency.code),
            Cell::new(currency.name),
            Cell::new(currency.symbol),
        ]);
    }
    table.to_string()
}

pub fn run(query: Option<&str>) {
    let results = catalog::search(query.unwrap_or_default());
    println!("{}", display_currencies(&results));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_search_results() {
        let output = display_currencies(&catalog::search("franc"));
        assert!(output.contains("CHF"));
        assert!(output.contains("Swiss Franc"));
        assert!(!output.contains("USD"));
    }

    #[test]
    fn test_display_no_results() {
        assert!(display_currencies(&catalog::search("doubloon")).contains("No currencies found"));
    }
}
