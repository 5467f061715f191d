use super::ui;
use crate::core::catalog::{self, SUPPORTED_CURRENCIES};
use crate::core::expense::Category;
use anyhow::Result;
use comfy_table::Cell;

pub fn display_catalog() -> String {
    let mut categories = ui::new_styled_table();
    categories.set_header(vec![
        ui::header_cell("Category"),
        ui::header_cell("Icon"),
        ui::header_cell("Color"),
    ]);
    for category in Category::ALL {
        categories.add_row(vec![
            ui::category_cell(category),
            Cell::new(catalog::category_icon(category)),
            Cell::new(catalog::category_color(category)),
        ]);
    }

    let mut currencies = ui::new_styled_table();
    currencies.set_header(vec![
        ui::header_cell("Code"),
        ui::header_cell("Symbol"),
        ui::header_cell("Name"),
    ]);
    for currency in &SUPPORTED_CURRENCIES {
        currencies.add_row(vec![currency.code, currency.symbol, currency.name]);
    }

    format!("{categories}\n\n{currencies}")
}

pub fn run() -> Result<()> {
    println!("{}", display_catalog());
    Ok(())
}
