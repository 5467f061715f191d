use super::{expenses, ui};
use crate::App;
use crate::core::auth::User;
use crate::core::catalog;
use crate::core::expense::{DateFilter, Summary};
use anyhow::Result;

const RECENT_EXPENSES: usize = 5;

pub fn display_summary(summary: &Summary, filter: DateFilter, user: Option<&User>) -> String {
    let greeting = match user {
        Some(user) => format!("[{}] {}", user.initials(), user.name),
        None => "[U] Guest".to_string(),
    };

    let mut output = format!(
        "{}  {}\n\n",
        ui::style_text(&greeting, ui::StyleType::TotalLabel),
        ui::style_text(&filter.to_string(), ui::StyleType::Subtle)
    );
    output.push_str(&format!(
        "Total Balance: {}\n",
        ui::style_text(
            &catalog::format_currency(summary.total_balance),
            ui::StyleType::Balance(summary.total_balance)
        )
    ));
    output.push_str(&format!(
        "Income:        {}\n",
        ui::style_text(
            &catalog::format_currency(summary.total_income),
            ui::StyleType::Income
        )
    ));
    output.push_str(&format!(
        "Expenses:      {}",
        ui::style_text(
            &catalog::format_currency(summary.total_expenses),
            ui::StyleType::Expense
        )
    ));
    output
}

pub fn run(app: &App, filter: DateFilter) -> Result<()> {
    let user = app.session.current_user();
    let summary = app.ledger.get_summary(filter);
    println!("{}", display_summary(&summary, filter, user.as_ref()));

    let recent = app.ledger.get_filtered_expenses(filter, 1, RECENT_EXPENSES);
    if recent.expenses.is_empty() {
        return Ok(());
    }
    ui::print_separator();
    println!(
        "{}\n",
        ui::style_text("Recent Transactions", ui::StyleType::Title)
    );
    println!(
        "{}",
        expenses::display_page_as_table(&recent, app.clock.now())
    );
    Ok(())
}
