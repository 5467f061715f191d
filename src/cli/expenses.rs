use super::ui;
use crate::App;
use crate::core::catalog;
use crate::core::expense::{DateFilter, Expense, ExpenseDraft, ExpensePage, ExpenseUpdate};
use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use comfy_table::Cell;
use tracing::error;

/// Accepts RFC 3339 timestamps or plain `YYYY-MM-DD` dates (local midnight).
pub fn parse_date(input: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }
    let day = NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .with_context(|| format!("Invalid date: {input} (expected YYYY-MM-DD)"))?;
    let midnight = day
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| anyhow!("Invalid date: {input}"))?;
    Local
        .from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| anyhow!("Date does not exist in local time: {input}"))
}

pub fn display_page_as_table(page: &ExpensePage, now: DateTime<Utc>) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Id"),
        ui::header_cell("Category"),
        ui::header_cell("Date"),
        ui::header_cell("Amount"),
        ui::header_cell("USD"),
        ui::header_cell("Frequency"),
    ]);

    let now = now.with_timezone(&Local);
    for expense in &page.expenses {
        table.add_row(expense_row(expense, &now));
    }

    let p = &page.pagination;
    let mut output = table.to_string();
    output.push_str(&format!(
        "\n{}",
        ui::style_text(
            &format!(
                "Page {} ({} per page), {} expense(s){}",
                p.current_page,
                p.page_size,
                p.total_items,
                if p.has_more { ", more available" } else { "" }
            ),
            ui::StyleType::Subtle,
        )
    ));
    output
}

fn expense_row(expense: &Expense, now: &DateTime<Local>) -> Vec<Cell> {
    let symbol = catalog::currency_info(&expense.currency).map_or("", |c| c.symbol);
    vec![
        Cell::new(&expense.id),
        ui::category_cell(expense.category),
        Cell::new(catalog::format_date(&expense.date.with_timezone(&Local), now)),
        Cell::new(format!(
            "{symbol}{:.2} {}",
            expense.amount, expense.currency
        )),
        ui::usd_cell(expense.amount_in_usd),
        Cell::new(expense.frequency.to_string()),
    ]
}

pub fn list(app: &App, filter: DateFilter, page: usize, page_size: usize) -> Result<()> {
    let result = app.ledger.get_filtered_expenses(filter, page, page_size);
    println!(
        "Expenses: {}\n",
        ui::style_text(&filter.to_string(), ui::StyleType::Title)
    );
    if result.pagination.total_items == 0 {
        println!(
            "{}",
            ui::style_text("No expenses recorded yet.", ui::StyleType::Subtle)
        );
        return Ok(());
    }
    println!("{}", display_page_as_table(&result, app.clock.now()));
    Ok(())
}

pub async fn add(app: &App, draft: ExpenseDraft) -> Result<()> {
    let spinner = ui::new_spinner("Converting to USD...");
    let result = app.ledger.add_expense(draft).await;
    spinner.finish_and_clear();

    let expense = result.map_err(|e| {
        error!(error = %e, "Add expense failed");
        anyhow::Error::new(e).context("Failed to add expense. Please try again.")
    })?;
    println!(
        "Added {} {} ({}) as {}",
        ui::style_text(&format!("{:.2}", expense.amount), ui::StyleType::TotalLabel),
        expense.currency,
        catalog::format_currency(expense.amount_in_usd),
        expense.id
    );
    Ok(())
}

pub async fn edit(app: &App, id: &str, update: ExpenseUpdate) -> Result<()> {
    let spinner = ui::new_spinner("Updating expense...");
    let result = app.ledger.update_expense(id, update).await;
    spinner.finish_and_clear();

    let expense = result.map_err(|e| {
        error!(error = %e, "Update expense failed");
        anyhow::Error::new(e).context("Failed to update expense. Please try again.")
    })?;
    println!(
        "Updated {}: {:.2} {} ({})",
        expense.id,
        expense.amount,
        expense.currency,
        catalog::format_currency(expense.amount_in_usd)
    );
    Ok(())
}

pub fn delete(app: &App, id: &str) -> Result<()> {
    if app.ledger.delete_expense(id) {
        println!("Deleted {id}");
    } else {
        println!(
            "{}",
            ui::style_text(&format!("No expense with id {id}"), ui::StyleType::Subtle)
        );
    }
    Ok(())
}

pub fn set_income(app: &App, amount: f64) -> Result<()> {
    app.ledger
        .set_income(amount)
        .context("Failed to update income. Please try again.")?;
    println!("Income set to {}", catalog::format_currency(amount));
    Ok(())
}

pub fn clear(app: &App) -> Result<()> {
    app.ledger.clear_all_expenses();
    println!("All expenses cleared");
    Ok(())
}
