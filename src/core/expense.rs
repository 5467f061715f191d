//! Expense records and the views derived from them

use crate::core::catalog::category_icon;
use anyhow::anyhow;
use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Groceries,
    Entertainment,
    Transportation,
    Rent,
    #[serde(rename = "News Paper")]
    NewsPaper,
    Gas,
    Shopping,
}

impl Category {
    /// Catalog order.
    pub const ALL: [Category; 7] = [
        Category::Groceries,
        Category::Entertainment,
        Category::Transportation,
        Category::Rent,
        Category::NewsPaper,
        Category::Gas,
        Category::Shopping,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Category::Groceries => "Groceries",
            Category::Entertainment => "Entertainment",
            Category::Transportation => "Transportation",
            Category::Rent => "Rent",
            Category::NewsPaper => "News Paper",
            Category::Gas => "Gas",
            Category::Shopping => "Shopping",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        Category::ALL
            .into_iter()
            .find(|c| c.name().replace(' ', "").eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| anyhow!("Unknown category: {}", s))
    }
}

/// Recorded with an expense; nothing schedules recurrences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Frequency {
    #[default]
    Manually,
    Daily,
    Weekly,
    Monthly,
}

impl Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl FromStr for Frequency {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "manually" | "manual" => Ok(Frequency::Manually),
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            _ => Err(anyhow!("Invalid frequency: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub category: Category,
    /// Icon hint captured when the expense was drafted.
    pub category_icon: String,
    pub amount: f64,
    pub currency: String,
    #[serde(rename = "amountInUSD")]
    pub amount_in_usd: f64,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt: Option<String>,
    #[serde(default)]
    pub frequency: Frequency,
    pub created_at: DateTime<Utc>,
}

/// An expense as entered, before the ledger assigns id, timestamp and USD amount.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseDraft {
    pub category: Category,
    pub category_icon: String,
    pub amount: f64,
    pub currency: String,
    pub date: DateTime<Utc>,
    pub receipt: Option<String>,
    pub frequency: Frequency,
}

impl ExpenseDraft {
    /// A manually entered draft without receipt, with the catalog's icon for `category`.
    pub fn new(
        category: Category,
        amount: f64,
        currency: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            category,
            category_icon: category_icon(category).to_string(),
            amount,
            currency: currency.into(),
            date,
            receipt: None,
            frequency: Frequency::Manually,
        }
    }
}

/// Fields to overwrite on an existing expense. `None` leaves a field alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseUpdate {
    pub category: Option<Category>,
    pub category_icon: Option<String>,
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub receipt: Option<String>,
    pub frequency: Option<Frequency>,
}

impl ExpenseUpdate {
    pub fn changes_money(&self) -> bool {
        self.amount.is_some() || self.currency.is_some()
    }

    pub(crate) fn apply_to(&self, expense: &mut Expense) {
        if let Some(category) = self.category {
            expense.category = category;
        }
        if let Some(icon) = &self.category_icon {
            expense.category_icon = icon.clone();
        }
        if let Some(amount) = self.amount {
            expense.amount = amount;
        }
        if let Some(currency) = &self.currency {
            expense.currency = currency.clone();
        }
        if let Some(date) = self.date {
            expense.date = date;
        }
        if let Some(receipt) = &self.receipt {
            expense.receipt = Some(receipt.clone());
        }
        if let Some(frequency) = self.frequency {
            expense.frequency = frequency;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DateFilter {
    #[default]
    All,
    ThisMonth,
    Last7Days,
    Last30Days,
    ThisYear,
}

impl DateFilter {
    pub const ALL: [DateFilter; 5] = [
        DateFilter::All,
        DateFilter::ThisMonth,
        DateFilter::Last7Days,
        DateFilter::Last30Days,
        DateFilter::ThisYear,
    ];

    /// Whether an expense dated `date` falls inside this window as seen at `now`.
    ///
    /// Months and years are those of the zone both instants are expressed in.
    pub fn matches<Tz: TimeZone>(&self, date: DateTime<Tz>, now: DateTime<Tz>) -> bool {
        match self {
            DateFilter::All => true,
            DateFilter::ThisMonth => date.year() == now.year() && date.month() == now.month(),
            DateFilter::Last7Days => date >= now - Duration::days(7),
            DateFilter::Last30Days => date >= now - Duration::days(30),
            DateFilter::ThisYear => date.year() == now.year(),
        }
    }
}

impl Display for DateFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                DateFilter::All => "All Time",
                DateFilter::ThisMonth => "This month",
                DateFilter::Last7Days => "Last 7 Days",
                DateFilter::Last30Days => "Last 30 Days",
                DateFilter::ThisYear => "This Year",
            }
        )
    }
}

impl FromStr for DateFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace([' ', '-'], "_").as_str() {
            "all" | "all_time" => Ok(DateFilter::All),
            "this_month" | "month" => Ok(DateFilter::ThisMonth),
            "last_7_days" | "7d" => Ok(DateFilter::Last7Days),
            "last_30_days" | "30d" => Ok(DateFilter::Last30Days),
            "this_year" | "year" => Ok(DateFilter::ThisYear),
            _ => Err(anyhow!("Invalid date filter: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_income: f64,
    pub total_expenses: f64,
    pub total_balance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationState {
    pub current_page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub has_more: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpensePage {
    pub expenses: Vec<Expense>,
    pub pagination: PaginationState,
}

/// Half-away-from-zero rounding to cents.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
