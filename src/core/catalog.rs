//! Static category/currency lookups and display formatting.
//!
//! Formatting is fixed to an en-US style regardless of the host locale.

use crate::core::expense::{Category, round2};
use chrono::{DateTime, Datelike, Duration, TimeZone};

pub const DEFAULT_COLOR: &str = "#6B7280";
pub const DEFAULT_ICON: &str = "circle";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyInfo {
    pub code: &'static str,
    pub symbol: &'static str,
    pub name: &'static str,
}

pub const SUPPORTED_CURRENCIES: [CurrencyInfo; 7] = [
    CurrencyInfo {
        code: "USD",
        symbol: "$",
        name: "US Dollar",
    },
    CurrencyInfo {
        code: "EUR",
        symbol: "€",
        name: "Euro",
    },
    CurrencyInfo {
        code: "GBP",
        symbol: "£",
        name: "British Pound",
    },
    CurrencyInfo {
        code: "JPY",
        symbol: "¥",
        name: "Japanese Yen",
    },
    CurrencyInfo {
        code: "CAD",
        symbol: "C$",
        name: "Canadian Dollar",
    },
    CurrencyInfo {
        code: "AUD",
        symbol: "A$",
        name: "Australian Dollar",
    },
    CurrencyInfo {
        code: "EGP",
        symbol: "E£",
        name: "Egyptian Pound",
    },
];

pub fn currency_info(code: &str) -> Option<&'static CurrencyInfo> {
    SUPPORTED_CURRENCIES.iter().find(|c| c.code == code)
}

pub fn is_supported_currency(code: &str) -> bool {
    currency_info(code).is_some()
}

pub fn category_color(category: Category) -> &'static str {
    match category {
        Category::Groceries => "#6C5DD3",
        Category::Entertainment => "#4169E1",
        Category::Transportation => "#9370DB",
        Category::Rent => "#FFB6C1",
        Category::NewsPaper => "#FFB800",
        Category::Gas => "#FF6B9D",
        Category::Shopping => "#FFA500",
    }
}

pub fn category_icon(category: Category) -> &'static str {
    match category {
        Category::Groceries => "shopping-cart",
        Category::Entertainment => "music",
        Category::Transportation => "car",
        Category::Rent => "home",
        Category::NewsPaper => "newspaper",
        Category::Gas => "fuel",
        Category::Shopping => "shopping-bag",
    }
}

/// Color for a category name, gray for anything unknown.
pub fn color_of(category: &str) -> &'static str {
    category
        .parse::<Category>()
        .map_or(DEFAULT_COLOR, category_color)
}

/// Icon hint for a category name, `circle` for anything unknown.
pub fn icon_of(category: &str) -> &'static str {
    category.parse::<Category>().map_or(DEFAULT_ICON, category_icon)
}

pub fn list_categories() -> Vec<&'static str> {
    Category::ALL.iter().map(Category::name).collect()
}

/// `$ 1,234.56`
pub fn format_currency(amount: f64) -> String {
    let cents = (round2(amount).abs() * 100.0).round() as u64;
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!(
        "$ {sign}{}.{:02}",
        group_thousands(cents / 100),
        cents % 100
    )
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `02:05 PM`
pub fn format_time<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%I:%M %p").to_string()
}

/// `Today 02:05 PM`, `Yesterday 09:00 AM`, `Mar 4`, or `Mar 4, 2023` outside the current year.
pub fn format_date<Tz: TimeZone>(date: &DateTime<Tz>, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let day = date.date_naive();
    let today = now.date_naive();

    if day == today {
        return format!("Today {}", format_time(date));
    }
    if Some(day) == today.checked_sub_signed(Duration::days(1)) {
        return format!("Yesterday {}", format_time(date));
    }
    if date.year() != now.year() {
        date.format("%b %-d, %Y").to_string()
    } else {
        date.format("%b %-d").to_string()
    }
}
