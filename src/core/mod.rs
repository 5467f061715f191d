//! Core expense-tracking logic

pub mod auth;
pub mod cache;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod currency;
pub mod expense;
pub mod ledger;
pub mod log;

// Re-export main types for cleaner imports
pub use clock::{Clock, ManualClock, SystemClock};
pub use currency::{Conversion, CurrencyConverter, CurrencyRateProvider, RateSource, UsdConverter};
pub use expense::{
    Category, DateFilter, Expense, ExpenseDraft, ExpensePage, ExpenseUpdate, Frequency,
    PaginationState, Summary,
};
pub use ledger::{Ledger, LedgerError, LedgerState};
