//! The expense ledger: in-memory expenses and income, mirrored to a key-value store.
//!
//! Every mutation writes the complete new value to the store, then replaces the
//! in-memory state, then publishes the new [`LedgerState`] to subscribers.
//! Store failures are logged and otherwise ignored, so the in-memory state is
//! authoritative for the lifetime of the process.

use crate::core::catalog;
use crate::core::clock::Clock;
use crate::core::currency::UsdConverter;
use crate::core::expense::{
    DateFilter, Expense, ExpenseDraft, ExpensePage, ExpenseUpdate, PaginationState, Summary,
    round2,
};
use crate::store::KeyValueStore;
use chrono::{DateTime, Utc};
use rand::{Rng, distributions::Alphanumeric};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

pub const EXPENSES_KEY: &str = "expenses";
pub const INCOME_KEY: &str = "income";

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Expense not found: {0}")]
    NotFound(String),
    #[error("Currency conversion failed: {0:#}")]
    Conversion(anyhow::Error),
    #[error("Invalid input: {0}")]
    Invalid(String),
}

/// Snapshot published after every successful mutation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LedgerState {
    pub expenses: Vec<Expense>,
    pub income: f64,
}

pub struct Ledger {
    store: Arc<dyn KeyValueStore>,
    converter: Arc<dyn UsdConverter>,
    clock: Arc<dyn Clock>,
    state: Mutex<LedgerState>,
    publisher: watch::Sender<LedgerState>,
}

impl Ledger {
    /// Loads expenses and income from `store`; `default_income` applies when none is stored.
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        converter: Arc<dyn UsdConverter>,
        clock: Arc<dyn Clock>,
        default_income: f64,
    ) -> Self {
        let state = LedgerState {
            expenses: load_expenses(store.as_ref()),
            income: load_income(store.as_ref()).unwrap_or(default_income),
        };
        debug!(
            expenses = state.expenses.len(),
            income = state.income,
            "Loaded ledger"
        );
        let (publisher, _) = watch::channel(state.clone());

        Self {
            store,
            converter,
            clock,
            state: Mutex::new(state),
            publisher,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<LedgerState> {
        self.publisher.subscribe()
    }

    pub fn expenses(&self) -> Vec<Expense> {
        self.lock().expenses.clone()
    }

    pub fn income(&self) -> f64 {
        self.lock().income
    }

    pub fn get_expense(&self, id: &str) -> Option<Expense> {
        self.lock().expenses.iter().find(|e| e.id == id).cloned()
    }

    pub async fn add_expense(&self, draft: ExpenseDraft) -> Result<Expense, LedgerError> {
        validate_money(draft.amount, &draft.currency)?;

        let amount_in_usd = self.to_usd(draft.amount, &draft.currency).await?;
        let now = self.clock.now();
        let expense = Expense {
            id: generate_id(now),
            category: draft.category,
            category_icon: draft.category_icon,
            amount: draft.amount,
            currency: draft.currency,
            amount_in_usd,
            date: draft.date,
            receipt: draft.receipt,
            frequency: draft.frequency,
            created_at: now,
        };

        // Appended to whatever the list holds now, not to a pre-conversion snapshot.
        let mut state = self.lock();
        let mut expenses = state.expenses.clone();
        expenses.push(expense.clone());
        self.commit_expenses(&mut state, expenses);

        info!(id = %expense.id, amount_usd = expense.amount_in_usd, "Added expense");
        Ok(expense)
    }

    /// Merges `update` into the expense `id`, reconverting when amount or currency change.
    pub async fn update_expense(
        &self,
        id: &str,
        update: ExpenseUpdate,
    ) -> Result<Expense, LedgerError> {
        loop {
            let mut merged = self
                .get_expense(id)
                .ok_or_else(|| LedgerError::NotFound(id.to_string()))?;
            update.apply_to(&mut merged);
            validate_money(merged.amount, &merged.currency)?;

            if update.changes_money() {
                merged.amount_in_usd = self.to_usd(merged.amount, &merged.currency).await?;
            }

            if let Some(updated) = self.commit_update(id, &update, &merged)? {
                info!(id = %id, "Updated expense");
                return Ok(updated);
            }
            debug!(id = %id, "Expense changed during conversion, retrying update");
        }
    }

    /// Returns `false` when no expense has `id`; nothing is written in that case.
    pub fn delete_expense(&self, id: &str) -> bool {
        let mut state = self.lock();
        let expenses: Vec<Expense> = state
            .expenses
            .iter()
            .filter(|e| e.id != id)
            .cloned()
            .collect();
        if expenses.len() == state.expenses.len() {
            debug!(id = %id, "Delete of unknown expense ignored");
            return false;
        }
        self.commit_expenses(&mut state, expenses);
        info!(id = %id, "Deleted expense");
        true
    }

    pub fn set_income(&self, amount: f64) -> Result<(), LedgerError> {
        if !amount.is_finite() {
            return Err(LedgerError::Invalid(format!(
                "income must be a finite number, got {amount}"
            )));
        }
        let mut state = self.lock();
        if let Err(e) = self.store.set(INCOME_KEY, serde_json::Value::from(amount)) {
            error!(error = %e, "Failed to persist income");
        }
        state.income = amount;
        self.publisher.send_replace(state.clone());
        info!(income = amount, "Income updated");
        Ok(())
    }

    pub fn clear_all_expenses(&self) {
        let mut state = self.lock();
        if let Err(e) = self.store.remove(EXPENSES_KEY) {
            error!(error = %e, "Failed to clear stored expenses");
        }
        state.expenses.clear();
        self.publisher.send_replace(state.clone());
        info!("Cleared all expenses");
    }

    /// One page of the expenses matching `filter`, newest first. `page` is 1-based.
    pub fn get_filtered_expenses(
        &self,
        filter: DateFilter,
        page: usize,
        page_size: usize,
    ) -> ExpensePage {
        let page = page.max(1);
        let page_size = page_size.max(1);

        let mut filtered = self.filtered(filter);
        // Stable: equal dates keep insertion order.
        filtered.sort_by(|a, b| b.date.cmp(&a.date));

        let total_items = filtered.len();
        let start = (page - 1).saturating_mul(page_size);
        let end = start.saturating_add(page_size);
        let expenses = filtered
            .into_iter()
            .skip(start)
            .take(page_size)
            .collect();

        ExpensePage {
            expenses,
            pagination: PaginationState {
                current_page: page,
                page_size,
                total_items,
                has_more: end < total_items,
            },
        }
    }

    pub fn get_summary(&self, filter: DateFilter) -> Summary {
        let total_expenses: f64 = self
            .filtered(filter)
            .iter()
            .map(|e| e.amount_in_usd)
            .sum();
        let income = self.income();

        Summary {
            total_income: round2(income),
            total_expenses: round2(total_expenses),
            total_balance: round2(income - total_expenses),
        }
    }

    /// Calendar windows are taken in the clock's local zone, the zone dates are entered in.
    fn filtered(&self, filter: DateFilter) -> Vec<Expense> {
        let now = self.clock.to_local(self.clock.now());
        self.lock()
            .expenses
            .iter()
            .filter(|e| filter.matches(self.clock.to_local(e.date), now))
            .cloned()
            .collect()
    }

    async fn to_usd(&self, amount: f64, currency: &str) -> Result<f64, LedgerError> {
        let conversion = self
            .converter
            .convert(amount, currency)
            .await
            .map_err(LedgerError::Conversion)?;
        if conversion.is_fallback() {
            warn!(
                amount,
                currency = %currency,
                "No exchange rate available, storing unconverted amount"
            );
        }
        Ok(round2(conversion.amount_usd))
    }

    /// Applies `update` to the current version of `id`. Returns `None` when its
    /// amount or currency no longer match what `converted` was computed from.
    fn commit_update(
        &self,
        id: &str,
        update: &ExpenseUpdate,
        converted: &Expense,
    ) -> Result<Option<Expense>, LedgerError> {
        let mut state = self.lock();
        let index = state
            .expenses
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| LedgerError::NotFound(id.to_string()))?;

        let mut latest = state.expenses[index].clone();
        update.apply_to(&mut latest);
        if update.changes_money() {
            if latest.amount != converted.amount || latest.currency != converted.currency {
                return Ok(None);
            }
            latest.amount_in_usd = converted.amount_in_usd;
        }

        let mut expenses = state.expenses.clone();
        expenses[index] = latest.clone();
        self.commit_expenses(&mut state, expenses);
        Ok(Some(latest))
    }

    fn commit_expenses(&self, state: &mut LedgerState, expenses: Vec<Expense>) {
        match serde_json::to_value(&expenses) {
            Ok(value) => {
                if let Err(e) = self.store.set(EXPENSES_KEY, value) {
                    error!(error = %e, "Failed to persist expenses");
                }
            }
            Err(e) => error!(error = %e, "Failed to serialize expenses"),
        }
        state.expenses = expenses;
        self.publisher.send_replace(state.clone());
    }

    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn load_expenses(store: &dyn KeyValueStore) -> Vec<Expense> {
    match store.get(EXPENSES_KEY) {
        Ok(Some(value)) => serde_json::from_value(value).unwrap_or_else(|e| {
            warn!(error = %e, "Stored expenses are unreadable, starting empty");
            Vec::new()
        }),
        Ok(None) => Vec::new(),
        Err(e) => {
            error!(error = %e, "Failed to load expenses");
            Vec::new()
        }
    }
}

fn load_income(store: &dyn KeyValueStore) -> Option<f64> {
    match store.get(INCOME_KEY) {
        Ok(Some(value)) => {
            let income = value.as_f64();
            if income.is_none() {
                warn!(%value, "Stored income is not a number, using default");
            }
            income
        }
        Ok(None) => None,
        Err(e) => {
            error!(error = %e, "Failed to load income");
            None
        }
    }
}

fn validate_money(amount: f64, currency: &str) -> Result<(), LedgerError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(LedgerError::Invalid(format!(
            "amount must be a positive number, got {amount}"
        )));
    }
    if !catalog::is_supported_currency(currency) {
        return Err(LedgerError::Invalid(format!(
            "unsupported currency: {currency}"
        )));
    }
    Ok(())
}

/// `<millis>-<9 lowercase alphanumerics>`
fn generate_id(now: DateTime<Utc>) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect();
    format!("{}-{}", now.timestamp_millis(), suffix)
}
