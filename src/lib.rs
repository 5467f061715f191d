pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::core::auth::Session;
use crate::core::config::AppConfig;
use crate::core::{
    Clock, CurrencyConverter, DateFilter, ExpenseDraft, ExpenseUpdate, Ledger, SystemClock,
};
use crate::providers::OpenErApiProvider;
use crate::store::{DiskStore, KeyValueStore};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Login { email: String, password: String },
    Logout,
    Whoami,
    Add(ExpenseDraft),
    Edit { id: String, update: ExpenseUpdate },
    Delete { id: String },
    List {
        filter: DateFilter,
        page: usize,
        page_size: Option<usize>,
    },
    Summary { filter: DateFilter },
    Income { amount: f64 },
    Clear,
    Categories,
}

/// Everything a command needs, built once per invocation.
pub struct App {
    pub config: AppConfig,
    pub ledger: Ledger,
    pub session: Session,
    pub clock: Arc<dyn Clock>,
}

impl App {
    /// Opens the on-disk store named by `config`.
    pub fn open(config: AppConfig) -> Result<Self> {
        let path = config.data_path()?.join("store");
        let store = Arc::new(DiskStore::open(&path, &config.storage.namespace)?);
        Self::with_store(config, store, Arc::new(SystemClock))
    }

    pub fn with_store(
        config: AppConfig,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let provider = Arc::new(OpenErApiProvider::new(
            &config.providers.exchange_rate.base_url,
        )?);
        let converter = Arc::new(CurrencyConverter::new(
            provider,
            config.rate_cache_ttl(),
            Arc::clone(&clock),
        ));
        let ledger = Ledger::new(
            Arc::clone(&store),
            converter,
            Arc::clone(&clock),
            config.default_income,
        );
        let session = Session::new(store, Arc::clone(&clock));

        Ok(Self {
            config,
            ledger,
            session,
            clock,
        })
    }
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Expense tracker starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let app = App::open(config)?;

    match command {
        AppCommand::Login { email, password } => cli::account::login(&app, &email, &password),
        AppCommand::Logout => cli::account::logout(&app),
        AppCommand::Whoami => cli::account::whoami(&app),
        AppCommand::Add(draft) => cli::expenses::add(&app, draft).await,
        AppCommand::Edit { id, update } => cli::expenses::edit(&app, &id, update).await,
        AppCommand::Delete { id } => cli::expenses::delete(&app, &id),
        AppCommand::List {
            filter,
            page,
            page_size,
        } => cli::expenses::list(
            &app,
            filter,
            page,
            page_size.unwrap_or(app.config.page_size),
        ),
        AppCommand::Summary { filter } => cli::dashboard::run(&app, filter),
        AppCommand::Income { amount } => cli::expenses::set_income(&app, amount),
        AppCommand::Clear => cli::expenses::clear(&app),
        AppCommand::Categories => cli::catalog::run(),
    }
}
