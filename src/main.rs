use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use spendlog::cli::expenses::parse_date;
use spendlog::core::log::init_logging;
use spendlog::core::{Category, DateFilter, ExpenseDraft, ExpenseUpdate, Frequency};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct ExpenseFields {
    /// Category, e.g. "Groceries" or "News Paper"
    #[arg(long)]
    category: Option<Category>,
    /// Amount in the expense currency
    #[arg(long)]
    amount: Option<f64>,
    /// Three-letter currency code
    #[arg(long)]
    currency: Option<String>,
    /// Transaction date (YYYY-MM-DD or RFC 3339)
    #[arg(long)]
    date: Option<String>,
    /// Receipt as a data URI
    #[arg(long)]
    receipt: Option<String>,
    /// Manually, Daily, Weekly or Monthly
    #[arg(long)]
    frequency: Option<Frequency>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Log in with any email and password
    Login { email: String, password: String },
    /// Log out
    Logout,
    /// Show the logged in user
    Whoami,
    /// Record an expense
    Add {
        #[arg(long)]
        category: Category,
        #[arg(long)]
        amount: f64,
        #[arg(long, default_value = "USD")]
        currency: String,
        /// Transaction date (YYYY-MM-DD or RFC 3339), defaults to now
        #[arg(long)]
        date: Option<String>,
        /// Receipt as a data URI
        #[arg(long)]
        receipt: Option<String>,
        #[arg(long, default_value = "Manually")]
        frequency: Frequency,
    },
    /// Change fields of an expense
    Edit {
        id: String,
        #[command(flatten)]
        fields: ExpenseFields,
    },
    /// Delete an expense
    Delete { id: String },
    /// List expenses, newest first
    List {
        #[arg(short, long, default_value = "all")]
        filter: DateFilter,
        #[arg(short, long, default_value_t = 1)]
        page: usize,
        #[arg(long)]
        page_size: Option<usize>,
    },
    /// Display income, expenses and balance
    Summary {
        #[arg(short, long, default_value = "this_month")]
        filter: DateFilter,
    },
    /// Set the income figure
    Income { amount: f64 },
    /// Delete all expenses
    Clear,
    /// List categories and supported currencies
    Categories,
}

impl TryFrom<Commands> for spendlog::AppCommand {
    type Error = anyhow::Error;

    fn try_from(cmd: Commands) -> Result<spendlog::AppCommand> {
        use spendlog::AppCommand;

        Ok(match cmd {
            Commands::Login { email, password } => AppCommand::Login { email, password },
            Commands::Logout => AppCommand::Logout,
            Commands::Whoami => AppCommand::Whoami,
            Commands::Add {
                category,
                amount,
                currency,
                date,
                receipt,
                frequency,
            } => {
                let date = match date {
                    Some(d) => parse_date(&d)?,
                    None => chrono::Utc::now(),
                };
                let mut draft = ExpenseDraft::new(category, amount, currency.to_uppercase(), date);
                draft.receipt = receipt;
                draft.frequency = frequency;
                AppCommand::Add(draft)
            }
            Commands::Edit { id, fields } => AppCommand::Edit {
                id,
                update: ExpenseUpdate {
                    category: fields.category,
                    category_icon: None,
                    amount: fields.amount,
                    currency: fields.currency.map(|c| c.to_uppercase()),
                    date: fields.date.as_deref().map(parse_date).transpose()?,
                    receipt: fields.receipt,
                    frequency: fields.frequency,
                },
            },
            Commands::Delete { id } => AppCommand::Delete { id },
            Commands::List {
                filter,
                page,
                page_size,
            } => AppCommand::List {
                filter,
                page,
                page_size,
            },
            Commands::Summary { filter } => AppCommand::Summary { filter },
            Commands::Income { amount } => AppCommand::Income { amount },
            Commands::Clear => AppCommand::Clear,
            Commands::Categories => AppCommand::Categories,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => spendlog::cli::setup::setup(),
        Some(cmd) => match spendlog::AppCommand::try_from(cmd) {
            Ok(command) => spendlog::run_command(command, cli.config_path.as_deref()).await,
            Err(e) => Err(e),
        },
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
