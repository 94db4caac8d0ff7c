//! Splitledger CLI
//!
//! Records shared expenses against a journal file and prints who owes whom.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use splitledger_core::ledger::{Ledger, LedgerError, LedgerPolicy};
use splitledger_db::JournalStore;
use splitledger_shared::types::{PageRequest, parse_amount};
use splitledger_shared::{AppConfig, AppError};

use commands::{Commands, SplitMode, parse_share};

#[derive(Parser)]
#[command(name = "splitledger")]
#[command(about = "Splitledger - shared expense ledger and settlement planner", long_about = None)]
struct Cli {
    /// Journal file (overrides `store.journal_path`)
    #[arg(short, long)]
    journal: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Manage participants
    #[command(subcommand)]
    Participant(ParticipantCommand),

    /// Record and list expenses
    #[command(subcommand)]
    Expense(ExpenseCommand),

    /// Record that FROM paid TO
    Settle {
        /// Paying participant
        from: String,
        /// Receiving participant
        to: String,
        /// Amount paid
        #[arg(value_parser = parse_amount)]
        amount: Decimal,
    },

    /// List recorded settlements
    Settlements,

    /// Suggest transfers that settle every balance
    Plan,

    /// Show every balance
    Balances,
}

#[derive(Subcommand)]
enum ParticipantCommand {
    /// Add a participant with a zero balance
    Add {
        /// Participant name
        name: String,
    },
    /// Remove a participant
    Remove {
        /// Participant name
        name: String,
    },
    /// List participants with their balances
    List,
}

#[derive(Subcommand)]
enum ExpenseCommand {
    /// Record an expense
    Add(AddExpense),
    /// List recorded expenses
    List {
        /// Page number (1-based)
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Expenses per page
        #[arg(long, default_value_t = 20)]
        per_page: u32,
    },
}

#[derive(Args)]
struct AddExpense {
    /// What the money was spent on
    #[arg(long)]
    description: String,
    /// Amount fronted by the payer
    #[arg(long, value_parser = parse_amount)]
    total: Decimal,
    /// Participant who paid
    #[arg(long)]
    paid_by: String,
    /// Explicit share, repeatable (NAME=AMOUNT)
    #[arg(long = "split", value_parser = parse_share, conflicts_with = "equal")]
    splits: Vec<(String, Decimal)>,
    /// Split the total equally across these participants
    #[arg(long, num_args = 1.., conflicts_with = "splits")]
    equal: Vec<String>,
}

impl AddExpense {
    fn split_mode(&self) -> SplitMode {
        if self.equal.is_empty() {
            SplitMode::Exact(self.splits.clone())
        } else {
            SplitMode::Equal(self.equal.clone())
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Logs go to stderr so command output stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "splitledger=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(lines) => {
            for line in lines {
                println!("{line}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            let code = error_code(&err);
            error!(code, error = %err, "command failed");
            eprintln!("error [{code}]: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Stable code for an error, preferring the ledger's own classification.
fn error_code(err: &anyhow::Error) -> &'static str {
    if let Some(ledger) = err.downcast_ref::<LedgerError>() {
        ledger.error_code()
    } else if let Some(app) = err.downcast_ref::<AppError>() {
        app.error_code()
    } else {
        "INTERNAL_ERROR"
    }
}

async fn run(cli: Cli) -> anyhow::Result<Vec<String>> {
    let mut config = AppConfig::load().map_err(AppError::from)?;
    if let Some(journal) = cli.journal {
        config.store.journal_path = journal;
    }
    let store = JournalStore::from_config(&config.store)
        .await
        .map_err(LedgerError::from)?;
    debug!(journal = %store.path().display(), "configuration loaded");
    let ledger = Ledger::open(store, LedgerPolicy::from(&config.ledger)).await?;
    let commands = Commands::new(&ledger, config.display.decimal_places);

    let lines = match cli.command {
        Command::Participant(ParticipantCommand::Add { name }) => {
            commands.add_participant(&name).await?
        }
        Command::Participant(ParticipantCommand::Remove { name }) => {
            commands.remove_participant(&name).await?
        }
        Command::Participant(ParticipantCommand::List) | Command::Balances => {
            commands.balances().await
        }
        Command::Expense(ExpenseCommand::Add(expense)) => {
            commands
                .add_expense(
                    &expense.description,
                    expense.total,
                    &expense.paid_by,
                    expense.split_mode(),
                )
                .await?
        }
        Command::Expense(ExpenseCommand::List { page, per_page }) => {
            commands.list_expenses(PageRequest::new(page, per_page)).await
        }
        Command::Settle { from, to, amount } => commands.settle(&from, &to, amount).await?,
        Command::Settlements => commands.list_settlements().await,
        Command::Plan => commands.plan().await,
    };

    Ok(lines)
}
