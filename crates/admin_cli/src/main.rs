use std::error::Error;

use clap::{Args, Parser, Subcommand, ValueEnum};
use engine::{Currency, Engine, Money, NewTransactionCmd, TransactionType};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

#[derive(Parser, Debug)]
#[command(name = "wallet_admin")]
#[command(about = "Admin utilities for the wallet ledger (schema, wallets, transactions)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:./wallet.db?mode=rwc")]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply or inspect schema migrations.
    Migrate {
        #[arg(value_enum, default_value_t = MigrateAction::Up)]
        action: MigrateAction,
    },
    Wallet(Wallet),
    Transaction(Transaction),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum MigrateAction {
    Up,
    Down,
    Fresh,
    Status,
}

#[derive(Args, Debug)]
struct Wallet {
    #[command(subcommand)]
    command: WalletCommand,
}

#[derive(Subcommand, Debug)]
enum WalletCommand {
    Create(WalletCreateArgs),
    List,
}

#[derive(Args, Debug)]
struct WalletCreateArgs {
    #[arg(long)]
    owner: String,
    #[arg(long, default_value = "EUR")]
    currency: String,
}

#[derive(Args, Debug)]
struct Transaction {
    #[command(subcommand)]
    command: TransactionCommand,
}

#[derive(Subcommand, Debug)]
enum TransactionCommand {
    Create(TransactionCreateArgs),
    List {
        #[arg(long)]
        wallet_id: i64,
    },
}

#[derive(Args, Debug)]
struct TransactionCreateArgs {
    #[arg(long)]
    global_id: String,
    #[arg(long)]
    wallet_id: i64,
    /// `C` for a credit, `D` for a debit.
    #[arg(long = "type")]
    transaction_type: String,
    /// Amount in major units, e.g. `10.50`.
    #[arg(long)]
    amount: String,
    #[arg(long, default_value = "EUR")]
    currency: String,
    #[arg(long)]
    description: Option<String>,
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

async fn migrate(
    database_url: &str,
    action: MigrateAction,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    match action {
        MigrateAction::Up => migration::Migrator::up(&db, None).await?,
        MigrateAction::Down => migration::Migrator::down(&db, None).await?,
        MigrateAction::Fresh => migration::Migrator::fresh(&db).await?,
        MigrateAction::Status => migration::Migrator::status(&db).await?,
    }
    println!("migrate {action:?}: done");
    Ok(())
}

fn print_wallet(wallet: &engine::Wallet) {
    println!(
        "{}\t{}\t{} {}\t{}",
        wallet.id,
        wallet.owner,
        wallet.balance.format(wallet.currency),
        wallet.currency,
        wallet.last_updated.to_rfc3339()
    );
}

fn print_transaction(tx: &engine::Transaction) {
    println!(
        "{}\t{}\t{}\t{} {}\t{}",
        tx.id,
        tx.global_id,
        tx.transaction_type.code(),
        tx.amount.format(tx.currency),
        tx.currency,
        tx.description.as_deref().unwrap_or("")
    );
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    if let Command::Migrate { action } = cli.command {
        return migrate(&cli.database_url, action).await;
    }

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::Migrate { .. } => {}
        Command::Wallet(Wallet {
            command: WalletCommand::Create(args),
        }) => {
            let currency = Currency::try_from(args.currency.as_str())?;
            let wallet = engine.new_wallet(&args.owner, currency).await?;
            println!("created wallet: {} ({})", wallet.id, wallet.currency);
        }
        Command::Wallet(Wallet {
            command: WalletCommand::List,
        }) => {
            for wallet in engine.wallets().await? {
                print_wallet(&wallet);
            }
        }
        Command::Transaction(Transaction {
            command: TransactionCommand::Create(args),
        }) => {
            let currency = Currency::try_from(args.currency.as_str())?;
            let transaction_type = TransactionType::try_from(args.transaction_type.as_str())?;
            let amount = Money::parse(&args.amount, currency)?;

            let mut cmd = NewTransactionCmd::new(
                args.global_id,
                args.wallet_id,
                currency,
                transaction_type,
                amount,
            );
            if let Some(description) = args.description {
                cmd = cmd.description(description);
            }

            let (tx, wallet) = engine.create_transaction(cmd).await?;
            print_transaction(&tx);
            print_wallet(&wallet);
        }
        Command::Transaction(Transaction {
            command: TransactionCommand::List { wallet_id },
        }) => {
            for tx in engine.transactions_for_wallet(wallet_id).await? {
                print_transaction(&tx);
            }
        }
    }

    Ok(())
}
