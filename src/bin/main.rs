use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use balance_bot::bot::BalanceBot;
use balance_bot::compute_balance_report;
use balance_bot::config::Config;
use balance_bot::marketplace::binance::{Binance, BinanceCredentials};
use balance_bot::telegram::Telegram;

#[derive(Parser, Debug)]
struct Args {
    #[arg(long, env = "BALANCE_BOT_CONFIG", default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Answer /balance and send the daily update
    Run,
    /// Print the current balance once
    Balance,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            format!(
                "{}=debug,balance_bot=debug,reqwest=debug",
                env!("CARGO_CRATE_NAME")
            )
            .into()
        }))
        .with(fmt::layer())
        .init();

    let args = Args::parse();

    let config = match Config::load(&args.config) {
        Ok(config) => config,
        Err(err) => {
            error!("{}", err);
            std::process::exit(1);
        }
    };

    let res = match args.command.unwrap_or(Commands::Run) {
        Commands::Run => run_bot(config).await,
        Commands::Balance => run_balance(config).await,
    };

    if let Err(err) = res {
        error!("{:#}", err);
        std::process::exit(1);
    }
}

fn marketplace(config: &Config) -> Result<Binance> {
    let credentials = BinanceCredentials::resolve(
        config.binance.api_key.clone(),
        config.binance.secret_key.clone(),
    )?;
    Binance::new(Some(credentials))
}

async fn run_balance(config: Config) -> Result<()> {
    let marketplace = marketplace(&config)?;
    let report_config = config.binance.report_config()?;

    let report = compute_balance_report(&marketplace, &report_config).await?;

    for line in report.lines.iter() {
        println!("{:<6.6} ${:.2}", line.asset, line.value);
    }
    println!();
    println!(
        "{:<6} {}",
        "TOTAL",
        format!("${:.2}", report.total).green().bold()
    );

    Ok(())
}

async fn run_bot(config: Config) -> Result<()> {
    let marketplace = marketplace(&config)?;
    marketplace.ping().await?;

    let telegram = Telegram::new(Telegram::resolve_token(config.telegram.api_key.clone())?)?;

    let bot = BalanceBot::new(
        marketplace,
        telegram,
        config.binance.report_config()?,
        config.telegram.chat_id,
        config.telegram.daily_job.schedule()?,
    );

    info!("{}", "STARTING BALANCE BOT".green());

    bot.run().await
}
