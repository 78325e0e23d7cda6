use anyhow::{Context, bail};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cashpoint::{
  application::withdrawal::{WithdrawCashCommand, WithdrawCashError, WithdrawCashUseCase},
  domain::withdrawal::services::WithdrawalService,
  infrastructure::{
    config::Config,
    in_memory::{InMemoryBankLedger, InMemoryCardProvider, InMemoryMoneyDepot},
  },
};

const USAGE: &str = "usage: cashpoint <amount> <currency> <card-number> <pin>";

fn parse_command(args: &[String]) -> anyhow::Result<WithdrawCashCommand> {
  let [amount, currency, card_number, pin] = args else {
    bail!(USAGE);
  };

  Ok(WithdrawCashCommand {
    amount: amount.parse().context("amount must be a whole number")?,
    currency: currency.clone(),
    card_number: card_number.clone(),
    pin: pin.parse().context("PIN must be numeric")?,
  })
}

fn build_use_case(config: &Config) -> anyhow::Result<WithdrawCashUseCase> {
  let card_provider = InMemoryCardProvider::from_config(&config.cards)
    .context("invalid [[cards]] configuration")?;
  let bank_ledger = InMemoryBankLedger::from_config(&config.accounts)
    .context("invalid [[accounts]] configuration")?;

  let mut service = WithdrawalService::new(Arc::new(card_provider), Arc::new(bank_ledger));

  if config.atm.inventory_aware {
    let depot =
      InMemoryMoneyDepot::from_config(&config.depot).context("invalid [[depot]] configuration")?;
    service = service.with_money_depot(Arc::new(depot));
  } else {
    tracing::info!("Inventory tracking disabled, paying out from unlimited stock");
  }

  Ok(WithdrawCashUseCase::new(Arc::new(service)))
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
  // Initialize environment variables from .env file
  dotenvy::dotenv().ok();

  let config = Config::load().context("failed to load configuration")?;

  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.logging.filter.clone().into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  tracing::info!(atm = %config.atm.id, "Starting cashpoint");

  let args: Vec<String> = std::env::args().skip(1).collect();
  let command = parse_command(&args)?;
  let use_case = build_use_case(&config)?;

  match use_case.execute(command).await {
    Ok(response) => {
      println!("{}", serde_json::to_string_pretty(&response)?);
      Ok(ExitCode::SUCCESS)
    }
    Err(WithdrawCashError::Withdrawal(error)) => {
      eprintln!("{}: {}", error.kind().as_str(), error);
      Ok(ExitCode::from(2))
    }
    Err(error) => {
      eprintln!("invalid request: {}", error);
      Ok(ExitCode::from(64))
    }
  }
}
