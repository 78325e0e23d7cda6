use async_trait::async_trait;
use std::collections::HashMap;
use std::str::FromStr;
use tokio::sync::Mutex;

use crate::domain::withdrawal::errors::LedgerError;
use crate::domain::withdrawal::ports::BankLedger;
use crate::domain::withdrawal::value_objects::{
  AuthenticationToken, Currency, Money, ValueObjectError,
};
use crate::infrastructure::config::AccountConfig;

/// A debit accepted by the ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeRecord {
  pub authorization_code: i64,
  pub user_id: String,
  pub money: Money,
}

#[derive(Default)]
struct LedgerState {
  balances: HashMap<(String, Currency), u64>,
  charges: Vec<ChargeRecord>,
}

/// Ledger keeping one balance per user and currency
///
/// Balance check and debit happen under a single lock, so concurrent
/// withdrawals against one account never overdraw it.
#[derive(Default)]
pub struct InMemoryBankLedger {
  state: Mutex<LedgerState>,
}

impl InMemoryBankLedger {
  pub fn new() -> Self {
    Self::default()
  }

  /// Builds the ledger from configured accounts
  pub fn from_config(accounts: &[AccountConfig]) -> Result<Self, ValueObjectError> {
    let mut balances = HashMap::new();
    for account in accounts {
      let currency = Currency::from_str(&account.currency)?;
      balances.insert((account.user_id.clone(), currency), account.balance);
    }

    Ok(Self {
      state: Mutex::new(LedgerState {
        balances,
        charges: Vec::new(),
      }),
    })
  }

  /// Opens or overwrites an account balance
  pub async fn open_account(&self, user_id: impl Into<String>, currency: Currency, balance: u64) {
    let mut state = self.state.lock().await;
    state.balances.insert((user_id.into(), currency), balance);
  }

  pub async fn balance_of(&self, user_id: &str, currency: Currency) -> Option<u64> {
    let state = self.state.lock().await;
    state
      .balances
      .get(&(user_id.to_string(), currency))
      .copied()
  }

  /// All accepted charges, oldest first
  pub async fn charges(&self) -> Vec<ChargeRecord> {
    self.state.lock().await.charges.clone()
  }
}

#[async_trait]
impl BankLedger for InMemoryBankLedger {
  async fn charge(&self, token: AuthenticationToken, money: &Money) -> Result<(), LedgerError> {
    let mut state = self.state.lock().await;

    let balance = state
      .balances
      .get_mut(&(token.user_id().to_string(), money.currency()))
      .ok_or(LedgerError::UnknownAccount)?;

    if *balance < money.amount() {
      return Err(LedgerError::InsufficientFunds);
    }
    *balance -= money.amount();

    state.charges.push(ChargeRecord {
      authorization_code: token.authorization_code(),
      user_id: token.user_id().to_string(),
      money: *money,
    });
    Ok(())
  }
}
