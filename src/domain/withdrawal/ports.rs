use async_trait::async_trait;

use super::errors::{AuthorizationError, DepotError, LedgerError};
use super::value_objects::{AuthenticationToken, Banknote, Card, Money};

/// Card issuer backend that checks a card and PIN
#[async_trait]
pub trait CardProvider: Send + Sync {
  /// Authorizes the card, returning a token accepted by the ledger
  async fn authorize(&self, card: &Card) -> Result<AuthenticationToken, AuthorizationError>;
}

/// Core-banking ledger holding cardholder accounts
#[async_trait]
pub trait BankLedger: Send + Sync {
  /// Debits the account identified by the token
  async fn charge(&self, token: AuthenticationToken, money: &Money) -> Result<(), LedgerError>;
}

/// Physical banknote stock of the machine
#[async_trait]
pub trait MoneyDepot: Send + Sync {
  /// Number of notes of the given kind currently loaded
  async fn available_count(&self, banknote: Banknote) -> Result<u32, DepotError>;

  /// Takes `count` notes out of stock. Returns false when stock is short
  /// and nothing was taken.
  async fn reserve(&self, banknote: Banknote, count: u32) -> Result<bool, DepotError>;
}
