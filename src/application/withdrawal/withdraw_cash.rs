use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

use crate::domain::withdrawal::errors::WithdrawalError;
use crate::domain::withdrawal::services::WithdrawalService;
use crate::domain::withdrawal::value_objects::{Banknote, Card, Currency, Money, ValueObjectError};

/// Command for withdrawing cash with a card
#[derive(Clone, Validate)]
pub struct WithdrawCashCommand {
  /// Requested amount in whole currency units
  #[validate(range(min = 1, message = "Amount must be at least 1"))]
  pub amount: u64,
  /// Currency code, e.g. "PL"
  #[validate(length(min = 2, max = 3, message = "Currency code must be 2 or 3 letters"))]
  pub currency: String,
  /// Card number as read from the card
  #[validate(length(min = 1, max = 19, message = "Card number must be 1 to 19 digits"))]
  pub card_number: String,
  /// PIN entered by the cardholder
  pub pin: u32,
}

// Keep card data out of logs
impl fmt::Debug for WithdrawCashCommand {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("WithdrawCashCommand")
      .field("amount", &self.amount)
      .field("currency", &self.currency)
      .field("card_number", &"***")
      .field("pin", &"***")
      .finish()
  }
}

/// Response after a successful withdrawal
#[derive(Debug, Clone, Serialize)]
pub struct WithdrawCashResponse {
  /// Identifier the withdrawal was logged under
  pub withdrawal_id: Uuid,
  /// Amount paid out
  pub amount: u64,
  /// Currency of the notes
  pub currency: Currency,
  /// Notes in dispensing order
  pub notes: Vec<Banknote>,
  /// When the payout was decided
  pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum WithdrawCashError {
  #[error("Validation error: {0}")]
  Validation(String),

  #[error("Value object error: {0}")]
  ValueObject(#[from] ValueObjectError),

  #[error(transparent)]
  Withdrawal(#[from] WithdrawalError),
}

impl From<validator::ValidationErrors> for WithdrawCashError {
  fn from(errors: validator::ValidationErrors) -> Self {
    let mut messages: Vec<String> = errors
      .field_errors()
      .iter()
      .flat_map(|(field, errors)| {
        errors
          .iter()
          .map(|error| {
            error
              .message
              .as_ref()
              .map(|m| m.to_string())
              .unwrap_or_else(|| format!("Invalid field: {}", field))
          })
          .collect::<Vec<_>>()
      })
      .collect();
    messages.sort();

    WithdrawCashError::Validation(messages.join(", "))
  }
}

/// Use case for withdrawing cash
pub struct WithdrawCashUseCase {
  withdrawal_service: Arc<WithdrawalService>,
}

impl WithdrawCashUseCase {
  /// Creates a new instance of WithdrawCashUseCase
  pub fn new(withdrawal_service: Arc<WithdrawalService>) -> Self {
    Self { withdrawal_service }
  }

  /// Executes the cash withdrawal use case
  ///
  /// # Arguments
  /// * `command` - Raw withdrawal request
  ///
  /// # Returns
  /// A `WithdrawCashResponse` listing the notes to dispense
  ///
  /// # Errors
  /// Returns `WithdrawCashError::Validation` or `WithdrawCashError::ValueObject`
  /// for malformed input, `WithdrawCashError::Withdrawal` when the withdrawal
  /// itself is refused
  pub async fn execute(
    &self,
    command: WithdrawCashCommand,
  ) -> Result<WithdrawCashResponse, WithdrawCashError> {
    command.validate()?;

    let currency = Currency::from_str(&command.currency)?;
    let money = Money::new(command.amount, currency)?;
    let card = Card::new(command.card_number, command.pin)?;

    let withdrawal_id = Uuid::new_v4();
    let payment = self
      .withdrawal_service
      .withdraw_with_id(withdrawal_id, money, card)
      .await?;

    Ok(WithdrawCashResponse {
      withdrawal_id,
      amount: payment.total(),
      currency,
      notes: payment.into_notes(),
      completed_at: Utc::now(),
    })
  }
}
