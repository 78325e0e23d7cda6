use thiserror::Error;

use super::value_objects::Currency;

/// Failure reported by the card authorization backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorizationError {
  #[error("Card number or PIN rejected")]
  InvalidCredentials,

  #[error("Card is not known to the issuer")]
  UnknownCard,

  #[error("Authorization backend unavailable: {0}")]
  Unavailable(String),
}

/// Failure reported by the core-banking ledger
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
  #[error("Insufficient funds")]
  InsufficientFunds,

  #[error("No account for the authorized user")]
  UnknownAccount,

  #[error("Ledger backend error: {0}")]
  Backend(String),
}

/// Failure reported by the cash depot
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DepotError {
  #[error("Cash depot unavailable: {0}")]
  Unavailable(String),
}

/// Withdrawal refused by the card issuer or the bank
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AtmError {
  #[error("Authorization failed: {0}")]
  AuthorizationFailure(#[from] AuthorizationError),

  #[error("Insufficient funds on the account")]
  InsufficientFunds,

  #[error("Backend error: {0}")]
  Backend(String),
}

impl From<LedgerError> for AtmError {
  fn from(error: LedgerError) -> Self {
    match error {
      LedgerError::InsufficientFunds => AtmError::InsufficientFunds,
      other => AtmError::Backend(other.to_string()),
    }
  }
}

impl From<DepotError> for AtmError {
  fn from(error: DepotError) -> Self {
    AtmError::Backend(error.to_string())
  }
}

/// The requested amount cannot be paid out in banknotes
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WrongMoneyAmountError {
  #[error("{amount} {currency} cannot be paid out with {currency} banknotes")]
  NotRepresentable { amount: u64, currency: Currency },

  #[error("Not enough banknotes in stock to pay out {amount} {currency}")]
  InsufficientStock { amount: u64, currency: Currency },

  #[error("{amount} {currency} needs more than {limit} banknotes")]
  TooManyNotes {
    amount: u64,
    currency: Currency,
    limit: u64,
  },
}

/// Discriminant of a failed withdrawal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WithdrawalErrorKind {
  AuthorizationFailure,
  InsufficientFunds,
  AmountNotRepresentable,
  BackendError,
}

impl WithdrawalErrorKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      WithdrawalErrorKind::AuthorizationFailure => "authorization_failure",
      WithdrawalErrorKind::InsufficientFunds => "insufficient_funds",
      WithdrawalErrorKind::AmountNotRepresentable => "amount_not_representable",
      WithdrawalErrorKind::BackendError => "backend_error",
    }
  }
}

/// Main withdrawal error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WithdrawalError {
  #[error(transparent)]
  Atm(#[from] AtmError),

  #[error(transparent)]
  WrongMoneyAmount(#[from] WrongMoneyAmountError),
}

impl WithdrawalError {
  pub fn kind(&self) -> WithdrawalErrorKind {
    match self {
      WithdrawalError::Atm(AtmError::AuthorizationFailure(_)) => {
        WithdrawalErrorKind::AuthorizationFailure
      }
      WithdrawalError::Atm(AtmError::InsufficientFunds) => WithdrawalErrorKind::InsufficientFunds,
      WithdrawalError::Atm(AtmError::Backend(_)) => WithdrawalErrorKind::BackendError,
      WithdrawalError::WrongMoneyAmount(_) => WithdrawalErrorKind::AmountNotRepresentable,
    }
  }

  pub fn is_atm_error(&self) -> bool {
    matches!(self, WithdrawalError::Atm(_))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_ledger_errors_map_to_atm_errors() {
    assert_eq!(
      AtmError::from(LedgerError::InsufficientFunds),
      AtmError::InsufficientFunds
    );
    assert!(matches!(
      AtmError::from(LedgerError::UnknownAccount),
      AtmError::Backend(_)
    ));
  }

  #[test]
  fn test_error_kinds() {
    let denied = WithdrawalError::from(AtmError::from(AuthorizationError::InvalidCredentials));
    assert_eq!(denied.kind(), WithdrawalErrorKind::AuthorizationFailure);
    assert!(denied.is_atm_error());

    let wrong_amount = WithdrawalError::from(WrongMoneyAmountError::NotRepresentable {
      amount: 1,
      currency: Currency::PL,
    });
    assert_eq!(wrong_amount.kind(), WithdrawalErrorKind::AmountNotRepresentable);
    assert!(!wrong_amount.is_atm_error());
    assert_eq!(
      wrong_amount.to_string(),
      "1 PL cannot be paid out with PL banknotes"
    );

    let too_many = WithdrawalError::from(WrongMoneyAmountError::TooManyNotes {
      amount: 1_000_000,
      currency: Currency::PL,
      limit: 200,
    });
    assert_eq!(too_many.kind(), WithdrawalErrorKind::AmountNotRepresentable);
  }
}
