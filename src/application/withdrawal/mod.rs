//! Withdrawal use cases
//!
//! Turns raw cash requests into domain values and runs them through the
//! withdrawal service.

mod withdraw_cash;

pub use withdraw_cash::{
  WithdrawCashCommand, WithdrawCashError, WithdrawCashResponse, WithdrawCashUseCase,
};
