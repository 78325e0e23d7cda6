pub mod denomination;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

// Re-export commonly used types
pub use denomination::{DenominationResolver, StockSnapshot};
pub use errors::{
  AtmError, AuthorizationError, DepotError, LedgerError, WithdrawalError, WithdrawalErrorKind,
  WrongMoneyAmountError,
};
pub use ports::{BankLedger, CardProvider, MoneyDepot};
pub use services::WithdrawalService;
pub use value_objects::{
  AuthenticationToken, Banknote, Card, Currency, Money, Payment, Pin, ValueObjectError,
};
