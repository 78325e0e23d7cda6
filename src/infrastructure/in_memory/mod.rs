mod bank_ledger;
mod card_provider;
mod money_depot;

pub use bank_ledger::{ChargeRecord, InMemoryBankLedger};
pub use card_provider::InMemoryCardProvider;
pub use money_depot::InMemoryMoneyDepot;
