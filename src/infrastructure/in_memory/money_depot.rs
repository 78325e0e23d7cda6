use async_trait::async_trait;
use std::collections::HashMap;
use std::str::FromStr;
use tokio::sync::Mutex;

use crate::domain::withdrawal::errors::DepotError;
use crate::domain::withdrawal::ports::MoneyDepot;
use crate::domain::withdrawal::value_objects::{Banknote, Currency, ValueObjectError};
use crate::infrastructure::config::DepotSlotConfig;

/// Depot that decrements its stock on every accepted reservation
#[derive(Default)]
pub struct InMemoryMoneyDepot {
  stock: Mutex<HashMap<Banknote, u32>>,
}

impl InMemoryMoneyDepot {
  pub fn new() -> Self {
    Self::default()
  }

  /// Builds the depot from configured cassettes; repeated notes add up
  pub fn from_config(slots: &[DepotSlotConfig]) -> Result<Self, ValueObjectError> {
    let mut stock: HashMap<Banknote, u32> = HashMap::new();
    for slot in slots {
      let currency = Currency::from_str(&slot.currency)?;
      let banknote = Banknote::from_face_value(currency, slot.face_value)?;
      let count = stock.entry(banknote).or_insert(0);
      *count = count.saturating_add(slot.count);
    }

    Ok(Self {
      stock: Mutex::new(stock),
    })
  }

  /// Adds notes to the depot
  pub async fn load(&self, banknote: Banknote, count: u32) {
    let mut stock = self.stock.lock().await;
    let current = stock.entry(banknote).or_insert(0);
    *current = current.saturating_add(count);
  }
}

#[async_trait]
impl MoneyDepot for InMemoryMoneyDepot {
  async fn available_count(&self, banknote: Banknote) -> Result<u32, DepotError> {
    Ok(self.stock.lock().await.get(&banknote).copied().unwrap_or(0))
  }

  async fn reserve(&self, banknote: Banknote, count: u32) -> Result<bool, DepotError> {
    let mut stock = self.stock.lock().await;
    match stock.get_mut(&banknote) {
      Some(available) if *available >= count => {
        *available -= count;
        tracing::debug!(%banknote, count, remaining = *available, "Banknotes reserved");
        Ok(true)
      }
      _ => Ok(false),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_reserve_decrements_stock() {
    let depot = InMemoryMoneyDepot::new();
    depot.load(Banknote::PL100, 3).await;

    assert!(depot.reserve(Banknote::PL100, 2).await.unwrap());
    assert_eq!(depot.available_count(Banknote::PL100).await.unwrap(), 1);
  }

  #[tokio::test]
  async fn test_short_reservation_takes_nothing() {
    let depot = InMemoryMoneyDepot::new();
    depot.load(Banknote::PL50, 1).await;

    assert!(!depot.reserve(Banknote::PL50, 2).await.unwrap());
    assert!(!depot.reserve(Banknote::PL20, 1).await.unwrap());
    assert_eq!(depot.available_count(Banknote::PL50).await.unwrap(), 1);
  }

  #[tokio::test]
  async fn test_from_config_merges_cassettes() {
    let slots = vec![
      DepotSlotConfig {
        currency: "PL".to_string(),
        face_value: 100,
        count: 5,
      },
      DepotSlotConfig {
        currency: "PLN".to_string(),
        face_value: 100,
        count: 2,
      },
    ];

    let depot = InMemoryMoneyDepot::from_config(&slots).unwrap();
    assert_eq!(depot.available_count(Banknote::PL100).await.unwrap(), 7);
  }

  #[test]
  fn test_from_config_rejects_foreign_face_value() {
    let slots = vec![DepotSlotConfig {
      currency: "PL".to_string(),
      face_value: 5,
      count: 1,
    }];

    assert!(InMemoryMoneyDepot::from_config(&slots).is_err());
  }
}
