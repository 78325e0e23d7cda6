use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::domain::withdrawal::errors::AuthorizationError;
use crate::domain::withdrawal::ports::CardProvider;
use crate::domain::withdrawal::value_objects::{AuthenticationToken, Card, Pin, ValueObjectError};
use crate::infrastructure::config::CardConfig;

struct Cardholder {
  pin: Pin,
  user_id: String,
}

/// Card provider backed by a fixed table of cards
pub struct InMemoryCardProvider {
  cards: HashMap<String, Cardholder>,
  next_authorization_code: AtomicI64,
}

impl InMemoryCardProvider {
  pub fn new() -> Self {
    Self {
      cards: HashMap::new(),
      next_authorization_code: AtomicI64::new(1),
    }
  }

  /// Builds the provider from configured cards
  pub fn from_config(cards: &[CardConfig]) -> Result<Self, ValueObjectError> {
    let mut provider = Self::new();
    for entry in cards {
      let card = Card::new(entry.number.clone(), entry.pin)?;
      provider.register(&card, entry.user_id.clone());
    }
    Ok(provider)
  }

  /// Adds or replaces a card
  pub fn register(&mut self, card: &Card, user_id: impl Into<String>) {
    self.cards.insert(
      card.number().to_string(),
      Cardholder {
        pin: card.pin().clone(),
        user_id: user_id.into(),
      },
    );
  }
}

impl Default for InMemoryCardProvider {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl CardProvider for InMemoryCardProvider {
  async fn authorize(&self, card: &Card) -> Result<AuthenticationToken, AuthorizationError> {
    let holder = self
      .cards
      .get(card.number())
      .ok_or(AuthorizationError::UnknownCard)?;

    if !holder.pin.matches(card.pin()) {
      tracing::debug!(card = %card.fingerprint(), "PIN mismatch");
      return Err(AuthorizationError::InvalidCredentials);
    }

    let code = self.next_authorization_code.fetch_add(1, Ordering::SeqCst);
    Ok(AuthenticationToken::new(code, holder.user_id.clone()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn provider() -> InMemoryCardProvider {
    let mut provider = InMemoryCardProvider::new();
    provider.register(&Card::new("123", 123).unwrap(), "1");
    provider
  }

  #[tokio::test]
  async fn test_authorize_issues_fresh_codes() {
    let provider = provider();
    let card = Card::new("123", 123).unwrap();

    let first = provider.authorize(&card).await.unwrap();
    let second = provider.authorize(&card).await.unwrap();

    assert_eq!(first.user_id(), "1");
    assert_ne!(first.authorization_code(), second.authorization_code());
  }

  #[tokio::test]
  async fn test_wrong_pin_is_rejected() {
    let result = provider().authorize(&Card::new("123", 321).unwrap()).await;
    assert_eq!(result, Err(AuthorizationError::InvalidCredentials));
  }

  #[tokio::test]
  async fn test_unknown_card_is_rejected() {
    let result = provider().authorize(&Card::new("999", 123).unwrap()).await;
    assert_eq!(result, Err(AuthorizationError::UnknownCard));
  }

  #[test]
  fn test_from_config_validates_numbers() {
    let cards = vec![CardConfig {
      number: "not-a-number".to_string(),
      pin: 1,
      user_id: "1".to_string(),
    }];

    assert!(InMemoryCardProvider::from_config(&cards).is_err());
  }
}
