use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
  #[error("Invalid amount: {0}")]
  InvalidAmount(String),

  #[error("Invalid currency code: {0}")]
  InvalidCurrency(String),

  #[error("Invalid card number")]
  InvalidCardNumber,

  #[error("Invalid banknote: {0}")]
  InvalidBanknote(String),
}

lazy_static! {
  static ref CARD_NUMBER_PATTERN: Regex = Regex::new(r"^[0-9]{1,19}$").expect("valid regex");
}

// ============================================================================
// Currency
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Currency {
  PL,
  EUR,
  USD,
}

impl Currency {
  pub const ALL: [Currency; 3] = [Currency::PL, Currency::EUR, Currency::USD];

  pub fn as_str(&self) -> &'static str {
    match self {
      Currency::PL => "PL",
      Currency::EUR => "EUR",
      Currency::USD => "USD",
    }
  }

  /// Banknote catalog of the currency, highest face value first
  pub fn banknotes(&self) -> &'static [Banknote] {
    match self {
      Currency::PL => &[
        Banknote::PL500,
        Banknote::PL200,
        Banknote::PL100,
        Banknote::PL50,
        Banknote::PL20,
        Banknote::PL10,
      ],
      Currency::EUR => &[
        Banknote::EUR500,
        Banknote::EUR200,
        Banknote::EUR100,
        Banknote::EUR50,
        Banknote::EUR20,
        Banknote::EUR10,
        Banknote::EUR5,
      ],
      Currency::USD => &[
        Banknote::USD100,
        Banknote::USD50,
        Banknote::USD20,
        Banknote::USD10,
        Banknote::USD5,
        Banknote::USD2,
        Banknote::USD1,
      ],
    }
  }

  /// Smallest face value the currency can dispense
  pub fn smallest_face_value(&self) -> u64 {
    self
      .banknotes()
      .last()
      .map(Banknote::face_value)
      .unwrap_or(0)
  }
}

impl fmt::Display for Currency {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Currency {
  type Err = ValueObjectError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_uppercase().as_str() {
      "PL" | "PLN" => Ok(Currency::PL),
      "EUR" => Ok(Currency::EUR),
      "USD" => Ok(Currency::USD),
      _ => Err(ValueObjectError::InvalidCurrency(format!(
        "Unsupported currency: {}",
        s
      ))),
    }
  }
}

// ============================================================================
// Money
// ============================================================================

/// Whole-unit amount in a single currency. The amount is always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Money {
  amount: u64,
  currency: Currency,
}

impl Money {
  pub fn new(amount: u64, currency: Currency) -> Result<Self, ValueObjectError> {
    if amount == 0 {
      return Err(ValueObjectError::InvalidAmount(
        "Amount must be greater than zero".to_string(),
      ));
    }
    Ok(Self { amount, currency })
  }

  pub fn amount(&self) -> u64 {
    self.amount
  }

  pub fn currency(&self) -> Currency {
    self.currency
  }
}

impl fmt::Display for Money {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} {}", self.amount, self.currency)
  }
}

// ============================================================================
// Card (Never Logged)
// ============================================================================

/// Card PIN. Redacted from debug output and wiped on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Pin(u32);

impl Pin {
  pub fn new(pin: u32) -> Self {
    Self(pin)
  }

  /// Compares against a stored PIN without exposing the value
  pub fn matches(&self, other: &Pin) -> bool {
    self.0 == other.0
  }
}

impl fmt::Debug for Pin {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("Pin(****)")
  }
}

#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Card {
  number: String,
  pin: Pin,
}

impl Card {
  /// Creates a card after checking the number is 1 to 19 digits
  pub fn new(number: impl Into<String>, pin: u32) -> Result<Self, ValueObjectError> {
    let number = number.into();

    if !CARD_NUMBER_PATTERN.is_match(&number) {
      return Err(ValueObjectError::InvalidCardNumber);
    }

    Ok(Self {
      number,
      pin: Pin::new(pin),
    })
  }

  pub fn number(&self) -> &str {
    &self.number
  }

  pub fn pin(&self) -> &Pin {
    &self.pin
  }

  /// Stable, non-reversible identifier safe to put in logs
  pub fn fingerprint(&self) -> String {
    use sha2::{Digest, Sha256};

    let digest = Sha256::digest(self.number.as_bytes());
    let mut encoded = hex::encode(digest);
    encoded.truncate(12);
    encoded
  }
}

impl fmt::Debug for Card {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Card")
      .field("fingerprint", &self.fingerprint())
      .field("pin", &self.pin)
      .finish()
  }
}

// ============================================================================
// AuthenticationToken
// ============================================================================

/// Proof that a card passed authorization. Moved into the ledger on charge.
#[derive(Debug, PartialEq, Eq)]
pub struct AuthenticationToken {
  authorization_code: i64,
  user_id: String,
}

impl AuthenticationToken {
  pub fn new(authorization_code: i64, user_id: impl Into<String>) -> Self {
    Self {
      authorization_code,
      user_id: user_id.into(),
    }
  }

  pub fn authorization_code(&self) -> i64 {
    self.authorization_code
  }

  pub fn user_id(&self) -> &str {
    &self.user_id
  }
}

// ============================================================================
// Banknote
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Banknote {
  PL10,
  PL20,
  PL50,
  PL100,
  PL200,
  PL500,
  EUR5,
  EUR10,
  EUR20,
  EUR50,
  EUR100,
  EUR200,
  EUR500,
  USD1,
  USD2,
  USD5,
  USD10,
  USD20,
  USD50,
  USD100,
}

impl Banknote {
  pub fn face_value(&self) -> u64 {
    match self {
      Banknote::USD1 => 1,
      Banknote::USD2 => 2,
      Banknote::EUR5 | Banknote::USD5 => 5,
      Banknote::PL10 | Banknote::EUR10 | Banknote::USD10 => 10,
      Banknote::PL20 | Banknote::EUR20 | Banknote::USD20 => 20,
      Banknote::PL50 | Banknote::EUR50 | Banknote::USD50 => 50,
      Banknote::PL100 | Banknote::EUR100 | Banknote::USD100 => 100,
      Banknote::PL200 | Banknote::EUR200 => 200,
      Banknote::PL500 | Banknote::EUR500 => 500,
    }
  }

  pub fn currency(&self) -> Currency {
    match self {
      Banknote::PL10
      | Banknote::PL20
      | Banknote::PL50
      | Banknote::PL100
      | Banknote::PL200
      | Banknote::PL500 => Currency::PL,
      Banknote::EUR5
      | Banknote::EUR10
      | Banknote::EUR20
      | Banknote::EUR50
      | Banknote::EUR100
      | Banknote::EUR200
      | Banknote::EUR500 => Currency::EUR,
      Banknote::USD1
      | Banknote::USD2
      | Banknote::USD5
      | Banknote::USD10
      | Banknote::USD20
      | Banknote::USD50
      | Banknote::USD100 => Currency::USD,
    }
  }

  /// Looks up the note of `currency` with the given face value
  pub fn from_face_value(currency: Currency, face_value: u64) -> Result<Self, ValueObjectError> {
    currency
      .banknotes()
      .iter()
      .copied()
      .find(|note| note.face_value() == face_value)
      .ok_or_else(|| {
        ValueObjectError::InvalidBanknote(format!("{} has no {} note", currency, face_value))
      })
  }
}

impl fmt::Display for Banknote {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}{}", self.currency(), self.face_value())
  }
}

// ============================================================================
// Payment
// ============================================================================

/// Notes handed out for one withdrawal, in dispensing order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payment {
  notes: Vec<Banknote>,
}

impl Payment {
  pub fn new(notes: Vec<Banknote>) -> Self {
    Self { notes }
  }

  pub fn notes(&self) -> &[Banknote] {
    &self.notes
  }

  pub fn into_notes(self) -> Vec<Banknote> {
    self.notes
  }

  pub fn total(&self) -> u64 {
    self.notes.iter().map(Banknote::face_value).sum()
  }

  pub fn count_by_banknote(&self) -> BTreeMap<Banknote, u32> {
    let mut counts = BTreeMap::new();
    for note in &self.notes {
      *counts.entry(*note).or_insert(0) += 1;
    }
    counts
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_money_rejects_zero() {
    assert!(Money::new(100, Currency::PL).is_ok());
    assert!(matches!(
      Money::new(0, Currency::PL),
      Err(ValueObjectError::InvalidAmount(_))
    ));
  }

  #[test]
  fn test_currency_parsing() {
    assert_eq!(Currency::from_str("pl").unwrap(), Currency::PL);
    assert_eq!(Currency::from_str("PLN").unwrap(), Currency::PL);
    assert_eq!(Currency::from_str(" eur ").unwrap(), Currency::EUR);
    assert!(Currency::from_str("JPY").is_err());
  }

  #[test]
  fn test_catalogs_are_descending_and_single_currency() {
    for currency in Currency::ALL {
      let notes = currency.banknotes();
      assert!(notes.windows(2).all(|w| w[0].face_value() > w[1].face_value()));
      assert!(notes.iter().all(|n| n.currency() == currency));
    }
    assert_eq!(Currency::PL.smallest_face_value(), 10);
  }

  #[test]
  fn test_banknote_lookup() {
    assert_eq!(
      Banknote::from_face_value(Currency::PL, 100).unwrap(),
      Banknote::PL100
    );
    assert!(Banknote::from_face_value(Currency::PL, 5).is_err());
    assert_eq!(Banknote::EUR20.to_string(), "EUR20");
  }

  #[test]
  fn test_card_number_validation() {
    assert!(Card::new("123", 123).is_ok());
    assert!(Card::new("4111111111111111", 1234).is_ok());
    assert!(Card::new("", 1).is_err());
    assert!(Card::new("12ab", 1).is_err());
    assert!(Card::new("1".repeat(20), 1).is_err());
  }

  #[test]
  fn test_card_debug_hides_secrets() {
    let card = Card::new("4111111111111111", 4321).unwrap();
    let debug = format!("{:?}", card);

    assert!(!debug.contains("4111111111111111"));
    assert!(!debug.contains("4321"));
    assert!(debug.contains(&card.fingerprint()));
    assert_eq!(card.fingerprint().len(), 12);
  }

  #[test]
  fn test_pin_matching() {
    let card = Card::new("123", 123).unwrap();
    assert!(card.pin().matches(&Pin::new(123)));
    assert!(!card.pin().matches(&Pin::new(321)));
  }

  #[test]
  fn test_payment_totals() {
    let payment = Payment::new(vec![Banknote::PL100, Banknote::PL20, Banknote::PL20]);
    assert_eq!(payment.total(), 140);

    let counts = payment.count_by_banknote();
    assert_eq!(counts.get(&Banknote::PL20), Some(&2));
    assert_eq!(counts.get(&Banknote::PL100), Some(&1));
  }

  #[test]
  fn test_payment_order_matters_for_equality() {
    let a = Payment::new(vec![Banknote::PL100, Banknote::PL50]);
    let b = Payment::new(vec![Banknote::PL50, Banknote::PL100]);
    assert_ne!(a, b);
  }
}
