//! Banknote decomposition
//!
//! Turns a whole amount into the notes to dispense, largest face value first.
//! Every catalog in [`Currency::banknotes`] is canonical, so greedy selection
//! finds an exact decomposition whenever one exists. When the depot stock is
//! taken into account greedy is no longer enough (a missing 50 can make 60 look
//! impossible while three 20s would do), so the stock-bounded variant falls
//! back to smaller notes by backtracking.

use std::collections::{HashMap, HashSet};

use super::errors::WrongMoneyAmountError;
use super::value_objects::{Banknote, Currency};

/// Banknote counts available at the start of a withdrawal
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockSnapshot {
  counts: HashMap<Banknote, u32>,
}

impl StockSnapshot {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with(mut self, banknote: Banknote, count: u32) -> Self {
    self.set(banknote, count);
    self
  }

  pub fn set(&mut self, banknote: Banknote, count: u32) {
    self.counts.insert(banknote, count);
  }

  pub fn count(&self, banknote: Banknote) -> u32 {
    self.counts.get(&banknote).copied().unwrap_or(0)
  }
}

impl FromIterator<(Banknote, u32)> for StockSnapshot {
  fn from_iter<I: IntoIterator<Item = (Banknote, u32)>>(iter: I) -> Self {
    Self {
      counts: iter.into_iter().collect(),
    }
  }
}

/// Most notes the dispenser hands out in a single payout
pub const MAX_NOTES_PER_PAYOUT: u64 = 200;

/// Pure decomposition of amounts into banknotes
pub struct DenominationResolver;

impl DenominationResolver {
  /// Greedy decomposition with unlimited notes
  ///
  /// # Errors
  /// Returns `WrongMoneyAmountError::NotRepresentable` when the catalog cannot
  /// sum exactly to `amount`, `WrongMoneyAmountError::TooManyNotes` when the
  /// payout would exceed [`MAX_NOTES_PER_PAYOUT`]
  pub fn resolve(amount: u64, currency: Currency) -> Result<Vec<Banknote>, WrongMoneyAmountError> {
    let counts = Self::greedy_counts(amount, currency)?;
    Self::expand(amount, currency, &counts)
  }

  /// Decomposition bounded by the notes in `stock`
  ///
  /// Prefers as many large notes as possible and falls back to smaller ones
  /// when a larger choice cannot be completed from stock.
  ///
  /// # Errors
  /// Returns `WrongMoneyAmountError::NotRepresentable` if the amount is not
  /// payable even with unlimited notes, `WrongMoneyAmountError::TooManyNotes`
  /// if the chosen notes exceed [`MAX_NOTES_PER_PAYOUT`],
  /// `WrongMoneyAmountError::InsufficientStock` if it is payable but not from
  /// the given stock
  pub fn resolve_with_stock(
    amount: u64,
    currency: Currency,
    stock: &StockSnapshot,
  ) -> Result<Vec<Banknote>, WrongMoneyAmountError> {
    // Greedy gives the fewest notes, so it also settles the note limit early
    let fewest = Self::greedy_counts(amount, currency)?;
    Self::check_note_limit(amount, currency, &fewest)?;

    let catalog = currency.banknotes();
    let available: Vec<u64> = catalog
      .iter()
      .map(|note| u64::from(stock.count(*note)))
      .collect();

    // capacity[i] = total value of stock from catalog[i] downwards
    let mut capacity = vec![0u64; catalog.len() + 1];
    for index in (0..catalog.len()).rev() {
      capacity[index] = capacity[index + 1]
        .saturating_add(available[index].saturating_mul(catalog[index].face_value()));
    }

    let mut search = BoundedSearch {
      catalog,
      available: &available,
      capacity: &capacity,
      counts: vec![0; catalog.len()],
      dead_ends: HashSet::new(),
    };

    if !search.run(0, amount) {
      return Err(WrongMoneyAmountError::InsufficientStock { amount, currency });
    }

    Self::expand(amount, currency, &search.counts)
  }

  /// Whether unlimited notes of the catalog can sum exactly to `amount`
  pub fn is_representable(amount: u64, currency: Currency) -> bool {
    let remaining = currency
      .banknotes()
      .iter()
      .fold(amount, |remaining, note| remaining % note.face_value());
    remaining == 0
  }

  /// Notes of each catalog entry taken by greedy selection
  fn greedy_counts(amount: u64, currency: Currency) -> Result<Vec<u64>, WrongMoneyAmountError> {
    let mut remaining = amount;
    let mut counts = Vec::with_capacity(currency.banknotes().len());

    for note in currency.banknotes() {
      let face_value = note.face_value();
      let count = remaining / face_value;
      counts.push(count);
      remaining -= face_value * count;
    }

    if remaining != 0 {
      return Err(WrongMoneyAmountError::NotRepresentable { amount, currency });
    }

    Ok(counts)
  }

  fn check_note_limit(
    amount: u64,
    currency: Currency,
    counts: &[u64],
  ) -> Result<u64, WrongMoneyAmountError> {
    let total = counts
      .iter()
      .fold(0u64, |total, count| total.saturating_add(*count));

    if total > MAX_NOTES_PER_PAYOUT {
      return Err(WrongMoneyAmountError::TooManyNotes {
        amount,
        currency,
        limit: MAX_NOTES_PER_PAYOUT,
      });
    }

    Ok(total)
  }

  /// Lists `counts[i]` copies of the i-th catalog note, largest first
  fn expand(
    amount: u64,
    currency: Currency,
    counts: &[u64],
  ) -> Result<Vec<Banknote>, WrongMoneyAmountError> {
    let total = Self::check_note_limit(amount, currency, counts)?;

    let mut notes = Vec::with_capacity(total as usize);
    for (note, count) in currency.banknotes().iter().zip(counts) {
      notes.extend(std::iter::repeat_n(*note, *count as usize));
    }
    Ok(notes)
  }
}

struct BoundedSearch<'a> {
  catalog: &'a [Banknote],
  available: &'a [u64],
  capacity: &'a [u64],
  counts: Vec<u64>,
  dead_ends: HashSet<(usize, u64)>,
}

impl BoundedSearch<'_> {
  fn run(&mut self, index: usize, remaining: u64) -> bool {
    if remaining == 0 {
      return true;
    }
    if index == self.catalog.len() || remaining > self.capacity[index] {
      return false;
    }
    if self.dead_ends.contains(&(index, remaining)) {
      return false;
    }

    let face_value = self.catalog[index].face_value();
    let most = (remaining / face_value).min(self.available[index]);

    for count in (0..=most).rev() {
      self.counts[index] = count;
      if self.run(index + 1, remaining - face_value * count) {
        return true;
      }
    }

    self.counts[index] = 0;
    self.dead_ends.insert((index, remaining));
    false
  }
}
