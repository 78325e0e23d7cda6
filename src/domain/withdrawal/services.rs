use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

use super::denomination::{DenominationResolver, StockSnapshot};
use super::errors::{AtmError, WithdrawalError, WrongMoneyAmountError};
use super::ports::{BankLedger, CardProvider, MoneyDepot};
use super::value_objects::{Banknote, Card, Currency, Money, Payment};

/// Withdrawal service sequencing authorization, charge and cash decomposition
pub struct WithdrawalService {
  card_provider: Arc<dyn CardProvider>,
  bank_ledger: Arc<dyn BankLedger>,
  money_depot: Option<Arc<dyn MoneyDepot>>,
}

impl WithdrawalService {
  /// Creates a service that pays out with an unlimited note supply
  pub fn new(card_provider: Arc<dyn CardProvider>, bank_ledger: Arc<dyn BankLedger>) -> Self {
    Self {
      card_provider,
      bank_ledger,
      money_depot: None,
    }
  }

  /// Bounds every payout by the stock of `money_depot` and reserves the
  /// dispensed notes from it
  pub fn with_money_depot(mut self, money_depot: Arc<dyn MoneyDepot>) -> Self {
    self.money_depot = Some(money_depot);
    self
  }

  /// Withdraws `money` from the account behind `card`
  ///
  /// Steps run strictly in order: authorize the card, charge the account,
  /// decompose the amount into notes (and reserve them when a depot is
  /// attached). Each external port is called at most once.
  ///
  /// # Returns
  /// The `Payment` to dispense, largest notes first
  ///
  /// # Errors
  /// Returns `WithdrawalError::Atm` when authorization or the charge fails,
  /// `WithdrawalError::WrongMoneyAmount` when the amount cannot be paid out.
  /// A charge that succeeded before the payout failed is not refunded.
  pub async fn withdraw(&self, money: Money, card: Card) -> Result<Payment, WithdrawalError> {
    self.withdraw_with_id(Uuid::new_v4(), money, card).await
  }

  /// Same as [`WithdrawalService::withdraw`], logged under a caller-chosen
  /// `withdrawal_id` so the caller can match its records to the log
  pub async fn withdraw_with_id(
    &self,
    withdrawal_id: Uuid,
    money: Money,
    card: Card,
  ) -> Result<Payment, WithdrawalError> {
    let span = tracing::info_span!(
      "withdraw",
      %withdrawal_id,
      amount = money.amount(),
      currency = %money.currency(),
      card = %card.fingerprint(),
    );

    let result = self
      .withdraw_inner(money, card)
      .instrument(span.clone())
      .await;

    span.in_scope(|| match &result {
      Ok(payment) => tracing::info!(notes = payment.notes().len(), "Withdrawal completed"),
      Err(error) => tracing::warn!(kind = error.kind().as_str(), %error, "Withdrawal failed"),
    });

    result
  }

  async fn withdraw_inner(&self, money: Money, card: Card) -> Result<Payment, WithdrawalError> {
    let token = self
      .card_provider
      .authorize(&card)
      .await
      .map_err(AtmError::from)?;
    tracing::debug!("Card authorized");

    self
      .bank_ledger
      .charge(token, &money)
      .await
      .map_err(AtmError::from)?;
    tracing::debug!("Account charged");

    let notes = match self.dispense(&money).await {
      Ok(notes) => notes,
      Err(error) => {
        // The ledger has no refund operation; the debit must be reconciled outside
        tracing::error!(%error, "Account charged but cash could not be dispensed");
        return Err(error);
      }
    };

    Ok(Payment::new(notes))
  }

  async fn dispense(&self, money: &Money) -> Result<Vec<Banknote>, WithdrawalError> {
    let Some(depot) = &self.money_depot else {
      return Ok(DenominationResolver::resolve(
        money.amount(),
        money.currency(),
      )?);
    };

    // Unpayable amounts never reach the depot
    if !DenominationResolver::is_representable(money.amount(), money.currency()) {
      return Err(
        WrongMoneyAmountError::NotRepresentable {
          amount: money.amount(),
          currency: money.currency(),
        }
        .into(),
      );
    }

    let stock = self.snapshot(depot.as_ref(), money.currency()).await?;
    let notes = DenominationResolver::resolve_with_stock(money.amount(), money.currency(), &stock)?;
    let payment = Payment::new(notes);

    let mut reserved: Vec<(Banknote, u32)> = Vec::new();
    for (banknote, count) in payment.count_by_banknote().into_iter().rev() {
      let accepted = depot.reserve(banknote, count).await.map_err(AtmError::from)?;
      if !accepted {
        // The depot has no release operation; notes reserved so far stay out of stock
        tracing::error!(
          %banknote,
          count,
          already_reserved = ?reserved,
          "Depot refused reservation"
        );
        return Err(
          WrongMoneyAmountError::InsufficientStock {
            amount: money.amount(),
            currency: money.currency(),
          }
          .into(),
        );
      }
      reserved.push((banknote, count));
    }

    Ok(payment.into_notes())
  }

  async fn snapshot(
    &self,
    depot: &dyn MoneyDepot,
    currency: Currency,
  ) -> Result<StockSnapshot, AtmError> {
    let mut stock = StockSnapshot::new();
    for banknote in currency.banknotes() {
      stock.set(*banknote, depot.available_count(*banknote).await?);
    }
    Ok(stock)
  }
}
