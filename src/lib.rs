//! ATM cash withdrawal core
//!
//! A withdrawal authorizes the card, charges the cardholder's account and
//! decomposes the amount into banknotes. The external card issuer, bank
//! ledger and cash depot are reached through the ports in
//! [`domain::withdrawal::ports`].

pub mod application;
pub mod domain;
pub mod infrastructure;
