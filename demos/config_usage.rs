//! Example demonstrating how to load and use configuration
//!
//! Run with: cargo run --example config_usage
//!
//! To override configuration with environment variables:
//! ```bash
//! CASHPOINT_ATM__ID=atm-042 \
//! CASHPOINT_ATM__INVENTORY_AWARE=false \
//! cargo run --example config_usage
//! ```

use cashpoint::infrastructure::config::Config;

fn main() {
  match Config::load() {
    Ok(config) => {
      println!("Configuration loaded successfully!");
      println!();
      println!("ATM:");
      println!("  Id: {}", config.atm.id);
      println!("  Inventory aware: {}", config.atm.inventory_aware);
      println!();
      println!("Logging:");
      println!("  Filter: {}", config.logging.filter);
      println!();
      println!("Cards: {}", config.cards.len());
      println!();
      println!("Accounts:");
      for account in &config.accounts {
        println!(
          "  {}: {} {}",
          account.user_id, account.balance, account.currency
        );
      }
      println!();
      println!("Depot:");
      for slot in &config.depot {
        println!(
          "  {} x {} {}",
          slot.count, slot.face_value, slot.currency
        );
      }
    }
    Err(e) => {
      eprintln!("Failed to load configuration: {}", e);
      std::process::exit(1);
    }
  }
}
