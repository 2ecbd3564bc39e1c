pub mod aggregator;
pub mod bot;
pub mod config;
pub mod error;
pub mod marketplace;
pub mod order;
pub mod portfolio;
pub mod scheduler;
pub mod telegram;
pub mod ticker;
pub mod utils;

pub use aggregator::compute_balance_report;
pub use error::BalanceError;
