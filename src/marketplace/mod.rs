use anyhow::Result;
use rust_decimal::Decimal;

use crate::order::OpenOrder;
use crate::portfolio::{AssetHolding, SupplementalPosition};
use crate::ticker::Ticker;

pub mod binance;
#[cfg(test)]
pub mod simulation;

pub trait MarketplaceTradeApi {
    async fn get_open_orders(&self) -> Result<Vec<OpenOrder>>;
}

pub trait MarketplaceExchangeInfoApi {
    /// Resolves a symbol such as `BTCUSDT` into its base and quote assets.
    async fn get_ticker_info(&self, symbol: &str) -> Result<Ticker>;
}

pub trait MarketplaceAccountApi {
    async fn get_asset_balance(&self, asset: &str) -> Result<AssetHolding>;
    async fn get_savings_position(&self, asset: &str) -> Result<Option<SupplementalPosition>>;
}

pub trait MarketplaceDataApi {
    async fn get_average_price(&self, ticker: &Ticker) -> Result<Decimal>;
}

/// Read-only queries needed to value an account.
pub trait Marketplace:
    MarketplaceTradeApi + MarketplaceExchangeInfoApi + MarketplaceAccountApi + MarketplaceDataApi
{
}

impl<T> Marketplace for T where
    T: MarketplaceTradeApi
        + MarketplaceExchangeInfoApi
        + MarketplaceAccountApi
        + MarketplaceDataApi
{
}
