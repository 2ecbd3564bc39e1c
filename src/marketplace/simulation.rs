use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use rust_decimal::Decimal;

use crate::order::OpenOrder;
use crate::portfolio::{AssetHolding, SupplementalPosition};
use crate::ticker::Ticker;

use super::{
    MarketplaceAccountApi, MarketplaceDataApi, MarketplaceExchangeInfoApi, MarketplaceTradeApi,
};

/// In-memory marketplace answering from fixtures and recording every query.
#[derive(Debug, Default)]
pub struct SimulationMarketplace {
    pub balances: HashMap<String, AssetHolding>,
    pub prices: HashMap<String, Decimal>,
    pub savings: HashMap<String, Decimal>,
    pub orders: Vec<OpenOrder>,
    pub tickers: HashMap<String, Ticker>,
    pub failing_symbols: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl SimulationMarketplace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_balance(mut self, asset: &str, free: Decimal, locked: Decimal) -> Self {
        self.balances.insert(
            asset.to_string(),
            AssetHolding {
                asset: asset.to_string(),
                free,
                locked,
            },
        );
        self
    }

    pub fn with_price(mut self, symbol: &str, price: Decimal) -> Self {
        self.prices.insert(symbol.to_string(), price);
        self
    }

    pub fn with_savings(mut self, asset: &str, free_amount: Decimal) -> Self {
        self.savings.insert(asset.to_string(), free_amount);
        self
    }

    pub fn with_order(mut self, symbol: &str, client_order_id: &str) -> Self {
        self.orders.push(OpenOrder {
            symbol: symbol.to_string(),
            marketplace_id: format!("{}", self.orders.len() + 1),
            client_order_id: client_order_id.to_string(),
            side: "BUY".to_string(),
            price: Decimal::ONE,
            amount: Decimal::ONE,
        });
        self
    }

    pub fn with_ticker(mut self, base: &str, quote: &str) -> Self {
        let ticker = Ticker::new(base, quote);
        self.tickers.insert(ticker.to_string(), ticker);
        self
    }

    pub fn with_failing_price(mut self, symbol: &str) -> Self {
        self.failing_symbols.insert(symbol.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl MarketplaceTradeApi for SimulationMarketplace {
    async fn get_open_orders(&self) -> Result<Vec<OpenOrder>> {
        self.record("openOrders".to_string());
        Ok(self.orders.clone())
    }
}

impl MarketplaceExchangeInfoApi for SimulationMarketplace {
    async fn get_ticker_info(&self, symbol: &str) -> Result<Ticker> {
        self.record(format!("exchangeInfo:{symbol}"));
        self.tickers
            .get(symbol)
            .cloned()
            .ok_or_else(|| anyhow!("Unknown symbol {symbol}"))
    }
}

impl MarketplaceAccountApi for SimulationMarketplace {
    async fn get_asset_balance(&self, asset: &str) -> Result<AssetHolding> {
        self.record(format!("balance:{asset}"));
        Ok(self
            .balances
            .get(asset)
            .cloned()
            .unwrap_or_else(|| AssetHolding::empty(asset)))
    }

    async fn get_savings_position(&self, asset: &str) -> Result<Option<SupplementalPosition>> {
        self.record(format!("savings:{asset}"));
        Ok(self
            .savings
            .get(asset)
            .map(|free_amount| SupplementalPosition {
                asset: asset.to_string(),
                free_amount: *free_amount,
            }))
    }
}

impl MarketplaceDataApi for SimulationMarketplace {
    async fn get_average_price(&self, ticker: &Ticker) -> Result<Decimal> {
        let symbol = ticker.to_string();
        self.record(format!("avgPrice:{symbol}"));
        if self.failing_symbols.contains(&symbol) {
            return Err(anyhow!("Connection reset while fetching {symbol}"));
        }
        self.prices
            .get(&symbol)
            .copied()
            .ok_or_else(|| anyhow!("Invalid symbol {symbol}"))
    }
}
