use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use crate::marketplace::binance::Binance;
use crate::marketplace::MarketplaceExchangeInfoApi;
use crate::ticker::Ticker;

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeInfo {
    pub symbols: Vec<SymbolInfo>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SymbolInfo {
    pub symbol: String,
    pub base_asset: String,
    pub quote_asset: String,
}

impl From<&SymbolInfo> for Ticker {
    fn from(info: &SymbolInfo) -> Self {
        Ticker::new(&info.base_asset, &info.quote_asset)
    }
}

impl Binance {
    pub async fn get_exchange_info(&self, symbol: &str) -> Result<ExchangeInfo> {
        let info: ExchangeInfo = self
            .public_get("/api/v3/exchangeInfo", &[("symbol", symbol)])
            .await?;

        debug!("{} exchange info : {:?}", symbol, info.symbols);

        Ok(info)
    }
}

impl MarketplaceExchangeInfoApi for Binance {
    async fn get_ticker_info(&self, symbol: &str) -> Result<Ticker> {
        let info = self.get_exchange_info(symbol).await?;
        let info = info
            .symbols
            .iter()
            .find(|info| info.symbol == symbol)
            .context("Symbol info not found")?;
        Ok(Ticker::from(info))
    }
}
