use anyhow::Result;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use crate::marketplace::binance::Binance;
use crate::marketplace::MarketplaceDataApi;
use crate::ticker::Ticker;

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AveragePrice {
    pub mins: u64,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
}

impl MarketplaceDataApi for Binance {
    async fn get_average_price(&self, ticker: &Ticker) -> Result<Decimal> {
        let symbol = ticker.to_string();
        let avg: AveragePrice = self
            .public_get("/api/v3/avgPrice", &[("symbol", symbol.as_str())])
            .await?;

        debug!("{} average price over {}m : {}", symbol, avg.mins, avg.price);

        Ok(avg.price)
    }
}
