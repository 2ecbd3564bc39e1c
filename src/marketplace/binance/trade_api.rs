use anyhow::Result;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use crate::marketplace::binance::Binance;
use crate::marketplace::MarketplaceTradeApi;
use crate::order::OpenOrder;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub symbol: String,
    pub order_id: u64,
    pub client_order_id: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub orig_qty: Decimal,
    pub side: String,
}

impl From<OrderResponse> for OpenOrder {
    fn from(value: OrderResponse) -> Self {
        OpenOrder {
            symbol: value.symbol,
            marketplace_id: format!("{}", value.order_id),
            client_order_id: value.client_order_id,
            side: value.side,
            price: value.price,
            amount: value.orig_qty,
        }
    }
}

impl MarketplaceTradeApi for Binance {
    async fn get_open_orders(&self) -> Result<Vec<OpenOrder>> {
        let orders_response: Vec<OrderResponse> =
            self.signed_get("/api/v3/openOrders", &[]).await?;

        debug!("Binance open orders : {:?}", orders_response);

        Ok(orders_response.into_iter().map(OpenOrder::from).collect())
    }
}
