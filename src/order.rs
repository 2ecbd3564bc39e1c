use rust_decimal::Decimal;

/// An order currently resting on the marketplace.
#[derive(Clone, Debug, PartialEq)]
pub struct OpenOrder {
    pub symbol: String,
    pub marketplace_id: String,
    pub client_order_id: String,
    pub side: String,
    pub price: Decimal,
    pub amount: Decimal,
}

impl OpenOrder {
    /// Orders placed by trading bots carry a recognizable marker in their
    /// client order id, e.g. `abc_deal_1`.
    pub fn is_bot_order(&self, pattern: &str) -> bool {
        self.client_order_id.contains(pattern)
    }
}
