use std::fmt::Display;

/// A trading pair, e.g. `BTC` priced in `USDT`.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Ticker {
    pub base: String,
    pub quote: String,
}

impl Ticker {
    pub fn new(base: &str, quote: &str) -> Self {
        Self {
            base: base.to_string(),
            quote: quote.to_string(),
        }
    }
}

impl Display for Ticker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.base, self.quote)
    }
}
