use std::fmt::Display;

use rust_decimal::Decimal;

/// Spot wallet balance of one asset.
#[derive(Clone, Debug, PartialEq)]
pub struct AssetHolding {
    pub asset: String,
    pub free: Decimal,
    pub locked: Decimal,
}

impl AssetHolding {
    pub fn empty(asset: &str) -> Self {
        Self {
            asset: asset.to_string(),
            free: Decimal::ZERO,
            locked: Decimal::ZERO,
        }
    }

    pub fn total(&self) -> Decimal {
        self.free + self.locked
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AssetPrice {
    pub asset: String,
    pub price: Decimal,
}

/// Funds held in a flexible savings product, outside of the spot wallet.
#[derive(Clone, Debug, PartialEq)]
pub struct SupplementalPosition {
    pub asset: String,
    pub free_amount: Decimal,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AssetReportLine {
    pub asset: String,
    pub quantity: Decimal,
    pub price: Decimal,
    /// Value in the quote currency, rounded to cents.
    pub value: Decimal,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BalanceReport {
    pub quote_currency: String,
    pub lines: Vec<AssetReportLine>,
    pub total: Decimal,
}

impl BalanceReport {
    pub fn get(&self, asset: &str) -> Option<&AssetReportLine> {
        self.lines.iter().find(|line| line.asset == asset)
    }
}

impl Display for BalanceReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for line in self.lines.iter() {
            writeln!(f, "{:<6.6} ${:.2}", line.asset, line.value)?;
        }
        write!(f, "\n{:<6} ${:.2}", "TOTAL", self.total)
    }
}
