use anyhow::Result;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use crate::marketplace::binance::Binance;
use crate::marketplace::MarketplaceAccountApi;
use crate::portfolio::{AssetHolding, SupplementalPosition};

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AccountOverview {
    pub balances: Vec<AccountBalance>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AccountBalance {
    pub asset: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub free: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub locked: Decimal,
}

#[derive(Deserialize, Debug, Clone)]
pub struct FlexiblePositions {
    pub rows: Vec<FlexiblePosition>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FlexiblePosition {
    pub asset: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_amount: Decimal,
}

impl Binance {
    pub async fn get_account_overview(&self) -> Result<AccountOverview> {
        let overview: AccountOverview = self
            .signed_get("/api/v3/account", &[("omitZeroBalances", "true")])
            .await?;

        debug!("Account balances : {:?}", overview.balances);

        Ok(overview)
    }
}

impl MarketplaceAccountApi for Binance {
    async fn get_asset_balance(&self, asset: &str) -> Result<AssetHolding> {
        let overview = self.get_account_overview().await?;

        // zero balances are omitted from the account overview
        let holding = overview
            .balances
            .into_iter()
            .find(|balance| balance.asset == asset)
            .map(|balance| AssetHolding {
                asset: balance.asset,
                free: balance.free,
                locked: balance.locked,
            })
            .unwrap_or_else(|| AssetHolding::empty(asset));

        Ok(holding)
    }

    async fn get_savings_position(&self, asset: &str) -> Result<Option<SupplementalPosition>> {
        let positions: FlexiblePositions = self
            .signed_get("/sapi/v1/simple-earn/flexible/position", &[("asset", asset)])
            .await?;

        debug!("{} flexible savings : {:?}", asset, positions.rows);

        Ok(positions
            .rows
            .into_iter()
            .find(|position| position.asset == asset)
            .map(|position| SupplementalPosition {
                asset: position.asset,
                free_amount: position.total_amount,
            }))
    }
}
