//! Values an account in a single quote currency.
//!
//! Every query runs sequentially and the first failure aborts the whole
//! report, so a [`BalanceReport`] is either complete or not produced at all.

use itertools::Itertools;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::config::{AssetDiscovery, ReportConfig};
use crate::error::BalanceError;
use crate::marketplace::Marketplace;
use crate::portfolio::{AssetPrice, AssetReportLine, BalanceReport};
use crate::ticker::Ticker;
use crate::utils::round_to_cents;

/// Assets to report, and which of them are quote-side assets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetSet {
    pub assets: Vec<String>,
    pub quote_assets: Vec<String>,
}

impl AssetSet {
    pub fn is_quote_asset(&self, asset: &str) -> bool {
        self.quote_assets.iter().any(|quote| quote == asset)
    }
}

pub async fn discover_assets<M: Marketplace>(
    marketplace: &M,
    config: &ReportConfig,
) -> Result<AssetSet, BalanceError> {
    match &config.discovery {
        AssetDiscovery::Explicit { assets } => Ok(AssetSet {
            assets: assets
                .iter()
                .chain(std::iter::once(&config.quote_currency))
                .unique()
                .cloned()
                .collect(),
            quote_assets: vec![config.quote_currency.clone()],
        }),
        AssetDiscovery::AutoFromOpenOrders { order_id_pattern } => {
            let orders = marketplace
                .get_open_orders()
                .await
                .map_err(|err| BalanceError::external("*", "open orders", err))?;

            let symbols: Vec<String> = orders
                .into_iter()
                .filter(|order| order.is_bot_order(order_id_pattern))
                .map(|order| order.symbol)
                .unique()
                .collect();

            debug!("Symbols with bot orders : {:?}", symbols);

            let mut tickers = Vec::with_capacity(symbols.len());
            for symbol in symbols.iter() {
                let ticker = marketplace
                    .get_ticker_info(symbol)
                    .await
                    .map_err(|err| BalanceError::external(symbol, "exchange info", err))?;
                tickers.push(ticker);
            }

            let base_assets = tickers.iter().map(|t| t.base.clone()).unique().sorted();
            let quote_assets: Vec<String> = tickers
                .iter()
                .map(|t| t.quote.clone())
                .unique()
                .sorted()
                .collect();

            Ok(AssetSet {
                assets: base_assets
                    .chain(quote_assets.iter().cloned())
                    .unique()
                    .collect(),
                quote_assets,
            })
        }
    }
}

async fn fetch_price<M: Marketplace>(
    marketplace: &M,
    asset: &str,
    quote_currency: &str,
) -> Result<AssetPrice, BalanceError> {
    if asset == quote_currency {
        return Ok(AssetPrice {
            asset: asset.to_string(),
            price: Decimal::ONE,
        });
    }
    let price = marketplace
        .get_average_price(&Ticker::new(asset, quote_currency))
        .await
        .map_err(|err| BalanceError::external(asset, "average price", err))?;
    Ok(AssetPrice {
        asset: asset.to_string(),
        price,
    })
}

pub async fn compute_balance_report<M: Marketplace>(
    marketplace: &M,
    config: &ReportConfig,
) -> Result<BalanceReport, BalanceError> {
    config.validate()?;

    let asset_set = discover_assets(marketplace, config).await?;
    info!("Computing balance for {:?}", asset_set.assets);

    let quote_currency = &config.quote_currency;
    let mut lines = Vec::with_capacity(asset_set.assets.len());
    let mut total = Decimal::ZERO;

    for asset in asset_set.assets.iter() {
        let holding = marketplace
            .get_asset_balance(asset)
            .await
            .map_err(|err| BalanceError::external(asset, "asset balance", err))?;
        let AssetPrice { price, .. } = fetch_price(marketplace, asset, quote_currency).await?;

        let mut quantity = holding.total();
        if config.include_savings && asset_set.is_quote_asset(asset) {
            let savings = marketplace
                .get_savings_position(asset)
                .await
                .map_err(|err| BalanceError::external(asset, "savings position", err))?;
            if let Some(savings) = savings {
                quantity += savings.free_amount;
            }
        }

        let value = price * quantity;
        debug!("{} : {} x {} = {} {}", asset, quantity, price, value, quote_currency);

        total += value;
        lines.push(AssetReportLine {
            asset: asset.clone(),
            quantity,
            price,
            value: round_to_cents(value),
        });
    }

    let report = BalanceReport {
        quote_currency: quote_currency.clone(),
        lines,
        total: round_to_cents(total),
    };

    info!("TOTAL : {:.2} {}", report.total, report.quote_currency);

    Ok(report)
}
