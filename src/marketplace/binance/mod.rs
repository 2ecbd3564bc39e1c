use std::env;

use anyhow::{anyhow, bail, Context, Result};
use chrono::prelude::*;
use hex::encode;
use hmac::{Hmac, Mac};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use sha2::Sha256;
use tracing::debug;

mod account_api;
mod exchange_info_api;
mod market_data_api;
mod trade_api;

pub const ENDPOINT: &str = "https://api.binance.com";

#[derive(Clone, Debug)]
pub struct BinanceCredentials {
    pub api_key: String,
    pub secret_key: String,
}

impl BinanceCredentials {
    /// Uses the given values, falling back to `BINANCE_API_KEY` and
    /// `BINANCE_API_SECRET`.
    pub fn resolve(api_key: Option<String>, secret_key: Option<String>) -> Result<Self> {
        let api_key = match api_key {
            Some(key) => key,
            None => env::var("BINANCE_API_KEY").context("BINANCE_API_KEY is not set")?,
        };
        let secret_key = match secret_key {
            Some(key) => key,
            None => env::var("BINANCE_API_SECRET").context("BINANCE_API_SECRET is not set")?,
        };
        Ok(Self {
            api_key,
            secret_key,
        })
    }
}

#[derive(Deserialize, Debug)]
struct ApiError {
    code: i64,
    msg: String,
}

#[derive(Debug, Clone)]
pub struct Binance {
    client: Client,
    endpoint: String,
    credentials: Option<BinanceCredentials>,
}

impl Binance {
    pub fn new(credentials: Option<BinanceCredentials>) -> Result<Self> {
        Self::with_endpoint(ENDPOINT, credentials)
    }

    pub fn with_endpoint(endpoint: &str, credentials: Option<BinanceCredentials>) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    pub async fn ping(&self) -> Result<()> {
        let res = self
            .client
            .get(format!("{}/api/v3/ping", self.endpoint))
            .send()
            .await?;
        let _: serde_json::Value = parse_response(res).await?;
        Ok(())
    }

    async fn public_get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let url = reqwest::Url::parse_with_params(
            format!("{}{}", self.endpoint, path).as_str(),
            params,
        )?;

        debug!("GET {}", url);

        let res = self.client.get(url).send().await?;
        parse_response(res).await
    }

    async fn signed_get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or_else(|| anyhow!("Binance credentials are required for {}", path))?;

        let timestamp = Utc::now().timestamp_millis();
        let mut query: Vec<String> = params.iter().map(|(k, v)| format!("{k}={v}")).collect();
        query.push(format!("timestamp={}", timestamp));
        let query = query.join("&");

        let signature = sign(&credentials.secret_key, &query)?;

        let url = format!("{}{}?{}&signature={}", self.endpoint, path, query, signature);

        debug!("GET {}{}?{}", self.endpoint, path, query);

        let res = self
            .client
            .get(&url)
            .header("X-MBX-APIKEY", &credentials.api_key)
            .send()
            .await?;
        parse_response(res).await
    }
}

fn sign(secret_key: &str, query: &str) -> Result<String> {
    let mut mac: Hmac<Sha256> = Hmac::new_from_slice(secret_key.as_bytes())?;
    mac.update(query.as_bytes());
    Ok(encode(mac.finalize().into_bytes()))
}

async fn parse_response<T: DeserializeOwned>(res: Response) -> Result<T> {
    let status = res.status();
    let body = res.text().await?;

    if !status.is_success() {
        return match serde_json::de::from_str::<ApiError>(&body) {
            Ok(err) => bail!("Binance error {} ({}): {}", err.code, status, err.msg),
            Err(_) => bail!("Binance error ({}): {}", status, body),
        };
    }

    serde_json::de::from_str(&body).with_context(|| format!("Unexpected Binance response: {body}"))
}
