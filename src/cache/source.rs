use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::cache::error::CacheError;
use crate::cache::position::PositionSnapshot;

/// A two-line element pair as served by the upstream source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TleSet {
    pub line1: String,
    pub line2: String,
}

#[async_trait]
pub trait ElementSource: Send + Sync {
    async fn fetch(&self) -> Result<TleSet, CacheError>;
}

#[async_trait]
pub trait PositionSource: Send + Sync {
    async fn fetch(&self) -> Result<PositionSnapshot, CacheError>;
}

/// Fetches the current ISS element pair from a wheretheiss.at-style endpoint.
pub struct HttpElementSource {
    client: reqwest::Client,
    url: String,
}

impl HttpElementSource {
    pub fn new(url: String, timeout: Duration) -> Result<Self, CacheError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CacheError::UpstreamUnavailable(e.to_string()))?;
        Ok(HttpElementSource { client, url })
    }
}

#[derive(Debug, Deserialize)]
struct TleResponse {
    line1: String,
    line2: String,
}

#[async_trait]
impl ElementSource for HttpElementSource {
    async fn fetch(&self) -> Result<TleSet, CacheError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| CacheError::UpstreamUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(CacheError::UpstreamUnavailable(format!(
                "TLE endpoint returned {}",
                response.status()
            )));
        }

        let tle: TleResponse = response
            .json()
            .await
            .map_err(|e| CacheError::UpstreamUnavailable(e.to_string()))?;

        Ok(TleSet {
            line1: tle.line1,
            line2: tle.line2,
        })
    }
}

/// Fetches the current ISS ground-track position from the same API family.
pub struct HttpPositionSource {
    client: reqwest::Client,
    url: String,
}

impl HttpPositionSource {
    pub fn new(url: String, timeout: Duration) -> Result<Self, CacheError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CacheError::UpstreamUnavailable(e.to_string()))?;
        Ok(HttpPositionSource { client, url })
    }
}

#[async_trait]
impl PositionSource for HttpPositionSource {
    async fn fetch(&self) -> Result<PositionSnapshot, CacheError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| CacheError::UpstreamUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(CacheError::UpstreamUnavailable(format!(
                "position endpoint returned {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| CacheError::UpstreamUnavailable(e.to_string()))
    }
}
