use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::cache::{CacheError, ElementCache, ElementSource, FileStore, HttpElementSource};
use crate::config::Config;
use crate::predict::{next_visible_pass, ObserverLocation, Pass, PredictError};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("element cache: {0}")]
    Cache(#[from] CacheError),
    #[error("prediction: {0}")]
    Predict(#[from] PredictError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct PassRequest {
    pub observer: ObserverLocation,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassStatus {
    Ok,
    None,
}

#[derive(Debug, Clone, Serialize)]
pub struct PassResponse {
    pub status: PassStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pass: Option<Pass>,
}

/// Request/response front for the predictor: resolves current elements
/// through the cache, scans, and reports the first upcoming pass.
///
/// Constructed once per process and shared by reference; there are no
/// module-level singletons. "No pass within the horizon" is a normal
/// `status: none` response, not an error.
pub struct VisibilityService<S: ElementSource> {
    elements: ElementCache<S>,
}

impl VisibilityService<HttpElementSource> {
    pub fn from_config(config: &Config) -> Result<Self, ServiceError> {
        let store = FileStore::new(config.cache.base_folder.clone());
        let source = HttpElementSource::new(
            config.upstream.tle_url.clone(),
            Duration::from_secs(config.upstream.timeout_secs),
        )?;
        Ok(VisibilityService::new(ElementCache::new(store, source)))
    }
}

impl<S: ElementSource> VisibilityService<S> {
    pub fn new(elements: ElementCache<S>) -> Self {
        VisibilityService { elements }
    }

    pub async fn next_visible_pass(
        &self,
        request: PassRequest,
    ) -> Result<PassResponse, ServiceError> {
        let tle = self.elements.current_elements().await?;
        let start = request.start_time.unwrap_or_else(Utc::now);

        let pass = next_visible_pass(&tle, &request.observer, start)?;
        Ok(match pass {
            Some(pass) => PassResponse {
                status: PassStatus::Ok,
                pass: Some(pass),
            },
            None => PassResponse {
                status: PassStatus::None,
                pass: None,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::TleSet;
    use async_trait::async_trait;
    use chrono::TimeZone;

    struct FixedSource(TleSet);

    #[async_trait]
    impl ElementSource for FixedSource {
        async fn fetch(&self) -> Result<TleSet, CacheError> {
            Ok(self.0.clone())
        }
    }

    fn service(dir: &tempfile::TempDir) -> VisibilityService<FixedSource> {
        let store = FileStore::new(dir.path().to_path_buf());
        let source = FixedSource(TleSet {
            line1: "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927"
                .into(),
            line2: "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537"
                .into(),
        });
        VisibilityService::new(ElementCache::new(store, source))
    }

    #[tokio::test]
    async fn response_status_matches_pass_presence() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(&dir);

        let response = service
            .next_visible_pass(PassRequest {
                observer: ObserverLocation::new(48.85, 2.35),
                start_time: Some(Utc.with_ymd_and_hms(2008, 9, 20, 12, 25, 40).unwrap()),
            })
            .await
            .unwrap();

        match response.status {
            PassStatus::Ok => assert!(response.pass.is_some()),
            PassStatus::None => assert!(response.pass.is_none()),
        }
    }

    #[tokio::test]
    async fn invalid_elements_from_upstream_are_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf());
        let source = FixedSource(TleSet {
            line1: "bogus".into(),
            line2: "bogus".into(),
        });
        let service = VisibilityService::new(ElementCache::new(store, source));

        let result = service
            .next_visible_pass(PassRequest {
                observer: ObserverLocation::new(0.0, 0.0),
                start_time: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            })
            .await;

        assert!(matches!(
            result,
            Err(ServiceError::Predict(PredictError::InvalidElements(_)))
        ));
    }

    #[test]
    fn none_response_omits_the_pass_field() {
        let response = PassResponse {
            status: PassStatus::None,
            pass: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "none" }));
    }
}
