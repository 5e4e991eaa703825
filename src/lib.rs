pub mod cache;
pub mod config;
pub mod predict;
pub mod service;

pub use cache::{CacheError, ElementCache, ElementSource, FileStore, HttpElementSource, TleSet};
pub use config::Config;
pub use predict::{ObserverLocation, Pass, PredictError};
pub use service::{PassRequest, PassResponse, PassStatus, ServiceError, VisibilityService};
