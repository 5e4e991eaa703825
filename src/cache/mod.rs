mod elements;
mod error;
mod position;
mod source;
mod store;

pub use elements::{CacheEntry, ElementCache, ELEMENTS_DOC, ELEMENTS_TTL_HOURS};
pub use error::{CacheError, StoreError};
pub use position::{PositionCache, PositionSnapshot, POSITION_DOC, POSITION_TTL_SECONDS};
pub use source::{ElementSource, HttpElementSource, HttpPositionSource, PositionSource, TleSet};
pub use store::FileStore;
