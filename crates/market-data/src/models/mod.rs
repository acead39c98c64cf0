//! Market data models
//!
//! This module contains the core data types shared by every provider:
//! - `exchange` - Reference exchange records and the summaries returned to callers
//! - `search` - Symbol search results and the search mode
//! - `types` - Type aliases for common identifiers (ProviderCode)

mod exchange;
mod search;
mod types;

pub use exchange::{Exchange, ExchangeSummary};
pub use search::{SearchType, SymbolResult};
pub use types::ProviderCode;
