//! Live gold and silver spot prices from a reference page.

mod models;
mod resolver;

pub use models::{Metal, SpotPriceSet};
pub use resolver::{fetch_spot_prices, resolve_spot_prices};
