//! PROMO CODE SCANNER
//! Walks a generated promo code space, fetches every promo page and records
//! the organization each live promotion belongs to.

pub mod codes;
pub mod config;
mod error;
pub mod expiry;
pub mod logging;
mod macros;
pub mod parse;
pub mod process;
pub mod record;
pub mod report;
pub mod request;
pub mod store;

pub use error::{Error, Result};

pub const BASE_URL: &str = "https://www.alaskaair.com/promo/";
pub const PROMO_PREFIXES: [&str; 6] = ["AS23", "CS23", "AS24", "CS24", "AS25", "CS25"];
pub const RESULTS_FILE: &str = "alaska_promos.json";
pub const LOG_FILE: &str = "promoscan.log";
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
/// Seconds. Multiplied by a random factor in [0.5, 1.5] before every sleep.
pub const DEFAULT_DELAY_SECS: f64 = 1.0;
pub const REQUEST_TIMEOUT_SECS: u64 = 10;
/// The store is flushed to disk after this many new discoveries.
const SAVE_EVERY: usize = 5;
/// A 200 response is only a promo page if it mentions one of these.
const PROMO_MARKERS: [&str; 2] = ["fast track", "mileage plan"];
