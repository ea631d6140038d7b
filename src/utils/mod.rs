pub mod base64;
pub mod http;
pub mod url;

pub use http::{fetch_subscription, read_subscription_file, FetchError};
