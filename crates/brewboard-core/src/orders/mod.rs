pub mod directory;
pub mod errors;
pub mod http;
pub mod pricing;
pub mod types;

pub use directory::DirectoryOrderSource;
pub use errors::FetchError;
pub use http::HttpOrderSource;
pub use pricing::{Receipt, price};
pub use types::{DrinkSize, Order, OrdersPayload};
