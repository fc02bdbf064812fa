pub mod client;
pub mod error;
pub mod extract;

pub use client::{FetchReport, FulfillmentClient, RequestFailure};
pub use error::FetchError;
pub use extract::extract_availability;
