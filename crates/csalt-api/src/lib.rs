// csalt-api: Async Rust client for the Cacophony user API

pub mod auth;
pub mod client;
pub mod devices;
pub mod error;
pub mod models;
pub mod transport;

pub use auth::TokenTtl;
pub use client::UserApiClient;
pub use error::Error;
pub use models::{Device, DeviceName, DeviceResponse};
pub use transport::TransportConfig;
