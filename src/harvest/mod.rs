pub mod enso;
pub mod error;
pub mod frost;
pub mod historical;
pub(crate) mod http;
pub mod soil_days;
