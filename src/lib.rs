pub mod api;
pub mod config;
pub mod error;
pub mod graceful_shutdown;
pub mod http_server;
pub mod rdata;
pub mod records;
pub mod session;
pub mod store;
pub mod zones;

pub use config::EmulatorConfig;
pub use http_server::{HttpServer, router};
pub use store::EmulatorStore;
