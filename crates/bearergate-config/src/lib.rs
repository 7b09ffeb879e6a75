//! # bearergate config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`jwt`]: token verification and gate bypass settings
//! - [`server`]: listener settings for the demo server
//! - [`cors`]: allowed origins for cross-origin requests
//!
//! # Example
//!
//! ```ignore
//! use bearergate_config::{CorsConfig, GateConfig, ServerConfig};
//!
//! let gate_config = GateConfig::from_env();
//! let server_config = ServerConfig::from_env();
//! let cors_config = CorsConfig::from_env();
//! ```

pub mod cors;
pub mod jwt;
pub mod server;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use jwt::GateConfig;
pub use server::ServerConfig;
