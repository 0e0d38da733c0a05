//! Middleware components for the QQ SDK.
//!
//! Middleware are Tower layers over [`QqClient`](crate::client::QqClient)
//! installed with [`QqMpBuilder::with_middleware`](crate::client::QqMpBuilder::with_middleware).
//! Every request the SDK sends, token refreshes included, passes through.
//!
//! ## Usage
//!
//! ```ignore
//! use qq_mp_sdk::QqMp;
//! use qq_mp_sdk::middleware::LoggingMiddleware;
//!
//! let qq = QqMp::builder()
//!     .appid(appid)
//!     .secret(secret)
//!     .with_middleware(LoggingMiddleware::new().verbose())
//!     .build()?;
//! ```

// Re-export tower types for convenience
pub use tower::{Layer, Service, ServiceBuilder};

mod logging;

pub use logging::{LoggingMiddleware, LoggingMiddlewareService};
