//! QQ Mini Program SDK for Rust
//!
//! An async client for the QQ Mini Program server-side API at
//! `https://api.q.qq.com`.
//!
//! ## API Coverage
//!
//! | Operation | Endpoint |
//! |-----------|----------|
//! | Access token | `GET /api/getToken` |
//! | Login code exchange | `GET /sns/jscode2session` |
//! | Text moderation | `POST /api/json/security/MsgSecCheck` |
//! | Mini Program code | `POST /api/json/qqa/CreateMiniCode` |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use qq_mp_sdk::QqMp;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let qq = QqMp::new("1110797565", "your_secret")?;
//!
//!     // Login with code from qq.login()
//!     let openid = qq.get_openid("code_from_miniprogram").await?;
//!     println!("OpenID: {}", openid);
//!
//!     let check = qq.check_sensitive_content("some user text").await?;
//!     if check.flagged {
//!         println!("{}", check.message);
//!     }
//!
//!     let png = qq.get_applet_qr_code("/pages/home").await?;
//!     std::fs::write("home.png", png)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Access tokens
//!
//! The token is fetched lazily on first use and cached on the client
//! until its expiry passes. Expiry is `now + expires_in` on the
//! configured [`Clock`](clock::Clock); see
//! [`ExpiryArithmetic`](clock::ExpiryArithmetic) for how the two are
//! combined.
//!
//! ## Modules
//!
//! - [`api`] - QQ API modules (auth, security, qrcode)
//! - [`client`] - HTTP client and the [`QqMp`] facade
//! - [`clock`] - Time sources for token expiry
//! - [`error`] - Error types
//! - [`middleware`] - Tower middleware (request logging)
//! - [`token`] - Access token management
//! - [`types`] - Credential and identifier newtypes
//!
//! ## Error Handling
//!
//! ```rust,ignore
//! use qq_mp_sdk::QqError;
//!
//! match result {
//!     Ok(response) => { /* handle success */ }
//!     Err(QqError::Api { code, message }) => {
//!         eprintln!("API error: {} - {}", code, message);
//!     }
//!     Err(QqError::Http(e)) => {
//!         eprintln!("HTTP error: {}", e);
//!     }
//!     Err(e) => {
//!         eprintln!("Other error: {}", e);
//!     }
//! }
//! ```

pub mod api;
pub mod client;
pub mod clock;
pub mod error;
pub mod middleware;
pub mod token;
pub mod types;

pub use api::ContentCheck;
pub use client::{QqClient, QqMp, QqMpBuilder};
pub use error::{HttpError, QqError};
