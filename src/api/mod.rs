//! QQ Mini Program API modules
//!
//! - [`auth`] - Login code exchange (jscode2session)
//! - [`security`] - Text content moderation
//! - [`qrcode`] - Mini Program code images
//!
//! Each API struct borrows the shared [`QqContext`]; most callers go
//! through [`QqMp`](crate::QqMp) instead of building them directly.

pub mod auth;
mod context;
pub mod qrcode;
pub mod security;

pub use auth::{AuthApi, LoginResponse};
pub use context::QqContext;
pub use qrcode::QrcodeApi;
pub use security::{ContentCheck, MsgSecCheckResponse, SecurityApi};
