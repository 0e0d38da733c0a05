//! HTTP transport and the [`QqMp`] facade

mod qq_client;
pub use qq_client::QqClient;
pub(crate) use qq_client::decode_json;

mod qq_mp;
pub use qq_mp::QqMp;

mod builder;
pub use builder::QqMpBuilder;
