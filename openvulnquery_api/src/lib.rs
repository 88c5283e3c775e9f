mod auth;
mod client;
mod config;
mod errors;
mod query;
pub mod types;
pub use self::auth::{Credentials, Token};
pub use self::client::Client;
pub use self::config::{ClientConfig, API_URL, DEFAULT_USER_AGENT, REQUEST_TOKEN_URL};
pub use self::errors::Error;
pub use self::query::{
    ApiRequest, Filter, PathBuilder, PublicationAspect, Query, ResponseShape, TemporalFilter, Topic,
};
