mod cache;
mod error;
mod gender;
mod image;
mod lfm;
mod url_builder;
mod user;
#[cfg(test)]
mod utils;
mod ws;

pub use cache::ResponseCache;
pub use error::LastfmError;
pub use gender::Gender;
pub use image::{square_url, ImageSize};
pub use url_builder::UrlBuilder;
pub use user::{AccountType, Period, UserList, UserProfile, DEFAULT_LIMIT};
pub use ws::{api_signature, Params, PendingReply, Reply, Session, WsClient, WsErrorCode, API_ROOT};
