use thiserror::Error;

use crate::ws::WsErrorCode;

#[derive(Error, Debug)]
pub enum LastfmError {
    #[error("unable to reach last.fm: {url}, {error:#?}")]
    Http { url: String, error: reqwest::Error },

    #[error("unable to parse xml: {msg}")]
    Xml { msg: String },

    #[error("last.fm returned error {code}: {message}")]
    Ws { code: WsErrorCode, message: String },

    #[error("invalid url: {url}, {msg}")]
    InvalidUrl { url: String, msg: String },
}
