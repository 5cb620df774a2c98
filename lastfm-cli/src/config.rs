use std::path::Path;

use anyhow::{Context, Result};
use lastfm::Session;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub api_key: String,
    pub shared_secret: Option<String>,
    pub session_key: Option<String>,
    /// User to act on when none is given on the command line
    pub username: String,
    /// Website language, e.g. "de" for www.lastfm.de
    pub language: Option<String>,
}

impl Config {
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let conf_contents = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("unable to read config {}", path.as_ref().display()))?;
        Ok(toml::from_str(&conf_contents)?)
    }

    pub fn session(&self) -> Session {
        Session {
            api_key: self.api_key.clone(),
            shared_secret: self.shared_secret.clone(),
            session_key: self.session_key.clone(),
            username: self.username.clone(),
            language: self.language.clone(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn minimal() {
        let conf: Config = toml::from_str(
            r#"
api_key = "b25b959554ed76058ac220b7b2e0a026"
username = "RJ"
"#,
        )
        .unwrap();
        let session = conf.session();
        assert_eq!("RJ", session.username);
        assert_eq!(None, session.shared_secret);
        assert_eq!(None, session.language);
    }

    #[test]
    fn full() {
        let conf: Config = toml::from_str(
            r#"
api_key = "key"
shared_secret = "secret"
session_key = "sk"
username = "eartle"
language = "de"
"#,
        )
        .unwrap();
        let session = conf.session();
        assert_eq!(Some("secret"), session.shared_secret.as_deref());
        assert_eq!(Some("sk"), session.session_key.as_deref());
        assert_eq!(Some("de"), session.language.as_deref());
    }

    #[test]
    fn missing_username() {
        assert!(toml::from_str::<Config>(r#"api_key = "key""#).is_err());
    }

    #[test]
    fn missing_file() {
        assert!(Config::read("/nonexistent/lastfm/config.toml").is_err());
    }
}
