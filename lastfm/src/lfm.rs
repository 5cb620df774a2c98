use serde::Deserialize;

use crate::error::LastfmError;
use crate::ws::WsErrorCode;

/// The `<lfm status="...">` envelope every web service reply is wrapped in
#[derive(Deserialize, Debug, Default)]
pub(crate) struct Lfm {
    #[serde(rename = "@status", default)]
    pub status: String,
    pub error: Option<LfmError>,
    pub user: Option<UserElement>,
    pub friends: Option<UserPage>,
    pub neighbours: Option<UserPage>,
}

#[derive(Deserialize, Debug, Default)]
pub(crate) struct LfmError {
    #[serde(rename = "@code", default)]
    pub code: String,
    #[serde(rename = "$text", default)]
    pub message: String,
}

/// `<friends>` or `<neighbours>`: a run of `<user>` elements with optional paging attributes
#[derive(Deserialize, Debug, Default)]
pub(crate) struct UserPage {
    #[serde(rename = "@total", default)]
    pub total: String,
    #[serde(rename = "@page", default)]
    pub page: String,
    #[serde(rename = "@perPage", default)]
    pub per_page: String,
    #[serde(rename = "@totalPages", default)]
    pub total_pages: String,
    #[serde(rename = "user", default)]
    pub users: Vec<UserElement>,
}

/// Raw text of a `<user>` element, typed conversion happens in [`crate::UserProfile`]
#[derive(Deserialize, Debug, Default)]
pub(crate) struct UserElement {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub realname: String,
    #[serde(rename = "image", default)]
    pub images: Vec<ImageElement>,
    #[serde(rename = "type", default)]
    pub account_type: String,
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub playcount: String,
    pub registered: Option<RegisteredElement>,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub subscriber: String,
    #[serde(default)]
    pub bootstrap: String,
    #[serde(default)]
    pub gender: String,
    #[serde(rename = "match", default)]
    pub match_score: String,
}

#[derive(Deserialize, Debug, Default)]
pub(crate) struct ImageElement {
    #[serde(rename = "@size", default)]
    pub size: String,
    #[serde(rename = "$text", default)]
    pub url: String,
}

#[derive(Deserialize, Debug, Default)]
pub(crate) struct RegisteredElement {
    #[serde(rename = "@unixtime", default)]
    pub unixtime: String,
}

/// Parse a full reply, turning `status="failed"` into [`LastfmError::Ws`]
pub(crate) fn parse(body: &str) -> Result<Lfm, LastfmError> {
    let lfm: Lfm = from_str(body)?;
    if lfm.status == "failed" {
        let (code, message) = lfm
            .error
            .map(|e| (e.code.trim().parse::<u32>().unwrap_or_default(), e.message))
            .unwrap_or_default();
        return Err(LastfmError::Ws {
            code: WsErrorCode::from(code),
            message,
        });
    }
    Ok(lfm)
}

pub(crate) fn from_str<'de, T: Deserialize<'de>>(xml: &'de str) -> Result<T, LastfmError> {
    quick_xml::de::from_str(xml).map_err(|e| LastfmError::Xml { msg: e.to_string() })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn failed_status() {
        let body = r#"<?xml version="1.0" encoding="utf-8"?>
<lfm status="failed">
    <error code="6">User not found</error>
</lfm>"#;
        match parse(body) {
            Err(LastfmError::Ws { code, message }) => {
                assert_eq!(WsErrorCode::InvalidParameters, code);
                assert_eq!("User not found", message);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn failed_without_error_element() {
        let res = parse(r#"<lfm status="failed"></lfm>"#);
        assert!(matches!(
            res,
            Err(LastfmError::Ws {
                code: WsErrorCode::Other(0),
                ..
            })
        ));
    }

    #[test]
    fn not_xml() {
        assert!(matches!(parse("<lfm><user>"), Err(LastfmError::Xml { .. })));
    }

    #[test]
    fn unknown_elements_are_skipped() {
        let body = r#"<lfm status="ok">
  <friends user="RJ" page="2" perPage="1" totalPages="3" total="3">
    <user>
      <name>eartle</name>
      <recenttrack date="23 Jun 2011, 14:12" uts="1308838320">
        <name>Teardrop</name>
        <artist><name>Massive Attack</name></artist>
      </recenttrack>
      <image size="small">https://lastfm.freetls.fastly.net/i/u/34s/1.png</image>
      <image size="medium"></image>
    </user>
  </friends>
</lfm>"#;
        let lfm = parse(body).unwrap();
        let friends = lfm.friends.unwrap();
        assert_eq!("3", friends.total_pages);
        assert_eq!(1, friends.users.len());
        assert_eq!("eartle", friends.users[0].name);
        assert_eq!(2, friends.users[0].images.len());
        assert_eq!("", friends.users[0].images[1].url);
    }
}
