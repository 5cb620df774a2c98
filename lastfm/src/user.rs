use reqwest::Url;
use time::OffsetDateTime;

use crate::error::LastfmError;
use crate::gender::Gender;
use crate::image::{square_url, ImageSize};
use crate::lfm::{self, UserElement, UserPage};
use crate::url_builder::UrlBuilder;
use crate::ws::{Params, PendingReply, Reply, Session, WsClient};

pub const DEFAULT_LIMIT: u32 = 50;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AccountType {
    #[default]
    Ordinary,
    Subscriber,
    Moderator,
    Staff,
    Alumni,
}

impl From<&str> for AccountType {
    fn from(s: &str) -> Self {
        match s {
            "subscriber" => Self::Subscriber,
            "moderator" => Self::Moderator,
            "staff" => Self::Staff,
            "alumni" => Self::Alumni,
            _ => Self::Ordinary,
        }
    }
}

/// Time range for chart endpoints
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Period {
    #[default]
    Overall,
    SevenDays,
    OneMonth,
    ThreeMonths,
    SixMonths,
    TwelveMonths,
}

impl Period {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Overall => "overall",
            Self::SevenDays => "7day",
            Self::OneMonth => "1month",
            Self::ThreeMonths => "3month",
            Self::SixMonths => "6month",
            Self::TwelveMonths => "12month",
        }
    }
}

/// Snapshot of a last.fm account
#[derive(Clone, Debug, PartialEq)]
pub struct UserProfile {
    name: String,
    real_name: String,
    images: Vec<String>,
    account_type: AccountType,
    age: u16,
    scrobbles: u32,
    registered: Option<OffsetDateTime>,
    country: String,
    gender: Gender,
    is_subscriber: bool,
    can_bootstrap: bool,
    match_score: f32,
}

impl UserProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            real_name: String::new(),
            images: Vec::new(),
            account_type: AccountType::Ordinary,
            age: 0,
            scrobbles: 0,
            registered: None,
            country: String::new(),
            gender: Gender::Unknown,
            is_subscriber: false,
            can_bootstrap: false,
            match_score: -1.0,
        }
    }

    /// The user the session is configured for
    pub fn from_session(session: &Session) -> Self {
        Self::new(session.username.clone())
    }

    /// Parse a single `<user>` element
    pub fn from_xml(xml: &str) -> Result<Self, LastfmError> {
        let element: UserElement = lfm::from_str(xml)?;
        Ok(element.into())
    }

    /// Parse the reply to [`UserProfile::get_info`]
    pub fn from_info_reply(reply: &Reply) -> Result<Self, LastfmError> {
        let lfm = lfm::parse(reply.body())?;
        let user = lfm.user.ok_or_else(|| LastfmError::Xml {
            msg: "missing <user> element".to_owned(),
        })?;
        Ok(user.into())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn real_name(&self) -> &str {
        &self.real_name
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    pub fn account_type(&self) -> AccountType {
        self.account_type
    }

    pub fn age(&self) -> u16 {
        self.age
    }

    pub fn scrobble_count(&self) -> u32 {
        self.scrobbles
    }

    pub fn date_registered(&self) -> Option<OffsetDateTime> {
        self.registered
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn gender(&self) -> &Gender {
        &self.gender
    }

    pub fn is_subscriber(&self) -> bool {
        self.is_subscriber
    }

    pub fn can_bootstrap(&self) -> bool {
        self.can_bootstrap
    }

    /// Similarity to another user, -1.0 unless parsed from a neighbours reply
    pub fn match_score(&self) -> f32 {
        self.match_score
    }

    /// Image url for `size`, optionally the square crop
    pub fn image_url(&self, size: ImageSize, square: bool) -> Option<Url> {
        let url = self.images.get(size.index()).filter(|u| !u.is_empty())?;
        if square {
            Url::parse(&square_url(url)).ok()
        } else {
            Url::parse(url).ok()
        }
    }

    /// Profile page on the website
    pub fn www(&self, session: &Session) -> Result<Url, LastfmError> {
        UrlBuilder::new("user").slash(&self.name).url(session)
    }

    /// One line summary, e.g. "Richard Jones, 30, Male, United Kingdom, 12,345 scrobbles"
    pub fn info_string(&self) -> String {
        let mut text = if self.real_name.is_empty() {
            self.name.clone()
        } else {
            self.real_name.clone()
        };

        if self.age != 0 {
            text.push_str(&format!(", {}", self.age));
        }
        if self.gender.known() {
            text.push_str(&format!(", {}", self.gender));
        }
        if !self.country.is_empty() {
            text.push_str(&format!(", {}", self.country));
        }
        if self.scrobbles != 0 {
            text.push_str(&format!(", {} scrobbles", group_thousands(self.scrobbles)));
        }
        text
    }

    pub fn set_scrobble_count(&mut self, scrobbles: u32) {
        self.scrobbles = scrobbles;
    }

    pub fn set_date_registered(&mut self, date: Option<OffsetDateTime>) {
        self.registered = date;
    }

    /// Urls in [`ImageSize`] order
    pub fn set_images(&mut self, images: Vec<String>) {
        self.images = images;
    }

    pub fn set_real_name(&mut self, real_name: impl Into<String>) {
        self.real_name = real_name.into();
    }

    pub fn set_age(&mut self, age: u16) {
        self.age = age;
    }

    pub fn set_is_subscriber(&mut self, subscriber: bool) {
        self.is_subscriber = subscriber;
    }

    pub fn set_can_bootstrap(&mut self, can_bootstrap: bool) {
        self.can_bootstrap = can_bootstrap;
    }

    pub fn set_gender(&mut self, gender: &str) {
        self.gender = Gender::from(gender);
    }

    pub fn set_country(&mut self, country: impl Into<String>) {
        self.country = country.into();
    }

    fn params(&self, method: &str) -> Params {
        let mut map = Params::new();
        map.insert("method".to_owned(), format!("user.{}", method));
        map.insert("user".to_owned(), self.name.clone());
        map
    }

    fn paged_params(&self, method: &str, limit: u32, page: u32) -> Params {
        let mut map = self.params(method);
        map.insert("limit".to_owned(), limit.to_string());
        map.insert("page".to_owned(), page.to_string());
        map
    }

    pub fn friends_params(&self, recent_tracks: bool, limit: u32, page: u32) -> Params {
        let mut map = self.paged_params("getFriends", limit, page);
        if recent_tracks {
            map.insert("recenttracks".to_owned(), "1".to_owned());
        }
        map
    }

    pub fn friends_listening_now_params(&self, limit: u32, page: u32) -> Params {
        self.paged_params("getFriendsListeningNow", limit, page)
    }

    pub fn loved_tracks_params(&self, limit: u32, page: u32) -> Params {
        self.paged_params("getLovedTracks", limit, page)
    }

    pub fn top_tags_params(&self) -> Params {
        self.params("getTopTags")
    }

    pub fn top_artists_params(&self, period: Period, limit: u32, page: u32) -> Params {
        let mut map = self.paged_params("getTopArtists", limit, page);
        map.insert("period".to_owned(), period.as_str().to_owned());
        map
    }

    pub fn recent_artists_params(&self) -> Params {
        self.params("getRecentArtists")
    }

    pub fn recent_tracks_params(&self, limit: u32, page: u32) -> Params {
        self.paged_params("getRecentTracks", limit, page)
    }

    pub fn recent_stations_params(&self, limit: u32, page: u32) -> Params {
        self.paged_params("getRecentStations", limit, page)
    }

    pub fn recommended_artists_params(&self, limit: u32, page: u32) -> Params {
        self.paged_params("getRecommendedArtists", limit, page)
    }

    pub fn neighbours_params(&self, limit: u32, page: u32) -> Params {
        self.paged_params("getNeighbours", limit, page)
    }

    pub fn playlists_params(&self) -> Params {
        self.params("getPlaylists")
    }

    pub fn get_friends<'a>(
        &self,
        ws: &WsClient<'a>,
        recent_tracks: bool,
        limit: u32,
        page: u32,
    ) -> PendingReply<'a> {
        ws.get(self.friends_params(recent_tracks, limit, page))
    }

    pub fn get_friends_listening_now<'a>(
        &self,
        ws: &WsClient<'a>,
        limit: u32,
        page: u32,
    ) -> PendingReply<'a> {
        ws.get(self.friends_listening_now_params(limit, page))
    }

    pub fn get_loved_tracks<'a>(&self, ws: &WsClient<'a>, limit: u32, page: u32) -> PendingReply<'a> {
        ws.get(self.loved_tracks_params(limit, page))
    }

    pub fn get_top_tags<'a>(&self, ws: &WsClient<'a>) -> PendingReply<'a> {
        ws.get(self.top_tags_params())
    }

    pub fn get_top_artists<'a>(
        &self,
        ws: &WsClient<'a>,
        period: Period,
        limit: u32,
        page: u32,
    ) -> PendingReply<'a> {
        ws.get(self.top_artists_params(period, limit, page))
    }

    pub fn get_recent_artists<'a>(&self, ws: &WsClient<'a>) -> PendingReply<'a> {
        ws.get(self.recent_artists_params())
    }

    /// Drops any cached copy of this exact request before issuing it
    pub fn get_recent_tracks<'a>(&self, ws: &WsClient<'a>, limit: u32, page: u32) -> PendingReply<'a> {
        let params = self.recent_tracks_params(limit, page);
        let url = ws.url(&params);
        if ws.cache().remove(&url) {
            tracing::debug!(%url, "dropped cached recent tracks");
        }
        ws.get(params)
    }

    pub fn get_recent_stations<'a>(
        &self,
        ws: &WsClient<'a>,
        limit: u32,
        page: u32,
    ) -> PendingReply<'a> {
        ws.get(self.recent_stations_params(limit, page))
    }

    pub fn get_recommended_artists<'a>(
        &self,
        ws: &WsClient<'a>,
        limit: u32,
        page: u32,
    ) -> PendingReply<'a> {
        ws.get(self.recommended_artists_params(limit, page))
    }

    pub fn get_neighbours<'a>(&self, ws: &WsClient<'a>, limit: u32, page: u32) -> PendingReply<'a> {
        ws.get(self.neighbours_params(limit, page))
    }

    pub fn get_playlists<'a>(&self, ws: &WsClient<'a>) -> PendingReply<'a> {
        ws.get(self.playlists_params())
    }

    pub fn info_params(username: &str) -> Params {
        let mut map = Params::new();
        map.insert("method".to_owned(), "user.getInfo".to_owned());
        map.insert("user".to_owned(), username.to_owned());
        map
    }

    /// Full profile of `username`, parse with [`UserProfile::from_info_reply`]
    pub fn get_info<'a>(ws: &WsClient<'a>, username: &str) -> PendingReply<'a> {
        ws.post(Self::info_params(username))
    }
}

impl From<UserElement> for UserProfile {
    fn from(e: UserElement) -> Self {
        let mut images = vec![String::new(); ImageSize::ALL.len()];
        for image in e.images {
            if let Some(size) = ImageSize::from_attr(&image.size) {
                images[size.index()] = image.url;
            }
        }
        // Trailing unset sizes carry nothing
        while images.last().is_some_and(|u| u.is_empty()) {
            images.pop();
        }

        let registered = e
            .registered
            .and_then(|r| r.unixtime.trim().parse::<i64>().ok())
            .filter(|ts| *ts != 0)
            .and_then(|ts| OffsetDateTime::from_unix_timestamp(ts).ok());

        Self {
            name: e.name,
            real_name: e.realname,
            images,
            account_type: AccountType::from(e.account_type.as_str()),
            age: e.age.trim().parse().unwrap_or(0),
            scrobbles: e.playcount.trim().parse().unwrap_or(0),
            registered,
            country: e.country,
            gender: Gender::from(e.gender.as_str()),
            is_subscriber: e.subscriber == "1",
            can_bootstrap: e.bootstrap == "1",
            match_score: e.match_score.trim().parse().unwrap_or(-1.0),
        }
    }
}

/// A page of users from a friends or neighbours reply
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserList {
    pub users: Vec<UserProfile>,
    pub total: u32,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
}

impl UserList {
    /// Users in `reply`. Unparsable replies give an empty list.
    pub fn list(reply: &Reply) -> Self {
        Self::parse(reply.body())
    }

    pub fn parse(body: &str) -> Self {
        let lfm = match lfm::parse(body) {
            Ok(lfm) => lfm,
            Err(e) => {
                tracing::warn!("unable to parse user list: {}", e);
                return Self::default();
            }
        };

        let mut list = Self::default();
        if let Some(friends) = &lfm.friends {
            list.read_paging(friends);
        }
        list.users = lfm
            .user
            .into_iter()
            .chain(lfm.friends.into_iter().flat_map(|p| p.users))
            .chain(lfm.neighbours.into_iter().flat_map(|p| p.users))
            .map(UserProfile::from)
            .collect();
        list
    }

    fn read_paging(&mut self, page: &UserPage) {
        let num = |s: &str| s.trim().parse().unwrap_or(0);
        self.total = num(&page.total);
        self.page = num(&page.page);
        self.per_page = num(&page.per_page);
        self.total_pages = num(&page.total_pages);
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UserProfile> {
        self.users.iter()
    }
}

impl IntoIterator for UserList {
    type Item = UserProfile;
    type IntoIter = std::vec::IntoIter<UserProfile>;

    fn into_iter(self) -> Self::IntoIter {
        self.users.into_iter()
    }
}

fn group_thousands(n: u32) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
