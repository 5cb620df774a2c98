use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageSize {
    Small,
    Medium,
    Large,
    ExtraLarge,
}

impl ImageSize {
    pub const ALL: [ImageSize; 4] = [
        ImageSize::Small,
        ImageSize::Medium,
        ImageSize::Large,
        ImageSize::ExtraLarge,
    ];

    /// Value of the `size` attribute on `<image>`
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::ExtraLarge => "extralarge",
        }
    }

    pub fn from_attr(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|size| size.as_str() == s)
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// Point an image url at its square crop: `/serve/<n>/` becomes `/serve/<n>s/`
pub fn square_url(url: &str) -> Cow<'_, str> {
    static SERVE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/serve/(\d*)s?/").unwrap());
    SERVE_RE.replace(url, "/serve/${1}s/")
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn square() {
        assert_eq!(
            "https://userserve-ak.last.fm/serve/120s/123.jpg",
            square_url("https://userserve-ak.last.fm/serve/120/123.jpg")
        );
        assert_eq!(
            "https://userserve-ak.last.fm/serve/120s/123.jpg",
            square_url("https://userserve-ak.last.fm/serve/120s/123.jpg")
        );
        assert_eq!(
            "https://lastfm.freetls.fastly.net/i/u/300x300/1.png",
            square_url("https://lastfm.freetls.fastly.net/i/u/300x300/1.png")
        );
    }

    #[test]
    fn only_first_match() {
        assert_eq!("/serve/64s/a/serve/64/", square_url("/serve/64/a/serve/64/"));
    }

    #[test]
    fn attr() {
        assert_eq!(Some(ImageSize::ExtraLarge), ImageSize::from_attr("extralarge"));
        assert_eq!(None, ImageSize::from_attr("mega"));
    }
}
