use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use lastfm::{Period, DEFAULT_LIMIT};

/// Query last.fm user profiles
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file location
    #[arg(short, long, default_value_os_t = default_config_path())]
    pub config: PathBuf,

    /// User to query instead of the one in the config file
    #[arg(short, long, global = true)]
    pub user: Option<String>,
}

#[derive(ClapArgs, Debug, Clone, Copy)]
pub struct Paging {
    /// Results per page
    #[arg(short, long, default_value_t = DEFAULT_LIMIT)]
    pub limit: u32,

    /// Page to fetch, starting at 1
    #[arg(short, long, default_value_t = 1)]
    pub page: u32,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Profile summary
    Info,

    /// Friends of the user
    Friends {
        /// Include each friend's most recent track
        #[arg(long)]
        recent_tracks: bool,

        #[command(flatten)]
        paging: Paging,
    },

    /// Users with similar taste
    Neighbours {
        #[command(flatten)]
        paging: Paging,
    },

    /// Most played artists
    TopArtists {
        #[arg(value_enum, long, default_value_t = ArgPeriod::Overall)]
        period: ArgPeriod,

        #[command(flatten)]
        paging: Paging,
    },

    /// Recently scrobbled tracks
    RecentTracks {
        #[command(flatten)]
        paging: Paging,
    },

    /// Loved tracks
    LovedTracks {
        #[command(flatten)]
        paging: Paging,
    },

    /// Tags the user applied most
    TopTags,

    /// Profile page url
    Url,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum ArgPeriod {
    Overall,
    #[value(name = "7day")]
    SevenDays,
    #[value(name = "1month")]
    OneMonth,
    #[value(name = "3month")]
    ThreeMonths,
    #[value(name = "6month")]
    SixMonths,
    #[value(name = "12month")]
    TwelveMonths,
}

impl From<ArgPeriod> for Period {
    fn from(value: ArgPeriod) -> Self {
        match value {
            ArgPeriod::Overall => Period::Overall,
            ArgPeriod::SevenDays => Period::SevenDays,
            ArgPeriod::OneMonth => Period::OneMonth,
            ArgPeriod::ThreeMonths => Period::ThreeMonths,
            ArgPeriod::SixMonths => Period::SixMonths,
            ArgPeriod::TwelveMonths => Period::TwelveMonths,
        }
    }
}

fn default_config_path() -> PathBuf {
    directories::ProjectDirs::from("", "", "lastfm")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("config.toml"))
}

#[cfg(test)]
mod test {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn verify() {
        Args::command().debug_assert();
    }

    #[test]
    fn top_artists() {
        let args = Args::try_parse_from([
            "lastfm", "--config", "c.toml", "top-artists", "--period", "3month", "-l", "10",
        ])
        .unwrap();
        match args.command {
            Commands::TopArtists { period, paging } => {
                assert_eq!(Period::ThreeMonths, Period::from(period));
                assert_eq!(10, paging.limit);
                assert_eq!(1, paging.page);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn user_after_subcommand() {
        let args = Args::try_parse_from(["lastfm", "friends", "--user", "mxcl", "--recent-tracks"])
            .unwrap();
        assert_eq!(Some("mxcl"), args.user.as_deref());
        assert!(matches!(
            args.command,
            Commands::Friends {
                recent_tracks: true,
                ..
            }
        ));
    }
}
