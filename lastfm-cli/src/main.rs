use std::process;

use anyhow::Result;
use clap::Parser;
use lastfm::{Reply, ResponseCache, UserList, UserProfile, WsClient};
use reqwest::Client;
use tracing_subscriber::EnvFilter;

use crate::args::{Args, Commands};
use crate::config::Config;

mod args;
mod config;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run().await {
        Ok(_) => process::exit(0),
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1);
        }
    }
}

async fn run() -> Result<()> {
    let args = Args::parse();
    let conf = Config::read(&args.config)?;
    let session = conf.session();

    let client = Client::new();
    let cache = ResponseCache::new();
    let ws = WsClient::new(&client, &session, &cache);

    let user = match &args.user {
        Some(name) => UserProfile::new(name.clone()),
        None => UserProfile::from_session(&session),
    };
    tracing::debug!(user = user.name(), command = ?args.command, "running");

    match args.command {
        Commands::Info => {
            let reply = UserProfile::get_info(&ws, user.name()).await?;
            let user = UserProfile::from_info_reply(&reply)?;
            println!("{}", user.info_string());
            if let Some(registered) = user.date_registered() {
                println!("Registered {}", registered.date());
            }
            println!("{}", user.www(&session)?);
        }
        Commands::Friends {
            recent_tracks,
            paging,
        } => {
            let reply = user
                .get_friends(&ws, recent_tracks, paging.limit, paging.page)
                .await?;
            reply.check()?;
            let friends = UserList::list(&reply);
            for friend in friends.iter() {
                println!("{}", friend.info_string());
            }
            println!(
                "Page {} of {}, {} friends",
                friends.page, friends.total_pages, friends.total
            );
        }
        Commands::Neighbours { paging } => {
            let reply = user.get_neighbours(&ws, paging.limit, paging.page).await?;
            reply.check()?;
            for neighbour in UserList::list(&reply) {
                println!("{:.3} {}", neighbour.match_score(), neighbour.name());
            }
        }
        Commands::TopArtists { period, paging } => {
            let reply = user
                .get_top_artists(&ws, period.into(), paging.limit, paging.page)
                .await?;
            print_body(reply)?;
        }
        Commands::RecentTracks { paging } => {
            let reply = user
                .get_recent_tracks(&ws, paging.limit, paging.page)
                .await?;
            print_body(reply)?;
        }
        Commands::LovedTracks { paging } => {
            let reply = user
                .get_loved_tracks(&ws, paging.limit, paging.page)
                .await?;
            print_body(reply)?;
        }
        Commands::TopTags => {
            let reply = user.get_top_tags(&ws).await?;
            print_body(reply)?;
        }
        Commands::Url => {
            println!("{}", user.www(&session)?);
        }
    }

    Ok(())
}

/// Endpoints without a typed model are printed as the raw reply
fn print_body(reply: Reply) -> Result<()> {
    reply.check()?;
    println!("{}", reply.into_body());
    Ok(())
}
