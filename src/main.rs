use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vireo::app::create::{Alert, CreateScreen};
use vireo::app::session_file::{SessionFile, StoredSession};
use vireo::config::Config;
use vireo::models::{Asset, Post};
use vireo::remote::Client;
use vireo::services::{posts, users};

#[derive(Parser)]
#[command(author, version, about = "Vireo - share AI-generated videos")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create an account and sign in
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        username: String,
    },
    /// Sign in with an existing account
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Delete the current session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List every post, newest first
    Feed,
    /// Show the seven most recent posts
    Latest,
    /// Search posts by title
    Search { term: String },
    /// List your own posts
    Mine,
    /// Upload a video with its thumbnail and publish it
    Publish {
        #[arg(long)]
        title: String,
        /// The prompt used to generate the video
        #[arg(long)]
        prompt: String,
        #[arg(long)]
        video: PathBuf,
        #[arg(long)]
        thumbnail: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = Config::from_env()?;
    let client = Client::new(config);

    let session_file = SessionFile::default_path().context("cannot locate a home directory")?;
    if let Some(stored) = session_file.load() {
        client.set_session(stored.secret);
    }

    match args.command {
        Command::Register {
            email,
            password,
            username,
        } => {
            let profile = users::register(&client, &email, &password, &username).await?;
            persist_session(&client, &session_file)?;
            println!("registered {} <{}>", profile.username, profile.email);
        }
        Command::Login { email, password } => {
            let session = users::sign_in(&client, &email, &password).await?;
            session_file.save(&StoredSession::new(session.secret))?;
            println!("signed in until {}", session.expires_at.format("%Y-%m-%d %H:%M"));
        }
        Command::Logout => {
            users::sign_out(&client).await?;
            session_file.clear()?;
            println!("signed out");
        }
        Command::Whoami => match users::current_user(&client).await? {
            Some(profile) => println!("{} <{}>", profile.username, profile.email),
            None => println!("not signed in"),
        },
        Command::Feed => print_posts(&posts::all_posts(&client).await?),
        Command::Latest => print_posts(&posts::latest_posts(&client).await?),
        Command::Search { term } => print_posts(&posts::search_posts(&client, &term).await?),
        Command::Mine => {
            let Some(profile) = users::current_user(&client).await? else {
                bail!("sign in first");
            };
            print_posts(&posts::user_posts(&client, &profile.id).await?);
        }
        Command::Publish {
            title,
            prompt,
            video,
            thumbnail,
        } => {
            let Some(profile) = users::current_user(&client).await? else {
                bail!("sign in first");
            };
            let mut screen = CreateScreen::new();
            screen.form.title = title;
            screen.form.prompt = prompt;
            screen.form.video = Some(Asset::from_path(video)?);
            screen.form.thumbnail = Some(Asset::from_path(thumbnail)?);
            match screen.submit(&client, &profile.id).await {
                Alert::Success(message) => println!("{message}"),
                Alert::Error(message) => bail!(message),
            }
        }
    }

    Ok(())
}

fn persist_session(client: &Client, session_file: &SessionFile) -> Result<()> {
    if let Some(secret) = client.session_secret() {
        session_file.save(&StoredSession::new(secret))?;
    }
    Ok(())
}

fn print_posts(posts: &[Post]) {
    if posts.is_empty() {
        println!("no posts");
        return;
    }
    for post in posts {
        println!(
            "{}  {}  by {}",
            post.created_at.format("%Y-%m-%d %H:%M"),
            post.title,
            post.creator,
        );
    }
}
