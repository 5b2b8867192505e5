use anyhow::Result;
use clap::Parser;
use coursera_podcast::core::catalog::CATALOG_URL;
use coursera_podcast::core::coursera::{Coursera, Credentials};
use coursera_podcast::error::CourseraError;
use coursera_podcast::feed::rss::course_feed;
use coursera_podcast::feed::table::{course_table, lecture_table};
use coursera_podcast::utils::input::input_password_trim;
use std::time::Duration;

/// Republish the video lectures of a course as a podcast feed.
///
/// With no course argument, prints the full course table. With a course,
/// prints its lecture table, or the podcast RSS with --xml.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Course short name or instance name
    course: Option<String>,

    /// Output podcast RSS XML instead of a table
    #[arg(long)]
    xml: bool,

    /// Account email; needed for courses without a public preview
    #[arg(short, long)]
    username: Option<String>,

    /// Account password; prompted for when a username is given without one
    #[arg(short, long)]
    password: Option<String>,

    /// Catalog endpoint URL or local JSON file
    #[arg(long, default_value = CATALOG_URL)]
    catalog: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Verbose mode
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let coursera = Coursera::new(&args.catalog, Duration::from_secs(args.timeout));
    let catalog = coursera.load_catalog().await?;

    let Some(identifier) = args.course else {
        println!("{}", course_table(&catalog));
        return Ok(());
    };

    let (course, instance) = catalog.resolve(&identifier)?;

    let credentials = args.username.map(|username| {
        let password = args
            .password
            .unwrap_or_else(|| input_password_trim("Password: "));
        Credentials { username, password }
    });

    match coursera
        .lectures_for(course, instance, credentials.as_ref())
        .await
    {
        Ok(lectures) => {
            if args.xml {
                println!("{}", course_feed(course, instance, &lectures));
            } else {
                println!("{}", lecture_table(&lectures));
            }
            Ok(())
        }
        Err(CourseraError::CredentialsRequired) => {
            eprintln!(
                "No preview for course {}; can't continue without username and password",
                identifier
            );
            std::process::exit(2);
        }
        Err(err) => Err(err.into()),
    }
}
