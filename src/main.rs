use std::{io, path::PathBuf, sync::Arc, time::Duration};

use clap::{Parser, Subcommand};
use log::{debug, info, warn};
use tokio::io::{AsyncBufReadExt, BufReader};

use github_showcase::{
    CarouselSession, CarouselSurface, DEFAULT_GITHUB_LOGIN, DisabledRepositoryCache,
    FileRepositoryCache, GITHUB_GRAPHQL_ENDPOINT, GITHUB_REST_ENDPOINT, GitHubFetcher, Repository,
    RepositoryCache, RepositoryPipeline, RepositoryProvider, SessionCommand, ShowcaseConfig,
    StdResult, TerminalSurface,
};

/// Command line arguments for the GitHub showcase
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Account whose repositories are showcased
    #[arg(short, long, env = "GITHUB_LOGIN", default_value = DEFAULT_GITHUB_LOGIN)]
    login: String,

    /// Token sent as bearer authorization to the GitHub APIs
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: Option<String>,

    /// How long the fetched repositories stay cached, in milliseconds
    #[arg(long, env = "CACHE_DURATION", default_value_t = 600_000)]
    cache_duration_ms: u64,

    /// Directory holding the cache (defaults to the platform cache directory)
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Disable the cache
    #[arg(long)]
    no_cache: bool,

    /// Duration of a carousel transition, in milliseconds
    #[arg(long, default_value_t = 500)]
    transition_ms: u64,

    /// GitHub GraphQL endpoint
    #[arg(long, default_value = GITHUB_GRAPHQL_ENDPOINT)]
    graphql_endpoint: String,

    /// GitHub REST endpoint
    #[arg(long, default_value = GITHUB_REST_ENDPOINT)]
    rest_endpoint: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Browse the repositories in an interactive carousel (default)
    Show,

    /// Print the showcased repositories
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove the cached repositories
    ClearCache,
}

impl From<&Args> for ShowcaseConfig {
    fn from(args: &Args) -> Self {
        let defaults = ShowcaseConfig::default();
        Self {
            github_login: args.login.to_owned(),
            github_token: args
                .github_token
                .to_owned()
                .filter(|github_token| !github_token.is_empty()),
            graphql_endpoint: args.graphql_endpoint.to_owned(),
            rest_endpoint: args.rest_endpoint.to_owned(),
            cache_duration: Duration::from_millis(args.cache_duration_ms),
            cache_dir: if args.no_cache {
                None
            } else {
                args.cache_dir.to_owned().or(defaults.cache_dir)
            },
            transition_duration: Duration::from_millis(args.transition_ms),
            ..defaults
        }
    }
}

#[tokio::main]
async fn main() -> StdResult<()> {
    env_logger::init();
    let args = Args::parse();
    let config = ShowcaseConfig::from(&args);
    debug!(
        "Configuration: login={}, cache={:?}",
        config.github_login,
        config.cache_path()
    );

    let cache = build_cache(&config);
    match args.command.unwrap_or(Commands::Show) {
        Commands::ClearCache => {
            cache.clear().await;
            info!("Cache cleared");
        }
        Commands::List { json } => {
            let provider = build_pipeline(&config, cache)?;
            match provider.fetch_repositories().await {
                Ok(repositories) => print_repositories(&repositories, json)?,
                Err(e) => {
                    warn!("{e}");
                    show_unavailable(&config);
                }
            }
        }
        Commands::Show => {
            let provider = build_pipeline(&config, cache)?;
            let surface = TerminalSurface::new(io::stdout());
            if let Some(session) = CarouselSession::load(
                provider,
                surface,
                &config.profile_url(),
                config.transition_duration,
            )
            .await
            {
                run_session(session).await?;
            }
        }
    }

    Ok(())
}

fn build_cache(config: &ShowcaseConfig) -> Arc<dyn RepositoryCache> {
    match config.cache_path() {
        Some(cache_path) => Arc::new(FileRepositoryCache::new(
            cache_path,
            config.cache_duration,
        )),
        None => Arc::new(DisabledRepositoryCache),
    }
}

fn build_pipeline(
    config: &ShowcaseConfig,
    cache: Arc<dyn RepositoryCache>,
) -> StdResult<Arc<dyn RepositoryProvider>> {
    let fetcher = Arc::new(GitHubFetcher::try_new(
        &config.graphql_endpoint,
        &config.rest_endpoint,
        config.github_token.as_deref(),
    )?);

    Ok(Arc::new(RepositoryPipeline::new(fetcher, cache, config)))
}

fn print_repositories(repositories: &[Repository], json: bool) -> StdResult<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(repositories)?);
    } else {
        for repository in repositories {
            println!("{repository}");
        }
    }

    Ok(())
}

fn show_unavailable(config: &ShowcaseConfig) {
    let mut surface = TerminalSurface::new(io::stdout());
    if let Err(e) = surface.show_unavailable(&config.profile_url()) {
        warn!("Failed to display the fallback panel: {e}");
    }
}

async fn run_session(mut session: CarouselSession<TerminalSurface<io::Stdout>>) -> StdResult<()> {
    println!("Commands: n(ext), p(rev), <position>, r(esize), o(pen), q(uit)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let Some(command) = SessionCommand::parse(&line) else {
            println!("Unknown command: {}", line.trim());
            continue;
        };
        if command == SessionCommand::Quit {
            break;
        }
        if let Some(link) = session.handle(command, std::time::Instant::now()) {
            open_link(&link);
        }
    }

    Ok(())
}

fn open_link(link: &str) {
    info!("Opening {link}");
    if let Err(e) = open::that(link) {
        warn!("Failed to open {link}: {e}");
        println!("{link}");
    }
}
