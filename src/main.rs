use clap::Parser;
use cramdeck::db::Db;
use cramdeck::services::auth::{AuthService, GithubOAuth};
use cramdeck::AppState;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Postgres connection URL.
    #[clap(env)]
    database_url: String,

    /// GitHub OAuth application client id.
    #[clap(env)]
    github_client_id: String,

    /// GitHub OAuth application client secret.
    #[clap(env)]
    github_client_secret: String,

    /// Upstream URL serving the legacy question JSON array.
    #[arg(long, env, default_value = "http://localhost:4000/questions")]
    questions_upstream: String,

    /// The address to bind to.
    #[arg(short, long, env, default_value = "127.0.0.1:3030")]
    address: String,

    /// Mark session cookies as Secure (behind TLS).
    #[arg(long, env, default_value_t = false)]
    secure_cookies: bool,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "tracing=info,axum=debug,cramdeck=debug".to_owned());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
        .init();

    let args = Args::parse();

    let db = Db::new(&args.database_url).await?;
    let auth = AuthService::new(
        db.clone(),
        GithubOAuth::new(args.github_client_id, args.github_client_secret),
    );

    let app = cramdeck::router(AppState {
        db,
        auth,
        secure_cookies: args.secure_cookies,
        questions_upstream: args.questions_upstream,
        http: reqwest::Client::new(),
    });

    let listener = tokio::net::TcpListener::bind(&args.address).await?;
    tracing::info!("listening on {}", args.address);
    axum::serve(listener, app).await?;

    Ok(())
}
