//! Halisahar Connect - municipal civic-issue portal server
//!
//! Citizens sign in with Google, report civic issues with photos, voice
//! notes and GPS, and follow their resolution. Administrators manage users,
//! complaints and ward alerts.

use anyhow::{Context, Result};
use civic_api::{
    media::{CloudinaryConfig, CloudinaryStore},
    ApiServer, ApiServerConfig,
};
use civic_auth::{AdminAllowList, GoogleIdTokenVerifier};
use clap::{Args, Parser, Subcommand};
use std::{net::SocketAddr, sync::Arc};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const VERSION: &str = concat!(
    env!("GIT_TAG"),
    " (",
    env!("GIT_HASH"),
    ", built ",
    env!("BUILD_TIME"),
    ")"
);

/// Municipal administrators granted the admin role unless `ADMIN_EMAILS` overrides them
const DEFAULT_ADMIN_EMAILS: [&str; 2] = [
    "theshubhamchowdhury01@gmail.com",
    "jyotishyadavcse@gmail.com",
];

/// Halisahar Connect - civic-issue portal API server
#[derive(Parser, Debug)]
#[command(name = "civic-portal")]
#[command(about = "Halisahar Connect - civic-issue portal API server")]
#[command(version = VERSION)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run pending migrations, then serve the REST API
    #[command(long_about = r#"
Run pending database migrations, then serve the REST API.

EXAMPLES:
  # Development with a local SQLite file
  civic-portal serve --jwt-secret dev-secret \
    --google-client-id 1234.apps.googleusercontent.com \
    --admin-emails admin@example.com \
    --cloudinary-cloud-name demo --cloudinary-api-key key --cloudinary-api-secret secret

  # Production on PostgreSQL with a one-week session lifetime
  civic-portal serve --database-url postgres://civic:pass@db/civic --session-ttl-hours 168

ENVIRONMENT VARIABLES:
  CIVIC_BIND_ADDR        Listen address
  DATABASE_URL           Database connection URL
  JWT_SECRET             Session token secret
  SESSION_TTL_HOURS      Session lifetime (optional)
  GOOGLE_CLIENT_ID       Google OAuth client id
  ADMIN_EMAILS           Comma-separated admin e-mails (default: the two
                         municipal administrator accounts)
  CLOUDINARY_CLOUD_NAME  Media store account
  CLOUDINARY_API_KEY     Media store API key
  CLOUDINARY_API_SECRET  Media store API secret
  MEDIA_FOLDER           Media folder prefix
  CORS_ORIGINS           Comma-separated allowed origins
    "#)]
    Serve(ServeArgs),

    /// Run pending database migrations and exit
    Migrate {
        /// Database connection URL (SQLite or PostgreSQL)
        #[arg(long, env = "DATABASE_URL", default_value = "sqlite://./civic.db?mode=rwc")]
        database_url: String,
    },
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Address to listen on
    #[arg(long, env = "CIVIC_BIND_ADDR", default_value = "0.0.0.0:5000")]
    bind: SocketAddr,

    /// Database connection URL (SQLite or PostgreSQL)
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://./civic.db?mode=rwc")]
    database_url: String,

    /// HMAC secret for session tokens
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    jwt_secret: String,

    /// Session lifetime in hours (tokens never expire when unset)
    #[arg(long, env = "SESSION_TTL_HOURS")]
    session_ttl_hours: Option<u32>,

    /// Google OAuth client id expected as the ID token audience
    #[arg(long, env = "GOOGLE_CLIENT_ID")]
    google_client_id: String,

    /// E-mails granted the admin role at sign-in
    #[arg(
        long,
        env = "ADMIN_EMAILS",
        value_delimiter = ',',
        default_values = DEFAULT_ADMIN_EMAILS
    )]
    admin_emails: Vec<String>,

    /// Cloudinary cloud name
    #[arg(long, env = "CLOUDINARY_CLOUD_NAME")]
    cloudinary_cloud_name: String,

    /// Cloudinary API key
    #[arg(long, env = "CLOUDINARY_API_KEY")]
    cloudinary_api_key: String,

    /// Cloudinary API secret
    #[arg(long, env = "CLOUDINARY_API_SECRET", hide_env_values = true)]
    cloudinary_api_secret: String,

    /// Folder prefix for uploaded media
    #[arg(long, env = "MEDIA_FOLDER", default_value = "halisahar-connect")]
    media_folder: String,

    /// Allowed browser origin (repeatable; any origin when omitted)
    #[arg(long = "cors-origin", env = "CORS_ORIGINS", value_delimiter = ',')]
    cors_origins: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    match cli.command {
        Commands::Serve(args) => serve(args).await,
        Commands::Migrate { database_url } => {
            let db = civic_db::connect(&database_url)
                .await
                .context("Failed to connect to database")?;
            civic_db::migrate(&db)
                .await
                .context("Failed to run migrations")?;
            Ok(())
        }
    }
}

fn setup_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .with(filter)
        .init();
}

async fn serve(args: ServeArgs) -> Result<()> {
    info!("Halisahar Connect {}", VERSION);

    let db = civic_db::connect(&args.database_url)
        .await
        .context("Failed to connect to database")?;
    civic_db::migrate(&db)
        .await
        .context("Failed to run migrations")?;

    let admins = AdminAllowList::new(&args.admin_emails);
    if admins.is_empty() {
        warn!("No admin e-mails configured; nobody can reach the admin endpoints");
    } else {
        info!("{} admin e-mail(s) configured", admins.len());
    }

    let identity = Arc::new(GoogleIdTokenVerifier::new(args.google_client_id));
    let media = Arc::new(CloudinaryStore::new(CloudinaryConfig {
        cloud_name: args.cloudinary_cloud_name,
        api_key: args.cloudinary_api_key,
        api_secret: args.cloudinary_api_secret,
        folder: args.media_folder,
    }));

    let config = ApiServerConfig {
        bind_addr: args.bind,
        cors_origins: (!args.cors_origins.is_empty()).then_some(args.cors_origins),
        jwt_secret: args.jwt_secret.into_bytes(),
        session_ttl: args
            .session_ttl_hours
            .map(|hours| chrono::Duration::hours(i64::from(hours))),
        admins,
    };

    ApiServer::new(config, db, identity, media).start().await
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUIRED: [&str; 12] = [
        "civic-portal",
        "serve",
        "--jwt-secret",
        "s3cret",
        "--google-client-id",
        "client.apps.googleusercontent.com",
        "--cloudinary-cloud-name",
        "demo",
        "--cloudinary-api-key",
        "key",
        "--cloudinary-api-secret",
        "secret",
    ];

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::try_parse_from(REQUIRED).unwrap();
        let Commands::Serve(args) = cli.command else {
            panic!("expected serve");
        };

        assert_eq!(args.bind, "0.0.0.0:5000".parse::<SocketAddr>().unwrap());
        assert_eq!(args.media_folder, "halisahar-connect");
        assert!(args.session_ttl_hours.is_none());
        assert!(args.cors_origins.is_empty());
        assert_eq!(args.admin_emails, DEFAULT_ADMIN_EMAILS);
    }

    #[test]
    fn test_admin_emails_split_on_commas() {
        let mut argv = REQUIRED.to_vec();
        argv.extend(["--admin-emails", "a@example.com,b@example.com", "-v"]);

        let cli = Cli::try_parse_from(argv).unwrap();
        assert!(cli.verbose);
        let Commands::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.admin_emails, vec!["a@example.com", "b@example.com"]);
    }

    #[test]
    fn test_serve_requires_secrets() {
        assert!(Cli::try_parse_from(["civic-portal", "serve"]).is_err());
    }
}
