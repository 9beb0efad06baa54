use crate::{
    cmd::connect_database,
    modules::{
        catalog::Catalog,
        database::{PgContributorStore, SharedContributorStore},
        handlers::{
            badge::badges,
            leaderboard::leaderboard,
            liveness, readiness,
            registration::{register, verify_otp},
            repository::{list_issues, list_repositories},
            user::user_summary,
        },
        migration::MIGRATOR,
        registration::RegistrationClient,
        session::{PgSessionStore, Sessions, DEFAULT_SESSION_COOKIE_NAME},
    },
};
use anyhow::{Context, Result};
use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing, Router, Server,
};
use bountyboard_libs::leaderboard::{AvatarUrlTemplate, DEFAULT_AVATAR_URL_TEMPLATE};
use clap::Args;
use std::{env, net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

#[derive(Debug, Args)]
pub struct ServerArgs {
    #[arg(long)]
    port: Option<u16>,
    /// Apply pending migrations before accepting requests.
    #[arg(long)]
    migrate: bool,
}

/// Everything the handlers pull out of request extensions.
pub struct RouterContext {
    pub store: SharedContributorStore,
    pub sessions: Sessions,
    pub catalog: Arc<Catalog>,
    pub avatar: Arc<AvatarUrlTemplate>,
    pub registration: Option<Arc<RegistrationClient>>,
}

pub async fn run(args: ServerArgs) -> Result<()> {
    let pool = connect_database().await?;
    if args.migrate {
        MIGRATOR.run(&pool).await.with_context(|| {
            let message = "failed to apply database migrations";
            tracing::error!(message);
            message
        })?;
    }

    let cookie_name = env::var("SESSION_COOKIE_NAME").unwrap_or_else(|_| {
        tracing::info!(
            "SESSION_COOKIE_NAME environment variable is not set. Default value `{}` will be used.",
            DEFAULT_SESSION_COOKIE_NAME
        );
        String::from(DEFAULT_SESSION_COOKIE_NAME)
    });
    let avatar = match env::var("AVATAR_URL_TEMPLATE") {
        Ok(template) => AvatarUrlTemplate::new(template),
        Err(_) => {
            tracing::info!(
                "AVATAR_URL_TEMPLATE environment variable is not set. Default value `{}` will be used.",
                DEFAULT_AVATAR_URL_TEMPLATE
            );
            AvatarUrlTemplate::default()
        }
    };
    let registration = match env::var("REGISTRATION_API_URL") {
        Ok(url) => {
            let client = RegistrationClient::new(&url).with_context(|| {
                let message = format!("couldn't create registration client for {}", url);
                tracing::error!(message);
                message
            })?;
            Some(Arc::new(client))
        }
        Err(_) => {
            tracing::warn!("REGISTRATION_API_URL environment variable is not set. Registration endpoints will answer 503.");
            None
        }
    };

    let catalog = Catalog::embedded().with_context(|| {
        let message = "embedded catalog fixtures are invalid";
        tracing::error!(message);
        message
    })?;

    let context = RouterContext {
        store: Arc::new(PgContributorStore::new(pool.clone())),
        sessions: Sessions::new(Arc::new(PgSessionStore::new(pool)), &cookie_name),
        catalog: Arc::new(catalog),
        avatar: Arc::new(avatar),
        registration,
    };

    let mut app = create_router(context);
    if let Ok(origin) = env::var("FRONTEND_ORIGIN_URL") {
        let origin: HeaderValue = origin.parse().with_context(|| {
            let message = format!("FRONTEND_ORIGIN_URL {} is not a valid origin", origin);
            tracing::error!(message);
            message
        })?;
        app = app.layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::exact(origin))
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([CONTENT_TYPE, AUTHORIZATION])
                .allow_credentials(true),
        );
    }

    let port = match args.port {
        Some(port) => port,
        None => {
            tracing::warn!("API server will be launched at default port number 8000");
            8000u16
        }
    };
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Server start at port {}", port);
    Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .with_context(|| {
            let message = "API server stopped unexpectedly";
            tracing::error!(message);
            message
        })?;

    Ok(())
}

pub fn create_router(context: RouterContext) -> Router {
    let router = Router::new()
        .route("/api/user", routing::get(user_summary))
        .route("/api/leaderboard", routing::get(leaderboard))
        .route("/api/repos", routing::get(list_repositories))
        .route("/api/repos/:repo_id/issues", routing::get(list_issues))
        .route("/api/badges", routing::get(badges))
        .route("/api/register", routing::post(register))
        .route("/api/verify-otp", routing::post(verify_otp))
        .route("/api/liveness", routing::get(liveness))
        .route("/api/readiness", routing::get(readiness))
        .layer(Extension(context.store))
        .layer(Extension(context.sessions))
        .layer(Extension(context.catalog))
        .layer(Extension(context.avatar));

    let router = match context.registration {
        Some(client) => router.layer(Extension(client)),
        None => router,
    };

    router.layer(TraceLayer::new_for_http())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler.");
    };

    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received, draining connections");
}
