use std::sync::Arc;

use anyhow::Context as _;

use trackline_api::app::{build_app, AppContext};
use trackline_api::config::Config;
use trackline_auth::TokenSigner;
use trackline_notify::{NoopNotifier, Notifier, SmtpNotifier};
use trackline_service::{IssueService, ProjectService, UserService};
use trackline_store::PgStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    trackline_observability::init();

    let config = Config::load()?;

    let store = Arc::new(
        PgStore::connect(&config.database.url)
            .await
            .context("connecting to postgres")?,
    );
    store.ensure_schema().await.context("applying schema")?;

    let tokens = Arc::new(TokenSigner::new(
        &config.auth.secret_key,
        config.auth.access_token_expire_minutes,
    ));

    let notifier: Arc<dyn Notifier> = match &config.smtp {
        Some(smtp) => Arc::new(
            SmtpNotifier::new(&smtp.host, smtp.port, &smtp.sender)
                .context("building smtp notifier")?,
        ),
        None => {
            tracing::warn!("no [smtp] section configured; status-change mail disabled");
            Arc::new(NoopNotifier)
        }
    };

    let ctx = AppContext {
        users: Arc::new(UserService::new(store.clone(), tokens)),
        projects: Arc::new(ProjectService::new(store.clone(), store.clone())),
        issues: Arc::new(IssueService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            notifier,
        )),
    };

    let app = build_app(ctx);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
