use std::sync::Arc;

use salvo::{listener::TcpListener, Server};

use config::env_var;
use infra::{
    database::{connection, repository::PgUserRepository},
    router,
};

mod app;
mod base;
mod config;
mod domain;
mod error;
mod infra;

#[tokio::main]
async fn main() {
    let env = env_var::get();
    tracing_subscriber::fmt().with_max_level(env.log_level).init();

    let pool = connection::create_sqlx_pool(env)
        .await
        .expect("Expect to create a database pool with a open connection");
    connection::apply_schema(&pool)
        .await
        .expect("Expect to apply the database schema");
    tracing::info!(
        "connected to database {} at {}:{}",
        env.database_name,
        env.database_host,
        env.database_port
    );

    let repository = Arc::new(PgUserRepository::new(pool.clone()));

    let address = format!("0.0.0.0:{}", env.port);
    let listener = TcpListener::bind(&address);
    tracing::info!("listening on {address}");
    Server::new(listener)
        .serve_with_graceful_shutdown(router::app(repository), shutdown_signal())
        .await;

    tracing::info!("shutting down, closing database pool");
    pool.close().await;
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl-c: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!("failed to listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
