use std::net::TcpListener;
use std::sync::Arc;

use actix_web::dev::Server;
use actix_web::{App, HttpServer, web};
use anyhow::Context;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing_actix_web::TracingLogger;

use crate::configuration::{Configuration, DatabaseConfigs};
use crate::id_generator::CommentIdGenerator;
use crate::repository::{PgCommentStore, PgIdentityResolver};
use crate::routes::{comment_routes, health_check, reject_malformed_request};
use crate::services::CommentService;

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    /// Builds the application backed by Postgres.
    pub async fn build(config: Configuration) -> Result<Self, anyhow::Error> {
        let connection_pool = get_connection_pool(&config.database);

        let service = CommentService::new(
            Arc::new(PgIdentityResolver::new(connection_pool.clone())),
            Arc::new(PgCommentStore::new(connection_pool)),
            CommentIdGenerator::new(config.application.comment_id_salt.clone()),
        );

        Self::build_with_service(config, service).await
    }

    /// Builds the application around an already wired service, e.g. one
    /// backed by the in-memory store.
    pub async fn build_with_service(
        config: Configuration,
        service: CommentService,
    ) -> Result<Self, anyhow::Error> {
        let address = format!("{}:{}", config.application.host, config.application.port);
        let listener = TcpListener::bind(address)
            .with_context(|| "Failed to bind TCP listener for application")?;
        let port = listener
            .local_addr()
            .with_context(|| "Failed to read local address of TCP listener")?
            .port();
        let server = run(listener, service).context("Failed to run Actix web server")?;

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), anyhow::Error> {
        self.server.await.context("Server stopped with an error")
    }
}

pub fn get_connection_pool(config: &DatabaseConfigs) -> PgPool {
    PgPoolOptions::new().connect_lazy_with(config.connect_options())
}

fn run(tcp_listener: TcpListener, service: CommentService) -> Result<Server, anyhow::Error> {
    let service = web::Data::new(service);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(
                web::JsonConfig::default()
                    .error_handler(|err, req| reject_malformed_request(err, req)),
            )
            .app_data(
                web::QueryConfig::default()
                    .error_handler(|err, req| reject_malformed_request(err, req)),
            )
            .configure(configure_routes)
            .app_data(service.clone())
    })
    .listen(tcp_listener)
    .with_context(|| "Failed to bind Actix server to TCP listener")?
    .run();

    Ok(server)
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health_check", web::get().to(health_check))
        .service(web::scope("/v1").service(web::scope("/comments").configure(comment_routes)));
}
