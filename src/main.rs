use actix_web::web::{to, Data};
use actix_web::{middleware::Logger, App, HttpServer};
use sqlx::postgres::PgPoolOptions;

use quizboard::config::Config;
use quizboard::database::sqlx::PgSqlxManager;
use quizboard::handlers;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;
    let manager = PgSqlxManager::new(pool);
    manager.migrate().await?;
    log::info!("migrations applied, listening on {}:{}", config.host, config.port);

    let manager = Data::new(manager);
    let random_size = Data::new(config.random_quiz_size);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(manager.clone())
            .app_data(random_size.clone())
            .configure(handlers::configure::<PgSqlxManager>)
            .default_service(to(handlers::not_found))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;
    Ok(())
}
