use std::error::Error;
use std::sync::Arc;

use log::{info, initialize_logger};

use quotes::config::{Config, StoreConfig};
use quotes::db::{memory::MemoryDb, Db, PgDb};
use quotes::environment::{random_draw, Environment};
use quotes::routes;
use quotes::templates::Templates;
use quotes::urls::Urls;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();

    let logger = initialize_logger();
    let config = Config::from_env()?;

    info!(logger, "Starting..."; "port" => config.port, "base_url" => &config.base_url);
    let logger = Arc::new(logger);

    let db: Arc<dyn Db + Send + Sync> = match &config.store {
        StoreConfig::Postgres { connection_string } => {
            info!(logger, "Creating database pool...");
            let pool = sqlx::Pool::connect(connection_string).await?;
            Arc::new(PgDb::new(pool))
        }
        StoreConfig::InMemory => {
            info!(logger, "Keeping quotes in memory");
            Arc::new(MemoryDb::new())
        }
    };

    let templates = match &config.template_dir {
        Some(dir) => {
            info!(logger, "Loading templates..."; "dir" => %dir.display(), "reload" => config.reload_templates);
            Templates::from_directory(dir, config.reload_templates)?
        }
        None => Templates::embedded()?,
    };

    let urls = Urls::new(&config.base_url)?;

    let environment = Environment::new(
        logger.clone(),
        db,
        Arc::new(urls),
        Arc::new(templates),
        random_draw(),
    );

    let site = routes::make_site(environment);

    let (_, server) =
        warp::serve(site).bind_with_graceful_shutdown(([0, 0, 0, 0], config.port), async {
            tokio::signal::ctrl_c().await.ok();
        });

    server.await;

    info!(logger, "Exiting gracefully...");

    Ok(())
}
