use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{App, HttpServer, middleware, web};
use dotenvy::dotenv;

use fieldsales::config::ServerConfig;
use fieldsales::db::establish_connection_pool;
use fieldsales::repository::DieselRepository;
use fieldsales::routes;
use fieldsales::services::auth::bootstrap_admin;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok(); // Load .env file

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);

    if let Some(admin) = &config.bootstrap_admin {
        match bootstrap_admin(&repo, admin) {
            Ok(Some(user)) => log::info!("Created administrator {}", user.mobile_no),
            Ok(None) => {}
            Err(e) => {
                log::error!("Failed to create the first administrator: {e}");
                std::process::exit(1);
            }
        }
    }

    let cookie_key = config.cookie_key();
    let address = config.address.clone();
    let port = config.port;
    let config = web::Data::new(config);
    let repo = web::Data::new(repo);

    log::info!("Listening on {address}:{port}");

    HttpServer::new(move || {
        App::new()
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), cookie_key.clone())
                    .cookie_secure(config.cookie_secure)
                    .cookie_domain(Some(format!(".{}", config.domain)))
                    .build(),
            )
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(web::scope("/api/v1").configure(routes::configure))
            .app_data(repo.clone())
            .app_data(config.clone())
    })
    .bind((address, port))?
    .run()
    .await
}
