use super::handlers;
use crate::config::Config;
use crate::gameroom::SessionManager;
use actix_cors::Cors;
use actix_web::App;
use actix_web::HttpServer;
use actix_web::middleware::Logger;
use actix_web::web;

pub struct Server;

impl Server {
    pub async fn run(config: Config) -> Result<(), std::io::Error> {
        log::info!("metadata store at {}", config.database_url);
        log::info!("cache at {}", config.cache_url);
        let bind = config.bind_addr.clone();
        let origins = config.cors_origins.clone();
        let manager = web::Data::new(SessionManager::new(config));
        log::info!("starting table server on {}", bind);
        HttpServer::new(move || {
            App::new()
                .wrap(Logger::new("%r %s %Ts"))
                .wrap(Self::cors(&origins))
                .app_data(manager.clone())
                .route("/health", web::get().to(handlers::health))
                .route("/ws", web::get().to(handlers::ws))
                .service(
                    web::scope("/api")
                        .route("/tables", web::get().to(handlers::tables))
                        .route("/tables", web::post().to(handlers::create_table))
                        .route("/tables/{table_id}", web::get().to(handlers::table)),
                )
        })
        .workers(4)
        .bind(bind)?
        .run()
        .await
    }

    /// `*` serves any origin without credentials; a comma-separated list
    /// allows exactly those origins with credentialed CORS
    fn cors(origins: &str) -> Cors {
        match origins {
            "*" => Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header(),
            list => list.split(',').map(str::trim).fold(
                Cors::default()
                    .allow_any_method()
                    .allow_any_header()
                    .supports_credentials(),
                |cors, origin| cors.allowed_origin(origin),
            ),
        }
    }
}
