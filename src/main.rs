// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config, database, shared services and start HTTP server

mod config;
mod db;
mod errors;
mod handlers;
mod models;
mod services;

use actix_web::{middleware::Logger, web, App, HttpServer};
use config::Config;
use dotenv::dotenv;
use services::{
    mailer_from_config, start_cleanup_task, Mailer, OtpRateLimiter, ResponseCache, StripeClient,
};
use std::io;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Load configuration
    let config = Config::from_env();

    // 3. Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        let log_level = if !config.log_level.is_empty() {
            &config.log_level
        } else {
            "info,actix_web=info,sqlx=warn"
        };
        std::env::set_var("RUST_LOG", log_level);
    }
    env_logger::init();

    if let Err(e) = config.validate() {
        log::error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    log::info!("Starting travelspot-api...");
    log::info!("Environment: {}", config.environment);
    log::info!(
        "Server Address: {}:{}",
        config.server_address,
        config.server_port
    );

    // 4. Initialize database connection pool
    let pool = match config::init_db_pool(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    // 5. Shared services
    let mailer: Arc<dyn Mailer> = Arc::from(mailer_from_config(&config));
    let stripe = web::Data::new(StripeClient::from_config(&config));
    let limiter = Arc::new(OtpRateLimiter::new(config.otp_requests_per_minute));

    let cache = Arc::new(ResponseCache::new(config.cache_ttl_secs));
    log::info!("Initialized response cache (TTL: {}s)", config.cache_ttl_secs);

    start_cleanup_task(cache.clone(), limiter.clone(), 300);
    log::info!("Started cache cleanup task (interval: 5 minutes)");

    // 6. Start HTTP server
    let server_addr = format!("{}:{}", config.server_address, config.server_port);
    let pool = web::Data::new(pool);
    let config = web::Data::new(config);
    let mailer = web::Data::from(mailer);
    let limiter = web::Data::from(limiter);
    let cache = web::Data::from(cache);

    HttpServer::new(move || {
        App::new()
            // Application state
            .app_data(pool.clone())
            .app_data(config.clone())
            .app_data(mailer.clone())
            .app_data(stripe.clone())
            .app_data(limiter.clone())
            .app_data(cache.clone())
            // Middleware
            .wrap(Logger::default())
            .wrap(actix_web::middleware::Compress::default())
            // Routes
            .configure(handlers::health_config)
            .configure(handlers::api_config)
    })
    .bind(&server_addr)?
    .run()
    .await
}
