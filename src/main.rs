use actix_web::{web, App, HttpServer};
use actix_web_lab::middleware::from_fn;
use anyhow::Context;
use dotenv::dotenv;
use std::{io, sync::Arc};
use tracing::{info, warn};
use tracing_actix_web::TracingLogger;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::LogTracer;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Registry};

use virtual_account::middlewares::security_headers::security_headers_middleware;
use virtual_account::utils::config::EnvConfig;
use virtual_account::utils::flutterwave::{FlutterwaveClient, FLUTTERWAVE_SECRET_KEY};
use virtual_account::{app_config, AppState};

#[actix_web::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenv().ok();
    LogTracer::init().context("Unable to setup log tracer")?;

    let env = EnvConfig::init()?;
    let (non_blocking_writer, _guard) = tracing_appender::non_blocking(io::stdout());
    let bunyan_formatting_layer = BunyanFormattingLayer::new(env.app_name.clone(), non_blocking_writer);
    let subscriber = Registry::default()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("INFO")))
        .with(JsonStorageLayer)
        .with(bunyan_formatting_layer);

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install `tracing` subscriber.")?;

    if !FlutterwaveClient::secret_is_configured() {
        warn!("{} is not set, virtual account requests will fail", FLUTTERWAVE_SECRET_KEY);
    }

    let socket_address = env.socket_address();
    let app_state = AppState {
        provider: Arc::new(FlutterwaveClient::from_env(&env)),
    };

    info!("Starting server on {}", socket_address);
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .configure(app_config)
            .wrap(from_fn(security_headers_middleware))
            .wrap(TracingLogger::default())
    })
    .bind(&socket_address)?
    .run()
    .await?;

    Ok(())
}
