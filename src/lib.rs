use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use std::sync::Arc;

use routes::virtual_accounts::virtual_account_route_group;
use utils::flutterwave::VirtualAccountProvider;

pub mod dto;
pub mod handlers;
pub mod middlewares;
pub mod routes;
pub mod service;
pub mod utils;

/// Request bodies above this fail the body-parse step with a JSON 500.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn VirtualAccountProvider>,
}

pub async fn health_checker() -> impl Responder {
    HttpResponse::Ok()
        .json(json!({ "status": "success", "message": "Welcome to VIRTUAL ACCOUNT SERVICE" }))
}

pub async fn not_found() -> impl Responder {
    HttpResponse::NotFound().json(
        json!({ "status": "error", "message": "Oops! We can't find the url you are looking for" }),
    )
}

/// Registers every route of the service; middleware is wrapped by the caller.
pub fn app_config(conf: &mut web::ServiceConfig) {
    conf.app_data(web::PayloadConfig::new(MAX_BODY_BYTES))
        .route("/", web::get().to(health_checker))
        .configure(virtual_account_route_group)
        .default_service(web::route().to(not_found));
}
