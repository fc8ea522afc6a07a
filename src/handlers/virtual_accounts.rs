use actix_web::{
    http::{header, StatusCode},
    web, Error as ActixWebError, HttpResponse, Responder,
};
use serde_json::json;
use tracing::{error, instrument};

use crate::middlewares::security_headers::NO_STORE_PRIVATE;
use crate::service::virtual_accounts::{create_virtual_account as create, VirtualAccountError};
use crate::AppState;

pub async fn method_not_allowed() -> impl Responder {
    HttpResponse::MethodNotAllowed()
        .json(json!({ "status": "error", "message": "Method not allowed" }))
}

fn internal_server_error() -> HttpResponse {
    HttpResponse::InternalServerError()
        .json(json!({ "status": "error", "message": "Internal server error" }))
}

// An unreadable body (oversized, broken stream) is a body-parse failure.
#[instrument(skip(body, app_state))]
pub async fn create_virtual_account(
    body: Result<web::Bytes, ActixWebError>,
    app_state: web::Data<AppState>,
) -> impl Responder {
    let body = match body {
        Ok(body) => body,
        Err(err) => {
            error!("Virtual account creation error: failed to read body: {}", err);
            return internal_server_error();
        }
    };

    let response = match create(&body, app_state.provider.as_ref()).await {
        Ok(response) => response,
        Err(VirtualAccountError::Validation(failure)) => {
            return HttpResponse::BadRequest()
                .json(json!({ "status": "error", "message": failure.to_string() }));
        }
        Err(err) if err.is_timeout() => {
            error!("Virtual account creation error: {:?}", err);
            return HttpResponse::RequestTimeout()
                .json(json!({ "status": "error", "message": "Request timeout" }));
        }
        Err(err) => {
            error!("Virtual account creation error: {:?}", err);
            return internal_server_error();
        }
    };

    let status = match StatusCode::from_u16(response.status.as_u16()) {
        Ok(status) => status,
        Err(err) => {
            error!("Provider returned an unusable status code: {}", err);
            return internal_server_error();
        }
    };

    HttpResponse::build(status)
        .insert_header((header::CACHE_CONTROL, NO_STORE_PRIVATE))
        .json(response.body)
}
