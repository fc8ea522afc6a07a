use actix_web::web::{post, resource, route, ServiceConfig};

use crate::handlers::virtual_accounts::{create_virtual_account, method_not_allowed};

pub const VIRTUAL_ACCOUNT_PATH: &str = "/api/virtual-account";

pub fn virtual_account_route_group(conf: &mut ServiceConfig) {
    let resource = resource(VIRTUAL_ACCOUNT_PATH)
        .route(post().to(create_virtual_account))
        .default_service(route().to(method_not_allowed));

    conf.service(resource);
}
