use actix_web::web::{get, resource};
use actix_web::{HttpResponse, Resource, Responder};
use common::responses::HealthResponse;

const API_PATH: &str = "/api/health";

/// `GET /api/health`: answers as long as the process is serving requests.
pub fn configure_routes() -> Resource {
    resource(API_PATH).route(get().to(process))
}

async fn process() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse::ok())
}
