use crate::state::AppState;
use actix_web::{web, HttpResponse, Responder};
use common::responses::PendingImages;

pub(crate) async fn process(state: web::Data<AppState>) -> impl Responder {
    let count = state.uploads().pending_images().await;
    HttpResponse::Ok().json(PendingImages::from_count(count))
}
