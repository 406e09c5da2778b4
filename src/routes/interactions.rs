use actix_web::{HttpResponse, delete, get, post, route, web};
use serde_json::Value;

use crate::dto::ListParams;
use crate::repository::DieselRepository;
use crate::routes::{now, page_request};
use crate::services::{ServiceError, interactions};

#[get("/interactions")]
pub async fn list_interactions(
    params: web::Query<ListParams>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let page = interactions::list_interactions(
        repo.get_ref(),
        params.client_id,
        page_request(&params),
    )?;
    Ok(HttpResponse::Ok().json(page))
}

#[post("/interactions")]
pub async fn create_interaction(
    payload: web::Json<Value>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let created = interactions::create_interaction(repo.get_ref(), payload.into_inner(), now())?;
    Ok(HttpResponse::Created().json(created))
}

#[get("/interactions/{id}")]
pub async fn show_interaction(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let found = interactions::get_interaction(repo.get_ref(), path.into_inner())?;
    Ok(HttpResponse::Ok().json(found))
}

#[route("/interactions/{id}", method = "PUT", method = "PATCH")]
pub async fn update_interaction(
    path: web::Path<i32>,
    payload: web::Json<Value>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let updated = interactions::update_interaction(
        repo.get_ref(),
        path.into_inner(),
        payload.into_inner(),
    )?;
    Ok(HttpResponse::Ok().json(updated))
}

#[delete("/interactions/{id}")]
pub async fn delete_interaction(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    interactions::delete_interaction(repo.get_ref(), path.into_inner())?;
    Ok(HttpResponse::NoContent().finish())
}
