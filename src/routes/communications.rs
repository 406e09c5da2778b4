use actix_web::{HttpResponse, delete, get, post, route, web};
use serde_json::Value;

use crate::dto::ListParams;
use crate::repository::DieselRepository;
use crate::routes::{now, page_request};
use crate::services::{ServiceError, communications};

#[get("/communications")]
pub async fn list_communications(
    params: web::Query<ListParams>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let page = communications::list_communications(
        repo.get_ref(),
        params.client_id,
        page_request(&params),
    )?;
    Ok(HttpResponse::Ok().json(page))
}

#[post("/communications")]
pub async fn create_communication(
    payload: web::Json<Value>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let created =
        communications::create_communication(repo.get_ref(), payload.into_inner(), now())?;
    Ok(HttpResponse::Created().json(created))
}

#[get("/communications/{id}")]
pub async fn show_communication(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let found = communications::get_communication(repo.get_ref(), path.into_inner())?;
    Ok(HttpResponse::Ok().json(found))
}

#[route("/communications/{id}", method = "PUT", method = "PATCH")]
pub async fn update_communication(
    path: web::Path<i32>,
    payload: web::Json<Value>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let updated = communications::update_communication(
        repo.get_ref(),
        path.into_inner(),
        payload.into_inner(),
    )?;
    Ok(HttpResponse::Ok().json(updated))
}

#[delete("/communications/{id}")]
pub async fn delete_communication(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    communications::delete_communication(repo.get_ref(), path.into_inner())?;
    Ok(HttpResponse::NoContent().finish())
}
