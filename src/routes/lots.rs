use actix_web::{HttpResponse, delete, get, post, route, web};
use serde_json::Value;

use crate::dto::ListParams;
use crate::repository::DieselRepository;
use crate::routes::page_request;
use crate::services::{ServiceError, lots};

#[get("/lots")]
pub async fn list_lots(
    params: web::Query<ListParams>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let page = lots::list_lots(repo.get_ref(), params.status.clone(), page_request(&params))?;
    Ok(HttpResponse::Ok().json(page))
}

#[post("/lots")]
pub async fn create_lot(
    payload: web::Json<Value>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let lot = lots::create_lot(repo.get_ref(), payload.into_inner())?;
    Ok(HttpResponse::Created().json(lot))
}

#[get("/lots/{id}")]
pub async fn show_lot(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let lot = lots::get_lot(repo.get_ref(), path.into_inner())?;
    Ok(HttpResponse::Ok().json(lot))
}

#[route("/lots/{id}", method = "PUT", method = "PATCH")]
pub async fn update_lot(
    path: web::Path<i32>,
    payload: web::Json<Value>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let lot = lots::update_lot(repo.get_ref(), path.into_inner(), payload.into_inner())?;
    Ok(HttpResponse::Ok().json(lot))
}

#[delete("/lots/{id}")]
pub async fn delete_lot(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    lots::delete_lot(repo.get_ref(), path.into_inner())?;
    Ok(HttpResponse::NoContent().finish())
}
