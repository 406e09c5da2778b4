use actix_web::{HttpResponse, delete, get, post, route, web};
use serde_json::Value;

use crate::dto::ListParams;
use crate::repository::DieselRepository;
use crate::routes::{page_request, today};
use crate::services::{ServiceError, delinquency};

/// Live aggregation over the client's contracts. Nothing is stored.
#[get("/clients/{id}/delinquency")]
pub async fn show_client_delinquency(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let snapshot =
        delinquency::compute_client_delinquency(repo.get_ref(), path.into_inner(), today())?;
    Ok(HttpResponse::Ok().json(snapshot))
}

#[post("/delinquents/refresh/{client_id}")]
pub async fn refresh_client_delinquency(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let record =
        delinquency::refresh_client_delinquency(repo.get_ref(), path.into_inner(), today())?;
    Ok(HttpResponse::Ok().json(record))
}

#[post("/delinquents/refresh")]
pub async fn refresh_all(
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let report = delinquency::refresh_all(repo.get_ref(), today())?;
    Ok(HttpResponse::Ok().json(report))
}

#[get("/delinquents")]
pub async fn list_delinquents(
    params: web::Query<ListParams>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let page = delinquency::list_delinquencies(
        repo.get_ref(),
        params.status.clone(),
        page_request(&params),
    )?;
    Ok(HttpResponse::Ok().json(page))
}

#[post("/delinquents")]
pub async fn create_delinquent(
    payload: web::Json<Value>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let record = delinquency::create_delinquency(repo.get_ref(), payload.into_inner())?;
    Ok(HttpResponse::Created().json(record))
}

#[get("/delinquents/{id}")]
pub async fn show_delinquent(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let record = delinquency::get_delinquency(repo.get_ref(), path.into_inner())?;
    Ok(HttpResponse::Ok().json(record))
}

#[route("/delinquents/{id}", method = "PUT", method = "PATCH")]
pub async fn update_delinquent(
    path: web::Path<i32>,
    payload: web::Json<Value>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let record =
        delinquency::update_delinquency(repo.get_ref(), path.into_inner(), payload.into_inner())?;
    Ok(HttpResponse::Ok().json(record))
}

#[delete("/delinquents/{id}")]
pub async fn delete_delinquent(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    delinquency::delete_delinquency(repo.get_ref(), path.into_inner())?;
    Ok(HttpResponse::NoContent().finish())
}
