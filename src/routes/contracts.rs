use actix_web::{HttpResponse, delete, get, post, route, web};
use serde_json::{Value, json};

use crate::dto::ListParams;
use crate::repository::DieselRepository;
use crate::routes::{page_request, today};
use crate::services::{ServiceError, contracts};

#[get("/contracts")]
pub async fn list_contracts(
    params: web::Query<ListParams>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let page = contracts::list_contracts(repo.get_ref(), params.client_id, page_request(&params))?;
    Ok(HttpResponse::Ok().json(page))
}

/// Creates the contract together with its installment schedule.
#[post("/contracts")]
pub async fn create_contract(
    payload: web::Json<Value>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let detail = contracts::create_contract(repo.get_ref(), payload.into_inner())?;
    Ok(HttpResponse::Created().json(detail))
}

#[get("/contracts/{id}")]
pub async fn show_contract(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let detail = contracts::get_contract(repo.get_ref(), path.into_inner())?;
    Ok(HttpResponse::Ok().json(detail))
}

#[route("/contracts/{id}", method = "PUT", method = "PATCH")]
pub async fn update_contract(
    path: web::Path<i32>,
    payload: web::Json<Value>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let contract =
        contracts::update_contract(repo.get_ref(), path.into_inner(), payload.into_inner())?;
    Ok(HttpResponse::Ok().json(contract))
}

#[delete("/contracts/{id}")]
pub async fn delete_contract(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    contracts::delete_contract(repo.get_ref(), path.into_inner())?;
    Ok(HttpResponse::NoContent().finish())
}

#[get("/contracts/{id}/installments")]
pub async fn list_installments(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let installments = contracts::list_installments(repo.get_ref(), path.into_inner())?;
    Ok(HttpResponse::Ok().json(installments))
}

/// Marks an installment as paid. The body may be empty.
#[post("/installments/{id}/pay")]
pub async fn pay_installment(
    path: web::Path<i32>,
    payload: Option<web::Json<Value>>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let payload = payload.map(web::Json::into_inner).unwrap_or_else(|| json!({}));
    let installment =
        contracts::pay_installment(repo.get_ref(), path.into_inner(), payload, today())?;
    Ok(HttpResponse::Ok().json(installment))
}
