use actix_web::{HttpResponse, delete, get, post, route, web};
use serde_json::Value;

use crate::dto::ListParams;
use crate::repository::DieselRepository;
use crate::routes::page_request;
use crate::services::{ServiceError, invoices};

#[get("/invoices")]
pub async fn list_invoices(
    params: web::Query<ListParams>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let page = invoices::list_invoices(
        repo.get_ref(),
        params.contract_id,
        params.status.clone(),
        page_request(&params),
    )?;
    Ok(HttpResponse::Ok().json(page))
}

#[post("/invoices")]
pub async fn create_invoice(
    payload: web::Json<Value>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let invoice = invoices::create_invoice(repo.get_ref(), payload.into_inner())?;
    Ok(HttpResponse::Created().json(invoice))
}

#[get("/invoices/{id}")]
pub async fn show_invoice(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let invoice = invoices::get_invoice(repo.get_ref(), path.into_inner())?;
    Ok(HttpResponse::Ok().json(invoice))
}

#[route("/invoices/{id}", method = "PUT", method = "PATCH")]
pub async fn update_invoice(
    path: web::Path<i32>,
    payload: web::Json<Value>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let invoice =
        invoices::update_invoice(repo.get_ref(), path.into_inner(), payload.into_inner())?;
    Ok(HttpResponse::Ok().json(invoice))
}

#[delete("/invoices/{id}")]
pub async fn delete_invoice(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    invoices::delete_invoice(repo.get_ref(), path.into_inner())?;
    Ok(HttpResponse::NoContent().finish())
}
