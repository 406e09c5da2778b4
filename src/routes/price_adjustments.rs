//! Reajuste endpoints. Every view carries the status derived from today's
//! date and the configured imminence horizon.

use actix_web::{HttpResponse, delete, get, post, route, web};
use serde_json::Value;

use crate::dto::ListParams;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{page_request, status_clock};
use crate::services::{ServiceError, price_adjustments};

#[get("/reajustes")]
pub async fn list_adjustments(
    params: web::Query<ListParams>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> Result<HttpResponse, ServiceError> {
    let page = price_adjustments::list_price_adjustments(
        repo.get_ref(),
        params.contract_id,
        page_request(&params),
        status_clock(&config),
    )?;
    Ok(HttpResponse::Ok().json(page))
}

#[post("/reajustes")]
pub async fn create_adjustment(
    payload: web::Json<Value>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> Result<HttpResponse, ServiceError> {
    let view = price_adjustments::create_price_adjustment(
        repo.get_ref(),
        payload.into_inner(),
        status_clock(&config),
    )?;
    Ok(HttpResponse::Created().json(view))
}

#[get("/reajustes/{id}")]
pub async fn show_adjustment(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> Result<HttpResponse, ServiceError> {
    let view = price_adjustments::get_price_adjustment(
        repo.get_ref(),
        path.into_inner(),
        status_clock(&config),
    )?;
    Ok(HttpResponse::Ok().json(view))
}

#[route("/reajustes/{id}", method = "PUT", method = "PATCH")]
pub async fn update_adjustment(
    path: web::Path<i32>,
    payload: web::Json<Value>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> Result<HttpResponse, ServiceError> {
    let view = price_adjustments::update_price_adjustment(
        repo.get_ref(),
        path.into_inner(),
        payload.into_inner(),
        status_clock(&config),
    )?;
    Ok(HttpResponse::Ok().json(view))
}

#[delete("/reajustes/{id}")]
pub async fn delete_adjustment(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    price_adjustments::delete_price_adjustment(repo.get_ref(), path.into_inner())?;
    Ok(HttpResponse::NoContent().finish())
}

/// Rescales the contract's open installments and marks the reajuste applied.
#[post("/reajustes/{id}/apply")]
pub async fn apply_adjustment(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> Result<HttpResponse, ServiceError> {
    let applied = price_adjustments::apply_price_adjustment(
        repo.get_ref(),
        path.into_inner(),
        status_clock(&config),
    )?;
    Ok(HttpResponse::Ok().json(applied))
}
