use actix_web::{HttpResponse, delete, get, post, route, web};
use serde_json::Value;

use crate::repository::DieselRepository;
use crate::services::{ServiceError, users};

#[get("/users")]
pub async fn list_users(repo: web::Data<DieselRepository>) -> Result<HttpResponse, ServiceError> {
    let listed = users::list_users(repo.get_ref())?;
    Ok(HttpResponse::Ok().json(listed))
}

#[post("/users")]
pub async fn create_user(
    payload: web::Json<Value>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let user = users::create_user(repo.get_ref(), payload.into_inner())?;
    Ok(HttpResponse::Created().json(user))
}

#[get("/users/{id}")]
pub async fn show_user(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let user = users::get_user(repo.get_ref(), path.into_inner())?;
    Ok(HttpResponse::Ok().json(user))
}

#[route("/users/{id}", method = "PUT", method = "PATCH")]
pub async fn update_user(
    path: web::Path<i32>,
    payload: web::Json<Value>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let user = users::update_user(repo.get_ref(), path.into_inner(), payload.into_inner())?;
    Ok(HttpResponse::Ok().json(user))
}

#[delete("/users/{id}")]
pub async fn delete_user(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    users::delete_user(repo.get_ref(), path.into_inner())?;
    Ok(HttpResponse::NoContent().finish())
}
