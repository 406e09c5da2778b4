use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, delete, get, post, route, web};
use serde_json::{Value, json};

use crate::dto::ListParams;
use crate::forms::clients::UploadClientsForm;
use crate::repository::DieselRepository;
use crate::routes::page_request;
use crate::services::{ServiceError, clients};

#[get("/clients")]
pub async fn list_clients(
    params: web::Query<ListParams>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let page = clients::list_clients(repo.get_ref(), params.search.clone(), page_request(&params))?;
    Ok(HttpResponse::Ok().json(page))
}

#[post("/clients")]
pub async fn create_client(
    payload: web::Json<Value>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let client = clients::create_client(repo.get_ref(), payload.into_inner())?;
    Ok(HttpResponse::Created().json(client))
}

#[get("/clients/{id}")]
pub async fn show_client(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let client = clients::get_client(repo.get_ref(), path.into_inner())?;
    Ok(HttpResponse::Ok().json(client))
}

#[route("/clients/{id}", method = "PUT", method = "PATCH")]
pub async fn update_client(
    path: web::Path<i32>,
    payload: web::Json<Value>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let client = clients::update_client(repo.get_ref(), path.into_inner(), payload.into_inner())?;
    Ok(HttpResponse::Ok().json(client))
}

#[delete("/clients/{id}")]
pub async fn delete_client(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    clients::delete_client(repo.get_ref(), path.into_inner())?;
    Ok(HttpResponse::NoContent().finish())
}

/// JSON array of client objects, inserted all or nothing.
#[post("/clients/import")]
pub async fn import_clients(
    rows: web::Json<Vec<Value>>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let imported = clients::import_clients(repo.get_ref(), rows.into_inner())?;
    Ok(HttpResponse::Created().json(json!({ "imported": imported })))
}

#[post("/clients/upload")]
pub async fn upload_clients(
    MultipartForm(form): MultipartForm<UploadClientsForm>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let rows = form.parse_rows().map_err(|err| {
        log::warn!("Rejected client upload: {err}");
        ServiceError::TypeConstraint(err.to_string())
    })?;
    let imported = clients::import_clients(repo.get_ref(), rows)?;
    Ok(HttpResponse::Created().json(json!({ "imported": imported })))
}
