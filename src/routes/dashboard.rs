use actix_web::{HttpResponse, get, web};

use crate::repository::DieselRepository;
use crate::services::{ServiceError, dashboard};

#[get("/dashboard")]
pub async fn show_dashboard(
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let summary = dashboard::load_dashboard(repo.get_ref())?;
    Ok(HttpResponse::Ok().json(summary))
}
