use actix_web::{HttpResponse, get, put, web};
use serde_json::Value;

use crate::repository::DieselRepository;
use crate::services::{ServiceError, triggers};

#[get("/gatilhos")]
pub async fn show_triggers(
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let config = triggers::get_trigger_config(repo.get_ref())?;
    Ok(HttpResponse::Ok().json(config))
}

#[put("/gatilhos")]
pub async fn save_triggers(
    payload: web::Json<Value>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let config = triggers::save_trigger_config(repo.get_ref(), payload.into_inner())?;
    Ok(HttpResponse::Ok().json(config))
}
