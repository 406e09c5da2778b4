//! JSON API under `/api/v1`.
//!
//! Handlers are thin: they pull path, query and body out of the request,
//! call the matching service with the shared [`DieselRepository`] and
//! serialize the result. Failures render through the `ResponseError` impl
//! on [`crate::services::ServiceError`].

use actix_web::web;
use chrono::{Local, NaiveDate, NaiveDateTime, Utc};

use crate::dto::ListParams;
use crate::models::config::ServerConfig;
use crate::services::PageRequest;
use crate::services::price_adjustments::StatusClock;

pub mod clients;
pub mod communications;
pub mod contracts;
pub mod dashboard;
pub mod delinquency;
pub mod interactions;
pub mod invoices;
pub mod lots;
pub mod price_adjustments;
pub mod triggers;
pub mod users;

/// Registers every endpoint under `/api/v1`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(dashboard::show_dashboard)
            .service(clients::import_clients)
            .service(clients::upload_clients)
            .service(clients::list_clients)
            .service(clients::create_client)
            .service(clients::show_client)
            .service(clients::update_client)
            .service(clients::delete_client)
            .service(delinquency::show_client_delinquency)
            .service(delinquency::refresh_client_delinquency)
            .service(lots::list_lots)
            .service(lots::create_lot)
            .service(lots::show_lot)
            .service(lots::update_lot)
            .service(lots::delete_lot)
            .service(contracts::list_contracts)
            .service(contracts::create_contract)
            .service(contracts::show_contract)
            .service(contracts::update_contract)
            .service(contracts::delete_contract)
            .service(contracts::list_installments)
            .service(contracts::pay_installment)
            .service(invoices::list_invoices)
            .service(invoices::create_invoice)
            .service(invoices::show_invoice)
            .service(invoices::update_invoice)
            .service(invoices::delete_invoice)
            .service(delinquency::refresh_all)
            .service(delinquency::list_delinquents)
            .service(delinquency::create_delinquent)
            .service(delinquency::show_delinquent)
            .service(delinquency::update_delinquent)
            .service(delinquency::delete_delinquent)
            .service(price_adjustments::list_adjustments)
            .service(price_adjustments::create_adjustment)
            .service(price_adjustments::show_adjustment)
            .service(price_adjustments::update_adjustment)
            .service(price_adjustments::delete_adjustment)
            .service(price_adjustments::apply_adjustment)
            .service(triggers::show_triggers)
            .service(triggers::save_triggers)
            .service(communications::list_communications)
            .service(communications::create_communication)
            .service(communications::show_communication)
            .service(communications::update_communication)
            .service(communications::delete_communication)
            .service(interactions::list_interactions)
            .service(interactions::create_interaction)
            .service(interactions::show_interaction)
            .service(interactions::update_interaction)
            .service(interactions::delete_interaction)
            .service(users::list_users)
            .service(users::create_user)
            .service(users::show_user)
            .service(users::update_user)
            .service(users::delete_user),
    );
}

/// Calendar date used for due-date and status comparisons.
pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Timestamps are stored in UTC.
pub(crate) fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

pub(crate) fn page_request(params: &ListParams) -> PageRequest {
    PageRequest::new(params.page, params.per_page)
}

pub(crate) fn status_clock(config: &ServerConfig) -> StatusClock {
    StatusClock::new(today(), config.reajuste_horizon_days)
}
