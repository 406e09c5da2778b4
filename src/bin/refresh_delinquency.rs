//! One-shot job recomputing every client's delinquency snapshot.
//!
//! Meant to run from cron ahead of the collection routine. For each refreshed
//! record it logs the active triggers that apply to its days overdue.

use chrono::Local;
use dotenvy::dotenv;

use loteamento::db::establish_connection_pool;
use loteamento::domain::trigger::matching_triggers;
use loteamento::models::config::ServerConfig;
use loteamento::repository::DieselRepository;
use loteamento::services::{delinquency, triggers};

fn main() {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let server_config = match ServerConfig::load() {
        Ok(server_config) => server_config,
        Err(err) => {
            log::error!("Error loading server config: {err}");
            std::process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&server_config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    let repo = DieselRepository::new(pool);
    let today = Local::now().date_naive();

    log::info!("Refreshing delinquency as of {today}");

    let report = match delinquency::refresh_all(&repo, today) {
        Ok(report) => report,
        Err(e) => {
            log::error!("Delinquency refresh failed: {e}");
            std::process::exit(1);
        }
    };

    let config = match triggers::get_trigger_config(&repo) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load trigger configuration: {e}");
            std::process::exit(1);
        }
    };

    for record in &report.atualizados {
        for trigger in matching_triggers(&config.gatilhos, record.dias_atraso) {
            log::info!(
                "Client {} is {} days overdue: trigger {} ({}) applies",
                record.client_id,
                record.dias_atraso,
                trigger.id,
                trigger.tipo
            );
        }
    }

    log::info!(
        "Refreshed {} clients, skipped {}",
        report.atualizados.len(),
        report.ignorados.len()
    );
}
