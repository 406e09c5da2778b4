use serde_json::Value;

use crate::domain::trigger::TriggerConfig;
use crate::dto::trigger::{TriggerConfigPayload, UPDATE_TRIGGER_CONFIG_SCHEMA};
use crate::repository::{TriggerReader, TriggerWriter};
use crate::services::ServiceResult;
use crate::validation::parse_payload;

pub fn get_trigger_config<R>(repo: &R) -> ServiceResult<TriggerConfig>
where
    R: TriggerReader + ?Sized,
{
    Ok(repo.get_trigger_config()?)
}

/// Replaces the trigger list and schedule.
///
/// Sections left out of the payload keep their stored values; a supplied
/// `gatilhos` list replaces every stored trigger.
pub fn save_trigger_config<R>(repo: &R, payload: Value) -> ServiceResult<TriggerConfig>
where
    R: TriggerReader + TriggerWriter + ?Sized,
{
    let payload: TriggerConfigPayload = parse_payload(&UPDATE_TRIGGER_CONFIG_SCHEMA, payload)?;
    let current = repo.get_trigger_config()?;
    let config = payload.merge(&current)?;

    let saved = repo.replace_trigger_config(&config).map_err(|err| {
        log::error!("Failed to save trigger configuration: {err}");
        err
    })?;
    log::info!("Saved {} collection triggers", saved.gatilhos.len());
    Ok(saved)
}
