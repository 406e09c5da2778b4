use diesel::prelude::*;

use crate::{
    domain::trigger::{NewTriggerConfig, Trigger, TriggerConfig, TriggerSchedule},
    models::trigger::{
        NewTrigger as DbNewTrigger, SCHEDULE_ROW_ID, Trigger as DbTrigger,
        TriggerSchedule as DbTriggerSchedule,
    },
    repository::{
        DieselRepository, TriggerReader, TriggerWriter,
        errors::{RepositoryError, RepositoryResult},
    },
    schema::{trigger_schedule, triggers},
};

fn load_config(conn: &mut SqliteConnection) -> RepositoryResult<TriggerConfig> {
    let gatilhos = triggers::table
        .order((triggers::dias_apos_vencimento.asc(), triggers::id.asc()))
        .load::<DbTrigger>(conn)?
        .into_iter()
        .map(Trigger::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    let agendamento = trigger_schedule::table
        .find(SCHEDULE_ROW_ID)
        .first::<DbTriggerSchedule>(conn)
        .optional()?
        .map(TriggerSchedule::try_from)
        .transpose()?
        .unwrap_or_default();

    Ok(TriggerConfig {
        gatilhos,
        agendamento,
    })
}

impl TriggerReader for DieselRepository {
    fn get_trigger_config(&self) -> RepositoryResult<TriggerConfig> {
        let mut conn = self.conn()?;
        load_config(&mut conn)
    }
}

impl TriggerWriter for DieselRepository {
    fn replace_trigger_config(&self, config: &NewTriggerConfig) -> RepositoryResult<TriggerConfig> {
        let mut conn = self.conn()?;
        let new_triggers: Vec<DbNewTrigger> = config.gatilhos.iter().map(Into::into).collect();
        let schedule = DbTriggerSchedule::from(&config.agendamento);

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            diesel::delete(triggers::table).execute(conn)?;
            if !new_triggers.is_empty() {
                diesel::insert_into(triggers::table)
                    .values(&new_triggers)
                    .execute(conn)?;
            }
            diesel::insert_into(trigger_schedule::table)
                .values(&schedule)
                .on_conflict(trigger_schedule::id)
                .do_update()
                .set(&schedule)
                .execute(conn)?;
            Ok(())
        })
        .map_err(RepositoryError::from)?;

        load_config(&mut conn)
    }
}
