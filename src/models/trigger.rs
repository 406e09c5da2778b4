use chrono::NaiveTime;
use diesel::prelude::*;

use crate::domain::trigger::{
    NewTrigger as DomainNewTrigger, Trigger as DomainTrigger, TriggerSchedule as DomainSchedule,
};
use crate::domain::types::{Label, MessageText, TriggerId, TypeConstraintError};

/// The schedule table holds a single row with this id.
pub const SCHEDULE_ROW_ID: i32 = 1;

const TIME_FORMAT: &str = "%H:%M";

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::triggers)]
pub struct Trigger {
    pub id: i32,
    pub dias_apos_vencimento: i32,
    pub tipo: String,
    pub ativo: bool,
    pub mensagem: String,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::triggers)]
pub struct NewTrigger<'a> {
    pub dias_apos_vencimento: i32,
    pub tipo: &'a str,
    pub ativo: bool,
    pub mensagem: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::trigger_schedule)]
#[diesel(treat_none_as_null = true)]
pub struct TriggerSchedule {
    pub id: i32,
    pub execucao_automatica: bool,
    /// `HH:MM`
    pub horario: String,
    /// JSON array of weekday labels.
    pub dias_execucao: String,
    pub repetir: bool,
    pub intervalo_repeticao: Option<i32>,
    pub limite_repeticoes: Option<i32>,
    pub registrar_log: bool,
}

impl TryFrom<Trigger> for DomainTrigger {
    type Error = TypeConstraintError;

    fn try_from(row: Trigger) -> Result<Self, Self::Error> {
        Ok(Self {
            id: TriggerId::try_from(row.id)?,
            dias_apos_vencimento: row.dias_apos_vencimento,
            tipo: Label::new(row.tipo)?,
            ativo: row.ativo,
            mensagem: MessageText::new(row.mensagem)?,
        })
    }
}

impl<'a> From<&'a DomainNewTrigger> for NewTrigger<'a> {
    fn from(trigger: &'a DomainNewTrigger) -> Self {
        Self {
            dias_apos_vencimento: trigger.dias_apos_vencimento,
            tipo: trigger.tipo.as_str(),
            ativo: trigger.ativo,
            mensagem: trigger.mensagem.as_str(),
        }
    }
}

impl TryFrom<TriggerSchedule> for DomainSchedule {
    type Error = TypeConstraintError;

    fn try_from(row: TriggerSchedule) -> Result<Self, Self::Error> {
        let horario = NaiveTime::parse_from_str(&row.horario, TIME_FORMAT)
            .map_err(|_| TypeConstraintError::InvalidValue(format!("horario: {}", row.horario)))?;
        let dias_execucao: Vec<String> = serde_json::from_str(&row.dias_execucao)
            .map_err(|err| TypeConstraintError::InvalidValue(format!("diasExecucao: {err}")))?;
        Ok(Self {
            execucao_automatica: row.execucao_automatica,
            horario,
            dias_execucao,
            repetir: row.repetir,
            intervalo_repeticao: row.intervalo_repeticao,
            limite_repeticoes: row.limite_repeticoes,
            registrar_log: row.registrar_log,
        })
    }
}

impl From<&DomainSchedule> for TriggerSchedule {
    fn from(schedule: &DomainSchedule) -> Self {
        Self {
            id: SCHEDULE_ROW_ID,
            execucao_automatica: schedule.execucao_automatica,
            horario: schedule.horario.format(TIME_FORMAT).to_string(),
            dias_execucao: serde_json::to_string(&schedule.dias_execucao)
                .unwrap_or_else(|_| "[]".to_string()),
            repetir: schedule.repetir,
            intervalo_repeticao: schedule.intervalo_repeticao,
            limite_repeticoes: schedule.limite_repeticoes,
            registrar_log: schedule.registrar_log,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_round_trips_through_row() {
        let schedule = DomainSchedule {
            execucao_automatica: true,
            horario: NaiveTime::from_hms_opt(7, 45, 0).unwrap(),
            dias_execucao: vec!["seg".to_string(), "qua".to_string()],
            repetir: true,
            intervalo_repeticao: Some(3),
            limite_repeticoes: None,
            registrar_log: false,
        };
        let row = TriggerSchedule::from(&schedule);
        assert_eq!(row.id, SCHEDULE_ROW_ID);
        assert_eq!(row.horario, "07:45");
        assert_eq!(row.dias_execucao, r#"["seg","qua"]"#);
        assert_eq!(DomainSchedule::try_from(row).unwrap(), schedule);
    }
}
