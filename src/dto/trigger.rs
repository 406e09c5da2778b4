use chrono::NaiveTime;
use serde::Deserialize;

use crate::domain::trigger::{NewTrigger, NewTriggerConfig, Trigger, TriggerConfig, TriggerSchedule};
use crate::domain::types::{Label, MessageText, TypeConstraintError};
use crate::validation::{FieldRule, FieldSpec, Schema};

pub const TRIGGER_SCHEMA: Schema = Schema::new(
    "Trigger",
    &[
        FieldSpec::required("diasAposVencimento", FieldRule::int_at_least(1)),
        FieldSpec::required("tipo", FieldRule::Text),
        FieldSpec::optional("ativo", FieldRule::Boolean),
        FieldSpec::required("mensagem", FieldRule::Text),
    ],
);

pub const TRIGGER_SCHEDULE_SCHEMA: Schema = Schema::new(
    "TriggerSchedule",
    &[
        FieldSpec::required("execucaoAutomatica", FieldRule::Boolean),
        FieldSpec::required("horario", FieldRule::Time),
        FieldSpec::optional("diasExecucao", FieldRule::TextArray),
        FieldSpec::optional("repetir", FieldRule::Boolean),
        FieldSpec::optional("intervaloRepeticao", FieldRule::int_at_least(1)),
        FieldSpec::optional("limiteRepeticoes", FieldRule::int_at_least(1)),
        FieldSpec::optional("registrarLog", FieldRule::Boolean),
    ],
);

/// Full configuration. Updates use the partial form: an omitted `gatilhos`
/// keeps the stored list and omitted schedule fields keep their values,
/// while each listed trigger must be complete.
pub const TRIGGER_CONFIG_SCHEMA: Schema = Schema::new(
    "TriggerConfig",
    &[
        FieldSpec::required("gatilhos", FieldRule::ObjectArray(&TRIGGER_SCHEMA)),
        FieldSpec::required("agendamento", FieldRule::Object(&TRIGGER_SCHEDULE_SCHEMA)),
    ],
);

pub const UPDATE_TRIGGER_CONFIG_SCHEMA: Schema =
    TRIGGER_CONFIG_SCHEMA.partial("UpdateTriggerConfig");

const TIME_FORMAT: &str = "%H:%M";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerPayload {
    pub dias_apos_vencimento: i32,
    pub tipo: String,
    pub ativo: Option<bool>,
    pub mensagem: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerSchedulePayload {
    pub execucao_automatica: Option<bool>,
    pub horario: Option<String>,
    pub dias_execucao: Option<Vec<String>>,
    pub repetir: Option<bool>,
    pub intervalo_repeticao: Option<i32>,
    pub limite_repeticoes: Option<i32>,
    pub registrar_log: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerConfigPayload {
    pub gatilhos: Option<Vec<TriggerPayload>>,
    pub agendamento: Option<TriggerSchedulePayload>,
}

impl TryFrom<TriggerPayload> for NewTrigger {
    type Error = TypeConstraintError;

    fn try_from(payload: TriggerPayload) -> Result<Self, Self::Error> {
        NewTrigger::try_new(
            payload.dias_apos_vencimento,
            Label::new(payload.tipo)?,
            payload.ativo.unwrap_or(true),
            MessageText::new(payload.mensagem)?,
        )
    }
}

impl From<&Trigger> for NewTrigger {
    fn from(trigger: &Trigger) -> Self {
        Self {
            dias_apos_vencimento: trigger.dias_apos_vencimento,
            tipo: trigger.tipo.clone(),
            ativo: trigger.ativo,
            mensagem: trigger.mensagem.clone(),
        }
    }
}

impl TriggerSchedulePayload {
    /// Overlays the supplied fields on `current`.
    pub fn apply_to(self, current: &TriggerSchedule) -> Result<TriggerSchedule, TypeConstraintError> {
        let horario = match self.horario {
            Some(raw) => NaiveTime::parse_from_str(raw.trim(), TIME_FORMAT)
                .map_err(|_| TypeConstraintError::InvalidValue(format!("horario {raw}")))?,
            None => current.horario,
        };
        let schedule = TriggerSchedule {
            execucao_automatica: self
                .execucao_automatica
                .unwrap_or(current.execucao_automatica),
            horario,
            dias_execucao: match self.dias_execucao {
                Some(days) => days.into_iter().map(|d| d.trim().to_string()).collect(),
                None => current.dias_execucao.clone(),
            },
            repetir: self.repetir.unwrap_or(current.repetir),
            intervalo_repeticao: self.intervalo_repeticao.or(current.intervalo_repeticao),
            limite_repeticoes: self.limite_repeticoes.or(current.limite_repeticoes),
            registrar_log: self.registrar_log.unwrap_or(current.registrar_log),
        };
        schedule.check()?;
        Ok(schedule)
    }
}

impl TriggerConfigPayload {
    /// Builds the replacement configuration from this payload and the stored one.
    pub fn merge(self, current: &TriggerConfig) -> Result<NewTriggerConfig, TypeConstraintError> {
        let gatilhos = match self.gatilhos {
            Some(triggers) => triggers
                .into_iter()
                .map(NewTrigger::try_from)
                .collect::<Result<Vec<_>, _>>()?,
            None => current.gatilhos.iter().map(NewTrigger::from).collect(),
        };
        let agendamento = self
            .agendamento
            .unwrap_or_default()
            .apply_to(&current.agendamento)?;
        Ok(NewTriggerConfig {
            gatilhos,
            agendamento,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::types::TriggerId;
    use crate::validation::parse_payload;

    fn stored() -> TriggerConfig {
        TriggerConfig {
            gatilhos: vec![Trigger {
                id: TriggerId::new(1).unwrap(),
                dias_apos_vencimento: 5,
                tipo: Label::new("email").unwrap(),
                ativo: true,
                mensagem: MessageText::new("Lembrete de pagamento").unwrap(),
            }],
            agendamento: TriggerSchedule::default(),
        }
    }

    #[test]
    fn schedule_only_update_keeps_triggers() {
        let payload: TriggerConfigPayload = parse_payload(
            &UPDATE_TRIGGER_CONFIG_SCHEMA,
            json!({"agendamento": {"horario": "09:15", "diasExecucao": ["seg", "qua"]}}),
        )
        .unwrap();
        let config = payload.merge(&stored()).unwrap();

        assert_eq!(config.gatilhos.len(), 1);
        assert_eq!(config.gatilhos[0].dias_apos_vencimento, 5);
        assert_eq!(
            config.agendamento.horario,
            NaiveTime::from_hms_opt(9, 15, 0).unwrap()
        );
        assert_eq!(config.agendamento.dias_execucao, vec!["seg", "qua"]);
        assert!(config.agendamento.registrar_log);
    }

    #[test]
    fn listed_triggers_must_be_complete() {
        let errors = UPDATE_TRIGGER_CONFIG_SCHEMA
            .validate(&json!({"gatilhos": [{"diasAposVencimento": 0, "tipo": "sms"}]}))
            .unwrap_err();
        let fields: Vec<_> = errors.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["gatilhos[0].diasAposVencimento", "gatilhos[0].mensagem"]
        );
    }

    #[test]
    fn full_schema_requires_schedule_time() {
        let errors = TRIGGER_CONFIG_SCHEMA
            .validate(&json!({"gatilhos": [], "agendamento": {"execucaoAutomatica": true}}))
            .unwrap_err();
        assert_eq!(errors.errors()[0].field, "agendamento.horario");
    }

    #[test]
    fn trigger_defaults_to_active() {
        let payload: TriggerPayload = serde_json::from_value(
            json!({"diasAposVencimento": 10, "tipo": "sms", "mensagem": "Parcela vencida"}),
        )
        .unwrap();
        assert!(NewTrigger::try_from(payload).unwrap().ativo);
    }
}
