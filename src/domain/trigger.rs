//! Collection trigger (gatilho) configuration.
//!
//! Only the configuration lives here; running the collection jobs is left to
//! an external scheduler.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{Label, MessageText, TriggerId, TypeConstraintError};

/// A rule firing once a client is `dias_apos_vencimento` days late.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Trigger {
    pub id: TriggerId,
    pub dias_apos_vencimento: i32,
    /// Channel or action label, e.g. `email` or `sms`.
    pub tipo: Label,
    pub ativo: bool,
    pub mensagem: MessageText,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewTrigger {
    pub dias_apos_vencimento: i32,
    pub tipo: Label,
    pub ativo: bool,
    pub mensagem: MessageText,
}

impl NewTrigger {
    pub fn try_new(
        dias_apos_vencimento: i32,
        tipo: Label,
        ativo: bool,
        mensagem: MessageText,
    ) -> Result<Self, TypeConstraintError> {
        if dias_apos_vencimento < 1 {
            return Err(TypeConstraintError::InvalidValue(
                "diasAposVencimento must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            dias_apos_vencimento,
            tipo,
            ativo,
            mensagem,
        })
    }
}

/// Global schedule shared by every trigger.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TriggerSchedule {
    pub execucao_automatica: bool,
    #[serde(with = "hour_minute")]
    pub horario: NaiveTime,
    /// Weekday labels such as `seg` or `monday`, kept as entered.
    pub dias_execucao: Vec<String>,
    pub repetir: bool,
    pub intervalo_repeticao: Option<i32>,
    pub limite_repeticoes: Option<i32>,
    pub registrar_log: bool,
}

impl Default for TriggerSchedule {
    fn default() -> Self {
        Self {
            execucao_automatica: false,
            horario: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN),
            dias_execucao: Vec::new(),
            repetir: false,
            intervalo_repeticao: None,
            limite_repeticoes: None,
            registrar_log: true,
        }
    }
}

impl TriggerSchedule {
    /// Checks the repeat settings.
    pub fn check(&self) -> Result<(), TypeConstraintError> {
        for (name, value) in [
            ("intervaloRepeticao", self.intervalo_repeticao),
            ("limiteRepeticoes", self.limite_repeticoes),
        ] {
            if value.is_some_and(|v| v < 1) {
                return Err(TypeConstraintError::InvalidValue(format!(
                    "{name} must be at least 1"
                )));
            }
        }
        Ok(())
    }
}

/// Full trigger configuration as stored.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TriggerConfig {
    pub gatilhos: Vec<Trigger>,
    pub agendamento: TriggerSchedule,
}

/// Replacement payload for the whole configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct NewTriggerConfig {
    pub gatilhos: Vec<NewTrigger>,
    pub agendamento: TriggerSchedule,
}

/// Active triggers whose threshold has been reached after `dias_atraso`
/// days, lowest threshold first.
pub fn matching_triggers(triggers: &[Trigger], dias_atraso: i64) -> Vec<&Trigger> {
    let mut matched: Vec<&Trigger> = triggers
        .iter()
        .filter(|t| t.ativo && i64::from(t.dias_apos_vencimento) <= dias_atraso)
        .collect();
    matched.sort_by_key(|t| (t.dias_apos_vencimento, t.id));
    matched
}

mod hour_minute {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(raw.trim(), FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trigger(id: i32, dias: i32, ativo: bool) -> Trigger {
        Trigger {
            id: TriggerId::new(id).unwrap(),
            dias_apos_vencimento: dias,
            tipo: Label::new("email").unwrap(),
            ativo,
            mensagem: MessageText::new("Sua parcela está em atraso").unwrap(),
        }
    }

    #[test]
    fn matches_active_triggers_up_to_days_late() {
        let triggers = vec![
            trigger(1, 15, true),
            trigger(2, 5, true),
            trigger(3, 1, false),
            trigger(4, 30, true),
        ];
        let ids: Vec<i32> = matching_triggers(&triggers, 15)
            .iter()
            .map(|t| t.id.get())
            .collect();
        assert_eq!(ids, vec![2, 1]);
        assert!(matching_triggers(&triggers, 0).is_empty());
    }

    #[test]
    fn threshold_must_be_positive() {
        let result = NewTrigger::try_new(
            0,
            Label::new("sms").unwrap(),
            true,
            MessageText::new("Lembrete").unwrap(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn schedule_serializes_time_as_hour_minute() {
        let schedule = TriggerSchedule {
            horario: NaiveTime::from_hms_opt(8, 30, 0).unwrap(),
            ..Default::default()
        };
        let json = serde_json::to_value(&schedule).unwrap();
        assert_eq!(json["horario"], "08:30");
        assert_eq!(json["registrarLog"], true);
        let back: TriggerSchedule = serde_json::from_value(json).unwrap();
        assert_eq!(back, schedule);
    }

    #[test]
    fn repeat_limits_must_be_positive() {
        let schedule = TriggerSchedule {
            repetir: true,
            limite_repeticoes: Some(0),
            ..Default::default()
        };
        assert!(schedule.check().is_err());
    }
}
