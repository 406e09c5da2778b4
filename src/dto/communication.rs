use serde::Deserialize;

use crate::domain::communication::{NewCommunication, UpdateCommunication};
use crate::domain::types::{ClientId, Label, MessageText, TypeConstraintError, parse_timestamp};
use crate::dto::{optional_text, reject_if_present};
use crate::validation::{FieldRule, FieldSpec, Schema};

pub const CREATE_COMMUNICATION_SCHEMA: Schema = Schema::new(
    "CreateCommunication",
    &[
        FieldSpec::required("clientId", FieldRule::int_at_least(1)),
        FieldSpec::required("canal", FieldRule::Text),
        FieldSpec::optional("assunto", FieldRule::Text),
        FieldSpec::required("mensagem", FieldRule::Text),
        FieldSpec::optional("anexos", FieldRule::TextArray),
        FieldSpec::optional("enviadoEm", FieldRule::DateTime),
    ],
);

pub const UPDATE_COMMUNICATION_SCHEMA: Schema =
    CREATE_COMMUNICATION_SCHEMA.partial("UpdateCommunication");

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommunicationPayload {
    pub client_id: i32,
    pub canal: String,
    pub assunto: Option<String>,
    pub mensagem: String,
    #[serde(default)]
    pub anexos: Vec<String>,
    pub enviado_em: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCommunicationPayload {
    pub client_id: Option<i32>,
    pub canal: Option<String>,
    pub assunto: Option<String>,
    pub mensagem: Option<String>,
    pub anexos: Option<Vec<String>>,
    pub enviado_em: Option<String>,
}

impl CreateCommunicationPayload {
    /// Converts to a domain value, stamping `now` when `enviadoEm` is omitted.
    pub fn into_domain(
        self,
        now: chrono::NaiveDateTime,
    ) -> Result<NewCommunication, TypeConstraintError> {
        Ok(NewCommunication {
            client_id: ClientId::new(self.client_id)?,
            canal: Label::new(self.canal)?,
            assunto: optional_text(self.assunto),
            mensagem: MessageText::new(self.mensagem)?,
            anexos: self.anexos.into_iter().map(|a| a.trim().to_string()).collect(),
            enviado_em: match self.enviado_em {
                Some(raw) => parse_timestamp(&raw)?,
                None => now,
            },
        })
    }
}

impl TryFrom<UpdateCommunicationPayload> for UpdateCommunication {
    type Error = TypeConstraintError;

    fn try_from(payload: UpdateCommunicationPayload) -> Result<Self, Self::Error> {
        reject_if_present(&payload.client_id, "clientId")?;
        Ok(Self {
            canal: payload.canal.map(Label::new).transpose()?,
            assunto: optional_text(payload.assunto),
            mensagem: payload.mensagem.map(MessageText::new).transpose()?,
            anexos: payload
                .anexos
                .map(|anexos| anexos.into_iter().map(|a| a.trim().to_string()).collect()),
            enviado_em: payload
                .enviado_em
                .as_deref()
                .map(parse_timestamp)
                .transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use super::*;
    use crate::validation::parse_payload;

    fn now() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 7, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    #[test]
    fn send_time_defaults_to_now() {
        let payload: CreateCommunicationPayload = parse_payload(
            &CREATE_COMMUNICATION_SCHEMA,
            json!({"clientId": 3, "canal": "email", "mensagem": "<b>Boleto</b> em anexo", "anexos": ["boleto-12.pdf"]}),
        )
        .unwrap();
        let communication = payload.into_domain(now()).unwrap();
        assert_eq!(communication.enviado_em, now());
        assert_eq!(communication.anexos, vec!["boleto-12.pdf"]);
        assert_eq!(communication.mensagem.as_str(), "<b>Boleto</b> em anexo");
    }

    #[test]
    fn attachments_must_be_strings() {
        let errors = CREATE_COMMUNICATION_SCHEMA
            .validate(&json!({"clientId": 3, "canal": "sms", "mensagem": "Oi", "anexos": [1]}))
            .unwrap_err();
        assert_eq!(errors.errors()[0].field, "anexos[0]");
    }

    #[test]
    fn update_cannot_move_to_another_client() {
        let payload = UpdateCommunicationPayload {
            client_id: Some(9),
            ..Default::default()
        };
        assert!(UpdateCommunication::try_from(payload).is_err());
    }
}
