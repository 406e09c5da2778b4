use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::domain::interaction::{InteractionType, NewInteraction, UpdateInteraction};
use crate::domain::types::{ClientId, MessageText, TypeConstraintError, UserId, parse_timestamp};
use crate::dto::reject_if_present;
use crate::validation::{FieldRule, FieldSpec, Schema};

pub const CREATE_INTERACTION_SCHEMA: Schema = Schema::new(
    "CreateInteraction",
    &[
        FieldSpec::required("clientId", FieldRule::int_at_least(1)),
        FieldSpec::optional("userId", FieldRule::int_at_least(1)),
        FieldSpec::required("tipo", FieldRule::Text),
        FieldSpec::required("descricao", FieldRule::Text),
        FieldSpec::optional("dataInteracao", FieldRule::DateTime),
    ],
);

pub const UPDATE_INTERACTION_SCHEMA: Schema =
    CREATE_INTERACTION_SCHEMA.partial("UpdateInteraction");

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInteractionPayload {
    pub client_id: i32,
    pub user_id: Option<i32>,
    pub tipo: String,
    pub descricao: String,
    pub data_interacao: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInteractionPayload {
    pub client_id: Option<i32>,
    pub user_id: Option<i32>,
    pub tipo: Option<String>,
    pub descricao: Option<String>,
    pub data_interacao: Option<String>,
}

fn interaction_type(raw: String) -> Result<InteractionType, TypeConstraintError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TypeConstraintError::EmptyString);
    }
    Ok(InteractionType::from(trimmed))
}

impl CreateInteractionPayload {
    /// Converts to a domain value, stamping `now` when `dataInteracao` is omitted.
    pub fn into_domain(self, now: NaiveDateTime) -> Result<NewInteraction, TypeConstraintError> {
        Ok(NewInteraction {
            client_id: ClientId::new(self.client_id)?,
            user_id: self.user_id.map(UserId::new).transpose()?,
            tipo: interaction_type(self.tipo)?,
            descricao: MessageText::new(self.descricao)?,
            data_interacao: match self.data_interacao {
                Some(raw) => parse_timestamp(&raw)?,
                None => now,
            },
        })
    }
}

impl TryFrom<UpdateInteractionPayload> for UpdateInteraction {
    type Error = TypeConstraintError;

    fn try_from(payload: UpdateInteractionPayload) -> Result<Self, Self::Error> {
        reject_if_present(&payload.client_id, "clientId")?;
        reject_if_present(&payload.user_id, "userId")?;
        Ok(Self {
            tipo: payload.tipo.map(interaction_type).transpose()?,
            descricao: payload.descricao.map(MessageText::new).transpose()?,
            data_interacao: payload
                .data_interacao
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

    #[test]
    fn logs_call_with_operator() {
        let now = NaiveDate::from_ymd_opt(2024, 8, 20)
            .unwrap()
            .and_hms_opt(15, 0, 0)
            .unwrap();
        let payload: CreateInteractionPayload = parse_payload(
            &CREATE_INTERACTION_SCHEMA,
            json!({"clientId": 4, "userId": 2, "tipo": "Ligação", "descricao": "Cliente pediu segunda via"}),
        )
        .unwrap();
        let interaction = payload.into_domain(now).unwrap();
        assert_eq!(interaction.tipo, InteractionType::Call);
        assert_eq!(interaction.user_id.map(UserId::get), Some(2));
        assert_eq!(interaction.data_interacao, now);
    }

    #[test]
    fn update_keeps_author() {
        let payload: UpdateInteractionPayload =
            parse_payload(&UPDATE_INTERACTION_SCHEMA, json!({"userId": 5})).unwrap();
        assert!(UpdateInteraction::try_from(payload).is_err());
    }
}
