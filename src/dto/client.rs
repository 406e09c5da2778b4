use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::client::{ClientProfile, NewClient, UpdateClient};
use crate::domain::types::{Email, PersonName, PhoneNumber, TypeConstraintError};
use crate::dto::optional_text;
use crate::validation::{FieldRule, FieldSpec, Schema};

pub const CREATE_CLIENT_SCHEMA: Schema = Schema::new(
    "CreateClient",
    &[
        FieldSpec::required("nome", FieldRule::Text),
        FieldSpec::optional("nomeConjuge", FieldRule::Text),
        FieldSpec::optional("profissao", FieldRule::Text),
        FieldSpec::optional("dataNascimento", FieldRule::Date),
        FieldSpec::optional("email", FieldRule::Email),
        FieldSpec::optional("telefone", FieldRule::Text),
        FieldSpec::optional("numeroLote", FieldRule::Text),
        FieldSpec::optional("quadra", FieldRule::Text),
        FieldSpec::optional("area", FieldRule::Number { min: Some(0.0) }),
        FieldSpec::optional("endereco", FieldRule::Text),
        FieldSpec::optional("cidade", FieldRule::Text),
        FieldSpec::optional("estado", FieldRule::Text),
        FieldSpec::optional("cep", FieldRule::Text),
    ],
);

pub const UPDATE_CLIENT_SCHEMA: Schema = CREATE_CLIENT_SCHEMA.partial("UpdateClient");

/// Every import row is checked as a client creation.
pub const IMPORT_CLIENT_SCHEMA: Schema = CREATE_CLIENT_SCHEMA;

/// Optional profile fields shared by create and update payloads.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientProfilePayload {
    pub nome_conjuge: Option<String>,
    pub profissao: Option<String>,
    pub data_nascimento: Option<NaiveDate>,
    pub email: Option<String>,
    pub telefone: Option<String>,
    pub numero_lote: Option<String>,
    pub quadra: Option<String>,
    pub area: Option<f64>,
    pub endereco: Option<String>,
    pub cidade: Option<String>,
    pub estado: Option<String>,
    pub cep: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateClientPayload {
    pub nome: String,
    #[serde(flatten)]
    pub profile: ClientProfilePayload,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateClientPayload {
    pub nome: Option<String>,
    #[serde(flatten)]
    pub profile: ClientProfilePayload,
}

impl TryFrom<ClientProfilePayload> for ClientProfile {
    type Error = TypeConstraintError;

    fn try_from(payload: ClientProfilePayload) -> Result<Self, Self::Error> {
        if payload.area.is_some_and(|area| area < 0.0) {
            return Err(TypeConstraintError::Negative("area"));
        }
        Ok(Self {
            nome_conjuge: optional_text(payload.nome_conjuge),
            profissao: optional_text(payload.profissao),
            data_nascimento: payload.data_nascimento,
            email: optional_text(payload.email).map(Email::new).transpose()?,
            telefone: optional_text(payload.telefone)
                .map(PhoneNumber::new)
                .transpose()?,
            numero_lote: optional_text(payload.numero_lote),
            quadra: optional_text(payload.quadra),
            area: payload.area,
            endereco: optional_text(payload.endereco),
            cidade: optional_text(payload.cidade),
            estado: optional_text(payload.estado),
            cep: optional_text(payload.cep),
        })
    }
}

impl TryFrom<CreateClientPayload> for NewClient {
    type Error = TypeConstraintError;

    fn try_from(payload: CreateClientPayload) -> Result<Self, Self::Error> {
        Ok(NewClient::new(
            PersonName::new(payload.nome)?,
            payload.profile.try_into()?,
        ))
    }
}

impl TryFrom<UpdateClientPayload> for UpdateClient {
    type Error = TypeConstraintError;

    fn try_from(payload: UpdateClientPayload) -> Result<Self, Self::Error> {
        Ok(Self {
            nome: payload.nome.map(PersonName::new).transpose()?,
            profile: payload.profile.try_into()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::validation::parse_payload;

    #[test]
    fn create_payload_normalizes_contact_fields() {
        let payload: CreateClientPayload = parse_payload(
            &CREATE_CLIENT_SCHEMA,
            json!({
                "nome": "  Maria Souza ",
                "email": "Maria@Example.com",
                "telefone": "(11) 98765-4321",
                "cidade": "  ",
                "area": 360.5,
            }),
        )
        .unwrap();
        let client = NewClient::try_from(payload).unwrap();

        assert_eq!(client.nome.as_str(), "Maria Souza");
        assert_eq!(client.profile.email.unwrap().as_str(), "maria@example.com");
        assert_eq!(client.profile.telefone.unwrap().as_str(), "+5511987654321");
        assert_eq!(client.profile.cidade, None);
        assert_eq!(client.profile.area, Some(360.5));
    }

    #[test]
    fn create_schema_requires_name() {
        let errors = CREATE_CLIENT_SCHEMA
            .validate(&json!({"email": "not-an-email", "area": -1}))
            .unwrap_err();
        let fields: Vec<_> = errors.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["nome", "email", "area"]);
    }

    #[test]
    fn update_payload_may_be_empty() {
        let payload: UpdateClientPayload = parse_payload(&UPDATE_CLIENT_SCHEMA, json!({})).unwrap();
        assert!(UpdateClient::try_from(payload).unwrap().is_empty());
    }

    #[test]
    fn invalid_phone_is_a_type_constraint() {
        let payload: CreateClientPayload =
            parse_payload(&CREATE_CLIENT_SCHEMA, json!({"nome": "Ana", "telefone": "abc"}))
                .unwrap();
        assert_eq!(
            NewClient::try_from(payload),
            Err(TypeConstraintError::InvalidPhone)
        );
    }
}
