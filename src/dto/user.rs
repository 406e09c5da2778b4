use serde::Deserialize;

use crate::domain::types::{Email, Label, PersonName, TypeConstraintError};
use crate::domain::user::{NewUser, UpdateUser};
use crate::dto::optional_text;
use crate::validation::{FieldRule, FieldSpec, Schema};

/// Role given to users created without one.
pub const DEFAULT_USER_ROLE: &str = "usuario";

pub const CREATE_USER_SCHEMA: Schema = Schema::new(
    "CreateUser",
    &[
        FieldSpec::required("nome", FieldRule::Text),
        FieldSpec::required("email", FieldRule::Email),
        FieldSpec::optional("papel", FieldRule::Text),
    ],
);

pub const UPDATE_USER_SCHEMA: Schema = CREATE_USER_SCHEMA.partial("UpdateUser");

#[derive(Debug, Deserialize)]
pub struct CreateUserPayload {
    pub nome: String,
    pub email: String,
    pub papel: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserPayload {
    pub nome: Option<String>,
    pub email: Option<String>,
    pub papel: Option<String>,
}

impl TryFrom<CreateUserPayload> for NewUser {
    type Error = TypeConstraintError;

    fn try_from(payload: CreateUserPayload) -> Result<Self, Self::Error> {
        let papel = optional_text(payload.papel).unwrap_or_else(|| DEFAULT_USER_ROLE.to_string());
        NewUser::try_new(payload.nome, payload.email, papel)
    }
}

impl TryFrom<UpdateUserPayload> for UpdateUser {
    type Error = TypeConstraintError;

    fn try_from(payload: UpdateUserPayload) -> Result<Self, Self::Error> {
        Ok(Self {
            nome: payload.nome.map(PersonName::new).transpose()?,
            email: payload.email.map(Email::new).transpose()?,
            papel: payload.papel.map(Label::new).transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::validation::parse_payload;

    #[test]
    fn role_defaults_when_blank() {
        let payload: CreateUserPayload = parse_payload(
            &CREATE_USER_SCHEMA,
            json!({"nome": "Carla", "email": "CARLA@loteamento.com.br", "papel": " "}),
        )
        .unwrap();
        let user = NewUser::try_from(payload).unwrap();
        assert_eq!(user.papel.as_str(), DEFAULT_USER_ROLE);
        assert_eq!(user.email.as_str(), "carla@loteamento.com.br");
    }

    #[test]
    fn email_is_required_and_checked() {
        let errors = CREATE_USER_SCHEMA
            .validate(&json!({"nome": "Carla", "email": "carla"}))
            .unwrap_err();
        assert_eq!(errors.errors()[0].kind.code(), "invalid_email");
    }
}
