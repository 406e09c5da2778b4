use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{Email, Label, PersonName, TypeConstraintError, UserId};

/// Back-office operator. The role is a display label only.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub nome: PersonName,
    pub email: Email,
    pub papel: Label,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewUser {
    pub nome: PersonName,
    pub email: Email,
    pub papel: Label,
}

impl NewUser {
    #[must_use]
    pub fn new(nome: PersonName, email: Email, papel: Label) -> Self {
        Self { nome, email, papel }
    }

    /// Builds a user from raw strings, validating each value.
    pub fn try_new(
        nome: impl Into<String>,
        email: impl Into<String>,
        papel: impl Into<String>,
    ) -> Result<Self, TypeConstraintError> {
        Ok(Self::new(
            PersonName::new(nome)?,
            Email::new(email)?,
            Label::new(papel)?,
        ))
    }
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct UpdateUser {
    pub nome: Option<PersonName>,
    pub email: Option<Email>,
    pub papel: Option<Label>,
}

impl UpdateUser {
    pub fn is_empty(&self) -> bool {
        self == &UpdateUser::default()
    }
}
