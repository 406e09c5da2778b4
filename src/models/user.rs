use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::types::{Email, Label, PersonName, TypeConstraintError, UserId};
use crate::domain::user::{
    NewUser as DomainNewUser, UpdateUser as DomainUpdateUser, User as DomainUser,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::users)]
pub struct User {
    pub id: i32,
    pub nome: String,
    pub email: String,
    pub papel: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    pub nome: &'a str,
    pub email: &'a str,
    pub papel: &'a str,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::users)]
pub struct UpdateUser<'a> {
    pub nome: Option<&'a str>,
    pub email: Option<&'a str>,
    pub papel: Option<&'a str>,
}

impl TryFrom<User> for DomainUser {
    type Error = TypeConstraintError;

    fn try_from(user: User) -> Result<Self, Self::Error> {
        Ok(Self {
            id: UserId::try_from(user.id)?,
            nome: PersonName::new(user.nome)?,
            email: Email::new(user.email)?,
            papel: Label::new(user.papel)?,
            created_at: user.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewUser> for NewUser<'a> {
    fn from(user: &'a DomainNewUser) -> Self {
        Self {
            nome: user.nome.as_str(),
            email: user.email.as_str(),
            papel: user.papel.as_str(),
        }
    }
}

impl<'a> From<&'a DomainUpdateUser> for UpdateUser<'a> {
    fn from(user: &'a DomainUpdateUser) -> Self {
        Self {
            nome: user.nome.as_ref().map(|n| n.as_str()),
            email: user.email.as_ref().map(|e| e.as_str()),
            papel: user.papel.as_ref().map(|p| p.as_str()),
        }
    }
}
