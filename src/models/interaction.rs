use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::interaction::{
    Interaction as DomainInteraction, NewInteraction as DomainNewInteraction,
    UpdateInteraction as DomainUpdateInteraction,
};
use crate::domain::types::{ClientId, InteractionId, MessageText, TypeConstraintError, UserId};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::interactions)]
pub struct Interaction {
    pub id: i32,
    pub client_id: i32,
    pub user_id: Option<i32>,
    pub tipo: String,
    pub descricao: String,
    pub data_interacao: NaiveDateTime,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::interactions)]
pub struct NewInteraction<'a> {
    pub client_id: i32,
    pub user_id: Option<i32>,
    pub tipo: &'a str,
    pub descricao: &'a str,
    pub data_interacao: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::interactions)]
pub struct UpdateInteraction<'a> {
    pub tipo: Option<&'a str>,
    pub descricao: Option<&'a str>,
    pub data_interacao: Option<NaiveDateTime>,
}

impl TryFrom<Interaction> for DomainInteraction {
    type Error = TypeConstraintError;

    fn try_from(row: Interaction) -> Result<Self, Self::Error> {
        Ok(Self {
            id: InteractionId::try_from(row.id)?,
            client_id: ClientId::try_from(row.client_id)?,
            user_id: row.user_id.map(UserId::try_from).transpose()?,
            tipo: row.tipo.into(),
            descricao: MessageText::new(row.descricao)?,
            data_interacao: row.data_interacao,
            created_at: row.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewInteraction> for NewInteraction<'a> {
    fn from(interaction: &'a DomainNewInteraction) -> Self {
        Self {
            client_id: interaction.client_id.get(),
            user_id: interaction.user_id.map(UserId::get),
            tipo: interaction.tipo.as_str(),
            descricao: interaction.descricao.as_str(),
            data_interacao: interaction.data_interacao,
        }
    }
}

impl<'a> From<&'a DomainUpdateInteraction> for UpdateInteraction<'a> {
    fn from(interaction: &'a DomainUpdateInteraction) -> Self {
        Self {
            tipo: interaction.tipo.as_ref().map(|t| t.as_str()),
            descricao: interaction.descricao.as_ref().map(|d| d.as_str()),
            data_interacao: interaction.data_interacao,
        }
    }
}
