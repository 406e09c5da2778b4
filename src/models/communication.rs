use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::communication::{
    Communication as DomainCommunication, NewCommunication as DomainNewCommunication,
    UpdateCommunication as DomainUpdateCommunication,
};
use crate::domain::types::{ClientId, CommunicationId, Label, MessageText, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::communications)]
pub struct Communication {
    pub id: i32,
    pub client_id: i32,
    pub canal: String,
    pub assunto: Option<String>,
    pub mensagem: String,
    /// JSON array of attachment identifiers.
    pub anexos: String,
    pub enviado_em: NaiveDateTime,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::communications)]
pub struct NewCommunication<'a> {
    pub client_id: i32,
    pub canal: &'a str,
    pub assunto: Option<&'a str>,
    pub mensagem: &'a str,
    pub anexos: String,
    pub enviado_em: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::communications)]
pub struct UpdateCommunication<'a> {
    pub canal: Option<&'a str>,
    pub assunto: Option<&'a str>,
    pub mensagem: Option<&'a str>,
    pub anexos: Option<String>,
    pub enviado_em: Option<NaiveDateTime>,
}

fn encode_attachments(anexos: &[String]) -> String {
    serde_json::to_string(anexos).unwrap_or_else(|_| "[]".to_string())
}

impl TryFrom<Communication> for DomainCommunication {
    type Error = TypeConstraintError;

    fn try_from(row: Communication) -> Result<Self, Self::Error> {
        let anexos: Vec<String> = serde_json::from_str(&row.anexos)
            .map_err(|err| TypeConstraintError::InvalidValue(format!("anexos: {err}")))?;
        Ok(Self {
            id: CommunicationId::try_from(row.id)?,
            client_id: ClientId::try_from(row.client_id)?,
            canal: Label::new(row.canal)?,
            assunto: row.assunto,
            mensagem: MessageText::new(row.mensagem)?,
            anexos,
            enviado_em: row.enviado_em,
            created_at: row.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewCommunication> for NewCommunication<'a> {
    fn from(communication: &'a DomainNewCommunication) -> Self {
        Self {
            client_id: communication.client_id.get(),
            canal: communication.canal.as_str(),
            assunto: communication.assunto.as_deref(),
            mensagem: communication.mensagem.as_str(),
            anexos: encode_attachments(&communication.anexos),
            enviado_em: communication.enviado_em,
        }
    }
}

impl<'a> From<&'a DomainUpdateCommunication> for UpdateCommunication<'a> {
    fn from(communication: &'a DomainUpdateCommunication) -> Self {
        Self {
            canal: communication.canal.as_ref().map(|c| c.as_str()),
            assunto: communication.assunto.as_deref(),
            mensagem: communication.mensagem.as_ref().map(|m| m.as_str()),
            anexos: communication.anexos.as_deref().map(encode_attachments),
            enviado_em: communication.enviado_em,
        }
    }
}
