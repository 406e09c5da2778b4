use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{ClientId, CommunicationId, Label, MessageText};

/// Message sent to a client through some channel. Only the record is kept;
/// delivery happens elsewhere.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Communication {
    pub id: CommunicationId,
    pub client_id: ClientId,
    pub canal: Label,
    pub assunto: Option<String>,
    pub mensagem: MessageText,
    /// Attachment identifiers, in the order given.
    pub anexos: Vec<String>,
    pub enviado_em: NaiveDateTime,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewCommunication {
    pub client_id: ClientId,
    pub canal: Label,
    pub assunto: Option<String>,
    pub mensagem: MessageText,
    pub anexos: Vec<String>,
    pub enviado_em: NaiveDateTime,
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct UpdateCommunication {
    pub canal: Option<Label>,
    pub assunto: Option<String>,
    pub mensagem: Option<MessageText>,
    pub anexos: Option<Vec<String>>,
    pub enviado_em: Option<NaiveDateTime>,
}

impl UpdateCommunication {
    pub fn is_empty(&self) -> bool {
        self == &UpdateCommunication::default()
    }
}
