use std::fmt::Display;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{ClientId, InteractionId, MessageText, UserId};

/// Kind of contact logged against a client.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum InteractionType {
    Call,
    Visit,
    Meeting,
    Note,
    Negotiation,
    Other(String),
}

impl InteractionType {
    pub fn as_str(&self) -> &str {
        match self {
            InteractionType::Call => "ligacao",
            InteractionType::Visit => "visita",
            InteractionType::Meeting => "reuniao",
            InteractionType::Note => "anotacao",
            InteractionType::Negotiation => "negociacao",
            InteractionType::Other(s) => s,
        }
    }
}

impl Display for InteractionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for InteractionType {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "ligacao" | "ligação" | "call" => InteractionType::Call,
            "visita" | "visit" => InteractionType::Visit,
            "reuniao" | "reunião" | "meeting" => InteractionType::Meeting,
            "anotacao" | "anotação" | "note" => InteractionType::Note,
            "negociacao" | "negociação" | "negotiation" => InteractionType::Negotiation,
            _ => InteractionType::Other(s.to_string()),
        }
    }
}

impl From<String> for InteractionType {
    fn from(s: String) -> Self {
        s.as_str().into()
    }
}

impl From<InteractionType> for String {
    fn from(value: InteractionType) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    pub id: InteractionId,
    pub client_id: ClientId,
    /// Operator who logged the interaction, when known.
    pub user_id: Option<UserId>,
    pub tipo: InteractionType,
    pub descricao: MessageText,
    pub data_interacao: NaiveDateTime,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewInteraction {
    pub client_id: ClientId,
    pub user_id: Option<UserId>,
    pub tipo: InteractionType,
    pub descricao: MessageText,
    pub data_interacao: NaiveDateTime,
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct UpdateInteraction {
    pub tipo: Option<InteractionType>,
    pub descricao: Option<MessageText>,
    pub data_interacao: Option<NaiveDateTime>,
}

impl UpdateInteraction {
    pub fn is_empty(&self) -> bool {
        self == &UpdateInteraction::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_accented_and_english_labels() {
        assert_eq!(InteractionType::from("Ligação"), InteractionType::Call);
        assert_eq!(InteractionType::from("meeting"), InteractionType::Meeting);
        assert_eq!(
            InteractionType::from("whatsapp"),
            InteractionType::Other("whatsapp".to_string())
        );
        assert_eq!(String::from(InteractionType::Visit), "visita");
    }
}
