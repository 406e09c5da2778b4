use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::types::{ClientId, Email, PersonName, PhoneNumber};

/// Buyer of one or more lots.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: ClientId,
    pub nome: PersonName,
    pub nome_conjuge: Option<String>,
    pub profissao: Option<String>,
    pub data_nascimento: Option<NaiveDate>,
    pub email: Option<Email>,
    pub telefone: Option<PhoneNumber>,
    /// Lot reference as written on the sales paperwork.
    pub numero_lote: Option<String>,
    pub quadra: Option<String>,
    pub area: Option<f64>,
    pub endereco: Option<String>,
    pub cidade: Option<String>,
    pub estado: Option<String>,
    pub cep: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct ClientProfile {
    pub nome_conjuge: Option<String>,
    pub profissao: Option<String>,
    pub data_nascimento: Option<NaiveDate>,
    pub email: Option<Email>,
    pub telefone: Option<PhoneNumber>,
    pub numero_lote: Option<String>,
    pub quadra: Option<String>,
    pub area: Option<f64>,
    pub endereco: Option<String>,
    pub cidade: Option<String>,
    pub estado: Option<String>,
    pub cep: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewClient {
    pub nome: PersonName,
    pub profile: ClientProfile,
}

impl NewClient {
    #[must_use]
    pub fn new(nome: PersonName, profile: ClientProfile) -> Self {
        Self { nome, profile }
    }
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct UpdateClient {
    pub nome: Option<PersonName>,
    pub profile: ClientProfile,
}

impl UpdateClient {
    pub fn is_empty(&self) -> bool {
        self.nome.is_none() && self.profile == ClientProfile::default()
    }
}
