use chrono::{NaiveDate, NaiveDateTime, Utc};
use diesel::prelude::*;

use crate::domain::client::{
    Client as DomainClient, NewClient as DomainNewClient, UpdateClient as DomainUpdateClient,
};
use crate::domain::types::{ClientId, Email, PersonName, PhoneNumber, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::clients)]
/// Diesel model for [`crate::domain::client::Client`].
pub struct Client {
    pub id: i32,
    pub nome: String,
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
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::clients)]
/// Insertable form of [`Client`].
pub struct NewClient<'a> {
    pub nome: &'a str,
    pub nome_conjuge: Option<&'a str>,
    pub profissao: Option<&'a str>,
    pub data_nascimento: Option<NaiveDate>,
    pub email: Option<&'a str>,
    pub telefone: Option<&'a str>,
    pub numero_lote: Option<&'a str>,
    pub quadra: Option<&'a str>,
    pub area: Option<f64>,
    pub endereco: Option<&'a str>,
    pub cidade: Option<&'a str>,
    pub estado: Option<&'a str>,
    pub cep: Option<&'a str>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::clients)]
/// Data used when updating a [`Client`] record. `None` columns are skipped.
pub struct UpdateClient<'a> {
    pub nome: Option<&'a str>,
    pub nome_conjuge: Option<&'a str>,
    pub profissao: Option<&'a str>,
    pub data_nascimento: Option<NaiveDate>,
    pub email: Option<&'a str>,
    pub telefone: Option<&'a str>,
    pub numero_lote: Option<&'a str>,
    pub quadra: Option<&'a str>,
    pub area: Option<f64>,
    pub endereco: Option<&'a str>,
    pub cidade: Option<&'a str>,
    pub estado: Option<&'a str>,
    pub cep: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Client> for DomainClient {
    type Error = TypeConstraintError;

    fn try_from(client: Client) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ClientId::try_from(client.id)?,
            nome: PersonName::new(client.nome)?,
            nome_conjuge: client.nome_conjuge,
            profissao: client.profissao,
            data_nascimento: client.data_nascimento,
            email: client.email.map(Email::new).transpose()?,
            telefone: client.telefone.map(PhoneNumber::new).transpose()?,
            numero_lote: client.numero_lote,
            quadra: client.quadra,
            area: client.area,
            endereco: client.endereco,
            cidade: client.cidade,
            estado: client.estado,
            cep: client.cep,
            created_at: client.created_at,
            updated_at: client.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewClient> for NewClient<'a> {
    fn from(client: &'a DomainNewClient) -> Self {
        let profile = &client.profile;
        Self {
            nome: client.nome.as_str(),
            nome_conjuge: profile.nome_conjuge.as_deref(),
            profissao: profile.profissao.as_deref(),
            data_nascimento: profile.data_nascimento,
            email: profile.email.as_ref().map(|e| e.as_str()),
            telefone: profile.telefone.as_ref().map(|p| p.as_str()),
            numero_lote: profile.numero_lote.as_deref(),
            quadra: profile.quadra.as_deref(),
            area: profile.area,
            endereco: profile.endereco.as_deref(),
            cidade: profile.cidade.as_deref(),
            estado: profile.estado.as_deref(),
            cep: profile.cep.as_deref(),
        }
    }
}

impl<'a> From<&'a DomainUpdateClient> for UpdateClient<'a> {
    fn from(client: &'a DomainUpdateClient) -> Self {
        let profile = &client.profile;
        Self {
            nome: client.nome.as_ref().map(|n| n.as_str()),
            nome_conjuge: profile.nome_conjuge.as_deref(),
            profissao: profile.profissao.as_deref(),
            data_nascimento: profile.data_nascimento,
            email: profile.email.as_ref().map(|e| e.as_str()),
            telefone: profile.telefone.as_ref().map(|p| p.as_str()),
            numero_lote: profile.numero_lote.as_deref(),
            quadra: profile.quadra.as_deref(),
            area: profile.area,
            endereco: profile.endereco.as_deref(),
            cidade: profile.cidade.as_deref(),
            estado: profile.estado.as_deref(),
            cep: profile.cep.as_deref(),
            updated_at: Utc::now().naive_utc(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::client::ClientProfile;

    fn db_client() -> Client {
        let now = Utc::now().naive_utc();
        Client {
            id: 3,
            nome: "Maria Souza".to_string(),
            nome_conjuge: Some("João Souza".to_string()),
            profissao: None,
            data_nascimento: None,
            email: Some("maria@example.com".to_string()),
            telefone: Some("+5511987654321".to_string()),
            numero_lote: Some("12".to_string()),
            quadra: Some("B".to_string()),
            area: Some(360.0),
            endereco: None,
            cidade: Some("Campinas".to_string()),
            estado: Some("SP".to_string()),
            cep: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn db_client_into_domain() {
        let domain = DomainClient::try_from(db_client()).unwrap();
        assert_eq!(domain.id.get(), 3);
        assert_eq!(domain.nome.as_str(), "Maria Souza");
        assert_eq!(domain.telefone.unwrap().as_str(), "+5511987654321");
        assert_eq!(domain.area, Some(360.0));
    }

    #[test]
    fn stored_blank_name_is_rejected() {
        let mut client = db_client();
        client.nome = "  ".to_string();
        assert_eq!(
            DomainClient::try_from(client),
            Err(TypeConstraintError::EmptyString)
        );
    }

    #[test]
    fn update_skips_absent_fields() {
        let domain = DomainUpdateClient {
            nome: None,
            profile: ClientProfile {
                cidade: Some("Sorocaba".to_string()),
                ..Default::default()
            },
        };
        let update: UpdateClient = (&domain).into();
        assert!(update.nome.is_none());
        assert_eq!(update.cidade, Some("Sorocaba"));
        assert!(update.email.is_none());
    }
}
