//! Messages sent to clients. Only the record is kept here.

use chrono::NaiveDateTime;
use serde_json::Value;

use crate::domain::communication::{Communication, UpdateCommunication};
use crate::domain::types::{ClientId, CommunicationId};
use crate::dto::communication::{
    CREATE_COMMUNICATION_SCHEMA, CreateCommunicationPayload, UPDATE_COMMUNICATION_SCHEMA,
    UpdateCommunicationPayload,
};
use crate::pagination::Paginated;
use crate::repository::{
    ClientHistoryQuery, CommunicationReader, CommunicationWriter, DelinquencyWriter,
};
use crate::services::{PageRequest, ServiceError, ServiceResult};
use crate::validation::parse_payload;

pub fn get_communication<R>(repo: &R, id: i32) -> ServiceResult<Communication>
where
    R: CommunicationReader + ?Sized,
{
    repo.get_communication_by_id(CommunicationId::new(id)?)?
        .ok_or(ServiceError::NotFound)
}

/// Newest first.
pub fn list_communications<R>(
    repo: &R,
    client_id: Option<i32>,
    page: PageRequest,
) -> ServiceResult<Paginated<Communication>>
where
    R: CommunicationReader + ?Sized,
{
    let mut query = ClientHistoryQuery::default().paginate(page.page, page.per_page);
    if let Some(client_id) = client_id {
        query = query.client(ClientId::new(client_id)?);
    }
    let (total, items) = repo.list_communications(query)?;
    Ok(Paginated::new(items, total, page.page, page.per_page))
}

/// Records a communication and stamps the client's delinquency snapshot
/// with the send time.
pub fn create_communication<R>(
    repo: &R,
    payload: Value,
    now: NaiveDateTime,
) -> ServiceResult<Communication>
where
    R: CommunicationWriter + DelinquencyWriter + ?Sized,
{
    let payload: CreateCommunicationPayload =
        parse_payload(&CREATE_COMMUNICATION_SCHEMA, payload)?;
    let new_communication = payload.into_domain(now)?;

    let communication = repo.create_communication(&new_communication)?;
    repo.record_last_contact(communication.client_id, communication.enviado_em)?;
    log::info!(
        "Recorded {} communication to client {}",
        communication.canal,
        communication.client_id
    );
    Ok(communication)
}

pub fn update_communication<R>(repo: &R, id: i32, payload: Value) -> ServiceResult<Communication>
where
    R: CommunicationReader + CommunicationWriter + ?Sized,
{
    let id = CommunicationId::new(id)?;
    let payload: UpdateCommunicationPayload =
        parse_payload(&UPDATE_COMMUNICATION_SCHEMA, payload)?;
    let updates = UpdateCommunication::try_from(payload)?;

    if updates.is_empty() {
        return repo
            .get_communication_by_id(id)?
            .ok_or(ServiceError::NotFound);
    }
    Ok(repo.update_communication(id, &updates)?)
}

pub fn delete_communication<R>(repo: &R, id: i32) -> ServiceResult<()>
where
    R: CommunicationWriter + ?Sized,
{
    repo.delete_communication(CommunicationId::new(id)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::types::{Label, MessageText};
    use crate::repository::mock::MockRepository;
    use crate::services::fixtures;

    #[test]
    fn create_records_last_contact() {
        let now = fixtures::timestamp();
        let mut repo = MockRepository::new();
        repo.expect_create_communication().returning(|new| {
            Ok(Communication {
                id: CommunicationId::new(1).unwrap(),
                client_id: new.client_id,
                canal: new.canal.clone(),
                assunto: new.assunto.clone(),
                mensagem: new.mensagem.clone(),
                anexos: new.anexos.clone(),
                enviado_em: new.enviado_em,
                created_at: new.enviado_em,
            })
        });
        repo.expect_record_last_contact()
            .withf(move |client_id, at| client_id.get() == 5 && *at == now)
            .times(1)
            .returning(|_, _| Ok(1));

        let communication = create_communication(
            &repo,
            json!({"clientId": 5, "canal": "whatsapp", "mensagem": "Segunda via enviada"}),
            now,
        )
        .unwrap();
        assert_eq!(communication.canal, Label::new("whatsapp").unwrap());
        assert_eq!(
            communication.mensagem,
            MessageText::new("Segunda via enviada").unwrap()
        );
    }

    #[test]
    fn missing_message_is_reported() {
        let repo = MockRepository::new();
        let result = create_communication(
            &repo,
            json!({"clientId": 5, "canal": "email"}),
            fixtures::timestamp(),
        );
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }
}
