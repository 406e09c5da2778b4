use chrono::NaiveDateTime;
use serde_json::Value;

use crate::domain::interaction::{Interaction, UpdateInteraction};
use crate::domain::types::{ClientId, InteractionId};
use crate::dto::interaction::{
    CREATE_INTERACTION_SCHEMA, CreateInteractionPayload, UPDATE_INTERACTION_SCHEMA,
    UpdateInteractionPayload,
};
use crate::pagination::Paginated;
use crate::repository::{
    ClientHistoryQuery, DelinquencyWriter, InteractionReader, InteractionWriter, UserReader,
};
use crate::services::{PageRequest, ServiceError, ServiceResult};
use crate::validation::parse_payload;

pub fn get_interaction<R>(repo: &R, id: i32) -> ServiceResult<Interaction>
where
    R: InteractionReader + ?Sized,
{
    repo.get_interaction_by_id(InteractionId::new(id)?)?
        .ok_or(ServiceError::NotFound)
}

pub fn list_interactions<R>(
    repo: &R,
    client_id: Option<i32>,
    page: PageRequest,
) -> ServiceResult<Paginated<Interaction>>
where
    R: InteractionReader + ?Sized,
{
    let mut query = ClientHistoryQuery::default().paginate(page.page, page.per_page);
    if let Some(client_id) = client_id {
        query = query.client(ClientId::new(client_id)?);
    }
    let (total, items) = repo.list_interactions(query)?;
    Ok(Paginated::new(items, total, page.page, page.per_page))
}

/// Logs an interaction and stamps the client's delinquency snapshot with
/// its date. The operator, when given, must exist.
pub fn create_interaction<R>(
    repo: &R,
    payload: Value,
    now: NaiveDateTime,
) -> ServiceResult<Interaction>
where
    R: InteractionWriter + UserReader + DelinquencyWriter + ?Sized,
{
    let payload: CreateInteractionPayload = parse_payload(&CREATE_INTERACTION_SCHEMA, payload)?;
    let new_interaction = payload.into_domain(now)?;

    if let Some(user_id) = new_interaction.user_id {
        if repo.get_user_by_id(user_id)?.is_none() {
            return Err(ServiceError::NotFound);
        }
    }

    let interaction = repo.create_interaction(&new_interaction)?;
    repo.record_last_contact(interaction.client_id, interaction.data_interacao)?;
    Ok(interaction)
}

pub fn update_interaction<R>(repo: &R, id: i32, payload: Value) -> ServiceResult<Interaction>
where
    R: InteractionReader + InteractionWriter + ?Sized,
{
    let id = InteractionId::new(id)?;
    let payload: UpdateInteractionPayload = parse_payload(&UPDATE_INTERACTION_SCHEMA, payload)?;
    let updates = UpdateInteraction::try_from(payload)?;

    if updates.is_empty() {
        return repo
            .get_interaction_by_id(id)?
            .ok_or(ServiceError::NotFound);
    }
    Ok(repo.update_interaction(id, &updates)?)
}

pub fn delete_interaction<R>(repo: &R, id: i32) -> ServiceResult<()>
where
    R: InteractionWriter + ?Sized,
{
    repo.delete_interaction(InteractionId::new(id)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::repository::mock::MockRepository;
    use crate::services::fixtures;

    #[test]
    fn unknown_operator_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_id().returning(|_| Ok(None));
        repo.expect_create_interaction().never();
        repo.expect_record_last_contact().never();

        let result = create_interaction(
            &repo,
            json!({"clientId": 1, "userId": 3, "tipo": "visita", "descricao": "Visitou o lote"}),
            fixtures::timestamp(),
        );
        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn empty_update_reads_back() {
        let mut repo = MockRepository::new();
        repo.expect_get_interaction_by_id().returning(|_| Ok(None));
        repo.expect_update_interaction().never();

        assert!(matches!(
            update_interaction(&repo, 1, json!({})),
            Err(ServiceError::NotFound)
        ));
    }
}
