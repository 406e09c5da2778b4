//! Client registry: CRUD, search and bulk import.

use serde_json::Value;

use crate::domain::client::{Client, NewClient, UpdateClient};
use crate::domain::types::ClientId;
use crate::dto::client::{
    CREATE_CLIENT_SCHEMA, CreateClientPayload, IMPORT_CLIENT_SCHEMA, UPDATE_CLIENT_SCHEMA,
    UpdateClientPayload,
};
use crate::pagination::Paginated;
use crate::repository::{ClientListQuery, ClientReader, ClientWriter};
use crate::services::{PageRequest, ServiceError, ServiceResult};
use crate::validation::{ValidationErrors, parse_payload};

pub fn get_client<R>(repo: &R, client_id: i32) -> ServiceResult<Client>
where
    R: ClientReader + ?Sized,
{
    repo.get_client_by_id(ClientId::new(client_id)?)?
        .ok_or(ServiceError::NotFound)
}

/// Lists clients ordered by name, optionally filtered by a search term
/// matched against name, email and phone.
pub fn list_clients<R>(
    repo: &R,
    search: Option<String>,
    page: PageRequest,
) -> ServiceResult<Paginated<Client>>
where
    R: ClientReader + ?Sized,
{
    let mut query = ClientListQuery::new().paginate(page.page, page.per_page);
    if let Some(term) = search.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()) {
        query = query.search(term);
    }

    let (total, clients) = repo.list_clients(query)?;
    Ok(Paginated::new(clients, total, page.page, page.per_page))
}

pub fn create_client<R>(repo: &R, payload: Value) -> ServiceResult<Client>
where
    R: ClientWriter + ?Sized,
{
    let payload: CreateClientPayload = parse_payload(&CREATE_CLIENT_SCHEMA, payload)?;
    let new_client = NewClient::try_from(payload)?;

    let client = repo.create_client(&new_client).map_err(|err| {
        log::error!("Failed to create client: {err}");
        err
    })?;
    log::info!("Created client {}", client.id);
    Ok(client)
}

/// Applies a partial update. An empty payload returns the stored client.
pub fn update_client<R>(repo: &R, client_id: i32, payload: Value) -> ServiceResult<Client>
where
    R: ClientReader + ClientWriter + ?Sized,
{
    let client_id = ClientId::new(client_id)?;
    let payload: UpdateClientPayload = parse_payload(&UPDATE_CLIENT_SCHEMA, payload)?;
    let updates = UpdateClient::try_from(payload)?;

    if updates.is_empty() {
        return repo
            .get_client_by_id(client_id)?
            .ok_or(ServiceError::NotFound);
    }

    Ok(repo.update_client(client_id, &updates)?)
}

pub fn delete_client<R>(repo: &R, client_id: i32) -> ServiceResult<()>
where
    R: ClientWriter + ?Sized,
{
    let client_id = ClientId::new(client_id)?;
    repo.delete_client(client_id)?;
    log::info!("Deleted client {client_id}");
    Ok(())
}

/// Validates every row and inserts the batch only when all rows pass.
///
/// Errors are reported per row with the row index (starting at zero) as a
/// `[n]` prefix on the field path.
pub fn import_clients<R>(repo: &R, rows: Vec<Value>) -> ServiceResult<usize>
where
    R: ClientWriter + ?Sized,
{
    let mut errors = ValidationErrors::new();
    for (index, row) in rows.iter().enumerate() {
        if let Err(row_errors) = IMPORT_CLIENT_SCHEMA.validate(row) {
            errors.merge_prefixed(&format!("[{index}]"), row_errors);
        }
    }
    errors.into_result()?;

    let mut new_clients = Vec::with_capacity(rows.len());
    for (index, row) in rows.into_iter().enumerate() {
        let parsed = parse_payload::<CreateClientPayload>(&IMPORT_CLIENT_SCHEMA, row)
            .map_err(|row_errors| {
                let mut prefixed = ValidationErrors::new();
                prefixed.merge_prefixed(&format!("[{index}]"), row_errors);
                prefixed
            })?;
        let new_client = NewClient::try_from(parsed)
            .map_err(|err| ServiceError::TypeConstraint(format!("[{index}] {err}")))?;
        new_clients.push(new_client);
    }

    if new_clients.is_empty() {
        return Ok(0);
    }

    let inserted = repo.create_clients(&new_clients).map_err(|err| {
        log::error!("Failed to import {} clients: {err}", new_clients.len());
        err
    })?;
    log::info!("Imported {inserted} clients");
    Ok(inserted)
}
