//! Repository implementation for clients.

use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::{
    domain::{
        client::{Client, NewClient, UpdateClient},
        types::ClientId,
    },
    models::client::{
        Client as DbClient, NewClient as DbNewClient, UpdateClient as DbUpdateClient,
    },
    repository::{
        ClientListQuery, ClientReader, ClientWriter, DieselRepository,
        errors::{RepositoryError, RepositoryResult},
    },
    schema::clients,
};

fn filtered(query: &ClientListQuery) -> clients::BoxedQuery<'static, Sqlite> {
    let mut items = clients::table.into_boxed();
    if let Some(term) = query.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        let pattern = format!("%{term}%");
        items = items.filter(
            clients::nome
                .like(pattern.clone())
                .or(clients::email.like(pattern.clone()))
                .or(clients::telefone.like(pattern.clone()))
                .or(clients::numero_lote.like(pattern.clone()))
                .or(clients::cidade.like(pattern)),
        );
    }
    items
}

impl ClientReader for DieselRepository {
    fn get_client_by_id(&self, id: ClientId) -> RepositoryResult<Option<Client>> {
        let mut conn = self.conn()?;
        let client = clients::table
            .find(id.get())
            .first::<DbClient>(&mut conn)
            .optional()?;

        Ok(client.map(Client::try_from).transpose()?)
    }

    fn list_clients(&self, query: ClientListQuery) -> RepositoryResult<(usize, Vec<Client>)> {
        let mut conn = self.conn()?;

        let total: i64 = filtered(&query).count().get_result(&mut conn)?;

        let mut items = filtered(&query).order(clients::nome.asc()).then_order_by(clients::id.asc());
        if let Some(pagination) = &query.pagination {
            items = items.limit(pagination.limit()).offset(pagination.offset());
        }

        let clients = items
            .load::<DbClient>(&mut conn)?
            .into_iter()
            .map(Client::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((total as usize, clients))
    }

    fn count_clients(&self) -> RepositoryResult<i64> {
        let mut conn = self.conn()?;
        Ok(clients::table.count().get_result(&mut conn)?)
    }

    fn list_client_ids_with_contracts(&self) -> RepositoryResult<Vec<ClientId>> {
        use crate::schema::contracts;

        let mut conn = self.conn()?;
        let ids = contracts::table
            .select(contracts::client_id)
            .distinct()
            .order(contracts::client_id.asc())
            .load::<i32>(&mut conn)?;

        ids.into_iter()
            .map(|id| ClientId::try_from(id).map_err(RepositoryError::from))
            .collect()
    }
}

impl ClientWriter for DieselRepository {
    fn create_client(&self, new_client: &NewClient) -> RepositoryResult<Client> {
        let mut conn = self.conn()?;
        let insertable: DbNewClient = new_client.into();

        let created = diesel::insert_into(clients::table)
            .values(&insertable)
            .get_result::<DbClient>(&mut conn)?;

        Ok(Client::try_from(created)?)
    }

    fn create_clients(&self, new_clients: &[NewClient]) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;
        let insertables: Vec<DbNewClient> = new_clients.iter().map(Into::into).collect();

        conn.transaction::<usize, diesel::result::Error, _>(|conn| {
            diesel::insert_into(clients::table)
                .values(&insertables)
                .execute(conn)
        })
        .map_err(RepositoryError::from)
    }

    fn update_client(&self, id: ClientId, updates: &UpdateClient) -> RepositoryResult<Client> {
        let mut conn = self.conn()?;
        let changes: DbUpdateClient = updates.into();

        let updated = diesel::update(clients::table.find(id.get()))
            .set(&changes)
            .get_result::<DbClient>(&mut conn)?;

        Ok(Client::try_from(updated)?)
    }

    fn delete_client(&self, id: ClientId) -> RepositoryResult<()> {
        let mut conn = self.conn()?;
        let deleted = diesel::delete(clients::table.find(id.get())).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
