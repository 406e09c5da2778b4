use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::{
    domain::{
        communication::{Communication, NewCommunication, UpdateCommunication},
        types::CommunicationId,
    },
    models::communication::{
        Communication as DbCommunication, NewCommunication as DbNewCommunication,
        UpdateCommunication as DbUpdateCommunication,
    },
    repository::{
        ClientHistoryQuery, CommunicationReader, CommunicationWriter, DieselRepository,
        errors::{RepositoryError, RepositoryResult},
    },
    schema::communications,
};

fn filtered(query: &ClientHistoryQuery) -> communications::BoxedQuery<'static, Sqlite> {
    let mut items = communications::table.into_boxed();
    if let Some(client_id) = query.client_id {
        items = items.filter(communications::client_id.eq(client_id.get()));
    }
    items
}

impl CommunicationReader for DieselRepository {
    fn get_communication_by_id(
        &self,
        id: CommunicationId,
    ) -> RepositoryResult<Option<Communication>> {
        let mut conn = self.conn()?;
        let communication = communications::table
            .find(id.get())
            .first::<DbCommunication>(&mut conn)
            .optional()?;

        Ok(communication.map(Communication::try_from).transpose()?)
    }

    fn list_communications(
        &self,
        query: ClientHistoryQuery,
    ) -> RepositoryResult<(usize, Vec<Communication>)> {
        let mut conn = self.conn()?;

        let total: i64 = filtered(&query).count().get_result(&mut conn)?;

        // Most recent first.
        let mut items = filtered(&query)
            .order(communications::enviado_em.desc())
            .then_order_by(communications::id.desc());
        if let Some(pagination) = &query.pagination {
            items = items.limit(pagination.limit()).offset(pagination.offset());
        }

        let communications = items
            .load::<DbCommunication>(&mut conn)?
            .into_iter()
            .map(Communication::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((total as usize, communications))
    }
}

impl CommunicationWriter for DieselRepository {
    fn create_communication(
        &self,
        new_communication: &NewCommunication,
    ) -> RepositoryResult<Communication> {
        let mut conn = self.conn()?;
        let insertable: DbNewCommunication = new_communication.into();

        let created = diesel::insert_into(communications::table)
            .values(&insertable)
            .get_result::<DbCommunication>(&mut conn)?;

        Ok(Communication::try_from(created)?)
    }

    fn update_communication(
        &self,
        id: CommunicationId,
        updates: &UpdateCommunication,
    ) -> RepositoryResult<Communication> {
        let mut conn = self.conn()?;
        let changes: DbUpdateCommunication = updates.into();

        let updated = diesel::update(communications::table.find(id.get()))
            .set(&changes)
            .get_result::<DbCommunication>(&mut conn)?;

        Ok(Communication::try_from(updated)?)
    }

    fn delete_communication(&self, id: CommunicationId) -> RepositoryResult<()> {
        let mut conn = self.conn()?;
        match diesel::delete(communications::table.find(id.get())).execute(&mut conn)? {
            0 => Err(RepositoryError::NotFound),
            _ => Ok(()),
        }
    }
}
