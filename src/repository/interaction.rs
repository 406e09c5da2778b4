use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::{
    domain::{
        interaction::{Interaction, NewInteraction, UpdateInteraction},
        types::InteractionId,
    },
    models::interaction::{
        Interaction as DbInteraction, NewInteraction as DbNewInteraction,
        UpdateInteraction as DbUpdateInteraction,
    },
    repository::{
        ClientHistoryQuery, DieselRepository, InteractionReader, InteractionWriter,
        errors::{RepositoryError, RepositoryResult},
    },
    schema::interactions,
};

fn filtered(query: &ClientHistoryQuery) -> interactions::BoxedQuery<'static, Sqlite> {
    let mut items = interactions::table.into_boxed();
    if let Some(client_id) = query.client_id {
        items = items.filter(interactions::client_id.eq(client_id.get()));
    }
    items
}

impl InteractionReader for DieselRepository {
    fn get_interaction_by_id(&self, id: InteractionId) -> RepositoryResult<Option<Interaction>> {
        let mut conn = self.conn()?;
        let interaction = interactions::table
            .find(id.get())
            .first::<DbInteraction>(&mut conn)
            .optional()?;

        Ok(interaction.map(Interaction::try_from).transpose()?)
    }

    fn list_interactions(
        &self,
        query: ClientHistoryQuery,
    ) -> RepositoryResult<(usize, Vec<Interaction>)> {
        let mut conn = self.conn()?;

        let total: i64 = filtered(&query).count().get_result(&mut conn)?;

        let mut items = filtered(&query)
            .order(interactions::data_interacao.desc())
            .then_order_by(interactions::id.desc());
        if let Some(pagination) = &query.pagination {
            items = items.limit(pagination.limit()).offset(pagination.offset());
        }

        let interactions = items
            .load::<DbInteraction>(&mut conn)?
            .into_iter()
            .map(Interaction::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((total as usize, interactions))
    }
}

impl InteractionWriter for DieselRepository {
    fn create_interaction(
        &self,
        new_interaction: &NewInteraction,
    ) -> RepositoryResult<Interaction> {
        let mut conn = self.conn()?;
        let insertable: DbNewInteraction = new_interaction.into();

        let created = diesel::insert_into(interactions::table)
            .values(&insertable)
            .get_result::<DbInteraction>(&mut conn)?;

        Ok(Interaction::try_from(created)?)
    }

    fn update_interaction(
        &self,
        id: InteractionId,
        updates: &UpdateInteraction,
    ) -> RepositoryResult<Interaction> {
        let mut conn = self.conn()?;
        let changes: DbUpdateInteraction = updates.into();

        let updated = diesel::update(interactions::table.find(id.get()))
            .set(&changes)
            .get_result::<DbInteraction>(&mut conn)?;

        Ok(Interaction::try_from(updated)?)
    }

    fn delete_interaction(&self, id: InteractionId) -> RepositoryResult<()> {
        let mut conn = self.conn()?;
        match diesel::delete(interactions::table.find(id.get())).execute(&mut conn)? {
            0 => Err(RepositoryError::NotFound),
            _ => Ok(()),
        }
    }
}
