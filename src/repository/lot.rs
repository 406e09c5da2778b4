use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::{
    domain::{
        lot::{Lot, LotStatus, NewLot, UpdateLot},
        types::LotId,
    },
    models::lot::{Lot as DbLot, NewLot as DbNewLot, UpdateLot as DbUpdateLot},
    repository::{
        DieselRepository, LotListQuery, LotReader, LotWriter,
        errors::{RepositoryError, RepositoryResult},
    },
    schema::lots,
};

fn filtered(status: Option<&LotStatus>) -> lots::BoxedQuery<'static, Sqlite> {
    let mut items = lots::table.into_boxed();
    if let Some(status) = status {
        items = items.filter(lots::status.eq(status.as_str().to_string()));
    }
    items
}

impl LotReader for DieselRepository {
    fn get_lot_by_id(&self, id: LotId) -> RepositoryResult<Option<Lot>> {
        let mut conn = self.conn()?;
        let lot = lots::table
            .find(id.get())
            .first::<DbLot>(&mut conn)
            .optional()?;

        Ok(lot.map(Lot::try_from).transpose()?)
    }

    fn list_lots(&self, query: LotListQuery) -> RepositoryResult<(usize, Vec<Lot>)> {
        let mut conn = self.conn()?;

        let total: i64 = filtered(query.status.as_ref())
            .count()
            .get_result(&mut conn)?;

        let mut items = filtered(query.status.as_ref())
            .order(lots::quadra.asc())
            .then_order_by(lots::numero.asc());
        if let Some(pagination) = &query.pagination {
            items = items.limit(pagination.limit()).offset(pagination.offset());
        }

        let lots = items
            .load::<DbLot>(&mut conn)?
            .into_iter()
            .map(Lot::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((total as usize, lots))
    }

    fn count_lots(&self, status: Option<LotStatus>) -> RepositoryResult<i64> {
        let mut conn = self.conn()?;
        Ok(filtered(status.as_ref()).count().get_result(&mut conn)?)
    }
}

impl LotWriter for DieselRepository {
    fn create_lot(&self, new_lot: &NewLot) -> RepositoryResult<Lot> {
        let mut conn = self.conn()?;
        let insertable: DbNewLot = new_lot.into();

        let created = diesel::insert_into(lots::table)
            .values(&insertable)
            .get_result::<DbLot>(&mut conn)?;

        Ok(Lot::try_from(created)?)
    }

    fn update_lot(&self, id: LotId, updates: &UpdateLot) -> RepositoryResult<Lot> {
        let mut conn = self.conn()?;
        let changes: DbUpdateLot = updates.into();

        let updated = diesel::update(lots::table.find(id.get()))
            .set(&changes)
            .get_result::<DbLot>(&mut conn)?;

        Ok(Lot::try_from(updated)?)
    }

    fn delete_lot(&self, id: LotId) -> RepositoryResult<()> {
        let mut conn = self.conn()?;
        match diesel::delete(lots::table.find(id.get())).execute(&mut conn)? {
            0 => Err(RepositoryError::NotFound),
            _ => Ok(()),
        }
    }
}
