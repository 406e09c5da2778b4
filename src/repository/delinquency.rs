//! Repository implementation for delinquency snapshots.

use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::{
    domain::{
        delinquency::{DelinquencyRecord, NewDelinquencyRecord, UpdateDelinquencyRecord},
        types::{ClientId, DelinquencyId},
    },
    models::delinquency::{
        DelinquentClient as DbDelinquentClient, NewDelinquentClient as DbNewDelinquentClient,
        UpdateDelinquentClient as DbUpdateDelinquentClient,
    },
    repository::{
        DelinquencyListQuery, DelinquencyReader, DelinquencyWriter, DieselRepository,
        errors::{RepositoryError, RepositoryResult},
    },
    schema::delinquent_clients,
};

fn filtered(query: &DelinquencyListQuery) -> delinquent_clients::BoxedQuery<'static, Sqlite> {
    let mut items = delinquent_clients::table.into_boxed();
    if let Some(status) = &query.status {
        items = items.filter(delinquent_clients::status.eq(status.clone()));
    }
    items
}

impl DelinquencyReader for DieselRepository {
    fn get_delinquency_by_id(
        &self,
        id: DelinquencyId,
    ) -> RepositoryResult<Option<DelinquencyRecord>> {
        let mut conn = self.conn()?;
        let record = delinquent_clients::table
            .find(id.get())
            .first::<DbDelinquentClient>(&mut conn)
            .optional()?;

        Ok(record.map(DelinquencyRecord::try_from).transpose()?)
    }

    fn get_delinquency_by_client(
        &self,
        client_id: ClientId,
    ) -> RepositoryResult<Option<DelinquencyRecord>> {
        let mut conn = self.conn()?;
        let record = delinquent_clients::table
            .filter(delinquent_clients::client_id.eq(client_id.get()))
            .first::<DbDelinquentClient>(&mut conn)
            .optional()?;

        Ok(record.map(DelinquencyRecord::try_from).transpose()?)
    }

    fn list_delinquencies(
        &self,
        query: DelinquencyListQuery,
    ) -> RepositoryResult<(usize, Vec<DelinquencyRecord>)> {
        let mut conn = self.conn()?;

        let total: i64 = filtered(&query).count().get_result(&mut conn)?;

        // Longest overdue first.
        let mut items = filtered(&query)
            .order(delinquent_clients::dias_atraso.desc())
            .then_order_by(delinquent_clients::id.asc());
        if let Some(pagination) = &query.pagination {
            items = items.limit(pagination.limit()).offset(pagination.offset());
        }

        let records = items
            .load::<DbDelinquentClient>(&mut conn)?
            .into_iter()
            .map(DelinquencyRecord::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((total as usize, records))
    }

    fn count_delinquencies(&self, status: &str) -> RepositoryResult<i64> {
        let mut conn = self.conn()?;
        Ok(delinquent_clients::table
            .filter(delinquent_clients::status.eq(status))
            .count()
            .get_result(&mut conn)?)
    }

    fn sum_open_amounts(&self, status: &str) -> RepositoryResult<Option<f64>> {
        let mut conn = self.conn()?;
        Ok(delinquent_clients::table
            .filter(delinquent_clients::status.eq(status))
            .select(diesel::dsl::sum(delinquent_clients::valor_em_aberto))
            .first::<Option<f64>>(&mut conn)?)
    }
}

impl DelinquencyWriter for DieselRepository {
    fn create_delinquency(
        &self,
        record: &NewDelinquencyRecord,
    ) -> RepositoryResult<DelinquencyRecord> {
        let mut conn = self.conn()?;
        let insertable: DbNewDelinquentClient = record.into();

        let created = diesel::insert_into(delinquent_clients::table)
            .values(&insertable)
            .get_result::<DbDelinquentClient>(&mut conn)?;

        Ok(DelinquencyRecord::try_from(created)?)
    }

    fn upsert_delinquency(
        &self,
        record: &NewDelinquencyRecord,
    ) -> RepositoryResult<DelinquencyRecord> {
        let mut conn = self.conn()?;
        let insertable: DbNewDelinquentClient = record.into();

        let stored = diesel::insert_into(delinquent_clients::table)
            .values(&insertable)
            .on_conflict(delinquent_clients::client_id)
            .do_update()
            .set((
                delinquent_clients::valor_em_aberto.eq(insertable.valor_em_aberto),
                delinquent_clients::dias_atraso.eq(insertable.dias_atraso),
                delinquent_clients::status.eq(insertable.status),
                delinquent_clients::parcelas.eq(&insertable.parcelas),
                delinquent_clients::updated_at.eq(insertable.updated_at),
            ))
            .get_result::<DbDelinquentClient>(&mut conn)?;

        Ok(DelinquencyRecord::try_from(stored)?)
    }

    fn update_delinquency(
        &self,
        id: DelinquencyId,
        updates: &UpdateDelinquencyRecord,
    ) -> RepositoryResult<DelinquencyRecord> {
        let mut conn = self.conn()?;
        let changes: DbUpdateDelinquentClient = updates.into();

        let updated = diesel::update(delinquent_clients::table.find(id.get()))
            .set(&changes)
            .get_result::<DbDelinquentClient>(&mut conn)?;

        Ok(DelinquencyRecord::try_from(updated)?)
    }

    fn delete_delinquency(&self, id: DelinquencyId) -> RepositoryResult<()> {
        let mut conn = self.conn()?;
        match diesel::delete(delinquent_clients::table.find(id.get())).execute(&mut conn)? {
            0 => Err(RepositoryError::NotFound),
            _ => Ok(()),
        }
    }

    fn record_last_contact(
        &self,
        client_id: ClientId,
        contacted_at: NaiveDateTime,
    ) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;
        let touched = diesel::update(
            delinquent_clients::table.filter(delinquent_clients::client_id.eq(client_id.get())),
        )
        .set((
            delinquent_clients::ultimo_contato.eq(Some(contacted_at)),
            delinquent_clients::updated_at.eq(Utc::now().naive_utc()),
        ))
        .execute(&mut conn)?;

        Ok(touched)
    }
}
