//! Repository implementation for price adjustments (reajustes).

use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::{
    domain::{
        installment::InstallmentStatus,
        price_adjustment::{NewPriceAdjustment, PriceAdjustment},
        types::{PriceAdjustmentId, round_cents},
    },
    models::{
        contract::Installment as DbInstallment,
        price_adjustment::{
            NewPriceAdjustment as DbNewPriceAdjustment, PriceAdjustment as DbPriceAdjustment,
            UpdatePriceAdjustment as DbUpdatePriceAdjustment,
        },
    },
    repository::{
        DieselRepository, PriceAdjustmentListQuery, PriceAdjustmentReader, PriceAdjustmentWriter,
        errors::{RepositoryError, RepositoryResult},
    },
    schema::{installments, price_adjustments},
};

fn filtered(query: &PriceAdjustmentListQuery) -> price_adjustments::BoxedQuery<'static, Sqlite> {
    let mut items = price_adjustments::table.into_boxed();
    if let Some(contract_id) = query.contract_id {
        items = items.filter(price_adjustments::contract_id.eq(contract_id.get()));
    }
    items
}

impl PriceAdjustmentReader for DieselRepository {
    fn get_price_adjustment_by_id(
        &self,
        id: PriceAdjustmentId,
    ) -> RepositoryResult<Option<PriceAdjustment>> {
        let mut conn = self.conn()?;
        let adjustment = price_adjustments::table
            .find(id.get())
            .first::<DbPriceAdjustment>(&mut conn)
            .optional()?;

        Ok(adjustment.map(PriceAdjustment::try_from).transpose()?)
    }

    fn list_price_adjustments(
        &self,
        query: PriceAdjustmentListQuery,
    ) -> RepositoryResult<(usize, Vec<PriceAdjustment>)> {
        let mut conn = self.conn()?;

        let total: i64 = filtered(&query).count().get_result(&mut conn)?;

        let mut items = filtered(&query)
            .order(price_adjustments::data_referencia.asc())
            .then_order_by(price_adjustments::id.asc());
        if let Some(pagination) = &query.pagination {
            items = items.limit(pagination.limit()).offset(pagination.offset());
        }

        let adjustments = items
            .load::<DbPriceAdjustment>(&mut conn)?
            .into_iter()
            .map(PriceAdjustment::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((total as usize, adjustments))
    }
}

impl PriceAdjustmentWriter for DieselRepository {
    fn create_price_adjustment(
        &self,
        new_adjustment: &NewPriceAdjustment,
    ) -> RepositoryResult<PriceAdjustment> {
        let mut conn = self.conn()?;
        let insertable: DbNewPriceAdjustment = new_adjustment.into();

        let created = diesel::insert_into(price_adjustments::table)
            .values(&insertable)
            .get_result::<DbPriceAdjustment>(&mut conn)?;

        Ok(PriceAdjustment::try_from(created)?)
    }

    fn save_price_adjustment(
        &self,
        adjustment: &PriceAdjustment,
    ) -> RepositoryResult<PriceAdjustment> {
        let mut conn = self.conn()?;
        let changes: DbUpdatePriceAdjustment = adjustment.into();

        let saved = diesel::update(price_adjustments::table.find(adjustment.id.get()))
            .set(&changes)
            .get_result::<DbPriceAdjustment>(&mut conn)?;

        Ok(PriceAdjustment::try_from(saved)?)
    }

    fn apply_price_adjustment(
        &self,
        adjustment: &PriceAdjustment,
    ) -> RepositoryResult<(PriceAdjustment, usize)> {
        let mut conn = self.conn()?;
        let changes: DbUpdatePriceAdjustment = adjustment.into();
        let factor = adjustment.factor();

        let (saved, touched) = conn
            .transaction::<_, RepositoryError, _>(|conn| {
                // An already applied record matches no row.
                let saved = diesel::update(
                    price_adjustments::table
                        .find(adjustment.id.get())
                        .filter(price_adjustments::aplicado.eq(false)),
                )
                .set(&changes)
                .get_result::<DbPriceAdjustment>(conn)
                .optional()?
                .ok_or_else(|| {
                    RepositoryError::ConstraintViolation(format!(
                        "price adjustment {} was already applied",
                        adjustment.id
                    ))
                })?;

                let pending = installments::table
                    .filter(installments::contract_id.eq(adjustment.contract_id.get()))
                    .filter(installments::numero_parcela.ge(adjustment.parcela_referencia))
                    .load::<DbInstallment>(conn)?
                    .into_iter()
                    .filter(|row| !InstallmentStatus::from(row.status.as_str()).is_paid());

                let mut touched = 0;
                for row in pending {
                    touched += diesel::update(installments::table.find(row.id))
                        .set(
                            installments::valor_corrigido
                                .eq(round_cents(row.valor_corrigido * factor)),
                        )
                        .execute(conn)?;
                }

                Ok((saved, touched))
            })?;

        Ok((PriceAdjustment::try_from(saved)?, touched))
    }

    fn delete_price_adjustment(&self, id: PriceAdjustmentId) -> RepositoryResult<()> {
        let mut conn = self.conn()?;
        match diesel::delete(price_adjustments::table.find(id.get())).execute(&mut conn)? {
            0 => Err(RepositoryError::NotFound),
            _ => Ok(()),
        }
    }
}
