//! Repository implementation for contracts and installments.

use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::{
    domain::{
        contract::{Contract, NewContract, ScheduledInstallment, UpdateContract},
        installment::Installment,
        types::{ClientId, ContractId, InstallmentId},
    },
    models::contract::{
        Contract as DbContract, Installment as DbInstallment, NewContract as DbNewContract,
        NewInstallment as DbNewInstallment, UpdateContract as DbUpdateContract,
    },
    repository::{
        ContractListQuery, ContractReader, ContractWriter, DieselRepository,
        errors::{RepositoryError, RepositoryResult},
    },
    schema::{contracts, installments, invoices},
};

const PAID: &str = "pago";

fn filtered(query: &ContractListQuery) -> contracts::BoxedQuery<'static, Sqlite> {
    let mut items = contracts::table.into_boxed();
    if let Some(client_id) = query.client_id {
        items = items.filter(contracts::client_id.eq(client_id.get()));
    }
    items
}

fn to_installments(rows: Vec<DbInstallment>) -> RepositoryResult<Vec<Installment>> {
    rows.into_iter()
        .map(|row| Installment::try_from(row).map_err(RepositoryError::from))
        .collect()
}

impl ContractReader for DieselRepository {
    fn get_contract_by_id(&self, id: ContractId) -> RepositoryResult<Option<Contract>> {
        let mut conn = self.conn()?;
        let contract = contracts::table
            .find(id.get())
            .first::<DbContract>(&mut conn)
            .optional()?;

        Ok(contract.map(Contract::try_from).transpose()?)
    }

    fn list_contracts(
        &self,
        query: ContractListQuery,
    ) -> RepositoryResult<(usize, Vec<Contract>)> {
        let mut conn = self.conn()?;

        let total: i64 = filtered(&query).count().get_result(&mut conn)?;

        let mut items = filtered(&query).order(contracts::id.asc());
        if let Some(pagination) = &query.pagination {
            items = items.limit(pagination.limit()).offset(pagination.offset());
        }

        let contracts = items
            .load::<DbContract>(&mut conn)?
            .into_iter()
            .map(Contract::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((total as usize, contracts))
    }

    fn count_contracts(&self) -> RepositoryResult<i64> {
        let mut conn = self.conn()?;
        Ok(contracts::table.count().get_result(&mut conn)?)
    }

    fn sum_contract_values(&self) -> RepositoryResult<Option<f64>> {
        let mut conn = self.conn()?;
        Ok(contracts::table
            .select(diesel::dsl::sum(contracts::valor_total))
            .first::<Option<f64>>(&mut conn)?)
    }

    fn get_installment_by_id(&self, id: InstallmentId) -> RepositoryResult<Option<Installment>> {
        let mut conn = self.conn()?;
        let installment = installments::table
            .find(id.get())
            .first::<DbInstallment>(&mut conn)
            .optional()?;

        Ok(installment.map(Installment::try_from).transpose()?)
    }

    fn list_installments(&self, contract_id: ContractId) -> RepositoryResult<Vec<Installment>> {
        let mut conn = self.conn()?;
        let rows = installments::table
            .filter(installments::contract_id.eq(contract_id.get()))
            .order(installments::numero_parcela.asc())
            .load::<DbInstallment>(&mut conn)?;

        to_installments(rows)
    }

    fn list_client_installments(
        &self,
        client_id: ClientId,
    ) -> RepositoryResult<Vec<Installment>> {
        let mut conn = self.conn()?;
        let rows = installments::table
            .inner_join(contracts::table)
            .filter(contracts::client_id.eq(client_id.get()))
            .order((
                installments::contract_id.asc(),
                installments::numero_parcela.asc(),
            ))
            .select(installments::all_columns)
            .load::<DbInstallment>(&mut conn)?;

        to_installments(rows)
    }
}

impl ContractWriter for DieselRepository {
    fn create_contract(
        &self,
        new_contract: &NewContract,
        schedule: &[ScheduledInstallment],
    ) -> RepositoryResult<(Contract, Vec<Installment>)> {
        let mut conn = self.conn()?;
        let insertable: DbNewContract = new_contract.into();

        let (contract, rows) = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                let contract = diesel::insert_into(contracts::table)
                    .values(&insertable)
                    .get_result::<DbContract>(conn)?;

                let new_installments: Vec<DbNewInstallment> = schedule
                    .iter()
                    .map(|scheduled| DbNewInstallment::scheduled(contract.id, scheduled))
                    .collect();
                diesel::insert_into(installments::table)
                    .values(&new_installments)
                    .execute(conn)?;

                let rows = installments::table
                    .filter(installments::contract_id.eq(contract.id))
                    .order(installments::numero_parcela.asc())
                    .load::<DbInstallment>(conn)?;

                Ok((contract, rows))
            })
            .map_err(RepositoryError::from)?;

        Ok((Contract::try_from(contract)?, to_installments(rows)?))
    }

    fn update_contract(
        &self,
        id: ContractId,
        updates: &UpdateContract,
    ) -> RepositoryResult<Contract> {
        let mut conn = self.conn()?;
        let changes: DbUpdateContract = updates.into();

        let updated = diesel::update(contracts::table.find(id.get()))
            .set(&changes)
            .get_result::<DbContract>(&mut conn)?;

        Ok(Contract::try_from(updated)?)
    }

    fn delete_contract(&self, id: ContractId) -> RepositoryResult<()> {
        let mut conn = self.conn()?;
        match diesel::delete(contracts::table.find(id.get())).execute(&mut conn)? {
            0 => Err(RepositoryError::NotFound),
            _ => Ok(()),
        }
    }

    fn pay_installment(
        &self,
        id: InstallmentId,
        data_pagamento: NaiveDate,
    ) -> RepositoryResult<Installment> {
        let mut conn = self.conn()?;

        let row = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                let row = diesel::update(installments::table.find(id.get()))
                    .set((
                        installments::status.eq(PAID),
                        installments::data_pagamento.eq(Some(data_pagamento)),
                    ))
                    .get_result::<DbInstallment>(conn)?;

                diesel::update(invoices::table.filter(invoices::installment_id.eq(id.get())))
                    .set((
                        invoices::status.eq(PAID),
                        invoices::data_pagamento.eq(Some(data_pagamento)),
                    ))
                    .execute(conn)?;

                Ok(row)
            })
            .map_err(RepositoryError::from)?;

        Ok(Installment::try_from(row)?)
    }
}
