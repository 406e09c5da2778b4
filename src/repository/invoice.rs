use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::{
    domain::{
        invoice::{Invoice, NewInvoice, UpdateInvoice},
        types::InvoiceId,
    },
    models::invoice::{
        Invoice as DbInvoice, NewInvoice as DbNewInvoice, UpdateInvoice as DbUpdateInvoice,
    },
    repository::{
        DieselRepository, InvoiceListQuery, InvoiceReader, InvoiceWriter,
        errors::{RepositoryError, RepositoryResult},
    },
    schema::invoices,
};

fn filtered(query: &InvoiceListQuery) -> invoices::BoxedQuery<'static, Sqlite> {
    let mut items = invoices::table.into_boxed();
    if let Some(contract_id) = query.contract_id {
        items = items.filter(invoices::contract_id.eq(contract_id.get()));
    }
    if let Some(status) = &query.status {
        items = items.filter(invoices::status.eq(status.clone()));
    }
    items
}

impl InvoiceReader for DieselRepository {
    fn get_invoice_by_id(&self, id: InvoiceId) -> RepositoryResult<Option<Invoice>> {
        let mut conn = self.conn()?;
        let invoice = invoices::table
            .find(id.get())
            .first::<DbInvoice>(&mut conn)
            .optional()?;

        Ok(invoice.map(Invoice::try_from).transpose()?)
    }

    fn list_invoices(&self, query: InvoiceListQuery) -> RepositoryResult<(usize, Vec<Invoice>)> {
        let mut conn = self.conn()?;

        let total: i64 = filtered(&query).count().get_result(&mut conn)?;

        let mut items = filtered(&query)
            .order(invoices::data_vencimento.asc())
            .then_order_by(invoices::id.asc());
        if let Some(pagination) = &query.pagination {
            items = items.limit(pagination.limit()).offset(pagination.offset());
        }

        let invoices = items
            .load::<DbInvoice>(&mut conn)?
            .into_iter()
            .map(Invoice::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((total as usize, invoices))
    }
}

impl InvoiceWriter for DieselRepository {
    fn create_invoice(&self, new_invoice: &NewInvoice) -> RepositoryResult<Invoice> {
        let mut conn = self.conn()?;
        let insertable: DbNewInvoice = new_invoice.into();

        let created = diesel::insert_into(invoices::table)
            .values(&insertable)
            .get_result::<DbInvoice>(&mut conn)?;

        Ok(Invoice::try_from(created)?)
    }

    fn update_invoice(&self, id: InvoiceId, updates: &UpdateInvoice) -> RepositoryResult<Invoice> {
        let mut conn = self.conn()?;
        let changes: DbUpdateInvoice = updates.into();

        let updated = diesel::update(invoices::table.find(id.get()))
            .set(&changes)
            .get_result::<DbInvoice>(&mut conn)?;

        Ok(Invoice::try_from(updated)?)
    }

    fn delete_invoice(&self, id: InvoiceId) -> RepositoryResult<()> {
        let mut conn = self.conn()?;
        match diesel::delete(invoices::table.find(id.get())).execute(&mut conn)? {
            0 => Err(RepositoryError::NotFound),
            _ => Ok(()),
        }
    }
}
