use serde_json::Value;

use crate::domain::invoice::{Invoice, NewInvoice, UpdateInvoice};
use crate::domain::types::{ContractId, InvoiceId};
use crate::dto::invoice::{
    CREATE_INVOICE_SCHEMA, CreateInvoicePayload, UPDATE_INVOICE_SCHEMA, UpdateInvoicePayload,
};
use crate::pagination::Paginated;
use crate::repository::{ContractReader, InvoiceListQuery, InvoiceReader, InvoiceWriter};
use crate::services::{PageRequest, ServiceError, ServiceResult};
use crate::validation::parse_payload;

pub fn get_invoice<R>(repo: &R, invoice_id: i32) -> ServiceResult<Invoice>
where
    R: InvoiceReader + ?Sized,
{
    repo.get_invoice_by_id(InvoiceId::new(invoice_id)?)?
        .ok_or(ServiceError::NotFound)
}

pub fn list_invoices<R>(
    repo: &R,
    contract_id: Option<i32>,
    status: Option<String>,
    page: PageRequest,
) -> ServiceResult<Paginated<Invoice>>
where
    R: InvoiceReader + ?Sized,
{
    let mut query = InvoiceListQuery::default().paginate(page.page, page.per_page);
    if let Some(contract_id) = contract_id {
        query = query.contract(ContractId::new(contract_id)?);
    }
    if let Some(status) = status.map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty()) {
        query = query.status(status);
    }

    let (total, invoices) = repo.list_invoices(query)?;
    Ok(Paginated::new(invoices, total, page.page, page.per_page))
}

/// Issues a boleto. When tied to an installment, the installment must
/// belong to the same contract.
pub fn create_invoice<R>(repo: &R, payload: Value) -> ServiceResult<Invoice>
where
    R: InvoiceWriter + ContractReader + ?Sized,
{
    let payload: CreateInvoicePayload = parse_payload(&CREATE_INVOICE_SCHEMA, payload)?;
    let new_invoice = NewInvoice::try_from(payload)?;

    if let Some(installment_id) = new_invoice.installment_id {
        let installment = repo
            .get_installment_by_id(installment_id)?
            .ok_or(ServiceError::NotFound)?;
        if installment.contract_id != new_invoice.contract_id {
            return Err(ServiceError::Conflict(format!(
                "installment {installment_id} does not belong to contract {}",
                new_invoice.contract_id
            )));
        }
    }

    let invoice = repo.create_invoice(&new_invoice).map_err(|err| {
        log::error!("Failed to create invoice {}: {err}", new_invoice.numero);
        err
    })?;
    Ok(invoice)
}

pub fn update_invoice<R>(repo: &R, invoice_id: i32, payload: Value) -> ServiceResult<Invoice>
where
    R: InvoiceReader + InvoiceWriter + ?Sized,
{
    let invoice_id = InvoiceId::new(invoice_id)?;
    let payload: UpdateInvoicePayload = parse_payload(&UPDATE_INVOICE_SCHEMA, payload)?;
    let updates = UpdateInvoice::try_from(payload)?;

    if updates.is_empty() {
        return repo
            .get_invoice_by_id(invoice_id)?
            .ok_or(ServiceError::NotFound);
    }

    Ok(repo.update_invoice(invoice_id, &updates)?)
}

pub fn delete_invoice<R>(repo: &R, invoice_id: i32) -> ServiceResult<()>
where
    R: InvoiceWriter + ?Sized,
{
    repo.delete_invoice(InvoiceId::new(invoice_id)?)?;
    Ok(())
}
