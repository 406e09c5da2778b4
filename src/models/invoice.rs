use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::invoice::{
    Invoice as DomainInvoice, NewInvoice as DomainNewInvoice, UpdateInvoice as DomainUpdateInvoice,
};
use crate::domain::types::{
    ContractId, InstallmentId, InvoiceId, InvoiceNumber, Label, TypeConstraintError,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::invoices)]
/// Diesel model for [`crate::domain::invoice::Invoice`].
pub struct Invoice {
    pub id: i32,
    pub contract_id: i32,
    pub installment_id: Option<i32>,
    pub numero: String,
    pub valor: f64,
    pub data_vencimento: NaiveDate,
    pub status: String,
    pub data_pagamento: Option<NaiveDate>,
    pub linha_digitavel: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::invoices)]
pub struct NewInvoice<'a> {
    pub contract_id: i32,
    pub installment_id: Option<i32>,
    pub numero: &'a str,
    pub valor: f64,
    pub data_vencimento: NaiveDate,
    pub status: &'a str,
    pub data_pagamento: Option<NaiveDate>,
    pub linha_digitavel: Option<&'a str>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::invoices)]
pub struct UpdateInvoice<'a> {
    pub valor: Option<f64>,
    pub data_vencimento: Option<NaiveDate>,
    pub status: Option<&'a str>,
    pub data_pagamento: Option<NaiveDate>,
    pub linha_digitavel: Option<&'a str>,
}

impl TryFrom<Invoice> for DomainInvoice {
    type Error = TypeConstraintError;

    fn try_from(invoice: Invoice) -> Result<Self, Self::Error> {
        Ok(Self {
            id: InvoiceId::try_from(invoice.id)?,
            contract_id: ContractId::try_from(invoice.contract_id)?,
            installment_id: invoice
                .installment_id
                .map(InstallmentId::try_from)
                .transpose()?,
            numero: InvoiceNumber::new(invoice.numero)?,
            valor: invoice.valor,
            data_vencimento: invoice.data_vencimento,
            status: Label::new(invoice.status)?,
            data_pagamento: invoice.data_pagamento,
            linha_digitavel: invoice.linha_digitavel,
            created_at: invoice.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewInvoice> for NewInvoice<'a> {
    fn from(invoice: &'a DomainNewInvoice) -> Self {
        Self {
            contract_id: invoice.contract_id.get(),
            installment_id: invoice.installment_id.map(InstallmentId::get),
            numero: invoice.numero.as_str(),
            valor: invoice.valor,
            data_vencimento: invoice.data_vencimento,
            status: invoice.status.as_str(),
            data_pagamento: invoice.data_pagamento,
            linha_digitavel: invoice.linha_digitavel.as_deref(),
        }
    }
}

impl<'a> From<&'a DomainUpdateInvoice> for UpdateInvoice<'a> {
    fn from(invoice: &'a DomainUpdateInvoice) -> Self {
        Self {
            valor: invoice.valor,
            data_vencimento: invoice.data_vencimento,
            status: invoice.status.as_ref().map(|s| s.as_str()),
            data_pagamento: invoice.data_pagamento,
            linha_digitavel: invoice.linha_digitavel.as_deref(),
        }
    }
}
