use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::types::{ContractId, InstallmentId, InvoiceId, InvoiceNumber, Label};

/// Boleto issued for a contract, usually tied to one installment.
///
/// Rendering the slip itself happens outside this service.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: InvoiceId,
    pub contract_id: ContractId,
    pub installment_id: Option<InstallmentId>,
    pub numero: InvoiceNumber,
    pub valor: f64,
    pub data_vencimento: NaiveDate,
    pub status: Label,
    pub data_pagamento: Option<NaiveDate>,
    pub linha_digitavel: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewInvoice {
    pub contract_id: ContractId,
    pub installment_id: Option<InstallmentId>,
    pub numero: InvoiceNumber,
    pub valor: f64,
    pub data_vencimento: NaiveDate,
    pub status: Label,
    pub data_pagamento: Option<NaiveDate>,
    pub linha_digitavel: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct UpdateInvoice {
    pub valor: Option<f64>,
    pub data_vencimento: Option<NaiveDate>,
    pub status: Option<Label>,
    pub data_pagamento: Option<NaiveDate>,
    pub linha_digitavel: Option<String>,
}

impl UpdateInvoice {
    pub fn is_empty(&self) -> bool {
        self == &UpdateInvoice::default()
    }
}
