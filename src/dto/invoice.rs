use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::invoice::{NewInvoice, UpdateInvoice};
use crate::domain::types::{
    ContractId, InstallmentId, InvoiceNumber, Label, TypeConstraintError,
};
use crate::dto::{optional_text, reject_if_present};
use crate::validation::{FieldRule, FieldSpec, Schema};

pub const DEFAULT_INVOICE_STATUS: &str = "pendente";

pub const CREATE_INVOICE_SCHEMA: Schema = Schema::new(
    "CreateInvoice",
    &[
        FieldSpec::required("contractId", FieldRule::int_at_least(1)),
        FieldSpec::optional("installmentId", FieldRule::int_at_least(1)),
        FieldSpec::required("numero", FieldRule::Text),
        FieldSpec::required("valor", FieldRule::Number { min: Some(0.0) }),
        FieldSpec::required("dataVencimento", FieldRule::Date),
        FieldSpec::optional("status", FieldRule::Text),
        FieldSpec::optional("dataPagamento", FieldRule::Date),
        FieldSpec::optional("linhaDigitavel", FieldRule::Text),
    ],
);

pub const UPDATE_INVOICE_SCHEMA: Schema = CREATE_INVOICE_SCHEMA.partial("UpdateInvoice");

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoicePayload {
    pub contract_id: i32,
    pub installment_id: Option<i32>,
    pub numero: String,
    pub valor: f64,
    pub data_vencimento: NaiveDate,
    pub status: Option<String>,
    pub data_pagamento: Option<NaiveDate>,
    pub linha_digitavel: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInvoicePayload {
    pub contract_id: Option<i32>,
    pub installment_id: Option<i32>,
    pub numero: Option<String>,
    pub valor: Option<f64>,
    pub data_vencimento: Option<NaiveDate>,
    pub status: Option<String>,
    pub data_pagamento: Option<NaiveDate>,
    pub linha_digitavel: Option<String>,
}

impl TryFrom<CreateInvoicePayload> for NewInvoice {
    type Error = TypeConstraintError;

    fn try_from(payload: CreateInvoicePayload) -> Result<Self, Self::Error> {
        if payload.valor < 0.0 {
            return Err(TypeConstraintError::Negative("valor"));
        }
        let status =
            optional_text(payload.status).unwrap_or_else(|| DEFAULT_INVOICE_STATUS.to_string());
        Ok(Self {
            contract_id: ContractId::new(payload.contract_id)?,
            installment_id: payload.installment_id.map(InstallmentId::new).transpose()?,
            numero: InvoiceNumber::new(payload.numero)?,
            valor: payload.valor,
            data_vencimento: payload.data_vencimento,
            status: Label::new(status)?,
            data_pagamento: payload.data_pagamento,
            linha_digitavel: optional_text(payload.linha_digitavel),
        })
    }
}

impl TryFrom<UpdateInvoicePayload> for UpdateInvoice {
    type Error = TypeConstraintError;

    fn try_from(payload: UpdateInvoicePayload) -> Result<Self, Self::Error> {
        reject_if_present(&payload.contract_id, "contractId")?;
        reject_if_present(&payload.installment_id, "installmentId")?;
        reject_if_present(&payload.numero, "numero")?;
        if payload.valor.is_some_and(|valor| valor < 0.0) {
            return Err(TypeConstraintError::Negative("valor"));
        }
        Ok(Self {
            valor: payload.valor,
            data_vencimento: payload.data_vencimento,
            status: payload.status.map(Label::new).transpose()?,
            data_pagamento: payload.data_pagamento,
            linha_digitavel: optional_text(payload.linha_digitavel),
        })
    }
}
