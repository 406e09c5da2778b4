//! Installments (parcelas) of a contract and their payment status.

use std::fmt::Display;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::types::{ContractId, InstallmentId};

/// Payment state of an installment.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum InstallmentStatus {
    Pending,
    Paid,
    Other(String),
}

impl InstallmentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            InstallmentStatus::Pending => "pendente",
            InstallmentStatus::Paid => "pago",
            InstallmentStatus::Other(s) => s,
        }
    }

    pub fn is_paid(&self) -> bool {
        matches!(self, InstallmentStatus::Paid)
    }
}

impl Display for InstallmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for InstallmentStatus {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "pendente" | "pending" => InstallmentStatus::Pending,
            "pago" | "paid" => InstallmentStatus::Paid,
            _ => InstallmentStatus::Other(s.to_string()),
        }
    }
}

impl From<String> for InstallmentStatus {
    fn from(s: String) -> Self {
        s.as_str().into()
    }
}

impl From<InstallmentStatus> for String {
    fn from(status: InstallmentStatus) -> Self {
        status.as_str().to_string()
    }
}

/// One scheduled payment (parcela) of a contract.
///
/// Values are kept as plain numbers so that records coming from imports can be
/// checked by the aggregation rules instead of being rejected on load.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Installment {
    pub id: InstallmentId,
    pub contract_id: ContractId,
    pub numero_parcela: i32,
    pub data_vencimento: NaiveDate,
    /// Nominal value from the original schedule.
    pub valor: f64,
    /// Value after every applied price adjustment.
    pub valor_corrigido: f64,
    pub status: InstallmentStatus,
    pub data_pagamento: Option<NaiveDate>,
}

impl Installment {
    /// Overdue means past due and not paid; due today is not overdue.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.data_vencimento < today && !self.status.is_paid()
    }
}
