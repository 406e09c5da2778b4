//! Delinquency (inadimplência) snapshots derived from a client's installments.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::installment::Installment;
use crate::domain::types::{ClientId, DelinquencyId, InstallmentId};
use crate::validation::{ValidationErrorKind, ValidationErrors};

/// Status of a client with at least one overdue installment.
pub const STATUS_OVERDUE: &str = "em_atraso";
/// Status of a client with nothing overdue.
pub const STATUS_REGULAR: &str = "regular";

/// Snapshot computed from installments on a given date.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DelinquentClient {
    pub client_id: ClientId,
    /// Sum of the adjusted value of every overdue installment.
    pub valor_em_aberto: f64,
    pub dias_atraso: i64,
    pub status: String,
    /// Overdue installments by due date, then installment number.
    pub parcelas: Vec<Installment>,
}

impl DelinquentClient {
    pub fn is_overdue(&self) -> bool {
        self.status == STATUS_OVERDUE
    }

    pub fn installment_ids(&self) -> Vec<InstallmentId> {
        self.parcelas.iter().map(|p| p.id).collect()
    }
}

/// Computes the delinquency snapshot of `client_id` on `today`.
///
/// Every installment is checked first; any negative amount or installment
/// number below one rejects the whole computation with all offending fields.
pub fn compute_delinquency(
    client_id: ClientId,
    installments: &[Installment],
    today: NaiveDate,
) -> Result<DelinquentClient, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    for (index, installment) in installments.iter().enumerate() {
        if installment.numero_parcela < 1 {
            errors.push(
                format!("parcelas[{index}].numeroParcela"),
                ValidationErrorKind::BelowMinimum { min: 1.0 },
            );
        }
        if installment.valor < 0.0 {
            errors.push(
                format!("parcelas[{index}].valor"),
                ValidationErrorKind::BelowMinimum { min: 0.0 },
            );
        }
        if installment.valor_corrigido < 0.0 {
            errors.push(
                format!("parcelas[{index}].valorCorrigido"),
                ValidationErrorKind::BelowMinimum { min: 0.0 },
            );
        }
    }
    errors.into_result()?;

    let mut parcelas: Vec<Installment> = installments
        .iter()
        .filter(|installment| installment.is_overdue(today))
        .cloned()
        .collect();
    parcelas.sort_by(|a, b| {
        a.data_vencimento
            .cmp(&b.data_vencimento)
            .then(a.numero_parcela.cmp(&b.numero_parcela))
    });

    let valor_em_aberto: f64 = parcelas.iter().map(|p| p.valor_corrigido).sum();
    let dias_atraso = parcelas
        .first()
        .map(|earliest| (today - earliest.data_vencimento).num_days())
        .unwrap_or(0);
    let status = if valor_em_aberto > 0.0 {
        STATUS_OVERDUE
    } else {
        STATUS_REGULAR
    };

    Ok(DelinquentClient {
        client_id,
        valor_em_aberto,
        dias_atraso,
        status: status.to_string(),
        parcelas,
    })
}

/// Stored delinquency record with the collection follow-up fields.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DelinquencyRecord {
    pub id: DelinquencyId,
    pub client_id: ClientId,
    pub valor_em_aberto: f64,
    pub dias_atraso: i64,
    pub ultimo_contato: Option<NaiveDateTime>,
    pub status: String,
    pub observacoes: Option<String>,
    pub parcelas: Vec<InstallmentId>,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewDelinquencyRecord {
    pub client_id: ClientId,
    pub valor_em_aberto: f64,
    pub dias_atraso: i64,
    pub ultimo_contato: Option<NaiveDateTime>,
    pub status: String,
    pub observacoes: Option<String>,
    pub parcelas: Vec<InstallmentId>,
}

impl From<&DelinquentClient> for NewDelinquencyRecord {
    fn from(snapshot: &DelinquentClient) -> Self {
        Self {
            client_id: snapshot.client_id,
            valor_em_aberto: snapshot.valor_em_aberto,
            dias_atraso: snapshot.dias_atraso,
            ultimo_contato: None,
            status: snapshot.status.clone(),
            observacoes: None,
            parcelas: snapshot.installment_ids(),
        }
    }
}

/// Partial update of a stored record; `None` leaves the value untouched.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct UpdateDelinquencyRecord {
    pub valor_em_aberto: Option<f64>,
    pub dias_atraso: Option<i64>,
    pub ultimo_contato: Option<NaiveDateTime>,
    pub status: Option<String>,
    pub observacoes: Option<String>,
    pub parcelas: Option<Vec<InstallmentId>>,
}
