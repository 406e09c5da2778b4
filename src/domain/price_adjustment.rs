//! Contractual price adjustments (reajustes) and their status rules.

use std::fmt::Display;

use chrono::{Days, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::types::{ContractId, IndexName, PriceAdjustmentId, TypeConstraintError, round_cents};

/// Lifecycle status of a price adjustment.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum AdjustmentStatus {
    Pending,
    Applied,
    Late,
    Imminent,
    /// A stored value outside the known vocabulary, kept verbatim.
    Unknown(String),
}

impl AdjustmentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            AdjustmentStatus::Pending => "pendente",
            AdjustmentStatus::Applied => "aplicado",
            AdjustmentStatus::Late => "atrasado",
            AdjustmentStatus::Imminent => "iminente",
            AdjustmentStatus::Unknown(raw) => raw,
        }
    }

    /// Display label used by the status badge.
    pub fn label(&self) -> String {
        match self {
            AdjustmentStatus::Pending => "Pendente".to_string(),
            AdjustmentStatus::Applied => "Aplicado".to_string(),
            AdjustmentStatus::Late => "Atrasado".to_string(),
            AdjustmentStatus::Imminent => "Iminente".to_string(),
            AdjustmentStatus::Unknown(raw) => capitalize_first(raw),
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, AdjustmentStatus::Applied)
    }
}

fn capitalize_first(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl Display for AdjustmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for AdjustmentStatus {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "pendente" | "pending" => AdjustmentStatus::Pending,
            "aplicado" | "applied" => AdjustmentStatus::Applied,
            "atrasado" | "late" => AdjustmentStatus::Late,
            "iminente" | "imminent" => AdjustmentStatus::Imminent,
            _ => AdjustmentStatus::Unknown(s.to_string()),
        }
    }
}

impl From<String> for AdjustmentStatus {
    fn from(s: String) -> Self {
        s.as_str().into()
    }
}

impl From<AdjustmentStatus> for String {
    fn from(status: AdjustmentStatus) -> Self {
        status.as_str().to_string()
    }
}

/// One adjustment per (contract, reference installment) pair.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PriceAdjustment {
    pub id: PriceAdjustmentId,
    pub contract_id: ContractId,
    /// First installment number the adjustment applies to.
    pub parcela_referencia: i32,
    pub valor_original: f64,
    pub valor_reajustado: f64,
    /// Index rate in percent.
    pub indice_aplicado: f64,
    pub indice_nome: IndexName,
    pub percentual_adicional: f64,
    /// Total adjustment in percent (index plus additional).
    pub reajuste_total: f64,
    pub data_referencia: NaiveDate,
    pub data_aplicacao: Option<NaiveDate>,
    pub status: AdjustmentStatus,
    pub aplicado: bool,
    pub created_at: NaiveDateTime,
}

impl PriceAdjustment {
    /// Multiplier applied to installment values.
    pub fn factor(&self) -> f64 {
        1.0 + self.reajuste_total / 100.0
    }

    /// Status shown for this record on `today`.
    ///
    /// Unapplied records carrying a status outside the known vocabulary keep
    /// it as `Unknown`.
    pub fn current_status(&self, today: NaiveDate, horizon_days: u64) -> AdjustmentStatus {
        match &self.status {
            AdjustmentStatus::Unknown(_) if !self.aplicado => self.status.clone(),
            _ => classify_adjustment(self.aplicado, self.data_referencia, today, horizon_days),
        }
    }
}

/// Derives the displayed status from the record and the current date.
///
/// Applied wins over everything; otherwise a reference date before `today`
/// is late, one within `horizon_days` of `today` (inclusive) is imminent and
/// anything further out is pending.
pub fn classify_adjustment(
    aplicado: bool,
    data_referencia: NaiveDate,
    today: NaiveDate,
    horizon_days: u64,
) -> AdjustmentStatus {
    if aplicado {
        return AdjustmentStatus::Applied;
    }
    if data_referencia < today {
        return AdjustmentStatus::Late;
    }
    let horizon = today
        .checked_add_days(Days::new(horizon_days))
        .unwrap_or(NaiveDate::MAX);
    if data_referencia <= horizon {
        AdjustmentStatus::Imminent
    } else {
        AdjustmentStatus::Pending
    }
}

/// Checks the applied-flag invariant between `aplicado`, `status` and
/// `data_aplicacao`.
pub fn check_adjustment_invariant(
    aplicado: bool,
    status: &AdjustmentStatus,
    data_aplicacao: Option<NaiveDate>,
) -> Result<(), TypeConstraintError> {
    match (aplicado, status) {
        (true, AdjustmentStatus::Applied) if data_aplicacao.is_some() => Ok(()),
        (true, AdjustmentStatus::Applied) => Err(TypeConstraintError::InvalidValue(
            "applied adjustment requires dataAplicacao".to_string(),
        )),
        (true, other) => Err(TypeConstraintError::InvalidValue(format!(
            "applied adjustment cannot have status {other}"
        ))),
        (
            false,
            AdjustmentStatus::Pending | AdjustmentStatus::Late | AdjustmentStatus::Imminent,
        ) => Ok(()),
        (false, other) => Err(TypeConstraintError::InvalidValue(format!(
            "unapplied adjustment cannot have status {other}"
        ))),
    }
}

/// Input for a new adjustment. Derived amounts are filled in by [`NewPriceAdjustment::try_new`].
#[derive(Clone, Debug, PartialEq)]
pub struct NewPriceAdjustment {
    pub contract_id: ContractId,
    pub parcela_referencia: i32,
    pub valor_original: f64,
    pub valor_reajustado: f64,
    pub indice_aplicado: f64,
    pub indice_nome: IndexName,
    pub percentual_adicional: f64,
    pub reajuste_total: f64,
    pub data_referencia: NaiveDate,
    pub data_aplicacao: Option<NaiveDate>,
    pub status: AdjustmentStatus,
    pub aplicado: bool,
}

/// Adjustment terms as supplied by the caller.
#[derive(Clone, Debug, PartialEq)]
pub struct AdjustmentTerms {
    pub contract_id: ContractId,
    pub parcela_referencia: i32,
    pub valor_original: f64,
    pub valor_reajustado: Option<f64>,
    pub indice_aplicado: f64,
    pub indice_nome: IndexName,
    pub percentual_adicional: f64,
    pub reajuste_total: Option<f64>,
    pub data_referencia: NaiveDate,
    pub data_aplicacao: Option<NaiveDate>,
    pub status: Option<AdjustmentStatus>,
    pub aplicado: bool,
}

impl NewPriceAdjustment {
    /// Fills in derived amounts and the initial status, then checks invariants.
    ///
    /// `reajuste_total` defaults to index plus additional percentage and
    /// `valor_reajustado` to the original value scaled by it. Without an
    /// explicit status the record is classified against `today`.
    pub fn try_new(
        terms: AdjustmentTerms,
        today: NaiveDate,
        horizon_days: u64,
    ) -> Result<Self, TypeConstraintError> {
        if terms.parcela_referencia < 1 {
            return Err(TypeConstraintError::InvalidValue(
                "parcelaReferencia must be at least 1".to_string(),
            ));
        }
        if terms.valor_original < 0.0 {
            return Err(TypeConstraintError::Negative("valorOriginal"));
        }
        let reajuste_total = terms
            .reajuste_total
            .unwrap_or(terms.indice_aplicado + terms.percentual_adicional);
        let valor_reajustado = terms
            .valor_reajustado
            .unwrap_or_else(|| round_cents(terms.valor_original * (1.0 + reajuste_total / 100.0)));
        if valor_reajustado < 0.0 {
            return Err(TypeConstraintError::Negative("valorReajustado"));
        }
        let status = terms.status.unwrap_or_else(|| {
            classify_adjustment(terms.aplicado, terms.data_referencia, today, horizon_days)
        });
        check_adjustment_invariant(terms.aplicado, &status, terms.data_aplicacao)?;

        Ok(Self {
            contract_id: terms.contract_id,
            parcela_referencia: terms.parcela_referencia,
            valor_original: terms.valor_original,
            valor_reajustado,
            indice_aplicado: terms.indice_aplicado,
            indice_nome: terms.indice_nome,
            percentual_adicional: terms.percentual_adicional,
            reajuste_total,
            data_referencia: terms.data_referencia,
            data_aplicacao: terms.data_aplicacao,
            status,
            aplicado: terms.aplicado,
        })
    }
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct UpdatePriceAdjustment {
    pub valor_original: Option<f64>,
    pub valor_reajustado: Option<f64>,
    pub indice_aplicado: Option<f64>,
    pub indice_nome: Option<IndexName>,
    pub percentual_adicional: Option<f64>,
    pub reajuste_total: Option<f64>,
    pub data_referencia: Option<NaiveDate>,
    pub data_aplicacao: Option<NaiveDate>,
    pub status: Option<AdjustmentStatus>,
    pub aplicado: Option<bool>,
}

impl UpdatePriceAdjustment {
    /// Applies the update to a copy of `current` and checks the invariant on
    /// the merged record.
    ///
    /// Marking a record applied without a date stamps it with `today`; a bare
    /// `aplicado: true` also moves the status to applied. Derived amounts not
    /// supplied in the update follow their changed components.
    pub fn merge(
        &self,
        current: &PriceAdjustment,
        today: NaiveDate,
    ) -> Result<PriceAdjustment, TypeConstraintError> {
        let mut merged = current.clone();
        if let Some(value) = self.valor_original {
            merged.valor_original = value;
        }
        if let Some(value) = self.valor_reajustado {
            merged.valor_reajustado = value;
        }
        if let Some(value) = self.indice_aplicado {
            merged.indice_aplicado = value;
        }
        if let Some(value) = &self.indice_nome {
            merged.indice_nome = value.clone();
        }
        if let Some(value) = self.percentual_adicional {
            merged.percentual_adicional = value;
        }
        if let Some(value) = self.reajuste_total {
            merged.reajuste_total = value;
        }
        if self.reajuste_total.is_none()
            && (self.indice_aplicado.is_some() || self.percentual_adicional.is_some())
        {
            merged.reajuste_total = merged.indice_aplicado + merged.percentual_adicional;
        }
        let amounts_changed = self.valor_original.is_some()
            || self.reajuste_total.is_some()
            || self.indice_aplicado.is_some()
            || self.percentual_adicional.is_some();
        if self.valor_reajustado.is_none() && amounts_changed {
            merged.valor_reajustado =
                round_cents(merged.valor_original * (1.0 + merged.reajuste_total / 100.0));
        }
        if let Some(value) = self.data_referencia {
            merged.data_referencia = value;
        }
        if let Some(value) = self.data_aplicacao {
            merged.data_aplicacao = Some(value);
        }
        if let Some(value) = &self.status {
            merged.status = value.clone();
            if value.is_applied() && self.aplicado.is_none() {
                merged.aplicado = true;
            }
        }
        if let Some(value) = self.aplicado {
            merged.aplicado = value;
            if value && self.status.is_none() {
                merged.status = AdjustmentStatus::Applied;
            }
        }
        if merged.aplicado && merged.data_aplicacao.is_none() {
            merged.data_aplicacao = Some(today);
        }
        check_adjustment_invariant(merged.aplicado, &merged.status, merged.data_aplicacao)?;
        Ok(merged)
    }
}
