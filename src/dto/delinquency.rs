use serde::Deserialize;

use crate::domain::delinquency::{NewDelinquencyRecord, UpdateDelinquencyRecord};
use crate::domain::types::{ClientId, TypeConstraintError, parse_timestamp};
use crate::dto::{optional_text, reject_if_present};
use crate::validation::{FieldRule, FieldSpec, Schema};

pub const CREATE_DELINQUENCY_SCHEMA: Schema = Schema::new(
    "CreateDelinquentClient",
    &[
        FieldSpec::required("clientId", FieldRule::int_at_least(1)),
        FieldSpec::required("valorEmAberto", FieldRule::Number { min: Some(0.0) }),
        FieldSpec::required("diasAtraso", FieldRule::int_at_least(0)),
        FieldSpec::optional("ultimoContato", FieldRule::DateTime),
        FieldSpec::required("status", FieldRule::Text),
        FieldSpec::optional("observacoes", FieldRule::Text),
    ],
);

pub const UPDATE_DELINQUENCY_SCHEMA: Schema =
    CREATE_DELINQUENCY_SCHEMA.partial("UpdateDelinquentClient");

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDelinquencyPayload {
    pub client_id: i32,
    pub valor_em_aberto: f64,
    pub dias_atraso: i64,
    pub ultimo_contato: Option<String>,
    pub status: String,
    pub observacoes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDelinquencyPayload {
    pub client_id: Option<i32>,
    pub valor_em_aberto: Option<f64>,
    pub dias_atraso: Option<i64>,
    pub ultimo_contato: Option<String>,
    pub status: Option<String>,
    pub observacoes: Option<String>,
}

fn status(raw: String) -> Result<String, TypeConstraintError> {
    optional_text(Some(raw)).ok_or(TypeConstraintError::EmptyString)
}

/// Manually recorded snapshots start without contributing installments.
impl TryFrom<CreateDelinquencyPayload> for NewDelinquencyRecord {
    type Error = TypeConstraintError;

    fn try_from(payload: CreateDelinquencyPayload) -> Result<Self, Self::Error> {
        if payload.valor_em_aberto < 0.0 {
            return Err(TypeConstraintError::Negative("valorEmAberto"));
        }
        Ok(Self {
            client_id: ClientId::new(payload.client_id)?,
            valor_em_aberto: payload.valor_em_aberto,
            dias_atraso: payload.dias_atraso.max(0),
            ultimo_contato: payload
                .ultimo_contato
                .as_deref()
                .map(parse_timestamp)
                .transpose()?,
            status: status(payload.status)?,
            observacoes: optional_text(payload.observacoes),
            parcelas: Vec::new(),
        })
    }
}

impl TryFrom<UpdateDelinquencyPayload> for UpdateDelinquencyRecord {
    type Error = TypeConstraintError;

    fn try_from(payload: UpdateDelinquencyPayload) -> Result<Self, Self::Error> {
        reject_if_present(&payload.client_id, "clientId")?;
        if payload.valor_em_aberto.is_some_and(|valor| valor < 0.0) {
            return Err(TypeConstraintError::Negative("valorEmAberto"));
        }
        Ok(Self {
            valor_em_aberto: payload.valor_em_aberto,
            dias_atraso: payload.dias_atraso.map(|days| days.max(0)),
            ultimo_contato: payload
                .ultimo_contato
                .as_deref()
                .map(parse_timestamp)
                .transpose()?,
            status: payload.status.map(status).transpose()?,
            observacoes: optional_text(payload.observacoes),
            parcelas: None,
        })
    }
}
