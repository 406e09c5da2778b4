use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;

use crate::domain::delinquency::{
    DelinquencyRecord as DomainDelinquencyRecord,
    NewDelinquencyRecord as DomainNewDelinquencyRecord,
    UpdateDelinquencyRecord as DomainUpdateDelinquencyRecord,
};
use crate::domain::types::{ClientId, DelinquencyId, InstallmentId, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::delinquent_clients)]
pub struct DelinquentClient {
    pub id: i32,
    pub client_id: i32,
    pub valor_em_aberto: f64,
    pub dias_atraso: i32,
    pub ultimo_contato: Option<NaiveDateTime>,
    pub status: String,
    pub observacoes: Option<String>,
    /// JSON array of installment ids.
    pub parcelas: String,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::delinquent_clients)]
pub struct NewDelinquentClient<'a> {
    pub client_id: i32,
    pub valor_em_aberto: f64,
    pub dias_atraso: i32,
    pub ultimo_contato: Option<NaiveDateTime>,
    pub status: &'a str,
    pub observacoes: Option<&'a str>,
    pub parcelas: String,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::delinquent_clients)]
pub struct UpdateDelinquentClient<'a> {
    pub valor_em_aberto: Option<f64>,
    pub dias_atraso: Option<i32>,
    pub ultimo_contato: Option<NaiveDateTime>,
    pub status: Option<&'a str>,
    pub observacoes: Option<&'a str>,
    pub parcelas: Option<String>,
    pub updated_at: NaiveDateTime,
}

fn encode_ids(ids: &[InstallmentId]) -> String {
    let raw: Vec<i32> = ids.iter().map(|id| id.get()).collect();
    serde_json::to_string(&raw).unwrap_or_else(|_| "[]".to_string())
}

fn decode_ids(raw: &str) -> Result<Vec<InstallmentId>, TypeConstraintError> {
    let ids: Vec<i32> = serde_json::from_str(raw)
        .map_err(|err| TypeConstraintError::InvalidValue(format!("parcelas: {err}")))?;
    ids.into_iter().map(InstallmentId::try_from).collect()
}

fn clamp_days(days: i64) -> i32 {
    i32::try_from(days).unwrap_or(if days < 0 { i32::MIN } else { i32::MAX })
}

impl TryFrom<DelinquentClient> for DomainDelinquencyRecord {
    type Error = TypeConstraintError;

    fn try_from(row: DelinquentClient) -> Result<Self, Self::Error> {
        Ok(Self {
            id: DelinquencyId::try_from(row.id)?,
            client_id: ClientId::try_from(row.client_id)?,
            valor_em_aberto: row.valor_em_aberto,
            dias_atraso: i64::from(row.dias_atraso),
            ultimo_contato: row.ultimo_contato,
            status: row.status,
            observacoes: row.observacoes,
            parcelas: decode_ids(&row.parcelas)?,
            updated_at: row.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewDelinquencyRecord> for NewDelinquentClient<'a> {
    fn from(record: &'a DomainNewDelinquencyRecord) -> Self {
        Self {
            client_id: record.client_id.get(),
            valor_em_aberto: record.valor_em_aberto,
            dias_atraso: clamp_days(record.dias_atraso),
            ultimo_contato: record.ultimo_contato,
            status: record.status.as_str(),
            observacoes: record.observacoes.as_deref(),
            parcelas: encode_ids(&record.parcelas),
            updated_at: Utc::now().naive_utc(),
        }
    }
}

impl<'a> From<&'a DomainUpdateDelinquencyRecord> for UpdateDelinquentClient<'a> {
    fn from(record: &'a DomainUpdateDelinquencyRecord) -> Self {
        Self {
            valor_em_aberto: record.valor_em_aberto,
            dias_atraso: record.dias_atraso.map(clamp_days),
            ultimo_contato: record.ultimo_contato,
            status: record.status.as_deref(),
            observacoes: record.observacoes.as_deref(),
            parcelas: record.parcelas.as_deref().map(encode_ids),
            updated_at: Utc::now().naive_utc(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn installment_ids_are_stored_as_json() {
        let ids = vec![InstallmentId::new(4).unwrap(), InstallmentId::new(9).unwrap()];
        let encoded = encode_ids(&ids);
        assert_eq!(encoded, "[4,9]");
        assert_eq!(decode_ids(&encoded).unwrap(), ids);
    }

    #[test]
    fn corrupt_installment_list_is_rejected() {
        assert!(decode_ids("not json").is_err());
        assert_eq!(
            decode_ids("[0]"),
            Err(TypeConstraintError::NonPositiveId)
        );
    }

    #[test]
    fn day_counts_are_clamped() {
        assert_eq!(clamp_days(12), 12);
        assert_eq!(clamp_days(i64::MAX), i32::MAX);
    }
}
