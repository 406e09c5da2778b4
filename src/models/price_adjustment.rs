use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::price_adjustment::{
    NewPriceAdjustment as DomainNewPriceAdjustment, PriceAdjustment as DomainPriceAdjustment,
};
use crate::domain::types::{ContractId, IndexName, PriceAdjustmentId, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::price_adjustments)]
/// Diesel model for [`crate::domain::price_adjustment::PriceAdjustment`].
pub struct PriceAdjustment {
    pub id: i32,
    pub contract_id: i32,
    pub parcela_referencia: i32,
    pub valor_original: f64,
    pub valor_reajustado: f64,
    pub indice_aplicado: f64,
    pub indice_nome: String,
    pub percentual_adicional: f64,
    pub reajuste_total: f64,
    pub data_referencia: NaiveDate,
    pub data_aplicacao: Option<NaiveDate>,
    pub status: String,
    pub aplicado: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::price_adjustments)]
pub struct NewPriceAdjustment<'a> {
    pub contract_id: i32,
    pub parcela_referencia: i32,
    pub valor_original: f64,
    pub valor_reajustado: f64,
    pub indice_aplicado: f64,
    pub indice_nome: &'a str,
    pub percentual_adicional: f64,
    pub reajuste_total: f64,
    pub data_referencia: NaiveDate,
    pub data_aplicacao: Option<NaiveDate>,
    pub status: &'a str,
    pub aplicado: bool,
}

/// Full rewrite of the mutable columns of an adjustment, produced from a
/// merged domain record.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::price_adjustments)]
#[diesel(treat_none_as_null = true)]
pub struct UpdatePriceAdjustment<'a> {
    pub valor_original: f64,
    pub valor_reajustado: f64,
    pub indice_aplicado: f64,
    pub indice_nome: &'a str,
    pub percentual_adicional: f64,
    pub reajuste_total: f64,
    pub data_referencia: NaiveDate,
    pub data_aplicacao: Option<NaiveDate>,
    pub status: &'a str,
    pub aplicado: bool,
}

impl TryFrom<PriceAdjustment> for DomainPriceAdjustment {
    type Error = TypeConstraintError;

    fn try_from(row: PriceAdjustment) -> Result<Self, Self::Error> {
        Ok(Self {
            id: PriceAdjustmentId::try_from(row.id)?,
            contract_id: ContractId::try_from(row.contract_id)?,
            parcela_referencia: row.parcela_referencia,
            valor_original: row.valor_original,
            valor_reajustado: row.valor_reajustado,
            indice_aplicado: row.indice_aplicado,
            indice_nome: IndexName::new(row.indice_nome)?,
            percentual_adicional: row.percentual_adicional,
            reajuste_total: row.reajuste_total,
            data_referencia: row.data_referencia,
            data_aplicacao: row.data_aplicacao,
            status: row.status.into(),
            aplicado: row.aplicado,
            created_at: row.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewPriceAdjustment> for NewPriceAdjustment<'a> {
    fn from(adjustment: &'a DomainNewPriceAdjustment) -> Self {
        Self {
            contract_id: adjustment.contract_id.get(),
            parcela_referencia: adjustment.parcela_referencia,
            valor_original: adjustment.valor_original,
            valor_reajustado: adjustment.valor_reajustado,
            indice_aplicado: adjustment.indice_aplicado,
            indice_nome: adjustment.indice_nome.as_str(),
            percentual_adicional: adjustment.percentual_adicional,
            reajuste_total: adjustment.reajuste_total,
            data_referencia: adjustment.data_referencia,
            data_aplicacao: adjustment.data_aplicacao,
            status: adjustment.status.as_str(),
            aplicado: adjustment.aplicado,
        }
    }
}

impl<'a> From<&'a DomainPriceAdjustment> for UpdatePriceAdjustment<'a> {
    fn from(adjustment: &'a DomainPriceAdjustment) -> Self {
        Self {
            valor_original: adjustment.valor_original,
            valor_reajustado: adjustment.valor_reajustado,
            indice_aplicado: adjustment.indice_aplicado,
            indice_nome: adjustment.indice_nome.as_str(),
            percentual_adicional: adjustment.percentual_adicional,
            reajuste_total: adjustment.reajuste_total,
            data_referencia: adjustment.data_referencia,
            data_aplicacao: adjustment.data_aplicacao,
            status: adjustment.status.as_str(),
            aplicado: adjustment.aplicado,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::price_adjustment::AdjustmentStatus;

    #[test]
    fn english_status_alias_is_read_as_known_status() {
        let row = PriceAdjustment {
            id: 1,
            contract_id: 2,
            parcela_referencia: 13,
            valor_original: 500.0,
            valor_reajustado: 520.0,
            indice_aplicado: 4.0,
            indice_nome: "IPCA".to_string(),
            percentual_adicional: 0.0,
            reajuste_total: 4.0,
            data_referencia: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            data_aplicacao: None,
            status: "late".to_string(),
            aplicado: false,
            created_at: Utc::now().naive_utc(),
        };
        let domain = DomainPriceAdjustment::try_from(row).unwrap();
        assert_eq!(domain.status, AdjustmentStatus::Late);
        assert_eq!(domain.contract_id.get(), 2);
    }
}
