//! Diesel models for contracts and their installments.

use chrono::{NaiveDate, NaiveDateTime, Utc};
use diesel::prelude::*;

use crate::domain::contract::{
    Contract as DomainContract, NewContract as DomainNewContract, ScheduledInstallment,
    UpdateContract as DomainUpdateContract,
};
use crate::domain::installment::{Installment as DomainInstallment, InstallmentStatus};
use crate::domain::types::{
    ClientId, ContractId, IndexName, InstallmentId, Label, LotId, TypeConstraintError,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::contracts)]
pub struct Contract {
    pub id: i32,
    pub client_id: i32,
    pub lot_id: i32,
    pub valor_total: f64,
    pub valor_entrada: f64,
    pub quantidade_parcelas: i32,
    pub data_inicio: NaiveDate,
    pub indice_reajuste: String,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::contracts)]
pub struct NewContract<'a> {
    pub client_id: i32,
    pub lot_id: i32,
    pub valor_total: f64,
    pub valor_entrada: f64,
    pub quantidade_parcelas: i32,
    pub data_inicio: NaiveDate,
    pub indice_reajuste: &'a str,
    pub status: &'a str,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::contracts)]
pub struct UpdateContract<'a> {
    pub indice_reajuste: Option<&'a str>,
    pub status: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::installments)]
#[diesel(belongs_to(Contract, foreign_key = contract_id))]
pub struct Installment {
    pub id: i32,
    pub contract_id: i32,
    pub numero_parcela: i32,
    pub data_vencimento: NaiveDate,
    pub valor: f64,
    pub valor_corrigido: f64,
    pub status: String,
    pub data_pagamento: Option<NaiveDate>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::installments)]
/// Row written for each entry of a generated schedule.
pub struct NewInstallment<'a> {
    pub contract_id: i32,
    pub numero_parcela: i32,
    pub data_vencimento: NaiveDate,
    pub valor: f64,
    pub valor_corrigido: f64,
    pub status: &'a str,
}

impl NewInstallment<'_> {
    pub fn scheduled(contract_id: i32, scheduled: &ScheduledInstallment) -> Self {
        Self {
            contract_id,
            numero_parcela: scheduled.numero_parcela,
            data_vencimento: scheduled.data_vencimento,
            valor: scheduled.valor,
            valor_corrigido: scheduled.valor,
            status: "pendente",
        }
    }
}

impl TryFrom<Contract> for DomainContract {
    type Error = TypeConstraintError;

    fn try_from(contract: Contract) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ContractId::try_from(contract.id)?,
            client_id: ClientId::try_from(contract.client_id)?,
            lot_id: LotId::try_from(contract.lot_id)?,
            valor_total: contract.valor_total,
            valor_entrada: contract.valor_entrada,
            quantidade_parcelas: contract.quantidade_parcelas,
            data_inicio: contract.data_inicio,
            indice_reajuste: IndexName::new(contract.indice_reajuste)?,
            status: Label::new(contract.status)?,
            created_at: contract.created_at,
            updated_at: contract.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewContract> for NewContract<'a> {
    fn from(contract: &'a DomainNewContract) -> Self {
        Self {
            client_id: contract.client_id.get(),
            lot_id: contract.lot_id.get(),
            valor_total: contract.valor_total,
            valor_entrada: contract.valor_entrada,
            quantidade_parcelas: contract.quantidade_parcelas,
            data_inicio: contract.data_inicio,
            indice_reajuste: contract.indice_reajuste.as_str(),
            status: contract.status.as_str(),
        }
    }
}

impl<'a> From<&'a DomainUpdateContract> for UpdateContract<'a> {
    fn from(contract: &'a DomainUpdateContract) -> Self {
        Self {
            indice_reajuste: contract.indice_reajuste.as_ref().map(|i| i.as_str()),
            status: contract.status.as_ref().map(|s| s.as_str()),
            updated_at: Utc::now().naive_utc(),
        }
    }
}

/// Installment values are not range-checked here; the delinquency rules
/// report bad amounts with their position.
impl TryFrom<Installment> for DomainInstallment {
    type Error = TypeConstraintError;

    fn try_from(installment: Installment) -> Result<Self, Self::Error> {
        Ok(Self {
            id: InstallmentId::try_from(installment.id)?,
            contract_id: ContractId::try_from(installment.contract_id)?,
            numero_parcela: installment.numero_parcela,
            data_vencimento: installment.data_vencimento,
            valor: installment.valor,
            valor_corrigido: installment.valor_corrigido,
            status: InstallmentStatus::from(installment.status),
            data_pagamento: installment.data_pagamento,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheduled_installment_starts_pending_with_nominal_value() {
        let scheduled = ScheduledInstallment {
            numero_parcela: 2,
            data_vencimento: NaiveDate::from_ymd_opt(2024, 2, 10).unwrap(),
            valor: 333.33,
        };
        let row = NewInstallment::scheduled(9, &scheduled);
        assert_eq!(row.contract_id, 9);
        assert_eq!(row.valor_corrigido, 333.33);
        assert_eq!(row.status, "pendente");
    }

    #[test]
    fn unknown_installment_status_is_kept() {
        let row = Installment {
            id: 1,
            contract_id: 1,
            numero_parcela: 1,
            data_vencimento: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            valor: 100.0,
            valor_corrigido: 104.5,
            status: "renegociado".to_string(),
            data_pagamento: None,
        };
        let domain = DomainInstallment::try_from(row).unwrap();
        assert_eq!(
            domain.status,
            InstallmentStatus::Other("renegociado".to_string())
        );
    }
}
