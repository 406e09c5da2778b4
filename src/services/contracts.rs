//! Contracts and their installment schedules.

use chrono::NaiveDate;
use serde_json::Value;

use crate::domain::contract::{Contract, NewContract, UpdateContract, build_installment_schedule};
use crate::domain::installment::Installment;
use crate::domain::types::{ClientId, ContractId, InstallmentId};
use crate::dto::contract::{
    CREATE_CONTRACT_SCHEMA, ContractDetail, CreateContractPayload, PAY_INSTALLMENT_SCHEMA,
    PayInstallmentPayload, UPDATE_CONTRACT_SCHEMA, UpdateContractPayload,
};
use crate::pagination::Paginated;
use crate::repository::{ContractListQuery, ContractReader, ContractWriter};
use crate::services::{PageRequest, ServiceError, ServiceResult};
use crate::validation::parse_payload;

pub fn get_contract<R>(repo: &R, contract_id: i32) -> ServiceResult<ContractDetail>
where
    R: ContractReader + ?Sized,
{
    let contract_id = ContractId::new(contract_id)?;
    let contract = repo
        .get_contract_by_id(contract_id)?
        .ok_or(ServiceError::NotFound)?;
    let parcelas = repo.list_installments(contract_id)?;
    Ok(ContractDetail { contract, parcelas })
}

pub fn list_contracts<R>(
    repo: &R,
    client_id: Option<i32>,
    page: PageRequest,
) -> ServiceResult<Paginated<Contract>>
where
    R: ContractReader + ?Sized,
{
    let mut query = ContractListQuery::default().paginate(page.page, page.per_page);
    if let Some(client_id) = client_id {
        query = query.client(ClientId::new(client_id)?);
    }

    let (total, contracts) = repo.list_contracts(query)?;
    Ok(Paginated::new(contracts, total, page.page, page.per_page))
}

/// Creates the contract together with its monthly installment schedule.
pub fn create_contract<R>(repo: &R, payload: Value) -> ServiceResult<ContractDetail>
where
    R: ContractWriter + ?Sized,
{
    let payload: CreateContractPayload = parse_payload(&CREATE_CONTRACT_SCHEMA, payload)?;
    let new_contract = NewContract::try_from(payload)?;
    let schedule = build_installment_schedule(&new_contract)?;

    let (contract, parcelas) = repo
        .create_contract(&new_contract, &schedule)
        .map_err(|err| {
            log::error!(
                "Failed to create contract for client {}: {err}",
                new_contract.client_id
            );
            err
        })?;
    log::info!(
        "Created contract {} with {} installments",
        contract.id,
        parcelas.len()
    );
    Ok(ContractDetail { contract, parcelas })
}

pub fn update_contract<R>(repo: &R, contract_id: i32, payload: Value) -> ServiceResult<Contract>
where
    R: ContractWriter + ?Sized,
{
    let payload: UpdateContractPayload = parse_payload(&UPDATE_CONTRACT_SCHEMA, payload)?;
    let updates = UpdateContract::try_from(payload)?;
    Ok(repo.update_contract(ContractId::new(contract_id)?, &updates)?)
}

pub fn delete_contract<R>(repo: &R, contract_id: i32) -> ServiceResult<()>
where
    R: ContractWriter + ?Sized,
{
    let contract_id = ContractId::new(contract_id)?;
    repo.delete_contract(contract_id)?;
    log::info!("Deleted contract {contract_id} and its installments");
    Ok(())
}

pub fn list_installments<R>(repo: &R, contract_id: i32) -> ServiceResult<Vec<Installment>>
where
    R: ContractReader + ?Sized,
{
    let contract_id = ContractId::new(contract_id)?;
    if repo.get_contract_by_id(contract_id)?.is_none() {
        return Err(ServiceError::NotFound);
    }
    Ok(repo.list_installments(contract_id)?)
}

/// Marks an installment paid on the given date, or on `today` when the
/// payload omits it. Paying twice is a conflict.
pub fn pay_installment<R>(
    repo: &R,
    installment_id: i32,
    payload: Value,
    today: NaiveDate,
) -> ServiceResult<Installment>
where
    R: ContractReader + ContractWriter + ?Sized,
{
    let installment_id = InstallmentId::new(installment_id)?;
    let payload: PayInstallmentPayload = parse_payload(&PAY_INSTALLMENT_SCHEMA, payload)?;

    let installment = repo
        .get_installment_by_id(installment_id)?
        .ok_or(ServiceError::NotFound)?;
    if installment.status.is_paid() {
        return Err(ServiceError::Conflict(format!(
            "installment {installment_id} is already paid"
        )));
    }

    let paid_on = payload.data_pagamento.unwrap_or(today);
    let paid = repo.pay_installment(installment_id, paid_on)?;
    log::info!(
        "Installment {} of contract {} paid on {paid_on}",
        paid.numero_parcela,
        paid.contract_id
    );
    Ok(paid)
}
