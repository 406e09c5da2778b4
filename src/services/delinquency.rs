//! Delinquency snapshots: computation from installments and the stored
//! follow-up records.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use crate::domain::delinquency::{
    DelinquencyRecord, DelinquentClient, NewDelinquencyRecord, UpdateDelinquencyRecord,
    compute_delinquency,
};
use crate::domain::types::{ClientId, DelinquencyId};
use crate::dto::delinquency::{
    CREATE_DELINQUENCY_SCHEMA, CreateDelinquencyPayload, UPDATE_DELINQUENCY_SCHEMA,
    UpdateDelinquencyPayload,
};
use crate::pagination::Paginated;
use crate::repository::{
    ClientReader, ContractReader, DelinquencyListQuery, DelinquencyReader, DelinquencyWriter,
};
use crate::services::{PageRequest, ServiceError, ServiceResult};
use crate::validation::parse_payload;

/// Outcome of refreshing every client holding a contract.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshReport {
    pub atualizados: Vec<DelinquencyRecord>,
    /// Clients whose installments failed the aggregation checks.
    pub ignorados: Vec<ClientId>,
}

/// Computes the client's snapshot on `today` without storing it.
pub fn compute_client_delinquency<R>(
    repo: &R,
    client_id: i32,
    today: NaiveDate,
) -> ServiceResult<DelinquentClient>
where
    R: ClientReader + ContractReader + ?Sized,
{
    let client_id = ClientId::new(client_id)?;
    if repo.get_client_by_id(client_id)?.is_none() {
        return Err(ServiceError::NotFound);
    }
    snapshot(repo, client_id, today)
}

fn snapshot<R>(repo: &R, client_id: ClientId, today: NaiveDate) -> ServiceResult<DelinquentClient>
where
    R: ContractReader + ?Sized,
{
    let installments = repo.list_client_installments(client_id)?;
    compute_delinquency(client_id, &installments, today).map_err(|errors| {
        log::warn!("Installments of client {client_id} failed aggregation: {errors}");
        ServiceError::Validation(errors)
    })
}

/// Recomputes and stores the client's snapshot, keeping the stored contact
/// date and notes.
pub fn refresh_client_delinquency<R>(
    repo: &R,
    client_id: i32,
    today: NaiveDate,
) -> ServiceResult<DelinquencyRecord>
where
    R: ClientReader + ContractReader + DelinquencyWriter + ?Sized,
{
    let snapshot = compute_client_delinquency(repo, client_id, today)?;
    Ok(repo.upsert_delinquency(&NewDelinquencyRecord::from(&snapshot))?)
}

/// Refreshes every client with at least one contract.
///
/// Clients whose installments fail the aggregation checks are skipped and
/// reported; a store failure aborts the run.
pub fn refresh_all<R>(repo: &R, today: NaiveDate) -> ServiceResult<RefreshReport>
where
    R: ClientReader + ContractReader + DelinquencyWriter + ?Sized,
{
    let mut report = RefreshReport::default();
    for client_id in repo.list_client_ids_with_contracts()? {
        match snapshot(repo, client_id, today) {
            Ok(snapshot) => {
                let record = repo.upsert_delinquency(&NewDelinquencyRecord::from(&snapshot))?;
                report.atualizados.push(record);
            }
            Err(ServiceError::Validation(_)) => report.ignorados.push(client_id),
            Err(err) => return Err(err),
        }
    }
    log::info!(
        "Delinquency refresh on {today}: {} updated, {} skipped",
        report.atualizados.len(),
        report.ignorados.len()
    );
    Ok(report)
}

pub fn get_delinquency<R>(repo: &R, id: i32) -> ServiceResult<DelinquencyRecord>
where
    R: DelinquencyReader + ?Sized,
{
    repo.get_delinquency_by_id(DelinquencyId::new(id)?)?
        .ok_or(ServiceError::NotFound)
}

/// Lists stored snapshots, most days late first.
pub fn list_delinquencies<R>(
    repo: &R,
    status: Option<String>,
    page: PageRequest,
) -> ServiceResult<Paginated<DelinquencyRecord>>
where
    R: DelinquencyReader + ?Sized,
{
    let mut query = DelinquencyListQuery::default().paginate(page.page, page.per_page);
    if let Some(status) = status.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()) {
        query = query.status(status);
    }
    let (total, records) = repo.list_delinquencies(query)?;
    Ok(Paginated::new(records, total, page.page, page.per_page))
}

pub fn create_delinquency<R>(repo: &R, payload: Value) -> ServiceResult<DelinquencyRecord>
where
    R: DelinquencyWriter + ?Sized,
{
    let payload: CreateDelinquencyPayload = parse_payload(&CREATE_DELINQUENCY_SCHEMA, payload)?;
    let record = NewDelinquencyRecord::try_from(payload)?;
    Ok(repo.create_delinquency(&record)?)
}

pub fn update_delinquency<R>(repo: &R, id: i32, payload: Value) -> ServiceResult<DelinquencyRecord>
where
    R: DelinquencyWriter + ?Sized,
{
    let payload: UpdateDelinquencyPayload = parse_payload(&UPDATE_DELINQUENCY_SCHEMA, payload)?;
    let updates = UpdateDelinquencyRecord::try_from(payload)?;
    Ok(repo.update_delinquency(DelinquencyId::new(id)?, &updates)?)
}

pub fn delete_delinquency<R>(repo: &R, id: i32) -> ServiceResult<()>
where
    R: DelinquencyWriter + ?Sized,
{
    repo.delete_delinquency(DelinquencyId::new(id)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Days;
    use serde_json::json;

    use super::*;
    use crate::domain::delinquency::{STATUS_OVERDUE, STATUS_REGULAR};
    use crate::domain::types::InstallmentId;
    use crate::repository::mock::MockRepository;
    use crate::services::fixtures::{self, date};

    fn stored(record: &NewDelinquencyRecord) -> DelinquencyRecord {
        DelinquencyRecord {
            id: DelinquencyId::new(1).unwrap(),
            client_id: record.client_id,
            valor_em_aberto: record.valor_em_aberto,
            dias_atraso: record.dias_atraso,
            ultimo_contato: None,
            status: record.status.clone(),
            observacoes: None,
            parcelas: record.parcelas.clone(),
            updated_at: fixtures::timestamp(),
        }
    }

    #[test]
    fn refresh_stores_computed_snapshot() {
        let today = date(2024, 6, 15);
        let mut repo = MockRepository::new();
        repo.expect_get_client_by_id()
            .returning(|id| Ok(Some(fixtures::client(id.get()))));
        repo.expect_list_client_installments().returning(move |_| {
            Ok(vec![
                fixtures::installment(1, 1, today - Days::new(20), 400.0, "pendente"),
                fixtures::installment(2, 2, today - Days::new(5), 400.0, "pago"),
                fixtures::installment(3, 3, today + Days::new(10), 400.0, "pendente"),
            ])
        });
        repo.expect_upsert_delinquency()
            .withf(|record| {
                record.valor_em_aberto == 400.0
                    && record.dias_atraso == 20
                    && record.status == STATUS_OVERDUE
                    && record.parcelas == vec![InstallmentId::new(1).unwrap()]
            })
            .times(1)
            .returning(|record| Ok(stored(record)));

        let record = refresh_client_delinquency(&repo, 7, today).unwrap();
        assert_eq!(record.client_id.get(), 7);
    }

    #[test]
    fn unknown_client_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_get_client_by_id().returning(|_| Ok(None));
        repo.expect_list_client_installments().never();

        let result = compute_client_delinquency(&repo, 3, date(2024, 6, 15));
        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn refresh_all_skips_clients_with_invalid_installments() {
        let today = date(2024, 6, 15);
        let mut repo = MockRepository::new();
        repo.expect_list_client_ids_with_contracts()
            .returning(|| Ok(vec![ClientId::new(1).unwrap(), ClientId::new(2).unwrap()]));
        repo.expect_list_client_installments().returning(move |client_id| {
            let valor = if client_id.get() == 1 { -10.0 } else { 100.0 };
            Ok(vec![fixtures::installment(client_id.get(), 1, today, valor, "pendente")])
        });
        repo.expect_upsert_delinquency()
            .times(1)
            .returning(|record| Ok(stored(record)));

        let report = refresh_all(&repo, today).unwrap();
        assert_eq!(report.ignorados, vec![ClientId::new(1).unwrap()]);
        assert_eq!(report.atualizados.len(), 1);
        assert_eq!(report.atualizados[0].status, STATUS_REGULAR);
    }

    #[test]
    fn manual_update_cannot_reassign_client() {
        let repo = MockRepository::new();
        let result = update_delinquency(&repo, 1, json!({"clientId": 2}));
        assert!(matches!(result, Err(ServiceError::TypeConstraint(_))));
    }
}
