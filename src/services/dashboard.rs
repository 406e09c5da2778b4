//! Portfolio-wide dashboard figures.

use crate::domain::dashboard::{DashboardSummary, DashboardTotals};
use crate::domain::delinquency::STATUS_OVERDUE;
use crate::domain::lot::LotStatus;
use crate::repository::errors::RepositoryResult;
use crate::repository::{ClientReader, ContractReader, DelinquencyReader, LotReader};
use crate::services::{ServiceError, ServiceResult};

fn load_totals<R>(repo: &R) -> RepositoryResult<DashboardTotals>
where
    R: ClientReader + ContractReader + LotReader + DelinquencyReader + ?Sized,
{
    let [available, reserved, sold] = LotStatus::TRACKED;
    Ok(DashboardTotals {
        total_clientes: repo.count_clients()?,
        total_contratos: repo.count_contracts()?,
        total_lotes: repo.count_lots(None)?,
        lotes_disponiveis: repo.count_lots(Some(available))?,
        lotes_reservados: repo.count_lots(Some(reserved))?,
        lotes_vendidos: repo.count_lots(Some(sold))?,
        soma_contratos: repo.sum_contract_values()?,
        clientes_inadimplentes: repo.count_delinquencies(STATUS_OVERDUE)?,
        soma_em_aberto: repo.sum_open_amounts(STATUS_OVERDUE)?,
    })
}

/// Reads every count and sum the dashboard shows.
///
/// All figures come from the store or none do: any failure is logged and
/// reported as [`ServiceError::Unavailable`].
pub fn load_dashboard<R>(repo: &R) -> ServiceResult<DashboardSummary>
where
    R: ClientReader + ContractReader + LotReader + DelinquencyReader + ?Sized,
{
    load_totals(repo).map(DashboardSummary::from).map_err(|err| {
        log::error!("Failed to load dashboard data: {err}");
        ServiceError::Unavailable
    })
}
