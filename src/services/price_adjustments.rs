//! Contractual price adjustments (reajustes).
//!
//! Stored records keep the status they were saved with; every read also
//! carries the status computed for `today`, which is what the badge shows.

use chrono::NaiveDate;
use serde_json::Value;

use crate::domain::price_adjustment::{
    AdjustmentStatus, AdjustmentTerms, NewPriceAdjustment, UpdatePriceAdjustment,
    check_adjustment_invariant,
};
use crate::domain::types::{ContractId, PriceAdjustmentId};
use crate::dto::price_adjustment::{
    AppliedAdjustment, CREATE_PRICE_ADJUSTMENT_SCHEMA, CreatePriceAdjustmentPayload,
    PriceAdjustmentView, UPDATE_PRICE_ADJUSTMENT_SCHEMA, UpdatePriceAdjustmentPayload,
};
use crate::pagination::Paginated;
use crate::repository::{PriceAdjustmentListQuery, PriceAdjustmentReader, PriceAdjustmentWriter};
use crate::services::{PageRequest, ServiceError, ServiceResult};
use crate::validation::parse_payload;

/// Reference date and imminence window used to classify adjustments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusClock {
    pub today: NaiveDate,
    pub horizon_days: u64,
}

impl StatusClock {
    pub fn new(today: NaiveDate, horizon_days: u64) -> Self {
        Self {
            today,
            horizon_days,
        }
    }
}

pub fn get_price_adjustment<R>(
    repo: &R,
    id: i32,
    clock: StatusClock,
) -> ServiceResult<PriceAdjustmentView>
where
    R: PriceAdjustmentReader + ?Sized,
{
    let adjustment = repo
        .get_price_adjustment_by_id(PriceAdjustmentId::new(id)?)?
        .ok_or(ServiceError::NotFound)?;
    Ok(PriceAdjustmentView::new(
        adjustment,
        clock.today,
        clock.horizon_days,
    ))
}

pub fn list_price_adjustments<R>(
    repo: &R,
    contract_id: Option<i32>,
    page: PageRequest,
    clock: StatusClock,
) -> ServiceResult<Paginated<PriceAdjustmentView>>
where
    R: PriceAdjustmentReader + ?Sized,
{
    let mut query = PriceAdjustmentListQuery::default().paginate(page.page, page.per_page);
    if let Some(contract_id) = contract_id {
        query = query.contract(ContractId::new(contract_id)?);
    }

    let (total, adjustments) = repo.list_price_adjustments(query)?;
    Ok(Paginated::new(adjustments, total, page.page, page.per_page)
        .map(|adjustment| PriceAdjustmentView::new(adjustment, clock.today, clock.horizon_days)))
}

/// Creates an adjustment, deriving the total percentage and the adjusted
/// value when they are omitted.
///
/// A record created as applied without `dataAplicacao` is stamped with
/// `today`.
pub fn create_price_adjustment<R>(
    repo: &R,
    payload: Value,
    clock: StatusClock,
) -> ServiceResult<PriceAdjustmentView>
where
    R: PriceAdjustmentWriter + ?Sized,
{
    let payload: CreatePriceAdjustmentPayload =
        parse_payload(&CREATE_PRICE_ADJUSTMENT_SCHEMA, payload)?;
    let mut terms = AdjustmentTerms::try_from(payload)?;
    if terms.aplicado && terms.data_aplicacao.is_none() {
        terms.data_aplicacao = Some(clock.today);
    }

    let new_adjustment = NewPriceAdjustment::try_new(terms, clock.today, clock.horizon_days)
        .map_err(|err| ServiceError::Computation(err.to_string()))?;
    let adjustment = repo
        .create_price_adjustment(&new_adjustment)
        .map_err(|err| {
            log::error!(
                "Failed to create adjustment for contract {} installment {}: {err}",
                new_adjustment.contract_id,
                new_adjustment.parcela_referencia
            );
            err
        })?;
    Ok(PriceAdjustmentView::new(
        adjustment,
        clock.today,
        clock.horizon_days,
    ))
}

/// Merges a partial update into the stored record and saves it.
///
/// Installment values are only rescaled by [`apply_price_adjustment`].
pub fn update_price_adjustment<R>(
    repo: &R,
    id: i32,
    payload: Value,
    clock: StatusClock,
) -> ServiceResult<PriceAdjustmentView>
where
    R: PriceAdjustmentReader + PriceAdjustmentWriter + ?Sized,
{
    let id = PriceAdjustmentId::new(id)?;
    let payload: UpdatePriceAdjustmentPayload =
        parse_payload(&UPDATE_PRICE_ADJUSTMENT_SCHEMA, payload)?;
    let updates = UpdatePriceAdjustment::try_from(payload)?;

    let current = repo
        .get_price_adjustment_by_id(id)?
        .ok_or(ServiceError::NotFound)?;
    let merged = updates
        .merge(&current, clock.today)
        .map_err(|err| ServiceError::Computation(err.to_string()))?;

    let saved = repo.save_price_adjustment(&merged)?;
    Ok(PriceAdjustmentView::new(saved, clock.today, clock.horizon_days))
}

/// Marks the adjustment applied on `today` and rescales the corrected value
/// of every unpaid installment from the reference number on.
pub fn apply_price_adjustment<R>(
    repo: &R,
    id: i32,
    clock: StatusClock,
) -> ServiceResult<AppliedAdjustment>
where
    R: PriceAdjustmentReader + PriceAdjustmentWriter + ?Sized,
{
    let id = PriceAdjustmentId::new(id)?;
    let mut adjustment = repo
        .get_price_adjustment_by_id(id)?
        .ok_or(ServiceError::NotFound)?;
    if adjustment.aplicado {
        return Err(ServiceError::Conflict(format!(
            "adjustment {id} was already applied"
        )));
    }
    if !adjustment.factor().is_finite() || adjustment.factor() < 0.0 {
        return Err(ServiceError::Computation(format!(
            "adjustment {id} has an invalid total of {}%",
            adjustment.reajuste_total
        )));
    }

    adjustment.aplicado = true;
    adjustment.status = AdjustmentStatus::Applied;
    adjustment.data_aplicacao = Some(clock.today);
    check_adjustment_invariant(
        adjustment.aplicado,
        &adjustment.status,
        adjustment.data_aplicacao,
    )
    .map_err(|err| ServiceError::Computation(err.to_string()))?;

    let (saved, parcelas_atualizadas) = repo.apply_price_adjustment(&adjustment).map_err(|err| {
        log::error!("Failed to apply adjustment {id}: {err}");
        err
    })?;
    log::info!(
        "Applied adjustment {id} ({}% {}) to {parcelas_atualizadas} installments of contract {}",
        saved.reajuste_total,
        saved.indice_nome,
        saved.contract_id
    );

    Ok(AppliedAdjustment {
        reajuste: PriceAdjustmentView::new(saved, clock.today, clock.horizon_days),
        parcelas_atualizadas,
    })
}

pub fn delete_price_adjustment<R>(repo: &R, id: i32) -> ServiceResult<()>
where
    R: PriceAdjustmentWriter + ?Sized,
{
    repo.delete_price_adjustment(PriceAdjustmentId::new(id)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::repository::mock::MockRepository;
    use crate::services::fixtures::{self, date};

    fn clock() -> StatusClock {
        StatusClock::new(date(2024, 6, 1), 30)
    }

    #[test]
    fn list_reports_status_for_today() {
        let mut repo = MockRepository::new();
        repo.expect_list_price_adjustments().returning(|_| {
            Ok((
                3,
                vec![
                    fixtures::adjustment(1, date(2024, 5, 1), false),
                    fixtures::adjustment(2, date(2024, 6, 20), false),
                    fixtures::adjustment(3, date(2024, 12, 1), false),
                ],
            ))
        });

        let page = list_price_adjustments(&repo, None, PageRequest::default(), clock()).unwrap();
        let badges: Vec<_> = page
            .items
            .iter()
            .map(|view| view.status_label.as_str())
            .collect();
        assert_eq!(badges, vec!["Atrasado", "Iminente", "Pendente"]);
    }

    #[test]
    fn create_derives_total_and_adjusted_value() {
        let mut repo = MockRepository::new();
        repo.expect_create_price_adjustment()
            .withf(|new| {
                new.reajuste_total == 5.5
                    && new.valor_reajustado == 1_055.0
                    && new.status == AdjustmentStatus::Pending
            })
            .times(1)
            .returning(|_| Ok(fixtures::adjustment(1, date(2025, 1, 10), false)));

        create_price_adjustment(
            &repo,
            json!({
                "contractId": 1,
                "parcelaReferencia": 13,
                "valorOriginal": 1000,
                "indiceAplicado": 4.5,
                "indiceNome": "IPCA",
                "percentualAdicional": 1,
                "dataReferencia": "2025-01-10",
            }),
            clock(),
        )
        .unwrap();
    }

    #[test]
    fn applied_on_create_without_date_gets_today() {
        let mut repo = MockRepository::new();
        repo.expect_create_price_adjustment()
            .withf(|new| new.aplicado && new.data_aplicacao == Some(date(2024, 6, 1)))
            .times(1)
            .returning(|_| Ok(fixtures::adjustment(1, date(2024, 5, 1), true)));

        let view = create_price_adjustment(
            &repo,
            json!({
                "contractId": 1,
                "parcelaReferencia": 13,
                "valorOriginal": 1000,
                "indiceAplicado": 4.5,
                "indiceNome": "IPCA",
                "dataReferencia": "2024-05-01",
                "aplicado": true,
            }),
            clock(),
        )
        .unwrap();
        assert_eq!(view.status_atual, AdjustmentStatus::Applied);
    }

    #[test]
    fn applied_flag_with_pending_status_breaks_invariant() {
        let repo = MockRepository::new();
        let result = create_price_adjustment(
            &repo,
            json!({
                "contractId": 1,
                "parcelaReferencia": 13,
                "valorOriginal": 1000,
                "indiceAplicado": 4.5,
                "indiceNome": "IPCA",
                "dataReferencia": "2024-05-01",
                "dataAplicacao": "2024-05-02",
                "status": "pendente",
                "aplicado": true,
            }),
            clock(),
        );
        assert!(matches!(result, Err(ServiceError::Computation(_))));
    }

    #[test]
    fn apply_marks_record_and_reports_touched_installments() {
        let mut repo = MockRepository::new();
        repo.expect_get_price_adjustment_by_id()
            .returning(|id| Ok(Some(fixtures::adjustment(id.get(), date(2024, 5, 1), false))));
        repo.expect_apply_price_adjustment()
            .withf(|adjustment| {
                adjustment.aplicado
                    && adjustment.status == AdjustmentStatus::Applied
                    && adjustment.data_aplicacao == Some(date(2024, 6, 1))
            })
            .times(1)
            .returning(|adjustment| Ok((adjustment.clone(), 12)));

        let applied = apply_price_adjustment(&repo, 4, clock()).unwrap();
        assert_eq!(applied.parcelas_atualizadas, 12);
        assert_eq!(applied.reajuste.status_label, "Aplicado");
    }

    #[test]
    fn applying_twice_is_a_conflict() {
        let mut repo = MockRepository::new();
        repo.expect_get_price_adjustment_by_id()
            .returning(|id| Ok(Some(fixtures::adjustment(id.get(), date(2024, 5, 1), true))));
        repo.expect_apply_price_adjustment().never();

        assert!(matches!(
            apply_price_adjustment(&repo, 4, clock()),
            Err(ServiceError::Conflict(_))
        ));
    }

    #[test]
    fn update_with_bare_applied_flag_stamps_today() {
        let mut repo = MockRepository::new();
        repo.expect_get_price_adjustment_by_id()
            .returning(|id| Ok(Some(fixtures::adjustment(id.get(), date(2024, 5, 1), false))));
        repo.expect_save_price_adjustment()
            .withf(|merged| merged.aplicado && merged.data_aplicacao == Some(date(2024, 6, 1)))
            .times(1)
            .returning(|merged| Ok(merged.clone()));

        let view = update_price_adjustment(&repo, 2, json!({"aplicado": true}), clock()).unwrap();
        assert_eq!(view.adjustment.status, AdjustmentStatus::Applied);
    }

    #[test]
    fn update_with_applied_status_sets_flag() {
        let mut repo = MockRepository::new();
        repo.expect_get_price_adjustment_by_id()
            .returning(|id| Ok(Some(fixtures::adjustment(id.get(), date(2024, 5, 1), false))));
        repo.expect_save_price_adjustment()
            .withf(|merged| {
                merged.aplicado
                    && merged.status == AdjustmentStatus::Applied
                    && merged.data_aplicacao == Some(date(2024, 6, 1))
            })
            .times(1)
            .returning(|merged| Ok(merged.clone()));

        let view =
            update_price_adjustment(&repo, 2, json!({"status": "applied"}), clock()).unwrap();
        assert!(view.adjustment.aplicado);
        assert_eq!(view.status_atual, AdjustmentStatus::Applied);
    }
}
