use serde_json::Value;

use crate::domain::lot::{Lot, LotStatus, NewLot, UpdateLot};
use crate::domain::types::LotId;
use crate::dto::lot::{CREATE_LOT_SCHEMA, CreateLotPayload, UPDATE_LOT_SCHEMA, UpdateLotPayload};
use crate::pagination::Paginated;
use crate::repository::{LotListQuery, LotReader, LotWriter};
use crate::services::{PageRequest, ServiceError, ServiceResult};
use crate::validation::parse_payload;

pub fn get_lot<R>(repo: &R, lot_id: i32) -> ServiceResult<Lot>
where
    R: LotReader + ?Sized,
{
    repo.get_lot_by_id(LotId::new(lot_id)?)?
        .ok_or(ServiceError::NotFound)
}

/// Lists lots by block and number, optionally restricted to one status.
pub fn list_lots<R>(
    repo: &R,
    status: Option<String>,
    page: PageRequest,
) -> ServiceResult<Paginated<Lot>>
where
    R: LotReader + ?Sized,
{
    let mut query = LotListQuery::default().paginate(page.page, page.per_page);
    if let Some(status) = status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        query = query.status(LotStatus::from(status));
    }

    let (total, lots) = repo.list_lots(query)?;
    Ok(Paginated::new(lots, total, page.page, page.per_page))
}

pub fn create_lot<R>(repo: &R, payload: Value) -> ServiceResult<Lot>
where
    R: LotWriter + ?Sized,
{
    let payload: CreateLotPayload = parse_payload(&CREATE_LOT_SCHEMA, payload)?;
    let new_lot = NewLot::try_from(payload)?;

    let lot = repo.create_lot(&new_lot).map_err(|err| {
        log::error!(
            "Failed to create lot {}/{}: {err}",
            new_lot.quadra,
            new_lot.numero
        );
        err
    })?;
    Ok(lot)
}

pub fn update_lot<R>(repo: &R, lot_id: i32, payload: Value) -> ServiceResult<Lot>
where
    R: LotReader + LotWriter + ?Sized,
{
    let lot_id = LotId::new(lot_id)?;
    let payload: UpdateLotPayload = parse_payload(&UPDATE_LOT_SCHEMA, payload)?;
    let updates = UpdateLot::try_from(payload)?;

    if updates.is_empty() {
        return repo.get_lot_by_id(lot_id)?.ok_or(ServiceError::NotFound);
    }

    Ok(repo.update_lot(lot_id, &updates)?)
}

pub fn delete_lot<R>(repo: &R, lot_id: i32) -> ServiceResult<()>
where
    R: LotWriter + ?Sized,
{
    repo.delete_lot(LotId::new(lot_id)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;
    use crate::services::fixtures;

    #[test]
    fn list_filters_by_parsed_status() {
        let mut repo = MockRepository::new();
        repo.expect_list_lots()
            .withf(|query| query.status == Some(LotStatus::Sold))
            .returning(|_| Ok((1, vec![fixtures::lot(3, LotStatus::Sold)])));

        let page = list_lots(&repo, Some(" sold ".to_string()), PageRequest::default()).unwrap();
        assert_eq!(page.items[0].status, LotStatus::Sold);
    }

    #[test]
    fn duplicate_lot_is_a_conflict() {
        let mut repo = MockRepository::new();
        repo.expect_create_lot().returning(|_| {
            Err(RepositoryError::ConstraintViolation(
                "unique: UNIQUE constraint failed: lots.numero, lots.quadra".to_string(),
            ))
        });

        let result = create_lot(
            &repo,
            json!({"numero": "1", "quadra": "A", "area": 300, "valor": 80000}),
        );
        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[test]
    fn non_positive_id_is_rejected_before_lookup() {
        let repo = MockRepository::new();
        assert!(matches!(
            get_lot(&repo, 0),
            Err(ServiceError::TypeConstraint(_))
        ));
    }

    #[test]
    fn empty_update_reads_back_lot() {
        let mut repo = MockRepository::new();
        repo.expect_update_lot().never();
        repo.expect_get_lot_by_id().returning(|_| Ok(None));

        assert!(matches!(
            update_lot(&repo, 5, json!({})),
            Err(ServiceError::NotFound)
        ));
    }
}
