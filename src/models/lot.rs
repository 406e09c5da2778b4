use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::lot::{Lot as DomainLot, NewLot as DomainNewLot, UpdateLot as DomainUpdateLot};
use crate::domain::types::{BlockName, LotId, LotNumber, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::lots)]
/// Diesel model for [`crate::domain::lot::Lot`].
pub struct Lot {
    pub id: i32,
    pub numero: String,
    pub quadra: String,
    pub area: f64,
    pub valor: f64,
    pub status: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::lots)]
pub struct NewLot<'a> {
    pub numero: &'a str,
    pub quadra: &'a str,
    pub area: f64,
    pub valor: f64,
    pub status: &'a str,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::lots)]
pub struct UpdateLot<'a> {
    pub numero: Option<&'a str>,
    pub quadra: Option<&'a str>,
    pub area: Option<f64>,
    pub valor: Option<f64>,
    pub status: Option<&'a str>,
}

impl TryFrom<Lot> for DomainLot {
    type Error = TypeConstraintError;

    fn try_from(lot: Lot) -> Result<Self, Self::Error> {
        Ok(Self {
            id: LotId::try_from(lot.id)?,
            numero: LotNumber::new(lot.numero)?,
            quadra: BlockName::new(lot.quadra)?,
            area: lot.area,
            valor: lot.valor,
            status: lot.status.into(),
            created_at: lot.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewLot> for NewLot<'a> {
    fn from(lot: &'a DomainNewLot) -> Self {
        Self {
            numero: lot.numero.as_str(),
            quadra: lot.quadra.as_str(),
            area: lot.area,
            valor: lot.valor,
            status: lot.status.as_str(),
        }
    }
}

impl<'a> From<&'a DomainUpdateLot> for UpdateLot<'a> {
    fn from(lot: &'a DomainUpdateLot) -> Self {
        Self {
            numero: lot.numero.as_ref().map(|n| n.as_str()),
            quadra: lot.quadra.as_ref().map(|q| q.as_str()),
            area: lot.area,
            valor: lot.valor,
            status: lot.status.as_ref().map(|s| s.as_str()),
        }
    }
}
