use serde::Deserialize;

use crate::domain::lot::{LotStatus, NewLot, UpdateLot};
use crate::domain::types::{BlockName, LotNumber, TypeConstraintError};
use crate::validation::{FieldRule, FieldSpec, Schema};

pub const CREATE_LOT_SCHEMA: Schema = Schema::new(
    "CreateLot",
    &[
        FieldSpec::required("numero", FieldRule::Text),
        FieldSpec::required("quadra", FieldRule::Text),
        FieldSpec::required("area", FieldRule::Number { min: Some(0.0) }),
        FieldSpec::required("valor", FieldRule::Number { min: Some(0.0) }),
        FieldSpec::optional("status", FieldRule::Text),
    ],
);

pub const UPDATE_LOT_SCHEMA: Schema = CREATE_LOT_SCHEMA.partial("UpdateLot");

#[derive(Debug, Deserialize)]
pub struct CreateLotPayload {
    pub numero: String,
    pub quadra: String,
    pub area: f64,
    pub valor: f64,
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateLotPayload {
    pub numero: Option<String>,
    pub quadra: Option<String>,
    pub area: Option<f64>,
    pub valor: Option<f64>,
    pub status: Option<String>,
}

fn non_negative(value: f64, field: &'static str) -> Result<f64, TypeConstraintError> {
    if value < 0.0 {
        Err(TypeConstraintError::Negative(field))
    } else {
        Ok(value)
    }
}

fn status(raw: String) -> Option<LotStatus> {
    crate::dto::optional_text(Some(raw)).map(LotStatus::from)
}

impl TryFrom<CreateLotPayload> for NewLot {
    type Error = TypeConstraintError;

    fn try_from(payload: CreateLotPayload) -> Result<Self, Self::Error> {
        Ok(Self {
            numero: LotNumber::new(payload.numero)?,
            quadra: BlockName::new(payload.quadra)?,
            area: non_negative(payload.area, "area")?,
            valor: non_negative(payload.valor, "valor")?,
            status: payload
                .status
                .and_then(status)
                .unwrap_or(LotStatus::Available),
        })
    }
}

impl TryFrom<UpdateLotPayload> for UpdateLot {
    type Error = TypeConstraintError;

    fn try_from(payload: UpdateLotPayload) -> Result<Self, Self::Error> {
        Ok(Self {
            numero: payload.numero.map(LotNumber::new).transpose()?,
            quadra: payload.quadra.map(BlockName::new).transpose()?,
            area: payload
                .area
                .map(|area| non_negative(area, "area"))
                .transpose()?,
            valor: payload
                .valor
                .map(|valor| non_negative(valor, "valor"))
                .transpose()?,
            status: payload.status.and_then(status),
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::validation::parse_payload;

    #[test]
    fn new_lots_default_to_available() {
        let payload: CreateLotPayload = parse_payload(
            &CREATE_LOT_SCHEMA,
            json!({"numero": "12", "quadra": "B", "area": 250, "valor": 85000}),
        )
        .unwrap();
        let lot = NewLot::try_from(payload).unwrap();
        assert_eq!(lot.status, LotStatus::Available);
        assert_eq!(lot.area, 250.0);
    }

    #[test]
    fn update_keeps_unknown_status_verbatim() {
        let payload: UpdateLotPayload =
            parse_payload(&UPDATE_LOT_SCHEMA, json!({"status": "em_obra"})).unwrap();
        let update = UpdateLot::try_from(payload).unwrap();
        assert_eq!(update.status, Some(LotStatus::Other("em_obra".to_string())));
        assert_eq!(update.valor, None);
    }

    #[test]
    fn negative_values_fail_the_schema() {
        let errors = UPDATE_LOT_SCHEMA
            .validate(&json!({"valor": -5}))
            .unwrap_err();
        assert_eq!(errors.errors()[0].field, "valor");
    }
}
