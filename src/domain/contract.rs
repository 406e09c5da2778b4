use chrono::{Months, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::types::{ClientId, ContractId, IndexName, Label, LotId, TypeConstraintError};

/// Longest schedule a contract may carry: fifty years of monthly installments.
pub const MAX_INSTALLMENTS: i32 = 600;

/// Sale of a lot to a client, paid in monthly installments.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub id: ContractId,
    pub client_id: ClientId,
    pub lot_id: LotId,
    pub valor_total: f64,
    pub valor_entrada: f64,
    pub quantidade_parcelas: i32,
    /// Due date of the first installment.
    pub data_inicio: NaiveDate,
    pub indice_reajuste: IndexName,
    pub status: Label,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewContract {
    pub client_id: ClientId,
    pub lot_id: LotId,
    pub valor_total: f64,
    pub valor_entrada: f64,
    pub quantidade_parcelas: i32,
    pub data_inicio: NaiveDate,
    pub indice_reajuste: IndexName,
    pub status: Label,
}

impl NewContract {
    /// Checks the monetary relations that single-field rules cannot express.
    #[allow(clippy::too_many_arguments)]
    pub fn try_new(
        client_id: ClientId,
        lot_id: LotId,
        valor_total: f64,
        valor_entrada: f64,
        quantidade_parcelas: i32,
        data_inicio: NaiveDate,
        indice_reajuste: IndexName,
        status: Label,
    ) -> Result<Self, TypeConstraintError> {
        if valor_total < 0.0 {
            return Err(TypeConstraintError::Negative("valorTotal"));
        }
        if valor_entrada < 0.0 {
            return Err(TypeConstraintError::Negative("valorEntrada"));
        }
        if valor_entrada > valor_total {
            return Err(TypeConstraintError::InvalidValue(
                "valorEntrada exceeds valorTotal".to_string(),
            ));
        }
        if !(1..=MAX_INSTALLMENTS).contains(&quantidade_parcelas) {
            return Err(TypeConstraintError::InvalidValue(format!(
                "quantidadeParcelas must be between 1 and {MAX_INSTALLMENTS}"
            )));
        }
        Ok(Self {
            client_id,
            lot_id,
            valor_total,
            valor_entrada,
            quantidade_parcelas,
            data_inicio,
            indice_reajuste,
            status,
        })
    }

    /// Amount left to be paid in installments.
    pub fn valor_financiado(&self) -> f64 {
        self.valor_total - self.valor_entrada
    }
}

/// Partial update of the descriptive contract fields.
///
/// Monetary terms and the schedule are fixed once installments exist.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct UpdateContract {
    pub indice_reajuste: Option<IndexName>,
    pub status: Option<Label>,
}

/// Installment produced by [`build_installment_schedule`], before it has an id.
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduledInstallment {
    pub numero_parcela: i32,
    pub data_vencimento: NaiveDate,
    pub valor: f64,
}

/// Splits the financed amount into monthly installments.
///
/// Amounts are split in whole cents; the last installment absorbs the
/// remainder. Due dates fall on the same day each month, clamped to the last
/// day of shorter months.
pub fn build_installment_schedule(
    contract: &NewContract,
) -> Result<Vec<ScheduledInstallment>, TypeConstraintError> {
    let count = contract.quantidade_parcelas;
    if count < 1 {
        return Err(TypeConstraintError::InvalidValue(
            "quantidadeParcelas must be at least 1".to_string(),
        ));
    }
    let financed = contract.valor_financiado();
    if financed < 0.0 {
        return Err(TypeConstraintError::Negative("valorFinanciado"));
    }

    let total_cents = (financed * 100.0).round() as i64;
    let per_installment = total_cents / i64::from(count);
    let remainder = total_cents - per_installment * i64::from(count);

    (0..count)
        .map(|index| {
            let data_vencimento = contract
                .data_inicio
                .checked_add_months(Months::new(index as u32))
                .ok_or_else(|| {
                    TypeConstraintError::InvalidValue("due date out of range".to_string())
                })?;
            let cents = if index == count - 1 {
                per_installment + remainder
            } else {
                per_installment
            };
            Ok(ScheduledInstallment {
                numero_parcela: index + 1,
                data_vencimento,
                valor: cents as f64 / 100.0,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contract(total: f64, entrada: f64, parcelas: i32, inicio: NaiveDate) -> NewContract {
        NewContract::try_new(
            ClientId::new(1).unwrap(),
            LotId::new(1).unwrap(),
            total,
            entrada,
            parcelas,
            inicio,
            IndexName::new("IPCA").unwrap(),
            Label::new("ativo").unwrap(),
        )
        .unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn last_installment_absorbs_rounding_remainder() {
        let schedule = build_installment_schedule(&contract(1100.0, 100.0, 3, date(2024, 1, 10)))
            .unwrap();
        let values: Vec<f64> = schedule.iter().map(|i| i.valor).collect();
        assert_eq!(values, vec![333.33, 333.33, 333.34]);
        let numbers: Vec<i32> = schedule.iter().map(|i| i.numero_parcela).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn due_dates_clamp_to_month_end() {
        let schedule =
            build_installment_schedule(&contract(300.0, 0.0, 3, date(2024, 1, 31))).unwrap();
        let dates: Vec<NaiveDate> = schedule.iter().map(|i| i.data_vencimento).collect();
        assert_eq!(dates, vec![date(2024, 1, 31), date(2024, 2, 29), date(2024, 3, 31)]);
    }

    #[test]
    fn installment_count_is_bounded() {
        let build = |parcelas| {
            NewContract::try_new(
                ClientId::new(1).unwrap(),
                LotId::new(1).unwrap(),
                60_000.0,
                0.0,
                parcelas,
                date(2024, 1, 10),
                IndexName::new("IPCA").unwrap(),
                Label::new("ativo").unwrap(),
            )
        };
        assert!(build(0).is_err());
        assert!(build(MAX_INSTALLMENTS + 1).is_err());
        let longest = build(MAX_INSTALLMENTS).unwrap();
        assert_eq!(
            build_installment_schedule(&longest).unwrap().len(),
            MAX_INSTALLMENTS as usize
        );
    }

    #[test]
    fn down_payment_cannot_exceed_total() {
        let result = NewContract::try_new(
            ClientId::new(1).unwrap(),
            LotId::new(1).unwrap(),
            100.0,
            150.0,
            1,
            date(2024, 1, 1),
            IndexName::new("IGP-M").unwrap(),
            Label::new("ativo").unwrap(),
        );
        assert!(matches!(result, Err(TypeConstraintError::InvalidValue(_))));
    }
}
