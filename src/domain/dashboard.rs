//! Dashboard totals read from the store and the summary derived from them.

use serde::{Deserialize, Serialize};

/// Raw counts and sums read from the store for the dashboard.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DashboardTotals {
    pub total_clientes: i64,
    pub total_contratos: i64,
    pub total_lotes: i64,
    pub lotes_disponiveis: i64,
    pub lotes_reservados: i64,
    pub lotes_vendidos: i64,
    /// `None` when the store has no contracts to sum.
    pub soma_contratos: Option<f64>,
    pub clientes_inadimplentes: i64,
    pub soma_em_aberto: Option<f64>,
}

/// Portfolio-wide figures shown on the dashboard.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_clientes: i64,
    pub total_contratos: i64,
    pub total_lotes: i64,
    pub lotes_disponiveis: i64,
    pub lotes_reservados: i64,
    pub lotes_vendidos: i64,
    pub valor_total_contratos: f64,
    pub valor_medio_contratos: f64,
    pub clientes_inadimplentes: i64,
    pub valor_em_aberto_total: f64,
}

impl From<DashboardTotals> for DashboardSummary {
    fn from(totals: DashboardTotals) -> Self {
        let valor_total_contratos = totals.soma_contratos.unwrap_or(0.0);
        let valor_medio_contratos = if totals.total_contratos > 0 {
            valor_total_contratos / totals.total_contratos as f64
        } else {
            0.0
        };
        Self {
            total_clientes: totals.total_clientes,
            total_contratos: totals.total_contratos,
            total_lotes: totals.total_lotes,
            lotes_disponiveis: totals.lotes_disponiveis,
            lotes_reservados: totals.lotes_reservados,
            lotes_vendidos: totals.lotes_vendidos,
            valor_total_contratos,
            valor_medio_contratos,
            clientes_inadimplentes: totals.clientes_inadimplentes,
            valor_em_aberto_total: totals.soma_em_aberto.unwrap_or(0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_yields_zeroes() {
        let summary = DashboardSummary::from(DashboardTotals::default());
        assert_eq!(summary, DashboardSummary::default());
        assert_eq!(summary.valor_medio_contratos, 0.0);
    }

    #[test]
    fn average_divides_sum_by_contract_count() {
        let summary = DashboardSummary::from(DashboardTotals {
            total_contratos: 4,
            soma_contratos: Some(200_000.0),
            ..Default::default()
        });
        assert_eq!(summary.valor_total_contratos, 200_000.0);
        assert_eq!(summary.valor_medio_contratos, 50_000.0);
    }

    #[test]
    fn missing_sum_counts_as_zero() {
        let summary = DashboardSummary::from(DashboardTotals {
            total_contratos: 2,
            soma_contratos: None,
            ..Default::default()
        });
        assert_eq!(summary.valor_total_contratos, 0.0);
        assert_eq!(summary.valor_medio_contratos, 0.0);
    }
}
