use std::fmt::Display;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{BlockName, LotId, LotNumber};

/// Sale state of a lot.
///
/// Statuses written by other tools are preserved verbatim in `Other`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum LotStatus {
    Available,
    Reserved,
    Sold,
    Other(String),
}

impl LotStatus {
    /// The three statuses tracked by the dashboard.
    pub const TRACKED: [LotStatus; 3] = [LotStatus::Available, LotStatus::Reserved, LotStatus::Sold];

    pub fn as_str(&self) -> &str {
        match self {
            LotStatus::Available => "disponivel",
            LotStatus::Reserved => "reservado",
            LotStatus::Sold => "vendido",
            LotStatus::Other(s) => s,
        }
    }
}

impl Display for LotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for LotStatus {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "disponivel" | "disponível" | "available" => LotStatus::Available,
            "reservado" | "reserved" => LotStatus::Reserved,
            "vendido" | "sold" => LotStatus::Sold,
            _ => LotStatus::Other(s.to_string()),
        }
    }
}

impl From<String> for LotStatus {
    fn from(s: String) -> Self {
        s.as_str().into()
    }
}

impl From<LotStatus> for String {
    fn from(status: LotStatus) -> Self {
        status.as_str().to_string()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Lot {
    pub id: LotId,
    pub numero: LotNumber,
    pub quadra: BlockName,
    pub area: f64,
    pub valor: f64,
    pub status: LotStatus,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewLot {
    pub numero: LotNumber,
    pub quadra: BlockName,
    pub area: f64,
    pub valor: f64,
    pub status: LotStatus,
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct UpdateLot {
    pub numero: Option<LotNumber>,
    pub quadra: Option<BlockName>,
    pub area: Option<f64>,
    pub valor: Option<f64>,
    pub status: Option<LotStatus>,
}

impl UpdateLot {
    pub fn is_empty(&self) -> bool {
        self == &UpdateLot::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_statuses_and_aliases() {
        assert_eq!(LotStatus::from("disponivel"), LotStatus::Available);
        assert_eq!(LotStatus::from("Disponível"), LotStatus::Available);
        assert_eq!(LotStatus::from("sold"), LotStatus::Sold);
        assert_eq!(LotStatus::from("reservado"), LotStatus::Reserved);
    }

    #[test]
    fn keeps_unknown_status_verbatim() {
        let status = LotStatus::from("em_obra");
        assert_eq!(status, LotStatus::Other("em_obra".to_string()));
        assert_eq!(status.to_string(), "em_obra");
    }
}
