use serde::{Deserialize, Serialize};

/// Which published roster an admitted candidate appears on.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ListType {
    Main,
    Supplementary,
}

impl ListType {
    pub fn parse(value: &str) -> Option<ListType> {
        match value {
            "MAIN" => Some(ListType::Main),
            "SUPPLEMENTARY" => Some(ListType::Supplementary),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ListType::Main => "MAIN",
            ListType::Supplementary => "SUPPLEMENTARY",
        }
    }
}

/// One row of the externally sourced admission rosters. Immutable after
/// the one-time seed.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArmyAdmission {
    pub application_no: String,
    pub surname: String,
    pub first_name: String,
    pub other_name: Option<String>,
    pub list_type: ListType,
}

/// The lookup endpoint's filter: an optional roster restriction, an
/// optional substring search and a result cap.
#[derive(Clone, Debug)]
pub struct AdmissionFilter {
    pub list_type: Option<ListType>,
    pub search: Option<String>,
    pub limit: i64,
}
