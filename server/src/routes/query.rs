use serde::Deserialize;

/// Query parameters for the admissions lookup.
#[derive(Debug, Default, Deserialize)]
pub struct AdmissionsQuery {
    #[serde(rename = "listType")]
    pub list_type: Option<String>,

    pub search: Option<String>,

    pub limit: Option<i64>,
}

/// Query parameters for the dashboard export.
#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub lga: Option<String>,
    pub branch: Option<String>,
}
