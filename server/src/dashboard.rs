//! The applications table's in-browser behavior: search, filters, page
//! windowing, stat tiles and CSV export, computed over an
//! already-fetched result set behind a pageable seam.

use serde::Serialize;

use crate::application::{ApplicationView, Status};

const CSV_HEADERS: [&str; 10] = [
    "Reference ID",
    "Full Name",
    "Phone",
    "Email",
    "Date of Birth",
    "Gender",
    "LGA",
    "Branches",
    "Status",
    "Submitted On",
];

/// The table's search box and dropdown filters. `None` means "all".
#[derive(Clone, Debug, Default)]
pub struct ApplicationFilter {
    pub search: Option<String>,
    pub status: Option<Status>,
    pub lga: Option<String>,
    pub branch: Option<String>,
}

impl ApplicationFilter {
    /// Free-text search is case-insensitive over name, email and
    /// reference ID, and a plain substring match over the phone digits;
    /// the dropdowns match exactly.
    pub fn matches(&self, application: &ApplicationView) -> bool {
        if let Some(ref term) = self.search {
            let lowered = term.to_lowercase();

            let hit = application.full_name.to_lowercase().contains(&lowered)
                || application.phone.contains(term.as_str())
                || application.email.to_lowercase().contains(&lowered)
                || application.reference_id.to_lowercase().contains(&lowered);

            if !hit {
                return false;
            }
        }

        if let Some(status) = self.status {
            if application.status != status {
                return false;
            }
        }

        if let Some(ref lga) = self.lga {
            if &application.lga != lga {
                return false;
            }
        }

        if let Some(ref branch) = self.branch {
            if !application.branches.contains(branch.as_str()) {
                return false;
            }
        }

        true
    }

    pub fn apply(&self, applications: Vec<ApplicationView>) -> Vec<ApplicationView> {
        applications
            .into_iter()
            .filter(|application| self.matches(application))
            .collect()
    }
}

/// One window of a filtered table.
#[derive(Debug)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub page: usize,
    pub total_pages: usize,
}

/// Windows `items` into fixed-size pages. `page` is 1-based; a page past
/// the end yields an empty window rather than an error.
pub fn paginate<T>(items: &[T], page: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let page = page.max(1);

    let total_pages = (items.len() + per_page - 1) / per_page;
    let start = (page - 1).saturating_mul(per_page).min(items.len());
    let end = (start + per_page).min(items.len());

    Page {
        items: &items[start..end],
        page,
        total_pages,
    }
}

/// The stat-tile numbers above the table.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct StatusCounts {
    pub total: usize,

    #[serde(rename = "NEW")]
    pub new: usize,

    #[serde(rename = "REVIEWING")]
    pub reviewing: usize,

    #[serde(rename = "SHORTLISTED")]
    pub shortlisted: usize,

    #[serde(rename = "CONTACTED")]
    pub contacted: usize,

    #[serde(rename = "REJECTED")]
    pub rejected: usize,
}

pub fn status_counts(applications: &[ApplicationView]) -> StatusCounts {
    let mut counts = StatusCounts::default();

    for application in applications {
        counts.total += 1;

        match application.status {
            Status::New => counts.new += 1,
            Status::Reviewing => counts.reviewing += 1,
            Status::Shortlisted => counts.shortlisted += 1,
            Status::Contacted => counts.contacted += 1,
            Status::Rejected => counts.rejected += 1,
        }
    }

    counts
}

/// Renders the export-button output: a header row, then one line per
/// application. The free-text columns are quoted since they may contain
/// commas.
pub fn to_csv(applications: &[ApplicationView]) -> String {
    let mut lines = vec![CSV_HEADERS.join(",")];

    for application in applications {
        lines.push(
            [
                application.reference_id.clone(),
                quoted(&application.full_name),
                application.phone.clone(),
                application.email.clone(),
                application.date_of_birth.clone(),
                application.gender.as_str().to_owned(),
                application.lga.clone(),
                quoted(&application.branches),
                application.status.as_str().to_owned(),
                application.created_at.date().format("%Y-%m-%d"),
            ]
            .join(","),
        );
    }

    lines.join("\n")
}

fn quoted(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}
