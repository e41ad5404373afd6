//! The fixed option lists offered by the registration form. These mirror
//! the published recruitment material and change only with a new release.

/// A selectable military branch: the stored value and its display label.
#[derive(Clone, Copy, Debug)]
pub struct Branch {
    pub value: &'static str,
    pub label: &'static str,
}

pub const LAGOS_LGAS: [&str; 20] = [
    "Agege",
    "Ajeromi-Ifelodun",
    "Alimosho",
    "Amuwo-Odofin",
    "Apapa",
    "Badagry",
    "Epe",
    "Eti-Osa",
    "Ibeju-Lekki",
    "Ifako-Ijaiye",
    "Ikeja",
    "Ikorodu",
    "Kosofe",
    "Lagos Island",
    "Lagos Mainland",
    "Mushin",
    "Ojo",
    "Oshodi-Isolo",
    "Shomolu",
    "Surulere",
];

pub const MILITARY_BRANCHES: [Branch; 6] = [
    Branch {
        value: "army",
        label: "Nigerian Army",
    },
    Branch {
        value: "navy",
        label: "Nigerian Navy",
    },
    Branch {
        value: "airforce",
        label: "Nigerian Air Force",
    },
    Branch {
        value: "defence_intelligence",
        label: "Defence Intelligence Agency",
    },
    Branch {
        value: "cyber",
        label: "Cyber Defence",
    },
    Branch {
        value: "support",
        label: "Support Roles",
    },
];

pub const SKILL_OPTIONS: [&str; 12] = [
    "IT/Computer Science",
    "Cybersecurity",
    "Mechanical Engineering",
    "Electrical Engineering",
    "Medical/Healthcare",
    "Logistics",
    "Communications",
    "Intelligence Analysis",
    "Languages",
    "Aviation",
    "Maritime",
    "Administration",
];

pub const QUALIFICATIONS: [&str; 8] = [
    "WAEC/NECO",
    "GCE",
    "Trade Test",
    "OND",
    "HND",
    "BSc/BA",
    "MSc/MA",
    "Professional Certification",
];

pub fn is_lga(value: &str) -> bool {
    LAGOS_LGAS.contains(&value)
}

pub fn is_branch(value: &str) -> bool {
    MILITARY_BRANCHES.iter().any(|branch| branch.value == value)
}

pub fn is_skill(value: &str) -> bool {
    SKILL_OPTIONS.contains(&value)
}

pub fn is_qualification(value: &str) -> bool {
    QUALIFICATIONS.contains(&value)
}

/// Returns the display label for a stored branch value, if known.
pub fn branch_label(value: &str) -> Option<&'static str> {
    MILITARY_BRANCHES
        .iter()
        .find(|branch| branch.value == value)
        .map(|branch| branch.label)
}
