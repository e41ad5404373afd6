use std::collections::HashMap;

use serde::Serialize;

/// A single configuration entry. Keys are unique by construction.
#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct SiteSetting {
    pub key: String,
    pub value: String,
}

/// Folds the stored settings into the flat key/value mapping the pages
/// consume.
pub fn fold(settings: Vec<SiteSetting>) -> HashMap<String, String> {
    settings
        .into_iter()
        .map(|setting| (setting.key, setting.value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{fold, SiteSetting};

    #[test]
    fn fold_produces_a_flat_mapping() {
        let folded = fold(vec![
            SiteSetting {
                key: "homepage_banner".to_owned(),
                value: "ATTENTION!".to_owned(),
            },
            SiteSetting {
                key: "recruitment_portal".to_owned(),
                value: "recruitment.army.mil.ng".to_owned(),
            },
        ]);

        assert_eq!(folded.len(), 2);
        assert_eq!(folded["homepage_banner"], "ATTENTION!");
        assert_eq!(folded["recruitment_portal"], "recruitment.army.mil.ng");
    }
}
