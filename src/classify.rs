/*============================================================
  Synavera Project: Syn-Compat
  Module: syncompat_core::classify
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Categorise installed apps into internal platform apps,
    base/template apps, premium suite members, or regular
    Splunkbase apps.

  Security / Safety Notes:
    Pure lookups over configuration-provided lists.

  Dependencies:
    None beyond std.

  Operational Scope:
    Consulted by the resolver for every app and by the batch
    runner when propagating suite verdicts.

  Revision History:
    2026-09-14 COD  Authored classifier.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Immutable classification data loaded at startup
    - Deterministic precedence between categories
============================================================*/

use std::collections::HashSet;

use crate::config::ClassificationConfig;

/// Category assigned to an installed app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Internal,
    BaseApp,
    Premium(Suite),
    Regular,
}

/// Premium suites whose compatibility comes from the documentation matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Suite {
    EnterpriseSecurity,
    ItServiceIntelligence,
}

impl Suite {
    pub const ALL: [Suite; 2] = [Suite::EnterpriseSecurity, Suite::ItServiceIntelligence];

    pub fn as_str(self) -> &'static str {
        match self {
            Suite::EnterpriseSecurity => "ES",
            Suite::ItServiceIntelligence => "ITSI",
        }
    }
}

/// Classifies app titles using the configured lists.
#[derive(Debug, Clone)]
pub struct Classifier {
    internal: HashSet<String>,
    base_suffixes: Vec<String>,
    security: HashSet<String>,
    it_service: HashSet<String>,
    security_anchor: String,
    it_anchor: String,
}

impl Classifier {
    pub fn new(config: &ClassificationConfig) -> Self {
        Self {
            internal: config.internal_apps.iter().cloned().collect(),
            base_suffixes: config
                .base_app_suffixes
                .iter()
                .filter(|suffix| !suffix.is_empty())
                .cloned()
                .collect(),
            security: config.security_suite_apps.iter().cloned().collect(),
            it_service: config.it_suite_apps.iter().cloned().collect(),
            security_anchor: config.security_suite_anchor.clone(),
            it_anchor: config.it_suite_anchor.clone(),
        }
    }

    /// Assign a category. Precedence: internal, base app, premium, regular.
    pub fn classify(&self, title: &str) -> Category {
        if self.internal.contains(title) {
            Category::Internal
        } else if self
            .base_suffixes
            .iter()
            .any(|suffix| title.ends_with(suffix.as_str()))
        {
            Category::BaseApp
        } else if self.security.contains(title) {
            Category::Premium(Suite::EnterpriseSecurity)
        } else if self.it_service.contains(title) {
            Category::Premium(Suite::ItServiceIntelligence)
        } else {
            Category::Regular
        }
    }

    /// Title of the app whose verdict stands for the whole suite.
    pub fn anchor(&self, suite: Suite) -> &str {
        match suite {
            Suite::EnterpriseSecurity => &self.security_anchor,
            Suite::ItServiceIntelligence => &self.it_anchor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> Classifier {
        Classifier::new(&ClassificationConfig::default())
    }

    #[test]
    fn internal_apps_match_exactly() {
        let classifier = classifier();
        assert_eq!(classifier.classify("search"), Category::Internal);
        assert_eq!(classifier.classify("search_extra"), Category::Regular);
    }

    #[test]
    fn base_apps_match_by_suffix() {
        let classifier = classifier();
        assert_eq!(classifier.classify("org_all_indexes"), Category::BaseApp);
        assert_eq!(
            classifier.classify("acme_site_n_indexer_base"),
            Category::BaseApp
        );
        assert_eq!(classifier.classify("all_indexes_old"), Category::Regular);
    }

    #[test]
    fn premium_suites_are_distinguished() {
        let classifier = classifier();
        assert_eq!(
            classifier.classify("SA-UEBA"),
            Category::Premium(Suite::EnterpriseSecurity)
        );
        assert_eq!(
            classifier.classify("SA-ITOA"),
            Category::Premium(Suite::ItServiceIntelligence)
        );
        assert_eq!(
            classifier.classify(classifier.anchor(Suite::EnterpriseSecurity)),
            Category::Premium(Suite::EnterpriseSecurity)
        );
    }

    #[test]
    fn internal_takes_precedence_over_other_lists() {
        let config = ClassificationConfig {
            internal_apps: vec!["SA-Utils".into()],
            ..ClassificationConfig::default()
        };
        let classifier = Classifier::new(&config);
        assert_eq!(classifier.classify("SA-Utils"), Category::Internal);
    }

    #[test]
    fn empty_suffix_never_matches_everything() {
        let config = ClassificationConfig {
            base_app_suffixes: vec![String::new()],
            ..ClassificationConfig::default()
        };
        let classifier = Classifier::new(&config);
        assert_eq!(classifier.classify("Splunk_TA_nix"), Category::Regular);
    }
}
