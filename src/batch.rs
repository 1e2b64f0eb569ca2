/*============================================================
  Synavera Project: Syn-Compat
  Module: syncompat_core::batch
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Fan installed apps out to the resolver concurrently, fan
    the verdicts back in, and propagate premium suite verdicts
    to the suite's bundled sub-apps.

  Security / Safety Notes:
    No I/O; operates on a snapshot fetched beforehand.

  Dependencies:
    tokio for task-per-app scheduling.

  Operational Scope:
    Runs once per invocation over every selected app.

  Revision History:
    2026-09-14 COD  Authored batch runner.
  ------------------------------------------------------------
  SSE Principles Observed:
    - A failed task only affects its own app's verdict
    - Single collector; workers never share mutable state
============================================================*/

use std::sync::Arc;

use crate::app_info::{AppVerdict, InstalledApp};
use crate::catalog::Snapshot;
use crate::classify::{Category, Classifier, Suite};
use crate::resolver::{resolve, ResolveOptions};

/// One resolved app.
#[derive(Debug, Clone)]
pub struct BatchEntry {
    pub app: InstalledApp,
    pub category: Category,
    pub verdict: AppVerdict,
}

/// Resolves a batch of apps against one shared snapshot.
pub struct BatchRunner {
    classifier: Arc<Classifier>,
    options: Arc<ResolveOptions>,
}

impl BatchRunner {
    pub fn new(classifier: Classifier, options: ResolveOptions) -> Self {
        Self {
            classifier: Arc::new(classifier),
            options: Arc::new(options),
        }
    }

    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }

    /// Resolve every app concurrently. Results keep the input order.
    pub async fn run_batch(
        &self,
        apps: Vec<InstalledApp>,
        snapshot: Arc<Snapshot>,
    ) -> Vec<BatchEntry> {
        let mut tasks = Vec::with_capacity(apps.len());
        for app in apps {
            let category = self.classifier.classify(&app.title);
            let snapshot = snapshot.clone();
            let options = self.options.clone();
            let record = app.clone();
            let task =
                tokio::spawn(async move { resolve(&record, category, &snapshot, &options) });
            tasks.push((app, category, task));
        }

        let mut entries = Vec::with_capacity(tasks.len());
        for (app, category, task) in tasks {
            let verdict = match task.await {
                Ok(verdict) => verdict,
                Err(err) => self.task_failure(category, &err.to_string()),
            };
            entries.push(BatchEntry {
                app,
                category,
                verdict,
            });
        }

        propagate_suite_verdicts(&mut entries, &self.classifier);
        entries
    }

    fn task_failure(&self, category: Category, reason: &str) -> AppVerdict {
        let verdict = AppVerdict::undecided(format!("Resolution failed: {reason}")).with_note(
            format!("Please report this: {}", self.options.support_url),
        );
        match category {
            Category::Premium(_) => verdict.premium(),
            Category::BaseApp => verdict.baseapp(),
            Category::Internal | Category::Regular => verdict,
        }
    }
}

/// Replace each suite member's verdict with the verdict of the suite's
/// anchor app. Members keep their own verdict when the anchor is absent.
pub fn propagate_suite_verdicts(entries: &mut [BatchEntry], classifier: &Classifier) {
    for suite in Suite::ALL {
        let anchor = classifier.anchor(suite);
        let Some(suite_verdict) = entries
            .iter()
            .find(|entry| entry.app.title == anchor)
            .map(|entry| entry.verdict.clone())
        else {
            continue;
        };

        for entry in entries
            .iter_mut()
            .filter(|entry| entry.category == Category::Premium(suite) && entry.app.title != anchor)
        {
            entry.verdict = suite_verdict.clone();
        }
    }
}
