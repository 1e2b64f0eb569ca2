/*============================================================
  Synavera Project: Syn-Compat
  Module: syncompat_core::resolver
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Decide whether one installed app is compatible with the
    target platform version and compute the best upgrade
    target when it is not.

  Security / Safety Notes:
    Pure computation over a fetched snapshot; no I/O.

  Dependencies:
    None beyond crate modules.

  Operational Scope:
    Invoked once per app by the batch runner.

  Revision History:
    2026-09-14 COD  Authored compatibility resolver.
    2026-10-02 COD  Rank abbreviated matrix tokens; premium
                    releases outside the matrix stay undecided.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Every outcome is a verdict; nothing here can fail
    - Closest valid upgrade preferred, newest always reported
    - Identical inputs always yield identical verdicts
============================================================*/

use std::cmp::Ordering;

use crate::app_info::{AppVerdict, InstalledApp};
use crate::catalog::{Catalog, CatalogEntry, Release, Snapshot};
use crate::classify::{Category, Suite};
use crate::docs::PremiumMatrix;
use crate::version::{compare_loose, matches_prefix, truncate, Version};

/// Product name Splunkbase uses for cloud compatibility.
pub const CLOUD_PRODUCT: &str = "Splunk Cloud";

/// Per-batch policy passed to every resolution.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    pub target_version: String,
    pub cloud_compatibility_required: bool,
    pub threat_baseapp_as_compatible: bool,
    pub matrix_url: String,
    pub support_url: String,
}

/// Resolve the verdict for `app`.
pub fn resolve(
    app: &InstalledApp,
    category: Category,
    snapshot: &Snapshot,
    options: &ResolveOptions,
) -> AppVerdict {
    match category {
        Category::Internal => {
            return AppVerdict::yes(
                "App is an internal app so it will be updated during platform upgrade.",
            )
        }
        Category::BaseApp => return resolve_base_app(options),
        Category::Premium(_) | Category::Regular => {}
    }

    let Some(installed) = app.installed_version() else {
        let verdict = AppVerdict::undecided(
            "No version information available. Therefore unable to check for updates.",
        );
        return match category {
            Category::Premium(_) => verdict.premium(),
            _ => verdict,
        };
    };

    match category {
        Category::Premium(suite) => {
            resolve_premium(installed, suite, &snapshot.matrix, options).premium()
        }
        _ => resolve_regular(app, installed, &snapshot.catalog, options),
    }
}

fn resolve_base_app(options: &ResolveOptions) -> AppVerdict {
    if options.threat_baseapp_as_compatible {
        AppVerdict::yes("This is a baseapp.").baseapp()
    } else {
        AppVerdict::no("This is a baseapp.")
            .with_note("Compatibility of base apps cannot be determined; review it manually.")
            .baseapp()
    }
}

fn resolve_premium(
    installed: &str,
    suite: Suite,
    matrix: &PremiumMatrix,
    options: &ResolveOptions,
) -> AppVerdict {
    let target = &options.target_version;
    let Some(row) = matrix.get(target) else {
        return AppVerdict::undecided(format!(
            "Wasn't able to find {target} within compatibility matrix: {}",
            options.matrix_url
        ))
        .with_note("please check manually.");
    };

    let mut candidates: Vec<&str> = row.versions_for(suite).iter().map(String::as_str).collect();
    candidates.sort_by(|a, b| compare_loose(b, a));
    candidates.dedup();

    if let Some(idx) = candidates
        .iter()
        .position(|candidate| matches_prefix(candidate, installed))
    {
        let verdict = AppVerdict::yes(format!("App ready for {target}"));
        return if idx > 0 {
            verdict.with_note(format!("could be updated to {}", candidates[0]))
        } else {
            verdict
        };
    }

    AppVerdict::undecided(format!(
        "Wasn't able to find {} version {installed} within compatibility matrix: {}",
        suite.as_str(),
        options.matrix_url
    ))
    .with_note("please check manually.")
}

/// Outcome of matching an installed app to a Splunkbase entry.
enum Lookup<'a> {
    Found(&'a CatalogEntry),
    NotFound,
    Ambiguous(usize),
}

fn find_entry<'a>(app: &InstalledApp, catalog: &'a Catalog) -> Lookup<'a> {
    let mut matches: Vec<&CatalogEntry> = if app.title.is_empty() {
        Vec::new()
    } else {
        catalog
            .values()
            .filter(|entry| entry.appid == app.title)
            .collect()
    };

    if matches.is_empty() {
        if let Some(label) = app.display_label() {
            matches = catalog
                .values()
                .filter(|entry| entry.title == label)
                .collect();
        }
    }

    match matches.len() {
        0 => Lookup::NotFound,
        1 => Lookup::Found(matches[0]),
        count => Lookup::Ambiguous(count),
    }
}

fn resolve_regular(
    app: &InstalledApp,
    installed: &str,
    catalog: &Catalog,
    options: &ResolveOptions,
) -> AppVerdict {
    // Splunkbase lists compatibility coarsely ("9.0", not "9.0.1").
    let platform = truncate(&options.target_version, 2);

    let entry = match find_entry(app, catalog) {
        Lookup::Found(entry) => entry,
        Lookup::NotFound => {
            return AppVerdict::undecided("Wasn't able to find the app on splunkbase.").with_note(
                format!(
                    "If you think that's a bug, open an issue: {}",
                    options.support_url
                ),
            )
        }
        Lookup::Ambiguous(count) => {
            return AppVerdict::undecided(format!(
                "Found {count} ambiguous matches on splunkbase."
            ))
            .with_note(format!(
                "That's definitely a bug, please open an issue: {}",
                options.support_url
            ))
        }
    };

    let partition = Partition::build(
        entry,
        installed,
        &platform,
        options.cloud_compatibility_required,
    );
    let newest = partition.higher.last();

    if partition.installed || !partition.lower.is_empty() {
        // An older compatible release implies the installed one is too.
        let verdict = AppVerdict::yes(format!("App ready for {platform}"));
        return match newest {
            Some(newest) => verdict.with_note(format!(
                "the most recent compatible version is {}",
                describe(newest)
            )),
            None => verdict,
        };
    }

    if let (Some(closest), Some(newest)) = (partition.higher.first(), newest) {
        let verdict = AppVerdict::no(format!(
            "App should be updated to at least {}",
            describe(closest)
        ));
        return if closest.title != newest.title {
            verdict.with_note(format!(
                "the most recent compatible version is {}",
                describe(newest)
            ))
        } else {
            verdict
        };
    }

    let scope = if options.cloud_compatibility_required {
        format!("{platform} ({CLOUD_PRODUCT})")
    } else {
        platform
    };
    AppVerdict::undecided(format!(
        "Wasn't able to find a suitable version of this app for {scope}."
    ))
}

/// Target-compatible releases split around the installed version.
struct Partition<'a> {
    installed: bool,
    lower: Vec<&'a Release>,
    /// Ascending by version.
    higher: Vec<&'a Release>,
}

impl<'a> Partition<'a> {
    fn build(
        entry: &'a CatalogEntry,
        installed: &str,
        platform: &str,
        cloud_required: bool,
    ) -> Self {
        let current = Version::parse(installed);
        let mut partition = Partition {
            installed: false,
            lower: Vec::new(),
            higher: Vec::new(),
        };
        let mut higher: Vec<(Version, &'a Release)> = Vec::new();

        for release in entry
            .releases
            .iter()
            .filter(|release| is_eligible(release, platform, cloud_required))
        {
            let title = release.title.trim();
            if title == installed {
                partition.installed = true;
                continue;
            }
            // Non-numeric release titles can only ever match exactly.
            let (Some(current), Some(candidate)) = (current.as_ref(), Version::parse(title)) else {
                continue;
            };
            match candidate.cmp(current) {
                Ordering::Less => partition.lower.push(release),
                Ordering::Equal => partition.installed = true,
                Ordering::Greater => higher.push((candidate, release)),
            }
        }

        higher.sort_by(|a, b| a.0.cmp(&b.0));
        partition.higher = higher.into_iter().map(|(_, release)| release).collect();
        partition
    }
}

fn is_eligible(release: &Release, platform: &str, cloud_required: bool) -> bool {
    let platform_ok = release
        .splunk_compatibility
        .iter()
        .any(|token| matches_prefix(token, platform));
    let product_ok = !cloud_required
        || release
            .product_compatibility
            .iter()
            .any(|product| product == CLOUD_PRODUCT);
    platform_ok && product_ok
}

fn describe(release: &Release) -> String {
    if release.path.is_empty() {
        release.title.clone()
    } else {
        format!("{} ({})", release.title, release.path)
    }
}
