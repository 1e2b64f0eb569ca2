/*============================================================
  Synavera Project: Syn-Compat
  Module: syncompat_core::docs
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Parse Splunk documentation pages: the premium app
    compatibility matrix (ES / ITSI tables) and the list of
    published platform versions.

  Security / Safety Notes:
    Operates on fetched HTML only; nothing is executed and no
    markup is echoed back to operators.

  Dependencies:
    scraper for structured HTML traversal.

  Operational Scope:
    Called by the catalog client after fetching documentation
    pages; kept free of I/O so parsing can be tested offline.

  Revision History:
    2026-09-14 COD  Authored matrix and version list parsers.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Explicit validation rules for every accepted cell
    - Malformed rows are skipped, never guessed at
============================================================*/

use std::collections::BTreeMap;

use scraper::{ElementRef, Html, Selector};

use crate::classify::Suite;
use crate::error::{Result, SyncompatError};
use crate::version::{has_precision, Version};

/// Matrix rows keyed by three-component platform version.
pub type PremiumMatrix = BTreeMap<String, PremiumCompatibilityRow>;

/// Longest accepted version token (exclusive).
const MAX_TOKEN_LEN: usize = 10;

/// One row of the premium compatibility matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PremiumCompatibilityRow {
    pub platform_version: String,
    pub security: Vec<String>,
    pub it_service: Vec<String>,
    pub work: Option<Vec<String>>,
}

impl PremiumCompatibilityRow {
    /// Compatible versions for the given suite.
    pub fn versions_for(&self, suite: Suite) -> &[String] {
        match suite {
            Suite::EnterpriseSecurity => &self.security,
            Suite::ItServiceIntelligence => &self.it_service,
        }
    }
}

/// Parse every `<table>` body in `html` into matrix rows.
///
/// Only rows with exactly three or four `<td>` cells whose first cell is a
/// strict `X.Y.Z` version are kept. Later rows for the same platform
/// version replace earlier ones.
pub fn parse_premium_matrix(html: &str) -> Result<PremiumMatrix> {
    let document = Html::parse_document(html);
    let row_selector = selector("table tbody tr")?;

    let mut matrix = PremiumMatrix::new();
    for row in document.select(&row_selector) {
        let cells: Vec<ElementRef> = row
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|cell| cell.value().name() == "td")
            .collect();
        if cells.len() != 3 && cells.len() != 4 {
            continue;
        }

        let platform_version = cell_text(&cells[0]);
        if !has_precision(&platform_version, 3) {
            continue;
        }

        let row = PremiumCompatibilityRow {
            security: version_tokens(&cells[1]),
            it_service: version_tokens(&cells[2]),
            work: cells.get(3).map(version_tokens),
            platform_version: platform_version.clone(),
        };
        matrix.insert(platform_version, row);
    }
    Ok(matrix)
}

/// Extract published platform versions from `<option value="X.Y.Z">`
/// entries, newest first and without duplicates.
pub fn parse_platform_versions(html: &str) -> Result<Vec<String>> {
    let document = Html::parse_document(html);
    let option_selector = selector("option[value]")?;

    let mut versions: Vec<Version> = document
        .select(&option_selector)
        .filter_map(|option| option.value().attr("value"))
        .filter(|value| has_precision(value, 3))
        .filter_map(Version::parse)
        .collect();
    versions.sort_by(|a, b| b.cmp(a));
    versions.dedup();
    Ok(versions.iter().map(Version::to_string).collect())
}

/// Accept a token only when it looks like `X.Y.Z` and is short; cells carry
/// footnotes and prose alongside the versions.
pub fn is_version_token(token: &str) -> bool {
    token.matches('.').count() == 2 && token.len() < MAX_TOKEN_LEN
}

fn version_tokens(cell: &ElementRef) -> Vec<String> {
    cell.text()
        .flat_map(|chunk| chunk.split(['\n', ',']))
        .map(str::trim)
        .filter(|token| !token.is_empty() && is_version_token(token))
        .map(str::to_string)
        .collect()
}

fn cell_text(cell: &ElementRef) -> String {
    cell.text().collect::<String>().trim().to_string()
}

fn selector(raw: &str) -> Result<Selector> {
    Selector::parse(raw)
        .map_err(|err| SyncompatError::Serialization(format!("Invalid selector `{raw}`: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MATRIX: &str = r#"
        <html><body>
        <table>
          <thead><tr><th>Splunk</th><th>ES</th><th>ITSI</th></tr></thead>
          <tbody>
            <tr><td>9.0.0</td><td>7.1.0, 7.2.0</td><td>4.10.0</td></tr>
            <tr><td>9.1.0</td><td>7.3.0</td><td>4.11.0, 4.12.0</td></tr>
          </tbody>
        </table>
        <table>
          <tbody>
            <tr><td>9.2.0</td><td>7.3.0<br>7.3.1<br>see note 2</td><td>4.17.x</td><td>1.2.0</td></tr>
            <tr><td>Footnotes</td><td>a</td><td>b</td></tr>
            <tr><td>9.3.0</td><td>8.0.0</td><td>4.18.0</td></tr>
            <tr><td>9.4.0</td><td>8.1.0</td></tr>
          </tbody>
        </table>
        </body></html>
    "#;

    #[test]
    fn parses_three_column_rows() {
        let matrix = parse_premium_matrix(MATRIX).unwrap();
        let row = &matrix["9.1.0"];
        assert_eq!(
            row.versions_for(Suite::ItServiceIntelligence),
            ["4.11.0", "4.12.0"]
        );
        assert_eq!(matrix["9.0.0"].security, vec!["7.1.0", "7.2.0"]);
        assert_eq!(row.work, None);
    }

    #[test]
    fn four_column_rows_carry_work_versions() {
        let matrix = parse_premium_matrix(MATRIX).unwrap();
        let row = &matrix["9.2.0"];
        assert_eq!(row.security, vec!["7.3.0", "7.3.1"]);
        assert_eq!(row.it_service, vec!["4.17.x"]);
        assert_eq!(row.work, Some(vec!["1.2.0".to_string()]));
    }

    #[test]
    fn malformed_rows_are_skipped_individually() {
        let matrix = parse_premium_matrix(MATRIX).unwrap();
        assert!(!matrix.contains_key("Footnotes"));
        assert!(matrix.contains_key("9.3.0"));
        assert!(!matrix.contains_key("9.4.0"));
        assert_eq!(matrix.len(), 4);
    }

    #[test]
    fn token_filter_rejects_prose_and_long_tokens() {
        assert!(is_version_token("7.3.0"));
        assert!(!is_version_token("7.3"));
        assert!(!is_version_token("10.100.1000"));
        assert!(!is_version_token("see note"));
    }

    #[test]
    fn page_without_tables_is_empty() {
        let matrix = parse_premium_matrix("<html><body><p>moved</p></body></html>").unwrap();
        assert!(matrix.is_empty());
    }

    #[test]
    fn platform_versions_are_sorted_newest_first() {
        let html = r#"
            <select>
              <option value="8.2.12">8.2.12</option>
              <option value="9.1.2">9.1.2</option>
              <option value="9.1.2">9.1.2</option>
              <option value="latest">latest</option>
              <option value="9.10.0">9.10.0</option>
            </select>
        "#;
        assert_eq!(
            parse_platform_versions(html).unwrap(),
            vec!["9.10.0", "9.1.2", "8.2.12"]
        );
    }
}
