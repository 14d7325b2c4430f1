use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)Name:\s*(?P<name>.+?)(?:\s+e-Postmark|$)").unwrap());
static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Fiscal Year (?:Begin|End) Date:\s*\d{2}/\d{2}/(?P<year>20\d{2})").unwrap()
});

/// Suffix appended to every output filename.
pub const OUTPUT_SUFFIX: &str = "RHR";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    ClientName,
    FiscalYear,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::ClientName => write!(f, "client name"),
            Field::FiscalYear => write!(f, "fiscal year"),
        }
    }
}

/// A mandatory field is absent from the section's first page. Always fatal
/// for the whole run.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{0} not found")]
pub struct MissingField(pub Field);

/// The two fields every section must carry on its first page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionMeta {
    pub client_name: String,
    pub fiscal_year: String,
}

/// Value after the `Name:` label, up to the e-Postmark stamp, end of line,
/// or end of text, trimmed.
pub fn find_name(text: &str) -> Option<String> {
    NAME_RE
        .captures(text)
        .map(|c| c["name"].trim().to_string())
        .filter(|n| !n.is_empty())
}

/// Four-digit year from a "Fiscal Year Begin/End Date: MM/DD/YYYY" label,
/// label case-insensitive, 20xx years only.
pub fn find_year(text: &str) -> Option<String> {
    YEAR_RE.captures(text).map(|c| c["year"].to_string())
}

/// Extract both mandatory fields from a section's first page.
pub fn extract(first_page_text: &str) -> Result<SectionMeta, MissingField> {
    let client_name = find_name(first_page_text).ok_or(MissingField(Field::ClientName))?;
    let fiscal_year = find_year(first_page_text).ok_or(MissingField(Field::FiscalYear))?;
    Ok(SectionMeta {
        client_name,
        fiscal_year,
    })
}

/// Output filename stem: `{client_name}_{fiscal_year}_RHR`, with characters
/// the filesystem rejects mapped to `_`.
pub fn output_stem(meta: &SectionMeta) -> String {
    format!(
        "{}_{}_{}",
        sanitize(&meta.client_name),
        meta.fiscal_year,
        OUTPUT_SUFFIX
    )
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_stops_at_postmark() {
        let text = "Product: 990 Return Name: Jane Doe e-Postmark 01/02/2024";
        assert_eq!(find_name(text).as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn name_stops_at_end_of_line() {
        let text = "Name: Acme Charitable Trust\nFiscal Year End Date: 06/30/2023";
        assert_eq!(find_name(text).as_deref(), Some("Acme Charitable Trust"));
    }

    #[test]
    fn name_runs_to_end_of_text() {
        assert_eq!(find_name("Name: Jane Doe").as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn blank_name_is_missing() {
        assert_eq!(find_name("Name:   \nrest"), None);
        assert_eq!(find_name("no label here"), None);
    }

    #[test]
    fn year_from_begin_or_end_label() {
        assert_eq!(
            find_year("Fiscal Year Begin Date: 01/01/2022").as_deref(),
            Some("2022")
        );
        assert_eq!(
            find_year("Fiscal Year End Date: 12/31/2023").as_deref(),
            Some("2023")
        );
    }

    #[test]
    fn year_label_is_case_insensitive() {
        assert_eq!(
            find_year("FISCAL YEAR END DATE: 12/31/2045").as_deref(),
            Some("2045")
        );
    }

    #[test]
    fn year_outside_2000s_is_rejected() {
        assert_eq!(find_year("Fiscal Year End Date: 12/31/1999"), None);
        assert_eq!(find_year("Fiscal Year End Date: 12/31/2100"), None);
    }

    #[test]
    fn missing_fields_report_which_one() {
        let err = extract("Fiscal Year End Date: 12/31/2023").unwrap_err();
        assert_eq!(err, MissingField(Field::ClientName));

        let err = extract("Name: Jane Doe").unwrap_err();
        assert_eq!(err, MissingField(Field::FiscalYear));
    }

    #[test]
    fn extract_returns_both_fields() {
        let meta =
            extract("Product: x Name: Jane Doe e-Postmark Fiscal Year End Date: 12/31/2023")
                .unwrap();
        assert_eq!(meta.client_name, "Jane Doe");
        assert_eq!(meta.fiscal_year, "2023");
    }

    #[test]
    fn stem_sanitizes_path_characters() {
        let meta = SectionMeta {
            client_name: "A/B: C?".to_string(),
            fiscal_year: "2023".to_string(),
        };
        assert_eq!(output_stem(&meta), "A_B_ C__2023_RHR");
    }

    #[test]
    fn stem_keeps_clean_names() {
        let meta = SectionMeta {
            client_name: "Jane Doe".to_string(),
            fiscal_year: "2023".to_string(),
        };
        assert_eq!(output_stem(&meta), "Jane Doe_2023_RHR");
    }
}
