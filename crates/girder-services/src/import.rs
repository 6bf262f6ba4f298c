//! Bulk worker import from CSV.
//!
//! The template and the parser share one fixed header. Parsing is
//! per-row fail-soft: a bad row carries its first validation error and is
//! skipped at insert time, it never aborts the rest of the file.

use girder_db::NewWorker;
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

const HEADER: &str = "Name*,Trade/Skill,Daily Rate,Contractor,Phone";

/// Downloadable template. The BOM keeps spreadsheet apps from mangling the
/// header on re-save.
pub fn worker_import_template() -> String {
    format!("\u{feff}{HEADER}\nRavi Kumar,Mason,800,,9876543210\n")
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ParsedWorkerRow {
    /// 1-based line number in the uploaded file, header included.
    pub line: usize,
    pub name: String,
    pub trade: Option<String>,
    pub daily_rate: Option<Decimal>,
    pub contractor: Option<String>,
    pub phone: Option<String>,
    /// First validation error for the row; `None` means importable.
    pub error: Option<String>,
}

impl ParsedWorkerRow {
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    pub fn into_new_worker(self) -> NewWorker {
        NewWorker {
            name: self.name,
            trade: self.trade,
            daily_rate: self.daily_rate,
            contractor: self.contractor,
            phone: self.phone,
        }
    }
}

/// Parse an uploaded CSV into per-row results. Blank lines are skipped; the
/// header row is consumed without validation so re-uploads of the template
/// work unchanged.
pub fn parse_worker_import(content: &str) -> Vec<ParsedWorkerRow> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let mut rows = Vec::new();
    for (index, line) in content.lines().enumerate() {
        if index == 0 || line.trim().is_empty() {
            continue;
        }
        rows.push(parse_row(index + 1, line));
    }
    rows
}

fn parse_row(line_number: usize, line: &str) -> ParsedWorkerRow {
    let fields = split_csv_line(line);
    let field = |i: usize| fields.get(i).map(|s| s.trim()).unwrap_or("");
    let optional = |i: usize| {
        let value = field(i);
        (!value.is_empty()).then(|| value.to_string())
    };

    let name = field(0).to_string();
    let mut error = None;
    if name.is_empty() {
        error = Some("Name is required".to_string());
    }

    let rate_field = field(2);
    let daily_rate = if rate_field.is_empty() {
        None
    } else {
        match rate_field.parse::<Decimal>() {
            Ok(rate) if rate >= Decimal::ZERO => Some(rate),
            _ => {
                if error.is_none() {
                    error = Some("Daily rate must be a non-negative number".to_string());
                }
                None
            }
        }
    };

    ParsedWorkerRow {
        line: line_number,
        name,
        trade: optional(1),
        daily_rate,
        contractor: optional(3),
        phone: optional(4),
        error,
    }
}

/// Minimal quoted-field CSV split: commas inside double quotes are literal,
/// doubled quotes inside a quoted field escape a quote.
fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_has_bom_and_fixed_header() {
        let template = worker_import_template();
        assert!(template.starts_with('\u{feff}'));
        assert!(template.contains("Name*,Trade/Skill,Daily Rate,Contractor,Phone"));
    }

    #[test]
    fn valid_and_invalid_rows_parse_independently() {
        let csv = "Name*,Trade/Skill,Daily Rate,Contractor,Phone\n\
                   Ravi Kumar,Mason,800,ABC Contractors,9876543210\n\
                   ,Electrician,600,,\n";
        let rows = parse_worker_import(csv);
        assert_eq!(rows.len(), 2);

        assert!(rows[0].is_valid());
        assert_eq!(rows[0].name, "Ravi Kumar");
        assert_eq!(rows[0].trade.as_deref(), Some("Mason"));
        assert_eq!(rows[0].daily_rate, Some(Decimal::from(800)));
        assert_eq!(rows[0].phone.as_deref(), Some("9876543210"));

        assert!(!rows[1].is_valid());
        assert_eq!(rows[1].error.as_deref(), Some("Name is required"));
    }

    #[test]
    fn template_reupload_parses_example_row() {
        let rows = parse_worker_import(&worker_import_template());
        assert_eq!(rows.len(), 1);
        assert!(rows[0].is_valid());
        assert_eq!(rows[0].name, "Ravi Kumar");
    }

    #[test]
    fn quoted_fields_keep_embedded_commas() {
        let csv = "header\n\"Kumar, Ravi\",Mason,800,\"ABC, Pvt Ltd\",\n";
        let rows = parse_worker_import(csv);
        assert_eq!(rows[0].name, "Kumar, Ravi");
        assert_eq!(rows[0].contractor.as_deref(), Some("ABC, Pvt Ltd"));
    }

    #[test]
    fn doubled_quotes_escape() {
        let csv = "header\n\"Ravi \"\"RK\"\" Kumar\",,,,\n";
        let rows = parse_worker_import(csv);
        assert_eq!(rows[0].name, "Ravi \"RK\" Kumar");
    }

    #[test]
    fn bad_rate_is_a_row_error_not_a_panic() {
        let csv = "header\nRavi,Mason,eight hundred,,\n";
        let rows = parse_worker_import(csv);
        assert!(!rows[0].is_valid());
        assert!(rows[0].error.as_deref().unwrap_or("").contains("Daily rate"));
    }

    #[test]
    fn short_rows_treat_missing_fields_as_empty() {
        let csv = "header\nRavi\n";
        let rows = parse_worker_import(csv);
        assert!(rows[0].is_valid());
        assert_eq!(rows[0].daily_rate, None);
    }

    #[test]
    fn blank_lines_are_skipped() {
        let csv = "header\n\nRavi,,,,\n\n";
        let rows = parse_worker_import(csv);
        assert_eq!(rows.len(), 1);
    }
}
