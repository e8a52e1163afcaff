use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;
use crate::models::CellValue;

/// Normalize label text for header comparison
///
/// Lowercases, turns non-breaking spaces into spaces, collapses whitespace,
/// strips accents and drops a trailing colon.
#[must_use]
pub fn normalize_label(text: &str) -> String {
    let lowered = text.replace('\u{a0}', " ").to_lowercase();
    let collapsed = lowered.split_whitespace().collect::<Vec<_>>().join(" ");
    let stripped: String = collapsed.nfkd().filter(|c| !is_combining_mark(*c)).collect();
    stripped.trim_end_matches(':').trim_end().to_string()
}

/// Normalized text of a cell, empty for blank cells
#[must_use]
pub fn normalize_cell(cell: &CellValue) -> String {
    cell.as_text().map(|t| normalize_label(&t)).unwrap_or_default()
}

/// Parse a km value, tolerating decimal commas and thousands spaces
#[must_use]
pub fn parse_km(cell: &CellValue) -> Option<f64> {
    match cell {
        CellValue::Number(v) if v.is_finite() => Some(*v),
        CellValue::Text(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| !c.is_whitespace())
                .map(|c| if c == ',' { '.' } else { c })
                .collect();
            cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_label() {
        assert_eq!(normalize_label("Numer pociągu"), "numer pociagu");
        assert_eq!(normalize_label("  ZE   STACJI: "), "ze stacji");
        assert_eq!(normalize_label("Kilometraż"), "kilometraz");
        assert_eq!(normalize_label("do\u{a0}stacji"), "do stacji");
        assert_eq!(normalize_label(""), "");
    }

    #[test]
    fn test_parse_km() {
        assert_eq!(parse_km(&CellValue::Number(12.5)), Some(12.5));
        assert_eq!(parse_km(&CellValue::Text("12,345".to_string())), Some(12.345));
        assert_eq!(parse_km(&CellValue::Text("1 204.5".to_string())), Some(1204.5));
        assert_eq!(parse_km(&CellValue::Text("ok. 5".to_string())), None);
        assert_eq!(parse_km(&CellValue::Text("inf".to_string())), None);
        assert_eq!(parse_km(&CellValue::Empty), None);
        assert_eq!(parse_km(&CellValue::Number(f64::NAN)), None);
    }
}
