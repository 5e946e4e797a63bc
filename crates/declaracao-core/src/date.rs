//! Long-form date rendering (`5 de março de 2024`)

use chrono::Local;

/// Month names, January first
const MONTHS: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

/// Render a `DD/MM/AAAA` date as `<day> de <month> de <year>`
///
/// Input that does not split into exactly three slash-separated parts, or
/// whose month is not one of `01` to `12`, is returned unchanged. The day
/// loses its leading zeros; no calendar validation is done.
pub fn format_long_date(input: &str) -> String {
    let parts: Vec<&str> = input.split('/').collect();
    let [day, month, year] = parts.as_slice() else {
        return input.to_string();
    };
    let Some(month_name) = month_name(month) else {
        return input.to_string();
    };
    format!("{} de {} de {}", display_day(day), month_name, year)
}

/// Today's date as `DD/MM/AAAA`, the form's default
pub fn today() -> String {
    Local::now().format("%d/%m/%Y").to_string()
}

fn month_name(month: &str) -> Option<&'static str> {
    if month.len() != 2 || !is_number(month) {
        return None;
    }
    let index: usize = month.parse().ok()?;
    MONTHS.get(index.checked_sub(1)?).copied()
}

fn display_day(day: &str) -> &str {
    if !is_number(day) {
        return day;
    }
    match day.trim_start_matches('0') {
        "" => "0",
        trimmed => trimmed,
    }
}

fn is_number(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
