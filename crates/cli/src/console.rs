use colored::Colorize;
use prettytable::{Cell, Row, Table, format};
use serde_json::Value;
use tam::Locale;

pub fn print_error_message(error_message: &str) {
    println!("{}", error_message.red());
}

pub fn print_warn_message(warn_message: &str) {
    println!("{}", warn_message.yellow());
}

pub fn print_success_message(success_message: &str) {
    println!("{}", success_message.green());
}

pub fn print_table<T: AsRef<str>>(
    headers: Vec<T>,
    rows: Vec<Vec<String>>,
    title: Option<&str>,
    footer: Option<&str>,
) {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);

    let header_cells =
        headers.into_iter().map(|h| Cell::new(h.as_ref()).style_spec("Fb")).collect();
    table.add_row(Row::new(header_cells));

    for row_data in rows {
        let cells = row_data.into_iter().map(|cell| Cell::new(cell.as_ref())).collect();
        table.add_row(Row::new(cells));
    }

    if let Some(title_text) = title {
        println!("\n{}", title_text);
    }

    table.printstd();

    if let Some(footer_text) = footer {
        println!("\n{}", footer_text);
    }
}

/// Renders a field that is either plain text or a `{"fa": .., "en": ..}` pair,
/// preferring `locale` and falling back to the other language.
pub fn display_text(value: &Value, locale: Locale) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(text) => text.clone(),
        Value::Object(map) => map
            .get(locale.as_header_value())
            .or_else(|| map.values().find(|v| v.is_string()))
            .and_then(Value::as_str)
            .unwrap_or("-")
            .to_string(),
        other => other.to_string(),
    }
}

pub fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(pretty) => println!("{}", pretty),
        Err(_) => println!("{}", value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_text_prefers_locale() {
        let name = json!({ "fa": "استقلال", "en": "Esteghlal" });

        assert_eq!(display_text(&name, Locale::En), "Esteghlal");
        assert_eq!(display_text(&name, Locale::Fa), "استقلال");
        assert_eq!(display_text(&json!({ "fa": "پرسپولیس" }), Locale::En), "پرسپولیس");
        assert_eq!(display_text(&json!("plain"), Locale::En), "plain");
        assert_eq!(display_text(&Value::Null, Locale::En), "-");
        assert_eq!(display_text(&json!(7), Locale::En), "7");
    }
}
