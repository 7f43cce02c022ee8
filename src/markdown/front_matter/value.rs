use serde_json::{Map, Number, Value};

/// Right-hand side of `key=...`.
pub(super) fn parse_assigned(raw: &str) -> Value {
    let raw = raw.trim();
    if let Some(inner) = quoted(raw, '"') {
        return Value::String(unescape(inner));
    }
    if is_enclosed(raw, '[', ']') {
        return parse_list(raw);
    }
    if is_enclosed(raw, '{', '}') {
        return parse_table(raw);
    }
    scalar(raw)
}

/// Right-hand side of `key: value`. Scalars stay strings with outer quotes removed.
pub(super) fn parse_colon(raw: &str) -> Value {
    let raw = raw.trim();
    if is_enclosed(raw, '[', ']') {
        return parse_list(raw);
    }
    if is_enclosed(raw, '{', '}') {
        return parse_table(raw);
    }
    Value::String(raw.trim_matches('"').to_string())
}

/// Renders a value in the `key=<value>` form.
pub(super) fn render(value: &Value) -> String {
    match value {
        Value::Null => "\"\"".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("\"{}\"", escape(s)),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(render).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Object(entries) => {
            let entries: Vec<String> = entries
                .iter()
                .map(|(k, v)| format!("\"{}\": {}", escape(k), render(v)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
    }
}

fn parse_list(raw: &str) -> Value {
    let mut items = Vec::new();
    for item in split_top_level(&raw[1..raw.len() - 1]) {
        let is_compound = quoted(item, '"').is_some()
            || quoted(item, '\'').is_some()
            || is_enclosed(item, '[', ']')
            || is_enclosed(item, '{', '}');

        // `[machine learning]` is read as two bare words
        if !is_compound && item.contains(char::is_whitespace) {
            items.extend(item.split_whitespace().map(scalar));
        } else {
            items.push(parse_item(item));
        }
    }
    Value::Array(items)
}

fn parse_table(raw: &str) -> Value {
    let mut table = Map::new();
    for entry in split_top_level(&raw[1..raw.len() - 1]) {
        let Some(split) = entry.find([':', '=']) else {
            continue;
        };
        let key = entry[..split].trim().trim_matches(['"', '\'']);
        if key.is_empty() {
            continue;
        }
        table.insert(key.to_string(), parse_item(entry[split + 1..].trim()));
    }
    Value::Object(table)
}

fn parse_item(item: &str) -> Value {
    if let Some(inner) = quoted(item, '"').or_else(|| quoted(item, '\'')) {
        return Value::String(unescape(inner));
    }
    if is_enclosed(item, '[', ']') {
        return parse_list(item);
    }
    if is_enclosed(item, '{', '}') {
        return parse_table(item);
    }
    scalar(item)
}

fn scalar(raw: &str) -> Value {
    match raw {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }
    if let Ok(n) = raw.parse::<i64>() {
        return Value::Number(n.into());
    }
    if let Some(n) = raw.parse::<f64>().ok().and_then(Number::from_f64)
        && raw.contains(|c: char| c.is_ascii_digit())
    {
        return Value::Number(n);
    }
    Value::String(raw.to_string())
}

/// Splits on commas that are outside quotes and brackets.
fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '"' | '\'' => quote = Some(c),
            '[' | '{' => depth += 1,
            ']' | '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);

    parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

fn quoted(raw: &str, quote: char) -> Option<&str> {
    (raw.len() >= 2 && raw.starts_with(quote) && raw.ends_with(quote)).then(|| &raw[1..raw.len() - 1])
}

fn is_enclosed(raw: &str, open: char, close: char) -> bool {
    raw.len() >= 2 && raw.starts_with(open) && raw.ends_with(close)
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\'
            && let Some(next) = chars.next()
        {
            if next != '"' && next != '\\' && next != '\'' {
                out.push(c);
            }
            out.push(next);
        } else {
            out.push(c);
        }
    }
    out
}
