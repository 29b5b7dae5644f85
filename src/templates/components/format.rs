// Number formatting shared by the pages and the export.

/// `1234567.4` → `"1,234,567"`
pub fn thousands(value: f64) -> String {
    let rounded = format!("{:.0}", value);
    let (sign, digits) = match rounded.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rounded.as_str()),
    };
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if out == "0" {
        return out;
    }
    format!("{sign}{out}")
}

/// `$1,234`
pub fn currency(value: f64) -> String {
    format!("${}", thousands(value))
}

/// `S/ 1,234`, blank when there is no value.
pub fn currency_pen(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("S/ {}", thousands(v)),
        _ => String::new(),
    }
}

/// `0.50 u/mes`, blank when there is no value.
pub fn velocity(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.2} u/mes"),
        _ => String::new(),
    }
}

pub fn pct(value: f64) -> String {
    format!("{value:.1}%")
}
