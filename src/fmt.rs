/// Format a float with thousands separators and at most `decimals` places,
/// dropping trailing zeros: 1234.5 -> "1,234.5", 30.0 -> "30".
pub fn number(val: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, val.abs());
    let fixed = if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        fixed
    };
    let (int_part, dec_part) = match fixed.split_once('.') {
        Some((i, d)) => (i, Some(d)),
        None => (fixed.as_str(), None),
    };

    let mut with_commas = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let mut out: String = with_commas.chars().rev().collect();
    if let Some(d) = dec_part {
        out.push('.');
        out.push_str(d);
    }

    let is_zero = out.chars().all(|c| c == '0' || c == '.' || c == ',');
    if val < 0.0 && !is_zero {
        format!("-{out}")
    } else {
        out
    }
}

/// Minutes, two decimal places at most.
pub fn minutes(val: f64) -> String {
    number(val, 2)
}

/// Percentage with one decimal place at most: 12.5 -> "12.5%".
pub fn percent(val: f64) -> String {
    format!("{}%", number(val, 1))
}
