//! Number and markup formatting for answers shown back to the user.

/// Format a number the way a browser's `Number.prototype.toString` does:
/// shortest round-trip digits, plain decimal for magnitudes in
/// `[1e-6, 1e21)`, otherwise `d.ddde+x` / `d.ddde-x`.
pub fn js_number_string(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let sci = format!("{:e}", value.abs());
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if (-6..21).contains(&exp) {
        return format!("{value}");
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let exp_sign = if exp >= 0 { "+" } else { "-" };
    format!("{sign}{mantissa}e{exp_sign}{}", exp.abs())
}

/// Rewrite an exponential number string as display markup:
/// `"1.5e+21"` becomes `"1.5 * 10<sup>21</sup>"`. Strings without an `e`
/// are returned unchanged.
pub fn exponent_markup(number: &str) -> String {
    let mut mantissa = String::new();
    let mut exponent = String::new();
    let mut in_exponent = false;

    for c in number.chars() {
        if c == 'e' {
            in_exponent = true;
            continue;
        }
        if in_exponent {
            exponent.push(c);
        } else {
            mantissa.push(c);
        }
    }

    let exponent = exponent.trim_start_matches('+');
    if exponent.is_empty() {
        return mantissa;
    }
    format!("{mantissa} * 10<sup>{exponent}</sup>")
}

/// Round to `digits` significant digits through exponential notation,
/// breaking exact ties away from zero (`112.5` becomes `113`).
pub fn round_significant(value: f64, digits: usize) -> f64 {
    if !value.is_finite() || value == 0.0 || digits == 0 {
        return value;
    }

    // Neighbouring doubles differ within 17 significant digits, so this many
    // extra digits tell an exact tie apart from a value just below it.
    let exact = format!("{:.*e}", digits + 24, value.abs());
    let Some((mantissa, exponent)) = exact.split_once('e') else {
        return value;
    };
    let Ok(mut exponent) = exponent.parse::<i32>() else {
        return value;
    };

    let all: Vec<u8> = mantissa
        .bytes()
        .filter(u8::is_ascii_digit)
        .map(|b| b - b'0')
        .collect();
    let mut kept = all[..digits].to_vec();

    if all[digits] >= 5 {
        let mut i = kept.len();
        loop {
            if i == 0 {
                // 9.99 rounded up to 10.0
                kept.insert(0, 1);
                kept.pop();
                exponent += 1;
                break;
            }
            i -= 1;
            if kept[i] == 9 {
                kept[i] = 0;
            } else {
                kept[i] += 1;
                break;
            }
        }
    }

    let digits: String = kept.iter().map(|d| char::from(b'0' + d)).collect();
    let (first, rest) = digits.split_at(1);
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{first}.{rest}0e{exponent}")
        .parse()
        .unwrap_or(value)
}

/// Render markup as plain text for a terminal: `<sup>x</sup>` becomes `^x`,
/// `<sub>x</sub>` becomes `_x`, other tags are dropped and the common
/// entities are decoded.
pub fn strip_markup(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut chars = markup.chars();

    while let Some(c) = chars.next() {
        if c != '<' {
            out.push(c);
            continue;
        }
        let mut tag = String::new();
        for t in chars.by_ref() {
            if t == '>' {
                break;
            }
            tag.push(t);
        }
        let name = tag.trim().to_ascii_lowercase();
        match name.split_whitespace().next().unwrap_or("") {
            "sup" => out.push('^'),
            "sub" => out.push('_'),
            "br" | "br/" => out.push('\n'),
            _ => {}
        }
    }

    decode_entities(&out)
}

/// Decode the handful of HTML entities rich-text editors emit.
pub fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}
