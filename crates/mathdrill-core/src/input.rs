//! Caret notation for typing superscripts and subscripts in a terminal.
//!
//! `10^3` becomes `10<sup>3</sup>`, `v_0` becomes `v<sub>0</sub>`, and braces
//! group longer runs: `m^{-2}`.

/// Rewrite caret notation into `<sup>`/`<sub>` markup.
pub fn caret_to_markup(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 16);
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        let tag = match c {
            '^' => "sup",
            '_' => "sub",
            _ => {
                out.push(c);
                continue;
            }
        };

        let mut group = String::new();
        if chars.next_if_eq(&'{').is_some() {
            let mut depth = 1;
            for g in chars.by_ref() {
                match g {
                    '{' => depth += 1,
                    '}' => {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                    }
                    _ => {}
                }
                group.push(g);
            }
        } else {
            while let Some(&g) = chars.peek() {
                let sign = group.is_empty() && matches!(g, '-' | '+');
                if !sign && ends_group(g) {
                    break;
                }
                group.push(g);
                chars.next();
            }
        }

        if group.is_empty() {
            // Nothing to raise; keep the caret as typed.
            out.push(c);
        } else {
            out.push_str(&format!("<{tag}>{group}</{tag}>"));
        }
    }

    out
}

fn ends_group(c: char) -> bool {
    c.is_whitespace() || matches!(c, '+' | '-' | '*' | '/' | '^' | '_')
}
