//! Positional substitution into message templates.
//!
//! Templates use printf-style slots:
//! - `%s` takes the next argument in order
//! - `%2$s` takes the second argument, without moving the sequential cursor
//! - `%%` is a literal percent sign, `%n` a newline
//!
//! A slot with no matching argument is left in the output as written.

use std::fmt::Display;

/// Substitute `args` into `template`.
///
/// A template is returned untouched when `args` is empty, so messages that
/// contain a bare `%` need no escaping unless they are formatted.
pub fn format_message(template: &str, args: &[&dyn Display]) -> String {
    if args.is_empty() {
        return template.to_string();
    }

    let mut out = String::with_capacity(template.len());
    let mut next_arg = 0;
    let mut chars = template.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }

        match chars.peek().map(|&(_, next)| next) {
            Some('%') => {
                chars.next();
                out.push('%');
            }
            Some('n') => {
                chars.next();
                out.push('\n');
            }
            Some('s') => {
                chars.next();
                match args.get(next_arg) {
                    Some(arg) => out.push_str(&arg.to_string()),
                    None => out.push_str("%s"),
                }
                next_arg += 1;
            }
            Some(d) if d.is_ascii_digit() => {
                let rest = &template[start + 1..];
                match parse_positional(rest) {
                    Some((index, consumed)) => {
                        for _ in 0..consumed {
                            chars.next();
                        }
                        match index.checked_sub(1).and_then(|i| args.get(i)) {
                            Some(arg) => out.push_str(&arg.to_string()),
                            None => out.push_str(&template[start..start + 1 + consumed]),
                        }
                    }
                    None => out.push('%'),
                }
            }
            _ => out.push('%'),
        }
    }

    out
}

/// Parse `<digits>$s` at the start of `rest`.
///
/// Returns the 1-based index and the number of bytes consumed.
fn parse_positional(rest: &str) -> Option<(usize, usize)> {
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if !rest[digits..].starts_with("$s") {
        return None;
    }
    let index = rest[..digits].parse().ok()?;
    Some((index, digits + 2))
}
