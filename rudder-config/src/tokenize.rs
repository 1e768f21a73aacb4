//! Quote-aware splitting of configuration directive lines
//!
//! Shared by the startup loader and the rewrite engine's old-file
//! reader. Supports shell-like quoting: double quotes with backslash
//! escapes (\n \r \t \a \b, \xHH hex bytes), single quotes taking
//! everything literally except \', and bare words. A closing quote must
//! be followed by whitespace or end of line.

/// Split a directive line into tokens.
///
/// Returns `None` on malformed quoting (unterminated quote, or a
/// closing quote glued to the next token).
pub fn split_args(line: &str) -> Option<Vec<String>> {
    let chars: Vec<char> = line.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    loop {
        while i < chars.len() && chars[i].is_whitespace() {
            i += 1;
        }
        if i >= chars.len() {
            return Some(tokens);
        }

        let mut current = String::new();
        let mut in_double = false;
        let mut in_single = false;

        loop {
            if in_double {
                if i >= chars.len() {
                    return None; // unterminated double quote
                }
                if chars[i] == '\\' && chars[i + 1..].first() == Some(&'x') && i + 4 <= chars.len() {
                    let hex: String = chars[i + 2..i + 4].iter().collect();
                    if let Ok(byte) = u8::from_str_radix(&hex, 16) {
                        current.push(byte as char);
                        i += 4;
                        continue;
                    }
                }
                if chars[i] == '\\' && i + 1 < chars.len() {
                    let c = match chars[i + 1] {
                        'n' => '\n',
                        'r' => '\r',
                        't' => '\t',
                        'b' => '\u{8}',
                        'a' => '\u{7}',
                        other => other,
                    };
                    current.push(c);
                    i += 2;
                } else if chars[i] == '"' {
                    // Closing quote must be followed by a space or nothing.
                    if i + 1 < chars.len() && !chars[i + 1].is_whitespace() {
                        return None;
                    }
                    i += 1;
                    break;
                } else {
                    current.push(chars[i]);
                    i += 1;
                }
            } else if in_single {
                if i >= chars.len() {
                    return None; // unterminated single quote
                }
                if chars[i] == '\\' && i + 1 < chars.len() && chars[i + 1] == '\'' {
                    current.push('\'');
                    i += 2;
                } else if chars[i] == '\'' {
                    if i + 1 < chars.len() && !chars[i + 1].is_whitespace() {
                        return None;
                    }
                    i += 1;
                    break;
                } else {
                    current.push(chars[i]);
                    i += 1;
                }
            } else {
                if i >= chars.len() {
                    break;
                }
                match chars[i] {
                    c if c.is_whitespace() => break,
                    '"' if current.is_empty() => {
                        in_double = true;
                        i += 1;
                    }
                    '\'' if current.is_empty() => {
                        in_single = true;
                        i += 1;
                    }
                    c => {
                        current.push(c);
                        i += 1;
                    }
                }
            }
        }
        tokens.push(current);
    }
}

/// Quote a token for inclusion in a rewritten directive line.
///
/// Always wraps in double quotes, escaping backslashes, quotes, control
/// characters and non-printable bytes so the result survives a
/// [`split_args`] round trip.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{7}' => out.push_str("\\a"),
            '\u{8}' => out.push_str("\\b"),
            c if (c as u32) < 0x20 || c == '\u{7f}' => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_tokens() {
        assert_eq!(
            split_args("maxmemory 100mb").unwrap(),
            vec!["maxmemory", "100mb"]
        );
        assert_eq!(split_args("   ").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_double_quotes() {
        assert_eq!(
            split_args(r#"logfile "/var/log/my server.log""#).unwrap(),
            vec!["logfile", "/var/log/my server.log"]
        );
        assert_eq!(split_args(r#"name "a\tb""#).unwrap(), vec!["name", "a\tb"]);
        assert_eq!(split_args(r#"name "\x41""#).unwrap(), vec!["name", "A"]);
    }

    #[test]
    fn test_single_quotes() {
        assert_eq!(
            split_args(r#"name 'it\'s here'"#).unwrap(),
            vec!["name", "it's here"]
        );
        assert_eq!(
            split_args(r"name 'no \t escapes'").unwrap(),
            vec!["name", r"no \t escapes"]
        );
    }

    #[test]
    fn test_empty_quoted_token() {
        assert_eq!(split_args(r#"save """#).unwrap(), vec!["save", ""]);
    }

    #[test]
    fn test_malformed_quoting() {
        assert!(split_args(r#"name "unterminated"#).is_none());
        assert!(split_args("name 'unterminated").is_none());
        assert!(split_args(r#"name "glued"next"#).is_none());
    }

    #[test]
    fn test_quote_round_trip() {
        for value in ["plain", "with space", "tab\there", "both\"'quotes", ""] {
            let line = format!("opt {}", quote(value));
            assert_eq!(split_args(&line).unwrap(), vec!["opt", value]);
        }
    }
}
