//! Printf-style message templates
//!
//! Supported verbs: `%v %s %d %f %t %q %x %X` and `%%`, with the `-` and `0`
//! flags, a width and a `.precision`. Arity is never validated up front; a
//! mismatch renders as a marker inside the message instead:
//!
//! | Situation                  | Output                      |
//! |----------------------------|-----------------------------|
//! | missing argument           | `%!d(MISSING)`              |
//! | unused arguments           | `%!(EXTRA string=a, int=1)` |
//! | verb/type mismatch         | `%!d(string=abc)`           |
//! | unknown verb               | `%!z(int=1)`                |
//! | `%` at end of template     | `%!(NOVERB)`                |
//! | width above 1,000,000      | `%!(BADWIDTH)`              |
//! | precision above 1,000,000  | `%!(BADPREC)`               |
//!
//! Floats under `%v` switch to exponent form (`1e+21`, `1.5e-05`) outside
//! `[1e-4, 1e21)`; infinities render as `+Inf`/`-Inf`. `%q` escapes control
//! characters as `\x1b`/`\u0085`. The `0` flag pads strings with zeros too.
//! A precision on `%v` counts decimal places, not significant digits.

use super::log_arg::ArgValue;
use std::fmt::Write;
use std::iter::Peekable;
use std::str::Chars;

const DEFAULT_FLOAT_PRECISION: usize = 6;

/// Largest accepted width or precision
const MAX_NUMBER: usize = 1_000_000;

#[derive(Debug, Default, Clone, Copy)]
struct Directive {
    left_align: bool,
    zero_pad: bool,
    width: Option<usize>,
    precision: Option<usize>,
}

enum Number {
    Absent,
    Value(usize),
    TooLarge,
}

/// Render `template` with positional `args`.
pub fn render(template: &str, args: &[ArgValue]) -> String {
    let mut out = String::with_capacity(template.len() + args.len() * 8);
    let mut chars = template.chars().peekable();
    let mut next_arg = 0;

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }

        let mut directive = Directive::default();
        while let Some(&flag) = chars.peek() {
            match flag {
                '-' => directive.left_align = true,
                '0' => directive.zero_pad = true,
                _ => break,
            }
            chars.next();
        }
        match read_number(&mut chars) {
            Number::Value(width) => directive.width = Some(width),
            Number::TooLarge => out.push_str("%!(BADWIDTH)"),
            Number::Absent => {}
        }
        if chars.peek() == Some(&'.') {
            chars.next();
            match read_number(&mut chars) {
                Number::Value(precision) => directive.precision = Some(precision),
                Number::Absent => directive.precision = Some(0),
                Number::TooLarge => out.push_str("%!(BADPREC)"),
            }
        }

        let Some(verb) = chars.next() else {
            out.push_str("%!(NOVERB)");
            break;
        };
        if verb == '%' {
            out.push('%');
            continue;
        }

        match args.get(next_arg) {
            Some(arg) => {
                next_arg += 1;
                match format_verb(verb, arg, &directive) {
                    Some(text) => pad_into(&mut out, &text, &directive, arg),
                    None => {
                        let _ = write!(out, "%!{}({}={})", verb, arg.type_name(), plain(arg));
                    }
                }
            }
            None => {
                let _ = write!(out, "%!{}(MISSING)", verb);
            }
        }
    }

    if next_arg < args.len() {
        out.push_str("%!(EXTRA ");
        for (i, arg) in args[next_arg..].iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            let _ = write!(out, "{}={}", arg.type_name(), plain(arg));
        }
        out.push(')');
    }

    out
}

fn read_number(chars: &mut Peekable<Chars<'_>>) -> Number {
    let mut value: Option<usize> = None;
    let mut too_large = false;
    while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
        chars.next();
        if too_large {
            continue;
        }
        let next = value.unwrap_or(0) * 10 + digit as usize;
        if next > MAX_NUMBER {
            too_large = true;
        } else {
            value = Some(next);
        }
    }

    match value {
        _ if too_large => Number::TooLarge,
        Some(value) => Number::Value(value),
        None => Number::Absent,
    }
}

/// `%v` rendering of an argument
fn plain(arg: &ArgValue) -> String {
    match arg {
        ArgValue::Float32(v) => shortest_float(f64::from(*v), v.to_string(), format!("{:e}", v)),
        ArgValue::Float(v) => shortest_float(*v, v.to_string(), format!("{:e}", v)),
        other => other.to_string(),
    }
}

fn shortest_float(value: f64, decimal: String, exponent: String) -> String {
    if let Some(text) = non_finite(value) {
        return text;
    }
    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-4..1e21).contains(&magnitude) {
        signed_exponent(&exponent)
    } else {
        decimal
    }
}

/// `1.5e-5` -> `1.5e-05`, `1e21` -> `1e+21`
fn signed_exponent(text: &str) -> String {
    let Some((mantissa, exponent)) = text.split_once('e') else {
        return text.to_string();
    };
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    format!("{}e{}{:0>2}", mantissa, sign, digits)
}

fn non_finite(value: f64) -> Option<String> {
    if value.is_nan() {
        Some("NaN".to_string())
    } else if value.is_infinite() {
        Some(if value > 0.0 { "+Inf" } else { "-Inf" }.to_string())
    } else {
        None
    }
}

/// Format one argument; `None` when the verb does not apply to its type.
fn format_verb(verb: char, arg: &ArgValue, directive: &Directive) -> Option<String> {
    match (verb, arg) {
        ('v' | 'f', ArgValue::Float32(v)) if verb == 'f' || directive.precision.is_some() => {
            let precision = directive.precision.unwrap_or(DEFAULT_FLOAT_PRECISION);
            Some(non_finite(f64::from(*v)).unwrap_or_else(|| format!("{:.*}", precision, v)))
        }
        ('v' | 'f', ArgValue::Float(v)) if verb == 'f' || directive.precision.is_some() => {
            let precision = directive.precision.unwrap_or(DEFAULT_FLOAT_PRECISION);
            Some(non_finite(*v).unwrap_or_else(|| format!("{:.*}", precision, v)))
        }
        ('v', _) => Some(plain(arg)),

        ('s', ArgValue::Str(s)) => Some(match directive.precision {
            Some(p) => s.chars().take(p).collect(),
            None => s.clone(),
        }),

        ('d', ArgValue::Int(i)) => Some(i.to_string()),
        ('d', ArgValue::Uint(u)) => Some(u.to_string()),

        ('t', ArgValue::Bool(b)) => Some(b.to_string()),

        ('q', ArgValue::Str(s)) => Some(quote(s)),

        ('x', ArgValue::Int(i)) => Some(signed_hex(*i, false)),
        ('X', ArgValue::Int(i)) => Some(signed_hex(*i, true)),
        ('x', ArgValue::Uint(u)) => Some(format!("{:x}", u)),
        ('X', ArgValue::Uint(u)) => Some(format!("{:X}", u)),
        ('x', ArgValue::Str(s)) => Some(s.bytes().map(|b| format!("{:02x}", b)).collect()),
        ('X', ArgValue::Str(s)) => Some(s.bytes().map(|b| format!("{:02X}", b)).collect()),

        _ => None,
    }
}

/// Double-quoted string with control characters escaped
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{07}' => out.push_str("\\a"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0b}' => out.push_str("\\v"),
            '\u{0c}' => out.push_str("\\f"),
            c if c.is_control() && (c as u32) < 0x80 => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn signed_hex(value: i64, upper: bool) -> String {
    let magnitude = value.unsigned_abs();
    let digits = if upper {
        format!("{:X}", magnitude)
    } else {
        format!("{:x}", magnitude)
    };
    if value < 0 {
        format!("-{}", digits)
    } else {
        digits
    }
}

fn pad_into(out: &mut String, text: &str, directive: &Directive, arg: &ArgValue) {
    let len = text.chars().count();
    let width = directive.width.unwrap_or(0);
    if len >= width {
        out.push_str(text);
        return;
    }

    let fill = width - len;
    let numeric = matches!(
        arg,
        ArgValue::Int(_) | ArgValue::Uint(_) | ArgValue::Float32(_) | ArgValue::Float(_)
    );

    if directive.left_align {
        out.push_str(text);
        out.extend(std::iter::repeat(' ').take(fill));
    } else if directive.zero_pad {
        let (sign, digits) = match text.strip_prefix(['-', '+']) {
            Some(rest) if numeric => (&text[..1], rest),
            _ => ("", text),
        };
        out.push_str(sign);
        out.extend(std::iter::repeat('0').take(fill));
        out.push_str(digits);
    } else {
        out.extend(std::iter::repeat(' ').take(fill));
        out.push_str(text);
    }
}
