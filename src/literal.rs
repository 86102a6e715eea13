//! Literal PHP values, as found in parameter defaults, and their `var_export` form.

const ARRAY_INDENT: &str = "  ";

/// Significant digits PHP prints before switching floats to exponent notation.
const FLOAT_DIGITS: i32 = 17;

/// A statically known PHP value.
#[derive(Debug, Clone, PartialEq)]
pub enum PhpValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<(ArrayKey, PhpValue)>),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArrayKey {
    Int(i64),
    String(String),
}

impl ArrayKey {
    /// Build a key from a string, casting canonical decimal integers like PHP does.
    pub fn from_string(key: &str) -> Self {
        match key.parse::<i64>() {
            Ok(index) if index.to_string() == key => ArrayKey::Int(index),
            _ => ArrayKey::String(key.to_string()),
        }
    }
}

impl PhpValue {
    /// Render the value the way `var_export` does.
    pub fn export(&self) -> String {
        let mut output = String::new();
        self.write_export(&mut output, 0);
        output
    }

    /// Render the value the way `var_export` does, minus every whitespace character.
    ///
    /// Whitespace inside string literals is dropped as well.
    pub fn export_compact(&self) -> String {
        self.export()
            .chars()
            .filter(|c| !is_pcre_space(*c))
            .collect()
    }

    fn write_export(&self, output: &mut String, depth: usize) {
        match self {
            PhpValue::Null => output.push_str("NULL"),
            PhpValue::Bool(value) => output.push_str(if *value { "true" } else { "false" }),
            PhpValue::Int(value) => output.push_str(&export_int(*value)),
            PhpValue::Float(value) => output.push_str(&export_float(*value)),
            PhpValue::String(value) => output.push_str(&export_string(value)),
            PhpValue::Array(entries) => {
                output.push_str("array (\n");
                for (key, value) in entries {
                    output.push_str(&ARRAY_INDENT.repeat(depth + 1));
                    match key {
                        ArrayKey::Int(index) => output.push_str(&export_int(*index)),
                        ArrayKey::String(name) => output.push_str(&export_string(name)),
                    }
                    output.push_str(" => ");
                    if let PhpValue::Array(_) = value {
                        output.push('\n');
                        output.push_str(&ARRAY_INDENT.repeat(depth + 1));
                    }
                    value.write_export(output, depth + 1);
                    output.push_str(",\n");
                }
                output.push_str(&ARRAY_INDENT.repeat(depth));
                output.push(')');
            }
        }
    }
}

fn export_int(value: i64) -> String {
    if value == i64::MIN {
        format!("{}-1", i64::MIN + 1)
    } else {
        value.to_string()
    }
}

fn export_float(value: f64) -> String {
    if value.is_nan() {
        return "NAN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "INF" } else { "-INF" }.to_string();
    }
    let sign = if value.is_sign_negative() { "-" } else { "" };
    if value == 0.0 {
        return format!("{}0.0", sign);
    }

    // Shortest round-trip digits, e.g. "1.5e-5"
    let scientific = format!("{:e}", value.abs());
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or_default();
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let point = exponent + 1;

    if point < -3 || point > FLOAT_DIGITS {
        let (first, rest) = digits.split_at(1);
        format!(
            "{}{}.{}E{}{}",
            sign,
            first,
            if rest.is_empty() { "0" } else { rest },
            if exponent < 0 { '-' } else { '+' },
            exponent.abs()
        )
    } else if point <= 0 {
        format!("{}0.{}{}", sign, "0".repeat((-point) as usize), digits)
    } else {
        let point = point as usize;
        if point >= digits.len() {
            format!("{}{}{}.0", sign, digits, "0".repeat(point - digits.len()))
        } else {
            let (integral, fraction) = digits.split_at(point);
            format!("{}{}.{}", sign, integral, fraction)
        }
    }
}

fn export_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    escaped.push('\'');
    for c in value.chars() {
        match c {
            '\\' | '\'' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '\0' => escaped.push_str("' . \"\\0\" . '"),
            _ => escaped.push(c),
        }
    }
    escaped.push('\'');
    escaped
}

fn is_pcre_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0B' | '\x0C')
}

/// Accumulates array entries with PHP's key semantics: implicit keys continue from
/// the highest integer key, and repeated keys overwrite in place.
#[derive(Debug, Default)]
pub struct ArrayBuilder {
    entries: Vec<(ArrayKey, PhpValue)>,
    next_index: Option<i64>,
}

impl ArrayBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: PhpValue) {
        let index = self.next_index.unwrap_or(0);
        self.insert(ArrayKey::Int(index), value);
    }

    pub fn insert(&mut self, key: ArrayKey, value: PhpValue) {
        if let ArrayKey::Int(index) = key {
            let following = index.saturating_add(1);
            self.next_index = Some(self.next_index.map_or(following, |n| n.max(following)));
        }
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn build(self) -> PhpValue {
        PhpValue::Array(self.entries)
    }
}
