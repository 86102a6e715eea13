use crate::error::ExtractionError;
use crate::literal::{ArrayBuilder, ArrayKey, PhpValue};
use crate::tree_sitter_helpers::{has_child_of_kind, ParsedFile};
use tree_sitter::Node;

/// The default value of a parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    Literal(PhpValue),
    /// Depends on something only known at runtime, such as a constant
    Unresolvable,
}

impl DefaultValue {
    pub fn into_literal(self) -> Option<PhpValue> {
        match self {
            DefaultValue::Literal(value) => Some(value),
            DefaultValue::Unresolvable => None,
        }
    }
}

pub fn read_default_value(parsed: &ParsedFile, node: Node) -> Result<DefaultValue, ExtractionError> {
    Ok(read_literal(parsed, node)?.map_or(DefaultValue::Unresolvable, DefaultValue::Literal))
}

fn read_literal(parsed: &ParsedFile, node: Node) -> Result<Option<PhpValue>, ExtractionError> {
    let text = parsed.render_node(node)?;
    let value = match node.kind() {
        "null" | "boolean" | "name" => read_keyword(text),
        "integer" => parse_integer(text),
        "float" => parse_float(text),
        "string" | "encapsed_string" => parse_string(text).map(PhpValue::String),
        "unary_op_expression" => read_signed_number(parsed, node)?,
        "parenthesized_expression" => match first_operand(node) {
            Some(inner) => read_literal(parsed, inner)?,
            None => None,
        },
        "array_creation_expression" => read_array(parsed, node)?,
        _ => None,
    };
    Ok(value)
}

fn read_keyword(text: &str) -> Option<PhpValue> {
    match text.to_ascii_lowercase().as_str() {
        "null" => Some(PhpValue::Null),
        "true" => Some(PhpValue::Bool(true)),
        "false" => Some(PhpValue::Bool(false)),
        _ => None,
    }
}

fn parse_integer(text: &str) -> Option<PhpValue> {
    let digits = text.replace('_', "").to_ascii_lowercase();
    let (radix, digits) = if let Some(hex) = digits.strip_prefix("0x") {
        (16, hex.to_string())
    } else if let Some(binary) = digits.strip_prefix("0b") {
        (2, binary.to_string())
    } else if let Some(octal) = digits.strip_prefix("0o") {
        (8, octal.to_string())
    } else if digits.len() > 1 && digits.starts_with('0') {
        (8, digits[1..].to_string())
    } else {
        (10, digits)
    };

    match i64::from_str_radix(&digits, radix) {
        Ok(value) => Some(PhpValue::Int(value)),
        // Integer literals beyond the 64-bit range become floats
        Err(_) => u128::from_str_radix(&digits, radix)
            .ok()
            .map(|value| PhpValue::Float(value as f64)),
    }
}

fn parse_float(text: &str) -> Option<PhpValue> {
    text.replace('_', "").parse::<f64>().ok().map(PhpValue::Float)
}

fn parse_string(text: &str) -> Option<String> {
    let text = text
        .strip_prefix('b')
        .or_else(|| text.strip_prefix('B'))
        .unwrap_or(text);
    if let Some(body) = text.strip_prefix('\'').and_then(|t| t.strip_suffix('\'')) {
        return Some(unescape_single_quoted(body));
    }
    if let Some(body) = text.strip_prefix('"').and_then(|t| t.strip_suffix('"')) {
        return unescape_double_quoted(body);
    }
    None
}

fn unescape_single_quoted(body: &str) -> String {
    let mut value = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        match (c, chars.peek()) {
            ('\\', Some(&next)) if next == '\\' || next == '\'' => {
                value.push(next);
                chars.next();
            }
            _ => value.push(c),
        }
    }
    value
}

/// Unescape a double-quoted string body, or return `None` if it interpolates
/// variables or encodes bytes that are not valid UTF-8 on their own.
fn unescape_double_quoted(body: &str) -> Option<String> {
    let mut value = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '$' => match chars.peek() {
                Some(&next) if next == '_' || next == '{' || next.is_alphabetic() || !next.is_ascii() => {
                    return None;
                }
                _ => value.push(c),
            },
            '{' if chars.peek() == Some(&'$') => return None,
            '\\' => {
                let Some(&next) = chars.peek() else {
                    value.push(c);
                    continue;
                };
                let simple = match next {
                    'n' => Some('\n'),
                    't' => Some('\t'),
                    'r' => Some('\r'),
                    'v' => Some('\x0B'),
                    'e' => Some('\x1B'),
                    'f' => Some('\x0C'),
                    '\\' | '$' | '"' => Some(next),
                    _ => None,
                };
                if let Some(unescaped) = simple {
                    value.push(unescaped);
                    chars.next();
                } else if next.is_digit(8) {
                    let digits = take_digits(&mut chars, 8, 3);
                    value.push(byte_to_char(u32::from_str_radix(&digits, 8).ok()?)?);
                } else if next == 'x' {
                    chars.next();
                    let digits = take_digits(&mut chars, 16, 2);
                    if digits.is_empty() {
                        value.push_str("\\x");
                    } else {
                        value.push(byte_to_char(u32::from_str_radix(&digits, 16).ok()?)?);
                    }
                } else if next == 'u' {
                    chars.next();
                    if chars.peek() != Some(&'{') {
                        value.push_str("\\u");
                        continue;
                    }
                    chars.next();
                    let digits = take_digits(&mut chars, 16, 6);
                    if chars.next() != Some('}') {
                        return None;
                    }
                    value.push(char::from_u32(u32::from_str_radix(&digits, 16).ok()?)?);
                } else {
                    value.push(c);
                }
            }
            _ => value.push(c),
        }
    }
    Some(value)
}

fn take_digits(
    chars: &mut std::iter::Peekable<std::str::Chars>,
    radix: u32,
    limit: usize,
) -> String {
    let mut digits = String::new();
    while digits.len() < limit {
        match chars.peek() {
            Some(&c) if c.is_digit(radix) => {
                digits.push(c);
                chars.next();
            }
            _ => break,
        }
    }
    digits
}

fn byte_to_char(byte: u32) -> Option<char> {
    // Single bytes past ASCII are only meaningful as part of a multi-byte sequence
    (byte < 0x80).then(|| char::from_u32(byte)).flatten()
}

fn read_signed_number(parsed: &ParsedFile, node: Node) -> Result<Option<PhpValue>, ExtractionError> {
    let Some(operand) = first_operand(node) else {
        return Ok(None);
    };
    let negative = match parsed.render_node(node)?.trim_start().chars().next() {
        Some('-') => true,
        Some('+') => false,
        _ => return Ok(None),
    };

    let value = match read_literal(parsed, operand)? {
        Some(PhpValue::Int(value)) if negative => Some(
            value
                .checked_neg()
                .map_or(PhpValue::Float(-(value as f64)), PhpValue::Int),
        ),
        Some(PhpValue::Float(value)) if negative => Some(PhpValue::Float(-value)),
        Some(number @ (PhpValue::Int(_) | PhpValue::Float(_))) => Some(number),
        _ => None,
    };
    Ok(value)
}

fn read_array(parsed: &ParsedFile, node: Node) -> Result<Option<PhpValue>, ExtractionError> {
    let mut builder = ArrayBuilder::new();
    let mut cursor = node.walk();
    let elements: Vec<_> = node
        .named_children(&mut cursor)
        .filter(|child| child.kind() == "array_element_initializer")
        .collect();

    for element in elements {
        if has_child_of_kind(element, "...") || has_child_of_kind(element, "variadic_unpacking") {
            return Ok(None);
        }
        let operands = operands(element);
        let is_keyed = has_child_of_kind(element, "=>");
        match (is_keyed, operands.as_slice()) {
            (true, [key, value]) => {
                let (Some(key), Some(value)) =
                    (read_literal(parsed, *key)?, read_literal(parsed, *value)?)
                else {
                    return Ok(None);
                };
                let Some(key) = array_key(key) else {
                    return Ok(None);
                };
                builder.insert(key, value);
            }
            (false, [value]) => {
                let Some(value) = read_literal(parsed, *value)? else {
                    return Ok(None);
                };
                builder.push(value);
            }
            _ => return Ok(None),
        }
    }

    Ok(Some(builder.build()))
}

fn array_key(key: PhpValue) -> Option<ArrayKey> {
    match key {
        PhpValue::Int(index) => Some(ArrayKey::Int(index)),
        PhpValue::String(name) => Some(ArrayKey::from_string(&name)),
        PhpValue::Bool(flag) => Some(ArrayKey::Int(flag as i64)),
        PhpValue::Null => Some(ArrayKey::String(String::new())),
        PhpValue::Float(number) if number.is_finite() => Some(ArrayKey::Int(number.trunc() as i64)),
        _ => None,
    }
}

fn operands(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    let children = node
        .named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect();
    children
}

fn first_operand(node: Node) -> Option<Node> {
    operands(node).into_iter().next()
}
