use super::scope::FileScope;
use crate::error::ExtractionError;
use crate::tree_sitter_helpers::ParsedFile;
use crate::types::{TypeRef, SELF_REFERENTIAL_ALIASES};
use tree_sitter::Node;

const BUILTIN_TYPES: [&str; 15] = [
    "array", "bool", "callable", "false", "float", "int", "iterable", "mixed", "never", "null",
    "object", "static", "string", "true", "void",
];

/// Built-in types that accept `null` without being marked nullable.
const NULL_ACCEPTING_TYPES: [&str; 2] = ["mixed", "null"];

/// Read a type declaration from a parameter or return position.
pub fn read_type(
    parsed: &ParsedFile,
    node: Node,
    scope: &FileScope,
) -> Result<TypeRef, ExtractionError> {
    match node.kind() {
        "optional_type" => {
            let inner = first_named_child(node)
                .ok_or_else(|| ExtractionError::Malformed("Empty nullable type".to_string()))?;
            Ok(read_type(parsed, inner, scope)?.nullable())
        }
        "union_type" => read_union_type(parsed, node, scope),
        "primitive_type" | "bottom_type" | "named_type" | "name" | "qualified_name" => {
            Ok(read_named_type(parsed.render_node(node)?, scope))
        }
        _ => Err(ExtractionError::UnsupportedType(
            parsed.render_node(node)?.to_string(),
        )),
    }
}

/// Whether `null` is a valid value for the type.
pub fn accepts_null(type_ref: &TypeRef) -> bool {
    type_ref.is_nullable || accepts_null_natively(type_ref)
}

pub fn accepts_null_natively(type_ref: &TypeRef) -> bool {
    type_ref.is_builtin && NULL_ACCEPTING_TYPES.contains(&type_ref.name.as_str())
}

/// Only `T|null` unions are representable; they are read as a nullable `T`.
fn read_union_type(
    parsed: &ParsedFile,
    node: Node,
    scope: &FileScope,
) -> Result<TypeRef, ExtractionError> {
    let declaration = parsed.render_node(node)?;
    let null_members = declaration
        .split('|')
        .filter(|member| member.trim().eq_ignore_ascii_case("null"))
        .count();

    let mut cursor = node.walk();
    let mut non_null_members = Vec::new();
    for member in node.named_children(&mut cursor) {
        let text = parsed.render_node(member)?;
        if member.kind() != "comment" && !text.eq_ignore_ascii_case("null") {
            non_null_members.push(member);
        }
    }

    match (declaration.split('|').count(), null_members, non_null_members.as_slice()) {
        (2, 1, [member]) => Ok(read_type(parsed, *member, scope)?.nullable()),
        _ => Err(ExtractionError::UnsupportedType(declaration.to_string())),
    }
}

fn read_named_type(name: &str, scope: &FileScope) -> TypeRef {
    let lower_case_name = name.to_ascii_lowercase();
    if BUILTIN_TYPES.contains(&lower_case_name.as_str()) {
        return TypeRef::builtin(&lower_case_name);
    }
    if SELF_REFERENTIAL_ALIASES.contains(&lower_case_name.as_str()) {
        return TypeRef {
            name: lower_case_name,
            is_builtin: false,
            is_nullable: false,
        };
    }
    TypeRef::nominal(&scope.resolve_class_name(name))
}

fn first_named_child(node: Node) -> Option<Node> {
    let mut cursor = node.walk();
    let child = node
        .named_children(&mut cursor)
        .find(|child| child.kind() != "comment");
    child
}
