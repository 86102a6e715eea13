use super::default_values::{read_default_value, DefaultValue};
use super::doc_comments::read_doc_comment;
use super::scope::FileScope;
use super::type_hints::{accepts_null, accepts_null_natively, read_type};
use crate::error::ExtractionError;
use crate::literal::PhpValue;
use crate::tree_sitter_helpers::{has_child_of_kind, ParsedFile};
use crate::types::{MethodDescriptor, ParameterDescriptor};
use tree_sitter::Node;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

/// A method available on a class, whether declared in its body or inherited.
#[derive(Debug, Clone, PartialEq)]
pub struct ReflectedMethod {
    pub descriptor: MethodDescriptor,
    pub visibility: Visibility,
    pub is_abstract: bool,
    /// Class that declares the method. Trait methods belong to the class using the trait.
    pub declaring_class: String,
    /// Interface that declares a method of the same name, if any
    pub implemented_interface: Option<String>,
}

pub fn reflect_method(
    parsed: &ParsedFile,
    node: Node,
    scope: &FileScope,
    declaring_class: &str,
) -> Result<ReflectedMethod, ExtractionError> {
    let name_node = node
        .child_by_field_name("name")
        .ok_or_else(|| ExtractionError::Malformed("Method without a name".to_string()))?;

    let parameters = match node.child_by_field_name("parameters") {
        Some(parameters) => reflect_parameters(parsed, parameters, scope)?,
        None => Vec::new(),
    };
    let return_type = node
        .child_by_field_name("return_type")
        .map(|return_type| read_type(parsed, return_type, scope))
        .transpose()?;

    Ok(ReflectedMethod {
        descriptor: MethodDescriptor {
            name: parsed.render_node(name_node)?.to_string(),
            is_static: has_child_of_kind(node, "static_modifier"),
            doc_comment: read_doc_comment(parsed, node)?,
            parameters,
            return_type,
        },
        visibility: read_visibility(parsed, node)?,
        is_abstract: has_child_of_kind(node, "abstract_modifier"),
        declaring_class: declaring_class.to_string(),
        implemented_interface: None,
    })
}

fn read_visibility(parsed: &ParsedFile, node: Node) -> Result<Visibility, ExtractionError> {
    let mut cursor = node.walk();
    let modifier = node
        .named_children(&mut cursor)
        .find(|child| child.kind() == "visibility_modifier");
    let visibility = match modifier {
        Some(modifier) => match parsed.render_node(modifier)?.to_ascii_lowercase().as_str() {
            "private" => Visibility::Private,
            "protected" => Visibility::Protected,
            _ => Visibility::Public,
        },
        None => Visibility::Public,
    };
    Ok(visibility)
}

fn reflect_parameters(
    parsed: &ParsedFile,
    node: Node,
    scope: &FileScope,
) -> Result<Vec<ParameterDescriptor>, ExtractionError> {
    let mut cursor = node.walk();
    let parameter_nodes: Vec<_> = node
        .named_children(&mut cursor)
        .filter(|child| {
            matches!(
                child.kind(),
                "simple_parameter" | "variadic_parameter" | "property_promotion_parameter"
            )
        })
        .collect();

    let mut parameters = Vec::with_capacity(parameter_nodes.len());
    let mut has_default = Vec::with_capacity(parameter_nodes.len());
    for parameter_node in parameter_nodes {
        let (parameter, default) = reflect_parameter(parsed, parameter_node, scope)?;
        has_default.push(default);
        parameters.push(parameter);
    }

    // A default only makes a parameter optional if every later parameter is optional too
    let mut later_parameters_optional = true;
    for (parameter, has_default) in parameters.iter_mut().zip(has_default).rev() {
        parameter.is_optional = parameter.is_variadic || (has_default && later_parameters_optional);
        later_parameters_optional = parameter.is_optional;
    }

    Ok(parameters)
}

/// Reflect a single parameter, also reporting whether it declares a default.
fn reflect_parameter(
    parsed: &ParsedFile,
    node: Node,
    scope: &FileScope,
) -> Result<(ParameterDescriptor, bool), ExtractionError> {
    let name_node = node
        .child_by_field_name("name")
        .ok_or_else(|| ExtractionError::Malformed("Parameter without a name".to_string()))?;
    let declared_name = parsed.render_node(name_node)?;

    let mut type_ref = node
        .child_by_field_name("type")
        .map(|type_node| read_type(parsed, type_node, scope))
        .transpose()?;
    let default_value = node
        .child_by_field_name("default_value")
        .map(|default_node| read_default_value(parsed, default_node))
        .transpose()?;

    // A typed parameter defaulting to null is implicitly nullable
    if let (Some(DefaultValue::Literal(PhpValue::Null)), Some(type_ref)) =
        (&default_value, type_ref.as_mut())
    {
        if !accepts_null_natively(type_ref) {
            type_ref.is_nullable = true;
        }
    }

    let allows_null = type_ref.as_ref().map_or(true, accepts_null);
    let has_default = default_value.is_some();
    let parameter = ParameterDescriptor {
        name: declared_name
            .trim_start_matches(|c: char| c == '&' || c == '$' || c.is_whitespace())
            .to_string(),
        type_ref,
        passed_by_reference: has_child_of_kind(node, "reference_modifier")
            || declared_name.starts_with('&'),
        is_variadic: node.kind() == "variadic_parameter",
        is_optional: false,
        default_value: default_value.and_then(DefaultValue::into_literal),
        allows_null,
    };
    Ok((parameter, has_default))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::setup_parser;
    use crate::tree_sitter_helpers::children_of_kind;
    use crate::types::TypeRef;

    /// Reflect the single method of a class, resolving names against namespace `App`.
    fn reflect(member: &str) -> ReflectedMethod {
        let source_code = format!("<?php\nclass Cart\n{{\n    {}\n}}\n", member);
        let mut parser = setup_parser();
        let parsed = ParsedFile::parse(&source_code, &mut parser).unwrap();
        let class = children_of_kind(parsed.root_node(), "class_declaration")[0];
        let body = class.child_by_field_name("body").unwrap();
        let method = children_of_kind(body, "method_declaration")[0];
        reflect_method(&parsed, method, &FileScope::new("App"), "App\\Cart").unwrap()
    }

    fn method_parameters(member: &str) -> Vec<ParameterDescriptor> {
        reflect(member).descriptor.parameters
    }

    mod methods {
        use super::*;

        #[test]
        fn name_and_defaults() {
            let method = reflect("function clear() {}");

            assert_eq!(method.descriptor.name, "clear");
            assert_eq!(method.visibility, Visibility::Public);
            assert!(!method.descriptor.is_static);
            assert!(!method.is_abstract);
            assert!(method.descriptor.parameters.is_empty());
            assert!(method.descriptor.return_type.is_none());
            assert_eq!(method.declaring_class, "App\\Cart");
            assert!(method.implemented_interface.is_none());
        }

        #[test]
        fn visibility() {
            assert_eq!(
                reflect("public function a() {}").visibility,
                Visibility::Public
            );
            assert_eq!(
                reflect("protected function b() {}").visibility,
                Visibility::Protected
            );
            assert_eq!(
                reflect("private function c() {}").visibility,
                Visibility::Private
            );
        }

        #[test]
        fn static_method() {
            assert!(reflect("public static function create() {}").descriptor.is_static);
        }

        #[test]
        fn abstract_method() {
            assert!(reflect("abstract public function total(): int;").is_abstract);
        }

        #[test]
        fn return_type() {
            let method = reflect("public function total(): ?Money {}");

            assert_eq!(
                method.descriptor.return_type,
                Some(TypeRef::nominal("App\\Money").nullable())
            );
        }

        #[test]
        fn doc_comment() {
            let method = reflect("/** Empty the cart. */\n    public function clear() {}");

            assert_eq!(
                method.descriptor.doc_comment.as_deref(),
                Some("/** Empty the cart. */")
            );
        }
    }

    mod parameters {
        use super::*;

        #[test]
        fn untyped_parameter() {
            let parameters = method_parameters("public function add($item) {}");

            assert_eq!(parameters.len(), 1);
            assert_eq!(parameters[0].name, "item");
            assert!(parameters[0].type_ref.is_none());
            assert!(parameters[0].allows_null);
            assert!(!parameters[0].is_optional);
        }

        #[test]
        fn typed_parameter() {
            let parameters = method_parameters("public function add(Item $item, int $quantity) {}");

            assert_eq!(parameters[0].type_ref, Some(TypeRef::nominal("App\\Item")));
            assert!(!parameters[0].allows_null);
            assert_eq!(parameters[1].type_ref, Some(TypeRef::builtin("int")));
        }

        #[test]
        fn by_reference() {
            let parameters = method_parameters("public function sort(array &$items) {}");

            assert!(parameters[0].passed_by_reference);
            assert_eq!(parameters[0].name, "items");
        }

        #[test]
        fn variadic() {
            let parameters = method_parameters("public function addAll(Item ...$items) {}");

            assert!(parameters[0].is_variadic);
            assert!(parameters[0].is_optional);
            assert_eq!(parameters[0].name, "items");
        }

        #[test]
        fn literal_default() {
            let parameters = method_parameters("public function take(int $limit = 10) {}");

            assert!(parameters[0].is_optional);
            assert_eq!(parameters[0].default_value, Some(PhpValue::Int(10)));
        }

        #[test]
        fn unresolvable_default() {
            let parameters = method_parameters("public function take(int $limit = self::LIMIT) {}");

            assert!(parameters[0].is_optional);
            assert!(parameters[0].default_value.is_none());
            assert!(!parameters[0].allows_null);
        }

        #[test]
        fn null_default_makes_type_nullable() {
            let parameters = method_parameters("public function find(Item $item = null) {}");

            assert_eq!(
                parameters[0].type_ref,
                Some(TypeRef::nominal("App\\Item").nullable())
            );
            assert!(parameters[0].allows_null);
            assert_eq!(parameters[0].default_value, Some(PhpValue::Null));
        }

        #[test]
        fn null_default_on_mixed_keeps_type() {
            let parameters = method_parameters("public function set(mixed $value = null) {}");

            assert_eq!(parameters[0].type_ref, Some(TypeRef::builtin("mixed")));
            assert!(parameters[0].allows_null);
        }

        #[test]
        fn default_before_required_parameter_is_not_optional() {
            let parameters = method_parameters("public function set($key = 'a', $value) {}");

            assert!(!parameters[0].is_optional);
            assert!(!parameters[1].is_optional);
        }

        #[test]
        fn promoted_constructor_parameter() {
            let parameters =
                method_parameters("public function __construct(private readonly Money $total) {}");

            assert_eq!(parameters[0].name, "total");
            assert_eq!(parameters[0].type_ref, Some(TypeRef::nominal("App\\Money")));
        }
    }
}
