use super::INDENT;
use crate::error::RenderError;
use crate::names::QualifiedName;
use crate::types::{MethodDescriptor, ParameterDescriptor, TypeRef};

const NULL_DEFAULT: &str = " = NULL ";
const UNRESOLVABLE_DEFAULT: &str = " /* = unresolvable */ ";

/// Return the token to print for a type, without its nullability marker.
///
/// Class names are shortened to their last segment; the import block is what
/// makes the short name resolvable.
pub(super) fn resolve_type(type_ref: &TypeRef) -> Result<String, RenderError> {
    if !type_ref.is_nominal() {
        return Ok(type_ref.name.clone());
    }
    qualify(type_ref).map(|name| name.short_name().to_string())
}

pub(super) fn qualify(type_ref: &TypeRef) -> Result<QualifiedName, RenderError> {
    QualifiedName::parse(&type_ref.name).ok_or_else(|| RenderError::UnresolvableTypeReference {
        name: type_ref.name.clone(),
    })
}

fn render_type(type_ref: &TypeRef) -> Result<String, RenderError> {
    let nullability = if type_ref.is_nullable { "?" } else { "" };
    Ok(format!("{}{}", nullability, resolve_type(type_ref)?))
}

fn render_default_value(parameter: &ParameterDescriptor) -> String {
    if !parameter.is_optional || parameter.is_variadic {
        return String::new();
    }
    match &parameter.default_value {
        Some(value) => format!(" = {}", value.export_compact()),
        None if parameter.allows_null => NULL_DEFAULT.to_string(),
        None => UNRESOLVABLE_DEFAULT.to_string(),
    }
}

pub(super) fn render_parameter(parameter: &ParameterDescriptor) -> Result<String, RenderError> {
    let type_declaration = match &parameter.type_ref {
        Some(type_ref) => render_type(type_ref)?,
        None => String::new(),
    };
    let rendered = format!(
        "{} {}{}${}{}",
        type_declaration,
        if parameter.passed_by_reference { "&" } else { "" },
        if parameter.is_variadic { "..." } else { "" },
        parameter.name,
        render_default_value(parameter)
    );
    Ok(rendered.trim().to_string())
}

fn render_return_type(return_type: Option<&TypeRef>) -> Result<String, RenderError> {
    match return_type {
        Some(type_ref) => Ok(format!(": {}", render_type(type_ref)?)),
        None => Ok(String::new()),
    }
}

/// Render a method's doc comment (if any) and its declaration, one line each.
pub(super) fn render_method(method: &MethodDescriptor) -> Result<String, RenderError> {
    let mut output = String::new();
    if let Some(doc_comment) = &method.doc_comment {
        output.push_str(INDENT);
        output.push_str(doc_comment);
        output.push('\n');
    }

    let parameters = method
        .parameters
        .iter()
        .map(render_parameter)
        .collect::<Result<Vec<_>, _>>()?;
    output.push_str(&format!(
        "{}public {}function {}({}){};\n",
        INDENT,
        if method.is_static { "static " } else { "" },
        method.name,
        parameters.join(", "),
        render_return_type(method.return_type.as_ref())?
    ));
    Ok(output)
}
