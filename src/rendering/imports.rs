use super::signatures::qualify;
use crate::error::RenderError;
use crate::names::{NamespaceContext, QualifiedName};
use crate::types::{MethodDescriptor, TypeRef};
use std::collections::HashSet;

/// Collect the classes that need a `use` statement, in order of first reference.
///
/// Parameters are scanned before the return type of each method, and methods in
/// declaration order. Distinct classes sharing a short name are all imported, which
/// yields a name clash in the generated file.
pub(super) fn collect_imports(
    methods: &[MethodDescriptor],
    context: &NamespaceContext,
) -> Result<Vec<QualifiedName>, RenderError> {
    let mut seen = HashSet::new();
    let mut imports = Vec::new();

    for type_ref in referenced_types(methods) {
        if let Some(name) = import_for_type(type_ref, context)? {
            if seen.insert(name.clone()) {
                imports.push(name);
            }
        }
    }

    Ok(imports)
}

/// Return the name to import for a type, or `None` if its short name already
/// resolves from within the context.
pub(super) fn import_for_type(
    type_ref: &TypeRef,
    context: &NamespaceContext,
) -> Result<Option<QualifiedName>, RenderError> {
    if !type_ref.is_nominal() {
        return Ok(None);
    }

    let name = qualify(type_ref)?;
    let in_scope = if context.is_global() {
        name.namespace().is_global()
    } else {
        name.namespace() == context.namespace()
    };
    Ok((!in_scope).then_some(name))
}

fn referenced_types(methods: &[MethodDescriptor]) -> impl Iterator<Item = &TypeRef> {
    methods.iter().flat_map(|method| {
        method
            .parameters
            .iter()
            .filter_map(|parameter| parameter.type_ref.as_ref())
            .chain(method.return_type.as_ref())
    })
}

pub(super) fn render_use_statement(name: &QualifiedName) -> String {
    format!("use {};", name)
}
