use crate::error::ExtractionError;
use crate::tree_sitter_helpers::{has_child_of_kind, ParsedFile};
use std::collections::HashMap;
use tree_sitter::Node;

const SEPARATOR: &str = "\\";

/// The namespace and class imports in effect at some point of a PHP file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileScope {
    namespace: String,
    /// Lower-cased alias to fully-qualified name
    imports: HashMap<String, String>,
}

impl FileScope {
    pub fn new(namespace: &str) -> Self {
        Self {
            namespace: namespace.trim_matches('\\').to_string(),
            imports: HashMap::new(),
        }
    }

    /// Switch to another namespace, forgetting the imports of the previous one.
    pub fn enter_namespace(&mut self, namespace: &str) {
        *self = Self::new(namespace);
    }

    pub fn add_import(&mut self, name: &str, alias: Option<&str>) {
        let name = name.trim_start_matches('\\');
        let alias = alias.unwrap_or_else(|| name.rsplit(SEPARATOR).next().unwrap_or(name));
        self.imports
            .insert(alias.to_ascii_lowercase(), name.to_string());
    }

    /// Prefix a name declared in this scope with the current namespace.
    pub fn qualify(&self, name: &str) -> String {
        if self.namespace.is_empty() {
            name.to_string()
        } else {
            format!("{}{}{}", self.namespace, SEPARATOR, name)
        }
    }

    /// Resolve a class name as written in source to its fully-qualified form.
    pub fn resolve_class_name(&self, name: &str) -> String {
        if let Some(fully_qualified) = name.strip_prefix('\\') {
            return fully_qualified.to_string();
        }

        let (first, rest) = match name.split_once(SEPARATOR) {
            Some((first, rest)) => (first, Some(rest)),
            None => (name, None),
        };

        if let (true, Some(rest)) = (first.eq_ignore_ascii_case("namespace"), rest) {
            return self.qualify(rest);
        }

        match self.imports.get(&first.to_ascii_lowercase()) {
            Some(imported) => match rest {
                Some(rest) => format!("{}{}{}", imported, SEPARATOR, rest),
                None => imported.clone(),
            },
            None => self.qualify(name),
        }
    }
}

/// Register the class imports of a `use` declaration.
///
/// Function and constant imports are ignored.
pub fn read_use_declaration(
    parsed: &ParsedFile,
    node: Node,
    scope: &mut FileScope,
) -> Result<(), ExtractionError> {
    if imports_non_class_symbols(node) {
        return Ok(());
    }

    let mut prefix = None;
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "namespace_name" => prefix = Some(parsed.render_node(child)?),
            "namespace_use_clause" => read_use_clause(parsed, child, None, scope)?,
            "namespace_use_group" => {
                let mut group_cursor = child.walk();
                for clause in child.named_children(&mut group_cursor) {
                    if matches!(
                        clause.kind(),
                        "namespace_use_clause" | "namespace_use_group_clause"
                    ) {
                        read_use_clause(parsed, clause, prefix, scope)?;
                    }
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn read_use_clause(
    parsed: &ParsedFile,
    clause: Node,
    prefix: Option<&str>,
    scope: &mut FileScope,
) -> Result<(), ExtractionError> {
    if imports_non_class_symbols(clause) {
        return Ok(());
    }

    let mut names = Vec::new();
    let mut alias = None;
    let mut cursor = clause.walk();
    for child in clause.named_children(&mut cursor) {
        match child.kind() {
            "name" | "qualified_name" | "namespace_name" => names.push(parsed.render_node(child)?),
            "namespace_aliasing_clause" => {
                let mut alias_cursor = child.walk();
                let alias_name = child
                    .named_children(&mut alias_cursor)
                    .find(|n| n.kind() == "name");
                if let Some(alias_name) = alias_name {
                    alias = Some(parsed.render_node(alias_name)?);
                }
            }
            _ => {}
        }
    }

    let Some(path) = names.first() else {
        return Err(ExtractionError::Malformed(
            "Import without a name".to_string(),
        ));
    };
    if alias.is_none() && names.len() > 1 {
        alias = names.last().copied();
    }

    let name = match prefix {
        Some(prefix) => format!(
            "{}{}{}",
            prefix.trim_start_matches('\\'),
            SEPARATOR,
            path.trim_start_matches('\\')
        ),
        None => path.to_string(),
    };
    scope.add_import(&name, alias);
    Ok(())
}

fn imports_non_class_symbols(node: Node) -> bool {
    has_child_of_kind(node, "function") || has_child_of_kind(node, "const")
}
