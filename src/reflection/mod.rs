//! Reflection of PHP classes from their source code.

mod default_values;
mod doc_comments;
mod hierarchy;
mod members;
mod scope;
mod type_hints;

pub use members::{ReflectedMethod, Visibility};

use crate::error::ExtractionError;
use crate::tree_sitter_helpers::{children_of_kind, has_child_of_kind, ParsedFile};
use hierarchy::Hierarchy;
use members::reflect_method;
use scope::{read_use_declaration, FileScope};
use std::path::PathBuf;
use tree_sitter::{Node, Parser};

/// A class, interface or trait together with the methods available on it.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDescriptor {
    pub fully_qualified_name: String,
    pub parent_class: Option<String>,
    /// Interfaces a class implements, or the interfaces an interface extends
    pub implemented_interfaces: Vec<String>,
    pub used_traits: Vec<String>,
    pub is_abstract: bool,
    pub methods: Vec<ReflectedMethod>,
}

impl ClassDescriptor {
    pub fn short_name(&self) -> &str {
        self.fully_qualified_name
            .rsplit('\\')
            .next()
            .unwrap_or(&self.fully_qualified_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeclarationKind {
    Class,
    Interface,
    Trait,
}

impl DeclarationKind {
    fn of(node: Node) -> Option<Self> {
        match node.kind() {
            "class_declaration" => Some(Self::Class),
            "interface_declaration" => Some(Self::Interface),
            "trait_declaration" => Some(Self::Trait),
            _ => None,
        }
    }
}

/// A type declaration together with the scope its names resolve in.
struct Declaration<'tree> {
    fully_qualified_name: String,
    kind: DeclarationKind,
    node: Node<'tree>,
    scope: FileScope,
}

/// Reflect the classes declared in a file, as written.
///
/// Each class only carries the methods of its own body. Inherited and trait methods
/// are resolved by [`find_class`].
pub fn reflect_classes(parsed: &ParsedFile) -> Result<Vec<ClassDescriptor>, ExtractionError> {
    find_declarations(parsed)?
        .iter()
        .filter(|declaration| declaration.kind == DeclarationKind::Class)
        .map(|declaration| reflect_declaration(parsed, declaration))
        .collect()
}

/// Find a class by its fully-qualified name, which is matched case-insensitively,
/// and reflect every method available on it.
///
/// Parent classes, traits and interfaces are looked up in the same source files.
/// Methods declared in the class win over trait methods, which win over inherited
/// ones. Files that cannot be decoded or parsed are skipped, and only the
/// declarations actually needed are reflected.
pub fn find_class(
    source_paths: &[PathBuf],
    class_name: &str,
    parser: &mut Parser,
) -> Result<ClassDescriptor, ExtractionError> {
    let class_name = class_name.trim_start_matches('\\');
    let mut hierarchy = Hierarchy::new(source_paths, parser);
    let class = hierarchy
        .find(class_name, DeclarationKind::Class)?
        .ok_or_else(|| ExtractionError::ClassNotFound(class_name.to_string()))?;
    hierarchy.resolve_class(class)
}

fn find_declarations<'tree>(
    parsed: &'tree ParsedFile,
) -> Result<Vec<Declaration<'tree>>, ExtractionError> {
    let mut declarations = Vec::new();
    let mut scope = FileScope::default();
    collect_declarations(parsed, parsed.root_node(), &mut scope, &mut declarations)?;
    Ok(declarations)
}

fn collect_declarations<'tree>(
    parsed: &ParsedFile,
    node: Node<'tree>,
    scope: &mut FileScope,
    declarations: &mut Vec<Declaration<'tree>>,
) -> Result<(), ExtractionError> {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "namespace_definition" => {
                let namespace = match child.child_by_field_name("name") {
                    Some(name) => parsed.render_node(name)?,
                    None => "",
                };
                match child.child_by_field_name("body") {
                    Some(body) => {
                        let mut block_scope = FileScope::new(namespace);
                        collect_declarations(parsed, body, &mut block_scope, declarations)?;
                    }
                    None => scope.enter_namespace(namespace),
                }
            }
            "namespace_use_declaration" => read_use_declaration(parsed, child, scope)?,
            _ => {
                let Some(kind) = DeclarationKind::of(child) else {
                    continue;
                };
                let name = child.child_by_field_name("name").ok_or_else(|| {
                    ExtractionError::Malformed(format!("{:?} without a name", kind))
                })?;
                declarations.push(Declaration {
                    fully_qualified_name: scope.qualify(parsed.render_node(name)?),
                    kind,
                    node: child,
                    scope: scope.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Reflect a declaration on its own, without looking up what it inherits.
fn reflect_declaration(
    parsed: &ParsedFile,
    declaration: &Declaration,
) -> Result<ClassDescriptor, ExtractionError> {
    let node = declaration.node;
    let scope = &declaration.scope;

    let base_names = names_in_clauses(parsed, node, "base_clause", scope)?;
    let mut implemented_interfaces =
        names_in_clauses(parsed, node, "class_interface_clause", scope)?;
    let parent_class = match declaration.kind {
        DeclarationKind::Interface => {
            implemented_interfaces.extend(base_names);
            None
        }
        DeclarationKind::Class | DeclarationKind::Trait => base_names.into_iter().next(),
    };

    let (methods, used_traits) = match node.child_by_field_name("body") {
        Some(body) => (
            children_of_kind(body, "method_declaration")
                .into_iter()
                .map(|method| {
                    reflect_method(parsed, method, scope, &declaration.fully_qualified_name)
                })
                .collect::<Result<Vec<_>, _>>()?,
            names_in_clauses(parsed, body, "use_declaration", scope)?,
        ),
        None => (Vec::new(), Vec::new()),
    };

    Ok(ClassDescriptor {
        fully_qualified_name: declaration.fully_qualified_name.clone(),
        parent_class,
        implemented_interfaces,
        used_traits,
        is_abstract: has_child_of_kind(node, "abstract_modifier"),
        methods,
    })
}

/// Resolve the class names listed in the `clause_kind` children of `node`, such as
/// `extends`, `implements` and trait `use` clauses.
fn names_in_clauses(
    parsed: &ParsedFile,
    node: Node,
    clause_kind: &str,
    scope: &FileScope,
) -> Result<Vec<String>, ExtractionError> {
    let mut names = Vec::new();
    for clause in children_of_kind(node, clause_kind) {
        let mut cursor = clause.walk();
        for name in clause
            .named_children(&mut cursor)
            .filter(|child| matches!(child.kind(), "name" | "qualified_name"))
        {
            names.push(scope.resolve_class_name(parsed.render_node(name)?));
        }
    }
    Ok(names)
}
