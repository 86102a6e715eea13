use super::{
    find_declarations, reflect_declaration, ClassDescriptor, DeclarationKind, ReflectedMethod,
};
use crate::error::ExtractionError;
use crate::tree_sitter_helpers::ParsedFile;
use std::collections::VecDeque;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};
use tree_sitter::Parser;

enum Source {
    Unread,
    Skipped,
    Loaded(String),
}

/// Looks up declarations across source files and resolves what a class inherits.
pub(super) struct Hierarchy<'a> {
    source_paths: &'a [PathBuf],
    sources: Vec<Source>,
    parser: &'a mut Parser,
    /// Lower-cased names of the declarations currently being resolved
    resolving: Vec<String>,
}

impl<'a> Hierarchy<'a> {
    pub(super) fn new(source_paths: &'a [PathBuf], parser: &'a mut Parser) -> Self {
        Self {
            source_paths,
            sources: source_paths.iter().map(|_| Source::Unread).collect(),
            parser,
            resolving: Vec::new(),
        }
    }

    /// Find and reflect the first declaration of `kind` named `name`, on its own.
    pub(super) fn find(
        &mut self,
        name: &str,
        kind: DeclarationKind,
    ) -> Result<Option<ClassDescriptor>, ExtractionError> {
        let name = name.trim_start_matches('\\');
        let source_paths = self.source_paths;

        for (index, path) in source_paths.iter().enumerate() {
            if let Source::Unread = self.sources[index] {
                self.sources[index] = load_source(path, self.parser)?;
            }
            let Source::Loaded(source_code) = &self.sources[index] else {
                continue;
            };

            let parsed = ParsedFile::parse(source_code, self.parser)?;
            let declarations = find_declarations(&parsed)?;
            trace!(path = %path.display(), declarations = declarations.len(), "Scanned file");
            if let Some(declaration) = declarations.iter().find(|declaration| {
                declaration.kind == kind
                    && declaration.fully_qualified_name.eq_ignore_ascii_case(name)
            }) {
                debug!(
                    path = %path.display(),
                    name = %declaration.fully_qualified_name,
                    ?kind,
                    "Found declaration"
                );
                return reflect_declaration(&parsed, declaration).map(Some);
            }
        }

        Ok(None)
    }

    /// Add the methods `class` gets from its traits, parent classes and interfaces.
    pub(super) fn resolve_class(
        &mut self,
        mut class: ClassDescriptor,
    ) -> Result<ClassDescriptor, ExtractionError> {
        self.enter(&class.fully_qualified_name)?;

        let trait_methods = self.trait_methods(&class.used_traits, &class.fully_qualified_name)?;
        merge_methods(&mut class.methods, trait_methods);

        if let Some(parent_name) = class.parent_class.clone() {
            match self.find(&parent_name, DeclarationKind::Class)? {
                Some(parent) => {
                    let parent = self.resolve_class(parent)?;
                    merge_methods(&mut class.methods, parent.methods);
                    class.implemented_interfaces.extend(parent.implemented_interfaces);
                }
                None => warn!(
                    class = %class.fully_qualified_name,
                    parent = %parent_name,
                    "Parent class not found in sources"
                ),
            }
        }

        let (interfaces, interface_methods) =
            self.interface_methods(&class.implemented_interfaces)?;
        class.implemented_interfaces = interfaces;
        for method in &mut class.methods {
            let implemented_interface = interface_methods
                .iter()
                .find(|declared| same_name(declared, method))
                .and_then(|declared| declared.implemented_interface.clone());
            method.implemented_interface = implemented_interface;
        }
        // Interface methods left unimplemented by an abstract class
        merge_methods(&mut class.methods, interface_methods);

        self.leave();
        Ok(class)
    }

    /// Methods of the given traits, as members of the class using them.
    fn trait_methods(
        &mut self,
        trait_names: &[String],
        using_class: &str,
    ) -> Result<Vec<ReflectedMethod>, ExtractionError> {
        let mut methods = Vec::new();
        for trait_name in trait_names {
            let Some(used_trait) = self.find(trait_name, DeclarationKind::Trait)? else {
                warn!(class = using_class, trait_name = %trait_name, "Trait not found in sources");
                continue;
            };

            self.enter(&used_trait.fully_qualified_name)?;
            let mut trait_methods = used_trait.methods;
            let nested_methods = self.trait_methods(&used_trait.used_traits, using_class)?;
            merge_methods(&mut trait_methods, nested_methods);
            self.leave();

            for method in &mut trait_methods {
                method.declaring_class = using_class.to_string();
            }
            merge_methods(&mut methods, trait_methods);
        }
        Ok(methods)
    }

    /// Every interface reachable from `interface_names` and the methods they declare.
    fn interface_methods(
        &mut self,
        interface_names: &[String],
    ) -> Result<(Vec<String>, Vec<ReflectedMethod>), ExtractionError> {
        let mut interfaces: Vec<String> = Vec::new();
        let mut methods = Vec::new();
        let mut pending: VecDeque<String> = interface_names.iter().cloned().collect();

        while let Some(name) = pending.pop_front() {
            if interfaces.iter().any(|known| known.eq_ignore_ascii_case(&name)) {
                continue;
            }
            interfaces.push(name.clone());

            match self.find(&name, DeclarationKind::Interface)? {
                Some(interface) => {
                    let declared = interface
                        .methods
                        .into_iter()
                        .map(|method| ReflectedMethod {
                            is_abstract: true,
                            implemented_interface: Some(interface.fully_qualified_name.clone()),
                            ..method
                        })
                        .collect();
                    merge_methods(&mut methods, declared);
                    pending.extend(interface.implemented_interfaces);
                }
                None => debug!(interface = %name, "Interface not found in sources"),
            }
        }

        Ok((interfaces, methods))
    }

    fn enter(&mut self, name: &str) -> Result<(), ExtractionError> {
        let key = name.to_ascii_lowercase();
        if self.resolving.contains(&key) {
            return Err(ExtractionError::Malformed(format!(
                "Circular inheritance involving {}",
                name
            )));
        }
        self.resolving.push(key);
        Ok(())
    }

    fn leave(&mut self) {
        self.resolving.pop();
    }
}

/// Read a file that may hold declarations, skipping it if it is not UTF-8 PHP.
fn load_source(path: &Path, parser: &mut Parser) -> Result<Source, ExtractionError> {
    let source_code = match fs::read_to_string(path) {
        Ok(source_code) => source_code,
        Err(error) if error.kind() == ErrorKind::InvalidData => {
            warn!(path = %path.display(), %error, "Skipping file that is not valid UTF-8");
            return Ok(Source::Skipped);
        }
        Err(error) => return Err(error.into()),
    };

    if let Err(error) = ParsedFile::parse(&source_code, parser) {
        warn!(path = %path.display(), %error, "Skipping unparsable file");
        return Ok(Source::Skipped);
    }
    Ok(Source::Loaded(source_code))
}

fn same_name(first: &ReflectedMethod, second: &ReflectedMethod) -> bool {
    first
        .descriptor
        .name
        .eq_ignore_ascii_case(&second.descriptor.name)
}

/// Append the methods of `inherited` that `methods` does not already have.
fn merge_methods(methods: &mut Vec<ReflectedMethod>, inherited: Vec<ReflectedMethod>) {
    for method in inherited {
        if !methods.iter().any(|existing| same_name(existing, &method)) {
            methods.push(method);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::find_class;
    use super::*;
    use crate::test_helpers::{create_file, create_temp_dir, setup_parser};
    use crate::types::TypeRef;
    use assertables::assert_contains;

    /// Write each `(file name, source)` pair and find `class_name` across them.
    fn find_in_files(
        files: &[(&str, &str)],
        class_name: &str,
    ) -> Result<ClassDescriptor, ExtractionError> {
        let temp_dir = create_temp_dir();
        let paths: Vec<PathBuf> = files
            .iter()
            .map(|(file_name, source_code)| {
                let path = temp_dir.path().join(file_name);
                create_file(&path, source_code);
                path
            })
            .collect();
        let mut parser = setup_parser();
        find_class(&paths, class_name, &mut parser)
    }

    fn method_names(class: &ClassDescriptor) -> Vec<&str> {
        class
            .methods
            .iter()
            .map(|method| method.descriptor.name.as_str())
            .collect()
    }

    fn method<'c>(class: &'c ClassDescriptor, name: &str) -> &'c ReflectedMethod {
        class
            .methods
            .iter()
            .find(|method| method.descriptor.name == name)
            .unwrap()
    }

    mod parents {
        use super::*;

        #[test]
        fn parent_methods_in_same_file() {
            let class = find_in_files(
                &[(
                    "Cart.php",
                    "<?php\nnamespace App;\n\nclass Base\n{\n    public function total(): int {}\n}\n\nclass Cart extends Base\n{\n    public function add(int $n): void {}\n}\n",
                )],
                "App\\Cart",
            )
            .unwrap();

            assert_eq!(method_names(&class), vec!["add", "total"]);
            assert_eq!(method(&class, "add").declaring_class, "App\\Cart");
            assert_eq!(method(&class, "total").declaring_class, "App\\Base");
            assert_eq!(
                method(&class, "total").descriptor.return_type,
                Some(TypeRef::builtin("int"))
            );
        }

        #[test]
        fn own_methods_override_parent_methods() {
            let class = find_in_files(
                &[(
                    "Cart.php",
                    "<?php\nclass Base\n{\n    public function total(): int {}\n}\nclass Cart extends Base\n{\n    public function TOTAL(): float {}\n}\n",
                )],
                "Cart",
            )
            .unwrap();

            assert_eq!(method_names(&class), vec!["TOTAL"]);
            assert_eq!(method(&class, "TOTAL").declaring_class, "Cart");
        }

        #[test]
        fn ancestors_across_files() {
            let class = find_in_files(
                &[
                    (
                        "Cart.php",
                        "<?php\nnamespace App;\nuse Lib\\Collection;\nclass Cart extends Collection\n{\n    public function add() {}\n}\n",
                    ),
                    (
                        "Collection.php",
                        "<?php\nnamespace Lib;\nclass Collection extends Base\n{\n    public function count() {}\n}\n",
                    ),
                    (
                        "Base.php",
                        "<?php\nnamespace Lib;\nclass Base\n{\n    public function toArray() {}\n}\n",
                    ),
                ],
                "App\\Cart",
            )
            .unwrap();

            assert_eq!(method_names(&class), vec!["add", "count", "toArray"]);
            assert_eq!(method(&class, "toArray").declaring_class, "Lib\\Base");
        }

        #[test]
        fn missing_parent_keeps_own_methods() {
            let class = find_in_files(
                &[(
                    "Cart.php",
                    "<?php\nclass Cart extends \\Vendor\\Model\n{\n    public function add() {}\n}\n",
                )],
                "Cart",
            )
            .unwrap();

            assert_eq!(class.parent_class.as_deref(), Some("Vendor\\Model"));
            assert_eq!(method_names(&class), vec!["add"]);
        }

        #[test]
        fn circular_inheritance() {
            let result = find_in_files(
                &[(
                    "Cart.php",
                    "<?php\nclass Cart extends Base {}\nclass Base extends Cart {}\n",
                )],
                "Cart",
            );

            assert!(matches!(result, Err(ExtractionError::Malformed(_))));
        }
    }

    mod traits {
        use super::*;

        #[test]
        fn trait_methods_belong_to_the_using_class() {
            let class = find_in_files(
                &[(
                    "Cart.php",
                    "<?php\nnamespace App;\ntrait Totals\n{\n    public function total() {}\n}\nclass Cart\n{\n    use Totals;\n    public function add() {}\n}\n",
                )],
                "App\\Cart",
            )
            .unwrap();

            assert_eq!(method_names(&class), vec!["add", "total"]);
            assert_eq!(method(&class, "total").declaring_class, "App\\Cart");
        }

        #[test]
        fn nested_traits() {
            let class = find_in_files(
                &[(
                    "Cart.php",
                    "<?php\ntrait Counts\n{\n    public function count() {}\n}\ntrait Totals\n{\n    use Counts;\n    public function total() {}\n}\nclass Cart\n{\n    use Totals;\n}\n",
                )],
                "Cart",
            )
            .unwrap();

            assert_eq!(method_names(&class), vec!["total", "count"]);
            assert_eq!(method(&class, "count").declaring_class, "Cart");
        }

        #[test]
        fn trait_methods_override_parent_methods() {
            let class = find_in_files(
                &[(
                    "Cart.php",
                    "<?php\nclass Base\n{\n    public function total(): int {}\n}\ntrait Totals\n{\n    public function total(): float {}\n}\nclass Cart extends Base\n{\n    use Totals;\n}\n",
                )],
                "Cart",
            )
            .unwrap();

            assert_eq!(method_names(&class), vec!["total"]);
            assert_eq!(
                method(&class, "total").descriptor.return_type,
                Some(TypeRef::builtin("float"))
            );
        }
    }

    mod interfaces {
        use super::*;

        #[test]
        fn implemented_methods_are_marked() {
            let class = find_in_files(
                &[(
                    "Cart.php",
                    "<?php\nnamespace App;\ninterface Sized\n{\n    public function size(): int;\n}\nclass Cart implements Sized\n{\n    public function size(): int {}\n    public function add() {}\n}\n",
                )],
                "App\\Cart",
            )
            .unwrap();

            assert_eq!(method_names(&class), vec!["size", "add"]);
            assert_eq!(
                method(&class, "size").implemented_interface.as_deref(),
                Some("App\\Sized")
            );
            assert!(method(&class, "add").implemented_interface.is_none());
            assert!(!method(&class, "size").is_abstract);
        }

        #[test]
        fn interfaces_of_parents_and_extended_interfaces() {
            let class = find_in_files(
                &[(
                    "Cart.php",
                    "<?php\ninterface Countable\n{\n    public function count(): int;\n}\ninterface Collection extends Countable {}\nclass Base implements Collection\n{\n    public function count(): int {}\n}\nclass Cart extends Base {}\n",
                )],
                "Cart",
            )
            .unwrap();

            assert_contains!(class.implemented_interfaces, &"Collection".to_string());
            assert_contains!(class.implemented_interfaces, &"Countable".to_string());
            assert_eq!(
                method(&class, "count").implemented_interface.as_deref(),
                Some("Countable")
            );
        }

        #[test]
        fn unimplemented_interface_methods_of_abstract_class() {
            let class = find_in_files(
                &[(
                    "Cart.php",
                    "<?php\ninterface Sized\n{\n    public function size(): int;\n}\nabstract class Cart implements Sized {}\n",
                )],
                "Cart",
            )
            .unwrap();

            assert_eq!(method_names(&class), vec!["size"]);
            assert!(method(&class, "size").is_abstract);
            assert_eq!(method(&class, "size").declaring_class, "Sized");
        }

        #[test]
        fn interfaces_missing_from_sources_are_kept() {
            let class = find_in_files(
                &[(
                    "Cart.php",
                    "<?php\nclass Cart implements \\Countable\n{\n    public function count(): int {}\n}\n",
                )],
                "Cart",
            )
            .unwrap();

            assert_eq!(class.implemented_interfaces, vec!["Countable".to_string()]);
            assert!(method(&class, "count").implemented_interface.is_none());
        }
    }
}
