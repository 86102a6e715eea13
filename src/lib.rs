mod distiller;
mod error;
mod listing;
mod literal;
mod names;
mod parsing;
mod reflection;
mod rendering;
mod tree_sitter_helpers;
mod types;

#[cfg(test)]
mod test_helpers;

pub use distiller::Distiller;
pub use error::{ExtractionError, RenderError};
pub use listing::get_source_file_paths;
pub use literal::{ArrayKey, PhpValue};
pub use names::{NamespaceContext, NamespacePath, QualifiedName};
pub use parsing::{get_parser, php_language, PHP_FILE_EXTENSION};
pub use reflection::{find_class, reflect_classes, ClassDescriptor, ReflectedMethod, Visibility};
pub use rendering::{SignatureRenderer, INDENT};
pub use tree_sitter_helpers::ParsedFile;
pub use types::{InterfaceDescriptor, MethodDescriptor, ParameterDescriptor, TypeRef};
