#![cfg(test)]

use crate::parsing::{get_parser, php_language};
use crate::types::{InterfaceDescriptor, MethodDescriptor, ParameterDescriptor, TypeRef};
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;
use tree_sitter::Parser;

pub fn create_temp_dir() -> TempDir {
    TempDir::new().unwrap()
}

pub fn create_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let mut file = std::fs::File::create(path).unwrap();
    write!(file, "{}", content).unwrap();
}

pub fn setup_parser() -> Parser {
    get_parser(&php_language()).unwrap()
}

pub fn stub_interface(name: &str) -> InterfaceDescriptor {
    InterfaceDescriptor {
        fully_qualified_name: name.to_string(),
        extended_interface_names: Vec::new(),
        methods: Vec::new(),
    }
}

pub fn stub_method(name: &str) -> MethodDescriptor {
    MethodDescriptor {
        name: name.to_string(),
        is_static: false,
        doc_comment: None,
        parameters: Vec::new(),
        return_type: None,
    }
}

pub fn stub_parameter(name: &str) -> ParameterDescriptor {
    ParameterDescriptor {
        name: name.to_string(),
        type_ref: None,
        passed_by_reference: false,
        is_variadic: false,
        is_optional: false,
        default_value: None,
        allows_null: true,
    }
}

pub fn stub_typed_parameter(name: &str, type_ref: TypeRef) -> ParameterDescriptor {
    ParameterDescriptor {
        allows_null: type_ref.is_nullable,
        type_ref: Some(type_ref),
        ..stub_parameter(name)
    }
}
