use crate::literal::PhpValue;

/// The aliases a class uses to refer to itself and to its parent class.
pub const SELF_REFERENTIAL_ALIASES: [&str; 2] = ["self", "parent"];

/// The interface to generate.
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDescriptor {
    /// Fully-qualified interface name, e.g. `App\Shop\Orderable`
    pub fully_qualified_name: String,
    /// Interfaces to extend, printed verbatim in the given order
    pub extended_interface_names: Vec<String>,
    pub methods: Vec<MethodDescriptor>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDescriptor {
    pub name: String,
    pub is_static: bool,
    /// Raw doc comment, delimiters included
    pub doc_comment: Option<String>,
    pub parameters: Vec<ParameterDescriptor>,
    pub return_type: Option<TypeRef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDescriptor {
    pub name: String,
    pub type_ref: Option<TypeRef>,
    pub passed_by_reference: bool,
    pub is_variadic: bool,
    pub is_optional: bool,
    /// The default value, when it can be reproduced statically.
    ///
    /// An optional parameter without one has a default that depends on something
    /// only known at runtime, such as a constant.
    pub default_value: Option<PhpValue>,
    pub allows_null: bool,
}

/// A reference to a type from a parameter or return position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    /// Built-in name, self-referential alias or fully-qualified class name
    pub name: String,
    pub is_builtin: bool,
    pub is_nullable: bool,
}

impl TypeRef {
    pub fn builtin(name: &str) -> Self {
        Self {
            name: name.to_string(),
            is_builtin: true,
            is_nullable: false,
        }
    }

    pub fn nominal(fully_qualified_name: &str) -> Self {
        Self {
            name: fully_qualified_name.to_string(),
            is_builtin: false,
            is_nullable: false,
        }
    }

    pub fn nullable(self) -> Self {
        Self {
            is_nullable: true,
            ..self
        }
    }

    pub fn is_self_referential(&self) -> bool {
        SELF_REFERENTIAL_ALIASES
            .iter()
            .any(|alias| alias.eq_ignore_ascii_case(&self.name))
    }

    /// Whether the name is subject to namespace rules.
    pub fn is_nominal(&self) -> bool {
        !self.is_builtin && !self.is_self_referential()
    }
}
