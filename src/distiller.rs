use crate::reflection::{ClassDescriptor, ReflectedMethod, Visibility};
use crate::types::{InterfaceDescriptor, MethodDescriptor};
use regex::Regex;
use tracing::debug;

const MAGIC_METHOD_PREFIX: &str = "__";

/// Selects which public methods of a class make it into the distilled interface.
#[derive(Debug, Clone, Default)]
pub struct Distiller {
    extended_interface_names: Vec<String>,
    exclude_magic_methods: bool,
    exclude_old_style_constructors: bool,
    exclude_static_methods: bool,
    exclude_abstract_methods: bool,
    exclude_inherited_methods: bool,
    exclude_implemented_methods: bool,
    method_pattern: Option<Regex>,
}

impl Distiller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interfaces the distilled interface extends, as fully-qualified names.
    pub fn extend_interfaces(mut self, interface_names: Vec<String>) -> Self {
        self.extended_interface_names = interface_names;
        self
    }

    pub fn exclude_magic_methods(mut self, exclude: bool) -> Self {
        self.exclude_magic_methods = exclude;
        self
    }

    pub fn exclude_old_style_constructors(mut self, exclude: bool) -> Self {
        self.exclude_old_style_constructors = exclude;
        self
    }

    pub fn exclude_static_methods(mut self, exclude: bool) -> Self {
        self.exclude_static_methods = exclude;
        self
    }

    pub fn exclude_abstract_methods(mut self, exclude: bool) -> Self {
        self.exclude_abstract_methods = exclude;
        self
    }

    /// Skip methods declared by a parent class. Trait methods count as the class's own.
    pub fn exclude_inherited_methods(mut self, exclude: bool) -> Self {
        self.exclude_inherited_methods = exclude;
        self
    }

    /// Skip methods that implement a method of one of the class's interfaces.
    pub fn exclude_implemented_methods(mut self, exclude: bool) -> Self {
        self.exclude_implemented_methods = exclude;
        self
    }

    /// Keep only the methods whose name matches `pattern`.
    pub fn methods_matching(mut self, pattern: Option<Regex>) -> Self {
        self.method_pattern = pattern;
        self
    }

    pub fn distill(&self, class: &ClassDescriptor, interface_name: &str) -> InterfaceDescriptor {
        let methods: Vec<MethodDescriptor> = class
            .methods
            .iter()
            .filter(|method| match self.exclusion_reason(class, method) {
                Some(reason) => {
                    debug!(method = %method.descriptor.name, reason, "Excluding method");
                    false
                }
                None => true,
            })
            .map(|method| method.descriptor.clone())
            .collect();

        debug!(
            class = %class.fully_qualified_name,
            interface = interface_name,
            methods = methods.len(),
            "Distilled interface"
        );

        InterfaceDescriptor {
            fully_qualified_name: interface_name.to_string(),
            extended_interface_names: self.extended_interface_names.clone(),
            methods,
        }
    }

    fn exclusion_reason(
        &self,
        class: &ClassDescriptor,
        method: &ReflectedMethod,
    ) -> Option<&'static str> {
        let name = method.descriptor.name.as_str();
        if method.visibility != Visibility::Public {
            Some("not public")
        } else if self.exclude_magic_methods && name.starts_with(MAGIC_METHOD_PREFIX) {
            Some("magic method")
        } else if self.exclude_old_style_constructors
            && name.eq_ignore_ascii_case(class.short_name())
        {
            Some("old-style constructor")
        } else if self.exclude_static_methods && method.descriptor.is_static {
            Some("static method")
        } else if self.exclude_abstract_methods && method.is_abstract {
            Some("abstract method")
        } else if self.exclude_inherited_methods
            && !method
                .declaring_class
                .eq_ignore_ascii_case(&class.fully_qualified_name)
        {
            Some("inherited method")
        } else if self.exclude_implemented_methods && method.implemented_interface.is_some() {
            Some("implements an interface method")
        } else if self
            .method_pattern
            .as_ref()
            .is_some_and(|pattern| !pattern.is_match(name))
        {
            Some("name does not match pattern")
        } else {
            None
        }
    }
}
