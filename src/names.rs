use crate::error::RenderError;
use std::fmt;

pub const NAMESPACE_SEPARATOR: char = '\\';

/// A namespace, as the ordered list of its segments.
///
/// The empty path is the global namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NamespacePath {
    segments: Vec<String>,
}

impl NamespacePath {
    pub fn global() -> Self {
        Self::default()
    }

    pub fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }

    pub fn is_global(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for NamespacePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, segment) in self.segments.iter().enumerate() {
            if index > 0 {
                write!(f, "{}", NAMESPACE_SEPARATOR)?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

/// A fully-qualified class or interface name, split into namespace and short name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    namespace: NamespacePath,
    short_name: String,
}

impl QualifiedName {
    /// Split a fully-qualified name on the namespace separator.
    ///
    /// A single leading separator is accepted. Returns `None` when any segment is
    /// empty or is not a valid identifier.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.strip_prefix(NAMESPACE_SEPARATOR).unwrap_or(name);
        let mut segments = name
            .split(NAMESPACE_SEPARATOR)
            .map(|segment| is_identifier(segment).then(|| segment.to_string()))
            .collect::<Option<Vec<_>>>()?;
        let short_name = segments.pop()?;
        Some(Self {
            namespace: NamespacePath::new(segments),
            short_name,
        })
    }

    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    pub fn namespace(&self) -> &NamespacePath {
        &self.namespace
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.namespace.is_global() {
            write!(f, "{}{}", self.namespace, NAMESPACE_SEPARATOR)?;
        }
        f.write_str(&self.short_name)
    }
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_alphabetic() || !first.is_ascii() => {
            chars.all(|c| c == '_' || c.is_alphanumeric() || !c.is_ascii())
        }
        _ => false,
    }
}

/// Where the generated interface lives.
///
/// Every type-resolution and import decision made during a render is relative to
/// this context, so it is derived once and passed down explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceContext {
    interface_name: QualifiedName,
}

impl NamespaceContext {
    pub fn from_interface_name(name: &str) -> Result<Self, RenderError> {
        let interface_name = QualifiedName::parse(name)
            .ok_or_else(|| RenderError::InvalidInterfaceName(name.to_string()))?;
        Ok(Self { interface_name })
    }

    pub fn is_global(&self) -> bool {
        self.interface_name.namespace().is_global()
    }

    pub fn namespace(&self) -> &NamespacePath {
        self.interface_name.namespace()
    }

    pub fn interface_short_name(&self) -> &str {
        self.interface_name.short_name()
    }
}
