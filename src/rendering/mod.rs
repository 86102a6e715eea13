mod imports;
mod signatures;

use crate::error::RenderError;
use crate::names::NamespaceContext;
use crate::types::InterfaceDescriptor;
use imports::{collect_imports, render_use_statement};
use signatures::render_method;
use std::io::{self, Write};

/// Characters used for indentation
pub const INDENT: &str = "    ";

const OPENING_TAG: &str = "<?php";

/// Writes PHP interface declarations.
///
/// The renderer keeps no state between or during calls, so a single instance can
/// be shared across threads.
#[derive(Debug, Default, Clone, Copy)]
pub struct SignatureRenderer;

impl SignatureRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Write the declaration of `interface` to `sink`.
    ///
    /// Stops at the first error. Whatever was written before it is incomplete and
    /// must be discarded by the caller.
    pub fn render<W: Write>(
        &self,
        interface: &InterfaceDescriptor,
        sink: &mut W,
    ) -> Result<(), RenderError> {
        write!(sink, "{}\n\n", OPENING_TAG)?;

        let context = NamespaceContext::from_interface_name(&interface.fully_qualified_name)?;
        if !context.is_global() {
            write!(sink, "namespace {};\n\n", context.namespace())?;
        }

        let imports = collect_imports(&interface.methods, &context)?;
        for import in &imports {
            writeln!(sink, "{}", render_use_statement(import))?;
        }
        if !imports.is_empty() {
            writeln!(sink)?;
        }

        writeln!(
            sink,
            "{}",
            interface_signature(&context, &interface.extended_interface_names)
        )?;
        writeln!(sink, "{{")?;
        for method in &interface.methods {
            write!(sink, "{}", render_method(method)?)?;
            writeln!(sink)?;
        }
        write!(sink, "}}")?;

        Ok(())
    }

    /// Render into memory, so that nothing is produced unless rendering succeeds.
    pub fn render_to_string(&self, interface: &InterfaceDescriptor) -> Result<String, RenderError> {
        let mut buffer = Vec::new();
        self.render(interface, &mut buffer)?;
        String::from_utf8(buffer)
            .map_err(|e| RenderError::SinkWrite(io::Error::new(io::ErrorKind::InvalidData, e)))
    }
}

fn interface_signature(context: &NamespaceContext, extended_interface_names: &[String]) -> String {
    let mut signature = format!("interface {}", context.interface_short_name());
    if !extended_interface_names.is_empty() {
        signature.push_str(" extends ");
        signature.push_str(&extended_interface_names.join(", "));
    }
    signature
}
