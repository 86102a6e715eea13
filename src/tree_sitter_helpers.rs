use crate::error::ExtractionError;
use tree_sitter::{Node, Parser, Tree};

/// A parsed PHP source file with its tree-sitter parse tree and original source code.
pub struct ParsedFile<'a> {
    root_tree: Tree,
    source_code: &'a str,
}

impl<'a> ParsedFile<'a> {
    /// Parse source code into a tree-sitter parse tree.
    ///
    /// # Parameters
    /// * `source_code` - The source code to parse
    /// * `parser` - A mutable reference to a parser configured for PHP
    ///
    /// # Returns
    /// A new `ParsedFile` instance or an `ExtractionError` if the source has syntax errors
    pub fn parse(source_code: &'a str, parser: &mut Parser) -> Result<Self, ExtractionError> {
        let root_tree = parser
            .parse(source_code, None)
            .ok_or_else(|| ExtractionError::Malformed("Failed to parse source file".to_string()))?;

        if root_tree.root_node().has_error() {
            return Err(ExtractionError::Malformed(
                "Failed to parse source file".to_string(),
            ));
        }

        Ok(Self {
            root_tree,
            source_code,
        })
    }

    /// Get the root node of the parse tree.
    ///
    /// # Returns
    /// The `program` node spanning the whole file
    pub fn root_node(&self) -> Node<'_> {
        self.root_tree.root_node()
    }

    /// Return a node's text content, borrowed from the source code.
    ///
    /// # Parameters
    /// * `node` - A node of this file's parse tree
    ///
    /// # Returns
    /// The source text the node spans, or an `ExtractionError` if its byte range is not a
    /// valid slice of the source
    pub fn render_node(&self, node: Node) -> Result<&'a str, ExtractionError> {
        let source_code: &'a str = self.source_code;
        source_code
            .get(node.byte_range())
            .ok_or_else(|| ExtractionError::Malformed("Failed to render node".to_string()))
    }
}

/// Return the named children of `node` with the given kind.
pub fn children_of_kind<'tree>(node: Node<'tree>, kind: &str) -> Vec<Node<'tree>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() == kind)
        .collect()
}

/// Whether `node` has a direct child, named or anonymous, of the given kind.
pub fn has_child_of_kind(node: Node, kind: &str) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|child| child.kind() == kind);
    found
}
