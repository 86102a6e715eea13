use crate::error::ExtractionError;
use crate::tree_sitter_helpers::ParsedFile;
use tree_sitter::Node;

/// Return the `/** ... */` comment immediately preceding a declaration, verbatim.
pub fn read_doc_comment(parsed: &ParsedFile, node: Node) -> Result<Option<String>, ExtractionError> {
    let Some(sibling) = node.prev_sibling() else {
        return Ok(None);
    };
    if sibling.kind() != "comment" {
        return Ok(None);
    }

    let text = parsed.render_node(sibling)?;
    Ok(is_doc_comment(text).then(|| text.to_string()))
}

fn is_doc_comment(comment: &str) -> bool {
    comment
        .strip_prefix("/**")
        .is_some_and(|rest| rest.starts_with(char::is_whitespace))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::setup_parser;
    use crate::tree_sitter_helpers::children_of_kind;

    fn read_function_doc_comment(source_code: &str) -> Option<String> {
        let mut parser = setup_parser();
        let parsed = ParsedFile::parse(source_code, &mut parser).unwrap();
        let function = children_of_kind(parsed.root_node(), "function_definition")[0];
        read_doc_comment(&parsed, function).unwrap()
    }

    #[test]
    fn no_comment() {
        let doc_comment = read_function_doc_comment("<?php\nfunction f() {}\n");

        assert!(doc_comment.is_none());
    }

    #[test]
    fn single_line_doc_comment() {
        let doc_comment = read_function_doc_comment("<?php\n/** Say hello. */\nfunction f() {}\n");

        assert_eq!(doc_comment.as_deref(), Some("/** Say hello. */"));
    }

    #[test]
    fn multi_line_doc_comment_is_verbatim() {
        let source_code = "<?php\n/**\n * Say hello.\n *\n * @return void\n */\nfunction f() {}\n";

        let doc_comment = read_function_doc_comment(source_code);

        assert_eq!(
            doc_comment.as_deref(),
            Some("/**\n * Say hello.\n *\n * @return void\n */")
        );
    }

    #[test]
    fn block_comment_is_not_a_doc_comment() {
        let doc_comment = read_function_doc_comment("<?php\n/* Say hello. */\nfunction f() {}\n");

        assert!(doc_comment.is_none());
    }

    #[test]
    fn line_comment_is_not_a_doc_comment() {
        let doc_comment = read_function_doc_comment("<?php\n// Say hello.\nfunction f() {}\n");

        assert!(doc_comment.is_none());
    }

    #[test]
    fn empty_block_comment_is_not_a_doc_comment() {
        assert!(!is_doc_comment("/**/"));
    }
}
