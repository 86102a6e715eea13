use crate::error::ExtractionError;
use tree_sitter::{Language, Parser};

pub const PHP_FILE_EXTENSION: &str = "php";

/// The PHP grammar, accepting files that mix HTML and PHP code.
pub fn php_language() -> Language {
    tree_sitter_php::LANGUAGE_PHP.into()
}

pub fn get_parser(parser_language: &Language) -> Result<Parser, ExtractionError> {
    let mut parser = Parser::new();
    parser.set_language(parser_language).map_err(|e| {
        ExtractionError::Malformed(format!("Error setting language for parser: {}", e))
    })?;
    Ok(parser)
}
