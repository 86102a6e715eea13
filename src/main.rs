use anyhow::{Context, Result};
use clap::Parser;
use interface_distiller::{
    find_class, get_parser, get_source_file_paths, php_language, Distiller, SignatureRenderer,
    PHP_FILE_EXTENSION,
};
use regex::Regex;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Generate a PHP interface from the public methods of a class.
#[derive(Parser, Debug)]
#[command(name = "interface-distiller", version)]
struct Cli {
    /// Fully-qualified name of the class to distill
    class: String,

    /// Source file or directory to search for the class
    #[arg(long, env = "INTERFACE_DISTILLER_SOURCE", default_value = ".")]
    source: PathBuf,

    /// Fully-qualified name of the generated interface
    #[arg(long)]
    interface: String,

    /// Interfaces the generated interface extends
    #[arg(long, value_delimiter = ',')]
    extends: Vec<String>,

    /// Write the interface to this file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Skip methods whose name starts with `__`
    #[arg(long)]
    exclude_magic_methods: bool,

    /// Skip methods named like the class
    #[arg(long)]
    exclude_old_style_constructors: bool,

    #[arg(long)]
    exclude_static_methods: bool,

    #[arg(long)]
    exclude_abstract_methods: bool,

    /// Skip methods declared by a parent class
    #[arg(long)]
    exclude_inherited_methods: bool,

    /// Skip methods that implement a method of one of the class's interfaces
    #[arg(long)]
    exclude_implemented_methods: bool,

    /// Keep only methods whose name matches this regular expression
    #[arg(long, value_name = "REGEX")]
    methods_matching: Option<String>,
}

fn main() -> Result<()> {
    if let Ok(filter) = EnvFilter::try_from_env("INTERFACE_DISTILLER_LOG") {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let cli = Cli::parse();

    let methods_matching = cli
        .methods_matching
        .as_deref()
        .map(Regex::new)
        .transpose()
        .context("Invalid --methods-matching pattern")?;

    let source_paths = get_source_file_paths(&cli.source, &[PHP_FILE_EXTENSION])
        .with_context(|| format!("Failed to list sources in {}", cli.source.display()))?;
    let mut parser = get_parser(&php_language())?;
    let class = find_class(&source_paths, &cli.class, &mut parser)?;

    let interface = Distiller::new()
        .extend_interfaces(cli.extends)
        .exclude_magic_methods(cli.exclude_magic_methods)
        .exclude_old_style_constructors(cli.exclude_old_style_constructors)
        .exclude_static_methods(cli.exclude_static_methods)
        .exclude_abstract_methods(cli.exclude_abstract_methods)
        .exclude_inherited_methods(cli.exclude_inherited_methods)
        .exclude_implemented_methods(cli.exclude_implemented_methods)
        .methods_matching(methods_matching)
        .distill(&class, &cli.interface);

    let rendered = SignatureRenderer::new()
        .render_to_string(&interface)
        .with_context(|| format!("Failed to render interface {}", cli.interface))?;

    match cli.output {
        Some(output) => fs::write(&output, rendered)
            .with_context(|| format!("Failed to write {}", output.display()))?,
        None => println!("{}", rendered),
    }
    Ok(())
}
