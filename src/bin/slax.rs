//! Command-line interface for slax
//! Parses a SLAX file and prints the stylesheet tree it stands for.
//!
//! Usage:
//!   slax `<path>` [--format `<format>`] [--config `<file>`] [--debug]
//!   slax list-formats
//!
//! `-` as the path reads standard input. Diagnostics go to stderr; the exit
//! status is 1 when the file does not parse.

use clap::{Arg, ArgAction, Command};
use slax::slax::config::{Loader, SlaxConfig};
use slax::slax::formats::FormatRegistry;
use slax::slax::parsing::parse_file_with;
use slax::slax::trace;
use tracing::Level;

fn main() {
    let matches = Command::new("slax")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Parse SLAX scripts into XSLT stylesheet trees")
        .arg_required_else_help(true)
        .args_conflicts_with_subcommands(true)
        .arg(
            Arg::new("path")
                .help("Path to the SLAX file, or - for standard input")
                .index(1),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format (xml, treeviz, json, yaml)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Configuration file layered over the built-in defaults"),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .short('d')
                .help("Trace lexer decisions to stderr")
                .action(ArgAction::SetTrue),
        )
        .subcommand(Command::new("list-formats").about("List available output formats"))
        .get_matches();

    if let Some(("list-formats", _)) = matches.subcommand() {
        handle_list_formats_command();
        return;
    }

    let config = load_config(matches.get_one::<String>("config")).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });

    let debug = matches.get_flag("debug") || config.trace.enabled;
    init_tracing(debug);
    trace::set_enabled(debug);

    let Some(path) = matches.get_one::<String>("path") else {
        eprintln!("Error: no input file given");
        std::process::exit(1);
    };
    let format = matches
        .get_one::<String>("format")
        .cloned()
        .unwrap_or_else(|| config.output.format.clone());
    handle_parse_command(path, &format, &config);
}

fn load_config(path: Option<&String>) -> Result<SlaxConfig, config::ConfigError> {
    let loader = Loader::new();
    match path {
        Some(path) => loader.with_file(path).build(),
        None => loader.build(),
    }
}

fn init_tracing(debug: bool) {
    let level = if debug { Level::DEBUG } else { Level::WARN };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(debug)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

/// Parse `path` and print it in `format`
fn handle_parse_command(path: &str, format: &str, config: &SlaxConfig) {
    let registry = FormatRegistry::with_indent(&config.output.indent);
    if !registry.has(format) {
        eprintln!(
            "Unknown format '{}'; available: {}",
            format,
            registry.list_formats().join(", ")
        );
        std::process::exit(1);
    }

    let tree = parse_file_with(path, config.input.options()).unwrap_or_else(|e| {
        eprintln!("{}", e);
        std::process::exit(1);
    });

    let output = registry.serialize(&tree, format).unwrap_or_else(|e| {
        eprintln!("Serialization error: {}", e);
        std::process::exit(1);
    });
    print!("{}", output);
}

fn handle_list_formats_command() {
    let registry = FormatRegistry::default();
    println!("Available output formats:\n");
    for name in registry.list_formats() {
        let description = registry
            .get(&name)
            .map(|formatter| formatter.description())
            .unwrap_or_default();
        println!("  {}", name);
        println!("    {}", description);
    }
}
