// Command-line interface for doclens
//
// doclens edits structured documents through an HTML view of them. `get` derives the view from a
// concrete document, the user edits it with any HTML tool, and `put` writes the edits back into
// the original document. Everything the view cannot show survives the round trip.
//
// Usage:
//  doclens get <document.xml> [-o view.html]                   - Derive the abstract HTML
//  doclens put <document.xml> <view.html> [-o out.xml]         - Write an edited view back
//  doclens create <view.html> [-o document.xml]                - Build a new concrete document
//  doclens normalize <view.html>                               - Canonical shape of a view
//  doclens inspect <path> [treeviz|json]                       - Show a tree with seqNos
//  doclens bdt move <count> <from> <to> | bdt remove <i>...    - Reconciliation scenarios
//  doclens --list-formats                                      - List registered formats
//
// The concrete format is detected from the file extension and can be forced with --format.
// Logging goes to stderr; RUST_LOG overrides the configured filter.

use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use doclens::demo::{run_move, run_remove};
use doclens::inspect::{json, treeviz, TreevizOptions};
use doclens::normalize::{normalize_document, push_down_inline_properties};
use doclens::xml::{parse_html, parse_xml, serialize_xml, ParseOptions};
use doclens::{ConvertOptions, Document, FormatRegistry};
use doclens_config::{DoclensConfig, Loader};
use std::fs;
use tracing::info;
use tracing_subscriber::EnvFilter;

const INSPECT_VIEWS: &[&str] = &["treeviz", "json"];

fn format_arg() -> Arg {
    Arg::new("format")
        .long("format")
        .short('f')
        .help("Concrete format (auto-detected from the file extension if not specified)")
        .value_hint(ValueHint::Other)
}

fn output_arg() -> Arg {
    Arg::new("output")
        .long("output")
        .short('o')
        .help("Output file path (defaults to stdout)")
        .value_hint(ValueHint::FilePath)
}

fn build_cli() -> Command {
    Command::new("doclens")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Edit structured documents through an HTML view")
        .long_about(
            "doclens derives an editable XHTML view of a concrete document and writes edits to\n\
            that view back into the original, leaving everything the view cannot show intact.\n\n\
            Examples:\n  \
            doclens get word/document.xml -o view.html\n  \
            doclens put word/document.xml view.html -o word/document.xml\n  \
            doclens inspect word/document.xml\n  \
            doclens bdt move 2 0 6",
        )
        .arg_required_else_help(true)
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available formats")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a doclens.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("id-prefix")
                .long("id-prefix")
                .value_name("PREFIX")
                .help("Prefix of the id attributes that link the view to the document")
                .global(true),
        )
        .subcommand(
            Command::new("get")
                .about("Derive the abstract HTML view of a concrete document")
                .arg(
                    Arg::new("input")
                        .help("Concrete document")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(format_arg())
                .arg(output_arg()),
        )
        .subcommand(
            Command::new("put")
                .about("Write an edited HTML view back into its concrete document")
                .long_about(
                    "Reconcile the concrete document with an edited view.\n\n\
                    Elements of the view keep their link to the document through their id\n\
                    attribute. Elements without one are created, document nodes no element\n\
                    refers to any more are removed, and nodes the view never showed stay put.",
                )
                .arg(
                    Arg::new("concrete")
                        .help("Concrete document the view was derived from")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("abstract")
                        .help("Edited HTML view")
                        .required(true)
                        .index(2)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(format_arg())
                .arg(output_arg())
                .arg(
                    Arg::new("no-normalize")
                        .long("no-normalize")
                        .help("Write the view back exactly as given, without normalizing it first")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("stats")
                        .long("stats")
                        .help("Print retained / created / removed / dropped counts to stderr")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("create")
                .about("Build a new concrete document from an HTML view")
                .arg(
                    Arg::new("abstract")
                        .help("HTML view")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    format_arg()
                        .default_value("word")
                        .help("Concrete format to create"),
                )
                .arg(output_arg()),
        )
        .subcommand(
            Command::new("normalize")
                .about("Print an HTML view in the canonical shape used before a put")
                .arg(
                    Arg::new("abstract")
                        .help("HTML view")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(output_arg()),
        )
        .subcommand(
            Command::new("inspect")
                .about("Show the node tree of a document with seqNos")
                .arg(
                    Arg::new("path")
                        .help("Concrete document or HTML view (.html, .xhtml)")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("view")
                        .help("Output view. Defaults to 'treeviz'")
                        .required(false)
                        .value_parser(clap::builder::PossibleValuesParser::new(INSPECT_VIEWS))
                        .index(2),
                )
                .arg(
                    Arg::new("attributes")
                        .long("attributes")
                        .help("Show attributes in the tree view")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("bdt")
                .about("Run reconciliation scenarios over a list of named items")
                .long_about(
                    "Items with a one-character name are visible, longer names are invisible.\n\
                    The abstract list only holds the visible ones, indexed from 0.",
                )
                .subcommand_required(true)
                .subcommand(
                    Command::new("move")
                        .about("Move <count> items from <from> to before the item at <to>")
                        .arg(index_arg("count", 1))
                        .arg(index_arg("from", 2))
                        .arg(index_arg("to", 3)),
                )
                .subcommand(
                    Command::new("remove")
                        .about("Remove the items at the given indices")
                        .arg(
                            Arg::new("indices")
                                .required(true)
                                .num_args(1..)
                                .value_parser(clap::value_parser!(usize)),
                        ),
                ),
        )
}

fn index_arg(name: &'static str, index: usize) -> Arg {
    Arg::new(name)
        .required(true)
        .index(index)
        .value_parser(clap::value_parser!(usize))
}

fn main() {
    let matches = build_cli().get_matches();

    let mut config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));
    if let Some(prefix) = matches.get_one::<String>("id-prefix") {
        config.convert.id_prefix = prefix.clone();
    }
    init_logging(&config);

    if matches.get_flag("list-formats") {
        handle_list_formats_command();
        return;
    }

    match matches.subcommand() {
        Some(("get", sub_matches)) => {
            let input = required(sub_matches, "input");
            let format = resolve_format(sub_matches, input);
            handle_get_command(input, &format, output_path(sub_matches), &config);
        }
        Some(("put", sub_matches)) => {
            let concrete = required(sub_matches, "concrete");
            let abstract_path = required(sub_matches, "abstract");
            let format = resolve_format(sub_matches, concrete);
            if sub_matches.get_flag("no-normalize") {
                config.convert.normalize_before_put = false;
            }
            handle_put_command(
                concrete,
                abstract_path,
                &format,
                output_path(sub_matches),
                sub_matches.get_flag("stats"),
                &config,
            );
        }
        Some(("create", sub_matches)) => {
            let abstract_path = required(sub_matches, "abstract");
            let format = required(sub_matches, "format");
            handle_create_command(abstract_path, format, output_path(sub_matches), &config);
        }
        Some(("normalize", sub_matches)) => {
            let abstract_path = required(sub_matches, "abstract");
            handle_normalize_command(abstract_path, output_path(sub_matches), &config);
        }
        Some(("inspect", sub_matches)) => {
            let path = required(sub_matches, "path");
            let view = sub_matches
                .get_one::<String>("view")
                .map(|s| s.as_str())
                .unwrap_or("treeviz");
            if sub_matches.get_flag("attributes") {
                config.inspect.show_attributes = true;
            }
            handle_inspect_command(path, view, &config);
        }
        Some(("bdt", sub_matches)) => match sub_matches.subcommand() {
            Some(("move", args)) => {
                let count = index_value(args, "count");
                let from = index_value(args, "from");
                let to = index_value(args, "to");
                print!("{}", run_move(count, from, to));
            }
            Some(("remove", args)) => {
                let indices: Vec<usize> = args
                    .get_many::<usize>("indices")
                    .map(|values| values.copied().collect())
                    .unwrap_or_default();
                print!("{}", run_remove(&indices));
            }
            _ => {
                eprintln!("Unknown bdt scenario. Use --help for usage information.");
                std::process::exit(1);
            }
        },
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

fn required<'a>(matches: &'a ArgMatches, name: &str) -> &'a str {
    match matches.get_one::<String>(name) {
        Some(value) => value.as_str(),
        None => {
            eprintln!("Error: missing argument '{name}'");
            std::process::exit(1);
        }
    }
}

fn index_value(matches: &ArgMatches, name: &str) -> usize {
    matches.get_one::<usize>(name).copied().unwrap_or_else(|| {
        eprintln!("Error: missing argument '{name}'");
        std::process::exit(1);
    })
}

fn output_path(matches: &ArgMatches) -> Option<&str> {
    matches.get_one::<String>("output").map(|s| s.as_str())
}

/// The --format value, or the format registered for the file's extension.
fn resolve_format(matches: &ArgMatches, path: &str) -> String {
    if let Some(format) = matches.get_one::<String>("format") {
        return format.clone();
    }
    let registry = FormatRegistry::default();
    match registry.detect_format_from_filename(path) {
        Some(detected) => detected,
        None => {
            eprintln!("Error: Could not detect format from filename '{path}'");
            eprintln!("Please specify --format explicitly");
            std::process::exit(1);
        }
    }
}

fn is_html_path(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    [".html", ".xhtml", ".htm"]
        .iter()
        .any(|ext| lower.ends_with(ext))
}

fn read_source(path: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{path}': {e}");
        std::process::exit(1);
    })
}

fn read_concrete(path: &str) -> Document {
    parse_xml(&read_source(path), &ParseOptions::data()).unwrap_or_else(|e| {
        eprintln!("Parse error in '{path}': {e}");
        std::process::exit(1);
    })
}

fn read_abstract(path: &str) -> Document {
    parse_html(&read_source(path)).unwrap_or_else(|e| {
        eprintln!("Parse error in '{path}': {e}");
        std::process::exit(1);
    })
}

fn write_output(output: Option<&str>, text: &str) {
    match output {
        Some(path) => {
            fs::write(path, text).unwrap_or_else(|e| {
                eprintln!("Error writing file '{path}': {e}");
                std::process::exit(1);
            });
        }
        None => print!("{text}"),
    }
}

/// Handle the get command
fn handle_get_command(input: &str, format: &str, output: Option<&str>, config: &DoclensConfig) {
    let registry = FormatRegistry::default();
    let concrete = read_concrete(input);
    let options = ConvertOptions::from(&config.convert);

    let abstract_doc = registry
        .get_abstract(&concrete, format, &options)
        .unwrap_or_else(|e| {
            eprintln!("Error: {e}");
            std::process::exit(1);
        });

    write_output(output, &serialize_xml(&abstract_doc, &config.output.html_options()));
}

/// Handle the put command
fn handle_put_command(
    concrete_path: &str,
    abstract_path: &str,
    format: &str,
    output: Option<&str>,
    show_stats: bool,
    config: &DoclensConfig,
) {
    let registry = FormatRegistry::default();
    let mut concrete = read_concrete(concrete_path);
    let abstract_doc = read_abstract(abstract_path);
    let options = ConvertOptions::from(&config.convert);

    let stats = registry
        .put_abstract(&mut concrete, &abstract_doc, format, &options)
        .unwrap_or_else(|e| {
            eprintln!("Error: {e}");
            std::process::exit(1);
        });
    info!(path = concrete_path, "updated concrete document");

    if show_stats {
        eprintln!(
            "retained {}, created {}, removed {}, dropped {}",
            stats.retained, stats.created, stats.removed, stats.dropped
        );
    }
    write_output(output, &serialize_xml(&concrete, &config.output.concrete_options()));
}

/// Handle the create command
fn handle_create_command(abstract_path: &str, format: &str, output: Option<&str>, config: &DoclensConfig) {
    let registry = FormatRegistry::default();
    let abstract_doc = read_abstract(abstract_path);
    let options = ConvertOptions::from(&config.convert);

    let concrete = registry
        .create_concrete(&abstract_doc, format, &options)
        .unwrap_or_else(|e| {
            eprintln!("Error: {e}");
            std::process::exit(1);
        });

    write_output(output, &serialize_xml(&concrete, &config.output.concrete_options()));
}

/// Handle the normalize command
fn handle_normalize_command(abstract_path: &str, output: Option<&str>, config: &DoclensConfig) {
    let mut doc = read_abstract(abstract_path);
    normalize_document(&mut doc);
    if let Some(root) = doc.root() {
        push_down_inline_properties(&mut doc, root);
    }
    write_output(output, &serialize_xml(&doc, &config.output.html_options()));
}

/// Handle the inspect command
fn handle_inspect_command(path: &str, view: &str, config: &DoclensConfig) {
    let doc = if is_html_path(path) {
        read_abstract(path)
    } else {
        read_concrete(path)
    };

    match view {
        "json" => {
            let text = json(&doc).unwrap_or_else(|e| {
                eprintln!("Serialization error: {e}");
                std::process::exit(1);
            });
            println!("{text}");
        }
        _ => print!("{}", treeviz(&doc, &TreevizOptions::from(&config.inspect))),
    }
}

/// Handle the list-formats command
fn handle_list_formats_command() {
    println!("Available formats:\n");
    let registry = FormatRegistry::default();
    for name in registry.list_formats() {
        if let Ok(format) = registry.get(&name) {
            let mut directions = Vec::new();
            if format.supports_get() {
                directions.push("get");
            }
            if format.supports_put() {
                directions.push("put");
            }
            println!(
                "  {name:<10} {} [{}]",
                format.description(),
                directions.join(", ")
            );
        }
    }
}

fn load_cli_config(explicit_path: Option<&str>) -> DoclensConfig {
    let loader = Loader::new().with_optional_file("doclens.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}

fn init_logging(config: &DoclensConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
