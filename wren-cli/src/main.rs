//! wren - parse HTML and print the tree the WHATWG algorithm builds
//!
//! Usage:
//!   wren <file>                      Print the tree dump
//!   wren <file> --format html        Print the serialized markup
//!   wren <file> --format json        Print the tree as JSON
//!   wren --html '<p>x' --errors      Parse a string and list parse errors
//!   wren --html '<td>x' --fragment tr

mod json;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use owo_colors::OwoColorize;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use wren_dom::NodeId;
use wren_dom::dump::dump_tree;
use wren_dom::serialize::serialize_children;
use wren_html::{FragmentContext, ParseOutput, ParserConfig, parse_document_with_config, parse_fragment_with_config};

use json::JsonNode;

/// Parse HTML the way a browser does and print the resulting tree
#[derive(Parser, Debug)]
#[command(name = "wren")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print the tree for a file
    wren ./index.html

    # Parse inline HTML and show parse errors
    wren --html '<table><div>x</div></table>' --errors

    # Parse as innerHTML of a <tr>
    wren --html '<td>1<td>2' --fragment tr

    # Debug logging from the tree builder
    RUST_LOG=wren_html=trace wren ./index.html
"#)]
struct Cli {
    /// Path to an HTML file
    #[arg(value_name = "FILE", required_unless_present = "html")]
    path: Option<PathBuf>,

    /// Parse this HTML string instead of a file
    #[arg(long, value_name = "HTML", conflicts_with = "path")]
    html: Option<String>,

    /// Parse as a fragment inside an element with this tag name
    #[arg(long, value_name = "CONTEXT")]
    fragment: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Tree)]
    format: Format,

    /// Parse with the scripting flag enabled (noscript content becomes text)
    #[arg(long)]
    scripting: bool,

    /// List parse errors on stderr
    #[arg(long)]
    errors: bool,

    /// Debug logging, unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    /// Indented `| <tag>` dump
    Tree,
    /// Serialized markup
    Html,
    /// JSON document
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let input = read_input(&cli)?;
    let config = ParserConfig::default().with_scripting(cli.scripting);

    let output = if let Some(context) = &cli.fragment {
        parse_fragment_with_config(&input, &FragmentContext::new(context), config)
            .with_context(|| format!("cannot parse a fragment in <{context}>"))?
    } else {
        parse_document_with_config(&input, config)
    };
    debug!(nodes = output.tree.len(), issues = output.issues.len(), "parsed");

    print_output(&output, cli.format)?;
    if cli.errors {
        print_issues(&output);
    }
    if let Some(err) = &output.failure {
        bail!("tree construction stopped early: {err}");
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load the markup from `--html` or the file argument
fn read_input(cli: &Cli) -> Result<String> {
    if let Some(html) = &cli.html {
        return Ok(html.clone());
    }
    let Some(path) = &cli.path else {
        bail!("no input: pass a file path or --html");
    };
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn print_output(output: &ParseOutput, format: Format) -> Result<()> {
    let root = output.tree.root();
    match format {
        Format::Tree => print!("{}", dump_tree(&output.tree, root)),
        Format::Html => println!("{}", serialize_children(&output.tree, root)),
        Format::Json => {
            let Some(node) = JsonNode::from_tree(&output.tree, NodeId::ROOT) else {
                bail!("parsed tree has no root");
            };
            let text = serde_json::to_string_pretty(&node).context("failed to encode JSON")?;
            println!("{text}");
        }
    }
    Ok(())
}

fn print_issues(output: &ParseOutput) {
    if output.issues.is_empty() {
        eprintln!("{}", "no parse errors".green());
        return;
    }
    for issue in &output.issues {
        let detail = issue
            .detail
            .as_deref()
            .map(|d| format!(" ({d})"))
            .unwrap_or_default();
        eprintln!(
            "{} {}{}",
            format!("{:>6}", issue.offset).dimmed(),
            issue.code.red(),
            detail
        );
    }
    eprintln!(
        "{} parse error(s), {} mode",
        output.issues.len().yellow().bold(),
        output.quirks_mode
    );
}
