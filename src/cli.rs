use crate::convert::convert_document;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::style::LayerStyles;
use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "svg2dxf", version, about = "Convert SVG drawings to DXF")]
pub struct Args {
    /// Input file (.svg) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (.dxf). Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Layer styles JSON file: {"layer": "color:#rrggbb, ..."}
    #[arg(short = 's', long = "styles")]
    pub styles: Option<PathBuf>,

    /// Inline layer style, e.g. --layer-style cut=color:#ff0000 (repeatable,
    /// overrides entries from the styles file)
    #[arg(short = 'l', long = "layer-style")]
    pub layer_styles: Vec<String>,

    /// Print skipped-element diagnostics to stderr
    #[arg(short = 'd', long = "diagnostics")]
    pub diagnostics: bool,
}

pub fn run() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let input = read_input(args.input.as_deref())?;
    let styles = load_styles(args.styles.as_deref(), &args.layer_styles)?;

    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let sink = args
        .diagnostics
        .then_some(&mut diagnostics as &mut dyn DiagnosticSink);
    let document = convert_document(&input, (!styles.is_empty()).then_some(&styles), sink)?;

    for diagnostic in &diagnostics {
        eprintln!("{diagnostic}");
    }

    // Serialize fully before touching the output so a failure never leaves a
    // truncated file behind.
    let mut bytes = Vec::new();
    document.serialize(&mut bytes)?;
    write_output(&bytes, args.output.as_deref())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path == Path::new("-") {
            return read_stdin();
        }
        return std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()));
    }
    read_stdin()
}

fn read_stdin() -> Result<String> {
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn load_styles(file: Option<&Path>, inline: &[String]) -> Result<LayerStyles> {
    let mut styles = match file {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("invalid styles file {}", path.display()))?
        }
        None => LayerStyles::new(),
    };
    for entry in inline {
        let (layer, style) = entry
            .split_once('=')
            .with_context(|| format!("expected layer=style, got {entry:?}"))?;
        styles.insert(layer, style);
    }
    Ok(styles)
}

fn write_output(bytes: &[u8], output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, bytes)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => io::stdout().write_all(bytes)?,
    }
    Ok(())
}
