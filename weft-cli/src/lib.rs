use anyhow::{Context, Result};
use clap::ValueEnum;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use weft_sfc::{CompileOptions, Document};

/// Default output directory, relative to the working directory.
pub const DEFAULT_OUT_DIR: &str = "target/weft-gen";

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum EmitMode {
    /// The exported JavaScript function, written to `<stem>.js`.
    Module,
    /// The declared tree and its top-level blocks as JSON, written to `<stem>.json`.
    Tree,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InputFormat {
    #[default]
    Markup,
    /// A pre-parsed node sequence, see [`Document::from_json`].
    Json,
}

/// Compile one template file into `out_dir` and return the written path.
pub fn build_cmd(
    input: &Path,
    out_dir: Option<&Path>,
    emit: EmitMode,
    options: &CompileOptions,
    format: InputFormat,
) -> Result<PathBuf> {
    let src =
        fs::read_to_string(input).with_context(|| format!("failed to read {}", input.display()))?;
    let doc = load_document(&src, format)
        .with_context(|| format!("failed to parse {}", input.display()))?;

    let name = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("component");

    let (code, ext) = match emit {
        EmitMode::Module => {
            let js = weft_sfc::compile_document(&doc, options)
                .with_context(|| format!("failed to compile {}", input.display()))?;
            if js.is_empty() {
                tracing::warn!(input = %input.display(), "template has no elements to build");
            }
            (js, "js")
        }
        EmitMode::Tree => (tree_dump(&doc)?, "json"),
    };

    let out_dir = out_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR));
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    let out_path = out_dir.join(format!("{name}.{ext}"));
    let mut contents = code;
    if !contents.is_empty() {
        contents.push('\n');
    }
    fs::write(&out_path, contents)
        .with_context(|| format!("failed to write {}", out_path.display()))?;

    tracing::info!(output = %out_path.display(), ?emit, "generated");
    Ok(out_path)
}

fn load_document(src: &str, format: InputFormat) -> Result<Document> {
    match format {
        InputFormat::Markup => Ok(weft_sfc::parse_template(src)?),
        InputFormat::Json => {
            let value: Value = serde_json::from_str(src).context("input is not valid JSON")?;
            Ok(Document::from_json(&value)?)
        }
    }
}

fn tree_dump(doc: &Document) -> Result<String> {
    let tree = weft_sfc::declare(doc)?;
    let sfc = weft_sfc::segregate(&tree);
    let mut dump = serde_json::Map::new();
    dump.insert("sfc".to_string(), serde_json::to_value(&sfc)?);
    dump.insert("tree".to_string(), serde_json::to_value(&tree)?);
    Ok(serde_json::to_string_pretty(&Value::Object(dump))?)
}
