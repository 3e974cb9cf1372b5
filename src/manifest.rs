//! Multi-document YAML manifest handling.
//!
//! A manifest file holds zero or more YAML documents separated by `---`.
//! This module loads such a file into an ordered sequence of
//! [`serde_yaml::Value`] documents, renders a sequence back to text in
//! block style, and rewrites a file atomically through a temporary file in
//! the target's directory.
//!
//! Document order and mapping key order survive a load/render round trip;
//! comments, anchors and exact whitespace do not.

use std::{fs, io::Write, path::Path};

use anyhow::Context;
use serde::Deserialize;
use serde_yaml::Value;
use tempfile::NamedTempFile;

/// Loads all YAML documents from a file, in file order.
///
/// Empty YAML blocks parse to [`Value::Null`] and are kept in place so the
/// document count and order match the file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or any block is not valid
/// YAML.
pub fn load_documents(path: &Path) -> anyhow::Result<Vec<Value>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("can not read manifest file: {}", path.display()))?;

    let mut docs = Vec::new();
    for doc in serde_yaml::Deserializer::from_str(&content) {
        let value = Value::deserialize(doc)
            .with_context(|| format!("invalid YAML in {}", path.display()))?;
        docs.push(value);
    }

    debug!("loaded {} documents from {}", docs.len(), path.display());
    Ok(docs)
}

/// Renders a document sequence to YAML text.
///
/// Documents are emitted in order, block style, separated by `---` lines.
pub fn render_documents(docs: &[Value]) -> anyhow::Result<String> {
    let mut out = String::new();
    for (i, doc) in docs.iter().enumerate() {
        if i > 0 {
            out.push_str("---\n");
        }
        out.push_str(&serde_yaml::to_string(doc)?);
    }
    Ok(out)
}

/// Atomically replaces a manifest file with the rendered document sequence.
///
/// The content is written to a named temporary file in the same directory
/// as the target and then renamed over it, so a crash mid-write never
/// leaves a truncated manifest behind.
///
/// # Errors
///
/// Returns an error if rendering fails or the temporary file cannot be
/// created, written, or persisted.
pub fn write_documents(path: &Path, docs: &[Value]) -> anyhow::Result<()> {
    let rendered = render_documents(docs)?;

    // The temp file must live on the same filesystem as the target for the
    // rename to be atomic.
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("can not create temp file in {}", dir.display()))?;
    tmp.write_all(rendered.as_bytes())
        .with_context(|| format!("can not write temp file for {}", path.display()))?;
    tmp.persist(path)
        .with_context(|| format!("can not replace {}", path.display()))?;

    debug!("wrote {} documents to {}", docs.len(), path.display());
    Ok(())
}
