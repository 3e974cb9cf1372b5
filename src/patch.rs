//! PVC matching and in-place patching.
//!
//! A document qualifies for patching when it is a `PersistentVolumeClaim`
//! whose `spec.accessModes` contains the configured access mode and whose
//! `spec.storageClassName` equals the configured source class. Matching
//! documents get their storage class rewritten; everything else passes
//! through untouched.

use std::{fmt, path::Path};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::manifest;

const PVC_KIND: &str = "PersistentVolumeClaim";

/// The storage class migration rule.
///
/// The defaults reproduce the `local-path` to `nfs` migration for
/// `ReadWriteMany` claims.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PatchRule {
    /// Access mode a claim must request to qualify.
    pub access_mode: String,
    /// Storage class a claim must currently use to qualify.
    pub from_class: String,
    /// Storage class written to qualifying claims.
    pub to_class: String,
}

impl Default for PatchRule {
    fn default() -> Self {
        Self {
            access_mode: "ReadWriteMany".to_string(),
            from_class: "local-path".to_string(),
            to_class: "nfs".to_string(),
        }
    }
}

/// Identity of a patched claim, for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PvcRef {
    pub namespace: String,
    pub name: String,
}

impl fmt::Display for PvcRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Whether a document qualifies for the storage class rewrite.
///
/// Null documents and documents without `spec` or `spec.accessModes` never
/// qualify.
fn wants_patch(doc: &Value, rule: &PatchRule) -> bool {
    if doc.get("kind").and_then(Value::as_str) != Some(PVC_KIND) {
        return false;
    }

    let spec = doc.get("spec");
    let has_mode = spec
        .and_then(|s| s.get("accessModes"))
        .and_then(Value::as_sequence)
        .map(|modes| {
            modes
                .iter()
                .any(|m| m.as_str() == Some(rule.access_mode.as_str()))
        })
        .unwrap_or(false);
    if !has_mode {
        return false;
    }

    spec.and_then(|s| s.get("storageClassName"))
        .and_then(Value::as_str)
        == Some(rule.from_class.as_str())
}

/// Extracts the claim identity from a qualifying document.
///
/// A missing namespace falls back to `default`, matching how the cluster
/// would resolve the claim. A missing name is unrecoverable.
fn pvc_ref(doc: &Value) -> Option<PvcRef> {
    let metadata = doc.get("metadata")?;
    let name = metadata.get("name")?.as_str()?;
    let namespace = metadata
        .get("namespace")
        .and_then(Value::as_str)
        .unwrap_or("default");
    Some(PvcRef {
        namespace: namespace.to_string(),
        name: name.to_string(),
    })
}

/// Patches all qualifying documents in place.
///
/// Returns the identities of the patched claims, in document order. An
/// empty result means nothing changed.
///
/// # Errors
///
/// Returns an error if a qualifying document has no string `metadata.name`.
pub fn patch_documents(docs: &mut [Value], rule: &PatchRule) -> anyhow::Result<Vec<PvcRef>> {
    let mut patched = Vec::new();

    for (idx, doc) in docs.iter_mut().enumerate() {
        if !wants_patch(doc, rule) {
            continue;
        }

        let pvc = pvc_ref(doc).ok_or_else(|| {
            anyhow!("document {idx}: matching {PVC_KIND} is missing metadata.name")
        })?;

        // wants_patch guarantees spec.storageClassName is present.
        if let Some(class) = doc
            .get_mut("spec")
            .and_then(|s| s.get_mut("storageClassName"))
        {
            *class = Value::String(rule.to_class.clone());
        }
        debug!("patched {pvc} (document {idx})");
        patched.push(pvc);
    }

    Ok(patched)
}

/// Patches one manifest file on disk.
///
/// Loads the file, patches qualifying claims and, when anything changed and
/// `dry_run` is false, atomically rewrites the file with all documents in
/// their original order. A file with no qualifying claim is left untouched,
/// not even rewritten byte for byte.
///
/// Returns the identities of the patched (or, under `dry_run`, would-be
/// patched) claims.
pub fn patch_file(path: &Path, rule: &PatchRule, dry_run: bool) -> anyhow::Result<Vec<PvcRef>> {
    let mut docs = manifest::load_documents(path)?;

    let patched = patch_documents(&mut docs, rule)
        .with_context(|| format!("while patching {}", path.display()))?;

    if patched.is_empty() {
        return Ok(patched);
    }

    if dry_run {
        debug!("dry run, not rewriting {}", path.display());
    } else {
        manifest::write_documents(path, &docs)?;
    }

    Ok(patched)
}
