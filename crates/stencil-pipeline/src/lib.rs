//! Drives descriptors through synthesis and rendering.
//!
//! The two collaborators the core does not own sit behind narrow traits:
//! [`DescriptorProvider`] yields normalized method descriptors (however the
//! host extracts them), and [`GeneratedSink`] accepts the `(key, text)` pairs
//! the run produces. [`run`] is the driver in between: each method is
//! processed independently, and a method-level failure is reported and
//! skipped without touching the rest of the run.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use stencil_gen::{render, synthesize};
use stencil_model::{DescriptorSet, MethodDescriptor};
use thiserror::Error;

/// Upstream seam: yields the descriptors for one run.
pub trait DescriptorProvider {
    fn descriptors(&self) -> Vec<MethodDescriptor>;
}

impl DescriptorProvider for DescriptorSet {
    fn descriptors(&self) -> Vec<MethodDescriptor> {
        self.methods.clone()
    }
}

/// Provider backed by the JSON wire format (`{"methods": [...]}`).
#[derive(Debug)]
pub struct JsonProvider {
    set: DescriptorSet,
}

impl JsonProvider {
    pub fn parse(text: &str) -> Result<Self, PipelineError> {
        let set = serde_json::from_str(text)?;
        Ok(Self { set })
    }

    pub fn from_path(path: &Path) -> Result<Self, PipelineError> {
        let text = fs::read_to_string(path).map_err(|source| PipelineError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }
}

impl DescriptorProvider for JsonProvider {
    fn descriptors(&self) -> Vec<MethodDescriptor> {
        self.set.methods.clone()
    }
}

/// Downstream seam: accepts one `(key, text)` pair per generated overload.
pub trait GeneratedSink {
    fn accept(&mut self, key: &str, text: &str) -> io::Result<()>;
}

/// In-memory sink for tests and in-process hosts.
#[derive(Debug, Default)]
pub struct MemorySink {
    files: Vec<(String, String)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self) -> &[(String, String)] {
        &self.files
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.files
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, text)| text.as_str())
    }
}

impl GeneratedSink for MemorySink {
    fn accept(&mut self, key: &str, text: &str) -> io::Result<()> {
        self.files.push((key.to_string(), text.to_string()));
        Ok(())
    }
}

/// Sink writing one `<key>.g.cs` file per overload under a directory.
#[derive(Debug)]
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    /// Creates the output directory (and parents) if missing.
    pub fn new(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl GeneratedSink for DirectorySink {
    fn accept(&mut self, key: &str, text: &str) -> io::Result<()> {
        fs::write(self.root.join(format!("{key}.g.cs")), text)
    }
}

/// Output key for the `index`-th (1-based) overload of `method`.
///
/// The namespace qualifier (dots mapped to underscores) keeps same-named
/// types in different namespaces from colliding within a run.
pub fn output_key(method: &MethodDescriptor, index: usize) -> String {
    format!("{}_overload_{index}", method_key(method))
}

/// Run-unique identity of the original method: namespace + enclosing type +
/// method name. Two descriptors sharing this key describe overloads of one
/// method, which the output naming scheme cannot represent.
pub fn method_key(method: &MethodDescriptor) -> String {
    let mut key = String::new();
    if let Some(ns) = &method.namespace {
        key.push_str(&ns.replace('.', "_"));
        key.push('_');
    }
    key.push_str(&method.enclosing_type);
    key.push('_');
    key.push_str(&method.name);
    key
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to read descriptor file `{path}`: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse descriptor JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result of one generation run, in provider order.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    /// Keys handed to the sink, in emission order.
    pub generated: Vec<String>,
    /// Methods that produced no output, with the reason.
    pub skipped: Vec<SkippedMethod>,
}

impl RunReport {
    pub fn clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedMethod {
    pub method: String,
    pub reason: String,
}

/// Drive every descriptor from `provider` through synthesis and rendering,
/// handing each rendered overload to `sink`.
///
/// No failure is fatal to the run: malformed descriptors, key collisions and
/// sink errors are recorded in the report and the next method proceeds.
/// Methods with no optional parameters generate nothing and are not reported.
pub fn run(provider: &dyn DescriptorProvider, sink: &mut dyn GeneratedSink) -> RunReport {
    let mut report = RunReport::default();
    let mut claimed: HashSet<String> = HashSet::new();

    for method in provider.descriptors() {
        let qualified = method.qualified_name();

        let emissions = match synthesize(&method) {
            Ok(emissions) => emissions,
            Err(err) => {
                skip(&mut report, qualified, err.to_string());
                continue;
            }
        };

        if emissions.is_empty() {
            tracing::debug!(method = %qualified, "no optional parameters, nothing to generate");
            continue;
        }

        if !claimed.insert(method_key(&method)) {
            let reason = format!(
                "an earlier descriptor already generated overloads for `{}`; \
                 overloaded source methods cannot share the output key space",
                method_key(&method)
            );
            skip(&mut report, qualified, reason);
            continue;
        }

        for (index, emission) in emissions.iter().enumerate() {
            let key = output_key(&method, index + 1);
            let text = render(&method, emission);
            if let Err(err) = sink.accept(&key, &text) {
                skip(
                    &mut report,
                    qualified.clone(),
                    format!("failed to write `{key}`: {err}"),
                );
                break;
            }
            report.generated.push(key);
        }
    }

    report
}

fn skip(report: &mut RunReport, method: String, reason: String) {
    tracing::warn!(method = %method, reason = %reason, "skipping method");
    report.skipped.push(SkippedMethod { method, reason });
}

/// Result of validating a descriptor set without generating anything.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckReport {
    pub methods: Vec<MethodCheck>,
}

impl CheckReport {
    pub fn clean(&self) -> bool {
        self.methods.iter().all(|m| m.error.is_none())
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodCheck {
    pub method: String,
    /// Overload count this method would produce, when valid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overloads: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Validate every descriptor and report the overload count each would
/// produce. Nothing is rendered or written.
pub fn check(provider: &dyn DescriptorProvider) -> CheckReport {
    let mut report = CheckReport::default();

    for method in provider.descriptors() {
        let qualified = method.qualified_name();
        match synthesize(&method) {
            Ok(emissions) => report.methods.push(MethodCheck {
                method: qualified,
                overloads: Some(emissions.len()),
                error: None,
            }),
            Err(err) => report.methods.push(MethodCheck {
                method: qualified,
                overloads: None,
                error: Some(err.to_string()),
            }),
        }
    }

    report
}
