//! Layer boundary lint for the `orgdirectory` backend.
//!
//! The backend keeps its hexagon as three top-level modules under
//! `backend/src`: `domain`, `inbound` and `outbound`. Each layer has a rule
//! naming the sibling modules and third-party crates it must not reference.
//! Files outside the three layers (`server`, `settings`, binaries) wire
//! everything together and are not linted.
//!
//! References are collected from `use` trees and every path expression, so
//! fully qualified calls such as `diesel::insert_into(..)` are caught too.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use syn::visit::Visit;

/// Library name of the backend crate, as it appears in absolute paths.
const CRATE_NAME: &str = "orgdirectory";

const LAYER_DIRS: [&str; 3] = ["domain", "inbound", "outbound"];

const HTTP_CRATES: [&str; 4] = ["actix_http", "actix_web", "utoipa", "utoipa_swagger_ui"];
const DATABASE_CRATES: [&str; 3] = ["diesel", "diesel_async", "diesel_migrations"];

struct LayerRule {
    modules: &'static [&'static str],
    crates: &'static [&'static [&'static str]],
}

static DOMAIN_RULE: LayerRule = LayerRule {
    modules: &["inbound", "outbound"],
    crates: &[&HTTP_CRATES, &DATABASE_CRATES, &["ortho_config"]],
};

static INBOUND_RULE: LayerRule = LayerRule {
    modules: &["outbound"],
    crates: &[&DATABASE_CRATES],
};

static OUTBOUND_RULE: LayerRule = LayerRule {
    modules: &["inbound"],
    crates: &[&HTTP_CRATES],
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layer {
    Domain,
    Inbound,
    Outbound,
}

impl Layer {
    fn of(file: &Path) -> Option<Self> {
        let first = file.components().next()?.as_os_str().to_str()?;
        match first {
            "domain" => Some(Self::Domain),
            "inbound" => Some(Self::Inbound),
            "outbound" => Some(Self::Outbound),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Inbound => "inbound",
            Self::Outbound => "outbound",
        }
    }

    fn rule(self) -> &'static LayerRule {
        match self {
            Self::Domain => &DOMAIN_RULE,
            Self::Inbound => &INBOUND_RULE,
            Self::Outbound => &OUTBOUND_RULE,
        }
    }
}

/// A forbidden reference found in one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File path relative to `backend/src`.
    pub file: PathBuf,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file.display(), self.message)
    }
}

/// Errors returned by [`lint_backend_sources`] and [`lint_sources`].
#[derive(Debug)]
pub enum ArchitectureLintError {
    Io(io::Error),
    /// A file could not be parsed or placed in a layer.
    Parse { file: PathBuf, message: String },
    Violations(Vec<Violation>),
}

impl fmt::Display for ArchitectureLintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "reading backend sources failed: {err}"),
            Self::Parse { file, message } => {
                write!(f, "cannot lint {}: {message}", file.display())
            }
            Self::Violations(violations) => {
                writeln!(f, "{} layer boundary violation(s):", violations.len())?;
                violations
                    .iter()
                    .try_for_each(|violation| writeln!(f, "  {violation}"))
            }
        }
    }
}

impl std::error::Error for ArchitectureLintError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse { .. } | Self::Violations(_) => None,
        }
    }
}

impl From<io::Error> for ArchitectureLintError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// A Rust source file to be linted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintSource {
    /// Path relative to `backend/src`; its first component picks the layer.
    pub file: PathBuf,
    pub contents: String,
}

/// Lint every layer file under `backend_dir/src`.
pub fn lint_backend_sources(backend_dir: &Path) -> Result<(), ArchitectureLintError> {
    let sources = read_layer_sources(&backend_dir.join("src"))?;
    lint_sources(&sources)
}

/// Lint in-memory sources.
///
/// Every file must belong to a layer; anything else is reported as
/// [`ArchitectureLintError::Parse`].
pub fn lint_sources(sources: &[LintSource]) -> Result<(), ArchitectureLintError> {
    let mut violations = Vec::new();
    for source in sources {
        let layer = Layer::of(&source.file).ok_or_else(|| ArchitectureLintError::Parse {
            file: source.file.clone(),
            message: "file is not under domain/, inbound/ or outbound/".to_owned(),
        })?;
        let parsed =
            syn::parse_file(&source.contents).map_err(|err| ArchitectureLintError::Parse {
                file: source.file.clone(),
                message: err.to_string(),
            })?;

        let mut references = References::default();
        references.visit_file(&parsed);
        violations.extend(
            references
                .forbidden_for(layer)
                .into_iter()
                .map(|target| Violation {
                    file: source.file.clone(),
                    message: format!("{} module must not depend on {target}", layer.name()),
                }),
        );
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ArchitectureLintError::Violations(violations))
    }
}

/// Leading identifiers of every path a file mentions.
#[derive(Default)]
struct References {
    paths: BTreeSet<Vec<String>>,
}

impl References {
    /// Forbidden targets, rendered as they appear in violation messages.
    fn forbidden_for(&self, layer: Layer) -> BTreeSet<String> {
        let rule = layer.rule();
        let mut found = BTreeSet::new();
        for path in &self.paths {
            if let Some(module) = internal_module(path).filter(|m| names(rule.modules, m)) {
                found.insert(format!("crate::{module}"));
            }
            let krate = external_crate(path)
                .filter(|krate| rule.crates.iter().any(|group| names(group, krate)));
            if let Some(krate) = krate {
                found.insert(format!("external crate `{krate}`"));
            }
        }
        found
    }

    fn add_use_tree(&mut self, root: &syn::UseTree) {
        let mut pending = vec![(Vec::new(), root)];
        while let Some((prefix, tree)) = pending.pop() {
            let leaf = match tree {
                syn::UseTree::Path(path) => {
                    let mut next = prefix;
                    next.push(path.ident.to_string());
                    pending.push((next, &*path.tree));
                    continue;
                }
                syn::UseTree::Group(group) => {
                    pending.extend(group.items.iter().map(|item| (prefix.clone(), item)));
                    continue;
                }
                syn::UseTree::Name(name) => name.ident.to_string(),
                syn::UseTree::Rename(rename) => rename.ident.to_string(),
                syn::UseTree::Glob(_) => "*".to_owned(),
            };
            let mut segments = prefix;
            segments.push(leaf);
            self.paths.insert(segments);
        }
    }
}

impl<'ast> Visit<'ast> for References {
    fn visit_path(&mut self, node: &'ast syn::Path) {
        let segments: Vec<String> = node
            .segments
            .iter()
            .map(|segment| segment.ident.to_string())
            .collect();
        if !segments.is_empty() {
            self.paths.insert(segments);
        }
        syn::visit::visit_path(self, node);
    }

    fn visit_item_use(&mut self, node: &'ast syn::ItemUse) {
        self.add_use_tree(&node.tree);
    }
}

fn names(list: &[&str], candidate: &str) -> bool {
    list.iter().any(|name| *name == candidate)
}

fn is_relative(segment: &str) -> bool {
    matches!(segment, "crate" | "self" | "super")
}

/// Layer module a path points into, if it names one of the backend's own.
fn internal_module(path: &[String]) -> Option<&str> {
    let mut segments = path.iter().map(String::as_str);
    let mut first = segments.next()?;
    if first == CRATE_NAME {
        first = segments.next()?;
    } else if is_relative(first) {
        first = segments.find(|segment| !is_relative(segment))?;
    }
    names(&LAYER_DIRS, first).then_some(first)
}

fn external_crate(path: &[String]) -> Option<&str> {
    let root = path.first()?.as_str();
    (!is_relative(root) && root != CRATE_NAME).then_some(root)
}

fn read_layer_sources(src_dir: &Path) -> Result<Vec<LintSource>, ArchitectureLintError> {
    let mut sources = Vec::new();
    let mut pending: Vec<PathBuf> = LAYER_DIRS
        .iter()
        .map(|layer| src_dir.join(layer))
        .filter(|dir| dir.is_dir())
        .collect();

    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
            } else if path.extension().is_some_and(|ext| ext == "rs") {
                let file = path
                    .strip_prefix(src_dir)
                    .map(Path::to_path_buf)
                    .map_err(|err| ArchitectureLintError::Parse {
                        file: path.clone(),
                        message: err.to_string(),
                    })?;
                let contents = fs::read_to_string(&path)?;
                sources.push(LintSource { file, contents });
            }
        }
    }

    sources.sort_by(|a, b| a.file.cmp(&b.file));
    Ok(sources)
}

#[cfg(test)]
mod tests;
