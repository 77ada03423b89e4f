//! Source-tree pattern scanning.
//!
//! Walks the project once, reads each source file once, and runs every
//! applicable rule against its contents:
//! - retired command-line flags (hard failure),
//! - package-private constructors used outside their subtree (hard failure),
//! - hardcoded paths that belong in configuration (advisory),
//! - the build-constraint gate for testing-support files (hard failure).
//!
//! Files that cannot be read as UTF-8 text are recorded and skipped.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::config::{slash_joined, SourceRules};

/// A source file found by the walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Path relative to the scan root with `/` separators.
    pub relative: String,
}

impl SourceFile {
    pub fn new(root: &Path, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let relative = match path.strip_prefix(root) {
            Ok(rel) => slash_joined(rel),
            Err(_) => path.display().to_string(),
        };
        Self { path, relative }
    }

    pub fn file_name(&self) -> &str {
        self.relative.rsplit('/').next().unwrap_or(&self.relative)
    }

    fn is_under(&self, subtree: &str) -> bool {
        !subtree.is_empty() && Path::new(&self.relative).starts_with(subtree)
    }
}

/// A file that matched a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternHit {
    pub file: String,
    pub pattern: String,
}

/// A file skipped because it could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnreadableFile {
    pub file: String,
    pub reason: String,
}

/// Hits for the three forbidden-pattern rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForbiddenPatternReport {
    pub forbidden_flags: Vec<PatternHit>,
    pub internal_constructors: Vec<PatternHit>,
    /// Advisory only.
    pub hardcoded_paths: Vec<PatternHit>,
}

impl ForbiddenPatternReport {
    /// True when no hard-failure rule matched.
    pub fn passed(&self) -> bool {
        self.forbidden_flags.is_empty() && self.internal_constructors.is_empty()
    }
}

/// Build-constraint gate results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildTagReport {
    /// Testing-support files that were examined.
    pub checked: Vec<String>,
    /// Testing-support files lacking the marker before their package clause.
    pub missing_constraint: Vec<String>,
}

impl BuildTagReport {
    pub fn passed(&self) -> bool {
        self.missing_constraint.is_empty()
    }
}

/// Everything learned from one pass over the tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceScanReport {
    pub files_scanned: usize,
    pub forbidden: ForbiddenPatternReport,
    pub build_tags: BuildTagReport,
    pub unreadable: Vec<UnreadableFile>,
}

/// Returns true when `name` designates a file exposing testing APIs.
pub fn is_testing_support_file(name: &str, rules: &SourceRules) -> bool {
    rules.testing_support_files.iter().any(|f| f == name)
        || rules.testing_support_suffixes.iter().any(|s| name.ends_with(s.as_str()))
}

/// Returns true when a line starting with `marker` appears before the first
/// package clause. Without a package clause the whole file is searched.
pub fn has_build_constraint(content: &str, marker: &str) -> bool {
    content
        .lines()
        .map(str::trim)
        .take_while(|line| !line.starts_with("package "))
        .any(|line| line.starts_with(marker))
}

/// Collect source files under `root`, skipping excluded directories.
///
/// Directory entries that cannot be read are reported through the returned
/// unreadable list rather than aborting the walk.
pub fn collect_source_files(
    root: &Path,
    rules: &SourceRules,
) -> (Vec<SourceFile>, Vec<UnreadableFile>) {
    let mut files = Vec::new();
    let mut unreadable = Vec::new();

    let walker = WalkDir::new(root).sort_by_file_name().into_iter().filter_entry(|entry| {
        let excluded = entry.depth() > 0
            && entry.file_type().is_dir()
            && rules.excluded_dirs.iter().any(|d| entry.file_name().to_str() == Some(d.as_str()));
        !excluded
    });

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                let file = err
                    .path()
                    .map(|p| SourceFile::new(root, p).relative)
                    .unwrap_or_else(|| root.display().to_string());
                log::warn!("Could not walk {}: {}", file, err);
                unreadable.push(UnreadableFile { file, reason: err.to_string() });
                continue;
            }
        };
        // Symlinked files count as source files.
        if !entry.file_type().is_file() && !entry.path().is_file() {
            continue;
        }
        let matches_ext = entry.path().extension().and_then(|e| e.to_str())
            == Some(rules.extension.as_str());
        if matches_ext {
            files.push(SourceFile::new(root, entry.path()));
        }
    }

    (files, unreadable)
}

/// Apply every rule to one file's contents.
pub fn scan_contents(
    file: &SourceFile,
    content: &str,
    rules: &SourceRules,
    report: &mut SourceScanReport,
) {
    let name = file.file_name();
    let is_test_file = name.ends_with(rules.test_file_suffix.as_str());

    if let Some(flag) = rules.forbidden_flags.iter().find(|f| content.contains(f.as_str())) {
        report
            .forbidden
            .forbidden_flags
            .push(PatternHit { file: file.relative.clone(), pattern: flag.clone() });
    }

    if !is_test_file && !file.is_under(&rules.internal_constructor_subtree) {
        if let Some(ctor) =
            rules.internal_constructors.iter().find(|c| content.contains(c.as_str()))
        {
            report
                .forbidden
                .internal_constructors
                .push(PatternHit { file: file.relative.clone(), pattern: ctor.clone() });
        }
    }

    if !is_test_file && file.relative != rules.hardcoded_path_definition {
        if let Some(hardcoded) = rules.hardcoded_paths.iter().find(|p| content.contains(p.as_str()))
        {
            report
                .forbidden
                .hardcoded_paths
                .push(PatternHit { file: file.relative.clone(), pattern: hardcoded.clone() });
        }
    }

    if is_testing_support_file(name, rules) {
        report.build_tags.checked.push(file.relative.clone());
        if !has_build_constraint(content, &rules.build_constraint) {
            report.build_tags.missing_constraint.push(file.relative.clone());
        }
    }
}

/// Scan an explicit file set.
pub fn scan_files(files: &[SourceFile], rules: &SourceRules) -> SourceScanReport {
    let mut report = SourceScanReport::default();

    for file in files {
        let content = match fs::read_to_string(&file.path) {
            Ok(c) => c,
            Err(err) => {
                log::warn!("Could not read file {}: {}", file.relative, err);
                report
                    .unreadable
                    .push(UnreadableFile { file: file.relative.clone(), reason: err.to_string() });
                continue;
            }
        };
        report.files_scanned += 1;
        scan_contents(file, &content, rules, &mut report);
    }

    log::debug!(
        "scanned {} source files ({} unreadable)",
        report.files_scanned,
        report.unreadable.len()
    );
    report
}

/// Walk `root` and scan every source file in a single pass.
pub fn scan_source_tree(root: &Path, rules: &SourceRules) -> SourceScanReport {
    let (files, walk_errors) = collect_source_files(root, rules);
    let mut report = scan_files(&files, rules);
    report.unreadable.splice(0..0, walk_errors);
    report
}
