use envdelta_types::RepoPath;
use serde::Serialize;

/// Parsed form of a configuration file.
pub type ValueTree = serde_json::Value;

/// Content of one compared file.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "content", rename_all = "lowercase")]
pub enum FileBody {
    /// YAML parsed into a tree.
    Structured(ValueTree),
    /// Anything else, compared as opaque text.
    Text(String),
}

impl FileBody {
    pub fn as_tree(&self) -> Option<&ValueTree> {
        match self {
            FileBody::Structured(tree) => Some(tree),
            FileBody::Text(_) => None,
        }
    }
}

/// A file present on both sides whose processed content differs.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangedFile {
    pub path: RepoPath,

    /// Source as written, before transforms. `None` when it does not parse.
    pub raw_parsed_source: Option<FileBody>,
    pub raw_parsed_dest: Option<FileBody>,

    /// Source after transforms and fixed values. Never masked by skip paths.
    pub processed_source_content: FileBody,
    pub processed_dest_content: FileBody,

    /// Source-side path when a rename routed it to `path`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_path: Option<RepoPath>,
}

/// A file present only in the source tree.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddedFile {
    pub path: RepoPath,
    pub processed_content: FileBody,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_path: Option<RepoPath>,
}

/// Outcome of classifying every file of one source/destination pair.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffResult {
    pub added_files: Vec<AddedFile>,
    /// Only populated when pruning is enabled.
    pub deleted_files: Vec<RepoPath>,
    pub changed_files: Vec<ChangedFile>,
    pub unchanged_files: Vec<RepoPath>,
}

impl DiffResult {
    pub fn has_changes(&self) -> bool {
        !(self.added_files.is_empty()
            && self.deleted_files.is_empty()
            && self.changed_files.is_empty())
    }
}
