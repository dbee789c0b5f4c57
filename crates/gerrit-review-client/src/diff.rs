//! Line-oriented view of a Gerrit `DiffInfo`.
//!
//! Gerrit ships a diff as an ordered list of content entries, each holding
//! common (`ab`), added (`b`), removed (`a`) lines or a `skip` count of
//! unchanged lines that were elided. [`reconstruct`] flattens them into one
//! record per line while tracking the old and new file positions separately.

use gerrit_review_core::error::GerritError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffSegment {
    Common(Vec<String>),
    Added(Vec<String>),
    Removed(Vec<String>),
    Skip(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineChangeKind {
    Common,
    Added,
    Removed,
}

/// One line of the reconstructed diff.
///
/// `line_number` is the 1-based position in the new file for `common` and
/// `added`, and in the old file for `removed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineChange {
    #[serde(rename = "type")]
    pub kind: LineChangeKind,
    pub line_number: u32,
    pub content: String,
}

/// Last line emitted on each side. Both start at zero, never decrease and
/// saturate at `u32::MAX`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffCounters {
    pub old_line: u32,
    pub new_line: u32,
}

pub fn reconstruct(segments: &[DiffSegment]) -> Vec<LineChange> {
    reconstruct_with_counters(segments).0
}

pub fn reconstruct_with_counters(segments: &[DiffSegment]) -> (Vec<LineChange>, DiffCounters) {
    let mut counters = DiffCounters::default();
    let mut out = Vec::new();

    for segment in segments {
        match segment {
            DiffSegment::Common(lines) => {
                for line in lines {
                    counters.old_line = counters.old_line.saturating_add(1);
                    counters.new_line = counters.new_line.saturating_add(1);
                    out.push(record(LineChangeKind::Common, counters.new_line, line));
                }
            }
            DiffSegment::Added(lines) => {
                for line in lines {
                    counters.new_line = counters.new_line.saturating_add(1);
                    out.push(record(LineChangeKind::Added, counters.new_line, line));
                }
            }
            DiffSegment::Removed(lines) => {
                for line in lines {
                    counters.old_line = counters.old_line.saturating_add(1);
                    out.push(record(LineChangeKind::Removed, counters.old_line, line));
                }
            }
            DiffSegment::Skip(count) => {
                counters.old_line = counters.old_line.saturating_add(*count);
                counters.new_line = counters.new_line.saturating_add(*count);
            }
        }
    }

    (out, counters)
}

fn record(kind: LineChangeKind, line_number: u32, content: &str) -> LineChange {
    LineChange {
        kind,
        line_number,
        content: content.to_string(),
    }
}

// Gerrit wire types. Only the fields the reconstructor reads are modelled.

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiffInfo {
    #[serde(default)]
    pub meta_a: Option<DiffFileMeta>,
    #[serde(default)]
    pub meta_b: Option<DiffFileMeta>,
    #[serde(default)]
    pub change_type: Option<String>,
    #[serde(default)]
    pub content: Vec<DiffContent>,
    #[serde(default)]
    pub binary: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiffFileMeta {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiffContent {
    #[serde(default)]
    pub a: Option<Vec<String>>,
    #[serde(default)]
    pub b: Option<Vec<String>>,
    #[serde(default)]
    pub ab: Option<Vec<String>>,
    #[serde(default)]
    pub skip: Option<u32>,
}

/// Segment order within one entry: `ab`, `b`, `a`, `skip`.
pub fn segments_from_content(content: &[DiffContent]) -> Vec<DiffSegment> {
    let mut segments = Vec::with_capacity(content.len());
    for entry in content {
        if let Some(lines) = entry.ab.as_ref().filter(|l| !l.is_empty()) {
            segments.push(DiffSegment::Common(lines.clone()));
        }
        if let Some(lines) = entry.b.as_ref().filter(|l| !l.is_empty()) {
            segments.push(DiffSegment::Added(lines.clone()));
        }
        if let Some(lines) = entry.a.as_ref().filter(|l| !l.is_empty()) {
            segments.push(DiffSegment::Removed(lines.clone()));
        }
        if let Some(count) = entry.skip.filter(|c| *c > 0) {
            segments.push(DiffSegment::Skip(count));
        }
    }
    segments
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileDiff {
    pub file_path: String,
    pub is_binary: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    pub line_changes: Vec<LineChange>,
    pub metadata: DiffMetadata,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffMetadata {
    pub change_type: Option<String>,
    pub content_type_a: Option<String>,
    pub content_type_b: Option<String>,
    pub lines_inserted: usize,
    pub lines_deleted: usize,
}

/// Turn a raw `DiffInfo` body into the tool result. Binary files skip
/// reconstruction and report an empty line list.
pub fn build_file_diff(file_path: &str, raw: Value) -> Result<FileDiff, GerritError> {
    let info: DiffInfo = serde_json::from_value(raw)
        .map_err(|e| GerritError::decode(format!("unexpected DiffInfo shape: {e}"), ""))?;

    let content_type_a = info.meta_a.as_ref().and_then(|m| m.content_type.clone());
    let content_type_b = info.meta_b.as_ref().and_then(|m| m.content_type.clone());
    let mut metadata = DiffMetadata {
        change_type: info.change_type.clone(),
        content_type_a: content_type_a.clone(),
        content_type_b: content_type_b.clone(),
        ..DiffMetadata::default()
    };

    if info.binary {
        return Ok(FileDiff {
            file_path: file_path.to_string(),
            is_binary: true,
            content_type: content_type_b.or(content_type_a),
            line_changes: Vec::new(),
            metadata,
        });
    }

    let line_changes = reconstruct(&segments_from_content(&info.content));
    metadata.lines_inserted = line_changes
        .iter()
        .filter(|c| c.kind == LineChangeKind::Added)
        .count();
    metadata.lines_deleted = line_changes
        .iter()
        .filter(|c| c.kind == LineChangeKind::Removed)
        .count();

    Ok(FileDiff {
        file_path: file_path.to_string(),
        is_binary: false,
        content_type: None,
        line_changes,
        metadata,
    })
}
