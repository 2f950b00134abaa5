//! Line lexer behind the lenient CI manifest fallback.
//!
//! When a `.travis.yml` does not parse as a whole, only the block holding the
//! build matrix (or, failing that, the top-level `php:` list) is cut out and
//! parsed on its own. A block starts at a `matrix:` or `php:` line in column
//! zero and runs up to, but excluding, the next line that opens a top-level
//! key.

use regex::Regex;
use std::sync::LazyLock;

static TOP_LEVEL_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S.*:").expect("top-level key regex is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    MatrixStart,
    PhpStart,
    TopLevelKey,
    Other,
}

impl LineKind {
    pub fn classify(line: &str) -> Self {
        if line.starts_with("matrix:") {
            LineKind::MatrixStart
        } else if line.starts_with("php:") {
            LineKind::PhpStart
        } else if TOP_LEVEL_KEY.is_match(line) {
            LineKind::TopLevelKey
        } else {
            LineKind::Other
        }
    }

    pub fn opens_top_level_key(self) -> bool {
        !matches!(self, LineKind::Other)
    }
}

/// Half-open range of line indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub start: usize,
    pub end: usize,
}

/// Locate the matrix block, or the `php:` block when there is no matrix
pub fn locate_block(lines: &[&str]) -> Option<Block> {
    let kinds: Vec<LineKind> = lines.iter().map(|line| LineKind::classify(line)).collect();

    let start = kinds
        .iter()
        .position(|kind| *kind == LineKind::MatrixStart)
        .or_else(|| kinds.iter().position(|kind| *kind == LineKind::PhpStart))?;

    let end = kinds[start + 1..]
        .iter()
        .position(|kind| kind.opens_top_level_key())
        .map(|offset| start + 1 + offset)
        .unwrap_or(lines.len());

    Some(Block { start, end })
}

/// Cut the matrix or `php:` block out of a CI manifest as a standalone
/// document. `None` when neither marker is present.
pub fn reduce(text: &str) -> Option<String> {
    let lines: Vec<&str> = text.lines().collect();
    let block = locate_block(&lines)?;

    let mut reduced = lines[block.start..block.end].join("\n");
    reduced.push('\n');
    Some(reduced)
}

/// Whether the first significant line opens a flow collection (`{` or `[`).
/// The CI dialect only covers block-style documents.
pub fn has_flow_root(text: &str) -> bool {
    text.lines()
        .map(str::trim_start)
        .find(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with("---"))
        .is_some_and(|line| line.starts_with('{') || line.starts_with('['))
}
