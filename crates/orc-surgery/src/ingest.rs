use std::fs;
use std::io::Read;
use std::iter::Peekable;
use std::path::Path;
use std::str::Chars;

use orc_core::errors::{ErrorInfo, OrcError};
use orc_core::{HyperedgeId, NodeId};
use orc_graph::Hypergraph;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// One input row: a paper and the textual list literal of its authors.
///
/// Columns other than `paper_id` and `author_ids` are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperRecord {
    /// Identifier of the paper, used as the hyperedge id.
    pub paper_id: String,
    /// Author list literal such as `['a1', 'a2']`.
    pub author_ids: String,
}

/// Papers read from a table together with the SHA-256 of the raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperTable {
    /// Parsed rows in file order.
    pub records: Vec<PaperRecord>,
    /// Hex-encoded SHA-256 of the input.
    pub input_hash: String,
}

/// Reads a headed CSV table of papers from any reader.
pub fn read_papers<R: Read>(mut reader: R) -> Result<PaperTable, OrcError> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|err| OrcError::Artifact(ErrorInfo::new("input-read", err.to_string())))?;
    let input_hash = hex::encode(Sha256::digest(&bytes));

    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes.as_slice());
    let mut records = Vec::new();
    for (idx, row) in csv_reader.deserialize::<PaperRecord>().enumerate() {
        let record = row.map_err(|err| {
            OrcError::Structural(
                ErrorInfo::new("input-row", err.to_string()).with_context("row", idx + 1),
            )
        })?;
        records.push(record);
    }
    tracing::info!(rows = records.len(), hash = %input_hash, "read paper table");
    Ok(PaperTable {
        records,
        input_hash,
    })
}

/// Reads a headed CSV table of papers from disk.
pub fn load_papers(path: &Path) -> Result<PaperTable, OrcError> {
    let file = fs::File::open(path).map_err(|err| {
        OrcError::Artifact(
            ErrorInfo::new("input-open", err.to_string()).with_context("path", path.display()),
        )
    })?;
    read_papers(file).map_err(|err| err.with_context("path", path.display()))
}

/// Builds a hypergraph with one hyperedge per paper.
///
/// Duplicate paper ids keep the first row; the conflict is logged by the store.
pub fn build_hypergraph(records: &[PaperRecord]) -> Result<Hypergraph, OrcError> {
    let mut graph = Hypergraph::new();
    for (idx, record) in records.iter().enumerate() {
        let authors = parse_author_ids(&record.author_ids).map_err(|err| {
            err.with_context("row", idx + 1)
                .with_context("paper_id", &record.paper_id)
        })?;
        graph.add_hyperedge(HyperedgeId::new(record.paper_id.clone()), authors);
    }
    tracing::info!(
        hyperedges = graph.hyperedge_count(),
        nodes = graph.node_count(),
        "built hypergraph from paper table"
    );
    Ok(graph)
}

/// Parses a list literal such as `['a1', "a2", 3]` into node ids.
///
/// Elements may be single-quoted, double-quoted or bare; a trailing comma and
/// surrounding whitespace are accepted.
pub fn parse_author_ids(raw: &str) -> Result<Vec<NodeId>, OrcError> {
    let inner = raw
        .trim()
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| malformed(raw, "expected a bracketed list"))?;

    let mut ids = Vec::new();
    let mut chars = inner.chars().peekable();
    loop {
        skip_whitespace(&mut chars);
        let element = match chars.peek() {
            None => break,
            Some(&quote) if quote == '\'' || quote == '"' => {
                chars.next();
                quoted(&mut chars, quote).ok_or_else(|| malformed(raw, "unterminated quote"))?
            }
            Some(_) => {
                let mut token = String::new();
                while let Some(&c) = chars.peek() {
                    if c == ',' {
                        break;
                    }
                    token.push(c);
                    chars.next();
                }
                let token = token.trim();
                if token.is_empty()
                    || token.contains(char::is_whitespace)
                    || token.contains(['\'', '"', '[', ']'])
                {
                    return Err(malformed(raw, "invalid list element"));
                }
                token.to_string()
            }
        };
        ids.push(NodeId::new(element));

        skip_whitespace(&mut chars);
        match chars.next() {
            None => break,
            Some(',') => continue,
            Some(_) => return Err(malformed(raw, "expected `,` between elements")),
        }
    }
    Ok(ids)
}

fn quoted(chars: &mut Peekable<Chars<'_>>, quote: char) -> Option<String> {
    let mut value = String::new();
    while let Some(c) = chars.next() {
        match c {
            '\\' => value.push(chars.next()?),
            c if c == quote => return Some(value),
            c => value.push(c),
        }
    }
    None
}

fn skip_whitespace(chars: &mut Peekable<Chars<'_>>) {
    while chars.peek().is_some_and(|c| c.is_whitespace()) {
        chars.next();
    }
}

fn malformed(raw: &str, reason: &str) -> OrcError {
    OrcError::Structural(
        ErrorInfo::new("malformed-author-list", reason).with_context("value", raw),
    )
}
