//! Flattening many decision lists into one positional node array, and
//! recombining the executor's positional result codes into one outcome per
//! list.
//!
//! The wire format carries no per-node identifier: `codes[i]` belongs to
//! `nodes[i]`, and list boundaries exist only on this side, recorded while
//! flattening.

use std::ops::Range;
use std::thread;

use declist_types::{DecisionList, SymbolTable};
use declist_wire::{flatten_for_dispatch, EncodedNode};
use sha2::{Digest, Sha256};

use crate::code::ResultCode;
use crate::error::{DispatchError, DispatchResult};

/// An ordered batch of encoded nodes plus the per-list boundaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    nodes: Vec<String>,
    /// `spans[list]` is the range of `nodes` owned by that list.
    spans: Vec<Range<usize>>,
}

impl Batch {
    /// Flatten `lists` in list order, then node order.
    ///
    /// With `workers > 1` lists are encoded on scoped threads in contiguous
    /// chunks; the chunks are concatenated back in list order, so the
    /// result is identical to a single-threaded flatten.
    pub fn flatten(
        lists: &[DecisionList],
        symbols: &SymbolTable,
        workers: usize,
    ) -> DispatchResult<Self> {
        let encoded: Vec<DispatchResult<Vec<EncodedNode>>> = if workers <= 1 || lists.len() < 2 {
            encode_lists(lists, 0, symbols)
        } else {
            let chunk = lists.len().div_ceil(workers);
            thread::scope(|scope| {
                let handles: Vec<_> = lists
                    .chunks(chunk)
                    .enumerate()
                    .map(|(i, part)| scope.spawn(move || encode_lists(part, i * chunk, symbols)))
                    .collect();
                handles
                    .into_iter()
                    .flat_map(|h| match h.join() {
                        Ok(part) => part,
                        Err(panic) => std::panic::resume_unwind(panic),
                    })
                    .collect()
            })
        };

        let mut nodes = Vec::new();
        let mut spans = Vec::with_capacity(lists.len());
        for list_nodes in encoded {
            let list_nodes = list_nodes?;
            let start = nodes.len();
            nodes.extend(list_nodes.iter().map(EncodedNode::to_wire));
            spans.push(start..nodes.len());
        }
        Ok(Self { nodes, spans })
    }

    /// The flat node strings, in dispatch order.
    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    /// Total number of encoded nodes across all lists.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of lists flattened into the batch, empty lists included.
    pub fn list_count(&self) -> usize {
        self.spans.len()
    }

    /// Number of nodes owned by each list.
    pub fn list_lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.spans.iter().map(|s| s.len())
    }

    /// Map a flat index back to `(list, node)`.
    pub fn locate(&self, index: usize) -> Option<(usize, usize)> {
        if index >= self.nodes.len() {
            return None;
        }
        let list = self.spans.partition_point(|s| s.end <= index);
        Some((list, index - self.spans[list].start))
    }

    /// SHA-256 over the length-prefixed node strings, hex encoded.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for node in &self.nodes {
            hasher.update((node.len() as u64).to_le_bytes());
            hasher.update(node.as_bytes());
        }
        format!("{:x}", hasher.finalize())
    }

    /// Recover one outcome per list from the executor's codes.
    ///
    /// Fails atomically: the length must match, and any Error (or unknown)
    /// code anywhere in the array aborts the batch before outcomes are
    /// resolved. Within a list the first True/False code decides; Ignore
    /// codes are skipped. The skip rule is provisional, see
    /// [`ResultCode::Ignore`].
    pub fn recombine(&self, raw_codes: &[i32]) -> DispatchResult<Vec<bool>> {
        if raw_codes.len() != self.nodes.len() {
            return Err(DispatchError::LengthMismatch {
                expected: self.nodes.len(),
                actual: raw_codes.len(),
            });
        }

        let codes = raw_codes
            .iter()
            .enumerate()
            .map(|(index, &code)| match ResultCode::from_raw(code) {
                Some(ResultCode::Error) => {
                    let (list, node) = self.locate(index).unwrap_or((0, index));
                    Err(DispatchError::NodeFailed { index, list, node })
                }
                Some(code) => Ok(code),
                None => Err(DispatchError::InvalidCode { index, code }),
            })
            .collect::<DispatchResult<Vec<ResultCode>>>()?;

        self.spans
            .iter()
            .enumerate()
            .map(|(list, span)| {
                codes[span.clone()]
                    .iter()
                    .find_map(|code| code.decision())
                    .ok_or(DispatchError::Undecided {
                        list,
                        nodes: span.len(),
                    })
            })
            .collect()
    }
}

/// Encode a run of lists; `offset` is the index of `lists[0]` in the batch.
fn encode_lists(
    lists: &[DecisionList],
    offset: usize,
    symbols: &SymbolTable,
) -> Vec<DispatchResult<Vec<EncodedNode>>> {
    lists
        .iter()
        .enumerate()
        .map(|(i, list)| {
            flatten_for_dispatch(list, symbols).map_err(|source| DispatchError::Encode {
                list: offset + i,
                source,
            })
        })
        .collect()
}
