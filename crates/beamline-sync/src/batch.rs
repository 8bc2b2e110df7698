//! Bounded batch read of hardware channels.
//!
//! Channel sources answer asynchronously on a reply channel; the
//! batch reader collects replies until every requested handle has
//! answered or the timeout budget runs out. Whatever subset arrived is
//! the result — partial success is not an error, and the unresolved
//! remainder is logged and summarized for observability.

use std::time::{Duration, Instant};

use beamline_core::HardwareId;
use crossbeam_channel::{bounded, Receiver};
use indexmap::{IndexMap, IndexSet};
use tracing::{debug, warn};

/// Timeout budget for one batched read.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle of one hardware channel: a node plus a signal name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ChannelHandle {
    /// The node the signal belongs to.
    pub node: HardwareId,
    /// Signal name within the node's device protocol.
    pub signal: &'static str,
}

impl ChannelHandle {
    /// Build a handle.
    pub fn new(node: HardwareId, signal: &'static str) -> Self {
        Self { node, signal }
    }
}

impl std::fmt::Display for ChannelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.node, self.signal)
    }
}

/// The transport seam to the control system.
///
/// `request` issues one batched get and returns the reply channel;
/// implementations may answer from memory, a cache process, or a
/// network bridge, in any order, and may simply never answer handles
/// they cannot resolve.
pub trait ChannelSource {
    /// Request values for `handles`; replies arrive on the returned
    /// channel.
    fn request(&self, handles: &[ChannelHandle]) -> Receiver<(ChannelHandle, f64)>;
}

/// A source with no channels: every request is an immediately
/// exhausted reply stream. The natural source for design-mode
/// managers, which never read hardware.
pub struct NoChannels;

impl ChannelSource for NoChannels {
    fn request(&self, _handles: &[ChannelHandle]) -> Receiver<(ChannelHandle, f64)> {
        let (tx, rx) = bounded(0);
        drop(tx);
        rx
    }
}

/// Summary of one batched read, for observability.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchReport {
    /// Number of handles requested.
    pub requested: usize,
    /// Number of handles that answered within the budget.
    pub resolved: usize,
}

/// Issue one batched get and wait up to `timeout` for replies.
///
/// Handles that do not answer are logged as unresolved and absent from
/// the result map; downstream consumers tolerate missing properties
/// and a genuinely required one surfaces later, through the
/// synchronizer contract.
pub fn batch_read(
    source: &dyn ChannelSource,
    handles: &[ChannelHandle],
    timeout: Duration,
) -> (IndexMap<ChannelHandle, f64>, BatchReport) {
    let mut values = IndexMap::with_capacity(handles.len());
    if handles.is_empty() {
        return (
            values,
            BatchReport {
                requested: 0,
                resolved: 0,
            },
        );
    }

    let wanted: IndexSet<&ChannelHandle> = handles.iter().collect();
    let deadline = Instant::now() + timeout;
    let rx = source.request(handles);

    while values.len() < wanted.len() {
        match rx.recv_deadline(deadline) {
            Ok((handle, value)) => {
                if wanted.contains(&handle) {
                    values.insert(handle, value);
                }
            }
            // Timeout or a source that hung up: keep what arrived.
            Err(_) => break,
        }
    }

    let report = BatchReport {
        requested: handles.len(),
        resolved: values.len(),
    };
    if report.resolved < report.requested {
        for handle in handles.iter().filter(|h| !values.contains_key(*h)) {
            warn!(%handle, "channel unresolved within batch timeout");
        }
    }
    debug!(
        requested = report.requested,
        resolved = report.resolved,
        "batch read complete"
    );
    (values, report)
}
