//! Hardware/model synchronization layer.
//!
//! Binds abstract element properties (field strength, RF amplitude and
//! phase) to live hardware channels, cached snapshots, or design
//! values. A [`SynchronizationManager`] owns the mode, the per-family
//! registries, the model-input override table, and the property cache;
//! the bounded [`batch_read`] is the only blocking operation in the
//! model.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod accessor;
mod batch;
mod manager;
mod registry;
mod synchronizer;

pub use accessor::{
    ChannelList, ElectromagnetAccessor, PermanentQuadAccessor, PropertyAccessor, RfCavityAccessor,
};
pub use batch::{batch_read, BatchReport, ChannelHandle, ChannelSource, NoChannels, DEFAULT_TIMEOUT};
pub use manager::{ModelInput, ResyncReport, SyncEntry, SynchronizationManager};
pub use registry::{standard_registries, AccessorRegistry, SynchronizerRegistry};
pub use synchronizer::{
    ElectromagnetSynchronizer, PermanentQuadSynchronizer, RfCavitySynchronizer, Synchronizer,
};

/// Synchronization mode, fixed per manager instance.
///
/// The three modes are mutually exclusive: *design* resolves from
/// hardware-node design defaults with no I/O; *live* batch-reads the
/// hardware channels; *live-RF-design* reads live channels but keeps
/// RF amplitude and phase at their design values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SyncMode {
    /// Design defaults only; no I/O, never cached.
    #[default]
    Design,
    /// Live hardware readbacks for everything.
    Live,
    /// Live readbacks except RF parameters, which stay at design.
    LiveRfDesign,
}

impl SyncMode {
    /// Whether this mode performs hardware I/O at all.
    pub fn reads_hardware(self) -> bool {
        !matches!(self, Self::Design)
    }
}
