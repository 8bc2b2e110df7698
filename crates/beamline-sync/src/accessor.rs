//! Property accessors: device-family-specific resolution of channel
//! handles and property values.
//!
//! For a given mode, an accessor names the channels to batch-read and
//! translates a raw channel-value map into named property values,
//! applying protocol-level unit scaling (phase degrees→radians,
//! amplitude MV→V). There is no silent fallback between tiers: a live
//! channel that did not answer simply leaves its property absent, to
//! be caught by the synchronizer if the property is required.

use beamline_core::{keys, HardwareNode, PropertyKey};
use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::batch::ChannelHandle;
use crate::SyncMode;

/// Channel handles for one node; inline up to the common case of four.
pub type ChannelList = SmallVec<[ChannelHandle; 4]>;

/// Device-family property resolution.
pub trait PropertyAccessor {
    /// Channel handles to batch-read for `node` in `mode`. Empty when
    /// the mode resolves this family without I/O.
    fn channels(&self, node: &HardwareNode, mode: SyncMode) -> ChannelList;

    /// Resolve named property values for `node` from the raw channel
    /// map, per the mode's rules.
    fn resolve(
        &self,
        node: &HardwareNode,
        raw: &IndexMap<ChannelHandle, f64>,
        mode: SyncMode,
    ) -> IndexMap<PropertyKey, f64>;
}

/// Field readback signal of a powered magnet.
const SIG_FIELD: &str = "fieldRB";
/// Averaged cavity amplitude signal, MV.
const SIG_CAV_AMP: &str = "cavAmpAvg";
/// Averaged cavity phase signal, degrees.
const SIG_CAV_PHASE: &str = "cavPhaseAvg";

/// Accessor for powered electromagnets: one field readback channel.
pub struct ElectromagnetAccessor;

impl PropertyAccessor for ElectromagnetAccessor {
    fn channels(&self, node: &HardwareNode, mode: SyncMode) -> ChannelList {
        match mode {
            SyncMode::Design => ChannelList::new(),
            SyncMode::Live | SyncMode::LiveRfDesign => {
                let mut list = ChannelList::new();
                list.push(ChannelHandle::new(node.id.clone(), SIG_FIELD));
                list
            }
        }
    }

    fn resolve(
        &self,
        node: &HardwareNode,
        raw: &IndexMap<ChannelHandle, f64>,
        mode: SyncMode,
    ) -> IndexMap<PropertyKey, f64> {
        let mut values = IndexMap::new();
        match mode {
            SyncMode::Design => {
                if let Some(field) = node.design_value(keys::FIELD) {
                    values.insert(keys::FIELD, field);
                }
            }
            SyncMode::Live | SyncMode::LiveRfDesign => {
                let handle = ChannelHandle::new(node.id.clone(), SIG_FIELD);
                if let Some(&field) = raw.get(&handle) {
                    values.insert(keys::FIELD, field);
                }
            }
        }
        values
    }
}

/// Accessor for permanent-magnet quadrupoles: no live channels exist;
/// every mode resolves the design field.
pub struct PermanentQuadAccessor;

impl PropertyAccessor for PermanentQuadAccessor {
    fn channels(&self, _node: &HardwareNode, _mode: SyncMode) -> ChannelList {
        ChannelList::new()
    }

    fn resolve(
        &self,
        node: &HardwareNode,
        _raw: &IndexMap<ChannelHandle, f64>,
        _mode: SyncMode,
    ) -> IndexMap<PropertyKey, f64> {
        let mut values = IndexMap::new();
        if let Some(field) = node.design_value(keys::FIELD) {
            values.insert(keys::FIELD, field);
        }
        values
    }
}

/// Accessor for RF cavities: amplitude and phase channels, with
/// MV→V and degree→radian protocol scaling.
///
/// In live-RF-design mode the cavity reads nothing and resolves its
/// design amplitude/phase, while other families still read live.
pub struct RfCavityAccessor;

impl PropertyAccessor for RfCavityAccessor {
    fn channels(&self, node: &HardwareNode, mode: SyncMode) -> ChannelList {
        match mode {
            SyncMode::Design | SyncMode::LiveRfDesign => ChannelList::new(),
            SyncMode::Live => {
                let mut list = ChannelList::new();
                list.push(ChannelHandle::new(node.id.clone(), SIG_CAV_AMP));
                list.push(ChannelHandle::new(node.id.clone(), SIG_CAV_PHASE));
                list
            }
        }
    }

    fn resolve(
        &self,
        node: &HardwareNode,
        raw: &IndexMap<ChannelHandle, f64>,
        mode: SyncMode,
    ) -> IndexMap<PropertyKey, f64> {
        let mut values = IndexMap::new();
        match mode {
            SyncMode::Design | SyncMode::LiveRfDesign => {
                if let Some(amp) = node.design_value(keys::AMPLITUDE) {
                    values.insert(keys::AMPLITUDE, amp);
                }
                if let Some(phase) = node.design_value(keys::PHASE) {
                    values.insert(keys::PHASE, phase);
                }
            }
            SyncMode::Live => {
                let amp = ChannelHandle::new(node.id.clone(), SIG_CAV_AMP);
                if let Some(&mv) = raw.get(&amp) {
                    values.insert(keys::AMPLITUDE, mv * 1.0e6);
                }
                let phase = ChannelHandle::new(node.id.clone(), SIG_CAV_PHASE);
                if let Some(&deg) = raw.get(&phase) {
                    values.insert(keys::PHASE, deg.to_radians());
                }
            }
        }
        values
    }
}
