// ── Resolved devices ──
//
// Domain-side view of what the directory returned. Converted from the
// `csalt-api` wire types so nothing downstream depends on JSON field names.

use std::collections::HashSet;
use std::fmt;

use tracing::warn;

use crate::dedup::{AmbiguousNames, check_duplicates};

/// A device the directory matched, with its un-prefixed salt id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedDevice {
    pub group_name: String,
    pub device_name: String,
    pub target_id: u32,
}

impl ResolvedDevice {
    pub fn new(group_name: impl Into<String>, device_name: impl Into<String>, target_id: u32) -> Self {
        Self {
            group_name: group_name.into(),
            device_name: device_name.into(),
            target_id,
        }
    }
}

impl fmt::Display for ResolvedDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_name, self.device_name)
    }
}

impl ResolvedDevice {
    /// Convert a wire device. Devices without a salt id cannot be targeted
    /// and are dropped with a warning.
    fn from_wire(d: csalt_api::Device) -> Option<Self> {
        let Some(target_id) = d.salt_id else {
            warn!(
                group = %d.group_name,
                device = %d.device_name,
                "device has no salt id, skipping"
            );
            return None;
        };
        Some(Self::new(d.group_name, d.device_name, target_id))
    }
}

/// Result of one translation call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Matched through `group:` or `group:device` terms.
    pub group_matches: Vec<ResolvedDevice>,
    /// Matched through a bare device name; the only place ambiguity can arise.
    pub name_matches: Vec<ResolvedDevice>,
}

impl Resolution {
    pub fn is_empty(&self) -> bool {
        self.group_matches.is_empty() && self.name_matches.is_empty()
    }

    /// Reject the resolution if a bare name matched devices in more than one group.
    pub fn check_duplicates(&self) -> Result<(), AmbiguousNames> {
        check_duplicates(&self.name_matches)
    }

    /// Every device to target: group matches first, then name matches.
    /// A salt id reached through more than one term is only listed once.
    pub fn targets(&self) -> Vec<&ResolvedDevice> {
        let mut seen = HashSet::new();
        self.group_matches
            .iter()
            .chain(&self.name_matches)
            .filter(|d| seen.insert(d.target_id))
            .collect()
    }
}

impl From<csalt_api::DeviceResponse> for Resolution {
    fn from(resp: csalt_api::DeviceResponse) -> Self {
        Self {
            group_matches: resp
                .devices
                .into_iter()
                .filter_map(ResolvedDevice::from_wire)
                .collect(),
            name_matches: resp
                .name_matches
                .into_iter()
                .filter_map(ResolvedDevice::from_wire)
                .collect(),
        }
    }
}
