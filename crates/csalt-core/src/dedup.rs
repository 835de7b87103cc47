// ── Duplicate name detection ──
//
// A bare device name may exist in several groups. When it does, the run
// stops before anything is dispatched: partial execution against a guessed
// subset of devices is never acceptable.

use std::collections::HashMap;

use thiserror::Error;

use crate::model::ResolvedDevice;

/// One device name that matched more than one device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ambiguity {
    pub name: String,
    pub matches: Vec<ResolvedDevice>,
}

/// Every ambiguous name found in a resolution, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "device name query found {} duplicate device name(s), please specify group:devicename",
    .ambiguities.len()
)]
pub struct AmbiguousNames {
    ambiguities: Vec<Ambiguity>,
}

impl AmbiguousNames {
    /// Number of distinct ambiguous names.
    pub fn count(&self) -> usize {
        self.ambiguities.len()
    }

    pub fn ambiguities(&self) -> &[Ambiguity] {
        &self.ambiguities
    }
}

/// Group devices by bare name and fail if any name has more than one match.
pub fn check_duplicates(devices: &[ResolvedDevice]) -> Result<(), AmbiguousNames> {
    let mut order: Vec<&str> = Vec::new();
    let mut by_name: HashMap<&str, Vec<&ResolvedDevice>> = HashMap::new();

    for device in devices {
        let bucket = by_name.entry(device.device_name.as_str()).or_default();
        if bucket.is_empty() {
            order.push(device.device_name.as_str());
        }
        bucket.push(device);
    }

    let ambiguities: Vec<Ambiguity> = order
        .into_iter()
        .filter_map(|name| {
            let matches = by_name.remove(name)?;
            (matches.len() > 1).then(|| Ambiguity {
                name: name.to_owned(),
                matches: matches.into_iter().cloned().collect(),
            })
        })
        .collect();

    if ambiguities.is_empty() {
        Ok(())
    } else {
        Err(AmbiguousNames { ambiguities })
    }
}
