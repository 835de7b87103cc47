// ── Salt target identifiers ──
//
// Minion ids are `pi-<id>` on production and `pi-<prefix>-<id>` on every
// other environment, so one salt master can serve several directories.

use crate::model::ResolvedDevice;

/// Fixed first token of every salt id.
pub const BASE_TOKEN: &str = "pi";

/// Format one salt id from a numeric device id and an environment prefix.
pub fn format_target_id(target_id: u32, prefix: &str) -> String {
    IdentifierFormatter::new(prefix).format_id(target_id)
}

/// Formats resolved devices for one environment prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierFormatter {
    id_prefix: String,
}

impl IdentifierFormatter {
    pub fn new(prefix: &str) -> Self {
        let id_prefix = if prefix.is_empty() {
            BASE_TOKEN.to_owned()
        } else {
            format!("{BASE_TOKEN}-{prefix}")
        };
        Self { id_prefix }
    }

    /// `pi` or `pi-<prefix>`.
    pub fn id_prefix(&self) -> &str {
        &self.id_prefix
    }

    pub fn format_id(&self, target_id: u32) -> String {
        format!("{}-{target_id}", self.id_prefix)
    }

    pub fn format(&self, device: &ResolvedDevice) -> String {
        self.format_id(device.target_id)
    }

    pub fn format_all<'a>(
        &self,
        devices: impl IntoIterator<Item = &'a ResolvedDevice>,
    ) -> Vec<String> {
        devices.into_iter().map(|d| self.format(d)).collect()
    }

    /// Space-separated ids, as salt's `-L` list targeting expects.
    pub fn join<'a>(&self, devices: impl IntoIterator<Item = &'a ResolvedDevice>) -> String {
        self.format_all(devices).join(" ")
    }
}
