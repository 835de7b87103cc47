// ── Device query parsing ──
//
// DEVICEINFO is a comma-separated list of terms:
//   devicename          any group
//   :devicename         any group, explicit
//   groupname:devicename
//   groupname:          every device in the group

use std::fmt;

/// A single device lookup term. An empty `group_name` matches any group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceReference {
    pub group_name: String,
    pub device_name: String,
}

impl DeviceReference {
    pub fn any_group(device_name: impl Into<String>) -> Self {
        Self {
            group_name: String::new(),
            device_name: device_name.into(),
        }
    }

    pub fn in_group(group_name: impl Into<String>, device_name: impl Into<String>) -> Self {
        Self {
            group_name: group_name.into(),
            device_name: device_name.into(),
        }
    }

    pub fn has_group(&self) -> bool {
        !self.group_name.is_empty()
    }
}

impl fmt::Display for DeviceReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_group() {
            write!(f, "{}:{}", self.group_name, self.device_name)
        } else {
            f.write_str(&self.device_name)
        }
    }
}

/// Classification of one comma-separated term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    Device(DeviceReference),
    Group(String),
    Empty,
}

impl Term {
    /// Classify a single term by its first colon.
    pub fn classify(term: &str) -> Self {
        let term = term.trim();
        match term.split_once(':') {
            None if term.is_empty() => Self::Empty,
            None => Self::Device(DeviceReference::any_group(term)),
            Some((_, "")) if term.len() == 1 => Self::Empty,
            Some(("", device)) => Self::Device(DeviceReference::any_group(device)),
            Some((group, "")) => Self::Group(group.to_owned()),
            Some((group, device)) => Self::Device(DeviceReference::in_group(group, device)),
        }
    }
}

/// The parsed `DEVICEINFO` argument.
///
/// Built once per run with [`ParsedQuery::parse`] and never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedQuery {
    devices: Vec<DeviceReference>,
    groups: Vec<String>,
    raw: String,
    structured: bool,
}

impl ParsedQuery {
    /// Parse raw `DEVICEINFO` text. Never fails: unrecognisable terms
    /// degrade to bare device names and empty terms are dropped.
    pub fn parse(raw: &str) -> Self {
        let mut query = Self {
            raw: raw.to_owned(),
            ..Self::default()
        };

        for term in raw.trim().split(',') {
            let classified = Term::classify(term);
            if term.contains(':') && classified != Term::Empty {
                query.structured = true;
            }
            match classified {
                Term::Device(device) => query.devices.push(device),
                Term::Group(group) => query.groups.push(group),
                Term::Empty => {}
            }
        }

        query
    }

    pub fn devices(&self) -> &[DeviceReference] {
        &self.devices
    }

    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    /// The argument exactly as supplied.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Whether any non-blank text was supplied.
    pub fn is_raw(&self) -> bool {
        !self.raw.trim().is_empty()
    }

    /// Whether at least one device or group reference was parsed.
    pub fn has_values(&self) -> bool {
        !self.devices.is_empty() || !self.groups.is_empty()
    }

    /// Whether any term used the `group:device` / `group:` / `:device` syntax.
    ///
    /// A bare token such as `test.ping` is not structured: on its own it may
    /// be a device name or a salt command.
    pub fn is_structured(&self) -> bool {
        self.structured
    }
}
