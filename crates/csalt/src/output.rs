//! Human-readable progress output: lookups, matches and translated ids.

use std::io::{self, Write};

use csalt_core::{IdentifierFormatter, ParsedQuery, Resolution, ResolvedDevice};

/// Lines describing what the query will look up.
pub fn lookup_lines(query: &ParsedQuery) -> Vec<String> {
    let devices = query.devices().iter().map(|d| {
        if d.has_group() {
            format!("Looking for group:device {d}")
        } else {
            format!("Looking for device by name {d}")
        }
    });
    let groups = query
        .groups()
        .iter()
        .map(|g| format!("Looking for devices in group {g}"));
    devices.chain(groups).collect()
}

fn match_line(device: &ResolvedDevice, formatter: &IdentifierFormatter) -> String {
    format!("{device} salt id: {}", formatter.format(device))
}

/// Lines listing every translated device with its salt id.
pub fn resolution_lines(res: &Resolution, formatter: &IdentifierFormatter) -> Vec<String> {
    let mut lines = Vec::new();
    if !res.group_matches.is_empty() {
        lines.push("Translated devices:".to_owned());
        lines.extend(res.group_matches.iter().map(|d| format!("  {}", match_line(d, formatter))));
    }
    if !res.name_matches.is_empty() {
        lines.push("Translated device names:".to_owned());
        lines.extend(res.name_matches.iter().map(|d| format!("  {}", match_line(d, formatter))));
    }
    lines
}

pub fn show_line(ids: &[String]) -> String {
    format!("translated salt names {}", ids.join(" "))
}

/// Write lines to stdout, ignoring broken pipes.
pub fn print_lines(lines: &[String]) {
    let mut out = io::stdout().lock();
    for line in lines {
        if writeln!(out, "{line}").is_err() {
            return;
        }
    }
    let _ = out.flush();
}
