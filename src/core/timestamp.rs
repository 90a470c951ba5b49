//! Timestamp rendering
//!
//! Records carry their timestamp as an already-formatted string,
//! rendered at enqueue time from a configurable strftime format. The
//! format may contain a `%.NS` placeholder (N in 1..=9) which expands
//! to the first N digits of the nanoseconds within the current second,
//! e.g. `"%H:%M:%S.%.4S"` renders as `"10:30:45.1234"`.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local};

/// Used whenever the configured format fails to parse. A bad format
/// string must never panic or drop the record.
const FALLBACK_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render the current local time with the given strftime format.
pub fn local_timestamp(format: &str) -> String {
    let now = Local::now();
    let expanded = expand_fraction_placeholder(format, now.timestamp_subsec_nanos());

    format_checked(&now, &expanded)
        .unwrap_or_else(|| now.format(FALLBACK_FORMAT).to_string())
}

/// Replace every `%.NS` placeholder with N digits of the nanosecond
/// count, zero-padded so the fraction reads correctly. Anything that is
/// not exactly `%.` + digit + `S` is left for strftime to interpret.
fn expand_fraction_placeholder(format: &str, nanos: u32) -> String {
    let mut out = String::with_capacity(format.len() + 8);
    let mut rest = format;

    while let Some(pos) = rest.find("%.") {
        let (head, tail) = rest.split_at(pos);
        out.push_str(head);

        let mut chars = tail.chars();
        chars.next();
        chars.next();

        let mut probe = chars.clone();
        match (probe.next(), probe.next()) {
            (Some(n @ '1'..='9'), Some('S')) => {
                let precision = n as usize - '0' as usize;
                let digits = format!("{:09}", nanos % 1_000_000_000);
                out.push_str(&digits[..precision]);
                rest = probe.as_str();
            }
            _ => {
                out.push_str("%.");
                rest = chars.as_str();
            }
        }
    }

    out.push_str(rest);
    out
}

/// Format with pre-validated items, rejecting formats chrono cannot
/// parse instead of letting the Display impl panic mid-write.
fn format_checked(now: &DateTime<Local>, format: &str) -> Option<String> {
    let items: Vec<Item<'_>> = StrftimeItems::new(format).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return None;
    }
    Some(now.format_with_items(items.into_iter()).to_string())
}
