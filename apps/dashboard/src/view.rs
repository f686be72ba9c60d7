//! Plain-text rendering of the dashboard.

use growlab_protocol::ResourceDescriptor;
use growlab_sync::{Coordinator, ResourceSlot};
use serde_json::Value;

pub const TITLE: &str = "Bonsai Growlab Dashboard";

/// Turns a device key like `temp_c` into `temp c`.
pub fn humanize_key(key: &str) -> String {
    key.replace('_', " ")
}

/// Strings render without quotes; everything else in its JSON form.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn section_title(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Renders one resource: a loading placeholder until the first snapshot
/// arrives, then one `key: value` row per field.
pub fn render_section(name: &str, slot: Option<&ResourceSlot>) -> String {
    let Some(slot) = slot else {
        return format!("Loading {name} data...\n");
    };
    let Some(snapshot) = slot.latest() else {
        return format!("Loading {name} data...\n");
    };

    let mut out = section_title(name);
    if slot.is_stale() {
        out.push_str(" (stale)");
    }
    out.push('\n');

    for (key, value) in snapshot.iter() {
        out.push_str(&format!("  {}: {}\n", humanize_key(key), format_value(value)));
    }
    out
}

/// Renders every resource in `resources` order under the dashboard title.
pub fn render_dashboard(coordinator: &Coordinator, resources: &[ResourceDescriptor]) -> String {
    let mut out = format!("{TITLE}\n\n");
    for descriptor in resources {
        let slot = coordinator.slot(descriptor.name());
        out.push_str(&render_section(descriptor.name(), slot.as_ref()));
        out.push('\n');
    }
    out
}
