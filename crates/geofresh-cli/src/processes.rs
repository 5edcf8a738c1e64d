//! `geofresh processes`: the catalogue of known GeoFRESH processes.

use geofresh_core::{FlowDirection, ProcessId, KNOWN_PROCESSES};

pub(crate) fn print_processes() {
    for line in process_lines() {
        println!("{line}");
    }
}

fn process_lines() -> Vec<String> {
    let width = KNOWN_PROCESSES.iter().map(|p| p.id.len()).max().unwrap_or(0);
    KNOWN_PROCESSES
        .iter()
        .map(|known| {
            let mut notes = Vec::new();
            if let Ok(id) = ProcessId::new(known.id) {
                match id.flow_direction() {
                    Some(FlowDirection::Upstream) => notes.push("upstream"),
                    Some(FlowDirection::Downstream) => notes.push("downstream"),
                    None => {}
                }
                if id.is_snapping() {
                    notes.push("coordinates only");
                }
            }
            let notes = if notes.is_empty() {
                String::new()
            } else {
                format!(" [{}]", notes.join(", "))
            };
            format!(
                "{:<width$}  {} location(s)  {}{notes}",
                known.id, known.locations, known.description
            )
        })
        .collect()
}
