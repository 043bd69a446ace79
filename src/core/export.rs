use crate::core::time_codec::{format_millis, quantize};
use crate::domain::model::{Group, Millis};
use crate::utils::error::Result;
use serde::Serialize;
use std::path::Path;

const HEADER: [&str; 6] = [
    "id",
    "created_at",
    "participants",
    "finishes",
    "first_time_ms",
    "first_time",
];

#[derive(Debug, Serialize)]
struct RaceRow<'a> {
    id: &'a str,
    created_at: String,
    participants: u32,
    finishes: u32,
    first_time_ms: Option<Millis>,
    first_time: String,
}

/// Writes one CSV row per race, in recorded order. Returns the row count.
pub fn write_races_csv<W: std::io::Write>(group: &Group, writer: W) -> Result<usize> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(HEADER)?;

    for race in &group.races {
        let time = race.first_place_time().map(|t| quantize(t as f64));
        wtr.serialize(RaceRow {
            id: &race.id,
            created_at: race.created_at.to_rfc3339(),
            participants: race.participants,
            finishes: race.finishes,
            first_time_ms: time,
            first_time: time.map(format_millis).unwrap_or_default(),
        })?;
    }

    wtr.flush()?;
    Ok(group.races.len())
}

pub fn export_races_csv<P: AsRef<Path>>(group: &Group, path: P) -> Result<usize> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    let rows = write_races_csv(group, file)?;

    tracing::info!("Exported {} races of '{}' to {}", rows, group.name, path.display());
    Ok(rows)
}
