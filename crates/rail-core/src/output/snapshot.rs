//! Tick Snapshots
//!
//! Optional JSON Lines log with the state of every train after each tick.

use bevy_ecs::prelude::*;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use rail_events::{SimTimestamp, Tick, TickSnapshot};

use crate::components::StationTable;
use crate::setup::collect_fleets;
use crate::systems::SatisfactionSeries;

use super::SinkError;

/// Writes one [`TickSnapshot`] per line.
pub struct SnapshotWriter {
    path: PathBuf,
    writer: BufWriter<File>,
    written: u64,
}

impl SnapshotWriter {
    /// Creates (or truncates) the snapshot file, creating parent directories.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self, SinkError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(SinkError::io(parent))?;
        }
        let file = File::create(&path).map_err(SinkError::io(&path))?;

        Ok(Self {
            writer: BufWriter::new(file),
            path,
            written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Snapshots written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn write(&mut self, snapshot: &TickSnapshot) -> Result<(), SinkError> {
        let line = snapshot.to_jsonl()?;
        writeln!(self.writer, "{}", line).map_err(SinkError::io(&self.path))?;
        self.written += 1;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), SinkError> {
        self.writer.flush().map_err(SinkError::io(&self.path))
    }
}

impl Drop for SnapshotWriter {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            tracing::warn!("Failed to flush snapshot log: {}", e);
        }
    }
}

/// Captures both fleets after the tick's scoring has run.
pub fn capture_snapshot(world: &mut World, run_index: u32, tick: Tick) -> TickSnapshot {
    let fleets = collect_fleets(world);
    let stations = world.resource::<StationTable>();
    let average_satisfaction = world
        .resource::<SatisfactionSeries>()
        .values()
        .last()
        .copied()
        .unwrap_or(0.0);

    TickSnapshot {
        run_index,
        timestamp: SimTimestamp::at(tick),
        average_satisfaction,
        fleets: fleets.iter().map(|fleet| fleet.to_snapshot(stations)).collect(),
    }
}

/// Console report of one tick: a header, then each fleet followed by its
/// trains.
pub fn tick_report(snapshot: &TickSnapshot) -> Vec<String> {
    let mut lines = vec![format!(
        "Run {} at {}: average satisfaction {:.2}",
        snapshot.run_index, snapshot.timestamp, snapshot.average_satisfaction
    )];
    for fleet in &snapshot.fleets {
        lines.push(format!("  {}", fleet));
        lines.extend(fleet.trains.iter().map(|train| format!("    {}", train)));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Fleet;
    use crate::setup::reference_stations;
    use rail_events::{Direction, StatusSnapshot};
    use tempfile::tempdir;

    #[test]
    fn test_capture_snapshot() {
        let mut world = World::new();
        world.insert_resource(reference_stations());
        let mut series = SatisfactionSeries::default();
        series.push(97.5);
        world.insert_resource(series);
        world.spawn(Fleet::initialize(2, 22, 0, 0, 15));
        world.spawn(Fleet::initialize(1, 0, 22, 0, 15));

        let snapshot = capture_snapshot(&mut world, 3, 90);

        assert_eq!(snapshot.run_index, 3);
        assert_eq!(snapshot.timestamp.time.to_string(), "01:30");
        assert_eq!(snapshot.average_satisfaction, 97.5);
        assert_eq!(snapshot.fleets[0].direction, Direction::Up);
        assert_eq!(snapshot.fleets[1].trains.len(), 2);
        assert_eq!(snapshot.fleets[1].trains[0].station, "上野");
        assert_eq!(snapshot.fleets[1].trains[0].status, StatusSnapshot::NotStarted);
    }

    #[test]
    fn test_writer_creates_directories_and_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("snapshots").join("ticks.jsonl");

        let mut world = World::new();
        world.insert_resource(reference_stations());
        world.insert_resource(SatisfactionSeries::default());
        world.spawn(Fleet::initialize(1, 0, 22, 0, 15));

        {
            let mut writer = SnapshotWriter::create(&path).unwrap();
            for tick in 0..3 {
                let snapshot = capture_snapshot(&mut world, 0, tick);
                writer.write(&snapshot).unwrap();
            }
            assert_eq!(writer.written(), 3);
        }

        let content = fs::read_to_string(&path).unwrap();
        let ticks: Vec<Tick> = content
            .lines()
            .map(|l| TickSnapshot::from_jsonl(l).unwrap().timestamp.tick)
            .collect();
        assert_eq!(ticks, vec![0, 1, 2]);
    }
}
