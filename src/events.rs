use crate::grid::Position;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Role a finalized cell plays in the emitted stream
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellRole {
    Visited,
    Path,
}

/// One cell finalization, emitted in the order cells are settled
///
/// The external renderer owns all timing and animation; the core only
/// guarantees the order of these events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitEvent {
    pub position: Position,
    pub role: CellRole,
}

/// Consumer of the visit stream
///
/// The callback doubles as the suspension point for paced rendering: a host
/// that wants to animate per step simply blocks or schedules inside it.
pub trait VisitSink {
    fn on_visit(&mut self, event: VisitEvent);
}

/// Sink that drops everything
pub struct NullSink;

impl VisitSink for NullSink {
    fn on_visit(&mut self, _event: VisitEvent) {}
}

impl VisitSink for Vec<VisitEvent> {
    fn on_visit(&mut self, event: VisitEvent) {
        self.push(event);
    }
}

/// Visit event with milliseconds since the log was created
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct TimedEvent {
    pub timestamp_ms: u64,
    pub position: Position,
    pub role: CellRole,
}

/// Event recorder that can be dumped to a JSON file after a run
pub struct EventLog {
    start_time: Instant,
    events: Vec<TimedEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        EventLog {
            start_time: Instant::now(),
            events: Vec::new(),
        }
    }

    /// Get all recorded events
    pub fn events(&self) -> &[TimedEvent] {
        &self.events
    }

    /// Save the log to a JSON file
    pub fn save_to_file(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string_pretty(&self.events)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// One-line summary of the recorded run
    pub fn summary(&self) -> String {
        let visited = self
            .events
            .iter()
            .filter(|e| e.role == CellRole::Visited)
            .count();
        let path = self.events.len() - visited;
        let duration = self.events.last().map(|e| e.timestamp_ms).unwrap_or(0);
        format!(
            "{} events ({} visited, {} path) over {}ms",
            self.events.len(),
            visited,
            path,
            duration
        )
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

impl VisitSink for EventLog {
    fn on_visit(&mut self, event: VisitEvent) {
        self.events.push(TimedEvent {
            timestamp_ms: self.start_time.elapsed().as_millis() as u64,
            position: event.position,
            role: event.role,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_log_preserves_order() {
        let mut log = EventLog::new();
        log.on_visit(VisitEvent {
            position: Position::new(0, 1),
            role: CellRole::Visited,
        });
        log.on_visit(VisitEvent {
            position: Position::new(0, 2),
            role: CellRole::Path,
        });

        let events = log.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].position, Position::new(0, 1));
        assert_eq!(events[0].role, CellRole::Visited);
        assert_eq!(events[1].role, CellRole::Path);
        assert!(events[0].timestamp_ms <= events[1].timestamp_ms);
        assert_eq!(log.summary(), format!("2 events (1 visited, 1 path) over {}ms", events[1].timestamp_ms));
    }

    #[test]
    fn visit_event_json_round_trip() {
        let event = VisitEvent {
            position: Position::new(3, 4),
            role: CellRole::Path,
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: VisitEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
