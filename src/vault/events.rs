//! Change Notifications
//!
//! Typed events describing committed record changes, and the listener
//! interface the manager delivers them through.

use std::sync::mpsc::Sender;

use serde::Serialize;

use crate::db::Record;

/// A committed change to the record store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChangeEvent {
    Created { record: Record },
    Updated { old: Record, new: Record },
    Deleted { record: Record },
}

impl ChangeEvent {
    /// Snapshot before the change, absent for creations
    pub fn old(&self) -> Option<&Record> {
        match self {
            Self::Created { .. } => None,
            Self::Updated { old, .. } => Some(old),
            Self::Deleted { record } => Some(record),
        }
    }

    /// Snapshot after the change, absent for deletions
    pub fn new_record(&self) -> Option<&Record> {
        match self {
            Self::Created { record } => Some(record),
            Self::Updated { new, .. } => Some(new),
            Self::Deleted { .. } => None,
        }
    }

    /// Hand the event to the matching listener callback
    pub fn dispatch(&self, listener: &dyn ChangeListener) {
        match self {
            Self::Created { record } => listener.on_created(record),
            Self::Updated { old, new } => listener.on_updated(old, new),
            Self::Deleted { record } => listener.on_deleted(record),
        }
    }
}

/// Observer of committed record changes.
///
/// Callbacks run synchronously on the thread that made the change, after
/// the write is durable and the store's writer lock has been released.
pub trait ChangeListener: Send + Sync {
    fn on_created(&self, record: &Record);

    fn on_updated(&self, old: &Record, new: &Record);

    fn on_deleted(&self, _record: &Record) {}
}

/// Forwards every change into a channel; a closed receiver is ignored.
impl ChangeListener for Sender<ChangeEvent> {
    fn on_created(&self, record: &Record) {
        forward(self, ChangeEvent::Created { record: record.clone() });
    }

    fn on_updated(&self, old: &Record, new: &Record) {
        forward(self, ChangeEvent::Updated { old: old.clone(), new: new.clone() });
    }

    fn on_deleted(&self, record: &Record) {
        forward(self, ChangeEvent::Deleted { record: record.clone() });
    }
}

fn forward(sender: &Sender<ChangeEvent>, event: ChangeEvent) {
    if sender.send(event).is_err() {
        log::debug!("change listener channel closed, dropping event");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    fn record(app: &str) -> Record {
        Record::new(app.to_string(), "user".to_string(), "pw".to_string())
    }

    #[test]
    fn test_event_snapshots() {
        let a = record("A");
        let b = record("B");

        let created = ChangeEvent::Created { record: a.clone() };
        assert_eq!(created.old(), None);
        assert_eq!(created.new_record(), Some(&a));

        let updated = ChangeEvent::Updated { old: a.clone(), new: b.clone() };
        assert_eq!(updated.old(), Some(&a));
        assert_eq!(updated.new_record(), Some(&b));

        let deleted = ChangeEvent::Deleted { record: b.clone() };
        assert_eq!(deleted.old(), Some(&b));
        assert_eq!(deleted.new_record(), None);
    }

    #[test]
    fn test_channel_listener_forwards_dispatched_events() {
        let (tx, rx) = mpsc::channel();
        let event = ChangeEvent::Updated { old: record("A"), new: record("B") };

        event.dispatch(&tx);

        assert_eq!(rx.try_recv().unwrap(), event);
    }

    #[test]
    fn test_channel_listener_survives_closed_receiver() {
        let (tx, rx) = mpsc::channel();
        drop(rx);

        tx.on_created(&record("A"));
    }

    #[test]
    fn test_event_json_is_tagged() {
        let event = ChangeEvent::Created { record: record("A") };
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["kind"], "created");
        assert_eq!(json["record"]["appName"], "A");
    }
}
