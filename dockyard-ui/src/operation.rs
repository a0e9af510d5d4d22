//! Shared operation log
//!
//! Long-running or batched actions publish one record per target here. The
//! publisher keeps a handle to the record and settles it through
//! [`OperationService::operate_changes`]; the watcher sees every change.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

const MAX_OPERATIONS: usize = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationState {
    Progressing,
    Success,
    Failure,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct OperationTarget {
    pub id: i64,
    pub name: String,
}

/// One entry of the operation log
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OperateInfo {
    /// Message key of the action, e.g. `OPERATION.DELETE_REQUEST`
    pub name: String,
    pub data: OperationTarget,
    pub state: OperationState,
    pub started_at: DateTime<Utc>,
    pub time_diff: Option<String>,
    /// Localized failure detail
    pub message: Option<String>,
}

impl OperateInfo {
    pub fn progressing(name: impl Into<String>, id: i64, target_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: OperationTarget {
                id,
                name: target_name.into(),
            },
            state: OperationState::Progressing,
            started_at: Utc::now(),
            time_diff: None,
            message: None,
        }
    }
}

pub type OperationHandle = Rc<RefCell<OperateInfo>>;

type Watcher = Rc<dyn Fn(&[OperateInfo])>;

fn format_elapsed(seconds: i64) -> String {
    match seconds {
        s if s < 60 => "less than 1 minute".to_string(),
        s if s < 3600 => format!("{} minute(s)", s / 60),
        s => format!("{} hour(s)", s / 3600),
    }
}

#[derive(Default)]
pub struct OperationService {
    records: RefCell<Vec<OperationHandle>>,
    watcher: RefCell<Option<Watcher>>,
}

impl OperationService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `info` to the log and returns the handle used to update it.
    pub fn publish_info(&self, info: OperateInfo) -> OperationHandle {
        let handle = Rc::new(RefCell::new(info));
        let mut records = self.records.borrow_mut();
        records.push(handle.clone());
        if records.len() > MAX_OPERATIONS {
            let overflow = records.len() - MAX_OPERATIONS;
            records.drain(..overflow);
        }
        drop(records);
        self.notify();
        handle
    }

    /// Moves a published record to `state`, recording elapsed time and detail.
    pub fn operate_changes(&self, record: &OperationHandle, state: OperationState, detail: Option<String>) {
        {
            let mut info = record.borrow_mut();
            info.state = state;
            info.message = detail;
            if state != OperationState::Progressing {
                let elapsed = Utc::now().signed_duration_since(info.started_at);
                info.time_diff = Some(format_elapsed(elapsed.num_seconds()));
            }
            debug!(operation = %info.name, target_id = info.data.id, ?state, "operation changed");
        }
        self.notify();
    }

    /// Snapshot of the log, oldest first.
    pub fn operations(&self) -> Vec<OperateInfo> {
        self.records
            .borrow()
            .iter()
            .map(|record| record.borrow().clone())
            .collect()
    }

    pub fn watch(&self, watcher: impl Fn(&[OperateInfo]) + 'static) {
        *self.watcher.borrow_mut() = Some(Rc::new(watcher));
    }

    pub fn clear(&self) {
        self.records.borrow_mut().clear();
        self.notify();
    }

    fn notify(&self) {
        let watcher = self.watcher.borrow().clone();
        if let Some(watcher) = watcher {
            watcher(&self.operations());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_and_update_in_place() {
        let service = OperationService::new();
        let handle = service.publish_info(OperateInfo::progressing("OPERATION.DELETE_REQUEST", 4, "team-a"));

        assert_eq!(service.operations()[0].state, OperationState::Progressing);

        service.operate_changes(&handle, OperationState::Failure, Some("Forbidden".to_string()));

        let log = service.operations();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].state, OperationState::Failure);
        assert_eq!(log[0].message.as_deref(), Some("Forbidden"));
        assert_eq!(log[0].time_diff.as_deref(), Some("less than 1 minute"));
    }

    #[test]
    fn test_watcher_sees_updates_and_clear() {
        let service = OperationService::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        {
            let seen = seen.clone();
            service.watch(move |log| {
                seen.borrow_mut().push(log.iter().map(|op| op.state).collect::<Vec<_>>())
            });
        }

        let handle = service.publish_info(OperateInfo::progressing("OPERATION.DELETE_REQUEST", 1, "r"));
        service.operate_changes(&handle, OperationState::Success, None);
        service.clear();

        assert_eq!(
            *seen.borrow(),
            vec![
                vec![OperationState::Progressing],
                vec![OperationState::Success],
                vec![],
            ]
        );
    }

    #[test]
    fn test_log_is_bounded() {
        let service = OperationService::new();
        for id in 0..(MAX_OPERATIONS as i64 + 3) {
            service.publish_info(OperateInfo::progressing("OPERATION.DELETE_REQUEST", id, "r"));
        }

        let log = service.operations();
        assert_eq!(log.len(), MAX_OPERATIONS);
        assert_eq!(log[0].data.id, 3);
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(5), "less than 1 minute");
        assert_eq!(format_elapsed(125), "2 minute(s)");
        assert_eq!(format_elapsed(7200), "2 hour(s)");
    }
}
