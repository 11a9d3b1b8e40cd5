use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::database::{DatabaseError, Row, Storage};

/// Scripted in-memory storage for repository and router tests.
///
/// Responses are handed out in the order they were pushed; once the script
/// runs dry every query returns no rows. Every call is recorded.
#[derive(Default)]
pub struct MockStorage {
    responses: Mutex<VecDeque<Result<Vec<Row>, DatabaseError>>>,
    calls: Mutex<Vec<(String, Vec<Value>)>>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the rows for the next query. Non-object values are skipped.
    pub fn push_rows(&self, rows: Vec<Value>) -> &Self {
        let rows = rows
            .into_iter()
            .filter_map(|row| match row {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect();
        self.lock_responses().push_back(Ok(rows));
        self
    }

    pub fn push_error(&self, err: DatabaseError) -> &Self {
        self.lock_responses().push_back(Err(err));
        self
    }

    /// Every `(sql, params)` seen so far.
    pub fn calls(&self) -> Vec<(String, Vec<Value>)> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn lock_responses(&self) -> std::sync::MutexGuard<'_, VecDeque<Result<Vec<Row>, DatabaseError>>> {
        self.responses.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Storage for MockStorage {
    async fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, DatabaseError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((sql.to_string(), params.to_vec()));
        self.lock_responses().pop_front().unwrap_or_else(|| Ok(vec![]))
    }
}
