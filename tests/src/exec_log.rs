use crate::logging_driver::DriverOp;

use fauxrm_core::driver::{
    operation::{QuerySql, Transaction},
    Operation,
};
use std::sync::{Arc, Mutex};

/// A wrapper around the operations log that provides a clean API for tests
#[derive(Debug, Clone)]
pub struct ExecLog {
    ops: Arc<Mutex<Vec<DriverOp>>>,
}

impl ExecLog {
    pub(crate) fn new(ops: Arc<Mutex<Vec<DriverOp>>>) -> Self {
        Self { ops }
    }

    /// Get the number of logged operations
    pub fn len(&self) -> usize {
        self.ops.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.lock().unwrap().is_empty()
    }

    /// Check if any operation matches the given predicate
    pub fn any<F>(&self, predicate: F) -> bool
    where
        F: Fn(&Operation) -> bool,
    {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .any(|op| predicate(&op.operation))
    }

    /// Count operations matching the given predicate
    pub fn count<F>(&self, predicate: F) -> usize
    where
        F: Fn(&Operation) -> bool,
    {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .filter(|op| predicate(&op.operation))
            .count()
    }

    /// SQL text of every statement sent, in order
    pub fn sql(&self) -> Vec<String> {
        self.query_sql().into_iter().map(|op| op.sql).collect()
    }

    pub fn query_sql(&self) -> Vec<QuerySql> {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .filter_map(|op| op.operation.as_query_sql().cloned())
            .collect()
    }

    /// Number of logged operations that failed
    pub fn failures(&self) -> usize {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .filter(|op| op.response.is_err())
            .count()
    }

    pub fn has_rollback(&self) -> bool {
        self.any(|op| matches!(op, Operation::Transaction(Transaction::Rollback)))
    }

    pub fn has_commit(&self) -> bool {
        self.any(|op| matches!(op, Operation::Transaction(Transaction::Commit)))
    }

    /// Clear the log
    pub fn clear(&self) {
        self.ops.lock().unwrap().clear();
    }

    /// Remove and return the first operation from the log
    pub fn pop(&self) -> Option<Operation> {
        let mut ops = self.ops.lock().unwrap();
        if ops.is_empty() {
            None
        } else {
            Some(ops.remove(0).operation)
        }
    }
}
