use std::collections::{vec_deque, VecDeque};
use std::fmt;

use crate::constants::DEFAULT_TRACE_CAPACITY;
use crate::error::Fault;

/// # Trace
/// A human readable record of a single executed instruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Trace {
    pub opcode: u16,
    pub mnemonic: &'static str,
    pub effect: String,
    pub fault: Option<Fault>,
}

impl Trace {
    pub fn new(opcode: u16, mnemonic: &'static str, effect: impl Into<String>) -> Self {
        Trace {
            opcode,
            mnemonic,
            effect: effect.into(),
            fault: None,
        }
    }

    /// Marks the traced instruction as having raised `fault`.
    pub fn with_fault(self, fault: Fault) -> Self {
        Trace {
            effect: fault.to_string(),
            fault: Some(fault),
            ..self
        }
    }
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06X} {:<13} | {}", self.opcode, self.mnemonic, self.effect)
    }
}

/// # Trace log
/// An append only ring of the most recent `Trace`s in execution order.
///
/// Once `capacity` entries are held, pushing another drops the oldest.
pub struct TraceLog {
    entries: VecDeque<Trace>,
    capacity: usize,
}

impl TraceLog {
    pub fn new(capacity: usize) -> Self {
        TraceLog {
            entries: VecDeque::with_capacity(capacity.min(DEFAULT_TRACE_CAPACITY)),
            capacity,
        }
    }

    pub fn push(&mut self, trace: Trace) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(trace);
    }

    /// Entries from oldest to newest
    pub fn iter(&self) -> vec_deque::Iter<'_, Trace> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&Trace> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
