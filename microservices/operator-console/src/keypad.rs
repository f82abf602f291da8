//! Shared on-screen keypad routing
//!
//! One keypad writes into N+1 text fields: the agent number and N customer
//! slots. Focus decides where a key goes; with nothing focused, digits go to
//! the first empty customer slot and backspace eats from the last non-empty
//! one. The agent field is only ever reached through explicit focus.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Addressable keypad target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DialTarget {
    Agent,
    Customer { index: usize },
}

impl DialTarget {
    pub fn customer(index: usize) -> Self {
        Self::Customer { index }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum KeypadError {
    #[error("Invalid keypad key: {0:?}")]
    InvalidKey(char),

    #[error("Customer slot {index} out of range (slots: {slots})")]
    SlotOutOfRange { index: usize, slots: usize },

    #[error("Expected {expected} customer numbers, got {actual}")]
    SlotCountMismatch { expected: usize, actual: usize },
}

/// Keys the keypad can emit
pub fn is_keypad_key(key: char) -> bool {
    key.is_ascii_digit() || matches!(key, '*' | '#' | '+')
}

/// Slot a digit goes to when nothing is focused: the first empty customer
/// slot, else slot 0.
pub fn default_digit_target(customers: &[String]) -> usize {
    customers.iter().position(|c| c.is_empty()).unwrap_or(0)
}

/// Slot a backspace goes to when nothing is focused: the highest-index
/// non-empty customer slot, if any.
pub fn default_backspace_target(customers: &[String]) -> Option<usize> {
    customers.iter().rposition(|c| !c.is_empty())
}

/// Field values plus the focused target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DialPad {
    agent: String,
    customers: Vec<String>,
    focused: Option<DialTarget>,
}

impl DialPad {
    /// `slots` customer fields, all empty, nothing focused
    pub fn new(slots: usize) -> Self {
        Self {
            agent: String::new(),
            customers: vec![String::new(); slots],
            focused: None,
        }
    }

    pub fn agent(&self) -> &str {
        &self.agent
    }

    pub fn customers(&self) -> &[String] {
        &self.customers
    }

    pub fn focused(&self) -> Option<DialTarget> {
        self.focused
    }

    pub fn slots(&self) -> usize {
        self.customers.len()
    }

    /// Every customer field is empty after trimming
    pub fn all_customers_blank(&self) -> bool {
        self.customers.iter().all(|c| c.trim().is_empty())
    }

    pub fn set_focus(&mut self, target: Option<DialTarget>) -> Result<(), KeypadError> {
        if let Some(DialTarget::Customer { index }) = target {
            self.check_slot(index)?;
        }
        self.focused = target;
        Ok(())
    }

    /// Append `key` to the focused field, picking a default customer slot
    /// when nothing is focused. Returns the field that received the key.
    pub fn press_digit(&mut self, key: char) -> Result<DialTarget, KeypadError> {
        if !is_keypad_key(key) {
            return Err(KeypadError::InvalidKey(key));
        }
        let target = match self.focused {
            Some(target) => target,
            None => {
                if self.customers.is_empty() {
                    return Err(KeypadError::SlotOutOfRange { index: 0, slots: 0 });
                }
                let target = DialTarget::customer(default_digit_target(&self.customers));
                self.focused = Some(target);
                target
            }
        };
        match target {
            DialTarget::Agent => self.agent.push(key),
            DialTarget::Customer { index } => {
                let mut next = self.customers.clone();
                let slots = next.len();
                next.get_mut(index)
                    .ok_or(KeypadError::SlotOutOfRange { index, slots })?
                    .push(key);
                self.customers = next;
            }
        }
        Ok(target)
    }

    /// Remove one character. Focused field first; otherwise the last
    /// non-empty customer slot, which then becomes focused. Returns the field
    /// that lost a character, `None` on a no-op.
    pub fn press_backspace(&mut self) -> Option<DialTarget> {
        match self.focused {
            Some(DialTarget::Agent) => self.agent.pop().map(|_| DialTarget::Agent),
            Some(DialTarget::Customer { index }) => self.pop_customer(index),
            None => {
                let index = default_backspace_target(&self.customers)?;
                let target = self.pop_customer(index);
                self.focused = target;
                target
            }
        }
    }

    /// Direct edit of the agent field
    pub fn set_agent(&mut self, value: impl Into<String>) {
        self.agent = value.into();
    }

    /// Direct edit of one customer field
    pub fn set_customer(&mut self, index: usize, value: impl Into<String>) -> Result<(), KeypadError> {
        self.check_slot(index)?;
        let mut next = self.customers.clone();
        next[index] = value.into();
        self.customers = next;
        Ok(())
    }

    /// Replace the whole customer sequence; length must stay N
    pub fn replace_customers(&mut self, customers: Vec<String>) -> Result<(), KeypadError> {
        if customers.len() != self.customers.len() {
            return Err(KeypadError::SlotCountMismatch {
                expected: self.customers.len(),
                actual: customers.len(),
            });
        }
        self.customers = customers;
        Ok(())
    }

    fn pop_customer(&mut self, index: usize) -> Option<DialTarget> {
        let mut next = self.customers.clone();
        next.get_mut(index)?.pop()?;
        self.customers = next;
        Some(DialTarget::customer(index))
    }

    fn check_slot(&self, index: usize) -> Result<(), KeypadError> {
        if index < self.customers.len() {
            Ok(())
        } else {
            Err(KeypadError::SlotOutOfRange {
                index,
                slots: self.customers.len(),
            })
        }
    }
}

/// Shared handle to the dial pad. Each call holds the lock for the whole
/// read-modify-write, so keypad presses and direct edits never interleave.
#[derive(Debug, Clone)]
pub struct DialPadHandle {
    inner: Arc<Mutex<DialPad>>,
}

impl DialPadHandle {
    pub fn new(slots: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(DialPad::new(slots))),
        }
    }

    pub fn snapshot(&self) -> DialPad {
        self.inner.lock().clone()
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut DialPad) -> R) -> R {
        let mut pad = self.inner.lock();
        f(&mut pad)
    }

    pub fn set_focus(&self, target: Option<DialTarget>) -> Result<(), KeypadError> {
        self.update(|pad| pad.set_focus(target))
    }

    pub fn press_digit(&self, key: char) -> Result<DialTarget, KeypadError> {
        self.update(|pad| pad.press_digit(key))
    }

    pub fn press_backspace(&self) -> Option<DialTarget> {
        self.update(DialPad::press_backspace)
    }

    pub fn set_agent(&self, value: impl Into<String>) {
        self.update(|pad| pad.set_agent(value));
    }

    pub fn set_customer(&self, index: usize, value: impl Into<String>) -> Result<(), KeypadError> {
        self.update(|pad| pad.set_customer(index, value))
    }
}
