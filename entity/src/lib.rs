//! Persistent entities backing the employee manager.

pub mod employees;
