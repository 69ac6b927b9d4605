//! Attendance and overtime business rules, kept free of HTTP and storage
//! concerns so each rule is testable on its own.

pub mod aggregate;
pub mod overtime;
pub mod reconcile;
