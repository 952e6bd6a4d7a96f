use std::fmt;

/// A vertex-layout violation.
///
/// Layouts come straight from deployment configuration, so these are caller
/// mistakes. They are raised during pipeline setup, never at draw time.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutError {
    pub message: String,
}

impl LayoutError {
    pub(crate) fn new(msg: impl Into<String>) -> Self {
        Self { message: msg.into() }
    }
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid vertex layout: {}", self.message)
    }
}

impl std::error::Error for LayoutError {}

/// A particle-record shape violation.
///
/// Raised when seed data and particle count cannot be reconciled into a
/// fixed-stride record layout.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordError {
    pub message: String,
}

impl RecordError {
    pub(crate) fn new(msg: impl Into<String>) -> Self {
        Self { message: msg.into() }
    }
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid particle record: {}", self.message)
    }
}

impl std::error::Error for RecordError {}
