//! Call categories.

use std::fmt;

/// Classification of an operation; decides eligible hosts and the base timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallType {
    Read,
    Write,
}

impl CallType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallType::Read => "read",
            CallType::Write => "write",
        }
    }
}

impl fmt::Display for CallType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
