//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use tracing::{error, warn};

use crate::CallbackOp;
use crate::configuration::CommitPhase;

// Northbound errors.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Error {
    // The proposed value violates a domain constraint.
    SchemaInvalid(String),
    // A side-effecting acquisition failed during the preparation phase.
    ResourceUnavailable(String),
    // The runtime model rejected the change.
    DomainConflict(String),
    // Placeholder handler. Never fails a transaction.
    NotImplemented,
    // A list entry binding is missing or duplicated.
    OrderingViolation(String),
    InvalidPath(String),
    RpcNotFound(String),
}

// Error raised by a configuration callback, along with the change that
// caused it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommitError {
    pub phase: CommitPhase,
    pub operation: CallbackOp,
    pub path: String,
    pub error: Error,
}

// ===== impl Error =====

impl Error {
    pub fn log(&self) {
        match self {
            Error::SchemaInvalid(error)
            | Error::ResourceUnavailable(error)
            | Error::DomainConflict(error) => {
                warn!(%error, "{}", self);
            }
            Error::NotImplemented => {
                warn!("{}", self);
            }
            Error::OrderingViolation(error) => {
                error!(%error, "{}", self);
            }
            Error::InvalidPath(path) | Error::RpcNotFound(path) => {
                warn!(%path, "{}", self);
            }
        }
    }

    // Returns whether the error must stop the processing of the remaining
    // changes of a transaction.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::OrderingViolation(..))
    }

    // Returns the error message carried by the error, if any.
    pub fn details(&self) -> &str {
        match self {
            Error::SchemaInvalid(details)
            | Error::ResourceUnavailable(details)
            | Error::DomainConflict(details)
            | Error::OrderingViolation(details)
            | Error::InvalidPath(details)
            | Error::RpcNotFound(details) => details,
            Error::NotImplemented => "",
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::SchemaInvalid(..) => {
                write!(f, "invalid configuration value")
            }
            Error::ResourceUnavailable(..) => {
                write!(f, "failed to allocate resource")
            }
            Error::DomainConflict(..) => {
                write!(f, "configuration conflict")
            }
            Error::NotImplemented => {
                write!(f, "configuration callback not implemented")
            }
            Error::OrderingViolation(..) => {
                write!(f, "unresolved list entry")
            }
            Error::InvalidPath(..) => {
                write!(f, "invalid data path")
            }
            Error::RpcNotFound(..) => {
                write!(f, "RPC/Action not found")
            }
        }
    }
}

impl std::error::Error for Error {}

// ===== impl CommitError =====

impl CommitError {
    pub fn log(&self) {
        warn!(
            phase = ?self.phase, operation = %self.operation, path = %self.path,
            error = %self.error.details(),
            "{}", self.error
        );
    }
}

impl std::fmt::Display for CommitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({} {}): {}",
            self.error,
            self.operation,
            self.path,
            self.error.details()
        )
    }
}

impl std::error::Error for CommitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

