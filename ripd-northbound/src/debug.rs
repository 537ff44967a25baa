//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use tracing::{trace, trace_span};

use crate::configuration::CommitPhase;
use crate::data::DataPath;
use crate::{CallbackOp, api};

#[derive(Debug)]
pub enum Debug<'a> {
    RequestRx(&'a api::daemon::Request),
    ValidationCallback(&'a DataPath),
    ConfigurationCallback(CommitPhase, CallbackOp, &'a DataPath),
    ApplyFinishCallback(&'a DataPath),
    NoCallback(CallbackOp, &'a DataPath),
    NotImplemented(&'a DataPath),
    EntryBind(&'a DataPath),
    EntryUnbind(&'a DataPath, usize),
    ResourceRelease(&'a DataPath),
    RpcCallback(&'a str),
}

// ===== impl Debug =====

impl Debug<'_> {
    pub fn log(&self) {
        match self {
            Debug::RequestRx(message) => {
                trace_span!("northbound").in_scope(|| {
                    trace!(?message, "{}", self);
                });
            }
            Debug::ValidationCallback(path)
            | Debug::ApplyFinishCallback(path)
            | Debug::NotImplemented(path)
            | Debug::EntryBind(path)
            | Debug::ResourceRelease(path) => {
                trace_span!("northbound").in_scope(|| {
                    trace!(%path, "{}", self);
                });
            }
            Debug::ConfigurationCallback(phase, operation, path) => {
                trace_span!("northbound").in_scope(|| {
                    trace!(
                        ?phase, ?operation, %path,
                        "{}", self
                    )
                });
            }
            Debug::NoCallback(operation, path) => {
                trace_span!("northbound").in_scope(|| {
                    trace!(?operation, %path, "{}", self);
                });
            }
            Debug::EntryUnbind(path, count) => {
                trace_span!("northbound").in_scope(|| {
                    trace!(%path, %count, "{}", self);
                });
            }
            Debug::RpcCallback(path) => {
                trace_span!("northbound")
                    .in_scope(|| trace!(%path, "{}", self));
            }
        }
    }
}

impl std::fmt::Display for Debug<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Debug::RequestRx(..) => {
                write!(f, "received request")
            }
            Debug::ValidationCallback(..) => {
                write!(f, "validation callback")
            }
            Debug::ConfigurationCallback(..) => {
                write!(f, "configuration callback")
            }
            Debug::ApplyFinishCallback(..) => {
                write!(f, "apply finish callback")
            }
            Debug::NoCallback(..) => {
                write!(f, "no callback registered")
            }
            Debug::NotImplemented(..) => {
                write!(f, "callback not implemented")
            }
            Debug::EntryBind(..) => {
                write!(f, "list entry bound")
            }
            Debug::EntryUnbind(..) => {
                write!(f, "list entry unbound")
            }
            Debug::ResourceRelease(..) => {
                write!(f, "released unconsumed resource")
            }
            Debug::RpcCallback(..) => {
                write!(f, "rpc callback")
            }
        }
    }
}
