//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

#![allow(type_alias_bounds)]

mod debug;

pub mod api;
pub mod configuration;
pub mod data;
pub mod error;
pub mod registry;
pub mod resource;
pub mod rpc;
pub mod state;
pub mod transaction;
pub mod yang;

use derive_new::new;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{Receiver, Sender};
use tracing::Span;

use crate::debug::Debug;
use crate::registry::EntryRegistry;

//
// Useful type definitions.
//
pub type NbDaemonSender = Sender<api::daemon::Request>;
pub type NbDaemonReceiver = Receiver<api::daemon::Request>;
pub type Responder<T> = tokio::sync::oneshot::Sender<T>;

// Key of a northbound callback: the schema path of the node plus the kind of
// change the callback handles.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, new)]
#[derive(Deserialize, Serialize)]
pub struct CallbackKey {
    pub path: String,
    pub operation: CallbackOp,
}

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[derive(Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CallbackOp {
    Create,
    Modify,
    Delete,
    Rpc,
}

/// Base northbound provider trait.
pub trait ProviderBase
where
    Self: 'static + Sized,
{
    fn top_level_node(&self) -> String;

    fn debug_span(&self) -> Span {
        Span::none()
    }
}

// ===== impl CallbackOp =====

impl std::fmt::Display for CallbackOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallbackOp::Create => write!(f, "create"),
            CallbackOp::Modify => write!(f, "modify"),
            CallbackOp::Delete => write!(f, "delete"),
            CallbackOp::Rpc => write!(f, "rpc"),
        }
    }
}

// ===== helper functions =====

fn process_get_callbacks<Provider>() -> api::daemon::GetCallbacksResponse
where
    Provider: configuration::Provider + state::Provider + rpc::Provider,
{
    let callbacks = [
        <Provider as configuration::Provider>::callbacks().keys(),
        <Provider as rpc::Provider>::callbacks().keys(),
    ]
    .into_iter()
    .flatten()
    .collect();

    api::daemon::GetCallbacksResponse { callbacks }
}

// ===== global functions =====

// Processes a northbound request addressed to the given provider.
pub fn process_northbound_msg<Provider>(
    provider: &mut Provider,
    registry: &mut EntryRegistry<<Provider as configuration::Provider>::ListEntry>,
    request: api::daemon::Request,
) where
    Provider: configuration::Provider + state::Provider + rpc::Provider,
{
    Debug::RequestRx(&request).log();

    match request {
        api::daemon::Request::GetCallbacks(request) => {
            let response = process_get_callbacks::<Provider>();
            if let Some(responder) = request.responder {
                let _ = responder.send(response);
            }
        }
        api::daemon::Request::Commit(request) => {
            let response = transaction::commit(
                provider,
                registry,
                &request.changes,
                request.policy,
            )
            .map(|report| api::daemon::CommitResponse { report });
            if let Some(responder) = request.responder {
                let _ = responder.send(response);
            }
        }
        api::daemon::Request::Get(request) => {
            let response = state::process_get(provider, request.path);
            if let Some(responder) = request.responder {
                let _ = responder.send(response);
            }
        }
        api::daemon::Request::Rpc(request) => {
            let response =
                rpc::process_rpc(provider, &request.path, request.input);
            if let Some(responder) = request.responder {
                let _ = responder.send(response);
            }
        }
    }
}

// Runs the provider task until the request channel is closed.
//
// Every request is fully processed before the next one is received, so
// configuration transactions, state queries and RPCs never interleave.
pub async fn run<Provider>(mut provider: Provider, mut nb_rx: NbDaemonReceiver)
where
    Provider: configuration::Provider + state::Provider + rpc::Provider,
{
    let mut registry = EntryRegistry::default();

    while let Some(request) = nb_rx.recv().await {
        let span = provider.debug_span();
        span.in_scope(|| {
            process_northbound_msg(&mut provider, &mut registry, request)
        });
    }
}
