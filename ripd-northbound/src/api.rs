//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::configuration::ConfigChanges;
use crate::error::{CommitError, Error};
use crate::transaction::{ApplyErrorPolicy, ApplyReport};
use crate::{CallbackKey, Responder};

// Daemon -> Provider requests.
pub mod daemon {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    pub enum Request {
        // Request to get all loaded callbacks.
        GetCallbacks(GetCallbacksRequest),
        // Request to run a configuration transaction.
        Commit(CommitRequest),
        // Request to get state data.
        Get(GetRequest),
        // Request to invoke an RPC or Action.
        Rpc(RpcRequest),
    }

    #[derive(Debug, Deserialize, Serialize)]
    pub struct GetCallbacksRequest {
        #[serde(skip)]
        pub responder: Option<Responder<GetCallbacksResponse>>,
    }

    #[derive(Debug)]
    pub struct GetCallbacksResponse {
        pub callbacks: HashSet<CallbackKey>,
    }

    #[derive(Debug, Deserialize, Serialize)]
    pub struct CommitRequest {
        pub changes: ConfigChanges,
        #[serde(default)]
        pub policy: ApplyErrorPolicy,
        #[serde(skip)]
        pub responder: Option<Responder<Result<CommitResponse, CommitError>>>,
    }

    #[derive(Debug)]
    pub struct CommitResponse {
        pub report: ApplyReport,
    }

    #[derive(Debug, Deserialize, Serialize)]
    pub struct GetRequest {
        pub path: Option<String>,
        #[serde(skip)]
        pub responder: Option<Responder<Result<GetResponse, Error>>>,
    }

    #[derive(Debug)]
    pub struct GetResponse {
        pub data: serde_json::Value,
    }

    #[derive(Debug, Deserialize, Serialize)]
    pub struct RpcRequest {
        pub path: String,
        #[serde(default)]
        pub input: serde_json::Value,
        #[serde(skip)]
        pub responder: Option<Responder<Result<RpcResponse, Error>>>,
    }

    #[derive(Debug)]
    pub struct RpcResponse {
        pub output: serde_json::Value,
    }
}
