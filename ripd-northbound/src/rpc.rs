//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::debug::Debug;
use crate::error::Error;
use crate::{CallbackKey, CallbackOp, ProviderBase, api};

//
// RPC callbacks.
//

pub struct Callbacks<P: Provider>(HashMap<CallbackKey, Callback<P>>);

pub struct CallbacksBuilder<P: Provider> {
    path: Option<&'static str>,
    callbacks: Callbacks<P>,
}

#[derive(Debug)]
pub struct CallbackArgs<'a> {
    pub rpc_path: &'a str,
    pub input: &'a Value,
    pub output: &'a mut Map<String, Value>,
}

//
// Useful type definition(s).
//

pub type Callback<P> =
    for<'a> fn(&'a mut P, CallbackArgs<'a>) -> Result<(), Error>;

// RPC protocol trait.
pub trait Provider: ProviderBase {
    fn callbacks() -> &'static Callbacks<Self>;
}

// ===== impl Callbacks =====

impl<P> Callbacks<P>
where
    P: Provider,
{
    pub fn load(&mut self, path: &'static str, cb: Callback<P>) {
        let path = path.to_string();
        let key = CallbackKey::new(path, CallbackOp::Rpc);
        self.0.insert(key, cb);
    }

    fn get(&self, key: &CallbackKey) -> Option<&Callback<P>> {
        self.0.get(key)
    }

    pub fn keys(&self) -> Vec<CallbackKey> {
        self.0.keys().cloned().collect()
    }
}

impl<P> std::fmt::Debug for Callbacks<P>
where
    P: Provider,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Callbacks({:?})", self.0.keys())
    }
}

impl<P> Default for Callbacks<P>
where
    P: Provider,
{
    fn default() -> Self {
        Callbacks(HashMap::new())
    }
}

// ===== impl CallbacksBuilder =====

impl<P> CallbacksBuilder<P>
where
    P: Provider,
{
    pub fn new(callbacks: Callbacks<P>) -> Self {
        CallbacksBuilder {
            path: None,
            callbacks,
        }
    }

    #[must_use]
    pub fn path(mut self, path: &'static str) -> Self {
        self.path = Some(path);
        self
    }

    #[must_use]
    pub fn rpc(mut self, cb: Callback<P>) -> Self {
        let path = self.path.unwrap_or_default();
        self.callbacks.load(path, cb);
        self
    }

    #[must_use]
    pub fn build(self) -> Callbacks<P> {
        self.callbacks
    }
}

impl<P> Default for CallbacksBuilder<P>
where
    P: Provider,
{
    fn default() -> Self {
        CallbacksBuilder {
            path: None,
            callbacks: Callbacks::default(),
        }
    }
}

// ===== global functions =====

pub(crate) fn process_rpc<P>(
    provider: &mut P,
    path: &str,
    input: Value,
) -> Result<api::daemon::RpcResponse, Error>
where
    P: Provider,
{
    let key = CallbackKey::new(path.to_owned(), CallbackOp::Rpc);
    let Some(cb) = P::callbacks().get(&key) else {
        return Err(Error::RpcNotFound(path.to_owned()));
    };

    Debug::RpcCallback(path).log();
    let mut output = Map::new();
    let args = CallbackArgs {
        rpc_path: path,
        input: &input,
        output: &mut output,
    };
    (*cb)(provider, args)?;

    Ok(api::daemon::RpcResponse {
        output: Value::Object(output),
    })
}
