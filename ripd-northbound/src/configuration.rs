//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::data::{DataNode, DataPath};
use crate::debug::Debug;
use crate::error::{CommitError, Error};
use crate::registry::EntryRegistry;
use crate::resource::ResourceSlot;
use crate::transaction::{ApplyErrorPolicy, ApplyReport};
use crate::{CallbackKey, CallbackOp, ProviderBase};

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[derive(Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommitPhase {
    Validate,
    Prepare,
    Abort,
    Apply,
    ApplyFinish,
}

// Single node change, as computed by the transaction coordinator.
#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct ConfigChange {
    pub operation: CallbackOp,
    #[serde(flatten)]
    pub dnode: DataNode,
}

//
// Commit callbacks.
//

pub struct Callbacks<P: Provider> {
    nodes: HashMap<CallbackKey, CallbacksNode<P>>,
    apply_finish: HashMap<String, CallbackApplyFinish<P>>,
}

pub struct CallbacksNode<P: Provider> {
    pub validate: Option<CallbackValidate>,
    pub prepare: Option<CallbackPrepare<P>>,
    pub abort: Option<CallbackAbort<P>>,
    pub apply: Option<CallbackApply<P>>,
}

pub struct CallbacksBuilder<P: Provider> {
    path: Option<&'static str>,
    callbacks: Callbacks<P>,
}

#[derive(Debug)]
pub struct ValidationArgs<'a> {
    pub dnode: &'a DataNode,
}

#[derive(Debug)]
pub struct ResourceArgs<'a, P: Provider> {
    pub dnode: &'a DataNode,
    pub resource: ResourceSlot<'a, P::Resource>,
}

#[derive(Debug)]
pub struct CallbackArgs<'a, P: Provider> {
    pub dnode: &'a DataNode,
    pub resource: ResourceSlot<'a, P::Resource>,
    registry: &'a mut EntryRegistry<P::ListEntry>,
}

#[derive(Debug)]
pub struct ApplyFinishArgs<'a, P: Provider> {
    pub path: &'a DataPath,
    registry: &'a EntryRegistry<P::ListEntry>,
}

//
// Useful type definition(s).
//

pub type ConfigChanges = Vec<ConfigChange>;

pub type CallbackValidate = fn(ValidationArgs<'_>) -> Result<(), Error>;

pub type CallbackPrepare<P: Provider> =
    for<'a> fn(&'a P, ResourceArgs<'a, P>) -> Result<(), Error>;

pub type CallbackAbort<P: Provider> = for<'a> fn(&'a P, ResourceArgs<'a, P>);

pub type CallbackApply<P: Provider> =
    for<'a> fn(&'a mut P, CallbackArgs<'a, P>) -> Result<(), Error>;

pub type CallbackApplyFinish<P: Provider> =
    for<'a> fn(&'a mut P, ApplyFinishArgs<'a, P>) -> Result<(), Error>;

//
// Provider northbound.
//

pub trait Provider: ProviderBase {
    type ListEntry: Clone + std::fmt::Debug + Send;
    type Resource: std::fmt::Debug + Send;

    fn callbacks() -> &'static Callbacks<Self>;
}

// ===== impl ConfigChange =====

impl ConfigChange {
    pub fn new(operation: CallbackOp, dnode: DataNode) -> Self {
        ConfigChange { operation, dnode }
    }

    pub fn create(path: &str) -> Result<Self, Error> {
        let dnode = DataNode::new(path, None)?;
        Ok(ConfigChange::new(CallbackOp::Create, dnode))
    }

    pub fn modify(
        path: &str,
        value: impl Into<crate::data::DataValue>,
    ) -> Result<Self, Error> {
        let dnode = DataNode::new(path, Some(value.into()))?;
        Ok(ConfigChange::new(CallbackOp::Modify, dnode))
    }

    pub fn delete(path: &str) -> Result<Self, Error> {
        let dnode = DataNode::new(path, None)?;
        Ok(ConfigChange::new(CallbackOp::Delete, dnode))
    }

    pub fn cb_key(&self) -> CallbackKey {
        CallbackKey::new(self.dnode.path.schema_path(), self.operation)
    }

    fn error(&self, phase: CommitPhase, error: Error) -> CommitError {
        CommitError {
            phase,
            operation: self.operation,
            path: self.dnode.path.to_string(),
            error,
        }
    }
}

// ===== impl Callbacks =====

impl<P> Callbacks<P>
where
    P: Provider,
{
    fn get(&self, key: &CallbackKey) -> Option<&CallbacksNode<P>> {
        self.nodes.get(key)
    }

    fn get_apply_finish(&self, path: &str) -> Option<&CallbackApplyFinish<P>> {
        self.apply_finish.get(path)
    }

    pub fn keys(&self) -> Vec<CallbackKey> {
        self.nodes.keys().cloned().collect()
    }
}

impl<P> std::fmt::Debug for Callbacks<P>
where
    P: Provider,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Callbacks({:?})", self.nodes.keys())
    }
}

impl<P> Default for Callbacks<P>
where
    P: Provider,
{
    fn default() -> Self {
        Callbacks {
            nodes: HashMap::new(),
            apply_finish: HashMap::new(),
        }
    }
}

// ===== impl CallbacksNode =====

impl<P> Default for CallbacksNode<P>
where
    P: Provider,
{
    fn default() -> Self {
        CallbacksNode {
            validate: None,
            prepare: None,
            abort: None,
            apply: None,
        }
    }
}

// ===== impl CallbackArgs =====

impl<P> CallbackArgs<'_, P>
where
    P: Provider,
{
    // Returns the runtime object bound to the nearest list entry.
    pub fn list_entry(&self) -> Result<P::ListEntry, Error> {
        self.registry.resolve(&self.dnode.path)
    }

    // Binds the changed node to a runtime object.
    pub fn bind(&mut self, entry: P::ListEntry) -> Result<(), Error> {
        self.registry.bind(&self.dnode.path, entry)
    }

    // Removes the binding of the changed node and of all its descendants.
    pub fn unbind(&mut self) -> Result<P::ListEntry, Error> {
        self.registry.unbind(&self.dnode.path)
    }
}

// ===== impl ApplyFinishArgs =====

impl<P> ApplyFinishArgs<'_, P>
where
    P: Provider,
{
    pub fn list_entry(&self) -> Result<P::ListEntry, Error> {
        self.registry.resolve(self.path)
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

    fn node(&mut self, operation: CallbackOp) -> &mut CallbacksNode<P> {
        let path = self.path.unwrap_or_default().to_owned();
        let key = CallbackKey::new(path, operation);
        self.callbacks.nodes.entry(key).or_default()
    }

    #[must_use]
    pub fn create_validate(mut self, cb: CallbackValidate) -> Self {
        self.node(CallbackOp::Create).validate = Some(cb);
        self
    }

    #[must_use]
    pub fn create_prepare(mut self, cb: CallbackPrepare<P>) -> Self {
        self.node(CallbackOp::Create).prepare = Some(cb);
        self
    }

    #[must_use]
    pub fn create_abort(mut self, cb: CallbackAbort<P>) -> Self {
        self.node(CallbackOp::Create).abort = Some(cb);
        self
    }

    #[must_use]
    pub fn create_apply(mut self, cb: CallbackApply<P>) -> Self {
        self.node(CallbackOp::Create).apply = Some(cb);
        self
    }

    #[must_use]
    pub fn delete_validate(mut self, cb: CallbackValidate) -> Self {
        self.node(CallbackOp::Delete).validate = Some(cb);
        self
    }

    #[must_use]
    pub fn delete_apply(mut self, cb: CallbackApply<P>) -> Self {
        self.node(CallbackOp::Delete).apply = Some(cb);
        self
    }

    #[must_use]
    pub fn modify_validate(mut self, cb: CallbackValidate) -> Self {
        self.node(CallbackOp::Modify).validate = Some(cb);
        self
    }

    #[must_use]
    pub fn modify_prepare(mut self, cb: CallbackPrepare<P>) -> Self {
        self.node(CallbackOp::Modify).prepare = Some(cb);
        self
    }

    #[must_use]
    pub fn modify_abort(mut self, cb: CallbackAbort<P>) -> Self {
        self.node(CallbackOp::Modify).abort = Some(cb);
        self
    }

    #[must_use]
    pub fn modify_apply(mut self, cb: CallbackApply<P>) -> Self {
        self.node(CallbackOp::Modify).apply = Some(cb);
        self
    }

    #[must_use]
    pub fn apply_finish(mut self, cb: CallbackApplyFinish<P>) -> Self {
        let path = self.path.unwrap_or_default().to_owned();
        self.callbacks.apply_finish.insert(path, cb);
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

// ===== helper functions =====

// Placeholder handler for nodes whose runtime counterpart doesn't exist yet.
pub fn not_implemented<P>(
    _provider: &mut P,
    args: CallbackArgs<'_, P>,
) -> Result<(), Error>
where
    P: Provider,
{
    Debug::NotImplemented(&args.dnode.path).log();
    Ok(())
}

// Placeholder handlers never fail a transaction.
fn filter_not_implemented(result: Result<(), Error>) -> Result<(), Error> {
    match result {
        Err(Error::NotImplemented) => Ok(()),
        result => result,
    }
}

// ===== global functions =====

pub(crate) fn process_validate<P>(
    changes: &[ConfigChange],
) -> Result<(), CommitError>
where
    P: Provider,
{
    let callbacks = P::callbacks();
    for change in changes {
        let Some(cb) = callbacks
            .get(&change.cb_key())
            .and_then(|node| node.validate.as_ref())
        else {
            continue;
        };

        Debug::ValidationCallback(&change.dnode.path).log();
        let args = ValidationArgs {
            dnode: &change.dnode,
        };
        filter_not_implemented((*cb)(args))
            .map_err(|error| change.error(CommitPhase::Validate, error))?;
    }

    Ok(())
}

// Runs the preparation phase. On failure, returns the position of the
// failed change along with the error.
pub(crate) fn process_prepare<P>(
    provider: &P,
    changes: &[ConfigChange],
    resources: &mut [Option<P::Resource>],
) -> Result<(), (usize, CommitError)>
where
    P: Provider,
{
    let callbacks = P::callbacks();
    for (idx, (change, resource)) in
        changes.iter().zip(resources.iter_mut()).enumerate()
    {
        let Some(cb) = callbacks
            .get(&change.cb_key())
            .and_then(|node| node.prepare.as_ref())
        else {
            continue;
        };

        Debug::ConfigurationCallback(
            CommitPhase::Prepare,
            change.operation,
            &change.dnode.path,
        )
        .log();
        let args = ResourceArgs {
            dnode: &change.dnode,
            resource: ResourceSlot::new(resource),
        };
        filter_not_implemented((*cb)(provider, args)).map_err(|error| {
            (idx, change.error(CommitPhase::Prepare, error))
        })?;
    }

    Ok(())
}

pub(crate) fn process_abort<P>(
    provider: &P,
    changes: &[ConfigChange],
    resources: &mut [Option<P::Resource>],
) where
    P: Provider,
{
    let callbacks = P::callbacks();
    for (change, resource) in changes.iter().zip(resources.iter_mut()) {
        if let Some(cb) = callbacks
            .get(&change.cb_key())
            .and_then(|node| node.abort.as_ref())
        {
            Debug::ConfigurationCallback(
                CommitPhase::Abort,
                change.operation,
                &change.dnode.path,
            )
            .log();
            let args = ResourceArgs {
                dnode: &change.dnode,
                resource: ResourceSlot::new(resource),
            };
            (*cb)(provider, args);
        }

        // Drop whatever the abort handler left behind.
        resource.take();
    }
}

pub(crate) fn process_apply<P>(
    provider: &mut P,
    registry: &mut EntryRegistry<P::ListEntry>,
    changes: &[ConfigChange],
    resources: &mut [Option<P::Resource>],
    policy: ApplyErrorPolicy,
    report: &mut ApplyReport,
) -> Vec<usize>
where
    P: Provider,
{
    let callbacks = P::callbacks();
    let mut applied = vec![];
    for (idx, change) in changes.iter().enumerate() {
        let Some(cb) = callbacks
            .get(&change.cb_key())
            .and_then(|node| node.apply.as_ref())
        else {
            Debug::NoCallback(change.operation, &change.dnode.path).log();
            report.applied += 1;
            applied.push(idx);
            continue;
        };

        Debug::ConfigurationCallback(
            CommitPhase::Apply,
            change.operation,
            &change.dnode.path,
        )
        .log();
        let args = CallbackArgs {
            dnode: &change.dnode,
            resource: ResourceSlot::new(&mut resources[idx]),
            registry: &mut *registry,
        };
        match filter_not_implemented((*cb)(provider, args)) {
            Ok(()) => {
                report.applied += 1;
                applied.push(idx);
            }
            Err(error) => {
                let stop =
                    error.is_fatal() || policy == ApplyErrorPolicy::Stop;
                let error = change.error(CommitPhase::Apply, error);
                error.log();
                report.errors.push(error);

                if stop {
                    // Release the resources of the changes left behind.
                    let next = idx + 1;
                    report.skipped = changes.len() - next;
                    process_abort(
                        &*provider,
                        &changes[next..],
                        &mut resources[next..],
                    );
                    break;
                }
            }
        }
    }

    applied
}

// Invokes the apply_finish callbacks of all subtrees touched by the given
// (successfully applied) changes, once per subtree.
pub(crate) fn process_apply_finish<P>(
    provider: &mut P,
    registry: &EntryRegistry<P::ListEntry>,
    changes: &[ConfigChange],
    applied: &[usize],
    report: &mut ApplyReport,
) where
    P: Provider,
{
    let callbacks = P::callbacks();
    if callbacks.apply_finish.is_empty() {
        return;
    }

    // A subtree no longer exists when it or one of its ancestors was deleted,
    // unless a later change re-created it somewhere between the deleted node
    // and the subtree itself.
    let exists = |path: &DataPath| {
        applied.iter().enumerate().all(|(pos, idx)| {
            let deleted = &changes[*idx];
            if deleted.operation != CallbackOp::Delete
                || !path.starts_with(&deleted.dnode.path)
            {
                return true;
            }
            applied[pos + 1..]
                .iter()
                .map(|idx| &changes[*idx])
                .any(|created| {
                    created.operation == CallbackOp::Create
                        && created.dnode.path.starts_with(&deleted.dnode.path)
                        && path.starts_with(&created.dnode.path)
                })
        })
    };
    // Subtrees that weren't fully applied.
    let failed = report
        .errors
        .iter()
        .filter_map(|error| error.path.parse::<DataPath>().ok())
        .collect::<Vec<_>>();

    let subtrees = applied
        .iter()
        .flat_map(|idx| changes[*idx].dnode.path.ancestors())
        .filter(|path| callbacks.get_apply_finish(&path.schema_path()).is_some())
        .filter(|path| exists(path))
        .filter(|path| !failed.iter().any(|failed| failed.starts_with(path)))
        .collect::<BTreeSet<_>>();

    for path in subtrees {
        let Some(cb) = callbacks.get_apply_finish(&path.schema_path()) else {
            continue;
        };

        Debug::ApplyFinishCallback(&path).log();
        let args = ApplyFinishArgs {
            path: &path,
            registry,
        };
        if let Err(error) = filter_not_implemented((*cb)(provider, args)) {
            let error = CommitError {
                phase: CommitPhase::ApplyFinish,
                operation: CallbackOp::Modify,
                path: path.to_string(),
                error,
            };
            error.log();
            report.errors.push(error);
        }
    }
}
