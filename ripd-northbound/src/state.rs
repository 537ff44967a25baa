//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::collections::HashMap;

use itertools::Itertools;
use serde_json::{Map, Value};

use crate::data::{DataPath, DataValue, PathSegment};
use crate::error::Error;
use crate::{ProviderBase, api};

//
// State callbacks.
//

pub struct Callbacks<P: Provider>(HashMap<String, CallbacksNode<P>>);

pub struct CallbacksNode<P: Provider> {
    get_next: Option<GetNextCb<P>>,
    get_keys: Option<GetKeysCb<P>>,
    lookup_entry: Option<LookupEntryCb<P>>,
    get_element: Option<GetElementCb<P>>,
}

pub struct CallbacksBuilder<P: Provider> {
    path: Option<&'static str>,
    callbacks: Callbacks<P>,
}

//
// GetNext callback.
//

pub type GetNextCb<P: Provider> =
    for<'a, 'b> fn(&'a P, GetNextArgs<'a, 'b, P>) -> Option<P::ListEntry<'a>>;

#[derive(Debug)]
pub struct GetNextArgs<'a, 'b, P: Provider> {
    pub parent_list_entry: &'b P::ListEntry<'a>,
    // Previously returned entry, or `None` to get the first one.
    pub prev: Option<&'b P::ListEntry<'a>>,
}

//
// GetKeys callback.
//

pub type GetKeysCb<P: Provider> =
    for<'a, 'b> fn(&'a P, GetKeysArgs<'a, 'b, P>) -> ListKeys;

#[derive(Debug)]
pub struct GetKeysArgs<'a, 'b, P: Provider> {
    pub list_entry: &'b P::ListEntry<'a>,
}

//
// LookupEntry callback.
//

pub type LookupEntryCb<P: Provider> = for<'a, 'b> fn(
    &'a P,
    LookupEntryArgs<'a, 'b, P>,
) -> Option<P::ListEntry<'a>>;

#[derive(Debug)]
pub struct LookupEntryArgs<'a, 'b, P: Provider> {
    pub parent_list_entry: &'b P::ListEntry<'a>,
    pub keys: &'b ListKeys,
}

//
// GetElement callback.
//

pub type GetElementCb<P: Provider> =
    for<'a, 'b> fn(&'a P, GetElementArgs<'a, 'b, P>) -> Option<DataValue>;

#[derive(Debug)]
pub struct GetElementArgs<'a, 'b, P: Provider> {
    pub list_entry: &'b P::ListEntry<'a>,
}

// Key values of an operational list entry, in schema order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ListKeys(Vec<(String, String)>);

//
// Provider northbound.
//

pub trait Provider: ProviderBase {
    type ListEntry<'a>: std::fmt::Debug + Default;

    fn callbacks() -> &'static Callbacks<Self>;
}

// ===== impl Callbacks =====

impl<P> Callbacks<P>
where
    P: Provider,
{
    fn get_next(&self, path: &str) -> Option<&GetNextCb<P>> {
        self.0.get(path)?.get_next.as_ref()
    }

    fn get_keys(&self, path: &str) -> Option<&GetKeysCb<P>> {
        self.0.get(path)?.get_keys.as_ref()
    }

    fn lookup_entry(&self, path: &str) -> Option<&LookupEntryCb<P>> {
        self.0.get(path)?.lookup_entry.as_ref()
    }

    fn get_element(&self, path: &str) -> Option<&GetElementCb<P>> {
        self.0.get(path)?.get_element.as_ref()
    }

    pub fn paths(&self) -> Vec<String> {
        self.0.keys().cloned().collect()
    }

    // Lists directly owned by the given list (or by the root).
    fn lists_owned_by<'s>(
        &'s self,
        owner: &'s str,
    ) -> impl Iterator<Item = &'s str> + 's {
        self.0
            .iter()
            .filter(|(_, node)| node.get_next.is_some())
            .map(|(path, _)| path.as_str())
            .filter(move |path| self.owner(path) == owner)
            .sorted()
    }

    // Leaves directly owned by the given list (or by the root).
    fn leaves_owned_by<'s>(
        &'s self,
        owner: &'s str,
    ) -> impl Iterator<Item = &'s str> + 's {
        self.0
            .iter()
            .filter(|(_, node)| node.get_element.is_some())
            .map(|(path, _)| path.as_str())
            .filter(move |path| self.owner(path) == owner)
            .sorted()
    }

    // Returns the nearest list ancestor of the given node, or an empty string
    // if the node isn't part of any list.
    fn owner(&self, path: &str) -> &str {
        self.0
            .iter()
            .filter(|(_, node)| node.get_next.is_some())
            .map(|(list, _)| list.as_str())
            .filter(|list| *list != path && is_descendant(path, list))
            .max_by_key(|list| list.len())
            .unwrap_or_default()
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

// ===== impl CallbacksNode =====

impl<P> Default for CallbacksNode<P>
where
    P: Provider,
{
    fn default() -> Self {
        CallbacksNode {
            get_next: None,
            get_keys: None,
            lookup_entry: None,
            get_element: None,
        }
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

    fn node(&mut self) -> &mut CallbacksNode<P> {
        let path = self.path.unwrap_or_default().to_owned();
        self.callbacks.0.entry(path).or_default()
    }

    #[must_use]
    pub fn get_next(mut self, cb: GetNextCb<P>) -> Self {
        self.node().get_next = Some(cb);
        self
    }

    #[must_use]
    pub fn get_keys(mut self, cb: GetKeysCb<P>) -> Self {
        self.node().get_keys = Some(cb);
        self
    }

    #[must_use]
    pub fn lookup_entry(mut self, cb: LookupEntryCb<P>) -> Self {
        self.node().lookup_entry = Some(cb);
        self
    }

    #[must_use]
    pub fn get_element(mut self, cb: GetElementCb<P>) -> Self {
        self.node().get_element = Some(cb);
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

// ===== impl ListKeys =====

impl ListKeys {
    pub fn new() -> Self {
        Default::default()
    }

    #[must_use]
    pub fn with(mut self, name: &str, value: impl ToString) -> Self {
        self.0.push((name.to_owned(), value.to_string()));
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

impl std::fmt::Display for ListKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (key, value) in &self.0 {
            write!(f, "[{}='{}']", key, value)?;
        }
        Ok(())
    }
}

impl From<&PathSegment> for ListKeys {
    fn from(segment: &PathSegment) -> ListKeys {
        ListKeys(segment.keys.clone())
    }
}

// ===== helper functions =====

// Segment-wise prefix check on schema paths.
fn is_descendant(path: &str, ancestor: &str) -> bool {
    ancestor.is_empty()
        || path == ancestor
        || path
            .strip_prefix(ancestor)
            .is_some_and(|rest| rest.starts_with('/'))
}

fn relative_segments<'p>(path: &'p str, owner: &str) -> Vec<&'p str> {
    path[owner.len()..]
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect()
}

fn insert_value(obj: &mut Map<String, Value>, segments: &[&str], value: Value) {
    let Some((last, parents)) = segments.split_last() else {
        return;
    };

    let mut obj = obj;
    for segment in parents {
        let child = obj
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !child.is_object() {
            *child = Value::Object(Map::new());
        }
        let Value::Object(child) = child else {
            return;
        };
        obj = child;
    }
    obj.insert(last.to_string(), value);
}

fn data_value_to_json(value: DataValue) -> Value {
    match value {
        DataValue::Bool(value) => Value::Bool(value),
        DataValue::Uint(value) => Value::from(value),
        DataValue::String(value) => Value::String(value),
    }
}

struct GetContext {
    // Schema path of the requested subtree.
    filter_schema: String,
    filter: Option<DataPath>,
}

impl GetContext {
    fn includes(&self, path: &str) -> bool {
        is_descendant(path, &self.filter_schema)
            || is_descendant(&self.filter_schema, path)
    }

    fn includes_leaf(&self, path: &str) -> bool {
        is_descendant(path, &self.filter_schema)
    }

    // Returns the keys the request selects for the given list, if any.
    fn selected_keys(&self, list: &str) -> Option<ListKeys> {
        let filter = self.filter.as_ref()?;
        let depth = list.split('/').filter(|s| !s.is_empty()).count();
        let segment = filter.segments().get(depth.checked_sub(1)?)?;
        let prefix = filter
            .segments()
            .iter()
            .take(depth)
            .fold(String::new(), |path, segment| {
                format!("{}/{}", path, segment.name)
            });
        (prefix == list && !segment.keys.is_empty())
            .then(|| ListKeys::from(segment))
    }
}

fn iterate_entry<'a, P>(
    provider: &'a P,
    ctx: &GetContext,
    owner: &str,
    list_entry: &P::ListEntry<'a>,
    obj: &mut Map<String, Value>,
) where
    P: Provider,
{
    let cbs = P::callbacks();

    // Leaves.
    for path in cbs.leaves_owned_by(owner) {
        if !ctx.includes_leaf(path) {
            continue;
        }
        if let Some(cb) = cbs.get_element(path)
            && let Some(value) = (*cb)(provider, GetElementArgs { list_entry })
        {
            let segments = relative_segments(path, owner);
            insert_value(obj, &segments, data_value_to_json(value));
        }
    }

    // Nested lists.
    for path in cbs.lists_owned_by(owner) {
        if !ctx.includes(path) {
            continue;
        }
        let entries = iterate_list(provider, ctx, path, list_entry);
        if !entries.is_empty() {
            let segments = relative_segments(path, owner);
            insert_value(obj, &segments, Value::Array(entries));
        }
    }
}

fn iterate_list<'a, P>(
    provider: &'a P,
    ctx: &GetContext,
    path: &str,
    parent_list_entry: &P::ListEntry<'a>,
) -> Vec<Value>
where
    P: Provider,
{
    let cbs = P::callbacks();
    let mut entries = vec![];

    let mut add_entry = |list_entry: &P::ListEntry<'a>| {
        let mut obj = Map::new();
        if let Some(cb) = cbs.get_keys(path) {
            let keys = (*cb)(provider, GetKeysArgs { list_entry });
            for (key, value) in keys.iter() {
                obj.insert(key.to_owned(), Value::String(value.to_owned()));
            }
        }
        iterate_entry(provider, ctx, path, list_entry, &mut obj);
        entries.push(Value::Object(obj));
    };

    // Single entry selected by the request.
    if let Some(keys) = ctx.selected_keys(path) {
        if let Some(cb) = cbs.lookup_entry(path)
            && let Some(list_entry) = (*cb)(
                provider,
                LookupEntryArgs {
                    parent_list_entry,
                    keys: &keys,
                },
            )
        {
            add_entry(&list_entry);
        }
        return entries;
    }

    let Some(cb) = cbs.get_next(path) else {
        return entries;
    };
    let mut prev = None;
    while let Some(list_entry) = (*cb)(
        provider,
        GetNextArgs {
            parent_list_entry,
            prev: prev.as_ref(),
        },
    ) {
        add_entry(&list_entry);
        prev = Some(list_entry);
    }

    entries
}

// ===== global functions =====

// Builds the operational tree of the given subtree (or of the whole
// provider when no path is given).
pub(crate) fn process_get<P>(
    provider: &P,
    path: Option<String>,
) -> Result<api::daemon::GetResponse, Error>
where
    P: Provider,
{
    let filter = path
        .as_deref()
        .map(str::parse::<DataPath>)
        .transpose()?;
    let filter_schema = match &filter {
        Some(filter) => filter.schema_path(),
        None => provider.top_level_node(),
    };
    let ctx = GetContext {
        filter_schema,
        filter,
    };

    // Reject paths that don't match any operational node.
    let cbs = P::callbacks();
    if !cbs.0.keys().any(|path| ctx.includes(path)) {
        return Err(Error::InvalidPath(ctx.filter_schema));
    }

    let mut obj = Map::new();
    let list_entry: P::ListEntry<'_> = Default::default();
    iterate_entry(provider, &ctx, "", &list_entry, &mut obj);

    Ok(api::daemon::GetResponse {
        data: Value::Object(obj),
    })
}

// Returns the next entry of an operational list.
pub fn get_next<'a, P>(
    provider: &'a P,
    path: &str,
    parent_list_entry: &P::ListEntry<'a>,
    prev: Option<&P::ListEntry<'a>>,
) -> Option<P::ListEntry<'a>>
where
    P: Provider,
{
    let cb = P::callbacks().get_next(path)?;
    (*cb)(
        provider,
        GetNextArgs {
            parent_list_entry,
            prev,
        },
    )
}

// Returns the keys of an operational list entry.
pub fn get_keys<'a, P>(
    provider: &'a P,
    path: &str,
    list_entry: &P::ListEntry<'a>,
) -> Option<ListKeys>
where
    P: Provider,
{
    let cb = P::callbacks().get_keys(path)?;
    Some((*cb)(provider, GetKeysArgs { list_entry }))
}

// Looks up an operational list entry by its keys.
pub fn lookup_entry<'a, P>(
    provider: &'a P,
    path: &str,
    parent_list_entry: &P::ListEntry<'a>,
    keys: &ListKeys,
) -> Option<P::ListEntry<'a>>
where
    P: Provider,
{
    let cb = P::callbacks().lookup_entry(path)?;
    (*cb)(
        provider,
        LookupEntryArgs {
            parent_list_entry,
            keys,
        },
    )
}

// Returns the value of an operational leaf.
pub fn get_element<'a, P>(
    provider: &'a P,
    path: &str,
    list_entry: &P::ListEntry<'a>,
) -> Option<DataValue>
where
    P: Provider,
{
    let cb = P::callbacks().get_element(path)?;
    (*cb)(provider, GetElementArgs { list_entry })
}
