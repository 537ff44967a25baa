//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Unbounded};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock as Lazy};

use ripd_northbound::configuration::{
    self, Callbacks, CallbacksBuilder, ConfigChange,
};
use ripd_northbound::data::DataValue;
use ripd_northbound::error::Error;
use ripd_northbound::registry::EntryRegistry;
use ripd_northbound::state::{
    self, GetElementArgs, GetKeysArgs, GetNextArgs, ListKeys, LookupEntryArgs,
};
use ripd_northbound::transaction::{self, ApplyErrorPolicy, ApplyReport};
use ripd_northbound::{ProviderBase, error::CommitError, rpc};

pub const ITEM: &str = "/toy:root/item";
pub const ITEM_VALUE: &str = "/toy:root/item/value";
pub const ITEM_NAME: &str = "/toy:root/item/name";
pub const PLACEHOLDER: &str = "/toy:root/placeholder";
pub const RESET: &str = "/toy:reset";

// Minimal provider used to exercise the engine.
#[derive(Debug, Default)]
pub struct Toy {
    pub items: BTreeMap<String, Item>,
    // Number of tokens that can still be handed out.
    pub budget: Option<usize>,
    // Number of live tokens.
    pub live: Arc<AtomicUsize>,
    pub aborts: AtomicUsize,
    pub finished: Vec<String>,
}

#[derive(Debug)]
pub struct Item {
    pub name: String,
    pub value: u64,
    pub token: Token,
}

#[derive(Debug)]
pub struct Token(Arc<AtomicUsize>);

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ConfigEntry {
    Item(String),
}

#[derive(Debug, Default)]
pub enum StateEntry<'a> {
    #[default]
    None,
    Item(&'a Item),
}

// ===== impl Toy =====

impl Toy {
    pub fn with_budget(budget: usize) -> Toy {
        Toy {
            budget: Some(budget),
            ..Default::default()
        }
    }

    pub fn live_tokens(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    fn token(&self) -> Result<Token, String> {
        if let Some(budget) = self.budget
            && self.live_tokens() >= budget
        {
            return Err("token budget exhausted".to_owned());
        }
        self.live.fetch_add(1, Ordering::SeqCst);
        Ok(Token(self.live.clone()))
    }
}

impl ProviderBase for Toy {
    fn top_level_node(&self) -> String {
        "/toy:root".to_owned()
    }
}

impl configuration::Provider for Toy {
    type ListEntry = ConfigEntry;
    type Resource = Token;

    fn callbacks() -> &'static Callbacks<Toy> {
        &CALLBACKS
    }
}

impl state::Provider for Toy {
    type ListEntry<'a> = StateEntry<'a>;

    fn callbacks() -> &'static state::Callbacks<Toy> {
        &STATE_CALLBACKS
    }
}

impl rpc::Provider for Toy {
    fn callbacks() -> &'static rpc::Callbacks<Toy> {
        &RPC_CALLBACKS
    }
}

// ===== impl Token =====

impl Drop for Token {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

// ===== callbacks =====

static CALLBACKS: Lazy<Callbacks<Toy>> = Lazy::new(|| {
    CallbacksBuilder::<Toy>::default()
        .path(ITEM)
        .create_prepare(|toy, mut args| {
            args.resource.acquire(|| toy.token())
        })
        .create_abort(|toy, mut args| {
            toy.aborts.fetch_add(1, Ordering::SeqCst);
            args.resource.release();
        })
        .create_apply(|toy, mut args| {
            let name = args.dnode.key_string("name")?;
            let token = args.resource.consume()?;
            toy.items.insert(
                name.clone(),
                Item {
                    name: name.clone(),
                    value: 0,
                    token,
                },
            );
            args.bind(ConfigEntry::Item(name))
        })
        .delete_apply(|toy, mut args| {
            let ConfigEntry::Item(name) = args.unbind()?;
            toy.items.remove(&name);
            Ok(())
        })
        .apply_finish(|toy, args| {
            let ConfigEntry::Item(name) = args.list_entry()?;
            toy.finished.push(name);
            Ok(())
        })
        .path(ITEM_VALUE)
        .modify_validate(|args| {
            let value = args.dnode.get_u64()?;
            if value > 100 {
                return Err(Error::SchemaInvalid("value above 100".to_owned()));
            }
            Ok(())
        })
        .modify_apply(|toy, args| {
            let ConfigEntry::Item(name) = args.list_entry()?;
            let value = args.dnode.get_u64()?;
            if value == 13 {
                return Err(Error::DomainConflict("unlucky value".to_owned()));
            }
            if let Some(item) = toy.items.get_mut(&name) {
                item.value = value;
            }
            Ok(())
        })
        .path(PLACEHOLDER)
        .modify_apply(|_toy, _args| Err(Error::NotImplemented))
        .build()
});

static STATE_CALLBACKS: Lazy<state::Callbacks<Toy>> = Lazy::new(|| {
    state::CallbacksBuilder::<Toy>::default()
        .path(ITEM)
        .get_next(item_next)
        .get_keys(item_keys)
        .lookup_entry(item_lookup)
        .path(ITEM_NAME)
        .get_element(|_toy, args| match args.list_entry {
            StateEntry::Item(item) => Some(item.name.clone().into()),
            StateEntry::None => None,
        })
        .path(ITEM_VALUE)
        .get_element(|_toy, args| match args.list_entry {
            StateEntry::Item(item) => Some(DataValue::Uint(item.value)),
            StateEntry::None => None,
        })
        .build()
});

static RPC_CALLBACKS: Lazy<rpc::Callbacks<Toy>> = Lazy::new(|| {
    rpc::CallbacksBuilder::<Toy>::default()
        .path(RESET)
        .rpc(|toy, args| {
            let keep = args.input.get("keep").and_then(|keep| keep.as_str());
            let before = toy.items.len();
            toy.items.retain(|name, _| Some(name.as_str()) == keep);
            let removed = before - toy.items.len();
            args.output.insert("removed".to_owned(), removed.into());
            Ok(())
        })
        .build()
});

fn item_next<'a>(
    toy: &'a Toy,
    args: GetNextArgs<'a, '_, Toy>,
) -> Option<StateEntry<'a>> {
    let next = match args.prev {
        None => toy.items.values().next(),
        Some(StateEntry::Item(prev)) => toy
            .items
            .range::<String, _>((Excluded(&prev.name), Unbounded))
            .map(|(_, item)| item)
            .next(),
        Some(StateEntry::None) => None,
    };
    next.map(StateEntry::Item)
}

fn item_keys(_toy: &Toy, args: GetKeysArgs<'_, '_, Toy>) -> ListKeys {
    match args.list_entry {
        StateEntry::Item(item) => ListKeys::new().with("name", &item.name),
        StateEntry::None => ListKeys::new(),
    }
}

fn item_lookup<'a>(
    toy: &'a Toy,
    args: LookupEntryArgs<'a, '_, Toy>,
) -> Option<StateEntry<'a>> {
    let name = args.keys.get("name")?;
    toy.items.get(name).map(StateEntry::Item)
}

// ===== helper functions =====

pub fn item_path(name: &str) -> String {
    format!("{}[name='{}']", ITEM, name)
}

pub fn create_item(name: &str) -> ConfigChange {
    ConfigChange::create(&item_path(name)).unwrap()
}

pub fn delete_item(name: &str) -> ConfigChange {
    ConfigChange::delete(&item_path(name)).unwrap()
}

pub fn set_value(name: &str, value: u64) -> ConfigChange {
    ConfigChange::modify(&format!("{}/value", item_path(name)), value)
        .unwrap()
}

pub fn commit(
    toy: &mut Toy,
    registry: &mut EntryRegistry<ConfigEntry>,
    changes: &[ConfigChange],
) -> Result<ApplyReport, CommitError> {
    transaction::commit(toy, registry, changes, ApplyErrorPolicy::Continue)
}
