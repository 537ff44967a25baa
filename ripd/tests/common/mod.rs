//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use ripd::Master;
use ripd::northbound::configuration::ListEntry;
use ripd::northbound::yang::ripd as yang;
use ripd::socket::SocketFactory;
use ripd_northbound::configuration::ConfigChange;
use ripd_northbound::data::DataValue;
use ripd_northbound::error::CommitError;
use ripd_northbound::registry::EntryRegistry;
use ripd_northbound::transaction::{self, ApplyErrorPolicy, ApplyReport};
use socket2::{Domain, Socket, Type};

// Hands out unbound UDP sockets, optionally up to a fixed number.
#[derive(Clone, Debug, Default)]
pub struct TestSockets {
    budget: Option<usize>,
    opened: Arc<AtomicUsize>,
}

// ===== impl TestSockets =====

impl TestSockets {
    pub fn with_budget(budget: usize) -> TestSockets {
        TestSockets {
            budget: Some(budget),
            ..Default::default()
        }
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }
}

impl SocketFactory for TestSockets {
    fn open(&self) -> Result<Socket, std::io::Error> {
        if let Some(budget) = self.budget
            && self.opened() >= budget
        {
            return Err(std::io::Error::new(
                std::io::ErrorKind::AddrInUse,
                "no sockets left",
            ));
        }
        self.opened.fetch_add(1, Ordering::SeqCst);
        Socket::new(Domain::IPV4, Type::DGRAM, None)
    }
}

// ===== helper functions =====

pub fn master() -> Master {
    Master::new(Box::new(TestSockets::default()))
}

// Returns a master whose instance was already created.
pub fn master_with_instance() -> (Master, EntryRegistry<ListEntry>) {
    let mut master = master();
    let mut registry = EntryRegistry::default();
    commit(&mut master, &mut registry, &[create_instance()]).unwrap();
    (master, registry)
}

pub fn commit(
    master: &mut Master,
    registry: &mut EntryRegistry<ListEntry>,
    changes: &[ConfigChange],
) -> Result<ApplyReport, CommitError> {
    transaction::commit(master, registry, changes, ApplyErrorPolicy::Continue)
}

pub fn create_instance() -> ConfigChange {
    ConfigChange::create(yang::instance::PATH).unwrap()
}

pub fn delete_instance() -> ConfigChange {
    ConfigChange::delete(yang::instance::PATH).unwrap()
}

pub fn modify(path: &str, value: impl Into<DataValue>) -> ConfigChange {
    ConfigChange::modify(path, value).unwrap()
}

pub fn leaf_list_create(path: &str, value: &str) -> ConfigChange {
    ConfigChange::create(&format!("{}[.='{}']", path, value)).unwrap()
}

pub fn leaf_list_delete(path: &str, value: &str) -> ConfigChange {
    ConfigChange::delete(&format!("{}[.='{}']", path, value)).unwrap()
}

pub fn distance_source_path(prefix: &str) -> String {
    format!("{}[prefix='{}']", yang::instance::distance::source::PATH, prefix)
}

pub fn offset_list_path(ifname: &str, direction: &str) -> String {
    format!(
        "{}[interface='{}'][direction='{}']",
        yang::instance::offset_list::PATH,
        ifname,
        direction
    )
}

pub fn redistribute_path(protocol: &str) -> String {
    format!(
        "{}[protocol='{}']",
        yang::instance::redistribute::PATH,
        protocol
    )
}
