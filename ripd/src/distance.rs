//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::Ipv4Addr;

use generational_arena::{Arena, Index};
use ipnetwork::Ipv4Network;
use prefix_trie::map::PrefixMap;

use crate::debug::Debug;
use crate::error::Error;

pub type DistanceSourceIndex = Index;

// Administrative distance applied to routes learned from a range of
// source addresses.
#[derive(Debug)]
pub struct DistanceSource {
    pub prefix: Ipv4Network,
    pub distance: u8,
    pub access_list: Option<String>,
}

#[derive(Debug, Default)]
pub struct Distances {
    arena: Arena<DistanceSource>,
    prefix_tree: PrefixMap<Ipv4Network, DistanceSourceIndex>,
}

// ===== impl DistanceSource =====

impl DistanceSource {
    fn new(prefix: Ipv4Network) -> DistanceSource {
        Debug::DistanceSourceCreate(&prefix).log();

        DistanceSource {
            prefix,
            distance: 0,
            access_list: None,
        }
    }
}

impl Drop for DistanceSource {
    fn drop(&mut self) {
        Debug::DistanceSourceDelete(&self.prefix).log();
    }
}

// ===== impl Distances =====

impl Distances {
    pub(crate) fn insert(
        &mut self,
        prefix: Ipv4Network,
    ) -> Result<(DistanceSourceIndex, &mut DistanceSource), Error> {
        if self.prefix_tree.get(&prefix).is_some() {
            return Err(Error::DistanceSourceExists(prefix));
        }

        let source = DistanceSource::new(prefix);
        let index = self.arena.insert(source);
        self.prefix_tree.insert(prefix, index);
        Ok((index, &mut self.arena[index]))
    }

    pub(crate) fn delete(
        &mut self,
        index: DistanceSourceIndex,
    ) -> Result<(), Error> {
        let source =
            self.arena.remove(index).ok_or(Error::DistanceSourceNotFound)?;
        self.prefix_tree.remove(&source.prefix);
        Ok(())
    }

    pub fn get(&self, index: DistanceSourceIndex) -> Option<&DistanceSource> {
        self.arena.get(index)
    }

    pub(crate) fn get_mut(
        &mut self,
        index: DistanceSourceIndex,
    ) -> Result<&mut DistanceSource, Error> {
        self.arena
            .get_mut(index)
            .ok_or(Error::DistanceSourceNotFound)
    }

    pub fn get_by_prefix(
        &self,
        prefix: &Ipv4Network,
    ) -> Option<&DistanceSource> {
        self.prefix_tree
            .get(prefix)
            .and_then(|index| self.arena.get(*index))
    }

    // Returns the most specific distance source covering the given address.
    pub fn lookup(&self, addr: Ipv4Addr) -> Option<&DistanceSource> {
        let host = Ipv4Network::from(addr);
        self.prefix_tree
            .get_lpm(&host)
            .and_then(|(_, index)| self.arena.get(*index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &DistanceSource> + '_ {
        self.arena.iter().map(|(_, source)| source)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }
}
