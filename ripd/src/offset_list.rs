//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::collections::BTreeMap;

use generational_arena::{Arena, Index};
use ripd_northbound::yang::ToYang;

use crate::debug::Debug;
use crate::error::Error;

pub type OffsetListIndex = Index;

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Direction {
    In,
    Out,
}

// Metric offsets of a single interface. The record is shared by both
// directions and lives while at least one of them is configured.
#[derive(Debug)]
pub struct OffsetList {
    pub ifname: String,
    pub directions: [Option<OffsetListDir>; 2],
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct OffsetListDir {
    pub access_list: Option<String>,
    pub metric: u8,
}

#[derive(Debug, Default)]
pub struct OffsetLists {
    arena: Arena<OffsetList>,
    ifname_tree: BTreeMap<String, OffsetListIndex>,
}

// ===== impl Direction =====

impl Direction {
    fn idx(&self) -> usize {
        match self {
            Direction::In => 0,
            Direction::Out => 1,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_yang())
    }
}

// ===== impl OffsetList =====

impl OffsetList {
    pub fn get(&self, direction: Direction) -> Option<&OffsetListDir> {
        self.directions[direction.idx()].as_ref()
    }

    pub(crate) fn get_mut(
        &mut self,
        direction: Direction,
    ) -> Result<&mut OffsetListDir, Error> {
        match &mut self.directions[direction.idx()] {
            Some(dir) => Ok(dir),
            None => {
                Err(Error::OffsetListNotFound(self.ifname.clone(), direction))
            }
        }
    }
}

// ===== impl OffsetLists =====

impl OffsetLists {
    // Adds the given direction to the interface record, creating the record
    // if necessary.
    pub(crate) fn insert(
        &mut self,
        ifname: &str,
        direction: Direction,
    ) -> Result<OffsetListIndex, Error> {
        let index = match self.ifname_tree.get(ifname) {
            Some(index) => *index,
            None => {
                let index = self.arena.insert(OffsetList {
                    ifname: ifname.to_owned(),
                    directions: [None, None],
                });
                self.ifname_tree.insert(ifname.to_owned(), index);
                index
            }
        };

        let olist = &mut self.arena[index];
        let slot = &mut olist.directions[direction.idx()];
        if slot.is_some() {
            return Err(Error::OffsetListExists(ifname.to_owned(), direction));
        }
        Debug::OffsetListCreate(ifname, direction).log();
        *slot = Some(OffsetListDir::default());

        Ok(index)
    }

    // Removes the given direction, freeing the interface record once no
    // direction is left.
    pub(crate) fn delete(
        &mut self,
        index: OffsetListIndex,
        direction: Direction,
    ) -> Result<(), Error> {
        let olist = self.arena.get_mut(index).ok_or_else(|| {
            Error::OffsetListNotFound(String::new(), direction)
        })?;
        if olist.directions[direction.idx()].take().is_none() {
            return Err(Error::OffsetListNotFound(
                olist.ifname.clone(),
                direction,
            ));
        }
        Debug::OffsetListDelete(&olist.ifname, direction).log();

        if olist.directions.iter().all(Option::is_none)
            && let Some(olist) = self.arena.remove(index)
        {
            self.ifname_tree.remove(&olist.ifname);
        }

        Ok(())
    }

    pub fn get(&self, index: OffsetListIndex) -> Option<&OffsetList> {
        self.arena.get(index)
    }

    pub(crate) fn get_mut(
        &mut self,
        index: OffsetListIndex,
    ) -> Option<&mut OffsetList> {
        self.arena.get_mut(index)
    }

    pub fn get_by_ifname(&self, ifname: &str) -> Option<&OffsetList> {
        self.ifname_tree
            .get(ifname)
            .and_then(|index| self.arena.get(*index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &OffsetList> + '_ {
        self.ifname_tree
            .values()
            .filter_map(|index| self.arena.get(*index))
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }
}
