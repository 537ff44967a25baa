//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::collections::BTreeMap;

use crate::data::DataPath;
use crate::debug::Debug;
use crate::error::Error;

// Associates configuration list entries with the runtime objects backing
// them.
//
// Bindings are created by create handlers and removed by the delete handler
// that frees the runtime object. Removing a binding also removes the
// bindings of all descendant nodes.
#[derive(Debug)]
pub struct EntryRegistry<E> {
    entries: BTreeMap<DataPath, E>,
}

// ===== impl EntryRegistry =====

impl<E> EntryRegistry<E>
where
    E: Clone + std::fmt::Debug,
{
    pub fn bind(&mut self, path: &DataPath, entry: E) -> Result<(), Error> {
        if self.entries.contains_key(path) {
            return Err(Error::OrderingViolation(format!(
                "{}: list entry already bound",
                path
            )));
        }

        Debug::EntryBind(path).log();
        self.entries.insert(path.clone(), entry);
        Ok(())
    }

    // Returns the object bound to the nearest ancestor of the given node
    // (the node itself included).
    pub fn resolve(&self, path: &DataPath) -> Result<E, Error> {
        path.ancestors()
            .find_map(|path| self.entries.get(&path).cloned())
            .ok_or_else(|| {
                Error::OrderingViolation(format!(
                    "{}: no bound list entry",
                    path
                ))
            })
    }

    pub fn get(&self, path: &DataPath) -> Option<&E> {
        self.entries.get(path)
    }

    pub fn unbind(&mut self, path: &DataPath) -> Result<E, Error> {
        let entry = self.entries.remove(path).ok_or_else(|| {
            Error::OrderingViolation(format!("{}: list entry not bound", path))
        })?;

        // Remove descendant bindings.
        let descendants = self
            .entries
            .range(path.clone()..)
            .map(|(child, _)| child)
            .take_while(|child| child.starts_with(path))
            .cloned()
            .collect::<Vec<_>>();
        for child in &descendants {
            self.entries.remove(child);
        }

        Debug::EntryUnbind(path, descendants.len()).log();
        Ok(entry)
    }

    pub fn contains(&self, path: &DataPath) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DataPath, &E)> {
        self.entries.iter()
    }
}

impl<E> Default for EntryRegistry<E> {
    fn default() -> EntryRegistry<E> {
        EntryRegistry {
            entries: Default::default(),
        }
    }
}
