//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use crate::error::Error;

// Transaction-scoped resource handle of a single configuration change.
//
// The slot is filled during the preparation phase and emptied either by the
// apply handler (consume) or by the abort handler (release).
#[derive(Debug)]
pub struct ResourceSlot<'a, R>(&'a mut Option<R>);

// ===== impl ResourceSlot =====

impl<'a, R> ResourceSlot<'a, R> {
    pub(crate) fn new(slot: &'a mut Option<R>) -> Self {
        ResourceSlot(slot)
    }

    // Acquires a new resource, releasing the previously held one, if any.
    pub fn acquire<F, E>(&mut self, f: F) -> Result<(), Error>
    where
        F: FnOnce() -> Result<R, E>,
        E: std::fmt::Display,
    {
        self.release();
        let resource = f()
            .map_err(|error| Error::ResourceUnavailable(error.to_string()))?;
        *self.0 = Some(resource);
        Ok(())
    }

    // Takes ownership of the held resource.
    pub fn consume(&mut self) -> Result<R, Error> {
        self.0.take().ok_or_else(|| {
            Error::OrderingViolation("resource not acquired".to_owned())
        })
    }

    // Releases the held resource. Releasing an empty slot is a no-op.
    pub fn release(&mut self) {
        self.0.take();
    }

    pub fn is_held(&self) -> bool {
        self.0.is_some()
    }

    pub fn get(&self) -> Option<&R> {
        self.0.as_ref()
    }
}
