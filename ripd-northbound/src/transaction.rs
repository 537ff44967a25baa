//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use serde::{Deserialize, Serialize};

use crate::configuration::{self, ConfigChange, Provider};
use crate::debug::Debug;
use crate::error::CommitError;
use crate::registry::EntryRegistry;

// What to do with the remaining changes once an apply handler fails.
//
// Changes applied before the failure are never rolled back.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApplyErrorPolicy {
    // Report the failure and keep applying the remaining changes.
    #[default]
    Continue,
    // Report the failure and release the resources of the remaining changes.
    Stop,
}

// Outcome of the apply phase of a transaction.
#[derive(Debug, Default)]
pub struct ApplyReport {
    // Number of successfully applied changes.
    pub applied: usize,
    // Number of changes that weren't applied because processing stopped.
    pub skipped: usize,
    // Apply and apply_finish errors, in the order they occurred.
    pub errors: Vec<CommitError>,
}

// ===== impl ApplyReport =====

impl ApplyReport {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty() && self.skipped == 0
    }

    pub fn first_error(&self) -> Option<&CommitError> {
        self.errors.first()
    }
}

// ===== global functions =====

// Runs a full configuration transaction.
//
// Validation and preparation errors abort the transaction before any change
// is applied, in which case every change up to and including the failed one
// has its abort handler invoked. Once the apply phase starts, failures are
// reported per change in the returned `ApplyReport`.
pub fn commit<P>(
    provider: &mut P,
    registry: &mut EntryRegistry<P::ListEntry>,
    changes: &[ConfigChange],
    policy: ApplyErrorPolicy,
) -> Result<ApplyReport, CommitError>
where
    P: Provider,
{
    // Phase 0: validate all changes.
    configuration::process_validate::<P>(changes)?;

    // Phase 1: prepare all changes.
    let mut resources = Vec::new();
    resources.resize_with(changes.len(), Default::default);
    if let Err((idx, error)) =
        configuration::process_prepare(&*provider, changes, &mut resources)
    {
        error.log();
        configuration::process_abort(
            &*provider,
            &changes[..=idx],
            &mut resources[..=idx],
        );
        return Err(error);
    }

    // Phase 2: apply all changes.
    let mut report = ApplyReport::default();
    let applied = configuration::process_apply(
        provider,
        registry,
        changes,
        &mut resources,
        policy,
        &mut report,
    );
    configuration::process_apply_finish(
        provider,
        registry,
        changes,
        &applied,
        &mut report,
    );

    // Release resources not consumed by their apply handlers.
    for (change, resource) in changes.iter().zip(resources.iter_mut()) {
        if resource.take().is_some() {
            Debug::ResourceRelease(&change.dnode.path).log();
        }
    }

    Ok(report)
}
