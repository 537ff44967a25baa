//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

pub mod configuration;
pub mod rpc;
pub mod state;
pub mod yang;

use ripd_northbound::ProviderBase;
use tracing::{Span, debug_span};

use crate::Master;

// ===== impl Master =====

impl ProviderBase for Master {
    fn top_level_node(&self) -> String {
        "/frr-ripd:ripd".to_owned()
    }

    fn debug_span(&self) -> Span {
        debug_span!("ripd")
    }
}
