//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::sync::LazyLock as Lazy;

use ripd_northbound::rpc::{Callbacks, CallbacksBuilder, Provider};

use crate::Master;
use crate::northbound::yang::clear_rip_route;

pub static CALLBACKS: Lazy<Callbacks<Master>> = Lazy::new(load_callbacks);

// ===== callbacks =====

fn load_callbacks() -> Callbacks<Master> {
    CallbacksBuilder::<Master>::default()
        .path(clear_rip_route::PATH)
        .rpc(|master, args| {
            // Nothing to clear while the instance doesn't exist.
            let count = master
                .instance
                .as_mut()
                .map(|instance| instance.clear_rip_routes())
                .unwrap_or(0);
            args.output.insert("routes-cleared".to_owned(), count.into());
            Ok(())
        })
        .build()
}

// ===== impl Master =====

impl Provider for Master {
    fn callbacks() -> &'static Callbacks<Master> {
        &CALLBACKS
    }
}
