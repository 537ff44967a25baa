//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::collections::BTreeMap;
use std::net::Ipv4Addr;

use chrono::{DateTime, Utc};

use crate::debug::Debug;

// Router from which RIP updates were received.
#[derive(Debug)]
pub struct Neighbor {
    pub addr: Ipv4Addr,
    pub last_update: DateTime<Utc>,
    pub bad_packets_rcvd: u32,
    pub bad_routes_rcvd: u32,
}

// ===== impl Neighbor =====

impl Neighbor {
    fn new(addr: Ipv4Addr) -> Neighbor {
        Debug::NbrCreate(&addr).log();

        Neighbor {
            addr,
            last_update: Utc::now(),
            bad_packets_rcvd: 0,
            bad_routes_rcvd: 0,
        }
    }
}

// ===== global functions =====

// Returns the neighbor with the given address, creating it if necessary, and
// refreshes its last update time.
pub(crate) fn update(
    neighbors: &mut BTreeMap<Ipv4Addr, Neighbor>,
    addr: Ipv4Addr,
) -> &mut Neighbor {
    let nbr = neighbors
        .entry(addr)
        .or_insert_with(|| Neighbor::new(addr));
    nbr.last_update = Utc::now();
    nbr
}
