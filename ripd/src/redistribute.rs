//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use ripd_northbound::yang::ToYang;

use crate::route::Metric;

// Route source whose routes can be redistributed into RIP.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Protocol {
    Babel,
    Bgp,
    Connected,
    Eigrp,
    Isis,
    Kernel,
    Nhrp,
    Openfabric,
    Ospf,
    Sharp,
    Static,
    Table,
    Vnc,
}

// Per-protocol redistribution options.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RedistributeCfg {
    pub route_map: Option<String>,
    pub metric: Option<Metric>,
}

// ===== impl Protocol =====

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_yang())
    }
}
