//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::Ipv4Addr;

use ipnetwork::Ipv4Network;
use tracing::{debug, debug_span};

use crate::offset_list::Direction;
use crate::redistribute::Protocol;
use crate::route::Metric;

// RIP debug messages.
#[derive(Debug)]
pub enum Debug<'a> {
    InstanceCreate,
    InstanceDelete,
    DistanceSourceCreate(&'a Ipv4Network),
    DistanceSourceDelete(&'a Ipv4Network),
    OffsetListCreate(&'a str, Direction),
    OffsetListDelete(&'a str, Direction),
    UpdateTimerRearm(u32),
    RedistributeUpdate(Protocol),
    RedistributeWithdraw(Protocol),
    NbrCreate(&'a Ipv4Addr),
    RouteCreate(&'a Ipv4Network, &'a Option<Ipv4Addr>, &'a Metric),
    RouteUpdate(&'a Ipv4Network, &'a Option<Ipv4Addr>, &'a Metric),
    RoutesClear(usize),
}

// ===== impl Debug =====

impl Debug<'_> {
    // Log debug message using the tracing API.
    pub(crate) fn log(&self) {
        match self {
            Debug::InstanceCreate | Debug::InstanceDelete => {
                // Parent span(s): ripd
                debug!("{}", self);
            }
            Debug::DistanceSourceCreate(prefix)
            | Debug::DistanceSourceDelete(prefix) => {
                // Parent span(s): ripd
                debug!(%prefix, "{}", self);
            }
            Debug::OffsetListCreate(ifname, direction)
            | Debug::OffsetListDelete(ifname, direction) => {
                // Parent span(s): ripd
                debug!(%ifname, %direction, "{}", self);
            }
            Debug::UpdateTimerRearm(interval) => {
                // Parent span(s): ripd
                debug!(%interval, "{}", self);
            }
            Debug::RedistributeUpdate(protocol)
            | Debug::RedistributeWithdraw(protocol) => {
                // Parent span(s): ripd
                debug!(%protocol, "{}", self);
            }
            Debug::NbrCreate(addr) => {
                // Parent span(s): ripd
                debug_span!("neighbor").in_scope(|| {
                    debug!(address = %addr, "{}", self);
                })
            }
            Debug::RouteCreate(prefix, nexthop, metric)
            | Debug::RouteUpdate(prefix, nexthop, metric) => {
                // Parent span(s): ripd
                debug_span!("route").in_scope(|| {
                    if let Some(nexthop) = nexthop {
                        debug!(%prefix, %nexthop, metric = %metric.get(), "{}", self);
                    } else {
                        debug!(%prefix, metric = %metric.get(), "{}", self);
                    }
                })
            }
            Debug::RoutesClear(count) => {
                // Parent span(s): ripd
                debug!(%count, "{}", self);
            }
        }
    }
}

impl std::fmt::Display for Debug<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Debug::InstanceCreate => {
                write!(f, "instance created")
            }
            Debug::InstanceDelete => {
                write!(f, "instance deleted")
            }
            Debug::DistanceSourceCreate(..) => {
                write!(f, "distance source created")
            }
            Debug::DistanceSourceDelete(..) => {
                write!(f, "distance source deleted")
            }
            Debug::OffsetListCreate(..) => {
                write!(f, "offset-list created")
            }
            Debug::OffsetListDelete(..) => {
                write!(f, "offset-list deleted")
            }
            Debug::UpdateTimerRearm(..) => {
                write!(f, "update timer re-armed")
            }
            Debug::RedistributeUpdate(..) => {
                write!(f, "redistribution activated")
            }
            Debug::RedistributeWithdraw(..) => {
                write!(f, "redistribution withdrawn")
            }
            Debug::NbrCreate(..) => {
                write!(f, "neighbor created")
            }
            Debug::RouteCreate(..) => {
                write!(f, "route created")
            }
            Debug::RouteUpdate(..) => {
                write!(f, "route updated")
            }
            Debug::RoutesClear(..) => {
                write!(f, "RIP routes cleared")
            }
        }
    }
}
