//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::Ipv4Addr;

use chrono::{DateTime, Utc};
use derive_new::new;
use ipnetwork::Ipv4Network;

use crate::debug::Debug;
use crate::error::MetricError;
use crate::redistribute::Protocol;

#[derive(Debug)]
pub struct Route {
    pub prefix: Ipv4Network,
    pub nexthop: Option<Ipv4Addr>,
    pub ifname: Option<String>,
    pub metric: Metric,
    // Administrative distance, zero meaning the protocol default.
    pub distance: u8,
    pub route_type: RouteType,
    pub last_update: DateTime<Utc>,
}

// Routing table key. A prefix can have several routes when ECMP is enabled.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd, new)]
pub struct RouteKey {
    pub prefix: Ipv4Network,
    pub nexthop: Option<Ipv4Addr>,
    pub ifname: Option<String>,
}

#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct Metric(u8);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RouteType {
    Rip,
    Static,
    Default,
    Redistribute(Protocol),
}

// ===== impl Route =====

impl Route {
    pub(crate) fn new(
        key: &RouteKey,
        metric: Metric,
        distance: u8,
        route_type: RouteType,
    ) -> Self {
        Debug::RouteCreate(&key.prefix, &key.nexthop, &metric).log();

        Route {
            prefix: key.prefix,
            nexthop: key.nexthop,
            ifname: key.ifname.clone(),
            metric,
            distance,
            route_type,
            last_update: Utc::now(),
        }
    }

    pub(crate) fn update(&mut self, metric: Metric, distance: u8) {
        Debug::RouteUpdate(&self.prefix, &self.nexthop, &metric).log();

        self.metric = metric;
        self.distance = distance;
        self.last_update = Utc::now();
    }

    pub fn key(&self) -> RouteKey {
        RouteKey::new(self.prefix, self.nexthop, self.ifname.clone())
    }
}

// ===== impl Metric =====

impl Metric {
    pub const INFINITE: u8 = 16;

    pub fn new(metric: impl TryInto<u8>) -> Result<Self, MetricError> {
        let metric =
            metric.try_into().map_err(|_| MetricError::InvalidValue)?;
        if metric > Self::INFINITE {
            return Err(MetricError::InvalidValue);
        }

        Ok(Metric(metric))
    }

    pub fn get(&self) -> u8 {
        self.0
    }

    // Adds an offset to the metric, saturating at infinity.
    pub fn add(&mut self, offset: u8) {
        self.0 = std::cmp::min(self.0.saturating_add(offset), Self::INFINITE);
    }

    pub fn is_infinite(&self) -> bool {
        self.0 == Self::INFINITE
    }
}

impl Default for Metric {
    fn default() -> Metric {
        Metric(1)
    }
}
