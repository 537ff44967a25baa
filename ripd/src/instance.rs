//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::collections::{BTreeMap, BTreeSet};
use std::net::Ipv4Addr;

use ipnetwork::Ipv4Network;
use socket2::Socket;

use crate::debug::Debug;
use crate::distance::Distances;
use crate::error::Error;
use crate::neighbor::{self, Neighbor};
use crate::northbound::configuration::InstanceCfg;
use crate::offset_list::{Direction, OffsetLists};
use crate::redistribute::{Protocol, RedistributeCfg};
use crate::route::{Metric, Route, RouteKey, RouteType};

#[derive(Debug)]
pub struct Instance {
    // UDP socket opened when the instance was created.
    pub socket: Socket,
    // Instance configuration data.
    pub config: InstanceCfg,
    // Distance table.
    pub distances: Distances,
    // Per-interface metric offsets.
    pub offset_lists: OffsetLists,
    // Instance state data.
    pub state: InstanceState,
}

#[derive(Debug, Default)]
pub struct InstanceState {
    // Routing table.
    pub routes: BTreeMap<RouteKey, Route>,
    // RIP neighbors.
    pub neighbors: BTreeMap<Ipv4Addr, Neighbor>,
    // Periodic update timer.
    pub update_timer: UpdateTimer,
    // Protocols whose redistribution is active.
    pub redistributed: BTreeSet<Protocol>,
}

#[derive(Debug, Default)]
pub struct UpdateTimer {
    // Interval the timer is currently armed with.
    pub interval: Option<u32>,
    pub rearm_count: u64,
}

// ===== impl Instance =====

impl Instance {
    pub(crate) fn new(socket: Socket, config: InstanceCfg) -> Instance {
        Debug::InstanceCreate.log();

        let mut instance = Instance {
            socket,
            config,
            distances: Default::default(),
            offset_lists: Default::default(),
            state: Default::default(),
        };
        instance.update_timer_rearm();
        instance
    }

    pub(crate) fn network_add(
        &mut self,
        prefix: Ipv4Network,
    ) -> Result<(), Error> {
        if !self.config.networks.insert(prefix) {
            return Err(Error::NetworkExists(prefix));
        }
        Ok(())
    }

    pub(crate) fn network_delete(
        &mut self,
        prefix: Ipv4Network,
    ) -> Result<(), Error> {
        if !self.config.networks.remove(&prefix) {
            return Err(Error::NetworkNotFound(prefix));
        }
        Ok(())
    }

    pub(crate) fn interface_add(&mut self, ifname: &str) -> Result<(), Error> {
        if !self.config.interfaces.insert(ifname.to_owned()) {
            return Err(Error::InterfaceExists(ifname.to_owned()));
        }
        Ok(())
    }

    pub(crate) fn interface_delete(
        &mut self,
        ifname: &str,
    ) -> Result<(), Error> {
        if !self.config.interfaces.remove(ifname) {
            return Err(Error::InterfaceNotFound(ifname.to_owned()));
        }
        Ok(())
    }

    pub(crate) fn neighbor_add(&mut self, addr: Ipv4Addr) -> Result<(), Error> {
        if !self.config.explicit_neighbors.insert(addr) {
            return Err(Error::NeighborExists(addr));
        }
        Ok(())
    }

    pub(crate) fn neighbor_delete(
        &mut self,
        addr: Ipv4Addr,
    ) -> Result<(), Error> {
        if !self.config.explicit_neighbors.remove(&addr) {
            return Err(Error::NeighborNotFound(addr));
        }
        Ok(())
    }

    // Changing the default invalidates every per-interface exception.
    pub(crate) fn passive_default_set(&mut self, passive: bool) {
        self.config.passive_default = passive;
        self.config.passive_nondefault.clear();
    }

    // Both operations tolerate a set that was cleared by a change of the
    // passive default in the same transaction.
    pub(crate) fn passive_nondefault_set(&mut self, ifname: &str) {
        self.config.passive_nondefault.insert(ifname.to_owned());
    }

    pub(crate) fn passive_nondefault_unset(&mut self, ifname: &str) {
        self.config.passive_nondefault.remove(ifname);
    }

    pub fn is_passive(&self, ifname: &str) -> bool {
        self.config.passive_default
            != self.config.passive_nondefault.contains(ifname)
    }

    pub(crate) fn static_route_add(
        &mut self,
        prefix: Ipv4Network,
    ) -> Result<(), Error> {
        if !self.config.static_routes.insert(prefix) {
            return Err(Error::StaticRouteExists(prefix));
        }

        let key = RouteKey::new(prefix, None, None);
        let route = Route::new(&key, Metric::default(), 0, RouteType::Static);
        self.state.routes.insert(key, route);
        Ok(())
    }

    pub(crate) fn static_route_delete(
        &mut self,
        prefix: Ipv4Network,
    ) -> Result<(), Error> {
        if !self.config.static_routes.remove(&prefix) {
            return Err(Error::StaticRouteNotFound(prefix));
        }

        let key = RouteKey::new(prefix, None, None);
        self.state.routes.remove(&key);

        // A static default route shadows the originated one.
        if prefix.prefix() == 0 && self.config.default_information_originate {
            self.default_route_install();
        }
        Ok(())
    }

    pub(crate) fn default_information_originate(&mut self, enable: bool) {
        self.config.default_information_originate = enable;

        if enable {
            self.default_route_install();
        } else if let Some(key) = default_route_key()
            && self
                .state
                .routes
                .get(&key)
                .is_some_and(|route| route.route_type == RouteType::Default)
        {
            self.state.routes.remove(&key);
        }
    }

    // Installs the originated default route unless a static default route is
    // already present.
    fn default_route_install(&mut self) {
        let Some(key) = default_route_key() else {
            return;
        };
        let metric = Metric::new(self.config.default_metric).unwrap_or_default();
        self.state
            .routes
            .entry(key)
            .or_insert_with_key(|key| {
                Route::new(key, metric, 0, RouteType::Default)
            });
    }

    pub(crate) fn redistribute_conf_get(
        &mut self,
        protocol: Protocol,
    ) -> Result<&mut RedistributeCfg, Error> {
        self.config
            .redistribute
            .get_mut(&protocol)
            .ok_or(Error::RedistributeNotFound(protocol))
    }

    // (Re)activates redistribution using the current protocol options.
    pub(crate) fn redistribute_conf_update(&mut self, protocol: Protocol) {
        if !self.config.redistribute.contains_key(&protocol) {
            return;
        }

        Debug::RedistributeUpdate(protocol).log();
        self.state.redistributed.insert(protocol);
    }

    // Withdraws the protocol configuration and every route it brought in.
    pub(crate) fn redistribute_conf_delete(&mut self, protocol: Protocol) {
        Debug::RedistributeWithdraw(protocol).log();

        self.config.redistribute.remove(&protocol);
        self.state.redistributed.remove(&protocol);
        self.state.routes.retain(|_, route| {
            route.route_type != RouteType::Redistribute(protocol)
        });
    }

    // Re-arms the periodic update timer when its interval changed.
    pub(crate) fn update_timer_rearm(&mut self) {
        let interval = self.config.update_interval;
        let timer = &mut self.state.update_timer;
        if timer.interval == Some(interval) {
            return;
        }

        Debug::UpdateTimerRearm(interval).log();
        timer.interval = Some(interval);
        timer.rearm_count += 1;
    }

    // Keeps a single RIP route per prefix.
    pub(crate) fn ecmp_disable(&mut self) {
        let mut prefixes = BTreeSet::new();
        self.state.routes.retain(|key, route| {
            route.route_type != RouteType::Rip || prefixes.insert(key.prefix)
        });
    }

    // Returns the administrative distance of routes learned from the given
    // source, or zero for the protocol default.
    //
    // Access-lists are evaluated by the policy engine, so a matching source
    // with an access-list is treated as permitted.
    pub fn distance_apply(&self, source: Ipv4Addr) -> u8 {
        if let Some(dsource) = self.distances.lookup(source)
            && dsource.distance != 0
        {
            return dsource.distance;
        }

        self.config.distance
    }

    // Processes a route entry received from a neighbor.
    pub fn process_rte(
        &mut self,
        source: Ipv4Addr,
        ifname: &str,
        prefix: Ipv4Network,
        nexthop: Option<Ipv4Addr>,
        metric: u8,
    ) -> Result<(), Error> {
        let nbr = neighbor::update(&mut self.state.neighbors, source);
        let mut metric = match Metric::new(metric) {
            Ok(metric) if metric.get() != 0 => metric,
            _ => {
                nbr.bad_routes_rcvd += 1;
                return Err(Error::InvalidMetric(metric));
            }
        };

        // Interface cost plus the inbound offset.
        metric.add(1);
        if let Some(dir) = self
            .offset_lists
            .get_by_ifname(ifname)
            .and_then(|olist| olist.get(Direction::In))
        {
            metric.add(dir.metric);
        }

        let nexthop = nexthop.unwrap_or(source);
        let key = RouteKey::new(prefix, Some(nexthop), Some(ifname.to_owned()));
        if metric.is_infinite() {
            self.state.routes.remove(&key);
            return Ok(());
        }

        if !self.config.allow_ecmp {
            self.state.routes.retain(|other, route| {
                route.route_type != RouteType::Rip
                    || other.prefix != prefix
                    || *other == key
            });
        }

        let distance = self.distance_apply(source);
        match self.state.routes.get_mut(&key) {
            Some(route) => route.update(metric, distance),
            None => {
                let route = Route::new(&key, metric, distance, RouteType::Rip);
                self.state.routes.insert(key, route);
            }
        }

        Ok(())
    }

    // Records a malformed packet received from a neighbor.
    pub fn process_bad_packet(&mut self, source: Ipv4Addr) {
        let nbr = neighbor::update(&mut self.state.neighbors, source);
        nbr.bad_packets_rcvd += 1;
    }

    // Removes every RIP-learned route, returning how many were removed.
    pub fn clear_rip_routes(&mut self) -> usize {
        let before = self.state.routes.len();
        self.state
            .routes
            .retain(|_, route| route.route_type != RouteType::Rip);
        let count = before - self.state.routes.len();

        Debug::RoutesClear(count).log();
        count
    }
}

impl Drop for Instance {
    fn drop(&mut self) {
        Debug::InstanceDelete.log();
    }
}

// ===== helper functions =====

fn default_route_key() -> Option<RouteKey> {
    let prefix = Ipv4Network::new(Ipv4Addr::UNSPECIFIED, 0).ok()?;
    Some(RouteKey::new(prefix, None, None))
}
