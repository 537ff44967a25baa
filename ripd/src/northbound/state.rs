//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::Ipv4Addr;
use std::ops::Bound::{Excluded, Unbounded};
use std::sync::LazyLock as Lazy;

use enum_as_inner::EnumAsInner;
use ipnetwork::Ipv4Network;
use ripd_northbound::data::DataValue;
use ripd_northbound::state::{
    Callbacks, CallbacksBuilder, GetKeysArgs, GetNextArgs, ListKeys,
    LookupEntryArgs, Provider,
};
use ripd_northbound::yang::ToYang;

use crate::Master;
use crate::neighbor::Neighbor;
use crate::northbound::yang::ripd;
use crate::route::{Route, RouteKey};

pub static CALLBACKS: Lazy<Callbacks<Master>> = Lazy::new(load_callbacks);

#[derive(Debug, Default, EnumAsInner)]
pub enum ListEntry<'a> {
    #[default]
    None,
    Neighbor(&'a Neighbor),
    Route(&'a Route),
}

// ===== callbacks =====

fn load_callbacks() -> Callbacks<Master> {
    CallbacksBuilder::<Master>::default()
        .path(ripd::state::neighbors::neighbor::PATH)
        .get_next(neighbor_next)
        .get_keys(|_master, args| {
            let nbr = args.list_entry.as_neighbor();
            nbr.map(|nbr| ListKeys::new().with("address", nbr.addr))
                .unwrap_or_default()
        })
        .lookup_entry(neighbor_lookup)
        .path(ripd::state::neighbors::neighbor::address::PATH)
        .get_element(|_master, args| {
            let nbr = args.list_entry.as_neighbor()?;
            Some(nbr.addr.to_string().into())
        })
        .path(ripd::state::neighbors::neighbor::last_update::PATH)
        .get_element(|_master, args| {
            let nbr = args.list_entry.as_neighbor()?;
            Some(nbr.last_update.to_rfc3339().into())
        })
        .path(ripd::state::neighbors::neighbor::bad_packets_rcvd::PATH)
        .get_element(|_master, args| {
            let nbr = args.list_entry.as_neighbor()?;
            Some(nbr.bad_packets_rcvd.into())
        })
        .path(ripd::state::neighbors::neighbor::bad_routes_rcvd::PATH)
        .get_element(|_master, args| {
            let nbr = args.list_entry.as_neighbor()?;
            Some(nbr.bad_routes_rcvd.into())
        })
        .path(ripd::state::routes::route::PATH)
        .get_next(route_next)
        .get_keys(route_keys)
        .lookup_entry(route_lookup)
        .path(ripd::state::routes::route::prefix::PATH)
        .get_element(|_master, args| {
            let route = args.list_entry.as_route()?;
            Some(route.prefix.to_string().into())
        })
        .path(ripd::state::routes::route::next_hop::PATH)
        .get_element(|_master, args| {
            let route = args.list_entry.as_route()?;
            route.nexthop.map(|addr| addr.to_string().into())
        })
        .path(ripd::state::routes::route::interface::PATH)
        .get_element(|_master, args| {
            let route = args.list_entry.as_route()?;
            route.ifname.clone().map(DataValue::String)
        })
        .path(ripd::state::routes::route::metric::PATH)
        .get_element(|_master, args| {
            let route = args.list_entry.as_route()?;
            Some(route.metric.get().into())
        })
        .path(ripd::state::routes::route::route_type::PATH)
        .get_element(|_master, args| {
            let route = args.list_entry.as_route()?;
            Some(DataValue::String(route.route_type.to_yang().into_owned()))
        })
        .build()
}

fn neighbor_next<'a>(
    master: &'a Master,
    args: GetNextArgs<'a, '_, Master>,
) -> Option<ListEntry<'a>> {
    let neighbors = &master.instance()?.state.neighbors;
    let next = match args.prev {
        None => neighbors.values().next(),
        Some(ListEntry::Neighbor(prev)) => neighbors
            .range((Excluded(prev.addr), Unbounded))
            .map(|(_, nbr)| nbr)
            .next(),
        Some(_) => None,
    };
    next.map(ListEntry::Neighbor)
}

fn neighbor_lookup<'a>(
    master: &'a Master,
    args: LookupEntryArgs<'a, '_, Master>,
) -> Option<ListEntry<'a>> {
    let addr = args.keys.get("address")?.parse::<Ipv4Addr>().ok()?;
    let neighbors = &master.instance()?.state.neighbors;
    neighbors.get(&addr).map(ListEntry::Neighbor)
}

fn route_next<'a>(
    master: &'a Master,
    args: GetNextArgs<'a, '_, Master>,
) -> Option<ListEntry<'a>> {
    let routes = &master.instance()?.state.routes;
    let next = match args.prev {
        None => routes.values().next(),
        Some(ListEntry::Route(prev)) => routes
            .range((Excluded(prev.key()), Unbounded))
            .map(|(_, route)| route)
            .next(),
        Some(_) => None,
    };
    next.map(ListEntry::Route)
}

// Absent next-hops and interfaces are represented by empty key values.
fn route_keys(_master: &Master, args: GetKeysArgs<'_, '_, Master>) -> ListKeys {
    let Some(route) = args.list_entry.as_route() else {
        return ListKeys::new();
    };

    let nexthop = route.nexthop.map(|addr| addr.to_string());
    ListKeys::new()
        .with("prefix", route.prefix)
        .with("next-hop", nexthop.unwrap_or_default())
        .with("interface", route.ifname.clone().unwrap_or_default())
}

fn route_lookup<'a>(
    master: &'a Master,
    args: LookupEntryArgs<'a, '_, Master>,
) -> Option<ListEntry<'a>> {
    let prefix = args.keys.get("prefix")?.parse::<Ipv4Network>().ok()?;
    let nexthop = match args.keys.get("next-hop") {
        None | Some("") => None,
        Some(addr) => Some(addr.parse::<Ipv4Addr>().ok()?),
    };
    let ifname = args
        .keys
        .get("interface")
        .filter(|ifname| !ifname.is_empty())
        .map(str::to_owned);

    let key = RouteKey::new(prefix, nexthop, ifname);
    let routes = &master.instance()?.state.routes;
    routes.get(&key).map(ListEntry::Route)
}

// ===== impl Master =====

impl Provider for Master {
    type ListEntry<'a> = ListEntry<'a>;

    fn callbacks() -> &'static Callbacks<Master> {
        &CALLBACKS
    }
}
