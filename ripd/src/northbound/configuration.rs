//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::collections::{BTreeMap, BTreeSet};
use std::net::Ipv4Addr;
use std::sync::LazyLock as Lazy;

use enum_as_inner::EnumAsInner;
use ipnetwork::Ipv4Network;
use ripd_northbound::configuration::{
    CallbackArgs, Callbacks, CallbacksBuilder, Provider, ValidationArgs,
    not_implemented,
};
use ripd_northbound::error::Error;
use ripd_northbound::yang::TryFromYang;
use socket2::Socket;

use crate::Master;
use crate::distance::DistanceSourceIndex;
use crate::instance::Instance;
use crate::northbound::yang::{interface_rip, ripd};
use crate::offset_list::{Direction, OffsetListDir, OffsetListIndex};
use crate::redistribute::{Protocol, RedistributeCfg};
use crate::route::Metric;

#[derive(Clone, Debug, EnumAsInner)]
pub enum ListEntry {
    Instance,
    DistanceSource(DistanceSourceIndex),
    OffsetList(OffsetListIndex, Direction),
    Redistribute(Protocol),
}

#[derive(Debug)]
pub enum Resource {
    Socket(Socket),
}

pub static CALLBACKS: Lazy<Callbacks<Master>> = Lazy::new(load_callbacks);

// ===== configuration structs =====

#[derive(Debug)]
pub struct InstanceCfg {
    pub allow_ecmp: bool,
    pub default_information_originate: bool,
    pub default_metric: u8,
    pub distance: u8,
    pub networks: BTreeSet<Ipv4Network>,
    pub interfaces: BTreeSet<String>,
    pub explicit_neighbors: BTreeSet<Ipv4Addr>,
    pub passive_default: bool,
    // Interfaces whose passive status differs from the default.
    pub passive_nondefault: BTreeSet<String>,
    pub static_routes: BTreeSet<Ipv4Network>,
    pub redistribute: BTreeMap<Protocol, RedistributeCfg>,
    pub update_interval: u32,
    pub holddown_interval: u32,
    pub flush_interval: u32,
    pub version_send: u8,
    pub version_receive: VersionReceive,
}

// RIP versions accepted on reception.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum VersionReceive {
    V1,
    V2,
    Both,
}

// ===== callbacks =====

fn load_callbacks() -> Callbacks<Master> {
    CallbacksBuilder::<Master>::default()
        .path(ripd::instance::PATH)
        .create_prepare(|master, mut args| {
            args.resource
                .acquire(|| master.sockets.open().map(Resource::Socket))
        })
        .create_abort(|_master, mut args| {
            args.resource.release();
        })
        .create_apply(|master, mut args| {
            // Fails without side effects if the instance already exists.
            args.bind(ListEntry::Instance)?;
            let Resource::Socket(socket) = args.resource.consume()?;
            master.instance = Some(Instance::new(socket, Default::default()));
            Ok(())
        })
        .delete_apply(|master, mut args| {
            args.unbind()?;
            master.instance = None;
            Ok(())
        })
        .path(ripd::instance::allow_ecmp::PATH)
        .modify_apply(|master, args| {
            let allow_ecmp = args.dnode.get_bool()?;
            let instance = master.instance_mut()?;
            instance.config.allow_ecmp = allow_ecmp;
            if !allow_ecmp {
                instance.ecmp_disable();
            }
            Ok(())
        })
        .path(ripd::instance::default_information_originate::PATH)
        .modify_apply(|master, args| {
            let originate = args.dnode.get_bool()?;
            let instance = master.instance_mut()?;
            instance.default_information_originate(originate);
            Ok(())
        })
        .path(ripd::instance::default_metric::PATH)
        .modify_validate(validate_default_metric)
        .modify_apply(|master, args| {
            let default_metric = args.dnode.get_u8()?;
            master.instance_mut()?.config.default_metric = default_metric;
            Ok(())
        })
        .path(ripd::instance::distance::default::PATH)
        .modify_apply(|master, args| {
            let distance = args.dnode.get_u8()?;
            master.instance_mut()?.config.distance = distance;
            Ok(())
        })
        .path(ripd::instance::distance::source::PATH)
        .create_apply(|master, mut args| {
            let prefix = args.dnode.key_prefix4("prefix")?;
            let instance = master.instance_mut()?;
            let (dsource_idx, _) = instance.distances.insert(prefix)?;
            args.bind(ListEntry::DistanceSource(dsource_idx))
        })
        .delete_apply(|master, mut args| {
            let dsource_idx = args
                .unbind()?
                .into_distance_source()
                .map_err(unexpected_entry)?;
            let instance = master.instance_mut()?;
            instance.distances.delete(dsource_idx)?;
            Ok(())
        })
        .path(ripd::instance::distance::source::distance::PATH)
        .modify_apply(|master, args| {
            let dsource_idx = distance_source(&args)?;
            let distance = args.dnode.get_u8()?;
            let instance = master.instance_mut()?;
            instance.distances.get_mut(dsource_idx)?.distance = distance;
            Ok(())
        })
        .path(ripd::instance::distance::source::access_list::PATH)
        .modify_apply(|master, args| {
            let dsource_idx = distance_source(&args)?;
            let access_list = args.dnode.get_string()?;
            let instance = master.instance_mut()?;
            instance.distances.get_mut(dsource_idx)?.access_list =
                Some(access_list);
            Ok(())
        })
        .delete_apply(|master, args| {
            let dsource_idx = distance_source(&args)?;
            let instance = master.instance_mut()?;
            instance.distances.get_mut(dsource_idx)?.access_list = None;
            Ok(())
        })
        .path(ripd::instance::explicit_neighbor::PATH)
        .create_apply(|master, args| {
            let addr = args.dnode.get_ipv4()?;
            master.instance_mut()?.neighbor_add(addr)?;
            Ok(())
        })
        .delete_apply(|master, args| {
            let addr = args.dnode.get_ipv4()?;
            master.instance_mut()?.neighbor_delete(addr)?;
            Ok(())
        })
        .path(ripd::instance::network::PATH)
        .create_apply(|master, args| {
            let prefix = args.dnode.get_prefix4()?;
            master.instance_mut()?.network_add(prefix)?;
            Ok(())
        })
        .delete_apply(|master, args| {
            let prefix = args.dnode.get_prefix4()?;
            master.instance_mut()?.network_delete(prefix)?;
            Ok(())
        })
        .path(ripd::instance::interface::PATH)
        .create_apply(|master, args| {
            let ifname = args.dnode.get_string()?;
            master.instance_mut()?.interface_add(&ifname)?;
            Ok(())
        })
        .delete_apply(|master, args| {
            let ifname = args.dnode.get_string()?;
            master.instance_mut()?.interface_delete(&ifname)?;
            Ok(())
        })
        .path(ripd::instance::offset_list::PATH)
        .create_apply(|master, mut args| {
            let ifname = args.dnode.key_string("interface")?;
            let direction = args.dnode.key_enum::<Direction>("direction")?;
            let instance = master.instance_mut()?;
            let olist_idx = instance.offset_lists.insert(&ifname, direction)?;
            args.bind(ListEntry::OffsetList(olist_idx, direction))
        })
        .delete_apply(|master, mut args| {
            let (olist_idx, direction) =
                args.unbind()?.into_offset_list().map_err(unexpected_entry)?;
            let instance = master.instance_mut()?;
            instance.offset_lists.delete(olist_idx, direction)?;
            Ok(())
        })
        .path(ripd::instance::offset_list::access_list::PATH)
        .modify_apply(|master, args| {
            let (olist_idx, direction) = offset_list(&args)?;
            let access_list = args.dnode.get_string()?;
            let olist_dir = offset_list_dir(master, olist_idx, direction)?;
            olist_dir.access_list = Some(access_list);
            Ok(())
        })
        .path(ripd::instance::offset_list::metric::PATH)
        .modify_validate(validate_metric)
        .modify_apply(|master, args| {
            let (olist_idx, direction) = offset_list(&args)?;
            let metric = args.dnode.get_u8()?;
            let olist_dir = offset_list_dir(master, olist_idx, direction)?;
            olist_dir.metric = metric;
            Ok(())
        })
        .path(ripd::instance::passive_default::PATH)
        .modify_apply(|master, args| {
            let passive = args.dnode.get_bool()?;
            master.instance_mut()?.passive_default_set(passive);
            Ok(())
        })
        .path(ripd::instance::passive_interface::PATH)
        .create_apply(|master, args| {
            let ifname = args.dnode.get_string()?;
            master.instance_mut()?.passive_nondefault_set(&ifname);
            Ok(())
        })
        .delete_apply(|master, args| {
            let ifname = args.dnode.get_string()?;
            master.instance_mut()?.passive_nondefault_unset(&ifname);
            Ok(())
        })
        .path(ripd::instance::non_passive_interface::PATH)
        .create_apply(|master, args| {
            let ifname = args.dnode.get_string()?;
            master.instance_mut()?.passive_nondefault_unset(&ifname);
            Ok(())
        })
        .delete_apply(|master, args| {
            let ifname = args.dnode.get_string()?;
            master.instance_mut()?.passive_nondefault_set(&ifname);
            Ok(())
        })
        .path(ripd::instance::redistribute::PATH)
        .create_apply(|master, mut args| {
            let protocol = args.dnode.key_enum::<Protocol>("protocol")?;
            let instance = master.instance_mut()?;
            instance
                .config
                .redistribute
                .insert(protocol, RedistributeCfg::default());
            args.bind(ListEntry::Redistribute(protocol))
        })
        .delete_apply(|master, mut args| {
            let protocol =
                args.unbind()?.into_redistribute().map_err(unexpected_entry)?;
            master.instance_mut()?.redistribute_conf_delete(protocol);
            Ok(())
        })
        .apply_finish(|master, args| {
            let protocol = args
                .list_entry()?
                .into_redistribute()
                .map_err(unexpected_entry)?;
            if let Some(instance) = &mut master.instance {
                instance.redistribute_conf_update(protocol);
            }
            Ok(())
        })
        .path(ripd::instance::redistribute::route_map::PATH)
        .modify_apply(|master, args| {
            let protocol = redistribute(&args)?;
            let route_map = args.dnode.get_string()?;
            let instance = master.instance_mut()?;
            instance.redistribute_conf_get(protocol)?.route_map =
                Some(route_map);
            Ok(())
        })
        .delete_apply(|master, args| {
            let protocol = redistribute(&args)?;
            let instance = master.instance_mut()?;
            instance.redistribute_conf_get(protocol)?.route_map = None;
            Ok(())
        })
        .path(ripd::instance::redistribute::metric::PATH)
        .modify_validate(validate_metric)
        .modify_apply(|master, args| {
            let protocol = redistribute(&args)?;
            let metric = args.dnode.get_u8()?;
            let metric = Metric::new(metric)
                .map_err(|error| Error::SchemaInvalid(error.to_string()))?;
            let instance = master.instance_mut()?;
            instance.redistribute_conf_get(protocol)?.metric = Some(metric);
            Ok(())
        })
        .delete_apply(|master, args| {
            let protocol = redistribute(&args)?;
            let instance = master.instance_mut()?;
            instance.redistribute_conf_get(protocol)?.metric = None;
            Ok(())
        })
        .path(ripd::instance::static_route::PATH)
        .create_apply(|master, args| {
            let prefix = args.dnode.get_prefix4()?;
            master.instance_mut()?.static_route_add(prefix)?;
            Ok(())
        })
        .delete_apply(|master, args| {
            let prefix = args.dnode.get_prefix4()?;
            master.instance_mut()?.static_route_delete(prefix)?;
            Ok(())
        })
        .path(ripd::instance::timers::PATH)
        .apply_finish(|master, _args| {
            if let Some(instance) = &mut master.instance {
                instance.update_timer_rearm();
            }
            Ok(())
        })
        .path(ripd::instance::timers::flush_interval::PATH)
        .modify_apply(|master, args| {
            let interval = args.dnode.get_u32()?;
            master.instance_mut()?.config.flush_interval = interval;
            Ok(())
        })
        .path(ripd::instance::timers::holddown_interval::PATH)
        .modify_apply(|master, args| {
            let interval = args.dnode.get_u32()?;
            master.instance_mut()?.config.holddown_interval = interval;
            Ok(())
        })
        .path(ripd::instance::timers::update_interval::PATH)
        .modify_apply(|master, args| {
            let interval = args.dnode.get_u32()?;
            master.instance_mut()?.config.update_interval = interval;
            Ok(())
        })
        .path(ripd::instance::version::receive::PATH)
        .modify_validate(|args| {
            args.dnode.get_enum::<VersionReceive>()?;
            Ok(())
        })
        .modify_apply(|master, args| {
            let version = args.dnode.get_enum::<VersionReceive>()?;
            master.instance_mut()?.config.version_receive = version;
            Ok(())
        })
        .path(ripd::instance::version::send::PATH)
        .modify_validate(|args| {
            let version = args.dnode.get_u8()?;
            if !(1..=2).contains(&version) {
                return Err(Error::SchemaInvalid(format!(
                    "unsupported RIP version: {}",
                    version
                )));
            }
            Ok(())
        })
        .modify_apply(|master, args| {
            let version = args.dnode.get_u8()?;
            master.instance_mut()?.config.version_send = version;
            Ok(())
        })
        .path(interface_rip::split_horizon::PATH)
        .modify_apply(not_implemented)
        .path(interface_rip::v2_broadcast::PATH)
        .modify_apply(not_implemented)
        .path(interface_rip::version_receive::PATH)
        .modify_apply(not_implemented)
        .path(interface_rip::version_send::PATH)
        .modify_apply(not_implemented)
        .path(interface_rip::authentication_scheme::mode::PATH)
        .modify_apply(not_implemented)
        .path(interface_rip::authentication_scheme::md5_auth_length::PATH)
        .modify_apply(not_implemented)
        .delete_apply(not_implemented)
        .path(interface_rip::authentication_password::PATH)
        .modify_apply(not_implemented)
        .delete_apply(not_implemented)
        .path(interface_rip::authentication_key_chain::PATH)
        .modify_apply(not_implemented)
        .delete_apply(not_implemented)
        .build()
}

// ===== impl Master =====

impl Provider for Master {
    type ListEntry = ListEntry;
    type Resource = Resource;

    fn callbacks() -> &'static Callbacks<Master> {
        &CALLBACKS
    }
}

// ===== configuration defaults =====

impl Default for InstanceCfg {
    fn default() -> InstanceCfg {
        let version_receive = ripd::instance::version::receive::DFLT;
        let version_receive = VersionReceive::try_from_yang(version_receive)
            .unwrap_or(VersionReceive::Both);

        InstanceCfg {
            allow_ecmp: ripd::instance::allow_ecmp::DFLT,
            default_information_originate:
                ripd::instance::default_information_originate::DFLT,
            default_metric: ripd::instance::default_metric::DFLT,
            distance: ripd::instance::distance::default::DFLT,
            networks: Default::default(),
            interfaces: Default::default(),
            explicit_neighbors: Default::default(),
            passive_default: ripd::instance::passive_default::DFLT,
            passive_nondefault: Default::default(),
            static_routes: Default::default(),
            redistribute: Default::default(),
            update_interval: ripd::instance::timers::update_interval::DFLT,
            holddown_interval: ripd::instance::timers::holddown_interval::DFLT,
            flush_interval: ripd::instance::timers::flush_interval::DFLT,
            version_send: ripd::instance::version::send::DFLT,
            version_receive,
        }
    }
}

// ===== validation callbacks =====

fn validate_default_metric(args: ValidationArgs<'_>) -> Result<(), Error> {
    let metric = args.dnode.get_u8()?;
    if !(1..=Metric::INFINITE).contains(&metric) {
        return Err(Error::SchemaInvalid(format!(
            "default-metric out of range: {}",
            metric
        )));
    }
    Ok(())
}

fn validate_metric(args: ValidationArgs<'_>) -> Result<(), Error> {
    let metric = args.dnode.get_u8()?;
    if metric > Metric::INFINITE {
        return Err(Error::SchemaInvalid(format!(
            "metric out of range: {}",
            metric
        )));
    }
    Ok(())
}

// ===== helper functions =====

fn unexpected_entry(entry: ListEntry) -> Error {
    Error::OrderingViolation(format!("unexpected list entry: {:?}", entry))
}

fn distance_source(
    args: &CallbackArgs<'_, Master>,
) -> Result<DistanceSourceIndex, Error> {
    args.list_entry()?
        .into_distance_source()
        .map_err(unexpected_entry)
}

fn offset_list(
    args: &CallbackArgs<'_, Master>,
) -> Result<(OffsetListIndex, Direction), Error> {
    args.list_entry()?.into_offset_list().map_err(unexpected_entry)
}

fn offset_list_dir(
    master: &mut Master,
    olist_idx: OffsetListIndex,
    direction: Direction,
) -> Result<&mut OffsetListDir, Error> {
    let instance = master.instance_mut()?;
    let entry = ListEntry::OffsetList(olist_idx, direction);
    let olist = instance
        .offset_lists
        .get_mut(olist_idx)
        .ok_or_else(|| unexpected_entry(entry))?;
    Ok(olist.get_mut(direction)?)
}

fn redistribute(args: &CallbackArgs<'_, Master>) -> Result<Protocol, Error> {
    args.list_entry()?.into_redistribute().map_err(unexpected_entry)
}
