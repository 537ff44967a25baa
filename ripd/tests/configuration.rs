//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

mod common;

use std::net::Ipv4Addr;

use common::*;
use ipnetwork::Ipv4Network;
use ripd::Master;
use ripd::northbound::yang::ripd as yang;
use ripd::offset_list::Direction;
use ripd::redistribute::Protocol;
use ripd::route::RouteType;
use ripd_northbound::configuration::{CommitPhase, ConfigChange};
use ripd_northbound::data::DataPath;
use ripd_northbound::error::Error;
use ripd_northbound::registry::EntryRegistry;
use ripd_northbound::transaction::{self, ApplyErrorPolicy};

fn prefix(prefix: &str) -> Ipv4Network {
    prefix.parse().unwrap()
}

#[test]
fn instance_default_metric() {
    let mut master = master();
    let mut registry = EntryRegistry::default();

    let report = commit(
        &mut master,
        &mut registry,
        &[
            create_instance(),
            modify(yang::instance::default_metric::PATH, 5u8),
        ],
    )
    .unwrap();
    assert!(report.is_success());
    assert_eq!(report.applied, 2);

    let instance = master.instance().unwrap();
    assert_eq!(instance.config.default_metric, 5);
    assert_eq!(instance.config.update_interval, 30);
    assert_eq!(registry.len(), 1);
}

#[test]
fn default_metric_out_of_range() {
    let mut master = master();
    let mut registry = EntryRegistry::default();

    let error = commit(
        &mut master,
        &mut registry,
        &[
            create_instance(),
            modify(yang::instance::default_metric::PATH, 17u8),
        ],
    )
    .unwrap_err();
    assert_eq!(error.phase, CommitPhase::Validate);
    assert!(matches!(error.error, Error::SchemaInvalid(..)));
    assert!(master.instance().is_none());
    assert!(registry.is_empty());
}

#[test]
fn socket_exhausted() {
    let sockets = TestSockets::with_budget(0);
    let mut master = Master::new(Box::new(sockets));
    let mut registry = EntryRegistry::default();

    let error = commit(
        &mut master,
        &mut registry,
        &[
            create_instance(),
            modify(yang::instance::default_metric::PATH, 5u8),
        ],
    )
    .unwrap_err();
    assert_eq!(error.phase, CommitPhase::Prepare);
    assert_eq!(error.path, yang::instance::PATH);
    assert!(matches!(error.error, Error::ResourceUnavailable(..)));
    assert!(master.instance().is_none());
    assert!(registry.is_empty());
}

#[test]
fn instance_duplicate_create() {
    let (mut master, mut registry) = master_with_instance();
    commit(
        &mut master,
        &mut registry,
        &[modify(yang::instance::default_metric::PATH, 5u8)],
    )
    .unwrap();

    let report =
        commit(&mut master, &mut registry, &[create_instance()]).unwrap();
    assert_eq!(report.applied, 0);
    assert!(matches!(
        report.first_error().unwrap().error,
        Error::OrderingViolation(..)
    ));

    // The running instance is untouched.
    assert_eq!(master.instance().unwrap().config.default_metric, 5);
    assert_eq!(registry.len(), 1);
}

#[test]
fn instance_delete() {
    let (mut master, mut registry) = master_with_instance();
    commit(
        &mut master,
        &mut registry,
        &[
            ConfigChange::create(&distance_source_path("10.0.0.0/8")).unwrap(),
            ConfigChange::create(&offset_list_path("eth0", "in")).unwrap(),
        ],
    )
    .unwrap();
    assert_eq!(registry.len(), 3);

    let report =
        commit(&mut master, &mut registry, &[delete_instance()]).unwrap();
    assert!(report.is_success());
    assert!(master.instance().is_none());
    assert!(registry.is_empty());
}

#[test]
fn missing_instance() {
    let mut master = master();
    let mut registry = EntryRegistry::default();

    let report = commit(
        &mut master,
        &mut registry,
        &[modify(yang::instance::default_metric::PATH, 5u8)],
    )
    .unwrap();
    assert_eq!(report.applied, 0);
    assert!(matches!(
        report.first_error().unwrap().error,
        Error::OrderingViolation(..)
    ));
}

#[test]
fn distance_source_lifecycle() {
    let (mut master, mut registry) = master_with_instance();
    let path = distance_source_path("10.0.0.0/8");

    let report = commit(
        &mut master,
        &mut registry,
        &[
            ConfigChange::create(&path).unwrap(),
            modify(&format!("{}/distance", path), 50u8),
            modify(&format!("{}/access-list", path), "acl1"),
        ],
    )
    .unwrap();
    assert!(report.is_success());

    let instance = master.instance().unwrap();
    let dsource = instance
        .distances
        .get_by_prefix(&prefix("10.0.0.0/8"))
        .unwrap();
    assert_eq!(dsource.distance, 50);
    assert_eq!(dsource.access_list.as_deref(), Some("acl1"));

    // Clear the access-list.
    let change =
        ConfigChange::delete(&format!("{}/access-list", path)).unwrap();
    commit(&mut master, &mut registry, &[change]).unwrap();
    let instance = master.instance().unwrap();
    let dsource = instance
        .distances
        .get_by_prefix(&prefix("10.0.0.0/8"))
        .unwrap();
    assert_eq!(dsource.access_list, None);

    // Delete the record.
    let change = ConfigChange::delete(&path).unwrap();
    let report = commit(&mut master, &mut registry, &[change]).unwrap();
    assert!(report.is_success());
    assert!(master.instance().unwrap().distances.is_empty());
    assert_eq!(registry.len(), 1);
    let path: DataPath = path.parse().unwrap();
    assert!(!registry.contains(&path));
}

#[test]
fn distance_source_duplicate() {
    let (mut master, mut registry) = master_with_instance();
    let path = distance_source_path("10.0.0.0/8");

    commit(
        &mut master,
        &mut registry,
        &[ConfigChange::create(&path).unwrap()],
    )
    .unwrap();

    // Same prefix, different key spelling.
    let other = distance_source_path("10.1.0.0/8");
    let report = commit(
        &mut master,
        &mut registry,
        &[ConfigChange::create(&other).unwrap()],
    )
    .unwrap();
    assert!(matches!(
        report.first_error().unwrap().error,
        Error::DomainConflict(..)
    ));
    assert_eq!(master.instance().unwrap().distances.len(), 1);
}

#[test]
fn offset_list_shared_record() {
    let (mut master, mut registry) = master_with_instance();
    let in_path = offset_list_path("eth0", "in");
    let out_path = offset_list_path("eth0", "out");

    let report = commit(
        &mut master,
        &mut registry,
        &[
            ConfigChange::create(&in_path).unwrap(),
            modify(&format!("{}/access-list", in_path), "acl-in"),
            modify(&format!("{}/metric", in_path), 3u8),
            ConfigChange::create(&out_path).unwrap(),
            modify(&format!("{}/access-list", out_path), "acl-out"),
            modify(&format!("{}/metric", out_path), 5u8),
        ],
    )
    .unwrap();
    assert!(report.is_success());

    let instance = master.instance().unwrap();
    assert_eq!(instance.offset_lists.len(), 1);
    let olist = instance.offset_lists.get_by_ifname("eth0").unwrap();
    assert_eq!(olist.get(Direction::In).unwrap().metric, 3);
    assert_eq!(olist.get(Direction::Out).unwrap().metric, 5);

    // The record survives while one direction is left.
    let change = ConfigChange::delete(&in_path).unwrap();
    commit(&mut master, &mut registry, &[change]).unwrap();
    let instance = master.instance().unwrap();
    let olist = instance.offset_lists.get_by_ifname("eth0").unwrap();
    assert!(olist.get(Direction::In).is_none());
    assert_eq!(
        olist.get(Direction::Out).unwrap().access_list.as_deref(),
        Some("acl-out")
    );

    // The other direction is still bound and can be edited.
    let change = modify(&format!("{}/metric", out_path), 7u8);
    let report = commit(&mut master, &mut registry, &[change]).unwrap();
    assert!(report.is_success());

    let change = ConfigChange::delete(&out_path).unwrap();
    commit(&mut master, &mut registry, &[change]).unwrap();
    assert!(master.instance().unwrap().offset_lists.is_empty());
    assert_eq!(registry.len(), 1);
}

#[test]
fn offset_list_metric_out_of_range() {
    let (mut master, mut registry) = master_with_instance();
    let path = offset_list_path("eth0", "in");

    let error = commit(
        &mut master,
        &mut registry,
        &[
            ConfigChange::create(&path).unwrap(),
            modify(&format!("{}/metric", path), 17u8),
        ],
    )
    .unwrap_err();
    assert_eq!(error.phase, CommitPhase::Validate);
    assert!(master.instance().unwrap().offset_lists.is_empty());
}

#[test]
fn static_route_duplicate() {
    let (mut master, mut registry) = master_with_instance();
    let path = yang::instance::static_route::PATH;

    let report = commit(
        &mut master,
        &mut registry,
        &[leaf_list_create(path, "10.1.0.0/16")],
    )
    .unwrap();
    assert!(report.is_success());

    let report = commit(
        &mut master,
        &mut registry,
        &[leaf_list_create(path, "10.1.0.0/16")],
    )
    .unwrap();
    let error = report.first_error().unwrap();
    assert_eq!(error.phase, CommitPhase::Apply);
    assert!(matches!(error.error, Error::DomainConflict(..)));

    let instance = master.instance().unwrap();
    assert_eq!(instance.config.static_routes.len(), 1);
    assert_eq!(instance.state.routes.len(), 1);

    let report = commit(
        &mut master,
        &mut registry,
        &[leaf_list_delete(path, "10.1.0.0/16")],
    )
    .unwrap();
    assert!(report.is_success());
    assert!(master.instance().unwrap().state.routes.is_empty());
}

#[test]
fn leaf_lists() {
    let (mut master, mut registry) = master_with_instance();

    let report = commit(
        &mut master,
        &mut registry,
        &[
            leaf_list_create(yang::instance::network::PATH, "10.0.0.0/8"),
            leaf_list_create(yang::instance::interface::PATH, "eth0"),
            leaf_list_create(
                yang::instance::explicit_neighbor::PATH,
                "192.168.1.1",
            ),
        ],
    )
    .unwrap();
    assert!(report.is_success());

    let instance = master.instance().unwrap();
    assert!(instance.config.networks.contains(&prefix("10.0.0.0/8")));
    assert!(instance.config.interfaces.contains("eth0"));
    assert!(
        instance
            .config
            .explicit_neighbors
            .contains(&Ipv4Addr::new(192, 168, 1, 1))
    );

    // Removing an unknown neighbor is a conflict.
    let report = commit(
        &mut master,
        &mut registry,
        &[leaf_list_delete(
            yang::instance::explicit_neighbor::PATH,
            "192.168.1.2",
        )],
    )
    .unwrap();
    assert!(matches!(
        report.first_error().unwrap().error,
        Error::DomainConflict(..)
    ));
}

#[test]
fn passive_interfaces() {
    let (mut master, mut registry) = master_with_instance();
    let passive = yang::instance::passive_interface::PATH;

    commit(
        &mut master,
        &mut registry,
        &[leaf_list_create(passive, "eth0")],
    )
    .unwrap();
    let instance = master.instance().unwrap();
    assert!(instance.is_passive("eth0"));
    assert!(!instance.is_passive("eth1"));

    // Changing the default clears the per-interface exceptions.
    commit(
        &mut master,
        &mut registry,
        &[modify(yang::instance::passive_default::PATH, true)],
    )
    .unwrap();
    let instance = master.instance().unwrap();
    assert!(instance.config.passive_nondefault.is_empty());
    assert!(instance.is_passive("eth0"));
    assert!(instance.is_passive("eth1"));

    // Deleting an exception that was already cleared isn't an error.
    let report = commit(
        &mut master,
        &mut registry,
        &[leaf_list_delete(passive, "eth0")],
    )
    .unwrap();
    assert!(report.is_success());
}

#[test]
fn redistribute_lifecycle() {
    let (mut master, mut registry) = master_with_instance();
    let path = redistribute_path("ospf");

    let report = commit(
        &mut master,
        &mut registry,
        &[
            ConfigChange::create(&path).unwrap(),
            modify(&format!("{}/metric", path), 3u8),
            modify(&format!("{}/route-map", path), "rmap"),
        ],
    )
    .unwrap();
    assert!(report.is_success());

    let instance = master.instance().unwrap();
    let cfg = &instance.config.redistribute[&Protocol::Ospf];
    assert_eq!(cfg.metric.unwrap().get(), 3);
    assert_eq!(cfg.route_map.as_deref(), Some("rmap"));
    assert!(instance.state.redistributed.contains(&Protocol::Ospf));

    let change =
        ConfigChange::delete(&format!("{}/route-map", path)).unwrap();
    commit(&mut master, &mut registry, &[change]).unwrap();
    let instance = master.instance().unwrap();
    assert_eq!(instance.config.redistribute[&Protocol::Ospf].route_map, None);

    let change = ConfigChange::delete(&path).unwrap();
    commit(&mut master, &mut registry, &[change]).unwrap();
    let instance = master.instance().unwrap();
    assert!(instance.config.redistribute.is_empty());
    assert!(instance.state.redistributed.is_empty());
}

#[test]
fn redistribute_replaced() {
    let (mut master, mut registry) = master_with_instance();
    let path = redistribute_path("ospf");
    commit(&mut master, &mut registry, &[ConfigChange::create(&path).unwrap()])
        .unwrap();

    // Deletions come before creations.
    let report = commit(
        &mut master,
        &mut registry,
        &[
            ConfigChange::delete(&path).unwrap(),
            ConfigChange::create(&path).unwrap(),
        ],
    )
    .unwrap();
    assert!(report.is_success());

    let instance = master.instance().unwrap();
    assert!(instance.config.redistribute.contains_key(&Protocol::Ospf));
    assert!(instance.state.redistributed.contains(&Protocol::Ospf));
}

#[test]
fn instance_replaced() {
    let (mut master, mut registry) = master_with_instance();
    let ospf = redistribute_path("ospf");
    let bgp = redistribute_path("bgp");
    commit(
        &mut master,
        &mut registry,
        &[
            ConfigChange::create(&ospf).unwrap(),
            ConfigChange::create(&bgp).unwrap(),
        ],
    )
    .unwrap();

    // Only ospf comes back with the new instance.
    let report = commit(
        &mut master,
        &mut registry,
        &[
            ConfigChange::delete(&bgp).unwrap(),
            ConfigChange::delete(&ospf).unwrap(),
            delete_instance(),
            create_instance(),
            ConfigChange::create(&ospf).unwrap(),
        ],
    )
    .unwrap();
    assert!(report.is_success());

    let instance = master.instance().unwrap();
    let redistributed = instance.state.redistributed.iter().collect::<Vec<_>>();
    assert_eq!(redistributed, vec![&Protocol::Ospf]);
    assert!(!instance.config.redistribute.contains_key(&Protocol::Bgp));
    assert_eq!(registry.len(), 2);
}

#[test]
fn timers_rearm_idempotent() {
    let (mut master, mut registry) = master_with_instance();
    let timer = |master: &Master| {
        let timer = &master.instance().unwrap().state.update_timer;
        (timer.interval, timer.rearm_count)
    };
    assert_eq!(timer(&master), (Some(30), 1));

    let update = yang::instance::timers::update_interval::PATH;
    commit(&mut master, &mut registry, &[modify(update, 60u32)]).unwrap();
    assert_eq!(timer(&master), (Some(60), 2));

    // Same value and unrelated timers don't re-arm it again.
    commit(&mut master, &mut registry, &[modify(update, 60u32)]).unwrap();
    let flush = yang::instance::timers::flush_interval::PATH;
    commit(&mut master, &mut registry, &[modify(flush, 120u32)]).unwrap();
    assert_eq!(timer(&master), (Some(60), 2));
    assert_eq!(master.instance().unwrap().config.flush_interval, 120);
}

#[test]
fn ecmp_disable_prunes_routes() {
    let (mut master, mut registry) = master_with_instance();
    commit(
        &mut master,
        &mut registry,
        &[modify(yang::instance::allow_ecmp::PATH, true)],
    )
    .unwrap();

    let instance = master.instance.as_mut().unwrap();
    let dest = prefix("172.16.0.0/16");
    for nbr in [1, 2, 3] {
        let source = Ipv4Addr::new(192, 168, 1, nbr);
        instance.process_rte(source, "eth0", dest, None, 2).unwrap();
    }
    assert_eq!(instance.state.routes.len(), 3);

    commit(
        &mut master,
        &mut registry,
        &[modify(yang::instance::allow_ecmp::PATH, false)],
    )
    .unwrap();
    assert_eq!(master.instance().unwrap().state.routes.len(), 1);
}

#[test]
fn default_information_originate() {
    let (mut master, mut registry) = master_with_instance();
    let path = yang::instance::default_information_originate::PATH;

    commit(&mut master, &mut registry, &[modify(path, true)]).unwrap();
    let routes = &master.instance().unwrap().state.routes;
    assert_eq!(routes.len(), 1);
    assert!(routes.keys().all(|key| key.prefix == prefix("0.0.0.0/0")));

    commit(&mut master, &mut registry, &[modify(path, false)]).unwrap();
    assert!(master.instance().unwrap().state.routes.is_empty());
}

#[test]
fn static_default_route() {
    let (mut master, mut registry) = master_with_instance();
    let originate = yang::instance::default_information_originate::PATH;
    let static_route = yang::instance::static_route::PATH;
    let route_type = |master: &Master| {
        let routes = &master.instance().unwrap().state.routes;
        assert!(routes.len() <= 1);
        routes.values().next().map(|route| route.route_type)
    };

    commit(
        &mut master,
        &mut registry,
        &[
            modify(originate, true),
            leaf_list_create(static_route, "0.0.0.0/0"),
        ],
    )
    .unwrap();
    assert_eq!(route_type(&master), Some(RouteType::Static));

    // The originated route comes back once the static one is gone.
    commit(
        &mut master,
        &mut registry,
        &[leaf_list_delete(static_route, "0.0.0.0/0")],
    )
    .unwrap();
    assert_eq!(route_type(&master), Some(RouteType::Default));

    // Disabling origination leaves a static default route alone.
    commit(
        &mut master,
        &mut registry,
        &[leaf_list_create(static_route, "0.0.0.0/0")],
    )
    .unwrap();
    commit(&mut master, &mut registry, &[modify(originate, false)]).unwrap();
    assert_eq!(route_type(&master), Some(RouteType::Static));

    commit(
        &mut master,
        &mut registry,
        &[leaf_list_delete(static_route, "0.0.0.0/0")],
    )
    .unwrap();
    assert_eq!(route_type(&master), None);
}

#[test]
fn versions() {
    let (mut master, mut registry) = master_with_instance();

    let report = commit(
        &mut master,
        &mut registry,
        &[
            modify(yang::instance::version::receive::PATH, "2"),
            modify(yang::instance::version::send::PATH, 1u8),
        ],
    )
    .unwrap();
    assert!(report.is_success());

    let error = commit(
        &mut master,
        &mut registry,
        &[modify(yang::instance::version::send::PATH, 3u8)],
    )
    .unwrap_err();
    assert_eq!(error.phase, CommitPhase::Validate);

    let instance = master.instance().unwrap();
    assert_eq!(instance.config.version_send, 1);
}

#[test]
fn interface_placeholders() {
    let mut master = master();
    let mut registry = EntryRegistry::default();
    let ifpath = "/frr-interface:lib/interface[name='eth0']/frr-ripd:rip";

    let report = transaction::commit(
        &mut master,
        &mut registry,
        &[
            modify(&format!("{}/split-horizon", ifpath), "simple"),
            modify(&format!("{}/authentication-password", ifpath), "secret"),
            ConfigChange::delete(&format!(
                "{}/authentication-key-chain",
                ifpath
            ))
            .unwrap(),
        ],
        ApplyErrorPolicy::Stop,
    )
    .unwrap();
    assert!(report.is_success());
    assert_eq!(report.applied, 3);
}
