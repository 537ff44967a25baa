//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::Ipv4Addr;

use ipnetwork::Ipv4Network;
use tracing::warn;

use crate::offset_list::Direction;
use crate::redistribute::Protocol;

// RIP runtime-model errors.
#[derive(Debug)]
pub enum Error {
    InstanceNotFound,
    NetworkExists(Ipv4Network),
    NetworkNotFound(Ipv4Network),
    InterfaceExists(String),
    InterfaceNotFound(String),
    NeighborExists(Ipv4Addr),
    NeighborNotFound(Ipv4Addr),
    StaticRouteExists(Ipv4Network),
    StaticRouteNotFound(Ipv4Network),
    DistanceSourceExists(Ipv4Network),
    DistanceSourceNotFound,
    OffsetListExists(String, Direction),
    OffsetListNotFound(String, Direction),
    RedistributeNotFound(Protocol),
    InvalidMetric(u8),
}

// RIP metric errors.
#[derive(Debug)]
pub enum MetricError {
    InvalidValue,
}

// ===== impl Error =====

impl Error {
    pub(crate) fn log(&self) {
        match self {
            Error::InstanceNotFound | Error::DistanceSourceNotFound => {
                warn!("{}", self);
            }
            Error::NetworkExists(prefix)
            | Error::NetworkNotFound(prefix)
            | Error::StaticRouteExists(prefix)
            | Error::StaticRouteNotFound(prefix)
            | Error::DistanceSourceExists(prefix) => {
                warn!(%prefix, "{}", self);
            }
            Error::InterfaceExists(ifname)
            | Error::InterfaceNotFound(ifname) => {
                warn!(%ifname, "{}", self);
            }
            Error::NeighborExists(addr) | Error::NeighborNotFound(addr) => {
                warn!(address = %addr, "{}", self);
            }
            Error::OffsetListExists(ifname, direction)
            | Error::OffsetListNotFound(ifname, direction) => {
                warn!(%ifname, ?direction, "{}", self);
            }
            Error::RedistributeNotFound(protocol) => {
                warn!(?protocol, "{}", self);
            }
            Error::InvalidMetric(metric) => {
                warn!(%metric, "{}", self);
            }
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InstanceNotFound => {
                write!(f, "RIP instance not found")
            }
            Error::NetworkExists(prefix) => {
                write!(f, "network {} already enabled", prefix)
            }
            Error::NetworkNotFound(prefix) => {
                write!(f, "network {} not enabled", prefix)
            }
            Error::InterfaceExists(ifname) => {
                write!(f, "interface {} already enabled", ifname)
            }
            Error::InterfaceNotFound(ifname) => {
                write!(f, "interface {} not enabled", ifname)
            }
            Error::NeighborExists(addr) => {
                write!(f, "explicit neighbor {} already exists", addr)
            }
            Error::NeighborNotFound(addr) => {
                write!(f, "explicit neighbor {} not found", addr)
            }
            Error::StaticRouteExists(prefix) => {
                write!(f, "static route {} already exists", prefix)
            }
            Error::StaticRouteNotFound(prefix) => {
                write!(f, "static route {} not found", prefix)
            }
            Error::DistanceSourceExists(prefix) => {
                write!(f, "distance source {} already exists", prefix)
            }
            Error::DistanceSourceNotFound => {
                write!(f, "distance source not found")
            }
            Error::OffsetListExists(ifname, direction) => {
                write!(f, "offset-list {} {} already exists", ifname, direction)
            }
            Error::OffsetListNotFound(ifname, direction) => {
                write!(f, "offset-list {} {} not found", ifname, direction)
            }
            Error::RedistributeNotFound(protocol) => {
                write!(f, "redistribution of {} not configured", protocol)
            }
            Error::InvalidMetric(metric) => {
                write!(f, "invalid RIP metric {}", metric)
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<Error> for ripd_northbound::error::Error {
    fn from(error: Error) -> ripd_northbound::error::Error {
        error.log();
        match error {
            // The instance is the parent of every other configuration node.
            Error::InstanceNotFound => {
                ripd_northbound::error::Error::OrderingViolation(
                    error.to_string(),
                )
            }
            _ => ripd_northbound::error::Error::DomainConflict(
                error.to_string(),
            ),
        }
    }
}

// ===== impl MetricError =====

impl std::fmt::Display for MetricError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricError::InvalidValue => {
                write!(f, "invalid RIP metric")
            }
        }
    }
}

impl std::error::Error for MetricError {}
