//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::borrow::Cow;

use ripd_northbound::yang::{ToYang, TryFromYang};

use crate::northbound::configuration::VersionReceive;
use crate::offset_list::Direction;
use crate::redistribute::Protocol;
use crate::route::RouteType;

// ===== schema paths =====

pub mod ripd {
    pub mod instance {
        pub const PATH: &str = "/frr-ripd:ripd/instance";

        pub mod allow_ecmp {
            pub const PATH: &str = "/frr-ripd:ripd/instance/allow-ecmp";
            pub const DFLT: bool = false;
        }
        pub mod default_information_originate {
            pub const PATH: &str =
                "/frr-ripd:ripd/instance/default-information-originate";
            pub const DFLT: bool = false;
        }
        pub mod default_metric {
            pub const PATH: &str = "/frr-ripd:ripd/instance/default-metric";
            pub const DFLT: u8 = 1;
        }
        pub mod distance {
            pub mod default {
                pub const PATH: &str =
                    "/frr-ripd:ripd/instance/distance/default";
                pub const DFLT: u8 = 0;
            }
            pub mod source {
                pub const PATH: &str =
                    "/frr-ripd:ripd/instance/distance/source";

                pub mod distance {
                    pub const PATH: &str =
                        "/frr-ripd:ripd/instance/distance/source/distance";
                }
                pub mod access_list {
                    pub const PATH: &str =
                        "/frr-ripd:ripd/instance/distance/source/access-list";
                }
            }
        }
        pub mod explicit_neighbor {
            pub const PATH: &str = "/frr-ripd:ripd/instance/explicit-neighbor";
        }
        pub mod network {
            pub const PATH: &str = "/frr-ripd:ripd/instance/network";
        }
        pub mod interface {
            pub const PATH: &str = "/frr-ripd:ripd/instance/interface";
        }
        pub mod offset_list {
            pub const PATH: &str = "/frr-ripd:ripd/instance/offset-list";

            pub mod access_list {
                pub const PATH: &str =
                    "/frr-ripd:ripd/instance/offset-list/access-list";
            }
            pub mod metric {
                pub const PATH: &str =
                    "/frr-ripd:ripd/instance/offset-list/metric";
            }
        }
        pub mod passive_default {
            pub const PATH: &str = "/frr-ripd:ripd/instance/passive-default";
            pub const DFLT: bool = false;
        }
        pub mod passive_interface {
            pub const PATH: &str = "/frr-ripd:ripd/instance/passive-interface";
        }
        pub mod non_passive_interface {
            pub const PATH: &str =
                "/frr-ripd:ripd/instance/non-passive-interface";
        }
        pub mod redistribute {
            pub const PATH: &str = "/frr-ripd:ripd/instance/redistribute";

            pub mod route_map {
                pub const PATH: &str =
                    "/frr-ripd:ripd/instance/redistribute/route-map";
            }
            pub mod metric {
                pub const PATH: &str =
                    "/frr-ripd:ripd/instance/redistribute/metric";
            }
        }
        pub mod static_route {
            pub const PATH: &str = "/frr-ripd:ripd/instance/static-route";
        }
        pub mod timers {
            pub const PATH: &str = "/frr-ripd:ripd/instance/timers";

            pub mod flush_interval {
                pub const PATH: &str =
                    "/frr-ripd:ripd/instance/timers/flush-interval";
                pub const DFLT: u32 = 240;
            }
            pub mod holddown_interval {
                pub const PATH: &str =
                    "/frr-ripd:ripd/instance/timers/holddown-interval";
                pub const DFLT: u32 = 180;
            }
            pub mod update_interval {
                pub const PATH: &str =
                    "/frr-ripd:ripd/instance/timers/update-interval";
                pub const DFLT: u32 = 30;
            }
        }
        pub mod version {
            pub mod receive {
                pub const PATH: &str =
                    "/frr-ripd:ripd/instance/version/receive";
                pub const DFLT: &str = "1-2";
            }
            pub mod send {
                pub const PATH: &str = "/frr-ripd:ripd/instance/version/send";
                pub const DFLT: u8 = 2;
            }
        }
    }

    pub mod state {
        pub mod neighbors {
            pub mod neighbor {
                pub const PATH: &str =
                    "/frr-ripd:ripd/state/neighbors/neighbor";

                pub mod address {
                    pub const PATH: &str =
                        "/frr-ripd:ripd/state/neighbors/neighbor/address";
                }
                pub mod last_update {
                    pub const PATH: &str =
                        "/frr-ripd:ripd/state/neighbors/neighbor/last-update";
                }
                pub mod bad_packets_rcvd {
                    pub const PATH: &str = "/frr-ripd:ripd/state/neighbors/neighbor/bad-packets-rcvd";
                }
                pub mod bad_routes_rcvd {
                    pub const PATH: &str = "/frr-ripd:ripd/state/neighbors/neighbor/bad-routes-rcvd";
                }
            }
        }
        pub mod routes {
            pub mod route {
                pub const PATH: &str = "/frr-ripd:ripd/state/routes/route";

                pub mod prefix {
                    pub const PATH: &str =
                        "/frr-ripd:ripd/state/routes/route/prefix";
                }
                pub mod next_hop {
                    pub const PATH: &str =
                        "/frr-ripd:ripd/state/routes/route/next-hop";
                }
                pub mod interface {
                    pub const PATH: &str =
                        "/frr-ripd:ripd/state/routes/route/interface";
                }
                pub mod metric {
                    pub const PATH: &str =
                        "/frr-ripd:ripd/state/routes/route/metric";
                }
                pub mod route_type {
                    pub const PATH: &str =
                        "/frr-ripd:ripd/state/routes/route/route-type";
                }
            }
        }
    }
}

pub mod clear_rip_route {
    pub const PATH: &str = "/frr-ripd:clear-rip-route";
}

pub mod interface_rip {
    pub mod split_horizon {
        pub const PATH: &str =
            "/frr-interface:lib/interface/frr-ripd:rip/split-horizon";
    }
    pub mod v2_broadcast {
        pub const PATH: &str =
            "/frr-interface:lib/interface/frr-ripd:rip/v2-broadcast";
    }
    pub mod version_receive {
        pub const PATH: &str =
            "/frr-interface:lib/interface/frr-ripd:rip/version-receive";
    }
    pub mod version_send {
        pub const PATH: &str =
            "/frr-interface:lib/interface/frr-ripd:rip/version-send";
    }
    pub mod authentication_scheme {
        pub mod mode {
            pub const PATH: &str = "/frr-interface:lib/interface/frr-ripd:rip/authentication-scheme/mode";
        }
        pub mod md5_auth_length {
            pub const PATH: &str = "/frr-interface:lib/interface/frr-ripd:rip/authentication-scheme/md5-auth-length";
        }
    }
    pub mod authentication_password {
        pub const PATH: &str =
            "/frr-interface:lib/interface/frr-ripd:rip/authentication-password";
    }
    pub mod authentication_key_chain {
        pub const PATH: &str = "/frr-interface:lib/interface/frr-ripd:rip/authentication-key-chain";
    }
}

// ===== ToYang implementations =====

impl ToYang for Direction {
    fn to_yang(&self) -> Cow<'static, str> {
        match self {
            Direction::In => "in".into(),
            Direction::Out => "out".into(),
        }
    }
}

impl ToYang for Protocol {
    fn to_yang(&self) -> Cow<'static, str> {
        match self {
            Protocol::Babel => "babel".into(),
            Protocol::Bgp => "bgp".into(),
            Protocol::Connected => "connected".into(),
            Protocol::Eigrp => "eigrp".into(),
            Protocol::Isis => "isis".into(),
            Protocol::Kernel => "kernel".into(),
            Protocol::Nhrp => "nhrp".into(),
            Protocol::Openfabric => "openfabric".into(),
            Protocol::Ospf => "ospf".into(),
            Protocol::Sharp => "sharp".into(),
            Protocol::Static => "static".into(),
            Protocol::Table => "table".into(),
            Protocol::Vnc => "vnc".into(),
        }
    }
}

impl ToYang for RouteType {
    fn to_yang(&self) -> Cow<'static, str> {
        match self {
            RouteType::Rip => "rip".into(),
            RouteType::Static => "static".into(),
            RouteType::Default => "default".into(),
            RouteType::Redistribute(protocol) => protocol.to_yang(),
        }
    }
}

// ===== TryFromYang implementations =====

impl TryFromYang for Direction {
    fn try_from_yang(value: &str) -> Option<Direction> {
        match value {
            "in" => Some(Direction::In),
            "out" => Some(Direction::Out),
            _ => None,
        }
    }
}

impl TryFromYang for Protocol {
    fn try_from_yang(value: &str) -> Option<Protocol> {
        match value {
            "babel" => Some(Protocol::Babel),
            "bgp" => Some(Protocol::Bgp),
            "connected" => Some(Protocol::Connected),
            "eigrp" => Some(Protocol::Eigrp),
            "isis" => Some(Protocol::Isis),
            "kernel" => Some(Protocol::Kernel),
            "nhrp" => Some(Protocol::Nhrp),
            "openfabric" => Some(Protocol::Openfabric),
            "ospf" => Some(Protocol::Ospf),
            "sharp" => Some(Protocol::Sharp),
            "static" => Some(Protocol::Static),
            "table" => Some(Protocol::Table),
            "vnc" => Some(Protocol::Vnc),
            _ => None,
        }
    }
}

impl TryFromYang for VersionReceive {
    fn try_from_yang(value: &str) -> Option<VersionReceive> {
        match value {
            "1" => Some(VersionReceive::V1),
            "2" => Some(VersionReceive::V2),
            "1-2" => Some(VersionReceive::Both),
            _ => None,
        }
    }
}
