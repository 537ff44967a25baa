//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

pub mod debug;
pub mod distance;
pub mod error;
pub mod instance;
pub mod neighbor;
pub mod northbound;
pub mod offset_list;
pub mod redistribute;
pub mod route;
pub mod socket;

use crate::error::Error;
use crate::instance::Instance;
use crate::socket::SocketFactory;

// Runtime model of the RIP daemon.
//
// Owns the (single) RIP instance, which only exists while the instance is
// present in the configuration.
#[derive(Debug)]
pub struct Master {
    // Socket allocator used when creating the RIP instance.
    pub sockets: Box<dyn SocketFactory>,
    // RIP instance.
    pub instance: Option<Instance>,
}

// ===== impl Master =====

impl Master {
    pub fn new(sockets: Box<dyn SocketFactory>) -> Master {
        Master {
            sockets,
            instance: None,
        }
    }

    pub fn instance(&self) -> Option<&Instance> {
        self.instance.as_ref()
    }

    pub(crate) fn instance_mut(&mut self) -> Result<&mut Instance, Error> {
        self.instance.as_mut().ok_or(Error::InstanceNotFound)
    }
}
