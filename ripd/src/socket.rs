//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::SocketAddr;

use derive_new::new;
use socket2::{Domain, Protocol, Socket, Type};

// Source of the UDP sockets used by RIP instances.
pub trait SocketFactory: std::fmt::Debug + Send {
    fn open(&self) -> Result<Socket, std::io::Error>;
}

// Opens non-blocking UDP sockets bound to a fixed address.
#[derive(Debug, new)]
pub struct UdpSocketFactory {
    addr: SocketAddr,
}

// ===== impl UdpSocketFactory =====

impl SocketFactory for UdpSocketFactory {
    fn open(&self) -> Result<Socket, std::io::Error> {
        let domain = Domain::for_address(self.addr);
        let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
        socket.set_nonblocking(true)?;
        socket.set_reuse_address(true)?;
        socket.bind(&self.addr.into())?;
        Ok(socket)
    }
}
