//! Command transmission.
//!
//! Delivery is fire-and-forget: no acknowledgment, no retries. A lost
//! datagram costs one cell, a stalled loop costs the performance.

use crate::command::OrcaCommand;
use crate::error::Result;
use parking_lot::Mutex;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, UdpSocket};
use std::sync::Arc;

/// The grid's default UDP listener.
pub const DEFAULT_DESTINATION: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 49160));

pub trait CommandSink: Send {
    fn send(&mut self, command: &OrcaCommand) -> Result<()>;
}

impl<S: CommandSink + ?Sized> CommandSink for Box<S> {
    fn send(&mut self, command: &OrcaCommand) -> Result<()> {
        (**self).send(command)
    }
}

/// One datagram per command to a fixed destination.
#[derive(Debug)]
pub struct UdpSink {
    socket: UdpSocket,
    destination: SocketAddr,
}

impl UdpSink {
    /// Bind an ephemeral local socket of the destination's address family.
    pub fn connect(destination: SocketAddr) -> Result<Self> {
        let local: SocketAddr = match destination {
            SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
            SocketAddr::V6(_) => (std::net::Ipv6Addr::UNSPECIFIED, 0).into(),
        };
        let socket = UdpSocket::bind(local)?;
        tracing::debug!("Sending commands to {} from {}", destination, socket.local_addr()?);
        Ok(Self {
            socket,
            destination,
        })
    }

    pub fn destination(&self) -> SocketAddr {
        self.destination
    }
}

impl CommandSink for UdpSink {
    fn send(&mut self, command: &OrcaCommand) -> Result<()> {
        self.socket
            .send_to(command.to_string().as_bytes(), self.destination)?;
        Ok(())
    }
}

/// In-memory sink recording rendered commands. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct CommandLog {
    commands: Arc<Mutex<Vec<String>>>,
}

impl CommandLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().clone()
    }

    /// Drain everything recorded so far.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.commands.lock())
    }

    pub fn len(&self) -> usize {
        self.commands.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.lock().is_empty()
    }
}

impl CommandSink for CommandLog {
    fn send(&mut self, command: &OrcaCommand) -> Result<()> {
        self.commands.lock().push(command.to_string());
        Ok(())
    }
}
