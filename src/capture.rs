//! This module contains all the capture logic

// Receive, decode, push and analyze all happen on the one thread that owns
// the socket. There is no queue in front of the analysis, so a slow cycle
// just delays the next receive and the kernel buffers or drops datagrams in
// the meantime. That's fine, UDP never promised us anything.

use std::{
    io,
    net::{ToSocketAddrs, UdpSocket},
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};

use crossbeam_channel::{Sender, TrySendError};
use tracing::{debug, warn};

use crate::pipeline::{Pipeline, Report};

/// How often a blocked receive wakes up to check for shutdown
pub const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Running totals for one listen session
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CaptureStats {
    pub datagrams: u64,
    pub cycles: u64,
    /// Datagrams the pipeline refused (reshape mismatch, out of range samples)
    pub skipped: u64,
    pub recv_errors: u64,
    /// Reports lost because the reporter fell behind
    pub dropped_reports: u64,
}

/// Bind the ingest socket. Failing here is fatal, unlike anything in [`listen`].
pub fn bind<A: ToSocketAddrs>(addr: A) -> io::Result<UdpSocket> {
    let socket = UdpSocket::bind(addr)?;
    socket.set_read_timeout(Some(POLL_INTERVAL))?;
    Ok(socket)
}

/// Receive until `shutdown` is set. Per-datagram failures are logged and counted, never returned.
pub fn listen(
    socket: &UdpSocket,
    pipeline: &mut Pipeline,
    reports: &Sender<Report>,
    shutdown: &AtomicBool,
    recv_buffer: usize,
) -> CaptureStats {
    let mut buf = vec![0u8; recv_buffer];
    let mut stats = CaptureStats::default();
    while !shutdown.load(Ordering::Relaxed) {
        let n = match socket.recv_from(&mut buf) {
            Ok((n, _)) => n,
            Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => {
                continue
            }
            Err(e) => {
                // Keep truckin, one bad receive doesn't end the stream
                warn!("Receive failed - {}", e);
                stats.recv_errors += 1;
                continue;
            }
        };
        stats.datagrams += 1;
        match pipeline.ingest(&buf[..n]) {
            Ok(Some(report)) => {
                stats.cycles += 1;
                // We don't care if this errors beyond counting it
                match reports.try_send(report) {
                    Ok(()) => (),
                    Err(TrySendError::Full(_)) => {
                        stats.dropped_reports += 1;
                        debug!("Reporter is behind, dropping report");
                    }
                    Err(TrySendError::Disconnected(_)) => {
                        stats.dropped_reports += 1;
                    }
                }
            }
            Ok(None) => (),
            Err(e) => {
                stats.skipped += 1;
                warn!("Skipping datagram - {}", e);
            }
        }
    }
    stats
}
