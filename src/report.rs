//! Consumes analysis reports off the capture thread: logs them, and
//! optionally forwards the scaled spectrum to another host as one datagram.

use std::{
    io,
    net::{Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket},
};

use crossbeam_channel::Receiver;
use tracing::{debug, info, warn};

use crate::pipeline::Report;

/// How many bins to show in the debug dump of each spectrum
const PREVIEW_BINS: usize = 10;

/// Sends each cycle's 0-255 magnitudes to a fixed destination
pub struct Forwarder {
    socket: UdpSocket,
    target: SocketAddr,
}

impl Forwarder {
    pub fn new(target: SocketAddr) -> io::Result<Self> {
        let socket = match target {
            SocketAddr::V4(_) => UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))?,
            SocketAddr::V6(_) => UdpSocket::bind((Ipv6Addr::UNSPECIFIED, 0))?,
        };
        Ok(Self { socket, target })
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }

    pub fn send(&self, scaled: &[u8]) -> io::Result<usize> {
        self.socket.send_to(scaled, self.target)
    }
}

pub fn log_report(report: &Report) {
    let preview = PREVIEW_BINS.min(report.spectrum.len());
    debug!(
        cycle = report.cycle,
        "Magnitudes before scaling: {:?}",
        &report.spectrum.magnitudes()[..preview]
    );
    debug!(
        cycle = report.cycle,
        "Scaled magnitudes (0-255): {:?}",
        &report.scaled[..preview]
    );
    if report.peaks.is_empty() {
        info!(cycle = report.cycle, "No peaks detected in band");
        return;
    }
    for (i, peak) in report.peaks.iter().enumerate() {
        info!(
            cycle = report.cycle,
            "Peak {}: {:.2} Hz with magnitude {:.2}",
            i + 1,
            peak.frequency,
            peak.magnitude
        );
    }
    if let Some(mean) = report.moving_average {
        info!(cycle = report.cycle, "Mean dominant frequency: {:.2} Hz", mean);
    }
}

/// Runs until every sender is dropped
pub fn report_consumer(receiver: Receiver<Report>, forwarder: Option<Forwarder>) {
    for report in receiver {
        log_report(&report);
        if let Some(fwd) = &forwarder {
            if let Err(e) = fwd.send(&report.scaled) {
                warn!("Forwarding to {} failed - {}", fwd.target(), e);
            }
        }
    }
    debug!("Report channel closed");
}
