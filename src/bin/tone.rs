//! Streams a pure sine tone to a listener, paced at the real sample rate

use anyhow::{bail, Context};
use clap::Parser;
use ssvep_slurper::{args::convert_filter, decode::encode_samples, synth::sine_samples};
use std::{
    net::{SocketAddr, UdpSocket},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::{Duration, Instant},
};
use tracing::{debug, info, warn};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Listener to send datagrams to
    #[clap(short, long, default_value = "127.0.0.1:5005")]
    target: SocketAddr,
    /// Tone frequency (Hz)
    #[clap(short, long, default_value_t = 10.0)]
    frequency: f32,
    /// Sample rate (Hz)
    #[clap(short = 'r', long, default_value_t = 250.0)]
    sample_rate: f32,
    /// Samples per datagram
    #[clap(short, long, default_value_t = 25)]
    #[clap(value_parser = clap::value_parser!(u64).range(1..))]
    stride: u64,
    /// Stop after this many seconds instead of running until interrupted
    #[clap(short, long)]
    duration: Option<f32>,
    #[clap(flatten)]
    verbose: clap_verbosity_flag::Verbosity,
}

/// Time between datagrams of `stride` samples at `sample_rate`
fn pace_interval(stride: usize, sample_rate: f32) -> anyhow::Result<Duration> {
    if !sample_rate.is_finite() || sample_rate <= 0.0 {
        bail!("sample rate must be positive, got {}", sample_rate);
    }
    Ok(Duration::from_secs_f64(stride as f64 / sample_rate as f64))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(convert_filter(args.verbose.log_level_filter()))
        .init();

    let bind_addr: SocketAddr = match args.target {
        SocketAddr::V4(_) => "0.0.0.0:0".parse()?,
        SocketAddr::V6(_) => "[::]:0".parse()?,
    };
    let socket = UdpSocket::bind(bind_addr).context("Binding send socket")?;

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = running.clone();
        ctrlc::set_handler(move || running.store(false, Ordering::Relaxed))
            .context("Installing interrupt handler")?;
    }

    let stride = args.stride as usize;
    let interval = pace_interval(stride, args.sample_rate)?;
    let limit = args
        .duration
        .map(|secs| (secs * args.sample_rate).round() as u64);
    info!(
        "Sending {} Hz to {} ({} samples every {:?})",
        args.frequency, args.target, stride, interval
    );

    let mut offset = 0u64;
    let mut deadline = Instant::now();
    while running.load(Ordering::Relaxed) && limit.map_or(true, |l| offset < l) {
        let n = limit.map_or(stride, |l| stride.min((l - offset) as usize));
        let samples = sine_samples(args.frequency, args.sample_rate, offset, n);
        if let Err(e) = socket.send_to(&encode_samples(&samples), args.target) {
            warn!("Send failed - {}", e);
        }
        offset += n as u64;
        debug!(sent = offset, "Datagram out");
        deadline += interval;
        if let Some(wait) = deadline.checked_duration_since(Instant::now()) {
            thread::sleep(wait);
        }
    }
    info!("Sent {} samples", offset);
    Ok(())
}
