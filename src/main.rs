use anyhow::{anyhow, Context};
use clap::Parser;
use crossbeam_channel::bounded;
use ssvep_slurper::{
    args::{convert_filter, Args},
    capture,
    report::{report_consumer, Forwarder},
    Pipeline,
};
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
};
use tracing::info;

// Reports queued for the reporter before the capture thread starts dropping them
const REPORT_QUEUE: usize = 64;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(convert_filter(args.verbose.log_level_filter()))
        .init();

    let config = args.pipeline_config().validate()?;
    info!(
        window = config.window_len(),
        sample_rate = config.sample_rate,
        mode = ?config.mode,
        "Band {}-{} Hz, top {} peaks",
        config.low_cutoff,
        config.high_cutoff,
        config.top_k
    );

    // Startup failures are fatal, everything after this point is per-datagram
    let socket = capture::bind((args.host.as_str(), args.port))
        .with_context(|| format!("Binding to {}:{}", args.host, args.port))?;
    let forwarder = args
        .forward
        .map(Forwarder::new)
        .transpose()
        .context("Opening forwarding socket")?;

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = shutdown.clone();
        ctrlc::set_handler(move || shutdown.store(true, Ordering::Relaxed))
            .context("Installing interrupt handler")?;
    }

    // Setup the reporting thread
    let (sender, receiver) = bounded(REPORT_QUEUE);
    let reporter = thread::spawn(move || report_consumer(receiver, forwarder));

    info!("Listening for data on {}:{}...", args.host, args.port);
    let mut pipeline = Pipeline::new(config);
    let stats = capture::listen(
        &socket,
        &mut pipeline,
        &sender,
        &shutdown,
        args.recv_buffer as usize,
    );

    // Close the socket and let the reporter drain
    drop(socket);
    drop(sender);
    reporter
        .join()
        .map_err(|_| anyhow!("Reporter thread panicked"))?;

    info!(
        datagrams = stats.datagrams,
        cycles = stats.cycles,
        skipped = stats.skipped,
        recv_errors = stats.recv_errors,
        dropped_reports = stats.dropped_reports,
        "Terminated by user"
    );
    Ok(())
}
