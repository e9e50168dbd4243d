//! # ZG01 Decoder
//!
//! Decode ZG01 CO2 sensor bitstreams into 5-byte frames.
//!
//! This application reads timestamped bit edges from a capture serial port
//! and assembles them into complete 40-bit ZG01 frames.

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber;

use zg01_decoder::config::Config;
use zg01_decoder::error::Zg01Error;
use zg01_decoder::source::EdgeSource;
use zg01_decoder::zg01::assembler::FrameAssembler;
use zg01_decoder::zg01::protocol::FRAME_BYTES;

/// Main entry point for the ZG01 decoder application
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Set up logging with tracing subscriber
///    - Load configuration (optional TOML path as first argument)
///    - Open serial connection to the capture device
///
/// 2. **Decode Loop**
///    - Feed each received bit edge to the frame assembler
///    - Log every completed 5-byte frame as hex
///    - Handle Ctrl+C for graceful shutdown
///
/// 3. **Graceful Shutdown**
///    - Log total frame count
///    - Clean exit
///
/// # Errors
///
/// Returns error if:
/// - The configuration file cannot be loaded
/// - No capture device can be opened
///
/// # Examples
///
/// Run the application:
/// ```bash
/// cargo run --release -- config/default.toml
/// ```
///
/// Expected output:
/// ```text
/// INFO zg01_decoder: ZG01 Decoder v0.1.0 starting...
/// INFO zg01_decoder::source: Successfully opened capture device at /dev/ttyACM0
/// INFO zg01_decoder: Decoding ZG01 frames (gap threshold: 3 ticks)
/// INFO zg01_decoder: Frame #1: [42, 02, 58, AA, 0D]
/// ```
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into())
        )
        .init();

    info!("ZG01 Decoder v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let mut source = EdgeSource::open(&config.serial)?;
    info!("Reading bit edges from: {}", source.name());

    let mut buffer = [0u8; FRAME_BYTES];
    let mut assembler = FrameAssembler::with_max_gap(&mut buffer, config.decoder.max_gap_ticks);

    info!("Decoding ZG01 frames (gap threshold: {} ticks)", config.decoder.max_gap_ticks);
    info!("Press Ctrl+C to exit");

    let mut frame_count: u64 = 0;

    // Main decode loop
    loop {
        tokio::select! {
            edge = source.next_edge() => {
                match edge {
                    Ok(Some(edge)) => {
                        if assembler.process(edge.timestamp_ms, edge.level) {
                            frame_count += 1;
                            info!("Frame #{}: {:02X?}", frame_count, assembler.frame());
                        }
                    }
                    Ok(None) => {
                        info!("Edge stream ended");
                        break;
                    }
                    // Undecodable text on the line is skipped; anything else
                    // means the capture device is gone
                    Err(Zg01Error::Io(e)) if e.kind() == std::io::ErrorKind::InvalidData => {
                        warn!("Skipping undecodable input: {}", e);
                    }
                    Err(e) => {
                        warn!("Edge stream failed: {}", e);
                        break;
                    }
                }
            }

            // Handle Ctrl+C for graceful shutdown
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                break;
            }
        }
    }

    info!("Total frames decoded: {}", frame_count);
    Ok(())
}
