//! # Bit-Edge Source Module
//!
//! Reads timestamped bit edges from the capture hardware.
//!
//! The electrical layer (an MCU watching the ZG01 clock line) reports one
//! record per falling clock edge over USB serial, newline-delimited:
//!
//! ```text
//! <timestamp_ms> <level>
//! ```
//!
//! This module handles:
//! - Opening the capture serial port (8N1, configurable baud rate)
//! - Auto-detecting the device across common paths
//! - Parsing edge records into [`BitEdge`] values
//! - Skipping malformed lines without ending the stream

use crate::config::SerialConfig;
use crate::error::{Result, Zg01Error};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio_serial::{SerialPortBuilderExt, SerialStream};
use tracing::{debug, info, warn};

/// Default capture device paths to try (in order of preference)
const DEFAULT_DEVICE_PATHS: &[&str] = &[
    "/dev/ttyACM0", // USB CDC devices (most common for capture MCUs)
    "/dev/ttyUSB0", // USB-to-serial adapters
];

/// One timestamped bit edge reported by the capture hardware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitEdge {
    /// Arrival time of the bit in milliseconds (wrapping tick counter)
    pub timestamp_ms: u32,

    /// Sampled data-line level. The assembler treats any nonzero value as a
    /// 1 bit.
    pub level: u8,
}

/// Parse one `<timestamp_ms> <level>` record
///
/// Returns `None` for anything that is not exactly two integer fields.
fn parse_edge_line(line: &str) -> Option<BitEdge> {
    let mut fields = line.split_whitespace();
    let timestamp_ms = fields.next()?.parse().ok()?;
    let level = fields.next()?.parse().ok()?;
    if fields.next().is_some() {
        return None;
    }
    Some(BitEdge { timestamp_ms, level })
}

/// Bit-Edge Source
///
/// Pulls [`BitEdge`] records off any buffered async reader, one line at a
/// time. Production use wraps the capture serial port; tests substitute mock
/// I/O.
pub struct EdgeSource<R> {
    /// Underlying line reader
    reader: R,

    /// Reused line buffer
    line: String,

    /// Human-readable origin (device path or mock label), for logging
    name: String,
}

impl<R> std::fmt::Debug for EdgeSource<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EdgeSource")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl<R: AsyncBufRead + Unpin> EdgeSource<R> {
    /// Create an edge source over a buffered reader
    ///
    /// # Arguments
    ///
    /// * `reader` - Line-oriented reader producing edge records
    /// * `name` - Origin label used in log messages
    pub fn new(reader: R, name: impl Into<String>) -> Self {
        Self {
            reader,
            line: String::new(),
            name: name.into(),
        }
    }

    /// Origin of this source (device path or mock label)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read the next bit edge
    ///
    /// Malformed and blank lines are skipped (malformed ones with a warning)
    /// rather than ending the stream.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(edge))` - The next well-formed edge record
    /// * `Ok(None)` - The stream reached end-of-file
    ///
    /// # Errors
    ///
    /// Returns error on underlying I/O failure, including lines that are not
    /// valid UTF-8.
    pub async fn next_edge(&mut self) -> Result<Option<BitEdge>> {
        loop {
            self.line.clear();
            let bytes_read = self.reader.read_line(&mut self.line).await?;
            if bytes_read == 0 {
                return Ok(None);
            }

            let record = self.line.trim();
            if record.is_empty() {
                continue;
            }

            match parse_edge_line(record) {
                Some(edge) => return Ok(Some(edge)),
                None => warn!("Skipping malformed edge record: {:?}", record),
            }
        }
    }
}

impl EdgeSource<BufReader<SerialStream>> {
    /// Open the capture device described by the configuration
    ///
    /// An empty `port` auto-detects the device by trying common paths.
    ///
    /// # Errors
    ///
    /// Returns error if no capture device can be opened
    pub fn open(config: &SerialConfig) -> Result<Self> {
        if config.port.is_empty() {
            Self::open_with_paths(DEFAULT_DEVICE_PATHS, config.baud_rate)
        } else {
            Self::open_with_paths(&[config.port.as_str()], config.baud_rate)
        }
    }

    /// Open the capture device trying the given paths in order
    ///
    /// # Arguments
    ///
    /// * `paths` - Device paths to try (e.g., &["/dev/ttyACM0"])
    /// * `baud_rate` - Serial baud rate of the capture MCU
    pub fn open_with_paths(paths: &[&str], baud_rate: u32) -> Result<Self> {
        for path in paths {
            debug!("Trying to open capture device: {}", path);

            match Self::open_port(path, baud_rate) {
                Ok(port) => {
                    info!("Successfully opened capture device at {}", path);
                    return Ok(Self::new(BufReader::new(port), *path));
                }
                Err(e) => {
                    warn!("Failed to open {}: {}", path, e);
                    continue;
                }
            }
        }

        Err(Zg01Error::SerialPortNotFound(paths.join(", ")))
    }

    /// Open a specific serial port with capture settings (8N1)
    fn open_port(path: &str, baud_rate: u32) -> Result<SerialStream> {
        let port = tokio_serial::new(path, baud_rate)
            .data_bits(tokio_serial::DataBits::Eight)
            .parity(tokio_serial::Parity::None)
            .stop_bits(tokio_serial::StopBits::One)
            .flow_control(tokio_serial::FlowControl::None)
            .open_native_async()
            .map_err(|e| Zg01Error::Serial(format!("Failed to open {}: {}", path, e)))?;

        Ok(port)
    }
}
