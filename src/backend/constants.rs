/// How often the capture thread checks whether it should keep the stream alive.
pub const CLOCK_DELAY: u32 = 400;

/// How long the encoder worker waits for samples before checking the capture
/// stream is still alive.
pub const WORKER_POLL_DELAY: u32 = 100;

/// Bytes per encoded sample (signed 16-bit PCM).
pub const BYTES_PER_SAMPLE: usize = 2;
