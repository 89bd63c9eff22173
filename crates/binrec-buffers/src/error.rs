use thiserror::Error;

/// Failure of a read or seek against the underlying byte source.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The source ran out of bytes before the requested width was filled.
    #[error("short read: wanted {wanted} byte(s)")]
    ShortRead { wanted: usize },

    /// The source rejected a relative seek.
    #[error("seek rejected by source: {0}")]
    Seek(#[source] std::io::Error),

    /// A non-EOF I/O failure while reading.
    #[error("read failed: {0}")]
    Io(#[source] std::io::Error),
}
