/// Errors raised by configuration and by the caller layer above the register
/// protocol.
///
/// The register protocol itself never fails: unmapped reads yield zero and
/// unmapped writes are acknowledged and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BridgeError {
    /// A transaction was started while the master still had one pending.
    #[error("a bus transaction is already pending")]
    Busy,
    /// The tick budget ran out before the transaction completed.
    #[error("bus transaction did not complete within {ticks} ticks")]
    Timeout { ticks: u32 },
    /// The builder rejected the configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}
