//! Error definitions shared across the engine.
//! Each type models one failure scenario: request validation, frame decoding, CRC
//! width selection, configuration access and register bus faults.
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
/// Transmit request rejected before anything is written to the modem.
pub enum TxError {
    /// Buffer id outside `0..4`.
    #[error("invalid transmit buffer")]
    InvalidBuffer,
    /// Payload shorter than the MAC header or larger than a slot can hold.
    #[error("invalid payload length")]
    InvalidLength,
    /// Scheme code unknown, or robust scheme requested for a Type A frame.
    #[error("invalid modulation scheme for this frame mode")]
    InvalidScheme,
    /// Frame mode that cannot be transmitted.
    #[error("invalid frame mode")]
    InvalidMode,
}

#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
/// Received frame that cannot be turned into a message.
pub enum RxError {
    /// Decoded length outside `[2, 512]`.
    #[error("decoded length out of range")]
    InvalidLength,
    /// Frame mode bits do not name a receivable mode.
    #[error("invalid frame mode")]
    InvalidMode,
    /// Type A MAC header carries an unknown header type.
    #[error("invalid header type")]
    InvalidHeaderType,
}

#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
/// CRC computation failure.
pub enum CrcError {
    /// Width code not one of 8, 16, 24 or 32 bits.
    #[error("invalid CRC width")]
    InvalidCrcWidth,
}

#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
/// Configuration parameter access failure.
///
/// The discriminants are the numeric results reported to host tooling.
pub enum ConfigError {
    /// Unknown identifier, wrong value width, or unsupported command.
    #[error("invalid configuration input")]
    InvalidInput = 1,
    /// Parameter can only be read.
    #[error("parameter is read only")]
    ReadOnly = 2,
    /// Channel outside `1..=8`.
    #[error("invalid channel")]
    InvalidChannel = 3,
}

#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
/// Any failure the engine can report.
pub enum PhyError {
    /// The register bus failed underneath the engine.
    #[error("register bus error: {0:?}")]
    Bus(embedded_hal::spi::ErrorKind),

    /// Transmit request rejected.
    #[error(transparent)]
    Tx(#[from] TxError),

    /// Received frame dropped.
    #[error(transparent)]
    Rx(#[from] RxError),

    /// CRC width rejected.
    #[error(transparent)]
    Crc(#[from] CrcError),

    /// Configuration access rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
