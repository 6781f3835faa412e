//! Constants used across the PRIME PHY engine.
//!
//! This module defines the buffer geometry of the ATPL230, the MAC header split used by
//! Type A frames, transmit timing limits and the fixed lookup tables (attenuation steps,
//! channel carriers, emitter timing) that the engine writes into the modem.
//!
//! ## Key Concepts
//!
//! - **Slots**: four TX and four RX buffers of [`PHY_MAX_PPDU_SIZE`] bytes each.
//! - **DMA offset**: payload bytes always start [`PHY_DMA_OFFSET`] bytes into a slot; the
//!   bytes before it hold the physical header.
//! - **Time**: every modem timer counts in units of 10 µs.

/// Maximum size (in bytes) of one physical frame buffer.
pub const PHY_MAX_PPDU_SIZE: usize = 512;

/// Number of independent transmit buffers.
pub const PHY_NUM_TX_BUFFERS: usize = 4;

/// Number of independent receive buffers.
pub const PHY_NUM_RX_BUFFERS: usize = 4;

/// Number of PRIME channels (numbered `1..=8`).
pub const PHY_NUM_CHANNELS: usize = 8;

/// Size of the generic MAC header.
pub const MAC_GEN_HEADER_SIZE: usize = 9;

/// Number of MAC header bytes that travel inside a Type A physical header.
///
/// This is also the minimum length of a transmit payload.
pub const MAC_HEADER_SIZE: usize = 7;

/// Offset of the payload area inside a frame buffer.
pub const PHY_DMA_OFFSET: usize = 16;

/// Largest payload accepted by `submit`.
pub const PHY_MAX_TX_PAYLOAD: usize = PHY_MAX_PPDU_SIZE - PHY_DMA_OFFSET;

/// Smallest decoded length accepted on receive (the 2 MAC header bytes a Type A
/// physical header cannot carry).
pub const PHY_MIN_RX_LEN: usize = MAC_GEN_HEADER_SIZE - MAC_HEADER_SIZE;

/// Number of noise samples captured per requested symbol.
pub const NOISE_BYTES_PER_SYMBOL: usize = 97;

/// Largest noise capture (8 symbols).
pub const PHY_MAX_NOISE_SIZE: usize = 8 * NOISE_BYTES_PER_SYMBOL;

/// Capacity of a received payload buffer (frames and noise captures).
pub const RX_PAYLOAD_CAPACITY: usize = PHY_MAX_NOISE_SIZE;

/// Start of the transmit buffers in modem memory.
pub const PHY_TX_INIT_ADDRESS: u16 = 0x0000;

/// Start of the receive buffers in modem memory.
pub const PHY_RX_INIT_ADDRESS: u16 = PHY_TX_INIT_ADDRESS + (PHY_MAX_PPDU_SIZE * PHY_NUM_TX_BUFFERS) as u16;

/// Where the modem stores noise captures.
pub const PHY_NOISE_INIT_ADDRESS: u16 = 0x0000;

/// Minimum relative transmit delay (10 µs units).
pub const PHY_TX_MIN_DELAY: u32 = 10;

/// Offset subtracted from the timer reference when forcing an immediate emission.
pub const PHY_TX_FORCED_OFFSET: u32 = 10;

/// Default per-slot transmit timeout written at reset (750 ms in 10 µs units).
pub const PHY_TX_TIMEOUT_IMMEDIATE_10US: u32 = 750 * 100;

/// Scale from symbol time to the timeout register unit.
pub const TX_TIMEOUT_TICK_SCALE: u32 = 100;

/// Timeout weight of one payload symbol.
pub const TX_TIMEOUT_PER_SYMBOL: u32 = 3;

/// Largest attenuation level, in dB.
pub const MAX_ATTENUATION_LEVEL: u8 = 21;

/// Global amplitude for each attenuation level in dB (`0..=21`).
pub const ATTENUATION_TABLE: [u8; MAX_ATTENUATION_LEVEL as usize + 1] = [
    0xFF, 0xE3, 0xCA, 0xB4, 0xA0, 0x8F, 0x7F, 0x71, 0x65, 0x5A, 0x50, 0x47, 0x40, 0x39, 0x32,
    0x2D, 0x28, 0x24, 0x20, 0x1C, 0x19, 0x16,
];

/// CORDIC phase step of the carrier for channels 1 to 8.
pub const CHANNEL_TX_ID: [u32; PHY_NUM_CHANNELS] = [
    0x0001_50C7, 0x0002_6A44, 0x0003_83C1, 0x0004_9D3D, 0x0005_B6BA, 0x0006_D036, 0x0007_E9B3,
    0x0009_0330,
];

/// Emitter frequency mode index.
pub const EMIT_FREQ_EF10: u8 = 0;
/// Emitter frequency mode index.
pub const EMIT_FREQ_EF40: u8 = 2;

/// Emitter frequency mode per channel.
pub const EMIT_FREQ_TABLE: [u8; PHY_NUM_CHANNELS] = [
    EMIT_FREQ_EF10,
    EMIT_FREQ_EF10,
    EMIT_FREQ_EF40,
    EMIT_FREQ_EF40,
    EMIT_FREQ_EF40,
    EMIT_FREQ_EF40,
    EMIT_FREQ_EF40,
    EMIT_FREQ_EF40,
];

/// Soft stop time, indexed by emitter frequency mode.
pub const SOFT_STOP_TIME: [u16; 3] = [0x0200, 0x0200, 0x0400];
/// Soft time X1, indexed by emitter frequency mode.
pub const SOFT_TIME_X1: [u16; 3] = [0x1010, 0x1010, 0x8080];
/// Soft time X2, indexed by emitter frequency mode.
pub const SOFT_TIME_X2: [u16; 3] = [0x1010, 0x1010, 0x8080];
/// Soft time Y1, indexed by emitter frequency mode.
pub const SOFT_TIME_Y1: [u8; 3] = [0x77, 0x77, 0x77];
/// Soft time Y2, indexed by emitter frequency mode.
pub const SOFT_TIME_Y2: [u8; 3] = [0x77, 0x77, 0x77];

/// Type BC configuration block, also loaded at `0xFF00` during initialisation.
pub const BC_MODE_CONFIG: [u8; 8] = [0x41, 0x1A, 0x7A, 0x2B, 0xCB, 0xCF, 0xAB, 0xAA];

/// Placeholder the modem replaces with the header CRC.
pub const HEADER_CRC_PLACEHOLDER: u8 = 0xAA;

/// Value written to the chip configuration key register after initialisation.
pub const VALID_CFG_KEY: u8 = 0xBA;

/// Product identifier reported by the information parameters.
pub const PRODUCT_ID: [u8; 10] = *b"ATPL230PHY";

/// Version number reported by the information parameters.
pub const VERSION_NUM: u32 = 0x0001_0000;

/// Model number reported by the information parameters.
pub const MODEL_NUM: u16 = 230;
