//! # atpl230-phy
//!
//! A portable, no_std Rust implementation of the PRIME physical layer frame engine for the
//! Atmel ATPL230 power-line modem.
//!
//! The modem does the OFDM work in silicon. This crate drives it over its register interface:
//! - builds Type A (PRIME 1.3), Type B and Type BC (PRIME 1.4) physical frames
//! - schedules them into the four hardware transmit slots (immediate, relative or absolute time)
//! - adapts transmit impedance and attenuation from the RMS level measured after each emission
//! - turns the modem's interrupt flags into TX confirmations and RX indications
//! - computes the PRIME CRC8/16/24/32 with the network-address (SNA) seed
//!
//! ## Crate features
//! | Feature         | Description |
//! |-----------------|-------------|
//! | `std`           | Disables `#![no_std]` support and replaces `heapless::Vec`s with
//! `std::vec::Vec`s |
//! | `isr` (default) | Global engine helpers and macros built on `critical_section::with` |
//! | `spi`           | [`bus::SpiPhyBus`], a register bus over an `embedded-hal` `SpiDevice` |
//! | `defmt-0-3`     | Uses `defmt` logging |
//! | `log`           | Uses `log` logging |
//!
//! ## Usage
//!
//! ```rust,ignore
//! use atpl230_phy::{config::PhyConfig, phy::Phy, scheduler::{Schedule, TxRequest}};
//! use atpl230_phy::codec::{FrameMode, Scheme};
//!
//! let mut phy = Phy::new(bus, PhyConfig::default());
//! phy.submit(&TxRequest {
//!     buffer_id: 0,
//!     attenuation_level: 0,
//!     scheme: Scheme::Dbpsk,
//!     mode: FrameMode::TypeB,
//!     disable_rx: true,
//!     payload: &frame,
//!     schedule: Schedule::Immediate,
//! })?;
//!
//! // From the modem interrupt line:
//! phy.handle_interrupt();
//!
//! // From the polling loop:
//! if let Some(outcome) = phy.poll_tx_result() { /* ... */ }
//! if let Some(msg) = phy.poll_rx() { /* ... */ }
//! ```
//!
//! ## Integration Notes
//!
//! - `handle_interrupt` only latches flags and caches receive headers; it never fails.
//! - Frame data is copied out by `poll_rx`, and the slot is handed back to the modem afterwards.
//! - Only one engine instance should be active at a time in interrupt-driven mode.

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "isr")]
pub use critical_section;

#[cfg(not(feature = "std"))]
pub use heapless;

#[macro_use]
mod fmt;
#[cfg(feature = "isr")]
mod macros;

pub mod bus;
pub mod codec;
pub mod config;
pub mod consts;
pub mod crc;
pub mod dispatcher;
pub mod error;
pub mod impedance;
#[cfg(feature = "isr")]
pub mod isr;
pub mod phy;
pub mod regs;
pub mod scheduler;
pub mod stats;
