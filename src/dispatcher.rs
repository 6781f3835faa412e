//! Interrupt flag bookkeeping.
//!
//! [`Dispatcher::handle_interrupt`] runs from the modem's interrupt line. It reads the TX
//! and RX interrupt registers once, folds them into pending bitmaps and turns them into
//! per-slot events. The only frame data it touches is the 16-byte physical header of a
//! receive slot, cached as soon as the header interrupt fires because the modem reuses
//! that region before the payload area. The polled side ([`crate::phy::Phy`]) picks events
//! up with [`next_tx_event`](Dispatcher::next_tx_event) and
//! [`next_rx_event`](Dispatcher::next_rx_event), copies the slot out and only then hands
//! it back with [`release_rx`](Dispatcher::release_rx).
//!
//! Both event queues are served round robin from the slot after the last one served.

use crate::bus::PhyBus;
use crate::consts::{
    PHY_DMA_OFFSET, PHY_MAX_PPDU_SIZE, PHY_NUM_RX_BUFFERS, PHY_NUM_TX_BUFFERS,
    PHY_RX_INIT_ADDRESS,
};
use crate::regs::{
    PHY_SFR, RX_INT, RX_INT_PAYLOAD, SFR_ERR_PYL, SFR_PHY_INT, TX_INT, TX_INT_NOISE,
    TX_INT_SLOTS, TXCONF_DC, TXCONF_DR, TXCONF_TX0, slot8,
};

/// Address of a receive slot in modem memory.
pub const fn rx_slot_address(slot: u8) -> u16 {
    PHY_RX_INIT_ADDRESS + slot as u16 * PHY_MAX_PPDU_SIZE as u16
}

/// Pending interrupt flags and per-slot events.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Dispatcher {
    reg_rx: u8,
    reg_tx: u8,
    reg_ns: u8,
    headers: [[u8; PHY_DMA_OFFSET]; PHY_NUM_RX_BUFFERS],
    rx_events: [bool; PHY_NUM_RX_BUFFERS],
    tx_events: [bool; PHY_NUM_TX_BUFFERS],
    noise_event: bool,
    last_rx: u8,
    last_tx: u8,
}

impl Dispatcher {
    /// Nothing pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every pending flag and event.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Services one modem interrupt.
    ///
    /// On a payload length error only the payload flags that were not already pending are
    /// cleared, and no event is produced.
    pub fn handle_interrupt<B: PhyBus>(&mut self, bus: &mut B) {
        if bus.read8(PHY_SFR) & SFR_ERR_PYL != 0 {
            let fresh = (bus.read8(RX_INT) & RX_INT_PAYLOAD) ^ (self.reg_rx & RX_INT_PAYLOAD);
            bus.and8(RX_INT, !fresh);
            bus.and8(PHY_SFR, !SFR_ERR_PYL);
            bus.or8(PHY_SFR, SFR_PHY_INT);
            warn!("rx payload length error, flags {} dropped", fresh);
            return;
        }

        let tx = bus.read8(TX_INT);
        let rx = bus.read8(RX_INT);
        bus.or8(PHY_SFR, SFR_PHY_INT);

        self.reg_rx |= rx;
        self.reg_tx |= tx & TX_INT_SLOTS;
        self.reg_ns |= tx & TX_INT_NOISE;

        if self.reg_rx != 0 || self.reg_ns != 0 {
            self.rx_task(bus);
        }
        if self.reg_tx != 0 {
            self.tx_task(bus);
        }
    }

    fn rx_task<B: PhyBus>(&mut self, bus: &mut B) {
        for slot in 0..PHY_NUM_RX_BUFFERS as u8 {
            let idx = usize::from(slot);
            let header = 0x01u8 << slot;
            if self.reg_rx & header != 0 {
                bus.read_buf(rx_slot_address(slot), &mut self.headers[idx]);
                bus.and8(RX_INT, !header);
                self.reg_rx &= !header;
            }
            if self.reg_rx & (0x10u8 << slot) != 0 {
                self.rx_events[idx] = true;
            }
        }

        if self.reg_ns != 0 {
            self.noise_event = true;
            bus.and8(TX_INT, !TX_INT_NOISE);
            self.reg_ns = 0;
        }
    }

    fn tx_task<B: PhyBus>(&mut self, bus: &mut B) {
        for (slot, event) in self.tx_events.iter_mut().enumerate() {
            let bit = 0x01u8 << slot;
            if self.reg_tx & bit == 0 {
                continue;
            }
            *event = true;
            bus.and8(TX_INT, !bit);
            self.reg_tx &= !bit;

            // Reception and carrier detection come back once the slot is done.
            let txconf = slot8(TXCONF_TX0, slot as u8);
            bus.and8(txconf, !TXCONF_DC);
            bus.and8(txconf, !TXCONF_DR);
        }
    }

    /// Takes the event of one transmit slot, if it has one.
    pub fn take_tx_event(&mut self, slot: u8) -> bool {
        self.tx_events
            .get_mut(usize::from(slot))
            .is_some_and(core::mem::take)
    }

    /// Whether `slot` has a transmit result waiting.
    pub fn tx_event_pending(&self, slot: u8) -> bool {
        self.tx_events.get(usize::from(slot)).copied().unwrap_or(false)
    }

    /// Takes the next completed transmit slot.
    pub fn next_tx_event(&mut self) -> Option<u8> {
        let slot = round_robin(&mut self.tx_events, self.last_tx)?;
        self.last_tx = (slot + 1) & 0x03;
        Some(slot)
    }

    /// Takes the next receive slot holding a complete frame.
    pub fn next_rx_event(&mut self) -> Option<u8> {
        let slot = round_robin(&mut self.rx_events, self.last_rx)?;
        self.last_rx = (slot + 1) & 0x03;
        Some(slot)
    }

    /// Takes the noise capture event.
    pub fn take_noise(&mut self) -> bool {
        core::mem::take(&mut self.noise_event)
    }

    /// Whether a transmit result is waiting.
    pub fn has_tx_event(&self) -> bool {
        self.tx_events.contains(&true)
    }

    /// Whether a received frame or noise capture is waiting.
    pub fn has_rx_event(&self) -> bool {
        self.noise_event || self.rx_events.contains(&true)
    }

    /// Physical header cached for receive `slot`.
    pub fn header(&self, slot: u8) -> &[u8; PHY_DMA_OFFSET] {
        &self.headers[usize::from(slot & 0x03)]
    }

    /// Pending RX flags not yet handed back.
    pub fn pending_rx(&self) -> u8 {
        self.reg_rx
    }

    /// Gives receive `slot` back to the modem once its data has been copied out.
    pub fn release_rx<B: PhyBus>(&mut self, bus: &mut B, slot: u8) {
        let bit = 0x10u8 << (slot & 0x03);
        #[cfg(feature = "isr")]
        critical_section::with(|_| {
            bus.and8(RX_INT, !bit);
            self.reg_rx &= !bit;
        });
        #[cfg(not(feature = "isr"))]
        {
            bus.and8(RX_INT, !bit);
            self.reg_rx &= !bit;
        }
    }
}

fn round_robin<const N: usize>(events: &mut [bool; N], start: u8) -> Option<u8> {
    (0..N)
        .map(|i| (usize::from(start) + i) % N)
        .find(|&slot| events[slot])
        .map(|slot| {
            events[slot] = false;
            slot as u8
        })
}
