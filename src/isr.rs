//! Global engine helpers for interrupt-driven firmware.
//!
//! The modem interrupt handler and the main loop both need the engine. These helpers
//! keep it in a `static` [`Mutex<RefCell<Option<Phy<_>>>>`](critical_section::Mutex) and
//! run every access inside `critical_section::with`.
//!
//! The macros [`init_phy!`](crate::init_phy), [`setup_phy!`](crate::setup_phy) and
//! [`phy_interrupt!`](crate::phy_interrupt) do the same for a global named `PHY`.

use crate::bus::PhyBus;
use crate::config::PhyConfig;
use crate::error::TxError;
use crate::phy::{Phy, RxMessage};
use crate::scheduler::{TxOutcome, TxRequest};
use core::cell::RefCell;
use critical_section::Mutex;

/// Used to initialize the global static `Phy` for use with `critical_section`.
///
/// # Returns
/// * An empty mutable ref-cell
///
/// # Example
/// ```rust,ignore
/// use atpl230_phy::{bus::SpiPhyBus, isr::global_phy_init, phy::Phy};
/// use core::cell::RefCell;
/// use critical_section::Mutex;
///
/// static PHY: Mutex<RefCell<Option<Phy<SpiPhyBus<MySpi>>>>> = global_phy_init();
/// ```
pub const fn global_phy_init<B: PhyBus>() -> Mutex<RefCell<Option<Phy<B>>>> {
    Mutex::new(RefCell::new(None))
}

/// Builds the engine (hard resetting the modem) and stores it in the global.
///
/// # Arguments
/// * The global static `Phy`
/// * The register bus
/// * The board configuration
///
/// # Example
/// ```rust,ignore
/// fn main() {
///     global_phy_setup(&PHY, SpiPhyBus::new(spi), PhyConfig::default());
/// }
/// ```
pub fn global_phy_setup<B: PhyBus>(
    global_phy: &'static Mutex<RefCell<Option<Phy<B>>>>,
    bus: B,
    cfg: PhyConfig,
) {
    critical_section::with(|cs| {
        let _ = global_phy.borrow(cs).replace(Some(Phy::new(bus, cfg)));
    });
}

/// Services the modem interrupt.
///
/// Does nothing until [`global_phy_setup`] ran.
///
/// # Example
/// ```rust,ignore
/// #[interrupt]
/// fn PIOA() {
///     global_phy_interrupt(&PHY);
/// }
/// ```
pub fn global_phy_interrupt<B: PhyBus>(global_phy: &'static Mutex<RefCell<Option<Phy<B>>>>) {
    critical_section::with(|cs| {
        if let Some(phy) = global_phy.borrow(cs).borrow_mut().as_mut() {
            phy.handle_interrupt();
        }
    });
}

/// Runs `f` on the global engine, `None` if it was not set up.
///
/// # Example
/// ```rust,ignore
/// let total = with_global_phy(&PHY, |phy| phy.info().stats.tx_total);
/// ```
pub fn with_global_phy<B: PhyBus, R>(
    global_phy: &'static Mutex<RefCell<Option<Phy<B>>>>,
    f: impl FnOnce(&mut Phy<B>) -> R,
) -> Option<R> {
    critical_section::with(|cs| global_phy.borrow(cs).borrow_mut().as_mut().map(f))
}

/// Submits a frame to the global engine.
///
/// # Errors
/// [`TxError::InvalidBuffer`] if the engine was not set up, otherwise whatever
/// [`Phy::submit`] reports.
pub fn global_phy_submit<B: PhyBus>(
    global_phy: &'static Mutex<RefCell<Option<Phy<B>>>>,
    req: &TxRequest<'_>,
) -> Result<(), TxError> {
    with_global_phy(global_phy, |phy| phy.submit(req)).unwrap_or(Err(TxError::InvalidBuffer))
}

/// Takes the next transmit outcome from the global engine.
pub fn global_phy_poll_tx<B: PhyBus>(
    global_phy: &'static Mutex<RefCell<Option<Phy<B>>>>,
) -> Option<TxOutcome> {
    with_global_phy(global_phy, Phy::poll_tx_result).flatten()
}

/// Takes the next received message from the global engine.
pub fn global_phy_poll_rx<B: PhyBus>(
    global_phy: &'static Mutex<RefCell<Option<Phy<B>>>>,
) -> Option<RxMessage> {
    with_global_phy(global_phy, Phy::poll_rx).flatten()
}
