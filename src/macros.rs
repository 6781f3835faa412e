/// Declares a static global `PHY` engine protected by a `critical_section` mutex.
///
/// This macro creates a `static` singleton `PHY` suitable for use in interrupt-based
/// environments, where both the main loop and the modem ISR need the engine.
///
/// # Arguments
/// - `$bus`: The concrete register bus type (must implement `PhyBus`)
///
/// # Example
/// ```rust,ignore
/// init_phy!(SpiPhyBus<MySpiDevice>);
/// ```
#[macro_export]
macro_rules! init_phy {
    ( $bus:ty ) => {
        pub static PHY: $crate::critical_section::Mutex<
            core::cell::RefCell<Option<$crate::phy::Phy<$bus>>>,
        > = $crate::critical_section::Mutex::new(core::cell::RefCell::new(None));
    };
}

/// Builds the engine and stores it in the global `PHY`.
///
/// The modem is hard reset with the given configuration, or with the default
/// (ATPLCOUP000) board configuration when none is given.
///
/// # Arguments
/// - `$bus`: The register bus value
/// - `$cfg`: Optional `PhyConfig`
///
/// # Example
/// ```rust,ignore
/// fn main() {
///     setup_phy!(SpiPhyBus::new(spi));
///     // or
///     setup_phy!(bus, PhyConfig::for_board(CouplingBoard::Atplcoup002V1));
/// }
/// ```
///
/// # Notes
/// - Must be called inside a critical section-aware context (safe in `main()`).
/// - Requires `init_phy!` to have been used earlier.
#[macro_export]
macro_rules! setup_phy {
    ( $bus:expr ) => {
        $crate::setup_phy!($bus, $crate::config::PhyConfig::default())
    };
    ( $bus:expr, $cfg:expr ) => {
        $crate::critical_section::with(|cs| {
            let _ = PHY
                .borrow(cs)
                .replace(Some($crate::phy::Phy::new($bus, $cfg)));
        })
    };
}

/// Calls `handle_interrupt()` on the global `PHY` if it has been set up.
///
/// # Example
/// ```rust,ignore
/// #[interrupt]
/// fn PIOA() {
///     phy_interrupt!();
/// }
/// ```
///
/// # Notes
/// - This macro assumes `PHY` was declared with `init_phy!` and set up via `setup_phy!`.
/// - Safe to call before setup: it silently does nothing.
#[macro_export]
macro_rules! phy_interrupt {
    () => {
        $crate::critical_section::with(|cs| {
            if let Some(phy) = PHY.borrow(cs).borrow_mut().as_mut() {
                phy.handle_interrupt();
            }
        })
    };
}
