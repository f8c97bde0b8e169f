//! Tiny logging facade so the rest of the crate can call `debug!`/`warn!`/`error!`
//! without caring whether the embedding firmware wants `defmt` or the host wants `log`.
//!
//! Mirrors the dual `log`/`defmt` dependency pair the crate has always carried; this
//! module just gives both a single call site instead of sprinkling `#[cfg(feature = ...)]`
//! through the engine.

#[cfg(feature = "defmt")]
pub(crate) use defmt::{debug, error, warn};

#[cfg(all(feature = "log", not(feature = "defmt")))]
pub(crate) use log::{debug, error, warn};

#[cfg(not(any(feature = "log", feature = "defmt")))]
mod noop {
    macro_rules! debug {
        ($($arg:tt)*) => {};
    }
    macro_rules! warn {
        ($($arg:tt)*) => {};
    }
    macro_rules! error {
        ($($arg:tt)*) => {};
    }
    pub(crate) use debug;
    pub(crate) use error;
    pub(crate) use warn;
}
#[cfg(not(any(feature = "log", feature = "defmt")))]
pub(crate) use noop::{debug, error, warn};
