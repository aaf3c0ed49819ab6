//! Register configuration profiles
//!
//! A [`Profile`] is the initialization script of one operating mode: an ordered list of
//! register writes applied in sequence. Addresses may repeat, the later write wins.
//! Profiles are immutable and exactly one is applied per mode switch.

use core::str::FromStr;

use thiserror::Error;

/// An ordered register initialization script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Profile {
    name: &'static str,
    writes: &'static [(u8, u8)],
}

impl Profile {
    /// Creates a profile from `(address, value)` pairs.
    pub const fn new(name: &'static str, writes: &'static [(u8, u8)]) -> Self {
        Self { name, writes }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The writes in application order.
    pub const fn writes(&self) -> &'static [(u8, u8)] {
        self.writes
    }
}

/// IOCFG2/1/0 plus FSCTRL1 for the ISM band.
pub const ISM: Profile = Profile::new(
    "ISM",
    &[
        (0x00, 0x29), // IOCFG2: CHIP_RDYn
        (0x01, 0x2E), // IOCFG1: high impedance
        (0x02, 0x06), // IOCFG0: sync word sent/received
        (0x0B, 0x1D), // FSCTRL1
    ],
);

/// IOCFG2/1/0 plus FSCTRL1 for short range devices.
pub const SRD: Profile = Profile::new(
    "SRD",
    &[
        (0x00, 0x29),
        (0x01, 0x2E),
        (0x02, 0x06),
        (0x0B, 0x0A),
    ],
);

/// Operating band of the CC2500.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Band {
    /// Industrial, scientific and medical
    Ism,
    /// Short range devices
    Srd,
}

impl Band {
    /// Built-in profile for this band.
    pub const fn profile(self) -> &'static Profile {
        match self {
            Self::Ism => &ISM,
            Self::Srd => &SRD,
        }
    }
}

/// The string did not name a known band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid mode, expected ISM or SRD")]
pub struct UnknownBand;

impl FromStr for Band {
    type Err = UnknownBand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("ism") {
            Ok(Self::Ism)
        } else if s.eq_ignore_ascii_case("srd") {
            Ok(Self::Srd)
        } else {
            Err(UnknownBand)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_names_are_case_insensitive() {
        assert_eq!("ISM".parse::<Band>(), Ok(Band::Ism));
        assert_eq!("srd".parse::<Band>(), Ok(Band::Srd));
        assert_eq!("FM".parse::<Band>(), Err(UnknownBand));
    }

    #[test]
    fn profiles_differ_only_in_fsctrl1() {
        let ism = Band::Ism.profile().writes();
        let srd = Band::Srd.profile().writes();

        assert_eq!(ism[..3], srd[..3]);
        assert_eq!(ism[3], (0x0B, 0x1D));
        assert_eq!(srd[3], (0x0B, 0x0A));
    }
}
