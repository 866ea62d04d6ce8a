//! CSI extraction parameters
//!
//! Layouts of the ConfigureCsi (500) request and the ReadCsiEnable (501)
//! result. The filter configuration lives in ucode shared memory; this layer
//! only copies it there.

use core::convert::Infallible;

use regiface::{FromByteArray, ToByteArray};

use crate::address_map::MAX_SRC_MAC_FILTERS;

/// Splits a MAC address into the three words the ucode compares against.
///
/// Each word holds two address bytes, the first one in the low byte.
pub fn mac_to_words(mac: [u8; 6]) -> [u16; 3] {
    [
        u16::from_le_bytes([mac[0], mac[1]]),
        u16::from_le_bytes([mac[2], mac[3]]),
        u16::from_le_bytes([mac[4], mac[5]]),
    ]
}

/// Error for adding a source MAC filter when all slots are in use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MacFiltersFull;

/// CSI filter configuration (ConfigureCsi request, 34 bytes)
///
/// # Layout
/// | offset | size | field |
/// |---|---|---|
/// | 0 | 2 | `chanspec` |
/// | 2 | 1 | `csi_collect` |
/// | 3 | 1 | `core_nss_mask` |
/// | 4 | 1 | `use_pkt_filter` |
/// | 5 | 1 | `first_pkt_byte` |
/// | 6 | 2 | `n_mac_addr` |
/// | 8 | 24 | `src_macs` |
/// | 32 | 2 | `delay` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CsiFilterConfig {
    /// Chanspec to tune to
    pub chanspec: u16,
    /// Collect CSI (1) or not (0)
    pub csi_collect: u8,
    /// Core mask in bits 3:0, spatial stream mask in bits 7:4
    pub core_nss_mask: u8,
    /// Filter on the first frame byte (1) or not (0)
    pub use_pkt_filter: u8,
    /// First frame byte to filter for
    pub first_pkt_byte: u8,
    /// Number of source MAC filters in use. 0 disables MAC filtering
    pub n_mac_addr: u16,
    /// Source MAC filters, see [`mac_to_words`]
    pub src_macs: [[u16; 3]; MAX_SRC_MAC_FILTERS],
    /// Delay between two extractions in microseconds
    pub delay: u16,
}

impl CsiFilterConfig {
    /// Size of the request layout in bytes.
    pub const SIZE: usize = 34;

    /// Receive core mask, bits 3:0 of `core_nss_mask`.
    pub fn core_mask(&self) -> u16 {
        u16::from(self.core_nss_mask & 0x0f)
    }

    /// Spatial stream mask, bits 7:4 of `core_nss_mask`.
    pub fn nss_mask(&self) -> u16 {
        u16::from((self.core_nss_mask & 0xf0) >> 4)
    }

    /// Adds a source MAC filter.
    ///
    /// If the address is already filtered on, no action is taken and Ok(()) is
    /// returned.
    ///
    /// # Errors
    /// * [`MacFiltersFull`] - all filter slots are in use
    pub fn add_src_mac(&mut self, mac: [u8; 6]) -> Result<(), MacFiltersFull> {
        let words = mac_to_words(mac);
        let used = usize::from(self.n_mac_addr).min(MAX_SRC_MAC_FILTERS);
        if self.src_macs[..used].contains(&words) {
            return Ok(());
        }
        if used >= MAX_SRC_MAC_FILTERS {
            return Err(MacFiltersFull);
        }
        self.src_macs[used] = words;
        self.n_mac_addr = used as u16 + 1;
        Ok(())
    }
}

impl FromByteArray for CsiFilterConfig {
    type Error = Infallible;
    type Array = [u8; CsiFilterConfig::SIZE];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        let word = |offset: usize| u16::from_ne_bytes([bytes[offset], bytes[offset + 1]]);

        let mut src_macs = [[0u16; 3]; MAX_SRC_MAC_FILTERS];
        for (i, mac) in src_macs.iter_mut().enumerate() {
            for (j, cell) in mac.iter_mut().enumerate() {
                *cell = word(8 + (i * 3 + j) * 2);
            }
        }

        Ok(Self {
            chanspec: word(0),
            csi_collect: bytes[2],
            core_nss_mask: bytes[3],
            use_pkt_filter: bytes[4],
            first_pkt_byte: bytes[5],
            n_mac_addr: word(6),
            src_macs,
            delay: word(32),
        })
    }
}

impl ToByteArray for CsiFilterConfig {
    type Error = Infallible;
    type Array = [u8; CsiFilterConfig::SIZE];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..2].copy_from_slice(&self.chanspec.to_ne_bytes());
        bytes[2] = self.csi_collect;
        bytes[3] = self.core_nss_mask;
        bytes[4] = self.use_pkt_filter;
        bytes[5] = self.first_pkt_byte;
        bytes[6..8].copy_from_slice(&self.n_mac_addr.to_ne_bytes());
        for (i, word) in self.src_macs.iter().flatten().enumerate() {
            let offset = 8 + i * 2;
            bytes[offset..offset + 2].copy_from_slice(&word.to_ne_bytes());
        }
        bytes[32..34].copy_from_slice(&self.delay.to_ne_bytes());
        Ok(bytes)
    }
}

/// Leading chanspec of a ConfigureCsi request.
///
/// Decoded on its own because the channel is switched even when the rest of
/// the request is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Chanspec(pub u16);

impl FromByteArray for Chanspec {
    type Error = Infallible;
    type Array = [u8; 2];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self(u16::from_ne_bytes(bytes)))
    }
}

/// CSI collection enable flag (ReadCsiEnable result, 2 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CsiEnable(pub u16);

impl ToByteArray for CsiEnable {
    type Error = Infallible;
    type Array = [u8; 2];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok(self.0.to_ne_bytes())
    }
}
