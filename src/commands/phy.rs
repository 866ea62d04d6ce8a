//! PHY command parameters

use core::convert::Infallible;

use regiface::{FromByteArray, ToByteArray};

/// Register address (ReadPhyRegister request, 4 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PhyRegisterAddress(pub i32);

impl PhyRegisterAddress {
    /// Address as seen by the register primitives, which only decode 16 bits.
    pub fn register(self) -> u16 {
        self.0 as u16
    }
}

impl FromByteArray for PhyRegisterAddress {
    type Error = Infallible;
    type Array = [u8; 4];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self(i32::from_ne_bytes(bytes)))
    }
}

/// Register contents (ReadPhyRegister result, 4 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PhyRegisterValue(pub i32);

impl ToByteArray for PhyRegisterValue {
    type Error = Infallible;
    type Array = [u8; 4];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok(self.0.to_ne_bytes())
    }
}

/// Register write (WritePhyRegister request, 8 bytes)
///
/// The value comes first, the address second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PhyRegisterWrite {
    /// Value to write, truncated to 16 bits
    pub value: i32,
    /// Register address, truncated to 16 bits
    pub address: i32,
}

impl FromByteArray for PhyRegisterWrite {
    type Error = Infallible;
    type Array = [u8; 8];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            value: i32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            address: i32::from_ne_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
        })
    }
}

impl ToByteArray for PhyRegisterWrite {
    type Error = Infallible;
    type Array = [u8; 8];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let mut bytes = [0u8; 8];
        bytes[0..4].copy_from_slice(&self.value.to_ne_bytes());
        bytes[4..8].copy_from_slice(&self.address.to_ne_bytes());
        Ok(bytes)
    }
}

/// Clip detector preset (ForceGainLevel request, 4 bytes)
///
/// See [`GainPreset`](crate::phy::GainPreset) for the valid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GainPresetId(pub i32);

impl GainPresetId {
    /// Preset id as seen by the preset routine, which only takes 16 bits.
    pub fn preset(self) -> i16 {
        self.0 as i16
    }
}

impl FromByteArray for GainPresetId {
    type Error = Infallible;
    type Array = [u8; 4];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self(i32::from_ne_bytes(bytes)))
    }
}

/// Analog gain ceiling (SetMaxAnalogGain request, 4 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AnalogGainLevel(pub i32);

impl FromByteArray for AnalogGainLevel {
    type Error = Infallible;
    type Array = [u8; 4];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self(i32::from_ne_bytes(bytes)))
    }
}
