//! AGC related PHY registers
//!
//! Registers touched when the automatic gain control is switched off or its
//! analog gain ceiling is moved.

use core::convert::Infallible;

use bitflags::bitflags;
use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

/// 802.11ac configuration register (address: 0x01F5)
///
/// Writing 0 drops the PHY out of its 802.11ac specific AGC configuration.
#[register(0x01F5u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct Dot11acConfig(pub u16);

bitflags! {
    /// HPF bandwidth overrides applied by the digital AGC controller
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct HpfBwOverride: u16 {
        /// HT AGC overrides the HPF bandwidth
        const HT_AGC_OVERRIDE = 1 << 0;
        /// HPF bandwidth selected during HT AGC
        const HT_AGC_HPFBW = 1 << 1;
        /// VHT AGC overrides the HPF bandwidth
        const VHT_AGC_OVERRIDE = 1 << 4;
        /// HPF bandwidth selected during VHT AGC
        const VHT_AGC_HPFBW = 1 << 5;
    }
}

/// HPF bandwidth override digital control register (address: 0x01F6)
#[register(0x01F6u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct HpfBwOverrideDigiCtrl(pub HpfBwOverride);

bitflags! {
    /// Radar blanking control bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RadarBlank: u16 {
        /// Blank radar detection while the HT AGC is running
        const HT_AGC_BLANK_EN = 1 << 13;
    }
}

/// Radar blanking control register (address: 0x0250)
#[register(0x0250u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct RadarBlankCtrl(pub RadarBlank);

bitflags! {
    /// Single shot AGC control bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SingleShotAgc: u16 {
        /// Run the AGC once per packet instead of continuously
        const ENABLE = 1 << 15;
    }
}

/// Single shot AGC control register (address: 0x029C)
#[register(0x029Cu16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct SingleShotAgcCtrl(pub SingleShotAgc);

/// Maximum analog gain register (address: 0x06E8)
///
/// The upper byte selects the gain ceiling, the lower byte is always 0x9F.
#[register(0x06E8u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct MaxAnalogGain(pub u16);

impl MaxAnalogGain {
    /// Register value for a gain ceiling.
    ///
    /// The level is taken as is from the ioctl and is not range checked,
    /// values outside 0..=255 wrap into the 16-bit register.
    pub fn from_level(level: i32) -> Self {
        Self(0x9f_i32.wrapping_add(level.wrapping_mul(0x100)) as u16)
    }
}

impl_u16_register!(Dot11acConfig);
impl_u16_register!(MaxAnalogGain);
impl_flag_register!(HpfBwOverrideDigiCtrl, HpfBwOverride);
impl_flag_register!(RadarBlankCtrl, RadarBlank);
impl_flag_register!(SingleShotAgcCtrl, SingleShotAgc);
