//! Clip detector PHY registers
//!
//! The receiver has three clip detectors feeding the fast AGC: the ADC
//! detector and two narrowband power detectors, "nb" and "w1". These
//! registers hold their thresholds and enables.

use core::convert::Infallible;

use bitflags::bitflags;
use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

bitflags! {
    /// Clip detector disable bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ClipDetect: u16 {
        /// Disable clip2 detection
        const CLIP2_DISABLE = 1 << 13;
        /// Disable clip1 detection
        const CLIP1_DISABLE = 1 << 14;
    }
}

/// Clip detection control register (address: 0x06D4)
#[register(0x06D4u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct ClipDetectCtrl(pub ClipDetect);

/// Clip1 threshold register (address: 0x06DA)
#[register(0x06DAu16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct Clip1Threshold(pub u16);

/// Clip2 threshold register (address: 0x06DB)
#[register(0x06DBu16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct Clip2Threshold(pub u16);

/// First ADC clip threshold register (address: 0x06DE)
#[register(0x06DEu16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct AdcClipThreshold1(pub u16);

/// Second ADC clip threshold register (address: 0x06DF)
#[register(0x06DFu16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct AdcClipThreshold2(pub u16);

/// First nb detector clip threshold register (address: 0x06E0)
#[register(0x06E0u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct NbClipThreshold1(pub u16);

/// Second nb detector clip threshold register (address: 0x06E1)
#[register(0x06E1u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct NbClipThreshold2(pub u16);

/// First w1 detector clip threshold register (address: 0x06E2)
#[register(0x06E2u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct W1ClipThreshold1(pub u16);

/// Second w1 detector clip threshold register (address: 0x06E3)
#[register(0x06E3u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct W1ClipThreshold2(pub u16);

bitflags! {
    /// Clip blanking bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ClipBlank: u16 {
        /// Blank the w1 detector after a clip
        const W1_BLANK = 0x0003;
    }
}

/// Clip blanking control register (address: 0x06EE)
#[register(0x06EEu16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct ClipBlankCtrl(pub ClipBlank);

/// Fast AGC clip count threshold register (address: 0x06EF)
///
/// Number of clipped samples before the nb (bits 7:0) or w1 (bits 15:8)
/// detector reports a clip. 0 clips immediately, 0xFF effectively never.
#[register(0x06EFu16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct FastAgcClipCountThreshold(pub u16);

impl FastAgcClipCountThreshold {
    /// Field of the nb detector
    pub const NB_MASK: u16 = 0x00ff;
    /// Field of the w1 detector
    pub const W1_MASK: u16 = 0xff00;
}

impl_u16_register!(Clip1Threshold);
impl_u16_register!(Clip2Threshold);
impl_u16_register!(AdcClipThreshold1);
impl_u16_register!(AdcClipThreshold2);
impl_u16_register!(NbClipThreshold1);
impl_u16_register!(NbClipThreshold2);
impl_u16_register!(W1ClipThreshold1);
impl_u16_register!(W1ClipThreshold2);
impl_u16_register!(FastAgcClipCountThreshold);
impl_flag_register!(ClipDetectCtrl, ClipDetect);
impl_flag_register!(ClipBlankCtrl, ClipBlank);
