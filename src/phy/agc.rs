//! AGC overrides

use crate::device::PhyHandle;
use crate::registers::{
    Dot11acConfig, HpfBwOverride, HpfBwOverrideDigiCtrl, MaxAnalogGain, RadarBlank,
    RadarBlankCtrl, SingleShotAgc, SingleShotAgcCtrl,
};

use super::RegisterAccess;

/// Switches the AGC off.
///
/// Leaves the 802.11ac AGC configuration, drops the HT and VHT HPF bandwidth
/// overrides and radar blanking.
pub fn disable_agc<P: PhyHandle + ?Sized>(access: &mut RegisterAccess<'_, P>) {
    access.write(Dot11acConfig(0));

    for flag in [
        HpfBwOverride::HT_AGC_OVERRIDE,
        HpfBwOverride::HT_AGC_HPFBW,
        HpfBwOverride::VHT_AGC_OVERRIDE,
        HpfBwOverride::VHT_AGC_HPFBW,
    ] {
        access.modify::<HpfBwOverrideDigiCtrl>(flag.bits(), 0);
    }

    access.modify::<RadarBlankCtrl>(RadarBlank::HT_AGC_BLANK_EN.bits(), 0);

    // The value is not shifted into the field, so this clears the bit.
    access.modify::<SingleShotAgcCtrl>(SingleShotAgc::ENABLE.bits(), 1);
}

/// Sets the analog gain ceiling, see [`MaxAnalogGain::from_level`].
pub fn set_max_analog_gain<P>(access: &mut RegisterAccess<'_, P>, level: i32)
where
    P: PhyHandle + ?Sized,
{
    access.write(MaxAnalogGain::from_level(level));
}
