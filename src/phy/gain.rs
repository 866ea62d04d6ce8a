//! Clip detector presets and gain limit tables
//!
//! The fast AGC lowers the gain whenever one of its clip detectors fires.
//! Pinning the detectors (and the tables the AGC may pick gains from) keeps
//! the receive gain constant, which makes CSI magnitudes comparable across
//! frames.

use core::fmt::Write;

use crate::device::{GainStage, PhyHandle, TableId, GAIN_STAGE_ENTRIES};
use crate::registers::{
    AdcClipThreshold1, AdcClipThreshold2, Clip1Threshold, Clip2Threshold, ClipBlank,
    ClipBlankCtrl, ClipDetect, ClipDetectCtrl, FastAgcClipCountThreshold, NbClipThreshold1,
    NbClipThreshold2, W1ClipThreshold1, W1ClipThreshold2,
};

use super::RegisterAccess;

/// Clip detector presets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GainPreset {
    /// Raise the clip1 threshold to the maximum and disable clip1 detection
    InitGain = 0,
    /// Saturate the nb clip counter
    ClipHigh = 1,
    /// nb clips immediately, w1 counter field cleared
    ClipMid = 2,
    /// nb and w1 clip immediately
    ClipLow = 3,
    /// Tune the ADC clip thresholds, saturate the nb counter
    AdcClip = 4,
    /// Tune the nb thresholds, w1 counter field cleared
    NbClip = 5,
    /// Tune the w1 thresholds and clear w1 blanking
    W1Clip = 6,
}

/// Error for preset ids outside of 0..=6
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnknownGainPreset(pub i16);

impl TryFrom<i16> for GainPreset {
    type Error = UnknownGainPreset;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::InitGain),
            1 => Ok(Self::ClipHigh),
            2 => Ok(Self::ClipMid),
            3 => Ok(Self::ClipLow),
            4 => Ok(Self::AdcClip),
            5 => Ok(Self::NbClip),
            6 => Ok(Self::W1Clip),
            unknown => Err(UnknownGainPreset(unknown)),
        }
    }
}

impl GainPreset {
    /// Console line printed when the preset is applied.
    pub fn description(self) -> &'static str {
        match self {
            Self::InitGain => "initgain -- adc never clips.",
            Self::ClipHigh => "clip hi -- adc always clips, nb never clips.",
            Self::ClipMid => "clip md -- adc/nb always clips, w1 never clips.",
            Self::ClipLow => "clip lo -- adc/nb/w1 always clips.",
            Self::AdcClip => "adc clip.",
            Self::NbClip => "nb clip.",
            Self::W1Clip => "w1 clip.",
        }
    }

    fn program<P: PhyHandle + ?Sized>(self, access: &mut RegisterAccess<'_, P>) {
        const NB: u16 = FastAgcClipCountThreshold::NB_MASK;
        const W1: u16 = FastAgcClipCountThreshold::W1_MASK;

        match self {
            Self::InitGain => {
                access.write(Clip1Threshold(0xffff));
                let disable = ClipDetect::CLIP1_DISABLE.bits();
                access.modify::<ClipDetectCtrl>(disable, disable);
            }
            Self::ClipHigh => {
                access.modify::<FastAgcClipCountThreshold>(NB, 0xff);
            }
            Self::ClipMid => {
                access.modify::<FastAgcClipCountThreshold>(NB, 0x00);
                access.modify::<FastAgcClipCountThreshold>(W1, 0xff);
            }
            Self::ClipLow => {
                access.modify::<FastAgcClipCountThreshold>(NB, 0x00);
                access.modify::<FastAgcClipCountThreshold>(W1, 0x00);
            }
            Self::AdcClip => {
                access.write(AdcClipThreshold1(0x0000));
                access.write(AdcClipThreshold2(0x0008));
                access.modify::<FastAgcClipCountThreshold>(NB, 0xff);
            }
            Self::NbClip => {
                access.write(NbClipThreshold1(0xfffe));
                access.write(NbClipThreshold2(0x0554));
                access.modify::<FastAgcClipCountThreshold>(W1, 0xff);
            }
            Self::W1Clip => {
                access.write(W1ClipThreshold1(0xfffe));
                access.write(W1ClipThreshold2(0x0554));
                access.modify::<ClipBlankCtrl>(ClipBlank::W1_BLANK.bits(), 0);
            }
        }
    }
}

/// Applies the clip detector preset `id`.
///
/// Clip2 detection is always disabled first, whatever the id. Only a known
/// preset then prints its description to `console` and programs its
/// registers; unknown ids stop after the clip2 writes. Console failures are
/// ignored.
///
/// Returns the preset that was applied, if any.
pub fn force_gain_level<P, C>(
    access: &mut RegisterAccess<'_, P>,
    id: i16,
    console: &mut C,
) -> Option<GainPreset>
where
    P: PhyHandle + ?Sized,
    C: Write + ?Sized,
{
    let disable = ClipDetect::CLIP2_DISABLE.bits();
    access.modify::<ClipDetectCtrl>(disable, disable);
    access.write(Clip2Threshold(0xffff));

    let preset = GainPreset::try_from(id).ok()?;
    let _ = writeln!(console, "{}", preset.description());
    preset.program(access);
    Some(preset)
}

/// Gain limit table entry of a stage the AGC may use
const USED: u8 = 0;
/// Gain limit table entry of a stage the AGC must not use
const UNUSED: u8 = 127;

/// Offset of the first stage in the gain limit table
const GAIN_LIMIT_OFFSET: u32 = 8;

/// Only the third stage (LNA2) stays under AGC control.
const GAIN_LIMITS: [u8; 6] = [UNUSED, UNUSED, USED, UNUSED, UNUSED, UNUSED];

/// A stage of the gain and gain bits tables pinned to a single setting
struct FixedStage {
    offset: u32,
    gains: &'static [u8],
    gain_bits: &'static [u8],
}

const FIXED_STAGES: [FixedStage; 3] = [
    // LNA1
    FixedStage {
        offset: 8,
        gains: &[0x0a; 6],
        gain_bits: &[2; 6],
    },
    // TIA
    FixedStage {
        offset: 32,
        gains: &[10; 12],
        gain_bits: &[0; 12],
    },
    // BQ1
    FixedStage {
        offset: 0x70,
        gains: &[0; 3],
        gain_bits: &[0; 3],
    },
];

const DVGA_GAINS: [i8; GAIN_STAGE_ENTRIES] = [0; GAIN_STAGE_ENTRIES];
const DVGA_GAIN_BITS: [u8; GAIN_STAGE_ENTRIES] = [0; GAIN_STAGE_ENTRIES];

/// Restricts the AGC to LNA2 and pins every other stage.
///
/// All writes are issued through `access`, so the tables are never observed
/// half programmed.
pub fn program_gain_limit_tables<P: PhyHandle + ?Sized>(access: &mut RegisterAccess<'_, P>) {
    access.write_table(TableId::GAIN_LIMIT, GAIN_LIMIT_OFFSET, &GAIN_LIMITS);

    for stage in &FIXED_STAGES {
        access.write_table(TableId::GAIN0, stage.offset, stage.gains);
        access.write_table(TableId::GAIN_BITS0, stage.offset, stage.gain_bits);
    }

    access.set_rx_gain_stage(GainStage::Dvga, &DVGA_GAINS, &DVGA_GAIN_BITS);
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::phy::{with_register_access, CarrierSearch};
    use crate::testing::{MockPhy, Op};

    /// Register ops the preset adds on top of the clip2 prologue.
    fn preset_ops(id: i16) -> (BTreeSet<Op>, String) {
        let mut phy = MockPhy::default();
        let mut console = String::new();
        let applied = with_register_access(&mut phy, CarrierSearch::Suspend, |access| {
            force_gain_level(access, id, &mut console)
        });
        assert_eq!(applied, GainPreset::try_from(id).ok());

        let ops = phy.register_ops();
        assert_eq!(
            ops[..2],
            [Op::Modify(0x6d4, 0x2000, 0x2000), Op::Write(0x6db, 0xffff)]
        );
        (ops[2..].iter().cloned().collect(), console)
    }

    fn set<const N: usize>(ops: [Op; N]) -> BTreeSet<Op> {
        ops.into_iter().collect()
    }

    #[test]
    fn init_gain_only_touches_clip1() {
        let (ops, console) = preset_ops(0);
        assert_eq!(
            ops,
            set([Op::Write(0x6da, 0xffff), Op::Modify(0x6d4, 0x4000, 0x4000)])
        );
        assert_eq!(console, "initgain -- adc never clips.\n");
        for threshold in [0x6e0, 0x6e1, 0x6e2, 0x6e3, 0x6ef] {
            assert!(ops.iter().all(|op| op.register() != Some(threshold)));
        }
    }

    #[test]
    fn clip_count_presets() {
        assert_eq!(preset_ops(1).0, set([Op::Modify(0x6ef, 0x00ff, 0xff)]));
        assert_eq!(
            preset_ops(2).0,
            set([Op::Modify(0x6ef, 0x00ff, 0x00), Op::Modify(0x6ef, 0xff00, 0xff)])
        );
        assert_eq!(
            preset_ops(3).0,
            set([Op::Modify(0x6ef, 0x00ff, 0x00), Op::Modify(0x6ef, 0xff00, 0x00)])
        );
    }

    #[test]
    fn threshold_presets() {
        assert_eq!(
            preset_ops(4).0,
            set([
                Op::Write(0x6de, 0x0000),
                Op::Write(0x6df, 0x0008),
                Op::Modify(0x6ef, 0x00ff, 0xff),
            ])
        );
        assert_eq!(
            preset_ops(5).0,
            set([
                Op::Write(0x6e0, 0xfffe),
                Op::Write(0x6e1, 0x0554),
                Op::Modify(0x6ef, 0xff00, 0xff),
            ])
        );
        let (ops, console) = preset_ops(6);
        assert_eq!(
            ops,
            set([
                Op::Write(0x6e2, 0xfffe),
                Op::Write(0x6e3, 0x0554),
                Op::Modify(0x6ee, 0x0003, 0x0),
            ])
        );
        assert_eq!(console, "w1 clip.\n");
    }

    #[test]
    fn preset_range() {
        assert_eq!(GainPreset::try_from(6), Ok(GainPreset::W1Clip));
        assert_eq!(GainPreset::try_from(7), Err(UnknownGainPreset(7)));
        assert_eq!(GainPreset::try_from(-1), Err(UnknownGainPreset(-1)));
    }

    #[test]
    fn unknown_preset_only_disables_clip2() {
        for id in [7, -1, i16::MAX] {
            let (ops, console) = preset_ops(id);
            assert!(ops.is_empty());
            assert!(console.is_empty());
        }
    }

    #[test]
    fn masked_value_outside_field_is_dropped() {
        let mut phy = MockPhy::default();
        phy.registers.insert(0x6ef, 0x1234);
        with_register_access(&mut phy, CarrierSearch::Suspend, |access| {
            force_gain_level(access, 2, &mut String::new())
        });
        assert_eq!(phy.registers[&0x6ef], 0x0000);
    }

    #[test]
    fn gain_limit_tables() {
        let mut phy = MockPhy::default();
        with_register_access(&mut phy, CarrierSearch::Suspend, program_gain_limit_tables);

        let table = |table, offset, data: &[u8]| Op::Table {
            table,
            offset,
            width: 8,
            data: data.to_vec(),
        };
        assert_eq!(
            phy.ops,
            [
                Op::Enter,
                Op::CarrierSearch(true),
                table(TableId::GAIN_LIMIT, 8, &[127, 127, 0, 127, 127, 127]),
                table(TableId::GAIN0, 8, &[0x0a; 6]),
                table(TableId::GAIN_BITS0, 8, &[2; 6]),
                table(TableId::GAIN0, 32, &[10; 12]),
                table(TableId::GAIN_BITS0, 32, &[0; 12]),
                table(TableId::GAIN0, 0x70, &[0; 3]),
                table(TableId::GAIN_BITS0, 0x70, &[0; 3]),
                Op::RxGainStage {
                    stage: GainStage::Dvga,
                    gains: [0; 12],
                    gain_bits: [0; 12],
                },
                Op::CarrierSearch(false),
                Op::Exit,
            ]
        );
    }
}
