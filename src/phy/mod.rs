//! PHY control engine
//!
//! PHY registers are shared with the firmware's own calibration code and with
//! the receive state machine, which keeps retuning the AGC on its own. Every
//! register sequence therefore runs inside a [`RegisterAccess`] scope:
//!
//! 1. acquire exclusive register access
//! 2. optionally hold the receiver in carrier search
//! 3. run the register and table operations
//! 4. leave carrier search again, if it was entered
//! 5. release register access
//!
//! Steps 4 and 5 run when the guard is dropped, so they happen on every exit
//! path. A multi-step sequence must be issued through one guard to be seen
//! atomically by the other contexts.
//!
//! The operations themselves live in [`agc`] and [`gain`].

use core::convert::Infallible;

use regiface::{ToByteArray, WritableRegister};

use crate::device::{GainStage, PhyHandle, TableId, GAIN_STAGE_ENTRIES};

pub mod agc;
pub mod gain;

pub use gain::{GainPreset, UnknownGainPreset};

/// Carrier search handling while register access is held
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CarrierSearch {
    /// Hold the receiver in carrier search for the duration of the scope
    Suspend,
    /// Leave the receive state machine running
    Keep,
}

/// Exclusive PHY register access, released on drop.
pub struct RegisterAccess<'a, P: PhyHandle + ?Sized> {
    phy: &'a mut P,
    carrier_search: CarrierSearch,
}

impl<'a, P: PhyHandle + ?Sized> RegisterAccess<'a, P> {
    /// Acquires register access and, for [`CarrierSearch::Suspend`], holds
    /// the receiver in carrier search.
    pub fn acquire(phy: &'a mut P, carrier_search: CarrierSearch) -> Self {
        phy.enter();
        if carrier_search == CarrierSearch::Suspend {
            phy.stay_in_carrier_search(true);
        }
        Self {
            phy,
            carrier_search,
        }
    }

    /// Reads a register by address.
    pub fn read_raw(&mut self, address: u16) -> u16 {
        self.phy.read_register(address)
    }

    /// Writes a register by address.
    pub fn write_raw(&mut self, address: u16, value: u16) {
        self.phy.write_register(address, value)
    }

    /// Writes a typed register.
    pub fn write<R>(&mut self, register: R)
    where
        R: WritableRegister<IdType = u16> + ToByteArray<Error = Infallible, Array = [u8; 2]>,
    {
        let raw = match register.to_bytes() {
            Ok(raw) => raw,
            Err(never) => match never {},
        };
        self.phy.write_register(R::id(), u16::from_ne_bytes(raw))
    }

    /// Read-modify-write of the bits selected by `mask` in a typed register.
    ///
    /// `value` is passed to the primitive unshifted and is masked there, so
    /// bits of `value` outside `mask` have no effect.
    pub fn modify<R>(&mut self, mask: u16, value: u16)
    where
        R: WritableRegister<IdType = u16>,
    {
        self.phy.modify_register(R::id(), mask, value)
    }

    /// Writes 8-bit wide entries to a PHY table.
    pub fn write_table(&mut self, table: TableId, offset: u32, data: &[u8]) {
        self.phy.write_table(table, offset, 8, data)
    }

    /// Replaces one stage of the in-memory gain control tables.
    pub fn set_rx_gain_stage(
        &mut self,
        stage: GainStage,
        gains: &[i8; GAIN_STAGE_ENTRIES],
        gain_bits: &[u8; GAIN_STAGE_ENTRIES],
    ) {
        self.phy.set_rx_gain_stage(stage, gains, gain_bits)
    }
}

impl<P: PhyHandle + ?Sized> Drop for RegisterAccess<'_, P> {
    fn drop(&mut self) {
        if self.carrier_search == CarrierSearch::Suspend {
            self.phy.stay_in_carrier_search(false);
        }
        self.phy.exit();
    }
}

/// Runs `body` with exclusive register access.
pub fn with_register_access<P, T>(
    phy: &mut P,
    carrier_search: CarrierSearch,
    body: impl FnOnce(&mut RegisterAccess<'_, P>) -> T,
) -> T
where
    P: PhyHandle + ?Sized,
{
    let mut access = RegisterAccess::acquire(phy, carrier_search);
    body(&mut access)
}

#[cfg(test)]
mod tests {
    use std::panic::{catch_unwind, AssertUnwindSafe};

    use super::*;
    use crate::registers::MaxAnalogGain;
    use crate::testing::{MockPhy, Op};

    #[test]
    fn suspended_scope_brackets_body() {
        let mut phy = MockPhy::default();
        let value = with_register_access(&mut phy, CarrierSearch::Suspend, |access| {
            access.write(MaxAnalogGain(0x19f));
            access.read_raw(0x6e8)
        });

        assert_eq!(value, 0x19f);
        assert_eq!(
            phy.ops,
            [
                Op::Enter,
                Op::CarrierSearch(true),
                Op::Write(0x6e8, 0x19f),
                Op::Read(0x6e8),
                Op::CarrierSearch(false),
                Op::Exit,
            ]
        );
    }

    #[test]
    fn kept_carrier_search_is_not_touched() {
        let mut phy = MockPhy::default();
        with_register_access(&mut phy, CarrierSearch::Keep, |access| {
            access.write_raw(0x1f5, 0);
        });

        assert_eq!(phy.ops, [Op::Enter, Op::Write(0x1f5, 0), Op::Exit]);
    }

    #[test]
    fn access_is_released_on_early_exit() {
        let mut phy = MockPhy::default();
        let result = with_register_access(&mut phy, CarrierSearch::Suspend, |access| {
            access.write_raw(0x6da, 0xffff);
            if access.read_raw(0x6da) == 0xffff {
                return Err(());
            }
            access.write_raw(0x6db, 0xffff);
            Ok(())
        });

        assert!(result.is_err());
        assert_eq!(phy.ops.last(), Some(&Op::Exit));
        assert!(!phy.ops.contains(&Op::Write(0x6db, 0xffff)));
        assert!(phy.is_released());
    }

    #[test]
    fn access_is_released_on_panic() {
        let mut phy = MockPhy::default();
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            with_register_access(&mut phy, CarrierSearch::Suspend, |access| {
                access.write_raw(0x6da, 0xffff);
                panic!("primitive fault");
            })
        }));

        assert!(outcome.is_err());
        assert_eq!(
            phy.ops[phy.ops.len() - 2..],
            [Op::CarrierSearch(false), Op::Exit]
        );
        assert!(phy.is_released());
    }
}
