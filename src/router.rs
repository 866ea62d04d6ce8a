//! Command router
//!
//! The [`Router`] sits in place of the firmware's ioctl handler. Commands it
//! recognizes (see [`CommandId`]) are decoded, checked and executed against
//! the radio and PHY handles; everything else is handed to the
//! [`FallbackHandler`] untouched.

use core::fmt::Write;

use crate::address_map::{AddressMap, ShmCell, Target};
use crate::commands::{
    decode, encode, AnalogGainLevel, Chanspec, CommandId, CsiEnable, CsiFilterConfig,
    GainPresetId, ObjectMemoryBase, ObjectMemoryWord, PhyRegisterAddress, PhyRegisterValue,
    PhyRegisterWrite, UnknownCommand,
};
use crate::device::{FallbackHandler, PhyHandle, RadioHandle};
use crate::phy::{agc, gain, with_register_access, CarrierSearch};
use crate::{Error, Status};

/// Minimum buffer length of commands that take a single 16-bit cell
const CELL_COMMAND_LEN: usize = 2;

/// Ioctl dispatcher bound to one shared memory layout.
///
/// The router owns the fallback handler and the console sink. Radio and PHY
/// handles are borrowed per call, so the router itself holds no hardware
/// state and may be built before the radio is up.
pub struct Router<F, C> {
    map: &'static AddressMap,
    fallback: F,
    console: C,
}

impl<F, C> Router<F, C> {
    /// Creates a router for a supported target.
    pub fn new(target: &Target, fallback: F, console: C) -> Self {
        Self::with_address_map(target.address_map(), fallback, console)
    }

    /// Creates a router for an explicit shared memory layout.
    pub fn with_address_map(map: &'static AddressMap, fallback: F, console: C) -> Self {
        Self {
            map,
            fallback,
            console,
        }
    }

    /// The shared memory layout in use.
    pub fn address_map(&self) -> &'static AddressMap {
        self.map
    }

    /// Consumes the router, returning the fallback handler and console.
    pub fn release(self) -> (F, C) {
        (self.fallback, self.console)
    }
}

impl<F, C: Write> Router<F, C> {
    /// Handles one ioctl.
    ///
    /// Recognized commands return [`Status::SUCCESS`] or [`Status::ERROR`].
    /// Any other command id is forwarded to the fallback handler with the
    /// same radio handle and buffer, and its status is returned as is.
    pub fn dispatch<R, P>(
        &mut self,
        radio: &mut R,
        phy: &mut P,
        command: u32,
        buffer: &mut [u8],
    ) -> Status
    where
        R: RadioHandle + ?Sized,
        P: PhyHandle + ?Sized,
        F: FallbackHandler<R>,
    {
        let id = match CommandId::try_from(command) {
            Ok(id) => id,
            Err(UnknownCommand(command)) => {
                trace!("ioctl {} forwarded to fallback", command);
                return self.fallback.handle(radio, command, buffer);
            }
        };

        self.execute(id, radio, phy, buffer)
            .inspect_err(|error| debug!("ioctl {} rejected: {:?}", command, error))
            .into()
    }

    fn execute<R, P>(
        &mut self,
        id: CommandId,
        radio: &mut R,
        phy: &mut P,
        buffer: &mut [u8],
    ) -> Result<(), Error>
    where
        R: RadioHandle + ?Sized,
        P: PhyHandle + ?Sized,
    {
        match id {
            CommandId::ReadObjectMemory => read_object_memory(radio, buffer),
            CommandId::ConfigureCsi => self.configure_csi(radio, buffer),
            CommandId::ReadCsiEnable => {
                require_up(radio)?;
                require_len(buffer, CELL_COMMAND_LEN)?;
                let enabled = radio.read_shm(self.map.csi_collect.byte_offset());
                encode(CsiEnable(enabled), buffer)
            }
            CommandId::ForceDeaf => self.trigger(radio, buffer, self.map.force_deaf),
            CommandId::ClearDeaf => self.trigger(radio, buffer, self.map.clean_deaf),
            CommandId::Setup => {
                radio.set_mpc(false);
                Ok(())
            }
            CommandId::DisableAgc => {
                with_register_access(phy, CarrierSearch::Suspend, agc::disable_agc);
                info!("agc disabled");
                Ok(())
            }
            CommandId::ForceGainLevel => {
                let id = decode::<GainPresetId>(buffer)?.preset();
                let console = &mut self.console;
                let applied = with_register_access(phy, CarrierSearch::Suspend, |access| {
                    gain::force_gain_level(access, id, console)
                });
                match applied {
                    Some(preset) => info!("gain preset {:?} applied", preset),
                    None => debug!("gain preset {} unknown, clip2 disabled only", id),
                }
                Ok(())
            }
            CommandId::SetMaxAnalogGain => {
                let AnalogGainLevel(level) = decode(buffer)?;
                with_register_access(phy, CarrierSearch::Suspend, |access| {
                    agc::set_max_analog_gain(access, level)
                });
                Ok(())
            }
            CommandId::ProgramGainLimitTables => {
                with_register_access(
                    phy,
                    CarrierSearch::Suspend,
                    gain::program_gain_limit_tables,
                );
                info!("gain limit tables programmed");
                Ok(())
            }
            CommandId::ConsolePrint => self.console_print(buffer),
            CommandId::ReadPhyRegister => {
                require_up(radio)?;
                read_phy_register(phy, buffer)
            }
            CommandId::WritePhyRegister => {
                require_up(radio)?;
                let write: PhyRegisterWrite = decode(buffer)?;
                with_register_access(phy, CarrierSearch::Keep, |access| {
                    access.write_raw(write.address as u16, write.value as u16)
                });
                Ok(())
            }
            CommandId::ReadPhyRegisterUnchecked => read_phy_register(phy, buffer),
        }
    }

    fn configure_csi<R>(&self, radio: &mut R, buffer: &[u8]) -> Result<(), Error>
    where
        R: RadioHandle + ?Sized,
    {
        // Applied even when the request is rejected below.
        radio.set_scan_suppress(true);
        radio.set_mpc(false);
        if let Ok(Chanspec(chanspec)) = decode(buffer) {
            radio.set_chanspec(chanspec);
        }

        require_up(radio)?;
        let config: CsiFilterConfig = decode(buffer)?;

        let map = self.map;
        let cells = [
            (map.csi_collect, u16::from(config.csi_collect)),
            (map.nss_mask, config.nss_mask()),
            (map.core_mask, config.core_mask()),
            (map.n_cmp_src_mac, config.n_mac_addr),
            (map.apply_pkt_filter, u16::from(config.use_pkt_filter)),
            (map.pkt_filter_byte, u16::from(config.first_pkt_byte)),
        ];
        let macs = map
            .cmp_src_mac
            .iter()
            .flatten()
            .copied()
            .zip(config.src_macs.iter().flatten().copied());

        for (cell, value) in cells
            .into_iter()
            .chain(macs)
            .chain([(map.fifo_delay, config.delay)])
        {
            radio.write_shm(cell.byte_offset(), value);
        }

        info!(
            "csi filter configured: collect={} chanspec={:#x}",
            config.csi_collect,
            config.chanspec
        );
        Ok(())
    }

    fn trigger<R>(&self, radio: &mut R, buffer: &[u8], cell: ShmCell) -> Result<(), Error>
    where
        R: RadioHandle + ?Sized,
    {
        require_up(radio)?;
        require_len(buffer, CELL_COMMAND_LEN)?;
        radio.write_shm(cell.byte_offset(), 1);
        Ok(())
    }

    fn console_print(&mut self, buffer: &mut [u8]) -> Result<(), Error> {
        let last = buffer.last_mut().ok_or(Error::BufferTooShort {
            required: 1,
            actual: 0,
        })?;
        *last = 0;

        let end = buffer.iter().position(|&b| b == 0).unwrap_or(buffer.len());
        for chunk in buffer[..end].utf8_chunks() {
            let _ = self.console.write_str(chunk.valid());
            if !chunk.invalid().is_empty() {
                let _ = self.console.write_char(char::REPLACEMENT_CHARACTER);
            }
        }
        let _ = self.console.write_char('\n');
        Ok(())
    }
}

fn require_up<R: RadioHandle + ?Sized>(radio: &R) -> Result<(), Error> {
    if radio.is_up() {
        Ok(())
    } else {
        Err(Error::DeviceDown)
    }
}

fn require_len(buffer: &[u8], required: usize) -> Result<(), Error> {
    if buffer.len() >= required {
        Ok(())
    } else {
        Err(Error::BufferTooShort {
            required,
            actual: buffer.len(),
        })
    }
}

fn read_phy_register<P>(phy: &mut P, buffer: &mut [u8]) -> Result<(), Error>
where
    P: PhyHandle + ?Sized,
{
    let address: PhyRegisterAddress = decode(buffer)?;
    let value = with_register_access(phy, CarrierSearch::Suspend, |access| {
        access.read_raw(address.register())
    });
    encode(PhyRegisterValue(i32::from(value)), buffer)
}

fn read_object_memory<R>(radio: &mut R, buffer: &mut [u8]) -> Result<(), Error>
where
    R: RadioHandle + ?Sized,
{
    radio.set_mpc(false);
    require_up(radio)?;
    let ObjectMemoryBase(base) = decode(buffer)?;

    for (offset, word) in (0u32..).zip(buffer.chunks_exact_mut(ObjectMemoryWord::SIZE)) {
        let value = radio.read_objmem32(base.wrapping_add(offset));
        encode(ObjectMemoryWord(value), word)?;
    }
    Ok(())
}
