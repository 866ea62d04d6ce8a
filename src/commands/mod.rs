//! Ioctl command identifiers and parameter layouts
//!
//! Every command handled by the [`Router`](crate::Router) has a fixed,
//! positional parameter layout in native byte order:
//!
//! - [`csi`]: CSI filter configuration, enable flag read back
//! - [`phy`]: PHY register access and gain control parameters
//! - [`memory`]: object memory reads
//!
//! Layouts implement `regiface`'s [`FromByteArray`] (request parameters) or
//! [`ToByteArray`] (results written back into the caller's buffer). The
//! buffer a caller passes may be longer than the layout, never shorter.

use core::convert::Infallible;

use regiface::{ByteArray, FromByteArray, ToByteArray};

use crate::Error;

mod csi;
mod memory;
mod phy;

pub use csi::*;
pub use memory::*;
pub use phy::*;

/// Error for command ids that are not serviced by this layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnknownCommand(pub u32);

/// Command ids serviced by this layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandId {
    /// Bulk read of object memory words
    ReadObjectMemory = 406,
    /// Configure CSI extraction, see [`CsiFilterConfig`]
    ConfigureCsi = 500,
    /// Read the CSI collection enable flag, see [`CsiEnable`]
    ReadCsiEnable = 501,
    /// Force the receiver deaf
    ForceDeaf = 502,
    /// Clear a forced deaf state
    ClearDeaf = 503,
    /// Disable minimum power consumption mode
    Setup = 540,
    /// Switch off the AGC
    DisableAgc = 541,
    /// Apply a clip detector preset, see [`GainPresetId`]
    ForceGainLevel = 545,
    /// Set the analog gain ceiling, see [`AnalogGainLevel`]
    SetMaxAnalogGain = 546,
    /// Program the gain limit tables
    ProgramGainLimitTables = 548,
    /// Print a NUL terminated string to the console
    ConsolePrint = 610,
    /// Read a PHY register, radio must be up
    ReadPhyRegister = 611,
    /// Write a PHY register, see [`PhyRegisterWrite`]
    WritePhyRegister = 612,
    /// Read a PHY register without checking the radio state
    ReadPhyRegisterUnchecked = 613,
}

impl TryFrom<u32> for CommandId {
    type Error = UnknownCommand;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            406 => Ok(Self::ReadObjectMemory),
            500 => Ok(Self::ConfigureCsi),
            501 => Ok(Self::ReadCsiEnable),
            502 => Ok(Self::ForceDeaf),
            503 => Ok(Self::ClearDeaf),
            540 => Ok(Self::Setup),
            541 => Ok(Self::DisableAgc),
            545 => Ok(Self::ForceGainLevel),
            546 => Ok(Self::SetMaxAnalogGain),
            548 => Ok(Self::ProgramGainLimitTables),
            610 => Ok(Self::ConsolePrint),
            611 => Ok(Self::ReadPhyRegister),
            612 => Ok(Self::WritePhyRegister),
            613 => Ok(Self::ReadPhyRegisterUnchecked),
            unknown => Err(UnknownCommand(unknown)),
        }
    }
}

impl From<CommandId> for u32 {
    fn from(id: CommandId) -> Self {
        id as u32
    }
}

/// Decodes a parameter layout from the start of `buffer`.
///
/// # Errors
/// * [`Error::BufferTooShort`] - `buffer` does not hold the whole layout
pub fn decode<P>(buffer: &[u8]) -> Result<P, Error>
where
    P: FromByteArray<Error = Infallible>,
{
    let mut raw = P::Array::new();
    let required = raw.as_ref().len();
    let bytes = buffer.get(..required).ok_or(Error::BufferTooShort {
        required,
        actual: buffer.len(),
    })?;
    raw.as_mut().copy_from_slice(bytes);

    match P::from_bytes(raw) {
        Ok(parameters) => Ok(parameters),
        Err(never) => match never {},
    }
}

/// Encodes a result layout into the start of `buffer`.
///
/// Nothing is written if `buffer` is too short.
///
/// # Errors
/// * [`Error::BufferTooShort`] - `buffer` cannot hold the whole layout
pub fn encode<P>(value: P, buffer: &mut [u8]) -> Result<(), Error>
where
    P: ToByteArray<Error = Infallible>,
{
    let raw = match value.to_bytes() {
        Ok(raw) => raw,
        Err(never) => match never {},
    };
    let raw = raw.as_ref();
    let actual = buffer.len();
    buffer
        .get_mut(..raw.len())
        .ok_or(Error::BufferTooShort {
            required: raw.len(),
            actual,
        })?
        .copy_from_slice(raw);
    Ok(())
}
