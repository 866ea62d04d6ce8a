//! Hardware boundary
//!
//! This module defines the primitives the ioctl layer is built on. None of
//! them are implemented here: on the chip they are the firmware's own
//! functions, in tests they are recording mocks.
//!
//! - [`RadioHandle`]: per-interface radio state (`wlc_info`), shared memory
//!   and object memory access
//! - [`PhyHandle`]: PHY register and table access (`phy_info`)
//! - [`FallbackHandler`]: the firmware's original ioctl handler
//!
//! Handles are always passed into [`Router::dispatch`](crate::Router::dispatch)
//! explicitly, nothing is looked up from global state.

use crate::Status;

/// Radio state owned by the firmware.
///
/// All methods are infallible. A primitive that fails leaves the firmware in
/// a state this layer cannot recover from.
pub trait RadioHandle {
    /// Whether the radio hardware is up and may be accessed.
    fn is_up(&self) -> bool;

    /// Suppresses (`true`) or allows (`false`) background channel scans.
    fn set_scan_suppress(&mut self, suppress: bool);

    /// Enables or disables minimum power consumption mode.
    fn set_mpc(&mut self, enabled: bool);

    /// Tunes the radio to a chanspec.
    fn set_chanspec(&mut self, chanspec: u16);

    /// Reads one 16-bit shared memory cell at a byte offset.
    fn read_shm(&mut self, byte_offset: u32) -> u16;

    /// Writes one 16-bit shared memory cell at a byte offset.
    fn write_shm(&mut self, byte_offset: u32, value: u16);

    /// Reads one 32-bit word of object memory, addressed in words.
    fn read_objmem32(&mut self, word_address: u32) -> u32;
}

/// PHY table identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TableId(pub u32);

impl TableId {
    /// Per-stage gain limits
    pub const GAIN_LIMIT: Self = Self(0x0b);
    /// Core 0 gain values in dB
    pub const GAIN0: Self = Self(0x44);
    /// Core 0 gain selector bits
    pub const GAIN_BITS0: Self = Self(0x45);
}

/// Stages of the receive gain control tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GainStage {
    /// External LNA
    Elna = 0,
    /// First LNA
    Lna1 = 1,
    /// Second LNA
    Lna2 = 2,
    /// Mixer / TIA
    Tia = 3,
    /// Biquad 0
    Bq0 = 4,
    /// Biquad 1
    Bq1 = 5,
    /// Digital VGA
    Dvga = 6,
}

/// Number of entries of each in-memory gain control stage
pub const GAIN_STAGE_ENTRIES: usize = 12;

/// PHY state owned by the firmware.
///
/// [`enter`](PhyHandle::enter) and [`exit`](PhyHandle::exit) bracket every
/// register sequence. Code in this crate never calls them directly, it goes
/// through [`RegisterAccess`](crate::phy::RegisterAccess) which pairs them.
pub trait PhyHandle {
    /// Acquires exclusive access to the PHY registers.
    fn enter(&mut self);

    /// Releases access acquired with [`enter`](PhyHandle::enter).
    fn exit(&mut self);

    /// Holds (`true`) or releases (`false`) the receive state machine in
    /// carrier search, which stops autonomous AGC activity.
    fn stay_in_carrier_search(&mut self, enable: bool);

    /// Reads a PHY register.
    fn read_register(&mut self, address: u16) -> u16;

    /// Writes a PHY register.
    fn write_register(&mut self, address: u16, value: u16);

    /// Read-modify-write of a PHY register.
    ///
    /// Implementations must store `(old & !mask) | (value & mask)`.
    fn modify_register(&mut self, address: u16, mask: u16, value: u16);

    /// Writes `data.len()` consecutive entries of `width` bits to a PHY table.
    fn write_table(&mut self, table: TableId, offset: u32, width: u32, data: &[u8]);

    /// Replaces one stage of the in-memory receive gain control tables.
    fn set_rx_gain_stage(
        &mut self,
        stage: GainStage,
        gains: &[i8; GAIN_STAGE_ENTRIES],
        gain_bits: &[u8; GAIN_STAGE_ENTRIES],
    );
}

/// The firmware's original ioctl handler.
///
/// Receives every command the router does not recognize, with the exact
/// buffer the router was given. It must handle or reject any command id.
pub trait FallbackHandler<R: ?Sized> {
    /// Handles a command.
    fn handle(&mut self, radio: &mut R, command: u32, buffer: &mut [u8]) -> Status;
}

impl<R, F> FallbackHandler<R> for F
where
    R: ?Sized,
    F: FnMut(&mut R, u32, &mut [u8]) -> Status,
{
    fn handle(&mut self, radio: &mut R, command: u32, buffer: &mut [u8]) -> Status {
        self(radio, command, buffer)
    }
}
