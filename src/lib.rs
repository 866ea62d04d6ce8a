#![cfg_attr(not(test), no_std)]
//! CSI ioctl layer
//!
//! This crate implements the vendor ioctl extension used for channel state
//! information (CSI) extraction on Broadcom FullMAC radios (BCM4339,
//! BCM43455c0, BCM4358, BCM4366c0). It replaces the firmware's ioctl handler,
//! services a small set of extraction and PHY control commands, and hands
//! every other command to the original handler unchanged.
//!
//! # Architecture
//! The crate is organized into several modules:
//!
//! - [`router`]: the [`Router`] dispatching command ids to handlers
//!   - Checks preconditions (radio up, buffer length)
//!   - Collapses failures into [`Status::ERROR`]
//!
//! - [`address_map`]: per chip revision shared memory layouts
//!   - [`AddressMap`]: word offsets of the ucode's control cells
//!   - [`Target`]: supported chip and firmware builds
//!
//! - [`commands`]: command ids and positional parameter layouts
//!
//! - [`registers`]: typed PHY registers (AGC and clip detectors)
//!
//! - [`phy`]: the PHY control engine
//!   - [`phy::RegisterAccess`]: scoped exclusive register access
//!   - AGC overrides, clip detector presets and gain limit tables
//!
//! - [`device`]: the firmware primitives everything above is built on
//!
//! # Usage
//! Parameter layouts and registers use the `regiface` crate's
//! `FromByteArray` / `ToByteArray` traits. The firmware side supplies
//! implementations of [`RadioHandle`] and [`PhyHandle`] and keeps its old
//! handler as the [`FallbackHandler`].
//!
//! 1. Look up the [`Target`] for the chip and firmware build
//! 2. Create a [`Router`] with the original handler and a console sink
//! 3. Call [`Router::dispatch`] from the ioctl hook
//!
//! # Logging
//! Enable the `defmt` or the `log` feature to get rejection and
//! configuration messages. Without either feature logging compiles away.
//!
//! # Example
//! ```no_run
//! use csi_ioctl::{Error, PhyHandle, RadioHandle, Router, Status, Target};
//!
//! fn firmware_ioctl<R: RadioHandle>(_radio: &mut R, _command: u32, _buffer: &mut [u8]) -> Status {
//!     Status::ERROR
//! }
//!
//! fn ioctl<R: RadioHandle, P: PhyHandle>(
//!     radio: &mut R,
//!     phy: &mut P,
//!     command: u32,
//!     buffer: &mut [u8],
//! ) -> Result<Status, Error> {
//!     let target = Target::from_names("bcm43455c0", "7.45.189")?;
//!     let mut router = Router::new(target, firmware_ioctl::<R>, String::new());
//!
//!     Ok(router.dispatch(radio, phy, command, buffer))
//! }
//! ```

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod address_map;
pub mod commands;
pub mod device;
pub mod error;
pub mod phy;
pub mod registers;
pub mod router;

#[cfg(test)]
pub(crate) mod testing;

pub use address_map::{AddressMap, ChipRevision, Target};
pub use commands::*;
pub use device::{FallbackHandler, GainStage, PhyHandle, RadioHandle, TableId};
pub use error::{Error, Status};
pub use registers::*;
pub use router::Router;
