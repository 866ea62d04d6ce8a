//! Chip revision specific layout
//!
//! The CSI extraction ucode keeps its control state in shared memory. The
//! logical cells are the same on every supported chip, only the word offsets
//! differ. One [`AddressMap`] exists per layout and a [`ChipRevision`] selects
//! it. [`Target`] additionally records where the ioctl hook is attached in
//! each supported firmware build.

use core::str::FromStr;

use crate::Error;

/// Number of source MAC addresses the ucode can filter on
pub const MAX_SRC_MAC_FILTERS: usize = 4;

/// A 16-bit shared memory cell, addressed by word offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ShmCell(u16);

impl ShmCell {
    /// Creates a cell from its word offset.
    pub const fn new(word_offset: u16) -> Self {
        Self(word_offset)
    }

    /// Word offset as used by the ucode.
    pub const fn word_offset(self) -> u16 {
        self.0
    }

    /// Byte offset as expected by the shared memory primitives.
    pub const fn byte_offset(self) -> u32 {
        self.0 as u32 * 2
    }
}

/// Shared memory layout of the CSI extraction ucode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressMap {
    /// CSI collection enable flag
    pub csi_collect: ShmCell,
    /// Spatial stream mask
    pub nss_mask: ShmCell,
    /// Receive core mask
    pub core_mask: ShmCell,
    /// First byte packet filter enable
    pub apply_pkt_filter: ShmCell,
    /// Frame control byte the packet filter compares against
    pub pkt_filter_byte: ShmCell,
    /// Number of active source MAC filters
    pub n_cmp_src_mac: ShmCell,
    /// Source MAC filters, three 16-bit words each
    pub cmp_src_mac: [[ShmCell; 3]; MAX_SRC_MAC_FILTERS],
    /// Writing 1 forces the receiver deaf
    pub force_deaf: ShmCell,
    /// Writing 1 clears a forced deaf state
    pub clean_deaf: ShmCell,
    /// Delay between two extractions in microseconds
    pub fifo_delay: ShmCell,
}

impl AddressMap {
    /// Layout shared by the BCM4339, BCM43455c0 and BCM4358 ucode.
    pub const D11AC: AddressMap = AddressMap {
        csi_collect: ShmCell(0x8b0),
        nss_mask: ShmCell(0x8a6),
        core_mask: ShmCell(0x8a7),
        apply_pkt_filter: ShmCell(0x898),
        pkt_filter_byte: ShmCell(0x899),
        n_cmp_src_mac: ShmCell(0x888),
        cmp_src_mac: [
            [ShmCell(0x889), ShmCell(0x88a), ShmCell(0x88b)],
            [ShmCell(0x88c), ShmCell(0x88d), ShmCell(0x88e)],
            [ShmCell(0x88f), ShmCell(0x890), ShmCell(0x891)],
            [ShmCell(0x892), ShmCell(0x893), ShmCell(0x894)],
        ],
        force_deaf: ShmCell(0x8a4),
        clean_deaf: ShmCell(0x8a3),
        fifo_delay: ShmCell(0x89e),
    };

    /// Layout of the BCM4366c0 ucode. Cells are packed from 0xB80 upwards.
    pub const BCM4366C0: AddressMap = AddressMap {
        csi_collect: ShmCell(0xb80),
        nss_mask: ShmCell(0xb81),
        core_mask: ShmCell(0xb82),
        apply_pkt_filter: ShmCell(0xb83),
        pkt_filter_byte: ShmCell(0xb84),
        n_cmp_src_mac: ShmCell(0xb85),
        cmp_src_mac: [
            [ShmCell(0xb86), ShmCell(0xb87), ShmCell(0xb88)],
            [ShmCell(0xb89), ShmCell(0xb8a), ShmCell(0xb8b)],
            [ShmCell(0xb8c), ShmCell(0xb8d), ShmCell(0xb8e)],
            [ShmCell(0xb8f), ShmCell(0xb90), ShmCell(0xb91)],
        ],
        force_deaf: ShmCell(0xb92),
        clean_deaf: ShmCell(0xb93),
        fifo_delay: ShmCell(0xb94),
    };

    /// Returns the layout used by `revision`.
    pub const fn for_revision(revision: ChipRevision) -> &'static AddressMap {
        match revision {
            ChipRevision::Bcm4366c0 => &Self::BCM4366C0,
            ChipRevision::Bcm4339 | ChipRevision::Bcm43455c0 | ChipRevision::Bcm4358 => {
                &Self::D11AC
            }
        }
    }

    /// All cells in the map, in declaration order.
    pub fn cells(&self) -> impl Iterator<Item = ShmCell> + '_ {
        [
            self.csi_collect,
            self.nss_mask,
            self.core_mask,
            self.apply_pkt_filter,
            self.pkt_filter_byte,
            self.n_cmp_src_mac,
        ]
        .into_iter()
        .chain(self.cmp_src_mac.iter().flatten().copied())
        .chain([self.force_deaf, self.clean_deaf, self.fifo_delay])
    }
}

/// Supported chip revisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChipRevision {
    /// BCM4339 (Nexus 5)
    Bcm4339,
    /// BCM43455c0 (Raspberry Pi 3B+/4)
    Bcm43455c0,
    /// BCM4358 (Nexus 6P)
    Bcm4358,
    /// BCM4366c0 (Asus RT-AC86U)
    Bcm4366c0,
}

impl ChipRevision {
    /// Canonical lower case name, e.g. `bcm43455c0`.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bcm4339 => "bcm4339",
            Self::Bcm43455c0 => "bcm43455c0",
            Self::Bcm4358 => "bcm4358",
            Self::Bcm4366c0 => "bcm4366c0",
        }
    }
}

impl FromStr for ChipRevision {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            Self::Bcm4339,
            Self::Bcm43455c0,
            Self::Bcm4358,
            Self::Bcm4366c0,
        ]
        .into_iter()
        .find(|revision| revision.name().eq_ignore_ascii_case(s))
        .ok_or(Error::UnknownChipRevision)
    }
}

/// Firmware entry points of the PHY primitives the engine calls into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhyEntryPoints {
    /// `phy_utils_read_phyreg`
    pub read_phyreg: u32,
    /// `phy_utils_mod_phyreg`
    pub mod_phyreg: u32,
    /// `wlc_phy_table_read_acphy`
    pub table_read: u32,
    /// `wlc_phy_table_write_acphy`
    pub table_write: u32,
}

/// A supported chip and firmware build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    /// Chip revision, selects the [`AddressMap`]
    pub revision: ChipRevision,
    /// Firmware version string as reported by the chip
    pub firmware: &'static str,
    /// Address of the ioctl handler the hook replaces
    pub hook_address: u32,
    /// PHY primitive entry points, where they are not exported by the firmware
    pub phy_entry_points: Option<PhyEntryPoints>,
}

/// All supported targets
pub static TARGETS: [Target; 4] = [
    Target {
        revision: ChipRevision::Bcm4339,
        firmware: "6.37.32.RC23.34.43 (r639704)",
        hook_address: 0x1f_3488,
        phy_entry_points: None,
    },
    Target {
        revision: ChipRevision::Bcm43455c0,
        firmware: "7.45.189",
        hook_address: 0x20_cd80,
        phy_entry_points: Some(PhyEntryPoints {
            read_phyreg: 0x1d_f5a8,
            mod_phyreg: 0x1e_2dd8,
            table_read: 0x1d_4210,
            table_write: 0x1d_2c20,
        }),
    },
    Target {
        revision: ChipRevision::Bcm4358,
        firmware: "7.112.300.14",
        hook_address: 0x1f_3230,
        phy_entry_points: None,
    },
    Target {
        revision: ChipRevision::Bcm4366c0,
        firmware: "10.10.122.20",
        hook_address: 0x2f_0cf8,
        phy_entry_points: None,
    },
];

impl Target {
    /// Looks up the target for a chip revision and firmware version.
    ///
    /// # Errors
    /// * [`Error::UnsupportedFirmware`] - the chip is known, the firmware build is not
    pub fn lookup(revision: ChipRevision, firmware: &str) -> Result<&'static Target, Error> {
        TARGETS
            .iter()
            .find(|target| target.revision == revision && target.firmware == firmware)
            .ok_or(Error::UnsupportedFirmware)
    }

    /// Parses a chip revision name and looks up the matching target.
    ///
    /// # Errors
    /// * [`Error::UnknownChipRevision`] - no address map exists for `chip`
    /// * [`Error::UnsupportedFirmware`] - the firmware build is not supported
    pub fn from_names(chip: &str, firmware: &str) -> Result<&'static Target, Error> {
        Self::lookup(chip.parse()?, firmware)
    }

    /// Shared memory layout for this target.
    pub const fn address_map(&self) -> &'static AddressMap {
        AddressMap::for_revision(self.revision)
    }
}
