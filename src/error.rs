//! Status codes and error types
//!
//! Callers of the ioctl path only ever see a [`Status`]. Internally every
//! handler reports a typed [`Error`] so the reason for a rejection can be
//! logged before it is collapsed into [`Status::ERROR`].

/// Raw return code of an ioctl.
///
/// Handled commands only produce [`Status::SUCCESS`] or [`Status::ERROR`].
/// Commands forwarded to the fallback handler return whatever code that
/// handler produced, which is why this is not a two-variant enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status(pub i32);

impl Status {
    /// The command was serviced.
    pub const SUCCESS: Self = Self(0);
    /// The command was rejected and no hardware state was touched.
    pub const ERROR: Self = Self(-1);

    /// Returns `true` for [`Status::SUCCESS`].
    pub fn is_success(self) -> bool {
        self == Self::SUCCESS
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::ERROR
    }
}

impl From<Status> for i32 {
    fn from(status: Status) -> Self {
        status.0
    }
}

impl From<Result<(), Error>> for Status {
    fn from(result: Result<(), Error>) -> Self {
        match result {
            Ok(()) => Self::SUCCESS,
            Err(_) => Self::ERROR,
        }
    }
}

/// Reason a command was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The radio hardware is not up
    DeviceDown,
    /// The parameter buffer is shorter than the command's layout
    BufferTooShort {
        /// Bytes required by the layout
        required: usize,
        /// Bytes supplied by the caller
        actual: usize,
    },
    /// No address map exists for the named chip revision
    UnknownChipRevision,
    /// The chip revision is known but the firmware build is not
    UnsupportedFirmware,
}
