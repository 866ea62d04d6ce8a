//! Object memory parameters

use core::convert::Infallible;

use regiface::{FromByteArray, ToByteArray};

/// Word address the read starts at (ReadObjectMemory request, 4 bytes)
///
/// The request buffer is reused for the result: every further 4 bytes of the
/// buffer receive one more [`ObjectMemoryWord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ObjectMemoryBase(pub u32);

impl FromByteArray for ObjectMemoryBase {
    type Error = Infallible;
    type Array = [u8; 4];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self(u32::from_ne_bytes(bytes)))
    }
}

/// One word of object memory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ObjectMemoryWord(pub u32);

impl ObjectMemoryWord {
    /// Size of a word in the result buffer.
    pub const SIZE: usize = 4;
}

impl ToByteArray for ObjectMemoryWord {
    type Error = Infallible;
    type Array = [u8; ObjectMemoryWord::SIZE];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok(self.0.to_ne_bytes())
    }
}
