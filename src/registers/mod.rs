//! PHY register definitions
//!
//! Registers of the 802.11ac PHY that the ioctl layer programs directly.
//! All registers are 16 bits wide and stored in native byte order.

/// Byte conversions for a register holding a plain 16-bit value.
macro_rules! impl_u16_register {
    ($reg:ident) => {
        impl FromByteArray for $reg {
            type Error = Infallible;
            type Array = [u8; 2];

            fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
                Ok(Self(u16::from_ne_bytes(bytes)))
            }
        }

        impl ToByteArray for $reg {
            type Error = Infallible;
            type Array = [u8; 2];

            fn to_bytes(self) -> Result<Self::Array, Self::Error> {
                Ok(self.0.to_ne_bytes())
            }
        }
    };
}

/// Byte conversions for a register wrapping a set of bit flags.
///
/// Bits without a named flag are retained.
macro_rules! impl_flag_register {
    ($reg:ident, $flags:ident) => {
        impl FromByteArray for $reg {
            type Error = Infallible;
            type Array = [u8; 2];

            fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
                Ok(Self($flags::from_bits_retain(u16::from_ne_bytes(bytes))))
            }
        }

        impl ToByteArray for $reg {
            type Error = Infallible;
            type Array = [u8; 2];

            fn to_bytes(self) -> Result<Self::Array, Self::Error> {
                Ok(self.0.bits().to_ne_bytes())
            }
        }
    };
}

mod agc;
mod clip;

pub use agc::*;
pub use clip::*;
