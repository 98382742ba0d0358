use num_enum::{FromPrimitive, IntoPrimitive};

// Numbering follows the TIFF SampleFormat tag so raw band buffers can be
// described with the same codes their container used.
#[derive(Debug, PartialEq, Clone, Copy, IntoPrimitive, FromPrimitive)]
#[repr(u16)]
pub enum SampleFormat {
    Unsigned = 1,
    Signed = 2,
    Float = 3,
    Undefined = 4,

    #[num_enum(default)]
    Unknown = 0xFFFF,
}
