use thiserror::Error;

/// Malformed bank/CPU address input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error(
        "CPU address ${cpu_address:04X} is outside the banked window ${window_start:04X}-${window_end:04X}"
    )]
    OutsideWindow {
        cpu_address: u16,
        window_start: u16,
        window_end: u16,
    },

    #[error("File offset {offset:#x} is beyond the image ({image_len:#x} bytes)")]
    BeyondImage { offset: usize, image_len: usize },

    #[error("Bank size must be non-zero")]
    ZeroBankSize,
}

/// Confirm-mode failures. Discovery never produces these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocateError {
    #[error("Record at {offset:#x} (stride {stride}) runs past the image ({image_len:#x} bytes)")]
    OutOfBounds {
        offset: usize,
        stride: usize,
        image_len: usize,
    },

    #[error("No plausible record at {offset:#x}")]
    EmptyTable { offset: usize },

    #[error("Only {found} plausible record(s) at {offset:#x}, at least {required} required")]
    RunTooShort {
        offset: usize,
        found: usize,
        required: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("Record truncated: need {needed} bytes, got {available}")]
    Truncated { needed: usize, available: usize },

    #[error("Record has no field '{field}'")]
    MissingField { field: String },

    #[error("Field '{field}' does not fit in the {stride}-byte record")]
    FieldOutOfRange { field: String, stride: usize },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Address(#[from] AddressError),

    #[error(transparent)]
    Locate(#[from] LocateError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped_errors_are_transparent() {
        let err: Error = LocateError::EmptyTable { offset: 0x10 }.into();
        assert_eq!(err.to_string(), "No plausible record at 0x10");

        let err: Error = CodecError::FieldOutOfRange {
            field: "hp".to_string(),
            stride: 2,
        }
        .into();
        assert!(matches!(err, Error::Codec(_)));
    }

    #[test]
    fn test_address_error_message() {
        let err = AddressError::OutsideWindow {
            cpu_address: 0x7FFF,
            window_start: 0x8000,
            window_end: 0xBFFF,
        };
        assert_eq!(
            err.to_string(),
            "CPU address $7FFF is outside the banked window $8000-$BFFF"
        );
    }
}
