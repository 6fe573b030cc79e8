mod header;

pub use header::*;

use crate::address::BankLayout;

/// An immutable ROM image, read once and owned for the length of a run.
#[derive(Debug, Clone)]
pub struct RomImage {
    bytes: Box<[u8]>,
    container: Container,
}

impl RomImage {
    pub fn new(bytes: impl Into<Box<[u8]>>) -> Self {
        let bytes = bytes.into();
        let container = Container::detect(&bytes);
        Self { bytes, container }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    /// Bank layout implied by the container header.
    pub fn detect_layout(&self) -> BankLayout {
        self.container.bank_layout()
    }

    /// Bytes `offset..offset + len`, if entirely inside the image.
    pub fn slice(&self, offset: usize, len: usize) -> Option<&[u8]> {
        let end = offset.checked_add(len)?;
        self.bytes.get(offset..end)
    }
}

impl AsRef<[u8]> for RomImage {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl From<Vec<u8>> for RomImage {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}
