//! Memory access direction.
//!
//! Shared by the CPU-facing request signals and the memory port requests.

/// Direction of a CPU or memory transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessType {
    /// Data read; the responder returns a word.
    Read,

    /// Data write; the responder consumes a word.
    Write,
}

impl AccessType {
    /// Returns `true` for [`AccessType::Write`].
    #[inline(always)]
    pub const fn is_write(self) -> bool {
        matches!(self, Self::Write)
    }
}
