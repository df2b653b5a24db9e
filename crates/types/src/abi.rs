use core::fmt;

/// Raw wire value crossing a box boundary. Arguments, results and error
/// codes all travel as words; negative results are negated error codes.
pub type Word = i32;

/// Index into a box's export table.
///
/// Slot numbers are a build-time ABI contract between the two sides of a
/// boundary; changing the set or order of exports requires regenerating both
/// the table and its callers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ExportSlot(pub usize);

impl ExportSlot {
    /// Reserved: the box's post-initialization entry.
    pub const POSTINIT: ExportSlot = ExportSlot(0);
}

impl fmt::Display for ExportSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "export[{}]", self.0)
    }
}

/// Index into a box's import table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ImportSlot(pub usize);

impl ImportSlot {
    /// Reserved: the abort entry. Must not return.
    pub const ABORT: ImportSlot = ImportSlot(0);
    /// Reserved: minimal stdout shim.
    pub const WRITE: ImportSlot = ImportSlot(1);
    /// Reserved: minimal stdout shim.
    pub const FLUSH: ImportSlot = ImportSlot(2);
    /// First slot available for environment-specific imports.
    pub const EXTRA_BASE: usize = 3;
}

impl fmt::Display for ImportSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "import[{}]", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_slots() {
        assert_eq!(ExportSlot::POSTINIT.0, 0);
        assert_eq!(ImportSlot::ABORT.0, 0);
        assert_eq!(ImportSlot::WRITE.0, 1);
        assert_eq!(ImportSlot::FLUSH.0, 2);
        assert_eq!(ImportSlot::EXTRA_BASE, 3);
    }
}
