//! Flag sets stored on descriptors.

bitflags::bitflags! {
    /// Structural classification of a type.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TypeFlags: u8 {
        /// Values are copied (structs, primitives, enums).
        const VALUE_TYPE = 1 << 0;
        /// Values are referenced (classes, interfaces, strings).
        const REFERENCE_TYPE = 1 << 1;
        /// Generic type: constructed from a definition plus type arguments.
        const GENERIC = 1 << 2;
        /// Nullable wrapper around a value type; see `underlying_type`.
        const NULLABLE = 1 << 3;
    }
}

impl TypeFlags {
    /// Build flags from the boolean columns of the population input.
    pub fn from_parts(
        is_value_type: bool,
        is_reference_type: bool,
        is_generic_type: bool,
        is_nullable: bool,
    ) -> Self {
        let mut flags = TypeFlags::empty();
        flags.set(TypeFlags::VALUE_TYPE, is_value_type);
        flags.set(TypeFlags::REFERENCE_TYPE, is_reference_type);
        flags.set(TypeFlags::GENERIC, is_generic_type);
        flags.set(TypeFlags::NULLABLE, is_nullable);
        flags
    }

    /// Value and reference classification are mutually exclusive.
    pub const fn is_ambiguous(self) -> bool {
        self.contains(TypeFlags::VALUE_TYPE.union(TypeFlags::REFERENCE_TYPE))
    }
}

bitflags::bitflags! {
    /// Which halves of a property exist on the declaring type.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PropertyAccess: u8 {
        const READ = 1 << 0;
        const WRITE = 1 << 1;
        const READ_WRITE = Self::READ.bits() | Self::WRITE.bits();
    }
}

impl PropertyAccess {
    pub fn from_parts(can_read: bool, can_write: bool) -> Self {
        let mut access = PropertyAccess::empty();
        access.set(PropertyAccess::READ, can_read);
        access.set(PropertyAccess::WRITE, can_write);
        access
    }
}
