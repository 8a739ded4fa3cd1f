use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident($inner:ty), $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(pub $inner);

        impl $name {
            pub const fn new(value: $inner) -> Self {
                Self(value)
            }

            /// Returns the identifier that follows this one in allocation order.
            pub const fn next(self) -> Self {
                Self(self.0 + 1)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

define_id!(
    /// Identity of a participant (a wallet, an account, a seat).
    PlayerId(u64),
    "player#"
);

define_id!(
    /// Identity of a minted monster instance.
    MonsterId(u32),
    "monster#"
);

define_id!(
    /// Catalog key of a monster type.
    MonsterTypeId(u32),
    "type#"
);

define_id!(
    /// Catalog key of a skill.
    SkillId(u32),
    "skill#"
);

define_id!(
    /// Sequential battle identifier.
    BattleId(u64),
    "battle#"
);

define_id!(
    /// Sequential tournament identifier.
    TournamentId(u64),
    "tournament#"
);

impl PlayerId {
    /// Reserved identity for mutations the rules perform on their own behalf
    /// (battle rewards, health restoration). Never assigned to a participant.
    pub const SYSTEM: Self = Self(u64::MAX);

    /// Returns true if this identity is the reserved system caller.
    #[inline]
    pub const fn is_system(self) -> bool {
        self.0 == Self::SYSTEM.0
    }
}
