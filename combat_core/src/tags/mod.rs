//! Damage classification tags
//!
//! - [`Tag`]: the closed enumeration of classifications
//! - [`TagSet`]: a bitmask set of tags carried by a single damage instance
//! - [`TagTable`]: a fixed array of per-tag modifier values

mod table;

pub use table::TagTable;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification attached to a damage instance
///
/// `All` sits at index 0 and acts as a wildcard: its entry in every
/// [`TagTable`] applies to every hit regardless of the hit's tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Tag {
    All = 0,
    CriticalHit,
    NotCritical,
    /// Suppresses the damage-applied event and everything downstream of it
    NotTakeEvent,
    Melee,
    Ranged,
    Skill,
    NormalAttack,
    Physical,
    Magical,
    Fire,
    Ice,
    Lightning,
    Poison,
    Explosion,
    DamageOverTime,
    Reflect,
    Summon,
}

impl Tag {
    /// Number of tags in the enumeration
    pub const COUNT: usize = 18;

    /// Every tag in enumeration order
    pub const ALL: [Tag; Tag::COUNT] = [
        Tag::All,
        Tag::CriticalHit,
        Tag::NotCritical,
        Tag::NotTakeEvent,
        Tag::Melee,
        Tag::Ranged,
        Tag::Skill,
        Tag::NormalAttack,
        Tag::Physical,
        Tag::Magical,
        Tag::Fire,
        Tag::Ice,
        Tag::Lightning,
        Tag::Poison,
        Tag::Explosion,
        Tag::DamageOverTime,
        Tag::Reflect,
        Tag::Summon,
    ];

    /// Position of this tag in the enumeration (and in every [`TagTable`])
    pub fn index(self) -> usize {
        self as usize
    }

    fn bits(self) -> TagBits {
        TagBits::from_bits_retain(1u64 << self.index())
    }
}

bitflags! {
    /// Raw mask storage behind [`TagSet`], one bit per [`Tag`] index
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    struct TagBits: u64 {
        const ALL = 1 << 0;
        const CRITICAL_HIT = 1 << 1;
        const NOT_CRITICAL = 1 << 2;
        const NOT_TAKE_EVENT = 1 << 3;
        const MELEE = 1 << 4;
        const RANGED = 1 << 5;
        const SKILL = 1 << 6;
        const NORMAL_ATTACK = 1 << 7;
        const PHYSICAL = 1 << 8;
        const MAGICAL = 1 << 9;
        const FIRE = 1 << 10;
        const ICE = 1 << 11;
        const LIGHTNING = 1 << 12;
        const POISON = 1 << 13;
        const EXPLOSION = 1 << 14;
        const DAMAGE_OVER_TIME = 1 << 15;
        const REFLECT = 1 << 16;
        const SUMMON = 1 << 17;
    }
}

/// Set of tags attached to one damage instance
///
/// Copying a `TagSet` copies the mask; two copies never alias.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagSet(TagBits);

impl TagSet {
    /// The empty set
    pub fn none() -> Self {
        TagSet(TagBits::empty())
    }

    /// Build a set from a slice of tags
    pub fn of(tags: &[Tag]) -> Self {
        tags.iter().copied().collect()
    }

    pub fn add(&mut self, tag: Tag) -> &mut Self {
        self.0.insert(tag.bits());
        self
    }

    pub fn add_many(&mut self, tags: impl IntoIterator<Item = Tag>) -> &mut Self {
        for tag in tags {
            self.0.insert(tag.bits());
        }
        self
    }

    pub fn remove(&mut self, tag: Tag) -> &mut Self {
        self.0.remove(tag.bits());
        self
    }

    /// By-value builder form of [`TagSet::add`]
    pub fn with(mut self, tag: Tag) -> Self {
        self.add(tag);
        self
    }

    pub fn contains(&self, tag: Tag) -> bool {
        self.0.contains(tag.bits())
    }

    pub fn to_mask(&self) -> u64 {
        self.0.bits()
    }

    /// Tags in the set, in ascending enumeration order
    pub fn iter(&self) -> impl Iterator<Item = Tag> + '_ {
        Tag::ALL.iter().copied().filter(move |tag| self.contains(*tag))
    }

    /// Tags in the set excluding the `All` wildcard
    pub(crate) fn specific(&self) -> impl Iterator<Item = Tag> + '_ {
        self.iter().filter(|tag| *tag != Tag::All)
    }

    pub fn len(&self) -> usize {
        self.0.bits().count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Tag> for TagSet {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        let mut set = TagSet::none();
        set.add_many(iter);
        set
    }
}

impl From<Tag> for TagSet {
    fn from(tag: Tag) -> Self {
        TagSet::none().with(tag)
    }
}

impl fmt::Debug for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
