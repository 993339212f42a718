//! Seed patterns: which group placement goes into which first-round bracket slot.
//!
//! The template is static data. Range tokens ("a group from 17-32") are resolved to
//! concrete group numbers once per tournament by [`PatternTemplate::materialize`];
//! the resulting [`KnockoutPatterns`] is stored with the tournament and never drawn again.

use crate::models::bracket::KnockoutRound;
use crate::models::tournament::ScheduleError;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which group a template slot draws its player from.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupToken {
    Group(u32),
    /// Some group in `first..=last`, decided when the template is materialized.
    Range { first: u32, last: u32 },
    /// Structurally empty slot.
    Bye,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SlotTemplate {
    pub rank: u32,
    pub group: GroupToken,
}

const fn at(rank: u32, group: u32) -> SlotTemplate {
    SlotTemplate { rank, group: GroupToken::Group(group) }
}

const fn pick(rank: u32, first: u32, last: u32) -> SlotTemplate {
    SlotTemplate { rank, group: GroupToken::Range { first, last } }
}

const fn bye(rank: u32) -> SlotTemplate {
    SlotTemplate { rank, group: GroupToken::Bye }
}

const BRACKET_64_BYES_0: &[[SlotTemplate; 2]] = &[
    [at(1, 1), pick(2, 17, 32)],
    [pick(2, 1, 16), pick(1, 17, 32)],
    [pick(1, 17, 32), pick(2, 1, 16)],
    [pick(2, 17, 32), pick(1, 9, 16)],
    [pick(1, 9, 16), pick(2, 17, 32)],
    [pick(2, 1, 16), pick(1, 17, 32)],
    [pick(1, 17, 32), pick(2, 1, 16)],
    [pick(2, 17, 32), pick(1, 5, 8)],
    [pick(1, 5, 8), pick(2, 17, 32)],
    [pick(2, 1, 16), pick(1, 17, 32)],
    [pick(1, 17, 32), pick(2, 1, 16)],
    [pick(2, 17, 32), pick(1, 9, 16)],
    [pick(1, 9, 16), pick(2, 17, 32)],
    [pick(2, 1, 16), pick(1, 17, 32)],
    [pick(1, 17, 32), pick(2, 1, 16)],
    [pick(2, 17, 32), pick(1, 3, 4)],
    [pick(1, 3, 4), pick(2, 17, 32)],
    [pick(2, 1, 16), pick(1, 17, 32)],
    [pick(1, 17, 32), pick(2, 1, 16)],
    [pick(2, 17, 32), pick(1, 9, 16)],
    [pick(1, 9, 16), pick(2, 17, 32)],
    [pick(2, 1, 16), pick(1, 17, 32)],
    [pick(1, 17, 32), pick(2, 1, 16)],
    [pick(2, 17, 32), pick(1, 5, 8)],
    [pick(1, 5, 8), pick(2, 17, 32)],
    [pick(2, 1, 16), pick(1, 17, 32)],
    [pick(1, 17, 32), pick(2, 1, 16)],
    [pick(2, 17, 32), pick(1, 9, 16)],
    [pick(1, 9, 16), pick(2, 17, 32)],
    [pick(2, 1, 16), pick(1, 17, 32)],
    [pick(1, 17, 32), pick(2, 1, 16)],
    [pick(2, 17, 32), at(1, 2)],
];

const BRACKET_64_BYES_4: &[[SlotTemplate; 2]] = &[
    [at(1, 1), bye(2)],
    [at(2, 2), pick(2, 17, 30)],
    [pick(1, 17, 30), pick(2, 1, 16)],
    [pick(2, 17, 30), pick(1, 9, 16)],
    [pick(1, 9, 16), pick(2, 17, 30)],
    [pick(2, 1, 16), pick(1, 17, 30)],
    [pick(1, 17, 30), pick(2, 1, 16)],
    [pick(2, 17, 30), pick(1, 5, 8)],
    [pick(1, 5, 8), pick(2, 17, 30)],
    [pick(2, 1, 16), pick(1, 17, 30)],
    [pick(1, 17, 30), pick(2, 1, 16)],
    [pick(2, 17, 30), pick(1, 9, 16)],
    [pick(1, 9, 16), pick(2, 17, 30)],
    [pick(2, 1, 16), pick(1, 17, 30)],
    [pick(1, 17, 30), pick(2, 1, 16)],
    [bye(2), pick(1, 3, 4)],
    [pick(1, 3, 4), bye(2)],
    [pick(2, 1, 16), pick(1, 17, 30)],
    [pick(1, 17, 30), pick(2, 1, 16)],
    [pick(2, 17, 30), pick(1, 9, 16)],
    [pick(1, 9, 16), pick(2, 17, 30)],
    [pick(2, 1, 16), pick(1, 17, 30)],
    [pick(1, 17, 30), pick(2, 1, 16)],
    [pick(2, 17, 30), pick(1, 5, 8)],
    [pick(1, 5, 8), pick(2, 17, 30)],
    [pick(2, 1, 16), pick(1, 17, 30)],
    [pick(1, 17, 30), pick(2, 1, 16)],
    [pick(2, 17, 30), pick(1, 9, 16)],
    [pick(1, 9, 16), pick(2, 17, 30)],
    [pick(2, 1, 16), pick(1, 17, 30)],
    [pick(2, 17, 30), pick(2, 1, 16)],
    [bye(2), at(1, 2)],
];

const BRACKET_64_BYES_8: &[[SlotTemplate; 2]] = &[
    [at(1, 1), bye(2)],
    [pick(2, 1, 16), pick(2, 17, 28)],
    [pick(1, 17, 28), pick(2, 1, 16)],
    [pick(2, 17, 28), pick(1, 9, 16)],
    [pick(1, 9, 16), pick(2, 17, 28)],
    [pick(2, 1, 16), pick(1, 17, 28)],
    [pick(1, 17, 28), pick(2, 1, 16)],
    [bye(2), pick(1, 5, 8)],
    [pick(1, 5, 8), bye(2)],
    [pick(2, 1, 16), pick(1, 17, 28)],
    [pick(1, 17, 28), pick(2, 1, 16)],
    [pick(2, 17, 28), pick(1, 9, 16)],
    [pick(1, 9, 16), pick(2, 17, 28)],
    [pick(2, 1, 16), pick(1, 17, 28)],
    [pick(2, 17, 28), pick(2, 1, 16)],
    [bye(2), pick(1, 3, 4)],
    [pick(1, 3, 4), bye(2)],
    [pick(2, 1, 16), pick(2, 17, 28)],
    [pick(1, 17, 28), pick(2, 1, 16)],
    [pick(2, 17, 28), pick(1, 9, 16)],
    [pick(1, 9, 16), pick(2, 17, 28)],
    [pick(2, 1, 16), pick(1, 17, 28)],
    [pick(1, 17, 28), pick(2, 1, 16)],
    [bye(2), pick(1, 5, 8)],
    [pick(1, 5, 8), bye(2)],
    [pick(2, 1, 16), pick(1, 17, 28)],
    [pick(1, 17, 28), pick(2, 1, 16)],
    [pick(2, 17, 28), pick(1, 9, 16)],
    [pick(1, 9, 16), pick(2, 17, 28)],
    [pick(2, 1, 16), pick(1, 17, 28)],
    [pick(2, 17, 28), pick(2, 1, 16)],
    [bye(2), at(1, 2)],
];

const BRACKET_32_BYES_0: &[[SlotTemplate; 2]] = &[
    [at(1, 1), pick(2, 9, 16)],
    [pick(2, 1, 8), pick(1, 9, 16)],
    [pick(1, 9, 16), pick(2, 1, 8)],
    [pick(2, 9, 16), pick(1, 5, 8)],
    [pick(1, 5, 8), pick(2, 9, 16)],
    [pick(2, 1, 8), pick(1, 9, 16)],
    [pick(1, 9, 16), pick(2, 1, 8)],
    [pick(2, 9, 16), pick(1, 3, 4)],
    [pick(1, 3, 4), pick(2, 9, 16)],
    [pick(2, 1, 8), pick(1, 9, 16)],
    [pick(1, 9, 16), pick(2, 1, 8)],
    [pick(2, 9, 16), pick(1, 5, 8)],
    [pick(1, 5, 8), pick(2, 9, 16)],
    [pick(2, 1, 8), pick(1, 9, 16)],
    [pick(1, 9, 16), pick(2, 1, 8)],
    [pick(2, 9, 16), at(1, 2)],
];

const BRACKET_32_BYES_6: &[[SlotTemplate; 2]] = &[
    [at(1, 1), bye(2)],
    [pick(2, 1, 8), pick(2, 9, 13)],
    [pick(1, 9, 13), pick(2, 1, 8)],
    [bye(2), pick(1, 5, 8)],
    [pick(1, 5, 8), pick(2, 9, 13)],
    [pick(2, 1, 8), pick(1, 9, 13)],
    [pick(2, 9, 13), pick(2, 1, 8)],
    [bye(2), pick(1, 3, 4)],
    [pick(1, 3, 4), bye(2)],
    [pick(2, 1, 8), pick(1, 9, 13)],
    [pick(1, 9, 13), pick(2, 1, 8)],
    [pick(2, 9, 13), pick(1, 5, 8)],
    [pick(1, 5, 8), bye(2)],
    [pick(2, 1, 8), pick(1, 9, 13)],
    [pick(2, 9, 13), pick(2, 1, 8)],
    [bye(2), at(1, 2)],
];

const BRACKET_16_BYES_0: &[[SlotTemplate; 2]] = &[
    [at(1, 1), pick(2, 5, 8)],
    [pick(2, 1, 4), pick(1, 5, 8)],
    [pick(1, 5, 8), pick(2, 1, 4)],
    [pick(2, 5, 8), pick(1, 3, 4)],
    [pick(1, 3, 4), pick(2, 5, 8)],
    [pick(2, 1, 4), pick(1, 5, 8)],
    [pick(1, 5, 8), pick(2, 1, 4)],
    [pick(2, 5, 8), at(1, 2)],
];

const BRACKET_16_BYES_4: &[[SlotTemplate; 2]] = &[
    [at(1, 1), bye(2)],
    [at(2, 2), at(2, 3)],
    [at(1, 5), at(2, 6)],
    [bye(2), at(1, 4)],
    [at(1, 3), bye(2)],
    [at(2, 4), at(1, 6)],
    [at(2, 5), at(2, 2)],
    [bye(2), at(1, 2)],
];

const BRACKET_8_BYES_0: &[[SlotTemplate; 2]] = &[
    [at(1, 1), pick(2, 1, 4)],
    [pick(2, 1, 4), pick(2, 3, 4)],
    [pick(1, 3, 4), pick(2, 1, 4)],
    [pick(2, 1, 4), at(1, 2)],
];

const BRACKET_8_BYES_2: &[[SlotTemplate; 2]] = &[
    [at(1, 1), bye(2)],
    [pick(2, 1, 4), pick(2, 3, 4)],
    [pick(1, 3, 4), pick(2, 1, 4)],
    [bye(2), at(1, 2)],
];

/// A first-round slot with its group decided. `group == None` is a BYE slot.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SeedSlot {
    pub rank: u32,
    pub group: Option<u32>,
}

pub type SeedPair = [SeedSlot; 2];

/// Declarative seed patterns keyed by bracket and bye count.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PatternTemplate(BTreeMap<KnockoutRound, BTreeMap<u32, Vec<[SlotTemplate; 2]>>>);

impl PatternTemplate {
    /// The bracket patterns used for 8, 16, 32 and 64 slot knockouts.
    pub fn standard() -> Self {
        let entries: [(KnockoutRound, u32, &[[SlotTemplate; 2]]); 9] = [
            (KnockoutRound::RoundOf64, 0, BRACKET_64_BYES_0),
            (KnockoutRound::RoundOf64, 4, BRACKET_64_BYES_4),
            (KnockoutRound::RoundOf64, 8, BRACKET_64_BYES_8),
            (KnockoutRound::RoundOf32, 0, BRACKET_32_BYES_0),
            (KnockoutRound::RoundOf32, 6, BRACKET_32_BYES_6),
            (KnockoutRound::RoundOf16, 0, BRACKET_16_BYES_0),
            (KnockoutRound::RoundOf16, 4, BRACKET_16_BYES_4),
            (KnockoutRound::Quarterfinal, 0, BRACKET_8_BYES_0),
            (KnockoutRound::Quarterfinal, 2, BRACKET_8_BYES_2),
        ];
        let mut table = Self::default();
        for (bracket, byes, pairs) in entries {
            table.insert(bracket, byes, pairs.to_vec());
        }
        table
    }

    pub fn insert(&mut self, bracket: KnockoutRound, byes: u32, pairs: Vec<[SlotTemplate; 2]>) {
        self.0.entry(bracket).or_default().insert(byes, pairs);
    }

    /// Resolve every range token to a concrete group.
    ///
    /// Each distinct range is shuffled once. Within one pattern, rank-1 and rank-2
    /// slots of the same range walk that shuffle with their own cursor, so a pattern
    /// never names the same group twice for the same rank. Ranges that run out of
    /// groups become BYE slots.
    pub fn materialize<R: Rng + ?Sized>(&self, rng: &mut R) -> KnockoutPatterns {
        let mut draws: BTreeMap<(u32, u32), Vec<u32>> = BTreeMap::new();
        for slot in self.0.values().flat_map(|by_bye| by_bye.values()).flatten().flatten() {
            if let GroupToken::Range { first, last } = slot.group {
                draws.entry((first, last)).or_insert_with(|| {
                    let mut groups: Vec<u32> = (first..=last).collect();
                    groups.shuffle(&mut *rng);
                    groups
                });
            }
        }

        let mut patterns = KnockoutPatterns::default();
        for (&bracket, by_bye) in &self.0 {
            for (&byes, pairs) in by_bye {
                let mut cursors: BTreeMap<(u32, u32, u32), usize> = BTreeMap::new();
                let mut resolve = |slot: &SlotTemplate| -> SeedSlot {
                    let group = match slot.group {
                        GroupToken::Group(g) => Some(g),
                        GroupToken::Bye => None,
                        GroupToken::Range { first, last } if matches!(slot.rank, 1 | 2) => {
                            let cursor = cursors.entry((first, last, slot.rank)).or_insert(0);
                            let drawn = draws.get(&(first, last)).and_then(|d| d.get(*cursor)).copied();
                            *cursor += 1;
                            drawn
                        }
                        GroupToken::Range { .. } => None,
                    };
                    SeedSlot { rank: slot.rank, group }
                };
                let resolved = pairs.iter().map(|[a, b]| [resolve(a), resolve(b)]).collect();
                patterns.insert(bracket, byes, resolved);
            }
        }
        patterns
    }

    /// [`materialize`](Self::materialize) with a reproducible draw.
    pub fn materialize_seeded(&self, seed: u64) -> KnockoutPatterns {
        self.materialize(&mut StdRng::seed_from_u64(seed))
    }
}

/// Materialized seed patterns, fixed for the lifetime of a tournament.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct KnockoutPatterns(BTreeMap<KnockoutRound, BTreeMap<u32, Vec<SeedPair>>>);

impl KnockoutPatterns {
    pub fn insert(&mut self, bracket: KnockoutRound, byes: u32, pairs: Vec<SeedPair>) {
        self.0.entry(bracket).or_default().insert(byes, pairs);
    }

    /// Pattern for `bracket` with `byes` empty slots, or the no-bye pattern when
    /// that exact count is not tabled. The flag is true when the fallback was used.
    pub fn lookup(&self, bracket: KnockoutRound, byes: u32) -> Result<(&[SeedPair], bool), ScheduleError> {
        let missing = ScheduleError::PatternNotFound { bracket: bracket.size(), byes };
        let by_bye = self.0.get(&bracket).ok_or_else(|| missing.clone())?;
        if let Some(pairs) = by_bye.get(&byes) {
            return Ok((pairs.as_slice(), false));
        }
        by_bye.get(&0).map(|pairs| (pairs.as_slice(), true)).ok_or(missing)
    }
}
