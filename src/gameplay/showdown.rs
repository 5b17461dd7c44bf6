use crate::Chips;
use crate::Position;
use crate::cards::strength::Strength;

/// One seat's stake in the settlement: what it committed over the whole
/// hand, whether it folded, and (for contenders) its hand strength.
/// `order` is the seat's distance in action order, used to break remainder
/// ties deterministically.
#[derive(Debug, Clone)]
pub struct Entry {
    pub position: Position,
    pub order: usize,
    pub committed: Chips,
    pub folded: bool,
    pub strength: Option<Strength>,
}

/// Ephemeral settlement of a finished hand. Partitions the pot into layers
/// by commitment level and awards each layer to the best eligible hand,
/// handling every all-in configuration with the same loop.
pub struct Showdown {
    entries: Vec<Entry>,
}

impl From<Vec<Entry>> for Showdown {
    fn from(entries: Vec<Entry>) -> Self {
        Self { entries }
    }
}

impl Showdown {
    /// Distributes the entire pot. Returns rewards aligned with the input
    /// entries; the rewards sum to the sum of all commitments, folded seats
    /// included (forfeited chips stay in the layers they funded).
    pub fn settle(self) -> Vec<(Position, Chips)> {
        let mut rewards = vec![0 as Chips; self.entries.len()];
        let levels = self.levels();
        let mut prev: Chips = 0;
        for (i, &level) in levels.iter().enumerate() {
            let mut chips = self.layer(prev, level);
            if i == levels.len() - 1 {
                chips += self.overflow(level);
            }
            let winners = self.winners(level);
            if winners.is_empty() {
                continue;
            }
            let share = chips / winners.len() as Chips;
            let remainder = chips % winners.len() as Chips;
            for &w in winners.iter() {
                rewards[w] += share;
            }
            rewards[winners[0]] += remainder;
            prev = level;
        }
        self.entries
            .iter()
            .zip(rewards)
            .map(|(e, r)| (e.position, r))
            .collect()
    }

    /// distinct commitment levels of contending seats, ascending
    fn levels(&self) -> Vec<Chips> {
        let mut levels = self
            .entries
            .iter()
            .filter(|e| !e.folded)
            .map(|e| e.committed)
            .filter(|&c| c > 0)
            .collect::<Vec<Chips>>();
        levels.sort_unstable();
        levels.dedup();
        levels
    }
    /// chips contributed between two levels, by every seat
    fn layer(&self, prev: Chips, level: Chips) -> Chips {
        self.entries
            .iter()
            .map(|e| e.committed.min(level) - e.committed.min(prev))
            .sum()
    }
    /// forfeited chips above the highest contended level
    fn overflow(&self, level: Chips) -> Chips {
        self.entries
            .iter()
            .map(|e| e.committed.saturating_sub(level))
            .sum()
    }
    /// best-hand indices among seats eligible at this level, action order
    fn winners(&self, level: Chips) -> Vec<usize> {
        let best = self
            .entries
            .iter()
            .filter(|e| !e.folded && e.committed >= level)
            .filter_map(|e| e.strength)
            .max();
        let mut winners = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.folded && e.committed >= level)
            .filter(|(_, e)| e.strength == best)
            .map(|(i, _)| i)
            .collect::<Vec<usize>>();
        winners.sort_by_key(|&i| self.entries[i].order);
        winners
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::card::Card;
    use crate::cards::hand::Hand;

    fn strength(s: &str) -> Option<Strength> {
        Some(Strength::from(Hand::from(
            s.split_whitespace()
                .map(|c| Card::try_from(c).expect("valid card"))
                .collect::<Vec<Card>>(),
        )))
    }

    fn entry(
        position: Position,
        committed: Chips,
        folded: bool,
        strength: Option<Strength>,
    ) -> Entry {
        Entry {
            position,
            order: position,
            committed,
            folded,
            strength,
        }
    }

    #[test]
    fn single_level_single_winner() {
        let rewards = Showdown::from(vec![
            entry(0, 100, false, strength("AS AH KD QC JS")),
            entry(1, 100, false, strength("KS KH QD JC 9S")),
        ])
        .settle();
        assert_eq!(rewards, vec![(0, 200), (1, 0)]);
    }

    #[test]
    fn split_pot_remainder_to_earliest() {
        let rewards = Showdown::from(vec![
            entry(0, 50, false, strength("AS KH QD JC 9S")),
            entry(1, 50, false, strength("AD KC QH JH 9D")),
            entry(2, 1, true, None),
        ])
        .settle();
        // 101 chips, identical hands: 50 each plus the odd chip to seat 0
        assert_eq!(rewards, vec![(0, 51), (1, 50), (2, 0)]);
    }

    #[test]
    fn three_way_three_levels() {
        // seat 0 all-in for 40, seat 1 for 100, seat 2 covers at 200.
        // best hand overall is seat 0, then seat 1, then seat 2:
        // seat 0 takes the 120 main pot, seat 1 the 120 middle pot,
        // seat 2 gets back its uncalled 100.
        let rewards = Showdown::from(vec![
            entry(0, 40, false, strength("AS AH AD KC QS")),
            entry(1, 100, false, strength("KS KH KD QC JS")),
            entry(2, 200, false, strength("QS QH QD JC 9S")),
        ])
        .settle();
        assert_eq!(rewards, vec![(0, 120), (1, 120), (2, 100)]);
    }

    #[test]
    fn middle_hand_wins_upper_layers() {
        // short stack holds the best hand but is only eligible to the main pot
        let rewards = Showdown::from(vec![
            entry(0, 40, false, strength("AS AH AD KC QS")),
            entry(1, 100, false, strength("QS QH QD JC 9S")),
            entry(2, 100, false, strength("KS KH KD QC JS")),
        ])
        .settle();
        assert_eq!(rewards, vec![(0, 120), (1, 0), (2, 120)]);
    }

    #[test]
    fn folded_chips_stay_in_the_pot() {
        // seat 2 folded after committing 30; the winner collects it
        let rewards = Showdown::from(vec![
            entry(0, 100, false, strength("AS AH KD QC JS")),
            entry(1, 100, false, strength("KS KH QD JC 9S")),
            entry(2, 30, true, None),
        ])
        .settle();
        assert_eq!(rewards, vec![(0, 230), (1, 0), (2, 0)]);
    }

    #[test]
    fn folded_overflow_goes_to_top_layer() {
        // the folder committed beyond every contender's level
        let rewards = Showdown::from(vec![
            entry(0, 50, false, strength("AS AH KD QC JS")),
            entry(1, 50, false, strength("KS KH QD JC 9S")),
            entry(2, 80, true, None),
        ])
        .settle();
        let total: Chips = rewards.iter().map(|&(_, r)| r).sum();
        assert_eq!(total, 180);
        assert_eq!(rewards[0], (0, 180));
    }

    #[test]
    fn fold_to_one_needs_no_comparison() {
        let rewards = Showdown::from(vec![
            entry(0, 10, false, strength("2S 7H")),
            entry(1, 5, true, None),
        ])
        .settle();
        assert_eq!(rewards, vec![(0, 15), (1, 0)]);
    }

    #[test]
    fn eligibility_is_exactly_committed_at_least_level() {
        // equal hands, unequal commitments: the deeper seat alone takes the
        // side pot, the main pot splits
        let rewards = Showdown::from(vec![
            entry(0, 40, false, strength("AS KH QD JC 9S")),
            entry(1, 100, false, strength("AD KC QH JH 9D")),
        ])
        .settle();
        assert_eq!(rewards, vec![(0, 40), (1, 100)]);
    }
}
