use super::rank::Rank;

/// A poker hand's category with its in-category tiebreak ranks.
///
/// Ordered by derived Ord: later variants beat earlier ones, and within a
/// variant the tiebreak ranks compare lexicographically. Kicker cards are
/// carried separately in Strength.
#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord)]
pub enum Ranking {
    HighCard(Rank),        // 4 kickers
    OnePair(Rank),         // 3 kickers
    TwoPair(Rank, Rank),   // 1 kicker
    ThreeOAK(Rank),        // 2 kickers
    Straight(Rank),        // 0 kickers
    Flush(Rank),           // 4 kickers
    FullHouse(Rank, Rank), // 0 kickers
    FourOAK(Rank),         // 1 kicker
    StraightFlush(Rank),   // 0 kickers
    RoyalFlush,            // 0 kickers
}

impl Ranking {
    pub fn n_kickers(&self) -> usize {
        match self {
            Ranking::HighCard(_) | Ranking::Flush(_) => 4,
            Ranking::OnePair(_) => 3,
            Ranking::ThreeOAK(_) => 2,
            Ranking::FourOAK(_) | Ranking::TwoPair(_, _) => 1,
            _ => 0,
        }
    }

    /// category index, 0 = high card through 9 = royal flush
    pub fn category(&self) -> u8 {
        match self {
            Ranking::HighCard(_) => 0,
            Ranking::OnePair(_) => 1,
            Ranking::TwoPair(_, _) => 2,
            Ranking::ThreeOAK(_) => 3,
            Ranking::Straight(_) => 4,
            Ranking::Flush(_) => 5,
            Ranking::FullHouse(_, _) => 6,
            Ranking::FourOAK(_) => 7,
            Ranking::StraightFlush(_) => 8,
            Ranking::RoyalFlush => 9,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_cover_zero_through_nine() {
        let ladder = [
            Ranking::HighCard(Rank::Ace),
            Ranking::OnePair(Rank::Ace),
            Ranking::TwoPair(Rank::Ace, Rank::King),
            Ranking::ThreeOAK(Rank::Ace),
            Ranking::Straight(Rank::Ace),
            Ranking::Flush(Rank::Ace),
            Ranking::FullHouse(Rank::Ace, Rank::King),
            Ranking::FourOAK(Rank::Ace),
            Ranking::StraightFlush(Rank::King),
            Ranking::RoyalFlush,
        ];
        for (i, rank) in ladder.iter().enumerate() {
            assert_eq!(rank.category() as usize, i);
        }
        assert!(ladder.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn tiebreaks_within_category() {
        assert!(Ranking::TwoPair(Rank::Ace, Rank::Queen) > Ranking::TwoPair(Rank::Ace, Rank::Jack));
        assert!(Ranking::FullHouse(Rank::King, Rank::Ace) < Ranking::FullHouse(Rank::Ace, Rank::Two));
        assert!(Ranking::Straight(Rank::Six) > Ranking::Straight(Rank::Five));
    }
}

impl std::fmt::Display for Ranking {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Ranking::RoyalFlush => write!(f, "RoyalFlush"),
            Ranking::FullHouse(r1, r2) => write!(f, "FullHouse     {}{}", r1, r2),
            Ranking::TwoPair(r1, r2) => write!(f, "TwoPair       {}{}", r1, r2),
            Ranking::HighCard(r) => write!(f, "HighCard      {} ", r),
            Ranking::OnePair(r) => write!(f, "OnePair       {} ", r),
            Ranking::ThreeOAK(r) => write!(f, "ThreeOfAKind  {} ", r),
            Ranking::Straight(r) => write!(f, "Straight      {} ", r),
            Ranking::FourOAK(r) => write!(f, "FourOfAKind   {} ", r),
            Ranking::Flush(r) => write!(f, "Flush         {} ", r),
            Ranking::StraightFlush(r) => write!(f, "StraightFlush {} ", r),
        }
    }
}
