use super::card::Card;

/// Hand is a bitstring of 52 bits
/// stored as a u64
/// each bit represents a card in the (unordered) set
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Hand(u64);

/// u64 isomorphism
impl From<u64> for Hand {
    fn from(n: u64) -> Self {
        Self(n)
    }
}
impl From<Hand> for u64 {
    fn from(hand: Hand) -> Self {
        hand.0
    }
}

/// Vec<Card> isomorphism
/// we OR the cards to get the bitstring
impl From<Vec<Card>> for Hand {
    fn from(cards: Vec<Card>) -> Self {
        Self(cards.into_iter().fold(0, |acc, c| acc | u64::from(c)))
    }
}
/// we pluck the 1s out of the bitstring and convert them to cards
impl From<Hand> for Vec<Card> {
    fn from(hand: Hand) -> Self {
        let mut value = hand.0;
        let mut index = 0u8;
        let mut cards = Vec::new();
        while value != 0 {
            if value & 1 == 1 {
                cards.push(Card::from(index));
            }
            value >>= 1;
            index += 1;
        }
        cards
    }
}
