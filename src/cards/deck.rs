use super::card::Card;
use rand::seq::SliceRandom;

/// An ordered 52-card deck. Built fresh at hand start, consumed by
/// top-pop during dealing, discarded at hand end.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// the canonical ordered deck
    pub fn new() -> Deck {
        Deck {
            cards: (0..52).map(Card::from).collect(),
        }
    }

    /// uniform in-place permutation; ThreadRng is a CSPRNG
    pub fn shuffle(&mut self) {
        let mut rng = rand::rng();
        self.cards.shuffle(&mut rng);
    }

    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn fifty_two_unique() {
        let mut deck = Deck::new();
        deck.shuffle();
        let mut seen = HashSet::new();
        while let Some(card) = deck.draw() {
            assert!(seen.insert(u8::from(card)));
        }
        assert_eq!(seen.len(), 52);
    }

    #[test]
    fn draw_consumes() {
        let mut deck = Deck::new();
        assert_eq!(deck.len(), 52);
        deck.draw();
        assert_eq!(deck.len(), 51);
    }
}
