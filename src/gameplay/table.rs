use super::action::Action;
use super::action::ActionRecord;
use super::seat::Seat;
use super::showdown::Entry;
use super::showdown::Showdown;
use crate::Chips;
use crate::Position;
use crate::cards::deck::Deck;
use crate::cards::hand::Hand;
use crate::cards::street::Street;
use crate::cards::strength::Strength;

/// Rejections surfaced to the submitting client as error frames.
/// Illegal betting actions are not errors; they are silently ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    TableFull,
    NotEnoughPlayers,
    HandInProgress,
}

impl std::fmt::Display for TableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TableFull => write!(f, "table full"),
            Self::NotEnoughPlayers => write!(f, "need at least two players with chips"),
            Self::HandInProgress => write!(f, "hand in progress"),
        }
    }
}

impl std::error::Error for TableError {}

/// Authoritative per-table game state. All rule checking lives in the
/// mutators here; callers submit intents and observe the resulting state.
///
/// The pot accumulates as chips are committed, so at every point of a hand
/// `pot == sum(committed)` and per-street `bet` fields are display state.
#[derive(Debug)]
pub struct Table {
    seats: Vec<Seat>,
    deck: Deck,
    community: Vec<crate::cards::card::Card>,
    street: Street,
    started: bool,
    pot: Chips,
    dealer: Position,
    ticker: Position,
    last_raise: Chips,
    last_bettor: Option<Position>,
    actions: Vec<ActionRecord>,
    winners: Option<Vec<String>>,
    hands: u64,
    buy_in: Chips,
    sb_size: Chips,
    bb_size: Chips,
    max_players: usize,
}

impl Default for Table {
    fn default() -> Self {
        Self::new(crate::BUY_IN, crate::S_BLIND, crate::B_BLIND, crate::MAX_PLAYERS)
    }
}

impl Table {
    pub fn new(buy_in: Chips, sb_size: Chips, bb_size: Chips, max_players: usize) -> Self {
        Self {
            seats: Vec::new(),
            deck: Deck::new(),
            community: Vec::new(),
            street: Street::Pref,
            started: false,
            pot: 0,
            dealer: 0,
            ticker: 0,
            last_raise: 0,
            last_bettor: None,
            actions: Vec::new(),
            winners: None,
            hands: 0,
            buy_in,
            sb_size,
            bb_size,
            max_players,
        }
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }
    pub fn seat(&self, nick: &str) -> Option<&Seat> {
        self.seats.iter().find(|s| s.nick() == nick)
    }
    pub fn started(&self) -> bool {
        self.started
    }
    pub fn street(&self) -> Street {
        self.street
    }
    pub fn pot(&self) -> Chips {
        self.pot
    }
    pub fn community(&self) -> &[crate::cards::card::Card] {
        &self.community
    }
    pub fn actions(&self) -> &[ActionRecord] {
        &self.actions
    }
    pub fn winners(&self) -> Option<&[String]> {
        self.winners.as_deref()
    }
    pub fn max_players(&self) -> usize {
        self.max_players
    }
    pub fn dealer_nick(&self) -> Option<&str> {
        self.seats.get(self.dealer).map(Seat::nick)
    }

    /// blind positions; with two seats the dealer posts the small blind
    pub fn blinds(&self) -> Option<(Position, Position)> {
        let n = self.seats.len();
        match n {
            0 | 1 => None,
            2 => Some((self.dealer, (self.dealer + 1) % n)),
            _ => Some(((self.dealer + 1) % n, (self.dealer + 2) % n)),
        }
    }
    pub fn sb_nick(&self) -> Option<&str> {
        self.started
            .then(|| self.blinds())
            .flatten()
            .map(|(sb, _)| self.seats[sb].nick())
    }
    pub fn bb_nick(&self) -> Option<&str> {
        self.started
            .then(|| self.blinds())
            .flatten()
            .map(|(_, bb)| self.seats[bb].nick())
    }

    /// Seats joining mid-hand are not dealt in; they wait for the next
    /// hand and never enter the current one's betting or showdown.
    fn in_hand(&self, pos: Position) -> bool {
        !self.started || !self.seats[pos].hole().is_empty()
    }

    /// the seat whose turn it is, None once betting is impossible
    pub fn to_act(&self) -> Option<Position> {
        if !self.started || self.street == Street::Show {
            return None;
        }
        let n = self.seats.len();
        (0..n)
            .map(|i| (self.ticker + i) % n)
            .find(|&p| self.seats[p].live() && self.in_hand(p))
    }
    pub fn to_act_nick(&self) -> Option<&str> {
        self.to_act().map(|p| self.seats[p].nick())
    }

    pub fn highest_bet(&self) -> Chips {
        self.seats.iter().map(Seat::bet).max().unwrap_or(0)
    }
    pub fn call_amount(&self, pos: Position) -> Chips {
        let seat = &self.seats[pos];
        (self.highest_bet() - seat.bet()).min(seat.stack())
    }
    /// minimum legal raise increment: the last full raise, or the big blind
    pub fn min_raise_amount(&self) -> Chips {
        if self.last_raise > 0 {
            self.last_raise
        } else {
            self.bb_size
        }
    }

    pub fn connected_players(&self) -> usize {
        self.seats.iter().filter(|s| s.connected()).count()
    }
    pub fn eligible_players(&self) -> usize {
        self.seats
            .iter()
            .filter(|s| s.connected() && s.stack() > 0)
            .count()
    }

    /// Seats a player with a fresh buy-in. Returns true when the nickname is
    /// already seated (reconnection) or a seat was added, false when full.
    pub fn add_player(&mut self, nick: &str) -> bool {
        if self.seats.iter().any(|s| s.nick() == nick) {
            return true;
        }
        if self.seats.len() >= self.max_players {
            return false;
        }
        self.seats.push(Seat::new(nick, self.buy_in));
        true
    }

    pub fn set_connected(&mut self, nick: &str, connected: bool) {
        if let Some(seat) = self.seats.iter_mut().find(|s| s.nick() == nick) {
            seat.set_connected(connected);
        }
    }

    /// Stale-seat cleanup on the connect path. Seats keep their place while
    /// a hand is live; a disconnect never auto-folds.
    pub fn purge_disconnected(&mut self) {
        if self.started {
            return;
        }
        self.seats.retain(|s| s.connected());
    }

    /// idle → preflop: rotate the button, shuffle, deal, post blinds
    pub fn start_hand(&mut self) -> Result<(), TableError> {
        if self.started && self.street != Street::Show {
            return Err(TableError::HandInProgress);
        }
        if self.eligible_players() < 2 {
            return Err(TableError::NotEnoughPlayers);
        }
        self.seats.retain(|s| s.connected() && s.stack() > 0);
        let n = self.seats.len();
        self.dealer = match self.hands {
            0 => 0,
            _ => (self.dealer + 1) % n,
        };
        self.hands += 1;
        self.deck = Deck::new();
        self.deck.shuffle();
        self.community.clear();
        self.pot = 0;
        self.winners = None;
        self.actions.clear();
        self.last_raise = 0;
        self.last_bettor = None;
        for seat in self.seats.iter_mut() {
            seat.reset_hand();
        }
        self.street = Street::Pref;
        self.started = true;
        let (sb, bb) = self.blinds().expect("at least two seats");
        // two passes from the small blind, one card per seat each pass
        for _ in 0..2 {
            for i in 0..n {
                let pos = (sb + i) % n;
                if let Some(card) = self.deck.draw() {
                    self.seats[pos].deal(card);
                }
            }
        }
        let sb_size = self.sb_size;
        let bb_size = self.bb_size;
        self.commit(sb, sb_size);
        self.commit(bb, bb_size);
        // heads-up the dealer posted the small blind and opens the betting
        self.ticker = match n {
            2 => self.dealer,
            _ => (bb + 1) % n,
        };
        log::info!(
            "[table] hand {} started, dealer {}, {} seats",
            self.hands,
            self.seats[self.dealer].nick(),
            n
        );
        Ok(())
    }

    /// Applies a betting action for the seat that is to act. Illegal
    /// submissions leave the state untouched and return false.
    pub fn apply_action(&mut self, nick: &str, action: Action) -> bool {
        let Some(pos) = self.to_act() else {
            return false;
        };
        if self.seats[pos].nick() != nick {
            log::debug!("[table] {} acted out of turn", nick);
            return false;
        }
        let hb = self.highest_bet();
        let bet = self.seats[pos].bet();
        let stack = self.seats[pos].stack();
        let call_need = hb - bet;
        let record = match action {
            Action::Fold => {
                self.seats[pos].fold();
                ActionRecord::new(nick, "fold", None)
            }
            Action::Check => {
                if bet != hb {
                    return false;
                }
                self.seats[pos].mark_acted();
                ActionRecord::new(nick, "check", None)
            }
            Action::Call => {
                let actual = self.commit(pos, call_need);
                self.seats[pos].mark_acted();
                let label = if self.seats[pos].all_in() { "all_in" } else { "call" };
                ActionRecord::new(nick, label, Some(actual))
            }
            Action::Raise(increment) => {
                if increment == 0 {
                    return false;
                }
                // a seat that already acted may not raise again unless a
                // full raise re-opened the action
                if self.seats[pos].acted() {
                    return false;
                }
                let min_raise = self.min_raise_amount();
                let total = call_need + increment;
                if increment < min_raise && stack > total {
                    return false;
                }
                let actual = self.commit(pos, total);
                self.seats[pos].mark_acted();
                let increment = actual.saturating_sub(call_need);
                if increment >= min_raise {
                    self.register_raise(pos, increment);
                }
                if self.seats[pos].all_in() {
                    ActionRecord::new(nick, "all_in", Some(actual))
                } else {
                    ActionRecord::new(nick, "raise", Some(increment))
                }
            }
            Action::AllIn => {
                if stack == 0 {
                    return false;
                }
                let actual = self.commit(pos, stack);
                self.seats[pos].mark_acted();
                let increment = actual.saturating_sub(call_need);
                if increment > 0 && increment >= self.min_raise_amount() {
                    self.register_raise(pos, increment);
                }
                ActionRecord::new(nick, "all_in", Some(actual))
            }
        };
        self.ticker = (pos + 1) % self.seats.len();
        self.record(record);
        log::debug!("[table] {} {}", nick, action);
        if self.contenders() <= 1 {
            self.street = Street::Show;
            return true;
        }
        let hb = self.highest_bet();
        if self
            .seats
            .iter()
            .enumerate()
            .filter(|(i, s)| s.live() && self.in_hand(*i))
            .all(|(_, s)| s.acted() && s.bet() == hb)
        {
            self.next_street();
        }
        true
    }

    /// non-folded seats dealt into the hand
    fn contenders(&self) -> usize {
        self.seats
            .iter()
            .enumerate()
            .filter(|(i, s)| s.active() && self.in_hand(*i))
            .count()
    }

    /// Advances without input while no betting decision is possible:
    /// one player left, everyone all-in, or a lone live seat that has
    /// matched. Settles on reaching showdown.
    pub fn auto_advance(&mut self) {
        for _ in 0..crate::ADVANCE_LIMIT {
            if !self.started || self.street == Street::Show {
                break;
            }
            if self.contenders() <= 1 {
                self.street = Street::Show;
                break;
            }
            let hb = self.highest_bet();
            let live = self
                .seats
                .iter()
                .enumerate()
                .filter(|(i, s)| s.live() && self.in_hand(*i))
                .map(|(_, s)| s)
                .collect::<Vec<_>>();
            if live.len() <= 1 && live.iter().all(|s| s.bet() == hb) {
                self.next_street();
                continue;
            }
            break;
        }
        if self.started && self.street == Street::Show {
            self.settle();
        }
    }

    /// full per-hand reset; stacks and the button survive
    pub fn reset_hand(&mut self) {
        self.started = false;
        self.street = Street::Pref;
        self.community.clear();
        self.pot = 0;
        self.winners = None;
        self.actions.clear();
        self.last_raise = 0;
        self.last_bettor = None;
        for seat in self.seats.iter_mut() {
            seat.reset_hand();
        }
    }

    /// Reveal order: the last aggressor shows first, then clockwise from
    /// the dealer; with no aggressor, clockwise from the dealer.
    pub fn showdown_order(&self) -> Vec<Position> {
        let n = self.seats.len();
        if n == 0 {
            return Vec::new();
        }
        let mut order = Vec::new();
        if let Some(bettor) = self.last_bettor.filter(|&p| self.seats[p].active()) {
            order.push(bettor);
        }
        let start = (self.dealer + 1) % n;
        for i in 0..n {
            let p = (start + i) % n;
            if self.seats[p].active() && self.in_hand(p) && !order.contains(&p) {
                order.push(p);
            }
        }
        order
    }

    //

    fn commit(&mut self, pos: Position, amount: Chips) -> Chips {
        let actual = self.seats[pos].commit(amount);
        self.pot += actual;
        actual
    }

    fn register_raise(&mut self, pos: Position, increment: Chips) {
        self.last_raise = increment;
        self.last_bettor = Some(pos);
        for (i, seat) in self.seats.iter_mut().enumerate() {
            if i != pos {
                seat.reopen();
            }
        }
    }

    fn record(&mut self, record: ActionRecord) {
        self.actions.push(record);
        if self.actions.len() > crate::ACTION_HISTORY {
            self.actions.remove(0);
        }
    }

    /// burn one, deal the street's community cards
    fn reveal(&mut self) {
        let n = self.street.n_revealed();
        if self.deck.len() > n {
            self.deck.draw();
            for _ in 0..n {
                if let Some(card) = self.deck.draw() {
                    self.community.push(card);
                }
            }
        }
    }

    fn next_street(&mut self) {
        match self.street {
            Street::Pref | Street::Flop | Street::Turn => {
                self.reveal();
                self.street = self.street.next();
                for seat in self.seats.iter_mut() {
                    seat.reset_street();
                }
                let n = self.seats.len();
                let start = (self.dealer + 1) % n;
                self.ticker = (0..n)
                    .map(|i| (start + i) % n)
                    .find(|&p| self.seats[p].live() && self.in_hand(p))
                    .unwrap_or(start);
                self.actions.clear();
                self.last_raise = 0;
                self.last_bettor = None;
            }
            Street::Rive => self.street = Street::Show,
            Street::Show => {}
        }
    }

    /// Resolves winners exactly once, awarding every layer of the pot.
    fn settle(&mut self) {
        if self.winners.is_some() || !self.started {
            return;
        }
        let entries = self
            .seats
            .iter()
            .enumerate()
            .map(|(i, seat)| {
                let contending = seat.active() && self.in_hand(i);
                Entry {
                    position: i,
                    order: self.action_order(i),
                    committed: seat.committed(),
                    folded: !contending,
                    strength: contending.then(|| self.strength(seat)),
                }
            })
            .collect::<Vec<Entry>>();
        let rewards = Showdown::from(entries).settle();
        debug_assert_eq!(
            rewards.iter().map(|&(_, r)| r).sum::<Chips>(),
            self.pot,
            "pot accounting mismatch"
        );
        for &(pos, reward) in rewards.iter() {
            self.seats[pos].win(reward);
        }
        let order = self.showdown_order();
        let mut winners = rewards
            .iter()
            .filter(|&&(_, r)| r > 0)
            .map(|&(p, _)| p)
            .collect::<Vec<Position>>();
        winners.sort_by_key(|p| order.iter().position(|q| q == p).unwrap_or(usize::MAX));
        let winners = winners
            .into_iter()
            .map(|p| self.seats[p].nick().to_string())
            .collect::<Vec<String>>();
        log::info!("[table] hand {} settled, winners {:?}", self.hands, winners);
        self.winners = Some(winners);
    }

    fn strength(&self, seat: &Seat) -> Strength {
        let mut cards = seat.hole().to_vec();
        cards.extend(self.community.iter().copied());
        Strength::from(Hand::from(cards))
    }

    /// distance clockwise from the first seat left of the dealer
    fn action_order(&self, pos: Position) -> usize {
        let n = self.seats.len();
        let first = (self.dealer + 1) % n;
        (pos + n - first) % n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(stacks: &[Chips]) -> Table {
        let mut table = Table::default();
        for (i, &stack) in stacks.iter().enumerate() {
            let nick = format!("p{}", i);
            assert!(table.add_player(&nick));
            table.seats[i].set_stack(stack);
        }
        table
    }

    fn total(table: &Table) -> Chips {
        table.seats().iter().map(Seat::stack).sum::<Chips>() + table.pot()
    }

    #[test]
    fn blinds_three_way() {
        let mut t = table(&[1000, 1000, 1000]);
        t.start_hand().unwrap();
        assert_eq!(t.dealer_nick(), Some("p0"));
        assert_eq!(t.sb_nick(), Some("p1"));
        assert_eq!(t.bb_nick(), Some("p2"));
        assert_eq!(t.seats[1].bet(), 5);
        assert_eq!(t.seats[2].bet(), 10);
        assert_eq!(t.pot(), 15);
        assert_eq!(t.to_act_nick(), Some("p0"));
        assert!(t.seats.iter().all(|s| s.hole().len() == 2));
    }

    #[test]
    fn blinds_heads_up_dealer_is_small() {
        let mut t = table(&[1000, 1000]);
        t.start_hand().unwrap();
        assert_eq!(t.dealer_nick(), Some("p0"));
        assert_eq!(t.sb_nick(), Some("p0"));
        assert_eq!(t.bb_nick(), Some("p1"));
        assert_eq!(t.to_act_nick(), Some("p0"));
    }

    #[test]
    fn blind_forces_all_in() {
        let mut t = table(&[1000, 3, 1000]);
        t.start_hand().unwrap();
        assert_eq!(t.seats[1].bet(), 3);
        assert!(t.seats[1].all_in());
        assert_eq!(t.pot(), 13);
    }

    #[test]
    fn start_requires_two_stacked_players() {
        let mut t = table(&[1000]);
        assert_eq!(t.start_hand(), Err(TableError::NotEnoughPlayers));
        let mut t = table(&[1000, 0]);
        assert_eq!(t.start_hand(), Err(TableError::NotEnoughPlayers));
    }

    #[test]
    fn start_rejected_mid_hand() {
        let mut t = table(&[1000, 1000]);
        t.start_hand().unwrap();
        assert_eq!(t.start_hand(), Err(TableError::HandInProgress));
    }

    #[test]
    fn capacity_is_max_players() {
        let mut t = Table::default();
        for i in 0..9 {
            assert!(t.add_player(&format!("p{}", i)));
        }
        assert!(!t.add_player("p9"));
        assert!(t.add_player("p0")); // already seated
        assert_eq!(t.seats().len(), 9);
    }

    #[test]
    fn heads_up_check_down() {
        let mut t = table(&[1000, 1000]);
        t.start_hand().unwrap();
        // preflop: dealer completes, big blind checks
        assert!(t.apply_action("p0", Action::Call));
        assert!(t.apply_action("p1", Action::Check));
        assert_eq!(t.street(), Street::Flop);
        assert_eq!(t.community().len(), 3);
        // postflop the non-dealer speaks first
        for street in [Street::Turn, Street::Rive, Street::Show] {
            assert!(t.apply_action("p1", Action::Check));
            assert!(t.apply_action("p0", Action::Check));
            t.auto_advance();
            if street == Street::Show {
                assert_eq!(t.street(), Street::Show);
            } else {
                assert_eq!(t.street(), street);
            }
        }
        assert_eq!(t.community().len(), 5);
        let winners = t.winners().expect("settled");
        assert!(!winners.is_empty());
        assert_eq!(t.seats().iter().map(Seat::stack).sum::<Chips>(), 2000);
        let mut stacks = t.seats().iter().map(Seat::stack).collect::<Vec<_>>();
        stacks.sort_unstable();
        assert!(stacks == vec![990, 1010] || stacks == vec![1000, 1000]);
    }

    #[test]
    fn fold_to_one_awards_blinds() {
        let mut t = table(&[1000, 1000, 1000]);
        t.start_hand().unwrap();
        assert!(t.apply_action("p0", Action::Fold));
        assert!(t.apply_action("p1", Action::Fold));
        t.auto_advance();
        assert_eq!(t.street(), Street::Show);
        assert_eq!(t.winners(), Some(&["p2".to_string()][..]));
        assert_eq!(t.seat("p2").unwrap().stack(), 1005);
        assert_eq!(t.seat("p1").unwrap().stack(), 995);
        assert_eq!(t.seat("p0").unwrap().stack(), 1000);
    }

    #[test]
    fn short_all_in_does_not_reopen() {
        let mut t = table(&[1000, 40, 1000]);
        t.start_hand().unwrap();
        let before = total(&t);
        // utg raises the blind by 20
        assert!(t.apply_action("p0", Action::Raise(20)));
        assert_eq!(t.seats[0].bet(), 30);
        assert_eq!(t.min_raise_amount(), 20);
        // small blind shoves 40 total, an increment of only 10
        assert!(t.apply_action("p1", Action::AllIn));
        assert_eq!(t.seats[1].bet(), 40);
        assert_eq!(t.min_raise_amount(), 20, "short all-in must not re-open");
        // big blind may still raise (has not yet acted) but calls
        assert!(t.apply_action("p2", Action::Call));
        assert_eq!(t.seats[2].bet(), 40);
        // the original raiser may only call or fold
        assert!(!t.apply_action("p0", Action::Raise(20)));
        assert_eq!(t.seats[0].bet(), 30, "rejected raise must not mutate");
        assert!(t.apply_action("p0", Action::Call));
        assert_eq!(t.street(), Street::Flop);
        assert_eq!(t.pot(), 120);
        assert_eq!(total(&t), before);
        // the all-in seat is skipped on later streets
        assert_eq!(t.to_act_nick(), Some("p2"));
    }

    #[test]
    fn exact_min_raise_all_in_reopens() {
        let mut t = table(&[1000, 50, 1000]);
        t.start_hand().unwrap();
        assert!(t.apply_action("p0", Action::Raise(20)));
        // shove of 50: call 25 plus an increment of exactly 20
        assert!(t.apply_action("p1", Action::AllIn));
        assert_eq!(t.seats[1].bet(), 50);
        assert_eq!(t.min_raise_amount(), 20);
        assert!(t.apply_action("p2", Action::Call));
        // full-size all-in re-opened the action for the original raiser
        assert!(t.apply_action("p0", Action::Raise(20)));
        assert_eq!(t.seats[0].bet(), 70);
    }

    #[test]
    fn full_raise_reopens_action() {
        let mut t = table(&[1000, 1000, 1000]);
        t.start_hand().unwrap();
        assert!(t.apply_action("p0", Action::Raise(20)));
        assert!(t.apply_action("p1", Action::Raise(20)));
        assert_eq!(t.seats[1].bet(), 50);
        assert!(t.apply_action("p2", Action::Fold));
        // action re-opened: the original raiser may raise again
        assert!(t.apply_action("p0", Action::Raise(20)));
        assert_eq!(t.seats[0].bet(), 70);
    }

    #[test]
    fn raise_below_minimum_rejected() {
        let mut t = table(&[1000, 1000, 1000]);
        t.start_hand().unwrap();
        assert!(!t.apply_action("p0", Action::Raise(5)));
        assert_eq!(t.seats[0].bet(), 0);
        assert_eq!(t.pot(), 15);
    }

    #[test]
    fn check_with_pending_bet_rejected() {
        let mut t = table(&[1000, 1000, 1000]);
        t.start_hand().unwrap();
        assert!(!t.apply_action("p0", Action::Check));
        assert_eq!(t.to_act_nick(), Some("p0"));
    }

    #[test]
    fn out_of_turn_rejected() {
        let mut t = table(&[1000, 1000, 1000]);
        t.start_hand().unwrap();
        assert!(!t.apply_action("p2", Action::Call));
        assert_eq!(t.pot(), 15);
    }

    #[test]
    fn all_in_runout_deals_remaining_streets() {
        let mut t = table(&[1000, 1000]);
        t.start_hand().unwrap();
        assert!(t.apply_action("p0", Action::AllIn));
        assert!(t.apply_action("p1", Action::Call));
        t.auto_advance();
        assert_eq!(t.street(), Street::Show);
        assert_eq!(t.community().len(), 5);
        assert!(t.winners().is_some());
        assert_eq!(t.seats().iter().map(Seat::stack).sum::<Chips>(), 2000);
    }

    #[test]
    fn blind_all_in_runs_out_once_matched() {
        let mut t = table(&[8, 9]);
        t.start_hand().unwrap();
        // big blind could only cover 9 of 10
        assert!(t.seats[1].all_in());
        // the lone live seat still owes a call, so nothing advances yet
        t.auto_advance();
        assert_eq!(t.street(), Street::Pref);
        assert!(t.apply_action("p0", Action::Call));
        t.auto_advance();
        assert_eq!(t.street(), Street::Show);
        assert!(t.winners().is_some());
        assert_eq!(t.seats().iter().map(Seat::stack).sum::<Chips>(), 17);
    }

    #[test]
    fn chips_conserved_through_a_hand() {
        let mut t = table(&[1000, 1000, 1000]);
        t.start_hand().unwrap();
        let before = total(&t);
        let script: &[(&str, Action)] = &[
            ("p0", Action::Raise(20)),
            ("p1", Action::Call),
            ("p2", Action::Fold),
        ];
        for &(nick, action) in script {
            assert!(t.apply_action(nick, action));
            assert_eq!(total(&t), before);
            t.auto_advance();
            assert_eq!(total(&t), before);
        }
        assert_eq!(t.street(), Street::Flop);
        // check it down
        let mut streets = vec![t.street()];
        while t.street() != Street::Show {
            let nick = t.to_act_nick().expect("someone to act").to_string();
            assert!(t.apply_action(&nick, Action::Check));
            t.auto_advance();
            assert_eq!(total(&t), before);
            streets.push(t.street());
        }
        // monotone street progression
        assert!(streets.windows(2).all(|w| w[0] <= w[1]));
        assert!(t.winners().is_some());
    }

    #[test]
    fn settle_runs_once() {
        let mut t = table(&[1000, 1000]);
        t.start_hand().unwrap();
        assert!(t.apply_action("p0", Action::Fold));
        t.auto_advance();
        let stacks = t.seats().iter().map(Seat::stack).collect::<Vec<_>>();
        t.auto_advance();
        t.auto_advance();
        assert_eq!(
            stacks,
            t.seats().iter().map(Seat::stack).collect::<Vec<_>>()
        );
    }

    #[test]
    fn dealer_rotates_between_hands() {
        let mut t = table(&[1000, 1000]);
        t.start_hand().unwrap();
        assert!(t.apply_action("p0", Action::Fold));
        t.auto_advance();
        assert_eq!(t.street(), Street::Show);
        t.start_hand().unwrap();
        assert_eq!(t.dealer_nick(), Some("p1"));
        assert_eq!(t.sb_nick(), Some("p1"));
    }

    #[test]
    fn zero_stack_seats_dropped_at_start() {
        let mut t = table(&[1000, 0, 1000]);
        t.start_hand().unwrap();
        assert_eq!(t.seats().len(), 2);
        assert!(t.seat("p1").is_none());
    }

    #[test]
    fn recent_actions_trimmed_fifo() {
        let mut t = table(&[1000, 1000]);
        t.start_hand().unwrap();
        assert!(t.apply_action("p0", Action::Call));
        assert_eq!(t.actions().len(), 1);
        assert!(t.apply_action("p1", Action::Check));
        // street changed, history cleared
        assert!(t.actions().is_empty());
        for _ in 0..6 {
            let nick = t.to_act_nick().unwrap().to_string();
            let hb = t.highest_bet();
            let pos = t.to_act().unwrap();
            let action = if t.seats()[pos].bet() == hb && t.seats()[pos].acted() {
                Action::Check
            } else {
                Action::Raise(t.min_raise_amount())
            };
            if !t.apply_action(&nick, action) {
                t.apply_action(&nick, Action::Call);
            }
        }
        assert!(t.actions().len() <= crate::ACTION_HISTORY);
    }

    #[test]
    fn late_joiner_waits_for_next_hand() {
        let mut t = table(&[1000, 1000]);
        t.start_hand().unwrap();
        assert!(t.add_player("p2"));
        // not dealt in: cannot act, cannot win, the hand plays out heads-up
        assert!(!t.apply_action("p2", Action::Call));
        assert!(t.apply_action("p0", Action::Fold));
        t.auto_advance();
        assert_eq!(t.street(), Street::Show);
        assert_eq!(t.winners(), Some(&["p1".to_string()][..]));
        assert_eq!(t.seat("p2").unwrap().stack(), 1000);
        // dealt in from the next hand
        t.start_hand().unwrap();
        assert_eq!(t.seat("p2").unwrap().hole().len(), 2);
    }

    #[test]
    fn showdown_order_aggressor_first() {
        let mut t = table(&[1000, 1000, 1000]);
        t.start_hand().unwrap();
        assert!(t.apply_action("p0", Action::Call));
        assert!(t.apply_action("p1", Action::Call));
        assert!(t.apply_action("p2", Action::Check));
        assert_eq!(t.street(), Street::Flop);
        // p2 bets the flop and gets called down
        assert!(t.apply_action("p1", Action::Check));
        assert!(t.apply_action("p2", Action::Raise(10)));
        assert!(t.apply_action("p0", Action::Call));
        assert!(t.apply_action("p1", Action::Call));
        assert_eq!(t.street(), Street::Turn);
        // turn and river check through; no aggressor on the final street
        for _ in 0..2 {
            assert!(t.apply_action("p1", Action::Check));
            assert!(t.apply_action("p2", Action::Check));
            assert!(t.apply_action("p0", Action::Check));
        }
        assert_eq!(t.street(), Street::Show);
        assert_eq!(t.showdown_order(), vec![1, 2, 0]);
    }
}
