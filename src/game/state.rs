use rand::Rng;

use super::action::{Action, HandSlot};
use super::board::{Board, Coord, MASTER, SIZE};
use super::cards::{sample_distinct, CardId};
use super::player::Player;
use crate::error::GameError;

/// Turn count beyond which an undecided match is a draw.
pub const MAX_TURNS: u32 = 200;

/// 25 board cells + 2 own cards + 2 opponent cards + center card + side to move.
pub const FEATURE_SIZE: usize = SIZE * SIZE + 6;

/// Fixed-length numeric encoding of a match, as seen by the learner.
pub type StateVector = [f32; FEATURE_SIZE];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Winner(Player),
    Draw,
}

/// One Onitama match: board, hands, center card, side to move and turn count.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchState {
    board: Board,
    hands: [[CardId; 2]; 2],
    center: CardId,
    current_player: Player,
    turn: u32,
    outcome: Option<GameOutcome>,
}

impl MatchState {
    /// Deal a fresh match.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let cards = sample_distinct(rng, 5);
        Self::deal(Board::starting(), [cards[0], cards[1]], [cards[2], cards[3]], cards[4])
    }

    /// Build a match from explicit parts, e.g. a position fed back from a UI.
    /// The side to move is given explicitly rather than derived from the
    /// center card.
    pub fn from_parts(
        board: Board,
        hand_a: [CardId; 2],
        hand_b: [CardId; 2],
        center: CardId,
        to_move: Player,
    ) -> Result<Self, GameError> {
        let mut ids = vec![hand_a[0], hand_a[1], hand_b[0], hand_b[1], center];
        ids.sort();
        ids.dedup();
        if ids.len() != 5 {
            return Err(GameError::InvalidSetup("the five cards must be distinct".into()));
        }
        if let Some(code) = board.cells().find(|c| c.abs() > MASTER) {
            return Err(GameError::InvalidSetup(format!("unknown cell code {code}")));
        }
        for player in [Player::A, Player::B] {
            if board.pieces(player).count() > 5 {
                return Err(GameError::InvalidSetup(format!(
                    "{} has more than five pieces",
                    player.name()
                )));
            }
            let masters = board.pieces(player).filter(|&c| board.is_master(c)).count();
            if masters != 1 {
                return Err(GameError::InvalidSetup(format!(
                    "{} must have exactly one master, found {masters}",
                    player.name()
                )));
            }
        }
        let mut state = Self::deal(board, hand_a, hand_b, center);
        state.current_player = to_move;
        Ok(state)
    }

    fn deal(board: Board, hand_a: [CardId; 2], hand_b: [CardId; 2], center: CardId) -> Self {
        MatchState {
            board,
            hands: [hand_a, hand_b],
            center,
            current_player: Player::from_color(center.card().color),
            turn: 0,
            outcome: None,
        }
    }

    /// Re-deal in place and return the opening encoding.
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) -> StateVector {
        *self = Self::new(rng);
        self.encode()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn hand(&self, player: Player) -> [CardId; 2] {
        self.hands[Self::seat(player)]
    }

    pub fn center(&self) -> CardId {
        self.center
    }

    /// Get current player
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Get game outcome if game is over
    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    /// Check if game is over
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    /// All five cards in play, sorted. Constant over a match.
    pub fn cards_in_play(&self) -> [CardId; 5] {
        let [a, b] = self.hands;
        let mut ids = [a[0], a[1], b[0], b[1], self.center];
        ids.sort();
        ids
    }

    fn seat(player: Player) -> usize {
        match player {
            Player::A => 0,
            Player::B => 1,
        }
    }

    /// Every legal action for the side to move: slot 0 before slot 1, pieces
    /// in row-major order, then card offsets in catalog order. Empty once the
    /// match is over.
    pub fn legal_actions(&self) -> Vec<Action> {
        if self.is_terminal() {
            return Vec::new();
        }
        let player = self.current_player;
        let mut actions = Vec::with_capacity(40);
        for slot in HandSlot::BOTH {
            for from in self.board.pieces(player) {
                actions.extend(
                    self.destinations(from, slot)
                        .map(|to| Action { from, to, slot }),
                );
            }
        }
        actions
    }

    /// Destinations reachable from `from` with the card in `slot`, for
    /// highlighting a selected piece. Empty if `from` is not the mover's piece.
    pub fn legal_destinations(&self, from: Coord, slot: HandSlot) -> Vec<Coord> {
        if self.is_terminal()
            || !from.in_bounds()
            || self.board.owner(from) != Some(self.current_player)
        {
            return Vec::new();
        }
        self.destinations(from, slot).collect()
    }

    fn destinations(&self, from: Coord, slot: HandSlot) -> impl Iterator<Item = Coord> + '_ {
        let player = self.current_player;
        let card = self.hand(player)[slot.index()].card();
        card.moves.iter().filter_map(move |&offset| {
            let (dx, dy) = player.orient(offset);
            from.offset(dx, dy)
                .filter(|&to| self.board.owner(to) != Some(player))
        })
    }

    pub fn is_legal(&self, action: &Action) -> bool {
        if self.is_terminal()
            || !action.from.in_bounds()
            || self.board.owner(action.from) != Some(self.current_player)
        {
            return false;
        }
        self.destinations(action.from, action.slot)
            .any(|to| to == action.to)
    }

    /// Play `action`: move the piece, swap the used card with the center card,
    /// advance the turn counter, evaluate win conditions and, only if the match
    /// goes on, pass the turn.
    pub fn apply(&mut self, action: &Action) -> Result<(), GameError> {
        if !self.is_legal(action) {
            return Err(GameError::InvalidAction(*action));
        }

        let mover = self.current_player;
        let piece = self.board.move_piece(action.from, action.to);

        let seat = Self::seat(mover);
        let used = self.hands[seat][action.slot.index()];
        self.hands[seat][action.slot.index()] = self.center;
        self.center = used;

        self.turn += 1;
        self.outcome = self.evaluate_outcome(mover, piece, action.to);
        if self.outcome.is_none() {
            self.current_player = mover.other();
        }
        Ok(())
    }

    /// Successor state after `action`, leaving `self` untouched.
    pub fn after(&self, action: &Action) -> Result<MatchState, GameError> {
        let mut next = self.clone();
        next.apply(action)?;
        Ok(next)
    }

    /// Capture first, then master-on-shrine, then the turn ceiling.
    fn evaluate_outcome(&self, mover: Player, piece: i8, to: Coord) -> Option<GameOutcome> {
        if !self.board.has_master(Player::A) {
            return Some(GameOutcome::Winner(Player::B));
        }
        if !self.board.has_master(Player::B) {
            return Some(GameOutcome::Winner(Player::A));
        }
        if piece.abs() == super::board::MASTER && to == mover.other().shrine() {
            return Some(GameOutcome::Winner(mover));
        }
        if self.turn > MAX_TURNS {
            return Some(GameOutcome::Draw);
        }
        None
    }

    /// Encode the match from the side to move's point of view: raw cell codes
    /// row-major, own hand, opponent hand and center card scaled by the catalog
    /// size, then the mover's sign.
    pub fn encode(&self) -> StateVector {
        let mut data = [0.0f32; FEATURE_SIZE];
        for (slot, code) in data.iter_mut().zip(self.board.cells()) {
            *slot = code as f32;
        }
        let me = self.current_player;
        let own = self.hand(me);
        let opp = self.hand(me.other());
        let base = SIZE * SIZE;
        data[base] = own[0].normalized();
        data[base + 1] = own[1].normalized();
        data[base + 2] = opp[0].normalized();
        data[base + 3] = opp[1].normalized();
        data[base + 4] = self.center.normalized();
        data[base + 5] = me.sign() as f32;
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::board::{EMPTY, MASTER, PAWN};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn card(id: usize) -> CardId {
        CardId::new(id).unwrap()
    }

    // Tiger, Dragon, Crab, Elephant, Mantis, Boar, Frog, Goose, Horse, Eel,
    // Rabbit, Rooster, Monkey, Crane, Ox, Cobra
    const BOAR: usize = 5;
    const CRAB: usize = 2;
    const ELEPHANT: usize = 3;
    const GOOSE: usize = 7;
    const ROOSTER: usize = 11;
    const TIGER: usize = 0;
    const MONKEY: usize = 12;

    fn sparse_board(pieces: &[(usize, usize, i8)]) -> Board {
        let mut board = Board::empty();
        for &(x, y, code) in pieces {
            board.set(Coord::new(x, y), code);
        }
        board
    }

    #[test]
    fn test_new_match_deals_five_distinct_cards() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            let state = MatchState::new(&mut rng);
            let cards = state.cards_in_play();
            assert!(cards.windows(2).all(|w| w[0] != w[1]));
            assert_eq!(state.turn(), 0);
            assert!(!state.is_terminal());
            assert_eq!(*state.board(), Board::starting());
        }
    }

    #[test]
    fn test_center_color_picks_opener() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..50 {
            let state = MatchState::new(&mut rng);
            assert_eq!(
                state.current_player(),
                Player::from_color(state.center().card().color)
            );
        }
    }

    #[test]
    fn test_reset_returns_fresh_encoding() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut state = MatchState::new(&mut rng);
        let action = state.legal_actions()[0];
        state.apply(&action).unwrap();
        let encoded = state.reset(&mut rng);
        assert_eq!(state.turn(), 0);
        assert_eq!(encoded, state.encode());
    }

    #[test]
    fn test_legal_actions_opening_with_known_cards() {
        // A to move with Tiger (forward 2 / back 1) and Monkey (diagonals).
        let state = MatchState::from_parts(
            Board::starting(),
            [card(TIGER), card(MONKEY)],
            [card(BOAR), card(CRAB)],
            card(ELEPHANT),
            Player::A,
        )
        .unwrap();
        let actions = state.legal_actions();
        // Tiger: each of 5 pieces jumps 2 forward; back 1 leaves the board.
        let tiger: Vec<_> = actions.iter().filter(|a| a.slot == HandSlot::First).collect();
        assert_eq!(tiger.len(), 5);
        assert!(tiger.iter().all(|a| a.to.y == 2));
        // Monkey: forward diagonals only, edge pieces have one.
        let monkey = actions.iter().filter(|a| a.slot == HandSlot::Second).count();
        assert_eq!(monkey, 8);
        // Slot 0 actions come first.
        assert!(actions[..5].iter().all(|a| a.slot == HandSlot::First));
    }

    #[test]
    fn test_b_moves_are_mirrored() {
        let state = MatchState::from_parts(
            Board::starting(),
            [card(BOAR), card(CRAB)],
            [card(TIGER), card(GOOSE)],
            card(ELEPHANT),
            Player::B,
        )
        .unwrap();
        let forward: Vec<_> = state
            .legal_actions()
            .into_iter()
            .filter(|a| a.slot == HandSlot::First)
            .collect();
        // Tiger's forward 2 takes B from row 0 to row 2.
        assert_eq!(forward.len(), 5);
        assert!(forward.iter().all(|a| a.from.y == 0 && a.to.y == 2));
    }

    #[test]
    fn test_legal_destinations_for_highlighting() {
        let state = MatchState::from_parts(
            Board::starting(),
            [card(TIGER), card(MONKEY)],
            [card(BOAR), card(CRAB)],
            card(ELEPHANT),
            Player::A,
        )
        .unwrap();
        let dests = state.legal_destinations(Coord::new(2, 4), HandSlot::Second);
        assert_eq!(dests, vec![Coord::new(1, 3), Coord::new(3, 3)]);
        assert!(state
            .legal_destinations(Coord::new(2, 0), HandSlot::First)
            .is_empty());
        assert!(state
            .legal_destinations(Coord::new(9, 9), HandSlot::First)
            .is_empty());
    }

    #[test]
    fn test_apply_swaps_card_with_center() {
        let mut state = MatchState::from_parts(
            Board::starting(),
            [card(TIGER), card(MONKEY)],
            [card(BOAR), card(CRAB)],
            card(ELEPHANT),
            Player::A,
        )
        .unwrap();
        let action = Action {
            from: Coord::new(0, 4),
            to: Coord::new(0, 2),
            slot: HandSlot::First,
        };
        state.apply(&action).unwrap();
        assert_eq!(state.hand(Player::A), [card(ELEPHANT), card(MONKEY)]);
        assert_eq!(state.center(), card(TIGER));
        assert_eq!(state.current_player(), Player::B);
        assert_eq!(state.turn(), 1);
        assert_eq!(state.board().get(Coord::new(0, 2)), PAWN);
        assert_eq!(state.board().get(Coord::new(0, 4)), EMPTY);
    }

    #[test]
    fn test_apply_rejects_illegal_action_without_mutating() {
        let mut state = MatchState::from_parts(
            Board::starting(),
            [card(TIGER), card(MONKEY)],
            [card(BOAR), card(CRAB)],
            card(ELEPHANT),
            Player::A,
        )
        .unwrap();
        let before = state.clone();
        let bogus = [
            // Opponent's piece.
            Action { from: Coord::new(0, 0), to: Coord::new(0, 2), slot: HandSlot::First },
            // Offset not on the card.
            Action { from: Coord::new(0, 4), to: Coord::new(0, 3), slot: HandSlot::First },
            // Onto an own piece.
            Action { from: Coord::new(0, 4), to: Coord::new(1, 4), slot: HandSlot::Second },
            // Empty source.
            Action { from: Coord::new(2, 2), to: Coord::new(2, 0), slot: HandSlot::First },
        ];
        for action in bogus {
            assert_eq!(state.apply(&action), Err(GameError::InvalidAction(action)));
            assert_eq!(state, before);
        }
    }

    #[test]
    fn test_capture_of_last_master_wins() {
        // B's only master at (2,2); A pawn below it with Boar (forward 1).
        let board = sparse_board(&[(2, 2, -MASTER), (2, 3, PAWN), (0, 4, MASTER)]);
        let mut state = MatchState::from_parts(
            board,
            [card(BOAR), card(CRAB)],
            [card(TIGER), card(MONKEY)],
            card(ELEPHANT),
            Player::A,
        )
        .unwrap();
        let capture = Action {
            from: Coord::new(2, 3),
            to: Coord::new(2, 2),
            slot: HandSlot::First,
        };
        assert!(state.legal_actions().contains(&capture));
        state.apply(&capture).unwrap();
        assert_eq!(state.outcome(), Some(GameOutcome::Winner(Player::A)));
        // The winner stays the last mover.
        assert_eq!(state.current_player(), Player::A);
        assert!(state.legal_actions().is_empty());
        assert!(state.legal_actions().is_empty());
    }

    #[test]
    fn test_capture_win_ignores_turn_count() {
        let board = sparse_board(&[(2, 2, -MASTER), (2, 3, PAWN), (0, 4, MASTER)]);
        let mut state = MatchState::from_parts(
            board,
            [card(BOAR), card(CRAB)],
            [card(TIGER), card(MONKEY)],
            card(ELEPHANT),
            Player::A,
        )
        .unwrap();
        state.turn = MAX_TURNS + 5;
        let capture = Action {
            from: Coord::new(2, 3),
            to: Coord::new(2, 2),
            slot: HandSlot::First,
        };
        state.apply(&capture).unwrap();
        assert_eq!(state.outcome(), Some(GameOutcome::Winner(Player::A)));
    }

    #[test]
    fn test_master_on_opponent_shrine_wins() {
        // B master one step from A's shrine at (2,4); Boar mirrored moves B down.
        let board = sparse_board(&[(2, 3, -MASTER), (0, 4, MASTER)]);
        let mut state = MatchState::from_parts(
            board,
            [card(TIGER), card(MONKEY)],
            [card(BOAR), card(CRAB)],
            card(ELEPHANT),
            Player::B,
        )
        .unwrap();
        let step = Action {
            from: Coord::new(2, 3),
            to: Coord::new(2, 4),
            slot: HandSlot::First,
        };
        state.apply(&step).unwrap();
        assert_eq!(state.outcome(), Some(GameOutcome::Winner(Player::B)));
        assert_eq!(state.current_player(), Player::B);
    }

    #[test]
    fn test_pawn_on_shrine_does_not_win() {
        let board = sparse_board(&[(2, 1, PAWN), (0, 4, MASTER), (4, 0, -MASTER)]);
        let mut state = MatchState::from_parts(
            board,
            [card(BOAR), card(CRAB)],
            [card(TIGER), card(MONKEY)],
            card(ELEPHANT),
            Player::A,
        )
        .unwrap();
        let step = Action {
            from: Coord::new(2, 1),
            to: Coord::new(2, 0),
            slot: HandSlot::First,
        };
        state.apply(&step).unwrap();
        assert!(!state.is_terminal());
    }

    #[test]
    fn test_draw_after_turn_ceiling() {
        // Only sideways-capable cards; each side shuffles a pawn along an
        // otherwise empty row, so nothing can be captured or reach a shrine.
        let board = sparse_board(&[
            (0, 4, MASTER),
            (4, 0, -MASTER),
            (2, 3, PAWN),
            (2, 1, -PAWN),
        ]);
        let mut state = MatchState::from_parts(
            board,
            [card(ELEPHANT), card(BOAR)],
            [card(GOOSE), card(ROOSTER)],
            card(CRAB),
            Player::A,
        )
        .unwrap();

        for turn in 0..=MAX_TURNS {
            assert!(!state.is_terminal(), "ended early at turn {turn}");
            let quiet = state
                .legal_actions()
                .into_iter()
                .find(|a| !state.board().is_master(a.from) && a.from.y == a.to.y)
                .expect("a sideways pawn move is always available");
            state.apply(&quiet).unwrap();
        }

        assert_eq!(state.turn(), MAX_TURNS + 1);
        assert_eq!(state.outcome(), Some(GameOutcome::Draw));
    }

    #[test]
    fn test_terminal_state_rejects_everything() {
        let board = sparse_board(&[(2, 2, -MASTER), (2, 3, PAWN), (0, 4, MASTER)]);
        let mut state = MatchState::from_parts(
            board,
            [card(BOAR), card(CRAB)],
            [card(TIGER), card(MONKEY)],
            card(ELEPHANT),
            Player::A,
        )
        .unwrap();
        let capture = Action {
            from: Coord::new(2, 3),
            to: Coord::new(2, 2),
            slot: HandSlot::First,
        };
        state.apply(&capture).unwrap();
        let again = Action {
            from: Coord::new(2, 2),
            to: Coord::new(2, 1),
            slot: HandSlot::First,
        };
        assert_eq!(state.apply(&again), Err(GameError::InvalidAction(again)));
    }

    #[test]
    fn test_from_parts_rejects_duplicate_cards() {
        let result = MatchState::from_parts(
            Board::starting(),
            [card(BOAR), card(BOAR)],
            [card(TIGER), card(MONKEY)],
            card(ELEPHANT),
            Player::A,
        );
        assert!(matches!(result, Err(GameError::InvalidSetup(_))));
    }

    fn setup_with(board: Board) -> Result<MatchState, GameError> {
        MatchState::from_parts(
            board,
            [card(BOAR), card(CRAB)],
            [card(TIGER), card(MONKEY)],
            card(ELEPHANT),
            Player::A,
        )
    }

    #[test]
    fn test_from_parts_rejects_two_masters() {
        let board = sparse_board(&[(0, 4, MASTER), (4, 4, MASTER), (2, 0, -MASTER)]);
        assert!(matches!(setup_with(board), Err(GameError::InvalidSetup(_))));
    }

    #[test]
    fn test_from_parts_rejects_missing_master() {
        let board = sparse_board(&[(2, 3, PAWN), (0, 4, MASTER), (4, 0, -PAWN)]);
        assert!(matches!(setup_with(board), Err(GameError::InvalidSetup(_))));

        let board = sparse_board(&[(2, 0, -MASTER)]);
        assert!(matches!(setup_with(board), Err(GameError::InvalidSetup(_))));
    }

    #[test]
    fn test_from_parts_rejects_unknown_cell_code() {
        let board = sparse_board(&[(0, 4, MASTER), (2, 0, -MASTER), (2, 2, 3)]);
        assert!(matches!(setup_with(board), Err(GameError::InvalidSetup(_))));

        let board = sparse_board(&[(0, 4, MASTER), (2, 0, -MASTER), (2, 2, -5)]);
        assert!(matches!(setup_with(board), Err(GameError::InvalidSetup(_))));
    }

    #[test]
    fn test_from_parts_accepts_sparse_board() {
        let board = sparse_board(&[(0, 4, MASTER), (2, 0, -MASTER), (1, 1, -PAWN)]);
        let state = setup_with(board).unwrap();
        assert_eq!(state.outcome(), None);
        assert_eq!(state.current_player(), Player::A);
    }

    #[test]
    fn test_encode_layout() {
        let state = MatchState::from_parts(
            Board::starting(),
            [card(TIGER), card(MONKEY)],
            [card(BOAR), card(CRAB)],
            card(ELEPHANT),
            Player::B,
        )
        .unwrap();
        let v = state.encode();
        assert_eq!(v.len(), 31);
        assert_eq!(v[2], -2.0);
        assert_eq!(v[22], 2.0);
        assert_eq!(v[12], 0.0);
        // Own hand is B's.
        assert!((v[25] - BOAR as f32 / 16.0).abs() < 1e-6);
        assert!((v[26] - CRAB as f32 / 16.0).abs() < 1e-6);
        assert!((v[27] - TIGER as f32 / 16.0).abs() < 1e-6);
        assert!((v[28] - MONKEY as f32 / 16.0).abs() < 1e-6);
        assert!((v[29] - ELEPHANT as f32 / 16.0).abs() < 1e-6);
        assert_eq!(v[30], -1.0);
        assert_eq!(state.encode(), v);
    }

    #[test]
    fn test_after_leaves_original_untouched() {
        let mut rng = StdRng::seed_from_u64(5);
        let state = MatchState::new(&mut rng);
        let action = state.legal_actions()[0];
        let next = state.after(&action).unwrap();
        assert_eq!(state.turn(), 0);
        assert_eq!(next.turn(), 1);
        assert_ne!(state.board(), next.board());
    }

    /// Random playouts: every generated action is re-checked by brute force,
    /// applying it succeeds, and the five dealt cards only permute.
    #[test]
    fn test_random_playouts_hold_invariants() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let mut state = MatchState::new(&mut rng);
            let dealt = state.cards_in_play();
            while !state.is_terminal() {
                let player = state.current_player();
                let actions = state.legal_actions();
                if actions.is_empty() {
                    break;
                }
                for a in &actions {
                    assert!(a.to.in_bounds());
                    assert_eq!(state.board().owner(a.from), Some(player));
                    assert_ne!(state.board().owner(a.to), Some(player));
                    let card = state.hand(player)[a.slot.index()].card();
                    let dx = a.to.x as i8 - a.from.x as i8;
                    let dy = a.to.y as i8 - a.from.y as i8;
                    assert!(card.moves.iter().any(|&m| player.orient(m) == (dx, dy)));
                }
                let pick = actions[rng.random_range(0..actions.len())];
                state.apply(&pick).unwrap();
                assert_eq!(state.cards_in_play(), dealt);
                assert!(state.board().pieces(Player::A).count() <= 5);
                match state.outcome() {
                    None => assert_eq!(state.current_player(), player.other()),
                    Some(GameOutcome::Winner(w)) => assert_eq!(w, player),
                    Some(GameOutcome::Draw) => assert!(state.turn() > MAX_TURNS),
                }
            }
        }
    }

    #[test]
    fn test_actions_outside_legal_set_are_rejected() {
        let mut rng = StdRng::seed_from_u64(9);
        let state = MatchState::new(&mut rng);
        let legal = state.legal_actions();
        for y0 in 0..SIZE {
            for x0 in 0..SIZE {
                for y1 in 0..SIZE {
                    for x1 in 0..SIZE {
                        for slot in HandSlot::BOTH {
                            let action = Action {
                                from: Coord::new(x0, y0),
                                to: Coord::new(x1, y1),
                                slot,
                            };
                            let mut probe = state.clone();
                            let result = probe.apply(&action);
                            assert_eq!(result.is_ok(), legal.contains(&action));
                        }
                    }
                }
            }
        }
    }
}
