use super::player::Player;

pub const SIZE: usize = 5;

pub const EMPTY: i8 = 0;
pub const PAWN: i8 = 1;
pub const MASTER: i8 = 2;

/// A cell position. `x` is the column, `y` the row; row 0 is B's home row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

impl Coord {
    pub const fn new(x: usize, y: usize) -> Self {
        Coord { x, y }
    }

    /// Shift by an offset, returning `None` when the result leaves the grid.
    pub fn offset(self, dx: i8, dy: i8) -> Option<Coord> {
        let x = self.x as i32 + dx as i32;
        let y = self.y as i32 + dy as i32;
        if (0..SIZE as i32).contains(&x) && (0..SIZE as i32).contains(&y) {
            Some(Coord::new(x as usize, y as usize))
        } else {
            None
        }
    }

    pub fn in_bounds(self) -> bool {
        self.x < SIZE && self.y < SIZE
    }
}

/// 5x5 grid of signed occupant codes: 0 empty, +1/+2 A pawn/master,
/// -1/-2 B pawn/master.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [[i8; SIZE]; SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn empty() -> Self {
        Board {
            cells: [[EMPTY; SIZE]; SIZE],
        }
    }

    /// Both ranks in place, masters on the center column.
    pub fn starting() -> Self {
        let mut board = Board::empty();
        for player in [Player::A, Player::B] {
            let row = player.home_row();
            for x in 0..SIZE {
                let kind = if x == 2 { MASTER } else { PAWN };
                board.cells[row][x] = kind * player.sign();
            }
        }
        board
    }

    /// Code at `at`. Panics if `at` is off the board.
    pub fn get(&self, at: Coord) -> i8 {
        debug_assert!(at.in_bounds(), "{at:?} is off the board");
        self.cells[at.y][at.x]
    }

    /// Panics if `at` is off the board.
    pub fn set(&mut self, at: Coord, code: i8) {
        debug_assert!(at.in_bounds(), "{at:?} is off the board");
        self.cells[at.y][at.x] = code;
    }

    /// Owner of the piece at `at`, if any.
    pub fn owner(&self, at: Coord) -> Option<Player> {
        match self.get(at) {
            c if c > 0 => Some(Player::A),
            c if c < 0 => Some(Player::B),
            _ => None,
        }
    }

    pub fn is_master(&self, at: Coord) -> bool {
        self.get(at).abs() == MASTER
    }

    /// Move the piece at `from` to `to`, overwriting whatever stood there.
    /// Returns the code of the moved piece.
    pub fn move_piece(&mut self, from: Coord, to: Coord) -> i8 {
        let piece = self.get(from);
        self.set(to, piece);
        self.set(from, EMPTY);
        piece
    }

    pub fn has_master(&self, player: Player) -> bool {
        let code = MASTER * player.sign();
        self.cells.iter().flatten().any(|&c| c == code)
    }

    /// Cells occupied by `player`, in row-major order.
    pub fn pieces(&self, player: Player) -> impl Iterator<Item = Coord> + '_ {
        (0..SIZE)
            .flat_map(|y| (0..SIZE).map(move |x| Coord::new(x, y)))
            .filter(move |&c| self.owner(c) == Some(player))
    }

    /// Row-major view of the raw cell codes.
    pub fn cells(&self) -> impl Iterator<Item = i8> + '_ {
        self.cells.iter().flatten().copied()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::starting()
    }
}
