// Round/level bookkeeping for the demo page; the engine only sees flags and the reset key

use std::rc::Rc;
use yew::Reducible;

/// Progress needed to win a round.
pub const CLEAN_THRESHOLD: f64 = 100.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameState {
    Idle,
    Playing,
    /// Round won, more levels remain.
    Won,
    /// Timer ran out.
    Lost,
    /// Last level won.
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Level {
    pub name: &'static str,
    pub dirt_color: &'static str,
    pub seconds: u32,
}

pub const LEVELS: &[Level] = &[
    Level {
        name: "Kitchen Sink",
        dirt_color: "#8B4513",
        seconds: 60,
    },
    Level {
        name: "Garage Floor",
        dirt_color: "#556B2F",
        seconds: 50,
    },
    Level {
        name: "Chimney",
        dirt_color: "#3B3B3B",
        seconds: 40,
    },
];

#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub state: GameState,
    /// Index into [`LEVELS`].
    pub level: usize,
    pub time_left: u32,
    /// Last reported progress, `0..=100`.
    pub score: f64,
    /// Bumped on every (re)start; the game area resets when it changes.
    pub reset_key: u32,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            state: GameState::Idle,
            level: 0,
            time_left: LEVELS[0].seconds,
            score: 0.0,
            reset_key: 0,
        }
    }
}

impl Session {
    pub fn current_level(&self) -> Level {
        LEVELS[self.level.min(LEVELS.len() - 1)]
    }

    pub fn is_last_level(&self) -> bool {
        self.level + 1 >= LEVELS.len()
    }

    fn start(&mut self) {
        self.state = GameState::Playing;
        self.time_left = self.current_level().seconds;
        self.score = 0.0;
        self.reset_key = self.reset_key.wrapping_add(1);
    }

    fn win(&mut self) {
        self.state = if self.is_last_level() {
            GameState::GameOver
        } else {
            GameState::Won
        };
    }
}

#[derive(Clone, Debug)]
pub enum SessionAction {
    /// Start (or restart) the current level.
    Start,
    /// Once per elapsed second while playing.
    Tick,
    Progress(f64),
    Complete,
    /// After a win: move on and start the next level.
    NextLevel,
    /// After the last level: back to the first one.
    PlayAgain,
}

impl Reducible for Session {
    type Action = SessionAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        use SessionAction::*;
        let mut new = (*self).clone();
        match action {
            Start => new.start(),
            Tick => {
                if new.state != GameState::Playing {
                    return self;
                }
                new.time_left = new.time_left.saturating_sub(1);
                if new.time_left == 0 {
                    new.state = GameState::Lost;
                }
            }
            Progress(p) => {
                new.score = p.clamp(0.0, 100.0);
                if new.state == GameState::Playing && new.score >= CLEAN_THRESHOLD {
                    new.win();
                }
            }
            Complete => {
                if new.state == GameState::Playing && new.score >= CLEAN_THRESHOLD {
                    new.win();
                } else {
                    return self;
                }
            }
            NextLevel => {
                if new.state != GameState::Won {
                    return self;
                }
                new.level = (new.level + 1).min(LEVELS.len() - 1);
                new.start();
            }
            PlayAgain => {
                new.level = 0;
                new.start();
            }
        }
        Rc::new(new)
    }
}
