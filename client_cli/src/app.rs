use bot::{Bot, BotStrategy, RandomStrategy};
use log::warn;
use store::{
    move_in_candidates, CheckerMove, Color, DiceRoller, Error, GameEvent, GamePhase, GameState,
    BAR,
};

#[derive(Debug, Default)]
pub struct AppArgs {
    pub seed: Option<u64>,
}

// Application Game: the human plays white, the agent plays black.
pub struct Game {
    pub state: GameState,
    dice_roller: DiceRoller,
    bot: Bot,
    /// committed states of the current turn, for undo; cleared on each roll
    turn_history: Vec<GameState>,
    /// transient origin selection, never part of the committed state
    pub selected: Option<i8>,
}

impl Game {
    // Constructs a new instance of [`Game`].
    pub fn new(seed: Option<u64>) -> Self {
        Self::with_strategy(seed, Box::new(RandomStrategy::new(seed)))
    }

    pub fn with_strategy(seed: Option<u64>, strategy: Box<dyn BotStrategy>) -> Self {
        Self {
            state: GameState::new(),
            dice_roller: DiceRoller::new(seed),
            bot: Bot::new(Color::Black, strategy),
            turn_history: Vec::new(),
            selected: None,
        }
    }

    /// Roll for the human side and start the turn.
    pub fn roll(&mut self) -> Result<(), Error> {
        if self.state.phase == GamePhase::GameOver {
            return Err(Error::GameEnded);
        }
        if self.state.phase != GamePhase::Rolling || self.state.current_player != Color::White {
            return Err(Error::RollFirst);
        }
        let dice = self.dice_roller.roll();
        self.state.consume(&GameEvent::Roll { dice });
        self.turn_history.clear();
        self.selected = None;
        // the roll may have had no playable move; the agent acts in that case
        self.play_bot_turn();
        Ok(())
    }

    /// Select an origin and return its legal destinations.
    pub fn select(&mut self, origin: i8) -> Vec<i8> {
        let destinations = self.state.possible_moves(origin);
        self.selected = if destinations.is_empty() {
            None
        } else {
            Some(origin)
        };
        destinations
    }

    /// Validate and commit one human move; hands the turn to the agent when
    /// the dice are spent.
    pub fn try_move(&mut self, from: i8, to: i8) -> Result<(), Error> {
        if self.state.phase == GamePhase::GameOver {
            return Err(Error::GameEnded);
        }
        if self.state.phase != GamePhase::Moving || self.state.current_player != Color::White {
            return Err(Error::RollFirst);
        }
        let cmove = CheckerMove::new(from, to)?;
        if self.state.board.bar(Color::White) > 0 && !cmove.is_enter() {
            return Err(Error::MoveFirst);
        }
        {
            let rules = self.state.rules();
            if rules.checker_move_allowed(&cmove) && rules.strands_second_die(&cmove) {
                return Err(Error::MustUseBothDice);
            }
        }
        let event = GameEvent::Move { cmove };
        if !self.state.validate(&event) {
            return Err(Error::MoveInvalid);
        }
        self.turn_history.push(self.state.clone());
        self.state.consume(&event);
        self.selected = None;
        self.play_bot_turn();
        Ok(())
    }

    /// Restore the committed state preceding the last human move.
    pub fn undo(&mut self) -> Result<(), Error> {
        if self.state.phase != GamePhase::Moving || self.state.current_player != Color::White {
            return Err(Error::MoveInvalid);
        }
        match self.turn_history.pop() {
            Some(previous) => {
                self.state = previous;
                self.selected = None;
                Ok(())
            }
            None => Err(Error::MoveInvalid),
        }
    }

    /// Discard the game and start over from the opening layout.
    pub fn reset(&mut self) {
        self.state.consume(&GameEvent::PlayAgain);
        self.turn_history.clear();
        self.selected = None;
    }

    /// Run the agent's turns until play returns to white or the game ends.
    ///
    /// The agent receives the candidate map and must answer from it; any
    /// failure (no answer, answer outside the map, rejected move) forfeits
    /// the rest of its turn so the game stays playable.
    fn play_bot_turn(&mut self) {
        while self.state.current_player == self.bot.color
            && self.state.phase == GamePhase::Rolling
        {
            let dice = self.dice_roller.roll();
            self.state.consume(&GameEvent::Roll { dice });

            while self.state.current_player == self.bot.color
                && self.state.phase == GamePhase::Moving
            {
                let candidates = self.state.possible_moves_map();
                let answer = self.bot.choose_move(&self.state);
                let event = answer.and_then(|chosen| {
                    if !move_in_candidates(&candidates, chosen.from, chosen.to) {
                        warn!(
                            "agent answered {:?} outside the candidate map",
                            chosen
                        );
                        return None;
                    }
                    let cmove = CheckerMove::new(chosen.from, chosen.to).ok()?;
                    Some(GameEvent::Move { cmove })
                });
                match event {
                    Some(event) if self.state.validate(&event) => self.state.consume(&event),
                    _ => {
                        warn!("agent failure, forfeiting the turn");
                        self.state.consume(&GameEvent::Pass);
                    }
                }
            }
        }
    }
}

// Application.
pub struct App {
    // should the application exit?
    pub should_quit: bool,
    pub game: Game,
}

impl App {
    // Constructs a new instance of [`App`].
    pub fn new(args: AppArgs) -> Self {
        Self {
            game: Game::new(args.seed),
            should_quit: false,
        }
    }

    pub fn input(&mut self, input: &str) {
        match input {
            "state" => self.show_state(),
            "history" => self.show_history(),
            "quit" | "q" => self.quit(),
            "roll" => {
                let result = self.game.roll();
                self.report(result);
            }
            "undo" => {
                let result = self.game.undo();
                self.report(result);
            }
            "new" => self.game.reset(),
            _ => self.parse_command(input),
        }
        println!("{}", self.display());
    }

    // Set running to false to quit the application.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn show_state(&self) {
        println!("{}", self.game.state);
    }

    pub fn show_history(&self) {
        for event in self.game.state.history.iter() {
            println!("{:?}", event);
        }
    }

    fn report(&mut self, result: Result<(), Error>) {
        if let Err(err) = result {
            println!("{}", err);
        }
    }

    fn parse_command(&mut self, input: &str) {
        let words: Vec<&str> = input.split_whitespace().collect();
        match words.as_slice() {
            ["moves", origin] => match parse_field(origin) {
                Some(origin) => {
                    let destinations = self.game.select(origin);
                    println!("from {}: {:?}", origin, destinations);
                }
                None => println!("invalid origin: {}", origin),
            },
            [from, to] => match (parse_field(from), parse_field(to)) {
                (Some(from), Some(to)) => {
                    let result = self.game.try_move(from, to);
                    self.report(result);
                }
                _ => println!("invalid move: {}", input),
            },
            [to] => match (self.game.selected, parse_field(to)) {
                (Some(from), Some(to)) => {
                    let result = self.game.try_move(from, to);
                    self.report(result);
                }
                _ => println!("invalid move: {}", input),
            },
            _ => println!("commands: roll | <from> <to> | moves <p> | undo | new | state | history | quit"),
        }
    }

    pub fn display(&mut self) -> String {
        let state = &self.game.state;
        let mut output = "-------------------------------".to_owned();
        if let Some(winner) = state.winner {
            output += format!("\n{} wins! (enter 'new' to play again)", winner).as_str();
            return output;
        }
        output += format!("\n{:?} > {} to play", state.phase, state.current_player).as_str();
        output = output + "\nRolled dice : " + &state.dice.to_display_string();
        output += format!(" (left: {:?})", state.available).as_str();

        output += "\n\n 13 14 15 16 17 18 19 20 21 22 23 24";
        output.push('\n');
        for field in 13..=24 {
            output += &field_cell(state, field);
        }
        output.push('\n');
        for field in (1..=12).rev() {
            output += &field_cell(state, field);
        }
        output += "\n 12 11 10  9  8  7  6  5  4  3  2  1";

        output += format!(
            "\n\nbar: {} white / {} black   off: {} white / {} black",
            state.board.bar(Color::White),
            state.board.bar(Color::Black),
            state.board.home(Color::White),
            state.board.home(Color::Black),
        )
        .as_str();
        output
    }
}

fn field_cell(state: &GameState, field: i8) -> String {
    match state.board.checkers_at(field) {
        Ok((0, _)) | Err(_) => "  .".to_string(),
        Ok((count, Some(Color::White))) => format!(" W{}", count),
        Ok((count, Some(Color::Black))) => format!(" B{}", count),
        Ok((_, None)) => "  .".to_string(),
    }
}

/// Parse a board position: a point number, `bar`, or `off`.
fn parse_field(word: &str) -> Option<i8> {
    match word {
        "bar" => Some(BAR),
        "off" => Some(Color::White.bear_off_target()),
        _ => word.parse().ok(),
    }
}
