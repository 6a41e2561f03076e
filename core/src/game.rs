use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - PreGame -> ShowAll
/// - ShowAll -> MoveAndSummon
/// - MoveAndSummon -> NextLevel
/// - MoveAndSummon -> Retry
/// - Retry -> PreGame (same level)
/// - NextLevel -> PreGame (next level)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Only the demons are shown
    PreGame,
    /// Full grid visible for a limited time
    ShowAll,
    /// Runes hidden again, rows and columns can be dragged
    MoveAndSummon,
    /// Summon left demons behind
    Retry,
    /// Summon cleared every demon
    NextLevel,
}

impl Phase {
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Retry | Self::NextLevel)
    }

    /// What the player may see of the grid on entering this phase.
    const fn entry_filter(self) -> Option<ViewFilter> {
        match self {
            Self::PreGame | Self::MoveAndSummon => Some(ViewFilter::DemonsOnly),
            Self::ShowAll => Some(ViewFilter::All),
            Self::Retry | Self::NextLevel => None,
        }
    }
}

impl Default for Phase {
    fn default() -> Self {
        Self::PreGame
    }
}

/// One level attempt after another: owns the grid and routes player actions to the component allowed to handle them.
///
/// Every entry point returns the events the front-end has to act on, in order. The game keeps no timers, the
/// front-end counts down [`Game::reveal_countdown`] seconds and then calls [`Game::advance`].
#[derive(Clone, Debug)]
pub struct Game<G = SeededLevelGenerator> {
    config: GameConfig,
    generator: G,
    session: Session,
    phase: Phase,
    grid: Grid,
    filter: ViewFilter,
    drag: DragShiftController,
}

impl Game<SeededLevelGenerator> {
    pub fn new(config: GameConfig, session: Session) -> Result<Self> {
        let generator = SeededLevelGenerator::from_config(&config);
        Self::with_generator(config, generator, session)
    }
}

impl<G: LevelGenerator> Game<G> {
    pub fn with_generator(config: GameConfig, generator: G, session: Session) -> Result<Self> {
        config.validate()?;
        let viewport = Viewport::new(Point::default(), config.cell_size, config.size());
        let drag = DragShiftController::new(viewport, config.dead_zone);
        let grid = generator.generate(session.level());
        if grid.size() != config.size() {
            return Err(GameError::InvalidBoardShape);
        }

        log::debug!("Level {}: starting in {:?}", session.level(), Phase::PreGame);
        Ok(Self {
            config,
            generator,
            session,
            phase: Phase::PreGame,
            grid,
            filter: ViewFilter::DemonsOnly,
            drag,
        })
    }

    /// Places the grid's top-left corner at `origin` in pointer coordinates.
    pub fn with_origin(mut self, origin: Point) -> Self {
        let viewport = Viewport::new(origin, self.config.cell_size, self.config.size());
        let enabled = self.drag.is_enabled();
        self.drag = DragShiftController::new(viewport, self.config.dead_zone);
        self.drag.set_enabled(enabled);
        self
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn level(&self) -> u32 {
        self.session.level()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn drag(&self) -> &DragShiftController {
        &self.drag
    }

    /// The grid as the player may currently see it.
    pub fn view(&self) -> GridView {
        self.grid.view(self.filter)
    }

    /// Seconds the full grid should stay visible during [`Phase::ShowAll`].
    pub fn reveal_countdown(&self) -> u32 {
        self.config.reveal_secs(self.level())
    }

    /// Moves past the current phase: starts or ends the reveal, retries a lost level or starts the next one.
    pub fn advance(&mut self) -> Result<Vec<GameEvent>> {
        let next = match self.phase {
            Phase::PreGame => Phase::ShowAll,
            Phase::ShowAll => Phase::MoveAndSummon,
            Phase::MoveAndSummon => {
                return Err(GameError::WrongPhase {
                    expected: Phase::ShowAll,
                    actual: self.phase,
                });
            }
            Phase::Retry => Phase::PreGame,
            Phase::NextLevel => {
                self.session.advance();
                Phase::PreGame
            }
        };
        Ok(self.enter(next))
    }

    /// Feeds pointer input to the drag controller; ignored unless rows and columns may be moved.
    pub fn pointer(&mut self, event: PointerEvent) -> Result<Vec<GameEvent>> {
        if self.phase != Phase::MoveAndSummon {
            log::trace!("Ignoring {:?} during {:?}", event, self.phase);
            return Ok(Vec::new());
        }

        Ok(match self.drag.handle(event, &mut self.grid)? {
            Some(changed) => {
                log::trace!("Grid after shift:\n{}", self.grid);
                vec![GameEvent::GridChanged(changed), self.render()]
            }
            None => Vec::new(),
        })
    }

    /// Summons `rune`, converting flanked demons, and settles the level as won or lost.
    pub fn summon(&mut self, rune: Rune) -> Result<Vec<GameEvent>> {
        self.check_phase(Phase::MoveAndSummon)?;
        self.drag.set_enabled(false);
        self.filter = ViewFilter::DemonsAnd(rune);

        let mut events = vec![self.render()];
        let mut replay = self.grid.clone();
        let matches = summon(&mut self.grid, rune);
        for coords in matches {
            replay.set(coords, Cell::Rune(rune))?;
            events.push(GameEvent::SummonMatch(coords));
            events.push(GameEvent::Render(replay.view(self.filter)));
        }

        let won = self.grid.is_cleared();
        let level = self.level();
        if won {
            self.session.record_win();
        }
        log::debug!("Level {} {}", level, if won { "won" } else { "lost" });
        events.push(GameEvent::LevelResult { level, won });
        events.extend(self.enter(if won { Phase::NextLevel } else { Phase::Retry }));
        Ok(events)
    }

    /// Abandons the attempt and goes back to the first level.
    pub fn restart(&mut self) -> Vec<GameEvent> {
        self.session.reset();
        self.enter(Phase::PreGame)
    }

    /// Abandons the attempt and starts `level` from its beginning.
    pub fn jump_to_level(&mut self, level: u32) -> Vec<GameEvent> {
        self.session.jump_to(level);
        self.enter(Phase::PreGame)
    }

    fn enter(&mut self, phase: Phase) -> Vec<GameEvent> {
        log::debug!("Level {}: {:?} -> {:?}", self.level(), self.phase, phase);
        self.phase = phase;

        if phase == Phase::PreGame {
            self.grid = self.generator.generate(self.level());
        }
        self.drag.set_enabled(phase == Phase::MoveAndSummon);

        let mut events = vec![GameEvent::PhaseChanged(phase)];
        if let Some(filter) = phase.entry_filter() {
            self.filter = filter;
            events.push(self.render());
        }
        events
    }

    fn render(&self) -> GameEvent {
        GameEvent::Render(self.view())
    }

    fn check_phase(&self, expected: Phase) -> Result<()> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(GameError::WrongPhase {
                expected,
                actual: self.phase,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Hands out a fixed grid regardless of level.
    struct FixedGenerator(Grid);

    impl LevelGenerator for FixedGenerator {
        fn generate(&self, _level: u32) -> Grid {
            self.0.clone()
        }
    }

    fn rune(kind: u8) -> Rune {
        Rune::new(kind).unwrap()
    }

    /// 3x3 grid whose only demon, at (1, 1), sits between two 2s in row 1.
    fn fixed_game() -> Game<FixedGenerator> {
        let grid = Grid::from_columns(vec![vec![1, 2, 3], vec![4, 0, 5], vec![6, 2, 1]]).unwrap();
        let config = GameConfig {
            width: 3,
            height: 3,
            cell_size: 10.0,
            dead_zone: 2.0,
            ..Default::default()
        };
        Game::with_generator(config, FixedGenerator(grid), Session::default()).unwrap()
    }

    fn to_play(game: &mut Game<impl LevelGenerator>) {
        game.advance().unwrap();
        game.advance().unwrap();
        assert_eq!(game.phase(), Phase::MoveAndSummon);
    }

    fn drag(game: &mut Game<impl LevelGenerator>, from: Point, to: Point) -> Vec<GameEvent> {
        let mut events = game.pointer(PointerEvent::Down(from)).unwrap();
        events.extend(game.pointer(PointerEvent::Move(to)).unwrap());
        events.extend(game.pointer(PointerEvent::Up(to)).unwrap());
        events
    }

    fn phases(events: &[GameEvent]) -> Vec<Phase> {
        events
            .iter()
            .filter_map(|event| match event {
                GameEvent::PhaseChanged(phase) => Some(*phase),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn starts_in_pregame_showing_only_demons() {
        let game = Game::new(GameConfig::default(), Session::default()).unwrap();
        assert_eq!(game.phase(), Phase::PreGame);
        assert_eq!(game.level(), 1);
        assert_eq!(game.grid().demon_count(), 1);
        assert_eq!(game.view().hidden_count(), 35);
        assert!(!game.drag().is_enabled());
    }

    #[test]
    fn reveal_then_hide() {
        let mut game = fixed_game();

        let events = game.advance().unwrap();
        assert_eq!(phases(&events), [Phase::ShowAll]);
        assert!(matches!(&events[1], GameEvent::Render(view) if view.hidden_count() == 0));
        assert_eq!(game.reveal_countdown(), 60);

        let events = game.advance().unwrap();
        assert_eq!(phases(&events), [Phase::MoveAndSummon]);
        assert!(matches!(&events[1], GameEvent::Render(view) if view.hidden_count() == 8));
        assert!(game.drag().is_enabled());
    }

    #[test]
    fn pointer_is_ignored_outside_play_phase() {
        let mut game = fixed_game();
        let before = game.grid().clone();
        let events = drag(&mut game, Point::new(5.0, 15.0), Point::new(15.0, 15.0));
        assert!(events.is_empty());
        assert_eq!(game.grid(), &before);
    }

    #[test]
    fn drag_then_winning_summon() {
        let mut game = fixed_game();
        to_play(&mut game);

        let events = drag(&mut game, Point::new(5.0, 15.0), Point::new(15.0, 15.0));
        assert_eq!(
            events[0],
            GameEvent::GridChanged(GridChanged {
                axis: Axis::Horizontal,
                index: 1,
                delta_cells: 1,
            })
        );
        assert_eq!(game.grid()[(1, 1)], Cell::Rune(rune(2)));
        assert_eq!(game.grid()[(2, 1)], Cell::Demon);

        // row 1 now reads 2 2 0, so pull it back left by one to flank the demon
        let events = drag(&mut game, Point::new(25.0, 15.0), Point::new(14.0, 15.0));
        assert!(matches!(events[0], GameEvent::GridChanged(GridChanged { delta_cells: -1, .. })));
        let events = drag(&mut game, Point::new(25.0, 15.0), Point::new(36.0, 15.0));
        assert!(matches!(events[0], GameEvent::GridChanged(GridChanged { delta_cells: 1, .. })));
        let events = drag(&mut game, Point::new(5.0, 15.0), Point::new(-6.0, 15.0));
        assert!(matches!(events[0], GameEvent::GridChanged(GridChanged { delta_cells: -1, .. })));
        assert_eq!(game.grid()[(1, 1)], Cell::Demon);

        let events = game.summon(rune(2)).unwrap();
        assert!(matches!(&events[0], GameEvent::Render(view) if view.size() == (3, 3)));
        assert_eq!(events[1], GameEvent::SummonMatch((1, 1)));
        assert!(events.contains(&GameEvent::LevelResult { level: 1, won: true }));
        assert_eq!(phases(&events), [Phase::NextLevel]);
        assert_eq!(game.session().max_level_reached(), 2);
        assert!(!game.drag().is_enabled());

        let events = game.advance().unwrap();
        assert_eq!(phases(&events), [Phase::PreGame]);
        assert_eq!(game.level(), 2);
    }

    #[test]
    fn losing_summon_retries_same_layout() {
        let mut game = Game::new(GameConfig::default(), Session::new(12)).unwrap();
        let layout = game.grid().clone();
        to_play(&mut game);

        let rune = Rune::all()
            .find(|&rune| {
                let mut probe = layout.clone();
                summon(&mut probe, rune);
                !probe.is_cleared()
            })
            .unwrap();
        let events = game.summon(rune).unwrap();
        assert!(events.contains(&GameEvent::LevelResult { level: 12, won: false }));
        assert_eq!(game.phase(), Phase::Retry);
        assert_eq!(game.session().max_level_reached(), 12);

        game.advance().unwrap();
        assert_eq!(game.phase(), Phase::PreGame);
        assert_eq!(game.level(), 12);
        assert_eq!(game.grid(), &layout);
    }

    #[test]
    fn summon_requires_play_phase() {
        let mut game = fixed_game();
        assert_eq!(
            game.summon(rune(1)),
            Err(GameError::WrongPhase {
                expected: Phase::MoveAndSummon,
                actual: Phase::PreGame,
            })
        );
        to_play(&mut game);
        assert!(matches!(game.advance(), Err(GameError::WrongPhase { .. })));
    }

    #[test]
    fn summon_reveals_matches_one_by_one() {
        let grid = Grid::from_columns(vec![vec![3, 3, 2], vec![0, 0, 3], vec![3, 3, 2]]).unwrap();
        let config = GameConfig {
            width: 3,
            height: 3,
            ..Default::default()
        };
        let mut game = Game::with_generator(config, FixedGenerator(grid), Session::default()).unwrap();
        to_play(&mut game);

        let events = game.summon(rune(3)).unwrap();
        let renders: Vec<_> = events
            .iter()
            .filter_map(|event| match event {
                GameEvent::Render(view) => Some(view.tile_at((1, 1))),
                _ => None,
            })
            .collect();
        assert_eq!(renders, [Tile::Demon, Tile::Demon, Tile::Rune(rune(3))]);
        assert!(events.contains(&GameEvent::SummonMatch((1, 0))));
        assert!(events.contains(&GameEvent::LevelResult { level: 1, won: true }));
    }

    #[test]
    fn restart_and_jump_regenerate() {
        let mut game = Game::new(GameConfig::default(), Session::new(4)).unwrap();
        to_play(&mut game);

        let events = game.jump_to_level(9);
        assert_eq!(phases(&events), [Phase::PreGame]);
        assert_eq!(game.level(), 9);
        assert_eq!(game.grid().demon_count(), 2);
        assert!(!game.drag().is_enabled());

        game.restart();
        assert_eq!(game.level(), 1);
        assert_eq!(game.session().max_level_reached(), 9);
        assert_eq!(game.grid().demon_count(), 1);
    }

    #[test]
    fn rejects_generator_of_wrong_size() {
        let grid = Grid::from_columns(vec![vec![1, 2]]).unwrap();
        let result = Game::with_generator(GameConfig::default(), FixedGenerator(grid), Session::default());
        assert!(matches!(result, Err(GameError::InvalidBoardShape)));
    }

    #[test]
    fn origin_moves_the_drag_viewport() {
        let game = fixed_game().with_origin(Point::new(100.0, 100.0));
        assert_eq!(game.drag().viewport().cell_at(Point::new(105.0, 125.0)), Some((0, 2)));
    }
}
