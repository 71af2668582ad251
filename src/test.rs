#[cfg(test)]
pub mod test {
    use anyhow::Result;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Instant;

    use crate::evaluation::{evaluate, score_line, window_count};
    use crate::win::{find_connection, has_connection, Direction};
    use crate::*;

    const A: Token = Token(1);
    const B: Token = Token(2);
    const E: Cell = Cell::Empty;
    const CA: Cell = Cell::Occupied(A);
    const CB: Cell = Cell::Occupied(B);

    fn stack(grid: &mut Grid, column: usize, tokens: &[Token]) -> Result<()> {
        for &token in tokens {
            grid.insert(column, token)?;
        }
        Ok(())
    }

    fn humans() -> GameConfig {
        GameConfig::default().with_players(vec![
            PlayerSpec::human("Red", A),
            PlayerSpec::human("Yellow", B),
        ])
    }

    #[test]
    pub fn insert_then_remove_restores_grid() -> Result<()> {
        for moves in ["", "4455", "1212121", "7654321", "444444"].iter() {
            let grid = Grid::from_moves(6, 7, &[A, B], moves)?;
            for column in 0..grid.columns() {
                if !grid.is_column_open(column)? {
                    continue;
                }
                let mut probe = grid.clone();
                probe.insert(column, A)?;
                assert_eq!(probe.remove_top_of(column)?, A);
                assert_eq!(probe, grid);
            }
        }
        Ok(())
    }

    #[test]
    pub fn insert_stacks_from_the_bottom() -> Result<()> {
        let mut grid = Grid::new(6, 7);
        assert_eq!(grid.insert(2, A)?, 0);
        assert_eq!(grid.insert(2, B)?, 1);
        assert_eq!(grid.cell_at(0, 2)?, CA);
        assert_eq!(grid.cell_at(1, 2)?, CB);
        assert_eq!(grid.cell_at(2, 2)?, E);
        assert_eq!(grid.height(2)?, 2);
        assert_eq!(grid.occupied(), 2);
        Ok(())
    }

    #[test]
    pub fn full_column_rejects_insert() -> Result<()> {
        let mut grid = Grid::new(6, 7);
        stack(&mut grid, 0, &[A, B, A, B, A, B])?;
        assert!(!grid.is_column_open(0)?);

        let before = grid.clone();
        assert_eq!(grid.insert(0, A), Err(GridError::ColumnFull(0)));
        assert_eq!(grid, before);
        assert_eq!(grid.open_columns().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5, 6]);
        Ok(())
    }

    #[test]
    pub fn out_of_range_columns() {
        let mut grid = Grid::new(6, 7);
        let invalid = GridError::InvalidColumn {
            column: 7,
            columns: 7,
        };
        assert_eq!(grid.insert(7, A), Err(invalid));
        assert_eq!(grid.remove_top_of(7), Err(invalid));
        assert_eq!(grid.is_column_open(7), Err(invalid));
        assert_eq!(grid.cell_at(0, 7), Err(invalid));
        assert_eq!(grid, Grid::new(6, 7));
    }

    #[test]
    pub fn remove_from_empty_column() {
        let mut grid = Grid::new(6, 7);
        assert_eq!(grid.remove_top_of(3), Err(GridError::EmptyColumn(3)));
        assert_eq!(
            EngineError::from(GridError::EmptyColumn(3)),
            EngineError::EmptyColumnOnUndo(3)
        );
    }

    #[test]
    pub fn reset_clears_grid() -> Result<()> {
        let mut grid = Grid::from_moves(6, 7, &[A, B], "4455667")?;
        grid.reset();
        assert_eq!(grid, Grid::new(6, 7));
        assert!(Grid::from_moves(6, 7, &[A, B], "12x").is_err());
        assert!(Grid::from_moves(6, 7, &[A, B], "8").is_err());
        Ok(())
    }

    #[test]
    pub fn vertical_connection() -> Result<()> {
        let mut grid = Grid::new(6, 7);
        for _ in 0..3 {
            grid.insert(3, A)?;
        }
        assert!(!has_connection(&grid, 4));

        grid.insert(3, A)?;
        assert!(has_connection(&grid, 4));
        let connection = find_connection(&grid, 4).expect("a vertical line");
        assert_eq!(connection.token, A);
        assert_eq!(connection.start, (0, 3));
        assert_eq!(connection.direction, Direction::Vertical);
        Ok(())
    }

    #[test]
    pub fn horizontal_connection() -> Result<()> {
        let mut grid = Grid::new(6, 7);
        for column in 2..6 {
            grid.insert(column, B)?;
        }
        let connection = find_connection(&grid, 4).expect("a horizontal line");
        assert_eq!(connection.token, B);
        assert_eq!(connection.direction, Direction::Horizontal);
        Ok(())
    }

    #[test]
    pub fn diagonal_connection() -> Result<()> {
        let mut grid = Grid::new(6, 7);
        stack(&mut grid, 0, &[A])?;
        stack(&mut grid, 1, &[B, A])?;
        stack(&mut grid, 2, &[B, B, A])?;
        stack(&mut grid, 3, &[B, B, B, A])?;

        let connection = find_connection(&grid, 4).expect("a diagonal line");
        assert_eq!(connection.token, A);
        assert_eq!(connection.start, (0, 0));
        assert_eq!(connection.direction, Direction::Diagonal);
        Ok(())
    }

    #[test]
    pub fn anti_diagonal_connection() -> Result<()> {
        let mut grid = Grid::new(6, 7);
        stack(&mut grid, 3, &[A])?;
        stack(&mut grid, 2, &[B, A])?;
        stack(&mut grid, 1, &[B, B, A])?;
        stack(&mut grid, 0, &[B, B, B, A])?;

        let connection = find_connection(&grid, 4).expect("an anti-diagonal line");
        assert_eq!(connection.token, A);
        assert_eq!(connection.start, (0, 3));
        assert_eq!(connection.direction, Direction::AntiDiagonal);
        Ok(())
    }

    #[test]
    pub fn three_in_a_row_is_not_a_connection() -> Result<()> {
        let mut grid = Grid::new(6, 7);
        for column in 0..3 {
            grid.insert(column, A)?;
        }
        stack(&mut grid, 6, &[B, B, B])?;
        stack(&mut grid, 4, &[A, B])?;

        assert!(!has_connection(&grid, 4));
        assert!(has_connection(&grid, 3));
        assert_eq!(GameOutcome::of(&grid, 4), GameOutcome::Ongoing);
        Ok(())
    }

    #[test]
    pub fn full_grid_without_line_is_a_draw() -> Result<()> {
        let grid = Grid::from_moves(2, 2, &[A, B], "1212")?;
        assert!(grid.is_full());
        assert_eq!(GameOutcome::of(&grid, 3), GameOutcome::Draw);
        assert_eq!(GameOutcome::of(&grid, 2), GameOutcome::Win(A));
        Ok(())
    }

    #[test]
    pub fn line_scores() {
        assert_eq!(score_line(&[CA, CA, CA, CA], A, B), 100);
        assert_eq!(score_line(&[CA, CA, CA, E], A, B), 5);
        assert_eq!(score_line(&[E, CA, CA, CA], A, B), 5);
        assert_eq!(score_line(&[CA, E, CA, E], A, B), 2);
        assert_eq!(score_line(&[CB, CB, E, CB], A, B), -4);

        assert_eq!(score_line(&[E, E, E, E], A, B), 0);
        assert_eq!(score_line(&[CA, E, E, E], A, B), 0);
        assert_eq!(score_line(&[CA, CA, CA, CB], A, B), 0);
        assert_eq!(score_line(&[CA, CA, CB, E], A, B), 0);
        assert_eq!(score_line(&[CA, CB, CB, CB], A, B), 0);
        assert_eq!(score_line(&[CB, CB, E, E], A, B), 0);
        assert_eq!(score_line(&[CB, CB, CB, CB], A, B), 0);
    }

    #[test]
    pub fn three_own_window_from_grid() -> Result<()> {
        let mut grid = Grid::new(6, 7);
        for column in 0..3 {
            grid.insert(column, A)?;
        }
        let window = (0..4)
            .map(|column| grid.cell_at(0, column))
            .collect::<Result<Vec<_>, _>>()?;
        assert_eq!(window, vec![CA, CA, CA, E]);
        assert_eq!(score_line(&window, A, B), 5);
        Ok(())
    }

    #[test]
    pub fn board_evaluation() -> Result<()> {
        let mut grid = Grid::new(6, 7);
        assert_eq!(window_count(&grid, 4), 24 + 21 + 12 + 12);
        assert_eq!(evaluate(&grid, 4, A, B), 0);

        grid.insert(0, A)?;
        grid.insert(1, A)?;
        // only the leftmost horizontal window holds two tiles
        assert_eq!(evaluate(&grid, 4, A, B), 2);
        assert_eq!(evaluate(&grid, 4, B, A), 0);

        grid.insert(2, A)?;
        // 5 for columns 1-4, 2 for columns 2-5 (one-indexed)
        assert_eq!(evaluate(&grid, 4, A, B), 5 + 2);
        assert_eq!(evaluate(&grid, 4, B, A), -4);
        Ok(())
    }

    #[test]
    pub fn depth_zero_is_static_evaluation() -> Result<()> {
        let mut grid = Grid::from_moves(6, 7, &[A, B], "4453")?;
        let before = grid.clone();
        let mut engine = SearchEngine::new(4, A, B);

        let score = engine.minimax(&mut grid, 0, i32::MIN, i32::MAX, true)?;
        assert_eq!(score, evaluate(&grid, 4, A, B));
        assert_eq!(engine.evaluations, 1);
        assert_eq!(engine.node_count, 1);
        assert_eq!(grid, before);
        Ok(())
    }

    #[test]
    pub fn ties_go_to_the_lowest_column() -> Result<()> {
        let mut grid = Grid::new(6, 7);
        let mut engine = SearchEngine::new(4, A, B);
        // a lone tile never scores, so every column ties
        assert_eq!(engine.choose_column(&mut grid, 1)?, Some(0));
        assert_eq!(engine.evaluations, 7);
        Ok(())
    }

    #[test]
    pub fn never_chooses_a_full_column() -> Result<()> {
        let mut grid = Grid::new(6, 7);
        stack(&mut grid, 0, &[A, B, A, B, A, B])?;
        stack(&mut grid, 1, &[B, A, B, A, B, A])?;
        let before = grid.clone();

        for depth in 1..=3 {
            let mut engine = SearchEngine::new(4, A, B);
            let column = engine.choose_column(&mut grid, depth)?.expect("open columns left");
            assert!(column >= 2);
            assert!(grid.is_column_open(column)?);
            assert_eq!(grid, before);
        }
        Ok(())
    }

    #[test]
    pub fn takes_an_immediate_win() -> Result<()> {
        let mut grid = Grid::new(6, 7);
        stack(&mut grid, 0, &[A, B])?;
        stack(&mut grid, 1, &[A, B])?;
        stack(&mut grid, 2, &[A])?;

        for &depth in [1, 3].iter() {
            let mut engine = SearchEngine::new(4, A, B);
            assert_eq!(engine.choose_column(&mut grid, depth)?, Some(3));
        }
        Ok(())
    }

    #[test]
    pub fn full_grid_has_no_move() -> Result<()> {
        let mut grid = Grid::from_moves(1, 2, &[A, B], "12")?;
        let mut engine = SearchEngine::new(2, A, B);
        assert_eq!(engine.choose_column(&mut grid, 3)?, None);

        // no open column mid-search falls back to the static score
        let score = engine.minimax(&mut grid, 2, i32::MIN, i32::MAX, true)?;
        assert_eq!(score, evaluate(&grid, 2, A, B));
        Ok(())
    }

    #[test]
    pub fn alpha_beta_prunes() -> Result<()> {
        let mut grid = Grid::new(6, 7);
        let mut engine = SearchEngine::new(4, A, B);
        engine.choose_column(&mut grid, 3)?;

        // a full depth-3 tree below the root visits 7 * (1 + 7 * (1 + 7)) nodes
        assert!(engine.node_count < 7 * (1 + 7 * 8));
        assert_eq!(grid, Grid::new(6, 7));

        engine.reset_counters();
        assert_eq!((engine.node_count, engine.evaluations), (0, 0));
        Ok(())
    }

    #[test]
    pub fn human_game_to_a_win() -> Result<()> {
        let mut game = TurnController::new(humans())?;
        assert_eq!(game.phase(), Phase::AwaitingMove(0));
        assert!(game.pending().is_none());

        for &column in [0, 1, 0, 1, 0, 1].iter() {
            let report = game.apply_move(column)?;
            assert!(report.accepted);
            assert_eq!(report.outcome, GameOutcome::Ongoing);
        }
        let report = game.apply_move(0)?;
        assert_eq!(report.row, Some(3));
        assert_eq!(report.outcome, GameOutcome::Win(A));
        assert_eq!(game.phase(), Phase::GameOver(GameOutcome::Win(A)));
        assert!(game.active_player().is_none());
        assert_eq!(game.history(), "1212121");

        assert_eq!(game.apply_move(2), Err(EngineError::GameOver));
        Ok(())
    }

    #[test]
    pub fn full_column_move_is_rejected() -> Result<()> {
        let mut game = TurnController::new(humans())?;
        for _ in 0..6 {
            assert!(game.apply_move(4)?.accepted);
        }
        let before = game.grid().clone();

        let report = game.apply_move(4)?;
        assert!(!report.accepted);
        assert_eq!(report.row, None);
        assert_eq!(report.outcome, GameOutcome::Ongoing);
        assert_eq!(game.grid(), &before);
        assert_eq!(game.phase(), Phase::AwaitingMove(0));
        assert_eq!(game.history(), "555555");
        Ok(())
    }

    #[test]
    pub fn invalid_column_fails() -> Result<()> {
        let mut game = TurnController::new(humans())?;
        assert_eq!(
            game.apply_move(7),
            Err(EngineError::InvalidColumn {
                column: 7,
                columns: 7
            })
        );
        assert_eq!(game.click_cell(5, 2)?.row, Some(0));
        Ok(())
    }

    #[test]
    pub fn draw_ends_the_game() -> Result<()> {
        let mut config = humans();
        config.rows = 1;
        config.columns = 4;
        config.win_length = 3;
        let mut game = TurnController::new(config)?;

        for &column in [0, 1, 2].iter() {
            assert_eq!(game.apply_move(column)?.outcome, GameOutcome::Ongoing);
        }
        assert_eq!(game.apply_move(3)?.outcome, GameOutcome::Draw);
        assert_eq!(game.phase(), Phase::GameOver(GameOutcome::Draw));
        Ok(())
    }

    #[test]
    pub fn automated_reply_waits_for_its_delay() -> Result<()> {
        let mut game = TurnController::new(GameConfig::default())?;
        game.apply_move(3)?;

        let pending = game.pending().expect("computer to move");
        assert_eq!(pending.player, 1);
        assert_eq!(pending.generation, 0);
        assert_eq!(game.apply_move(3), Err(EngineError::NotAwaitingHuman));

        assert_eq!(game.poll(Instant::now())?, None);
        let reply = game.poll(pending.due)?.expect("a reply once due");
        assert_eq!(reply.player, 1);
        assert_eq!(reply.token, B);
        assert_eq!(game.grid().cell_at(reply.row, reply.column)?, CB);
        assert_eq!(game.phase(), Phase::AwaitingMove(0));
        assert!(game.pending().is_none());

        // a ticket only resolves once
        assert_eq!(game.resolve(pending)?, None);
        Ok(())
    }

    #[test]
    pub fn reset_discards_stale_moves() -> Result<()> {
        let mut game = TurnController::new(GameConfig::default())?;
        game.apply_move(0)?;
        let stale = game.pending().expect("computer to move");

        game.reset();
        assert_eq!(game.generation(), 1);
        assert_eq!(game.resolve(stale)?, None);
        assert_eq!(game.grid(), &Grid::new(6, 7));
        assert_eq!(game.history(), "");
        assert_eq!(game.phase(), Phase::AwaitingMove(0));
        Ok(())
    }

    #[derive(Default)]
    struct Recorder {
        moves: Vec<AutomatedMove>,
        resets: usize,
    }

    struct SharedRecorder(Rc<RefCell<Recorder>>);

    impl GameListener for SharedRecorder {
        fn on_automated_move(&mut self, automated_move: &AutomatedMove) {
            self.0.borrow_mut().moves.push(*automated_move);
        }

        fn on_reset(&mut self) {
            self.0.borrow_mut().resets += 1;
        }
    }

    #[test]
    pub fn listener_sees_automated_moves_and_resets() -> Result<()> {
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        let mut game = TurnController::new(GameConfig::default())?
            .with_listener(Box::new(SharedRecorder(recorder.clone())));

        game.apply_move(3)?;
        let replies = game.run_until_human()?;
        assert_eq!(replies.len(), 1);
        game.reset();

        let recorder = recorder.borrow();
        assert_eq!(recorder.moves, replies);
        assert_eq!(recorder.resets, 1);
        Ok(())
    }

    #[test]
    pub fn seeded_random_games_repeat() -> Result<()> {
        let config = GameConfig::default()
            .with_players(vec![
                PlayerSpec::random("Left", A),
                PlayerSpec::random("Right", B),
            ])
            .with_seed(7);

        let mut first = TurnController::new(config.clone())?;
        let mut second = TurnController::new(config)?;
        assert!(first.pending().is_some());
        assert_eq!(first.apply_move(0), Err(EngineError::NotAwaitingHuman));

        first.run_until_human()?;
        second.run_until_human()?;
        assert!(first.outcome().is_terminal());
        assert_eq!(first.history(), second.history());
        assert_eq!(first.phase(), second.phase());

        first.reset();
        assert_eq!(first.pending().map(|pending| pending.generation), Some(1));
        Ok(())
    }

    #[test]
    pub fn three_players_take_turns() -> Result<()> {
        let c = Token(3);
        let config = humans().with_players(vec![
            PlayerSpec::human("One", A),
            PlayerSpec::human("Two", B),
            PlayerSpec::minimax("Three", c, 2),
        ]);
        let mut game = TurnController::new(config)?;
        assert_eq!(game.players()[2].opponent, A);
        assert_eq!(game.players()[0].opponent, B);

        game.apply_move(0)?;
        game.apply_move(1)?;
        assert_eq!(game.active_player().map(|player| player.token), Some(c));
        let reply = game.run_until_human()?;
        assert_eq!(reply.len(), 1);
        assert_eq!(reply[0].token, c);
        assert_eq!(game.phase(), Phase::AwaitingMove(0));
        Ok(())
    }

    #[test]
    pub fn config_from_toml() -> Result<()> {
        let config = GameConfig::from_toml_str(
            r#"
            rows = 5
            columns = 6
            automated_delay_ms = 250
            seed = 42

            [[players]]
            label = "You"
            token = 1
            kind = "human"

            [[players]]
            label = "Computer"
            token = 2
            kind = "minimax"
            search_depth = 4
            "#,
        )?;
        assert_eq!((config.rows, config.columns, config.win_length), (5, 6, 4));
        assert_eq!(config.automated_delay_ms, 250);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.players[1], PlayerSpec::minimax("Computer", B, 4));
        Ok(())
    }

    #[test]
    pub fn config_from_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("game.toml");
        std::fs::write(
            &path,
            r#"
            rows = 4
            columns = 5
            win_length = 3

            [[players]]
            label = "Left"
            token = 1
            kind = "random"

            [[players]]
            label = "Right"
            token = 2
            kind = "human"
            "#,
        )?;

        let config = GameConfig::load(&path)?;
        assert_eq!((config.rows, config.columns, config.win_length), (4, 5, 3));
        assert_eq!(config.players[0], PlayerSpec::random("Left", A));
        assert_eq!(config.players[1], PlayerSpec::human("Right", B));

        let missing = dir.path().join("missing.toml");
        match GameConfig::load(&missing) {
            Err(ConfigError::Read { path, .. }) => assert_eq!(path, missing),
            other => panic!("expected a read error, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    pub fn invalid_configs() {
        let mut config = GameConfig::default();
        assert!(config.validate().is_ok());

        config.players[1].token = A;
        assert!(matches!(config.validate(), Err(ConfigError::DuplicateToken(1))));

        config.players.truncate(1);
        assert!(matches!(config.validate(), Err(ConfigError::TooFewPlayers(1))));

        let mut config = GameConfig::default();
        config.win_length = 8;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidWinLength { win_length: 8, .. })
        ));

        config.rows = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDimensions { rows: 0, .. })
        ));
        assert!(TurnController::new(config).is_err());
        assert!(GameConfig::from_toml_str("rows = \"six\"").is_err());
    }

    #[test]
    pub fn arena_tallies_every_game() -> Result<()> {
        let config = GameConfig::default()
            .with_players(vec![
                PlayerSpec::random("Random", A),
                PlayerSpec::minimax("Minimax", B, 2),
            ])
            .with_seed(3);

        let summary = arena::run(&config, 6, false)?;
        assert_eq!(summary.games(), 6);
        assert_eq!(summary.wins_for(A) + summary.wins_for(B) + summary.draws, 6);
        assert_eq!(arena::run(&config, 6, false)?, summary);

        assert!(arena::run(&GameConfig::default(), 1, false).is_err());
        Ok(())
    }
}
