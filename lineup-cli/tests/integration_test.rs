//! Integration tests for LineUp
//!
//! Tests the full stack: board and effects, turn protocol, history,
//! variants, the computer player, and saved games

use lineup_core::{
    board::{Board, Pos},
    disc::{clear_blast, resolve_effect, Disc, DiscKind},
    game::{legal_columns, simulate_placement, GameSession, TurnOutcome},
    ai::ImmediateWinAI,
    rules::WinRule,
    save::{load_game, save_game, SaveData},
    GameConfig, GameError, IllegalMove, PlayerId, Variant,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// ============================================================================
// TEST FIXTURES
// ============================================================================

const P1: PlayerId = PlayerId::One;
const P2: PlayerId = PlayerId::Two;

/// Standard 6x7 Classic game with a fixed seed
fn classic_game() -> GameSession {
    GameSession::new(GameConfig::default().with_seed(2024)).unwrap()
}

/// First seeded Classic game whose stock allocation satisfies `wanted`
fn classic_game_where(wanted: impl Fn(&GameSession) -> bool) -> GameSession {
    (0..100)
        .map(|seed| GameSession::new(GameConfig::default().with_seed(seed)).unwrap())
        .find(|session| wanted(session))
        .expect("no seed produced the wanted stock")
}

/// Ordinary-only 8x9 game
fn basic_game() -> GameSession {
    GameSession::new(GameConfig::for_variant(Variant::Basic).with_seed(7)).unwrap()
}

/// Drop ordinary discs straight onto a board, bypassing the session
fn stack(board: &mut Board, moves: &[(usize, PlayerId)]) {
    for &(col, owner) in moves {
        board.place_disc(col, Disc::ordinary(owner)).unwrap();
    }
}

/// Total discs in play: on the board plus in both stocks
fn discs_in_play(session: &GameSession) -> u32 {
    let stock: u32 = session.players().iter().map(|p| p.inventory.total()).sum();
    session.board().disc_count() as u32 + stock
}

fn has_floating_disc(board: &Board) -> bool {
    (0..board.cols()).any(|col| {
        (1..board.rows()).any(|row| {
            board.disc_at(Pos::new(row, col)).is_some()
                && board.disc_at(Pos::new(row - 1, col)).is_none()
        })
    })
}

// ============================================================================
// BOARD AND GRAVITY TESTS
// ============================================================================

#[test]
fn test_gravity_is_idempotent() {
    let mut board = Board::new(6, 7);
    board.set_disc(Pos::new(4, 1), Some(Disc::ordinary(P1)));
    board.set_disc(Pos::new(2, 1), Some(Disc::ordinary(P2)));
    board.set_disc(Pos::new(5, 6), Some(Disc::ordinary(P2)));

    board.apply_gravity();
    let settled = board.clone();
    assert!(!has_floating_disc(&board));

    let moved = board.apply_gravity();
    assert!(moved.is_empty());
    assert_eq!(board, settled);
}

#[test]
fn test_full_column_is_not_legal() {
    let mut board = Board::new(6, 7);
    for _ in 0..6 {
        board.place_disc(2, Disc::ordinary(P1)).unwrap();
    }
    let columns = legal_columns(&board);
    assert!(!columns.contains(&2));
    assert_eq!(columns.len(), 6);
    assert!(board.place_disc(2, Disc::ordinary(P2)).is_none());
}

// ============================================================================
// DISC EFFECT TESTS
// ============================================================================

#[test]
fn test_explosive_clears_neighbourhood_before_settling() {
    let mut board = Board::new(6, 7);
    stack(&mut board, &[(2, P1), (3, P2), (4, P1), (3, P1), (3, P2)]);
    let pos = Pos::new(board.column_height(3), 3);
    board.set_disc(pos, Some(Disc::new(DiscKind::Explosive, P1)));

    let cleared = clear_blast(&mut board, pos);
    for dr in -1isize..=1 {
        for dc in -1isize..=1 {
            let row = (pos.row as isize + dr) as usize;
            let col = (pos.col as isize + dc) as usize;
            assert!(board.disc_at(Pos::new(row, col)).is_none());
            assert!(cleared.contains(Pos::new(row, col)));
        }
    }
}

#[test]
fn test_explosive_discards_discs() {
    let mut session = classic_game_where(|s| s.player(P1).inventory.can_use(DiscKind::Explosive));
    session.apply_turn(3, DiscKind::Ordinary);
    session.apply_turn(3, DiscKind::Ordinary);
    let before = discs_in_play(&session);

    assert_eq!(session.apply_turn(3, DiscKind::Explosive), TurnOutcome::Continue);
    assert_eq!(session.board().column_height(3), 1);
    assert_eq!(session.board().owner_at(Pos::new(0, 3)), Some(P1));
    assert_eq!(discs_in_play(&session), before - 2);
}

#[test]
fn test_magnetic_without_partner_just_converts() {
    let mut board = Board::new(6, 7);
    stack(&mut board, &[(0, P2), (0, P2)]);
    let row = board.place_disc(0, Disc::new(DiscKind::Magnetic, P1)).unwrap();

    let outcome = resolve_effect(&mut board, Pos::new(row, 0));
    assert_eq!(board.disc_at(Pos::new(2, 0)), Some(Disc::ordinary(P1)));
    assert_eq!(board.owner_at(Pos::new(0, 0)), Some(P2));
    assert_eq!(board.owner_at(Pos::new(1, 0)), Some(P2));
    assert!(outcome.returned.is_empty());
}

#[test]
fn test_magnetic_pulls_own_disc_up() {
    let mut board = Board::new(6, 7);
    stack(&mut board, &[(0, P1), (0, P2), (0, P2)]);
    let row = board.place_disc(0, Disc::new(DiscKind::Magnetic, P1)).unwrap();

    resolve_effect(&mut board, Pos::new(row, 0));
    assert_eq!(board.owner_at(Pos::new(0, 0)), Some(P2));
    assert_eq!(board.owner_at(Pos::new(1, 0)), Some(P1));
    assert_eq!(board.owner_at(Pos::new(2, 0)), Some(P2));
    assert_eq!(board.disc_at(Pos::new(3, 0)), Some(Disc::ordinary(P1)));
}

#[test]
fn test_boring_credits_one_disc_per_removed() {
    let mut session = classic_game_where(|s| s.player(P2).inventory.can_use(DiscKind::Boring));
    session.apply_turn(5, DiscKind::Ordinary);
    session.apply_turn(5, DiscKind::Ordinary);
    session.apply_turn(5, DiscKind::Ordinary);

    let total = discs_in_play(&session);
    let p1_before = session.player(P1).inventory.count(DiscKind::Ordinary);
    let p2_before = session.player(P2).inventory.count(DiscKind::Ordinary);
    assert_eq!(session.apply_turn(5, DiscKind::Boring), TurnOutcome::Continue);

    assert_eq!(session.board().column_height(5), 1);
    assert_eq!(session.board().disc_at(Pos::new(0, 5)), Some(Disc::ordinary(P2)));
    assert_eq!(session.player(P1).inventory.count(DiscKind::Ordinary), p1_before + 2);
    assert_eq!(session.player(P2).inventory.count(DiscKind::Ordinary), p2_before + 1);
    assert_eq!(discs_in_play(&session), total);
}

// ============================================================================
// TURN PROTOCOL TESTS
// ============================================================================

#[test]
fn test_column_zero_vertical_win() {
    let mut session = classic_game();
    for _ in 0..3 {
        assert_eq!(session.apply_turn(0, DiscKind::Ordinary), TurnOutcome::Continue);
        assert_eq!(session.apply_turn(1, DiscKind::Ordinary), TurnOutcome::Continue);
    }
    match session.apply_turn(0, DiscKind::Ordinary) {
        TurnOutcome::Win(flags) => {
            assert!(flags.player1);
            assert!(!flags.player2);
        }
        other => panic!("expected a win, got {:?}", other),
    }
    assert_eq!(session.turn_number(), 7);
}

#[test]
fn test_ordinary_turns_conserve_discs() {
    let mut session = basic_game();
    let total = discs_in_play(&session);
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    for _ in 0..30 {
        if session.is_game_over() {
            break;
        }
        let columns = session.legal_columns();
        let col = columns[rng.gen_range(0..columns.len())];
        session.apply_turn(col, DiscKind::Ordinary);
        assert_eq!(discs_in_play(&session), total);
        assert!(!has_floating_disc(session.board()));
    }
}

#[test]
fn test_illegal_moves_leave_state_alone() {
    let mut session = basic_game();
    let before = session.capture();

    assert_eq!(
        session.apply_turn(9, DiscKind::Ordinary),
        TurnOutcome::Illegal(IllegalMove::ColumnUnavailable { col: 9 })
    );
    assert_eq!(
        session.apply_turn(0, DiscKind::Magnetic),
        TurnOutcome::Illegal(IllegalMove::KindNotAllowed { kind: DiscKind::Magnetic })
    );
    assert_eq!(session.capture(), before);
}

#[test]
fn test_simulation_matches_real_turn() {
    let mut session = basic_game();
    for col in [0, 4, 1, 4, 2] {
        session.apply_turn(col, DiscKind::Ordinary);
    }
    let me = session.current_player();
    let sim = simulate_placement(session.board(), 4, DiscKind::Ordinary, me, session.rule()).unwrap();
    assert!(!sim.wins.any());

    session.apply_turn(4, DiscKind::Ordinary);
    assert_eq!(&sim.board, session.board());
}

#[test]
fn test_win_length_is_configurable() {
    let config = GameConfig::default().with_win_len(3).with_seed(1);
    let mut session = GameSession::new(config).unwrap();
    assert_eq!(session.rule(), &WinRule::new(3).unwrap());

    session.apply_turn(0, DiscKind::Ordinary);
    session.apply_turn(6, DiscKind::Ordinary);
    session.apply_turn(1, DiscKind::Ordinary);
    session.apply_turn(6, DiscKind::Ordinary);
    assert!(matches!(
        session.apply_turn(2, DiscKind::Ordinary),
        TurnOutcome::Win(_)
    ));
}

// ============================================================================
// HISTORY TESTS
// ============================================================================

#[test]
fn test_undo_redo_round_trip() {
    let mut session = classic_game();
    for col in [3, 2, 3, 4] {
        session.apply_turn(col, DiscKind::Ordinary);
    }
    let live = session.capture();

    for _ in 0..4 {
        session.undo().unwrap();
    }
    assert_eq!(session.board().disc_count(), 0);
    assert!(matches!(session.undo(), Err(GameError::HistoryUnderflow { .. })));

    for _ in 0..4 {
        session.redo().unwrap();
    }
    assert_eq!(session.capture(), live);
}

#[test]
fn test_history_cap() {
    let config = GameConfig::for_variant(Variant::Basic).with_max_history(3);
    let mut session = GameSession::new(config).unwrap();
    for col in 0..6 {
        session.apply_turn(col, DiscKind::Ordinary);
    }
    assert_eq!(session.history().undo_len(), 3);
    session.undo().unwrap();
    session.undo().unwrap();
    assert!(session.undo().is_err());
    assert_eq!(session.turn_number(), 4);
}

// ============================================================================
// VARIANT TESTS
// ============================================================================

#[test]
fn test_spin_swaps_dimensions_and_keeps_discs() {
    let config = GameConfig::for_variant(Variant::Spin).with_seed(8);
    let mut session = GameSession::new(config).unwrap();
    for col in [8, 7, 6, 0, 1] {
        assert_eq!(session.apply_turn(col, DiscKind::Ordinary), TurnOutcome::Continue);
    }
    assert_eq!((session.board().rows(), session.board().cols()), (9, 8));
    assert_eq!(session.board().disc_count(), 5);
    assert!(!has_floating_disc(session.board()));
}

#[test]
fn test_classic_rejects_tall_boards() {
    let config = GameConfig::default().with_size(8, 7);
    assert!(matches!(
        GameSession::new(config),
        Err(GameError::InvalidBoardSize { .. })
    ));
}

// ============================================================================
// AI TESTS
// ============================================================================

#[test]
fn test_ai_does_not_mutate_session() {
    let session = classic_game();
    let before = session.capture();
    let mut ai = ImmediateWinAI::with_seed(1);
    assert!(ai.best_move(&session).is_some());
    assert_eq!(session.capture(), before);
}

#[test]
fn test_ai_selfplay_terminates_every_variant() {
    for (i, variant) in Variant::ALL.into_iter().enumerate() {
        let config = GameConfig::for_variant(variant).with_seed(i as u64);
        let mut session = GameSession::new(config).unwrap();
        let mut ai = ImmediateWinAI::with_seed(i as u64);
        ai.play_game(&mut session, 1_000);
        assert!(session.is_game_over(), "{} game did not finish", variant);
    }
}

// ============================================================================
// SAVE / LOAD TESTS
// ============================================================================

#[test]
fn test_save_load_reproduces_session() {
    let mut session = classic_game();
    let mut ai = ImmediateWinAI::with_seed(4);
    ai.play_game(&mut session, 9);
    session.undo().unwrap();

    let path = std::env::temp_dir().join(format!("lineup-it-{}.json", std::process::id()));
    save_game(&session, &path).unwrap();
    let loaded = load_game(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded.capture(), session.capture());
    assert_eq!(loaded.variant(), session.variant());
    assert_eq!(loaded.history().undo_len(), session.history().undo_len());
    assert_eq!(loaded.history().redo_len(), session.history().redo_len());
}

#[test]
fn test_numeric_kinds_load() {
    let session = basic_game();
    let json = serde_json::to_string(&SaveData::from_session(&session)).unwrap();
    // inventories keyed by index instead of name
    let json = json.replace(r#""Ordinary":"#, r#""0":"#);
    let data: SaveData = serde_json::from_str(&json).unwrap();
    let loaded = data.into_session().unwrap();
    assert_eq!(loaded.player(P1).inventory.count(DiscKind::Ordinary), 36);
}
