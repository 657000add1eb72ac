use super::*;
use proptest::prelude::*;
use tempfile::TempDir;

use crate::map::{ObjectiveItem, ROWS};

fn options(dir: &TempDir) -> SessionOptions {
    SessionOptions {
        seed: Some(11),
        save_path: dir.path().join("maze_save.txt"),
        ..SessionOptions::default()
    }
}

fn playing(level: LevelId) -> (TempDir, GameSession) {
    let dir = tempfile::tempdir().unwrap();
    let mut session = GameSession::new(options(&dir));
    session.start_new_game();
    if level != LevelId::FIRST {
        session.load_level(level);
    }
    session.drain_cues();
    (dir, session)
}

fn place_player(session: &mut GameSession, point: Point) {
    let old = session.player.point;
    session.grid.set_cell(old, Cell::Floor);
    session.player.point = point;
    session.grid.set_cell(point, Cell::Player);
}

fn cues(session: &mut GameSession) -> Vec<Cue> {
    session.drain_cues().into_iter().collect()
}

#[test]
fn new_game_starts_on_level_one() {
    let (_dir, session) = playing(LevelId::FIRST);
    assert_eq!(session.phase(), Phase::Playing);
    assert_eq!(session.player().point, PLAYER_START);
    assert_eq!(session.player().facing, Facing::Down);
    assert_eq!(session.grid().count(Cell::Player), 1);
    assert!(session.narrative().contains("=== Level 1: The Cursed Labyrinth ==="));
    assert_eq!(session.objective(), "Find the Crystal of Eternity.");
}

#[test]
fn walls_and_the_sage_block_movement() {
    let (_dir, mut session) = playing(LevelId::FIRST);
    session.apply(Command::Move(Direction::North));
    assert_eq!(session.player().point, PLAYER_START);
    assert_eq!(session.player().facing, Facing::Down);

    place_player(&mut session, Point::new(1, 2));
    session.apply(Command::Move(Direction::East));
    assert_eq!(session.player().point, Point::new(1, 2));
    assert_eq!(session.grid().cell_at(Point::new(2, 2)), Some(Cell::Sage));
}

#[test]
fn stepping_onto_the_item_collects_it() {
    let (_dir, mut session) = playing(LevelId::FIRST);
    let target = Point::new(2, 1);
    session
        .grid
        .set_cell(target, Cell::Item(ObjectiveItem::Crystal));

    session.apply(Command::Move(Direction::East));
    assert!(session.player().has_item);
    assert_eq!(session.player().point, target);
    assert_eq!(session.player().facing, Facing::Right);
    assert_eq!(session.objective(), ITEM_FOUND_OBJECTIVE);
    assert!(session.narrative().contains("You acquired the Crystal of Eternity!"));
    assert!(cues(&mut session).contains(&Cue::Pickup));

    session.apply(Command::Move(Direction::West));
    assert_eq!(session.grid().cell_at(target), Some(Cell::Floor));
    assert_eq!(session.grid().cell_at(PLAYER_START), Some(Cell::Player));
}

#[test]
fn second_copy_of_the_item_is_ignored() {
    let (_dir, mut session) = playing(LevelId::FIRST);
    session.player.has_item = true;
    session
        .grid
        .set_cell(Point::new(2, 1), Cell::Item(ObjectiveItem::Crystal));
    let lines = session.narrative().len();

    session.apply(Command::Move(Direction::East));
    assert_eq!(session.player().point, Point::new(2, 1));
    assert_eq!(session.narrative().len(), lines);
    assert!(!cues(&mut session).contains(&Cue::Pickup));
}

#[test]
fn sealed_exit_does_not_move_the_player() {
    let (_dir, mut session) = playing(LevelId::FIRST);
    place_player(&mut session, Point::new(7, 1));
    session.apply(Command::Move(Direction::East));
    assert_eq!(session.level(), LevelId::FIRST);
    assert_eq!(session.player().point, Point::new(7, 1));
    assert!(session
        .narrative()
        .contains("Exit is sealed without the Crystal of Eternity."));
    assert_eq!(cues(&mut session), vec![Cue::Locked]);
}

#[test]
fn exit_with_the_item_loads_the_next_level() {
    let (_dir, mut session) = playing(LevelId::FIRST);
    place_player(&mut session, Point::new(7, 1));
    session.player.has_item = true;
    session.apply(Command::Move(Direction::East));
    assert_eq!(session.level(), LevelId::new(2).unwrap());
    assert_eq!(session.phase(), Phase::Playing);
    assert_eq!(session.player().point, PLAYER_START);
    assert!(!session.player().has_item);
    assert_eq!(session.player().sage_stage, 0);
    assert_eq!(session.objective(), "Seal the Ancient Altar.");
}

#[test]
fn final_exit_wins_and_stays_won() {
    let (_dir, mut session) = playing(LevelId::FINAL);
    place_player(&mut session, Point::new(2, 8));
    session.player.has_item = true;
    session.apply(Command::Move(Direction::West));
    assert_eq!(session.phase(), Phase::Won);
    assert!(cues(&mut session).contains(&Cue::Win));

    let before = session.player().clone();
    session.apply(Command::Move(Direction::East));
    assert_eq!(session.advance(session.tick_interval() * 3), 0);
    assert_eq!(session.player(), &before);
    assert_eq!(session.phase(), Phase::Won);

    session.apply(Command::QuitToMenu);
    assert_eq!(session.phase(), Phase::Menu);
}

#[test]
fn walking_into_a_guardian_ends_the_game() {
    let (_dir, mut session) = playing(LevelId::FIRST);
    place_player(&mut session, Point::new(7, 3));
    session.apply(Command::Move(Direction::West));
    assert_eq!(session.phase(), Phase::Menu);
    assert_eq!(session.notice(), Some(&Notice::Defeat));
    assert_eq!(Notice::Defeat.body(), "Game Over! You were caught.");
    assert!(cues(&mut session).contains(&Cue::Lose));
}

#[test]
fn traps_end_the_game() {
    let (_dir, mut session) = playing(LevelId::FIRST);
    place_player(&mut session, Point::new(1, 6));
    session.apply(Command::Move(Direction::East));
    assert_eq!(session.phase(), Phase::Menu);
    assert_eq!(session.notice(), Some(&Notice::Defeat));
}

#[test]
fn pause_freezes_hostiles_until_resume() {
    let (_dir, mut session) = playing(LevelId::FIRST);
    let interval = session.tick_interval();
    session.apply(Command::Pause);
    assert_eq!(session.phase(), Phase::Paused);

    let frozen = session.monsters().hostiles();
    for _ in 0..5 {
        assert_eq!(session.advance(interval), 0);
    }
    assert_eq!(session.monsters().hostiles(), frozen);

    session.apply(Command::Resume);
    assert_eq!(session.phase(), Phase::Playing);
    let mut ticks = 0;
    for _ in 0..40 {
        ticks += session.advance(interval);
    }
    assert_eq!(ticks, 40);
    assert_ne!(session.monsters().hostiles(), frozen);
    assert_eq!(session.phase(), Phase::Playing);
}

#[test]
fn pending_notice_holds_the_clocks() {
    let (_dir, mut session) = playing(LevelId::FIRST);
    let interval = session.tick_interval();
    session.apply(Command::Help);
    assert_eq!(session.notice(), Some(&Notice::Help));
    assert_eq!(session.advance(interval * 3), 0);

    session.apply(Command::Move(Direction::South));
    assert_eq!(session.player().point, PLAYER_START);

    session.dismiss_notice();
    assert_eq!(session.advance(interval), 1);
}

#[test]
fn sage_dialogue_is_staged() {
    let (_dir, mut session) = playing(LevelId::FIRST);
    let spec = LevelId::FIRST.spec();

    session.apply(Command::Interact);
    assert_eq!(session.player().sage_stage, 1);
    assert_eq!(session.speech(), Some(spec.sage_first));
    assert_eq!(session.narrative().last_line(), Some(spec.sage_first));
    assert_eq!(cues(&mut session), vec![Cue::Sage]);

    session.apply(Command::Interact);
    assert_eq!(session.speech(), Some(spec.sage_repeat));

    session.apply(Command::Pause);
    session.advance(Duration::from_millis(3_000));
    assert_eq!(session.speech(), None);
}

#[test]
fn nothing_nearby_to_interact_with() {
    let (_dir, mut session) = playing(LevelId::FIRST);
    place_player(&mut session, Point::new(1, 5));
    session.apply(Command::Interact);
    assert_eq!(session.narrative().last_line(), Some("Nothing to interact with."));
    assert!(cues(&mut session).is_empty());
}

#[test]
fn warden_needs_the_heart() {
    let (_dir, mut session) = playing(LevelId::FINAL);
    let warden = session.monsters().boss_position().unwrap();
    assert_eq!(warden, Point::new(5, 6));
    place_player(&mut session, Point::new(6, 6));

    session.apply(Command::Interact);
    assert!(session.monsters().boss_alive());
    assert_eq!(
        session.narrative().last_line(),
        Some("You need the Warden's Heart to challenge the Warden!")
    );
    assert_eq!(cues(&mut session), vec![Cue::Locked]);

    session.player.has_item = true;
    session.apply(Command::Interact);
    assert!(!session.monsters().boss_alive());
    assert_eq!(session.grid().cell_at(warden), Some(Cell::Floor));
    assert!(session.narrative().contains("Warden defeated! The curse is broken!"));
    assert_eq!(cues(&mut session), vec![Cue::BossDefeat]);

    session.apply(Command::Interact);
    assert_eq!(session.narrative().last_line(), Some("Nothing to interact with."));
}

#[test]
fn warden_is_ignored_before_the_final_level() {
    let (_dir, mut session) = playing(LevelId::FIRST);
    session.monsters.reset_for_level(LevelId::FINAL, &mut session.grid);
    session.player.has_item = true;
    place_player(&mut session, Point::new(6, 6));
    session.apply(Command::Interact);
    assert!(session.monsters().boss_alive());
}

#[test]
fn item_glows_within_two_cells() {
    let (_dir, mut session) = playing(LevelId::FIRST);
    place_player(&mut session, Point::new(8, 6));
    session.check_proximity();
    assert!(session.item_nearby());
    assert_eq!(cues(&mut session), vec![Cue::Glow]);

    place_player(&mut session, Point::new(8, 5));
    session.check_proximity();
    assert!(!session.item_nearby());

    place_player(&mut session, Point::new(8, 6));
    session.player.has_item = true;
    session.check_proximity();
    assert!(!session.item_nearby());
    assert!(cues(&mut session).is_empty());
}

#[test]
fn glow_pulses_only_while_playing() {
    let (_dir, mut session) = playing(LevelId::FIRST);
    let start = session.glow();
    session.pause();
    session.advance(Duration::from_millis(500));
    assert_eq!(session.glow(), start);
    session.resume();
    session.advance(Duration::from_millis(80));
    assert!(session.glow() > start);
}

#[test]
fn save_then_continue_restores_level_and_item() {
    let (dir, mut session) = playing(LevelId::new(2).unwrap());
    session.player.has_item = true;
    session.apply(Command::Save);
    assert_eq!(session.notice(), Some(&Notice::Saved));
    assert!(session.has_save());

    let text = std::fs::read_to_string(dir.path().join("maze_save.txt")).unwrap();
    let record = SaveRecord::parse(&text).unwrap();
    assert_eq!(record.hostiles.len(), session.monsters().hostiles().len());

    let mut restored = GameSession::new(options(&dir));
    restored.apply(Command::Continue);
    assert_eq!(restored.notice(), Some(&Notice::Loaded(LevelId::new(2).unwrap())));
    assert_eq!(restored.phase(), Phase::Playing);
    assert_eq!(restored.level(), LevelId::new(2).unwrap());
    assert!(restored.player().has_item);
    assert_eq!(restored.player().point, PLAYER_START);
    assert_eq!(restored.objective(), ITEM_FOUND_OBJECTIVE);
    assert!(restored.narrative().contains("Game loaded. Level: 2."));
}

#[test]
fn corrupt_save_leaves_state_alone() {
    let (dir, mut session) = playing(LevelId::FIRST);
    std::fs::write(dir.path().join("maze_save.txt"), "2\n1,1,2\ntrue\n0\n0\n#####\n").unwrap();
    session.player.has_item = true;
    session.apply(Command::Load);
    assert!(matches!(session.notice(), Some(Notice::LoadFailed(_))));
    assert_eq!(session.level(), LevelId::FIRST);
    assert!(session.player().has_item);
    assert_eq!(session.phase(), Phase::Playing);
}

#[test]
fn continue_without_a_save_stays_on_the_menu() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = GameSession::new(options(&dir));
    session.apply(Command::Continue);
    assert_eq!(session.phase(), Phase::Menu);
    assert_eq!(session.notice(), Some(&Notice::NoSave));
}

#[test]
fn failed_save_reports_and_keeps_playing() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "not a directory").unwrap();
    let mut session = GameSession::new(SessionOptions {
        save_path: blocker.join("maze_save.txt"),
        ..options(&dir)
    });
    session.start_new_game();
    session.apply(Command::Save);
    assert!(matches!(session.notice(), Some(Notice::SaveFailed(_))));
    assert_eq!(session.phase(), Phase::Playing);
}

#[test]
fn controller_fault_is_logged_and_play_continues() {
    let (_dir, mut session) = playing(LevelId::FIRST);
    session.monsters.place(0, Point::new(-3, 40));
    assert_eq!(session.advance(session.tick_interval()), 1);
    assert!(session.narrative().contains("Error moving monsters"));
    assert_eq!(session.phase(), Phase::Playing);
}

#[test]
fn quit_only_from_the_menu() {
    let (_dir, mut session) = playing(LevelId::FIRST);
    session.apply(Command::Quit);
    assert!(!session.quit_requested());
    session.apply(Command::Pause);
    session.apply(Command::QuitToMenu);
    assert_eq!(session.phase(), Phase::Menu);
    session.apply(Command::Quit);
    assert!(session.quit_requested());
}

proptest! {
    #[test]
    fn level_load_resets_player_state(seed in any::<u64>(), level in 1u8..=4) {
        let dir = tempfile::tempdir().unwrap();
        let mut session = GameSession::new(SessionOptions { seed: Some(seed), ..options(&dir) });
        session.player.has_item = true;
        session.player.sage_stage = 3;
        let level = LevelId::new(level).unwrap();
        session.load_level(level);

        prop_assert_eq!(session.grid().count(Cell::Player), 1);
        prop_assert_eq!(session.player().point, PLAYER_START);
        prop_assert!(!session.player().has_item);
        prop_assert_eq!(session.player().sage_stage, 0);
        prop_assert_eq!(session.grid().count(Cell::Item(level.spec().item)), 1);
        prop_assert_eq!(session.grid().count(Cell::Decoration), level.spec().decorations);
        prop_assert_eq!(session.objective(), level.spec().objective);
        prop_assert_eq!(session.grid().to_rows().len(), ROWS as usize);
    }
}
