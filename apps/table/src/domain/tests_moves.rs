use crate::domain::document::{create_authoritative, AuthoritativeGameDocument, SeenBy, TilePlacement, TilePosition};
use crate::domain::fixtures::roster;
use crate::domain::ledger::LogEntry;
use crate::domain::moves::{apply, apply_entry, entry_for, CallType, Command};
use crate::errors::domain::{ArgumentKind, DomainError};

fn fresh(seed: u32) -> AuthoritativeGameDocument {
    create_authoritative(roster(), Some(seed)).unwrap()
}

#[test]
fn dice_are_deterministic_for_a_seed() {
    let mut a = fresh(42);
    let mut b = fresh(42);
    let roll_a = apply(&mut a, 0, &Command::RollDice).unwrap();
    let roll_b = apply(&mut b, 0, &Command::RollDice).unwrap();
    assert_eq!(roll_a, roll_b);

    let LogEntry::DiceRolled { seat, values } = roll_a else {
        panic!("expected a dice roll, got {roll_a:?}");
    };
    assert_eq!(seat, 0);
    assert!(values.iter().all(|v| (1..=6).contains(v)));
    assert!(a.tiles.iter().all(|t| t.seen_by.is_empty()));
}

#[test]
fn dice_values_cover_every_face() {
    let mut faces = [false; 6];
    for seed in 0..200 {
        let mut doc = fresh(seed);
        if let LogEntry::DiceRolled { values, .. } = apply(&mut doc, 0, &Command::RollDice).unwrap() {
            for v in values {
                faces[usize::from(v) - 1] = true;
            }
        }
    }
    assert!(faces.iter().all(|&seen| seen));
}

#[test]
fn split_records_the_top_of_the_stack() {
    let mut doc = fresh(1);
    let entry = apply(&mut doc, 2, &Command::SplitWall { tile: 20 }).unwrap();
    assert_eq!(entry, LogEntry::WallSplit { seat: 2, after_tile: 21 });
    let entry = apply(&mut doc, 2, &Command::SplitWall { tile: 21 }).unwrap();
    assert_eq!(entry, LogEntry::WallSplit { seat: 2, after_tile: 21 });
    assert_eq!(doc.ledger.len(), 2);
}

#[test]
fn take_moves_to_the_lowest_free_hand_slot() {
    let mut doc = fresh(3);
    apply(&mut doc, 1, &Command::TakeTile { tile: 50 }).unwrap();
    apply(&mut doc, 1, &Command::TakeTile { tile: 51 }).unwrap();

    let first = doc.tile(50).unwrap();
    assert_eq!(first.placement, TilePlacement::new(TilePosition::Hand, 1, 0));
    assert_eq!(first.seen_by, SeenBy::empty().with(1));
    assert_eq!(doc.tile(51).unwrap().placement.index, 1);

    // Freeing slot 0 makes it the next one used.
    apply(&mut doc, 1, &Command::Discard { tile: 50 }).unwrap();
    apply(&mut doc, 1, &Command::TakeTile { tile: 52 }).unwrap();
    assert_eq!(doc.tile(52).unwrap().placement.index, 0);
}

#[test]
fn flip_reveals_to_everyone_in_place() {
    let mut doc = fresh(4);
    let before = doc.tile(17).unwrap().placement;
    apply(&mut doc, 0, &Command::FlipTile { tile: 17 }).unwrap();
    let record = doc.tile(17).unwrap();
    assert!(record.placement.flipped);
    assert_eq!(record.placement.position, before.position);
    assert_eq!(record.placement.index, before.index);
    assert!(record.seen_by.is_public());
}

#[test]
fn discard_is_public_and_indexed_per_seat() {
    let mut doc = fresh(5);
    apply(&mut doc, 3, &Command::TakeTile { tile: 0 }).unwrap();
    apply(&mut doc, 3, &Command::Discard { tile: 0 }).unwrap();
    apply(&mut doc, 2, &Command::Discard { tile: 1 }).unwrap();
    apply(&mut doc, 3, &Command::Discard { tile: 2 }).unwrap();

    assert_eq!(doc.tile(0).unwrap().placement, TilePlacement::new(TilePosition::Discards, 3, 0));
    assert_eq!(doc.tile(1).unwrap().placement, TilePlacement::new(TilePosition::Discards, 2, 0));
    assert_eq!(doc.tile(2).unwrap().placement, TilePlacement::new(TilePosition::Discards, 3, 1));
    assert!(doc.tiles[..3].iter().all(|t| t.seen_by.is_public()));
}

#[test]
fn melding_a_discard_rotates_it() {
    let mut doc = fresh(6);
    apply(&mut doc, 0, &Command::Discard { tile: 8 }).unwrap();
    apply(&mut doc, 1, &Command::MoveToMeld { tile: 8 }).unwrap();
    apply(&mut doc, 1, &Command::TakeTile { tile: 9 }).unwrap();
    apply(&mut doc, 1, &Command::MoveToMeld { tile: 9 }).unwrap();

    let called = doc.tile(8).unwrap();
    assert_eq!(called.placement.position, TilePosition::Melds);
    assert_eq!((called.placement.seat, called.placement.index), (1, 0));
    assert!(called.placement.rotated);

    let own = doc.tile(9).unwrap();
    assert_eq!(own.placement.index, 1);
    assert!(!own.placement.rotated);
    assert!(own.seen_by.is_public());
}

#[test]
fn move_tile_keeps_value_and_knowledge() {
    let mut doc = fresh(7);
    apply(&mut doc, 0, &Command::TakeTile { tile: 30 }).unwrap();
    let value = doc.tile(30).unwrap().tile;
    let target = TilePlacement::new(TilePosition::Palm, 0, 5);
    apply(&mut doc, 0, &Command::MoveTile { tile: 30, placement: target }).unwrap();

    let record = doc.tile(30).unwrap();
    assert_eq!(record.placement, target);
    assert_eq!(record.tile, value);
    assert_eq!(record.seen_by, SeenBy::empty().with(0));
}

#[test]
fn stubs_fail_without_touching_the_document() {
    let stubs = [
        Command::MakeCall { call: CallType::Pon },
        Command::WarnPlayer { seat: 2 },
        Command::ReturnTileToWall { tile: 3 },
        Command::ReturnTileToPlayersDiscards { tile: 3, seat: 1 },
    ];
    for command in stubs {
        let mut doc = fresh(8);
        let before = doc.clone();
        let err = apply(&mut doc, 0, &command).unwrap_err();
        assert!(matches!(err, DomainError::NotImplemented(_)), "{command:?} gave {err:?}");
        assert_eq!(doc, before);
    }
}

#[test]
fn out_of_range_inputs_are_invalid_arguments() {
    let doc = fresh(9);
    let err = entry_for(&doc, 0, &Command::TakeTile { tile: 136 }).unwrap_err();
    assert!(matches!(
        err,
        DomainError::InvalidArgument { kind: ArgumentKind::TileIndex, .. }
    ));

    let err = entry_for(&doc, 4, &Command::RollDice).unwrap_err();
    assert!(matches!(err, DomainError::InvalidArgument { kind: ArgumentKind::Seat, .. }));

    let bad_target = Command::MoveTile {
        tile: 0,
        placement: TilePlacement::new(TilePosition::Hand, 9, 0),
    };
    assert!(entry_for(&doc, 0, &bad_target).is_err());
}

#[test]
fn commands_use_a_tagged_wire_shape() {
    let command = Command::ReturnTileToPlayersDiscards { tile: 12, seat: 3 };
    let json = serde_json::to_value(&command).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"move": "return_tile_to_players_discards", "tile": 12, "seat": 3})
    );
    assert_eq!(serde_json::from_value::<Command>(json).unwrap(), command);
    assert_eq!(
        serde_json::from_str::<Command>(r#"{"move":"roll_dice"}"#).unwrap(),
        Command::RollDice
    );
}

#[test]
fn impossible_dice_are_refused() {
    let mut doc = fresh(9);
    for values in [[0, 3], [7, 1], [200, 100]] {
        let err = apply_entry(&mut doc, &LogEntry::DiceRolled { seat: 0, values }).unwrap_err();
        assert!(matches!(
            err,
            DomainError::InvalidArgument { kind: ArgumentKind::DiceValue, .. }
        ));
    }
    assert!(doc.ledger.is_empty());
}
