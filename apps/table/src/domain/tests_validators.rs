use crate::domain::document::{create_authoritative, AuthoritativeGameDocument, TilePlacement, TilePosition};
use crate::domain::fixtures::roster;
use crate::domain::ledger::LogEntry;
use crate::domain::moves::{apply, CallType, Command};
use crate::domain::player_view::project;
use crate::domain::validators::{validate, IllegalMove};
use crate::domain::wall::WallGeometry;

// Fixture roster: seat 0 East, 1 South, 2 West, 3 North.

fn fresh() -> AuthoritativeGameDocument {
    create_authoritative(roster(), Some(42)).unwrap()
}

/// A document with the given roll already in the ledger.
fn rolled(values: [u8; 2]) -> AuthoritativeGameDocument {
    let mut doc = fresh();
    doc.ledger.push(LogEntry::DiceRolled { seat: 0, values });
    doc
}

fn check(doc: &AuthoritativeGameDocument, seat: u8, command: Command) -> Result<(), IllegalMove> {
    validate(&project(doc, seat).unwrap(), seat, &command)
}

/// Roll 3 + 4: West (seat 2) splits, start of wall is 2 * 34 + 15.
fn split_twice() -> (AuthoritativeGameDocument, WallGeometry) {
    let mut doc = rolled([3, 4]);
    let geometry = WallGeometry::new(&doc.players, 7).unwrap();
    let first = geometry.first_split();
    apply(&mut doc, 2, &Command::SplitWall { tile: first }).unwrap();
    apply(&mut doc, 2, &Command::SplitWall { tile: WallGeometry::dead_wall_split(first) }).unwrap();
    (doc, geometry)
}

#[test]
fn only_east_rolls_and_only_once() {
    let doc = fresh();
    assert_eq!(check(&doc, 0, Command::RollDice), Ok(()));
    assert_eq!(check(&doc, 1, Command::RollDice), Err(IllegalMove::OnlyEastRolls));

    let doc = rolled([1, 1]);
    assert_eq!(check(&doc, 0, Command::RollDice), Err(IllegalMove::DiceAlreadyRolled));
}

#[test]
fn splitting_needs_dice() {
    let doc = fresh();
    assert_eq!(check(&doc, 0, Command::SplitWall { tile: 0 }), Err(IllegalMove::DiceNotRolled));
}

#[test]
fn first_split_is_counted_from_the_dice() {
    let doc = rolled([3, 4]);
    assert_eq!(check(&doc, 2, Command::SplitWall { tile: 81 }), Ok(()));
    assert_eq!(
        check(&doc, 2, Command::SplitWall { tile: 83 }),
        Err(IllegalMove::WrongSplitPosition { expected: 81 })
    );
    assert_eq!(
        check(&doc, 0, Command::SplitWall { tile: 81 }),
        Err(IllegalMove::WrongSplitter { name: "Carol".to_string() })
    );
}

#[test]
fn second_split_leaves_fourteen_tiles() {
    let mut doc = rolled([3, 4]);
    apply(&mut doc, 2, &Command::SplitWall { tile: 81 }).unwrap();
    assert_eq!(check(&doc, 2, Command::SplitWall { tile: 67 }), Ok(()));
    assert_eq!(
        check(&doc, 2, Command::SplitWall { tile: 69 }),
        Err(IllegalMove::WrongDeadWallSplit { expected: 67 })
    );

    apply(&mut doc, 2, &Command::SplitWall { tile: 67 }).unwrap();
    assert_eq!(check(&doc, 2, Command::SplitWall { tile: 53 }), Err(IllegalMove::WallAlreadySplit));
}

#[test]
fn taking_before_the_split_is_rejected() {
    assert_eq!(check(&fresh(), 0, Command::TakeTile { tile: 0 }), Err(IllegalMove::WallNotSplit));

    let mut doc = rolled([3, 4]);
    assert_eq!(check(&doc, 0, Command::TakeTile { tile: 83 }), Err(IllegalMove::WallNotSplit));
    apply(&mut doc, 2, &Command::SplitWall { tile: 81 }).unwrap();
    assert_eq!(check(&doc, 0, Command::TakeTile { tile: 83 }), Err(IllegalMove::WallNotSplit));
}

#[test]
fn tiles_are_taken_top_then_bottom() {
    let (mut doc, geometry) = split_twice();
    let start = geometry.start_of_wall;
    assert_eq!(start, 83);

    assert_eq!(check(&doc, 0, Command::TakeTile { tile: start }), Ok(()));
    assert_eq!(
        check(&doc, 0, Command::TakeTile { tile: start - 1 }),
        Err(IllegalMove::WrongTileToTake { expected: start })
    );
    apply(&mut doc, 0, &Command::TakeTile { tile: start }).unwrap();
    assert_eq!(check(&doc, 0, Command::TakeTile { tile: start - 1 }), Ok(()));
    apply(&mut doc, 0, &Command::TakeTile { tile: start - 1 }).unwrap();
    assert_eq!(check(&doc, 1, Command::TakeTile { tile: start + 2 }), Ok(()));
}

#[test]
fn exhausted_wall_is_reported() {
    let (mut doc, geometry) = split_twice();
    for tile in geometry.live_drawing_order().collect::<Vec<_>>() {
        doc.tiles[tile].placement = TilePlacement::new(TilePosition::Discards, 0, tile);
    }
    assert_eq!(check(&doc, 0, Command::TakeTile { tile: 0 }), Err(IllegalMove::WallExhausted));
}

#[test]
fn dora_is_flipped_by_the_splitter() {
    let doc = rolled([3, 4]);
    assert_eq!(check(&doc, 2, Command::FlipTile { tile: 77 }), Ok(()));
    assert_eq!(check(&doc, 2, Command::FlipTile { tile: 79 }), Err(IllegalMove::WrongTileToFlip));
    assert_eq!(
        check(&doc, 1, Command::FlipTile { tile: 77 }),
        Err(IllegalMove::WrongFlipper { name: "Carol".to_string() })
    );
    assert_eq!(check(&fresh(), 2, Command::FlipTile { tile: 77 }), Err(IllegalMove::DiceNotRolled));
}

#[test]
fn discard_needs_fourteen_tiles_in_hand() {
    let mut doc = fresh();
    for tile in 0..13 {
        apply(&mut doc, 1, &Command::TakeTile { tile }).unwrap();
    }
    assert_eq!(
        check(&doc, 1, Command::Discard { tile: 0 }),
        Err(IllegalMove::NotYourTurnToDiscard { held: 13 })
    );

    apply(&mut doc, 1, &Command::TakeTile { tile: 13 }).unwrap();
    assert_eq!(check(&doc, 1, Command::Discard { tile: 0 }), Ok(()));
    assert_eq!(check(&doc, 2, Command::Discard { tile: 0 }), Err(IllegalMove::NotInHand));
    assert_eq!(check(&doc, 1, Command::Discard { tile: 100 }), Err(IllegalMove::NotInHand));

    // Tiles in the palm still count toward the fourteen.
    apply(
        &mut doc,
        1,
        &Command::MoveTile { tile: 5, placement: TilePlacement::new(TilePosition::Palm, 1, 0) },
    )
    .unwrap();
    assert_eq!(check(&doc, 1, Command::Discard { tile: 0 }), Ok(()));
}

#[test]
fn rearranging_is_limited_to_own_hand_and_palm() {
    let mut doc = fresh();
    apply(&mut doc, 0, &Command::TakeTile { tile: 10 }).unwrap();
    apply(&mut doc, 0, &Command::TakeTile { tile: 11 }).unwrap();

    let to = |position, seat, index| Command::MoveTile {
        tile: 10,
        placement: TilePlacement::new(position, seat, index),
    };
    assert_eq!(check(&doc, 0, to(TilePosition::Palm, 0, 0)), Ok(()));
    assert_eq!(check(&doc, 0, to(TilePosition::Hand, 0, 4)), Ok(()));
    assert_eq!(check(&doc, 0, to(TilePosition::Hand, 0, 0)), Ok(()));
    assert_eq!(check(&doc, 0, to(TilePosition::Hand, 0, 1)), Err(IllegalMove::SlotTaken));
    assert_eq!(check(&doc, 0, to(TilePosition::Discards, 0, 0)), Err(IllegalMove::IllegalRearrangement));
    assert_eq!(check(&doc, 0, to(TilePosition::Hand, 1, 0)), Err(IllegalMove::IllegalRearrangement));
    assert_eq!(check(&doc, 1, to(TilePosition::Hand, 1, 0)), Err(IllegalMove::IllegalRearrangement));
}

#[test]
fn melds_and_stubs_are_refused() {
    let doc = fresh();
    assert_eq!(check(&doc, 0, Command::MoveToMeld { tile: 3 }), Err(IllegalMove::MeldingDisabled));
    assert_eq!(
        check(&doc, 0, Command::MakeCall { call: CallType::Chi }),
        Err(IllegalMove::NotImplemented("make_call"))
    );
    assert_eq!(
        check(&doc, 0, Command::WarnPlayer { seat: 1 }),
        Err(IllegalMove::NotImplemented("warn_player"))
    );
}

#[test]
fn unknown_tiles_are_refused() {
    assert_eq!(
        check(&fresh(), 0, Command::Discard { tile: 136 }),
        Err(IllegalMove::UnknownTile(136))
    );
}

#[test]
fn messages_are_readable() {
    assert_eq!(
        IllegalMove::WrongTileToTake { expected: 12 }.to_string(),
        "Wrong tile to take: 12"
    );
    assert_eq!(IllegalMove::MeldingDisabled.to_string(), "Cannot meld with training wheels on");
}

#[test]
fn corrupt_dice_are_reported_not_panicked() {
    let doc = rolled([200, 100]);
    assert_eq!(check(&doc, 0, Command::RollDice), Err(IllegalMove::DiceAlreadyRolled));
    assert!(matches!(
        check(&doc, 2, Command::SplitWall { tile: 0 }),
        Err(IllegalMove::Malformed(_))
    ));
    assert_eq!(
        check(&doc, 0, Command::TakeTile { tile: 0 }),
        Err(IllegalMove::WallNotSplit)
    );

    let doc = rolled([6, 7]);
    assert!(matches!(
        check(&doc, 2, Command::FlipTile { tile: 0 }),
        Err(IllegalMove::Malformed(_))
    ));
}
