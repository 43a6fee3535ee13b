//! Property tests for ledger replay and projection (pure domain).
//!
//! Properties tested:
//! - Any sequence of implemented moves replays to the same document
//! - seen_by never shrinks
//! - A projection reveals exactly the tiles the seat has seen
//! - A training-wheels game stays legal, consistent, and slot-unique

use proptest::prelude::*;

use crate::domain::document::{create_authoritative, TilePosition};
use crate::domain::moves::{apply, Command};
use crate::domain::player_view::project;
use crate::domain::replay::{is_consistent, replay};
use crate::domain::test_gens;
use crate::domain::test_prelude;
use crate::domain::validators::validate;
use crate::domain::wall::WallGeometry;

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Property: replaying the ledger reproduces the document
    #[test]
    fn prop_replay_reproduces_document(
        seed in any::<u32>(),
        players in test_gens::shuffled_roster(),
        moves in test_gens::seated_commands(60),
    ) {
        let mut doc = create_authoritative(players.clone(), Some(seed)).unwrap();
        for (seat, command) in &moves {
            apply(&mut doc, *seat, command).unwrap();
        }
        prop_assert_eq!(doc.ledger.len(), moves.len());
        let rebuilt = replay(players, seed, &doc.ledger).unwrap();
        prop_assert_eq!(rebuilt, doc);
    }

    /// Property: seen_by only grows
    #[test]
    fn prop_seen_by_is_monotonic(
        seed in any::<u32>(),
        moves in test_gens::seated_commands(40),
    ) {
        let mut doc = create_authoritative(crate::domain::fixtures::roster(), Some(seed)).unwrap();
        for (seat, command) in &moves {
            let before: Vec<_> = doc.tiles.iter().map(|t| t.seen_by).collect();
            apply(&mut doc, *seat, command).unwrap();
            for (old, record) in before.iter().zip(&doc.tiles) {
                prop_assert!(record.seen_by.is_superset_of(*old));
            }
        }
    }

    /// Property: projection redacts exactly the unseen tiles
    #[test]
    fn prop_projection_matches_seen_by(
        seed in any::<u32>(),
        moves in test_gens::seated_commands(40),
        viewer in test_gens::seat(),
    ) {
        let mut doc = create_authoritative(crate::domain::fixtures::roster(), Some(seed)).unwrap();
        for (seat, command) in &moves {
            apply(&mut doc, *seat, command).unwrap();
        }
        let view = project(&doc, viewer).unwrap();
        for (record, projected) in doc.tiles.iter().zip(&view.tiles) {
            prop_assert_eq!(projected.placement, record.placement);
            prop_assert_eq!(projected.public, record.seen_by.is_public());
            if record.seen_by.contains(viewer) {
                prop_assert_eq!(projected.tile, Some(record.tile));
            } else {
                prop_assert_eq!(projected.tile, None);
            }
        }
    }

    /// Property: following the validators through the deal keeps every invariant
    #[test]
    fn prop_guided_deal_stays_legal(
        seed in any::<u32>(),
        players in test_gens::shuffled_roster(),
        draws in 0usize..60,
    ) {
        let mut doc = create_authoritative(players, Some(seed)).unwrap();
        let east = doc
            .players
            .iter()
            .position(|p| p.seat_wind == crate::domain::Wind::East)
            .unwrap() as u8;

        let roll = Command::RollDice;
        prop_assert!(validate(&project(&doc, east).unwrap(), east, &roll).is_ok());
        apply(&mut doc, east, &roll).unwrap();

        let total = crate::domain::ledger::dice_total(&doc.ledger).unwrap();
        let geometry = WallGeometry::new(&doc.players, total).unwrap();
        let splitter = geometry.splitting_seat;
        let first = Command::SplitWall { tile: geometry.first_split() };
        prop_assert!(validate(&project(&doc, splitter).unwrap(), splitter, &first).is_ok());
        apply(&mut doc, splitter, &first).unwrap();
        let second = Command::SplitWall {
            tile: WallGeometry::dead_wall_split(geometry.first_split()),
        };
        prop_assert!(validate(&project(&doc, splitter).unwrap(), splitter, &second).is_ok());
        apply(&mut doc, splitter, &second).unwrap();

        for n in 0..draws {
            let seat = ((usize::from(east) + n / 4) % 4) as u8;
            let tile = geometry
                .next_drawable(|t| doc.tiles[t].placement.position == TilePosition::Wall)
                .unwrap();
            let take = Command::TakeTile { tile };
            prop_assert!(validate(&project(&doc, seat).unwrap(), seat, &take).is_ok());
            apply(&mut doc, seat, &take).unwrap();
        }

        prop_assert!(doc.invariant_violations().is_empty());
        prop_assert!(is_consistent(&doc).unwrap());
    }
}
