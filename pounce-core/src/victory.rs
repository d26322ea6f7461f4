//! Terminal conditions

use crate::board::Board;
use crate::geometry::point_in_triangle;
use crate::pieces::{Evader, Hunter};

/// The evader wins once no hunter is Active
pub fn evader_wins(hunters: &[Hunter]) -> bool {
    hunters.iter().all(|h| !h.is_active())
}

/// First triple (increasing index order) of Active Inner-Zone hunters that
/// are all within strike range of the evader and enclose its position
pub fn hunters_win(evader: &Evader, hunters: &[Hunter], board: &Board) -> Option<[usize; 3]> {
    let pos = evader.position();
    let range = evader.strike_range();
    let eligible: Vec<usize> = hunters
        .iter()
        .enumerate()
        .filter(|(_, h)| h.is_active() && board.in_inner_zone(h.position()))
        .map(|(i, _)| i)
        .collect();

    let n = eligible.len();
    for a in 0..n {
        for b in a + 1..n {
            for c in b + 1..n {
                let triple = [eligible[a], eligible[b], eligible[c]];
                let vertices = triple.map(|i| hunters[i].position());
                if vertices.iter().any(|v| pos.distance_to(*v) > range) {
                    continue;
                }
                if point_in_triangle(pos, vertices) {
                    return Some(triple);
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::game::GameState;
    use crate::geometry::Vec2;
    use crate::pieces::{Specialization, Status};

    fn state(evader: Vec2, hunters: &[Vec2]) -> GameState {
        let placed: Vec<_> = hunters.iter().map(|&p| (Specialization::Standard, p)).collect();
        GameState::with_positions(GameConfig::human_evader(), evader, &placed)
    }

    #[test]
    fn test_evader_wins_only_when_none_active() {
        let mut s = state(Vec2::ZERO, &[Vec2::new(100.0, 0.0), Vec2::new(-100.0, 0.0)]);
        assert!(!evader_wins(s.hunters()));
        s.hunters[0].status = Status::Incapacitated;
        assert!(!evader_wins(s.hunters()));
        s.hunters[1].status = Status::Eliminated;
        assert!(evader_wins(s.hunters()));
    }

    #[test]
    fn test_triangle_encloses_evader() {
        let s = state(
            Vec2::ZERO,
            &[Vec2::new(0.0, 100.0), Vec2::new(-90.0, -60.0), Vec2::new(90.0, -60.0)],
        );
        assert_eq!(hunters_win(s.evader(), s.hunters(), s.board()), Some([0, 1, 2]));
    }

    #[test]
    fn test_triangle_out_of_strike_range() {
        let s = state(
            Vec2::ZERO,
            &[Vec2::new(0.0, 160.0), Vec2::new(-90.0, -60.0), Vec2::new(90.0, -60.0)],
        );
        assert_eq!(hunters_win(s.evader(), s.hunters(), s.board()), None);
    }

    #[test]
    fn test_outer_band_and_inactive_hunters_do_not_count() {
        let mut s = state(
            Vec2::new(0.0, 200.0),
            &[Vec2::new(0.0, 320.0), Vec2::new(-90.0, 150.0), Vec2::new(90.0, 150.0)],
        );
        // First vertex is in the Outer Band
        assert_eq!(hunters_win(s.evader(), s.hunters(), s.board()), None);

        s = state(
            Vec2::ZERO,
            &[Vec2::new(0.0, 100.0), Vec2::new(-90.0, -60.0), Vec2::new(90.0, -60.0)],
        );
        s.hunters[1].status = Status::Incapacitated;
        assert_eq!(hunters_win(s.evader(), s.hunters(), s.board()), None);
    }

    #[test]
    fn test_first_triple_in_index_order() {
        let s = state(
            Vec2::ZERO,
            &[
                Vec2::new(100.0, 100.0), // encloses only together with 2 and 3
                Vec2::new(0.0, 100.0),
                Vec2::new(-90.0, -60.0),
                Vec2::new(90.0, -60.0),
            ],
        );
        assert_eq!(hunters_win(s.evader(), s.hunters(), s.board()), Some([0, 2, 3]));
    }
}
