use crate::model::seat::Seat;

/// Terminal result of one deal.
///
/// Both scoring variants sum to zero across the table: the boring variant
/// offsets raw points by 26/4, the standard variant additionally rewards a
/// 26-point sweep (shooter -19.5, everyone else +6.5).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameOutcome {
    points: [u8; 4],
    point_tricks: [u8; 4],
    shooter: Option<Seat>,
    stopped_the_moon: bool,
}

const POINT_OFFSET: f32 = 26.0 / 4.0;

impl GameOutcome {
    pub fn from_terminal(points: [u8; 4], point_tricks: [u8; 4]) -> Self {
        debug_assert_eq!(points.iter().map(|&p| p as u32).sum::<u32>(), 26);

        let shooter = Seat::LOOP.into_iter().find(|seat| points[seat.index()] == 26);

        // A stopped moon: nobody swept, exactly two players took point tricks,
        // and one of them took exactly one.
        let takers: Vec<Seat> = Seat::LOOP
            .into_iter()
            .filter(|seat| point_tricks[seat.index()] > 0)
            .collect();
        let stopped_the_moon = shooter.is_none()
            && takers.len() == 2
            && takers
                .iter()
                .any(|seat| point_tricks[seat.index()] == 1);

        Self {
            points,
            point_tricks,
            shooter,
            stopped_the_moon,
        }
    }

    pub fn points(&self, seat: Seat) -> u8 {
        self.points[seat.index()]
    }

    pub fn point_tricks(&self, seat: Seat) -> u8 {
        self.point_tricks[seat.index()]
    }

    pub const fn shot_the_moon(&self) -> bool {
        self.shooter.is_some()
    }

    pub const fn shooter(&self) -> Option<Seat> {
        self.shooter
    }

    pub const fn stopped_the_moon(&self) -> bool {
        self.stopped_the_moon
    }

    /// Raw points offset to zero-sum, ignoring moon shots. Range -6.5..=19.5.
    pub fn boring_score(&self, seat: Seat) -> f32 {
        self.points[seat.index()] as f32 - POINT_OFFSET
    }

    /// Moon-aware zero-sum score. Range -19.5..=18.5.
    pub fn standard_score(&self, seat: Seat) -> f32 {
        match self.shooter {
            Some(shooter) if shooter == seat => -(26.0 - POINT_OFFSET),
            Some(_) => POINT_OFFSET,
            None => self.boring_score(seat),
        }
    }
}
