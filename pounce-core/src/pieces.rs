//! Piece definitions: the evader, hunters, and hunter specializations

use crate::board::HAND_SPAN;
use crate::geometry::Vec2;
use serde::{Deserialize, Serialize};

/// Collision radius of every hunter
pub const HUNTER_SIZE: f64 = 15.0;

/// Hunter party size
pub const HUNTER_COUNT: usize = 5;

/// Reference party composition, in index order
pub const PARTY: [Specialization; HUNTER_COUNT] = [
    Specialization::Scout,
    Specialization::Veteran,
    Specialization::Medic,
    Specialization::Standard,
    Specialization::Standard,
];

/// Identifies a piece for selection and moves
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceId {
    Evader,
    Hunter(usize),
}

/// Hunter status. Eliminated is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Active,
    Incapacitated,
    Eliminated,
}

/// Hunter specialization
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Specialization {
    Standard,
    Scout,
    Veteran,
    Medic,
}

/// Static capabilities of a specialization
#[derive(Clone, Debug)]
pub struct SpecialTraits {
    pub name: &'static str,
    pub symbol: &'static str,
    pub move_multiplier: f64,
    pub camping_immune: bool,
    pub rescue_range: Option<f64>,
    /// Outer-Band snapshots tolerated before elimination
    pub tolerance: usize,
    pub can_act_after_rescuing: bool,
    pub can_act_after_being_rescued: bool,
}

impl SpecialTraits {
    #[allow(clippy::too_many_arguments)]
    const fn new(
        name: &'static str,
        symbol: &'static str,
        move_multiplier: f64,
        camping_immune: bool,
        rescue_range: Option<f64>,
        tolerance: usize,
        can_act_after_rescuing: bool,
        can_act_after_being_rescued: bool,
    ) -> Self {
        Self {
            name,
            symbol,
            move_multiplier,
            camping_immune,
            rescue_range,
            tolerance,
            can_act_after_rescuing,
            can_act_after_being_rescued,
        }
    }
}

static STANDARD: SpecialTraits = SpecialTraits::new("Standard", "", 1.0, false, None, 3, false, false);
static SCOUT: SpecialTraits = SpecialTraits::new("Scout", "S", 1.5, false, None, 2, false, false);
static VETERAN: SpecialTraits = SpecialTraits::new("Veteran", "V", 1.0, true, None, 3, false, true);
static MEDIC: SpecialTraits = SpecialTraits::new("Medic", "M", 1.0, false, Some(50.0), 3, true, false);

impl Specialization {
    pub fn traits(self) -> &'static SpecialTraits {
        match self {
            Specialization::Standard => &STANDARD,
            Specialization::Scout => &SCOUT,
            Specialization::Veteran => &VETERAN,
            Specialization::Medic => &MEDIC,
        }
    }
}

/// An in-progress move. Purely a timing gate; rules effects wait for it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    pub from: Vec2,
    pub to: Vec2,
    /// `None` until the next clock tick stamps it
    pub started_at: Option<f64>,
    pub duration: f64,
}

impl Motion {
    pub fn new(from: Vec2, to: Vec2, started_at: Option<f64>, duration: f64) -> Self {
        Self {
            from,
            to,
            started_at,
            duration,
        }
    }

    pub fn ends_at(&self) -> Option<f64> {
        self.started_at.map(|t| t + self.duration)
    }

    pub fn is_complete(&self, now: f64) -> bool {
        self.ends_at().is_some_and(|end| now >= end)
    }

    /// Interpolated position for presentation
    pub fn position_at(&self, now: f64) -> Vec2 {
        let Some(start) = self.started_at else {
            return self.from;
        };
        if self.duration <= 0.0 {
            return self.to;
        }
        let t = ((now - start) / self.duration).clamp(0.0, 1.0);
        self.from.lerp(self.to, t)
    }
}

/// Physical state shared by every piece
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub position: Vec2,
    pub size: f64,
    pub movement_range: f64,
    pub motion: Option<Motion>,
}

impl Body {
    pub fn new(position: Vec2, size: f64, movement_range: f64) -> Self {
        Self {
            position,
            size,
            movement_range,
            motion: None,
        }
    }

    /// Where the piece should be drawn at `now`
    pub fn display_position(&self, now: f64) -> Vec2 {
        match &self.motion {
            Some(motion) => motion.position_at(now),
            None => self.position,
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        self.position.distance_to(point) <= self.size
    }
}

/// The hunted piece. Its range is both movement and strike range.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Evader {
    pub body: Body,
}

impl Evader {
    pub fn new(position: Vec2, size: f64, range: f64) -> Self {
        Self {
            body: Body::new(position, size, range),
        }
    }

    pub fn position(&self) -> Vec2 {
        self.body.position
    }

    pub fn strike_range(&self) -> f64 {
        self.body.movement_range
    }
}

/// A member of the hunter party
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hunter {
    pub body: Body,
    pub status: Status,
    pub specialization: Specialization,
    pub has_acted: bool,
    pub action_order: Option<u8>,
    /// History turn number at the last rescue; older snapshots are forgiven
    pub camping_epoch: u32,
}

impl Hunter {
    pub fn new(position: Vec2, specialization: Specialization) -> Self {
        let range = HAND_SPAN * specialization.traits().move_multiplier;
        Self {
            body: Body::new(position, HUNTER_SIZE, range),
            status: Status::Active,
            specialization,
            has_acted: false,
            action_order: None,
            camping_epoch: 0,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.body.position
    }

    pub fn traits(&self) -> &'static SpecialTraits {
        self.specialization.traits()
    }

    pub fn is_active(&self) -> bool {
        self.status == Status::Active
    }

    /// Active and still owed a move this hunter turn
    pub fn can_act(&self) -> bool {
        self.is_active() && !self.has_acted
    }

    /// Distance at which this hunter revives an incapacitated teammate
    pub fn rescue_threshold(&self, other: &Hunter) -> f64 {
        self.traits()
            .rescue_range
            .unwrap_or(self.body.size + other.body.size)
    }
}
