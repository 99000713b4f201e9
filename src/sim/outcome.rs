//! Level outcome classification

use serde::{Deserialize, Serialize};

use crate::consts::MAX_STARS;

/// Scored outcome of a finished level, best first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeTier {
    /// Nobody lost
    Perfect,
    /// At most two lost
    Good,
    /// Some, but not all, lost
    Partial,
    /// Every ball lost
    AllLost,
}

impl OutcomeTier {
    /// Tiers are checked best-first, so losing 2 of 2 still counts as `Good`
    pub fn classify(lost: u32, total: u32) -> Self {
        if lost == 0 {
            OutcomeTier::Perfect
        } else if lost <= 2 {
            OutcomeTier::Good
        } else if lost < total {
            OutcomeTier::Partial
        } else {
            OutcomeTier::AllLost
        }
    }

    pub fn stars(self) -> u8 {
        match self {
            OutcomeTier::Perfect => MAX_STARS,
            OutcomeTier::Good => 2,
            OutcomeTier::Partial => 1,
            OutcomeTier::AllLost => 0,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            OutcomeTier::Perfect => "Awesome, You Saved All of Us",
            OutcomeTier::Good => "Good, You Unlock Next Level",
            OutcomeTier::Partial => "Gosh, We are saved",
            OutcomeTier::AllLost => "Sorry You Lost All of Us",
        }
    }

    /// Combine with the stars previously recorded for the level
    ///
    /// A perfect clear always writes the maximum; every other tier keeps the
    /// better of the old record and its own stars.
    pub fn merge_stars(self, previous: u8) -> u8 {
        match self {
            OutcomeTier::Perfect => MAX_STARS,
            tier => previous.max(tier.stars()),
        }
    }
}

/// What a finished level reports to the score sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelResult {
    pub level: u32,
    pub tier: OutcomeTier,
    pub stars_earned: u8,
    pub balls_lost: u32,
    pub balls_total: u32,
}

impl LevelResult {
    pub fn new(level: u32, balls_lost: u32, balls_total: u32) -> Self {
        let tier = OutcomeTier::classify(balls_lost, balls_total);
        Self {
            level,
            tier,
            stars_earned: tier.stars(),
            balls_lost,
            balls_total,
        }
    }

    pub fn balls_saved(&self) -> u32 {
        self.balls_total.saturating_sub(self.balls_lost)
    }

    /// "Saved: n,  Lost: m"
    pub fn summary(&self) -> String {
        format!("Saved: {},  Lost: {}", self.balls_saved(), self.balls_lost)
    }
}
