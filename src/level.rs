//! Level definitions
//!
//! Levels are authored as JSON ([`LevelDef`]) and validated once into a
//! [`Level`] before a session may start. Invalid data is rejected with a
//! [`LoadError`] naming the level and entity at fault.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::LoadError;
use crate::sim::entity::{Barrier, BarrierKind, Hazard, HazardKind, HomeZone};

/// Levels shipped with the game
const BUILTIN_LEVELS: &str = include_str!("../assets/levels.json");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeDef {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardDefKind {
    #[default]
    BlackHole,
    Wormhole,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HazardDef {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    #[serde(default)]
    pub kind: HazardDefKind,
    /// Teleport destination, wormholes only
    #[serde(default)]
    pub target: Option<Vec2>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BarrierDef {
    pub from: Vec2,
    pub to: Vec2,
    #[serde(default)]
    pub kind: BarrierKind,
}

/// Spawn ranges for one ball: position per axis, speed magnitude per axis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnDef {
    pub x: [f32; 2],
    pub y: [f32; 2],
    pub vx: [f32; 2],
    pub vy: [f32; 2],
}

/// A level as authored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelDef {
    pub home: HomeDef,
    #[serde(default)]
    pub hazards: Vec<HazardDef>,
    #[serde(default)]
    pub barriers: Vec<BarrierDef>,
    pub balls: Vec<SpawnDef>,
}

/// A validated `[lo, hi]` range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRange {
    lo: f32,
    hi: f32,
}

impl SpawnRange {
    fn parse(range: [f32; 2], level: u32, ball: usize, axis: &'static str) -> Result<Self, LoadError> {
        let [lo, hi] = range;
        if !lo.is_finite() || !hi.is_finite() || lo > hi {
            return Err(LoadError::InvalidRange {
                level,
                ball,
                axis,
                lo,
                hi,
            });
        }
        if lo == 0.0 && hi == 0.0 {
            return Err(LoadError::ZeroRange { level, ball, axis });
        }
        Ok(Self { lo, hi })
    }

    /// Inclusive lower end
    pub fn lo(&self) -> f32 {
        self.lo
    }

    /// Exclusive upper end, unless equal to `lo`
    pub fn hi(&self) -> f32 {
        self.hi
    }

    /// Uniform sample in `[lo, hi)`, redrawn while it comes out as exactly 0
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f32 {
        if self.lo == self.hi {
            return self.lo;
        }
        loop {
            let value = rng.random_range(self.lo..self.hi);
            if value != 0.0 {
                return value;
            }
        }
    }

    /// Sample with a random sign
    pub fn sample_signed<R: Rng>(&self, rng: &mut R) -> f32 {
        let sign = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        sign * self.sample(rng)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpawnSpec {
    pub x: SpawnRange,
    pub y: SpawnRange,
    pub vx: SpawnRange,
    pub vy: SpawnRange,
}

impl SpawnSpec {
    /// Draw a start position and velocity
    pub fn sample<R: Rng>(&self, rng: &mut R) -> (Vec2, Vec2) {
        let pos = Vec2::new(self.x.sample(rng), self.y.sample(rng));
        let vel = Vec2::new(self.vx.sample_signed(rng), self.vy.sample_signed(rng));
        (pos, vel)
    }
}

/// A validated level, ready to start sessions from
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    pub number: u32,
    pub home: HomeZone,
    pub hazards: Vec<Hazard>,
    pub barriers: Vec<Barrier>,
    pub spawns: Vec<SpawnSpec>,
}

impl LevelDef {
    /// Check the definition and build the runtime level
    pub fn validate(&self, number: u32) -> Result<Level, LoadError> {
        let level = number;

        let home = &self.home;
        if !(home.width > 0.0 && home.height > 0.0) {
            return Err(LoadError::InvalidHome {
                level,
                width: home.width,
                height: home.height,
            });
        }

        let hazards = self
            .hazards
            .iter()
            .enumerate()
            .map(|(hazard, def)| {
                if !(def.radius > 0.0) {
                    return Err(LoadError::InvalidHazardRadius {
                        level,
                        hazard,
                        radius: def.radius,
                    });
                }
                let kind = match (def.kind, def.target) {
                    (HazardDefKind::BlackHole, None) => HazardKind::BlackHole,
                    (HazardDefKind::BlackHole, Some(_)) => {
                        return Err(LoadError::UnexpectedTarget { level, hazard });
                    }
                    (HazardDefKind::Wormhole, Some(target)) => HazardKind::Wormhole { target },
                    (HazardDefKind::Wormhole, None) => {
                        return Err(LoadError::MissingWormholeTarget { level, hazard });
                    }
                };
                Ok(Hazard {
                    center: Vec2::new(def.x, def.y),
                    radius: def.radius,
                    kind,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let barriers = self
            .barriers
            .iter()
            .enumerate()
            .map(|(barrier, def)| {
                if def.from == def.to {
                    return Err(LoadError::DegenerateBarrier { level, barrier });
                }
                Ok(Barrier::new(def.from, def.to, def.kind))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if self.balls.is_empty() {
            return Err(LoadError::NoBalls { level });
        }
        let spawns = self
            .balls
            .iter()
            .enumerate()
            .map(|(ball, def)| -> Result<SpawnSpec, LoadError> {
                Ok(SpawnSpec {
                    x: SpawnRange::parse(def.x, level, ball, "x")?,
                    y: SpawnRange::parse(def.y, level, ball, "y")?,
                    vx: SpawnRange::parse(def.vx, level, ball, "vx")?,
                    vy: SpawnRange::parse(def.vy, level, ball, "vy")?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Level {
            number,
            home: HomeZone::new(Vec2::new(home.x, home.y), Vec2::new(home.width, home.height)),
            hazards,
            barriers,
            spawns,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogDef {
    levels: Vec<LevelDef>,
}

/// All playable levels, numbered from 1
#[derive(Debug, Clone)]
pub struct LevelCatalog {
    levels: Vec<Level>,
}

impl LevelCatalog {
    /// Parse `{ "levels": [...] }` and validate every level up front
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let def: CatalogDef = serde_json::from_str(json)?;
        let levels = def
            .levels
            .iter()
            .zip(1u32..)
            .map(|(level, number)| level.validate(number))
            .collect::<Result<Vec<_>, _>>()?;
        log::info!("Loaded {} levels", levels.len());
        Ok(Self { levels })
    }

    pub fn builtin() -> Result<Self, LoadError> {
        Self::from_json(BUILTIN_LEVELS)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn get(&self, number: u32) -> Result<&Level, LoadError> {
        number
            .checked_sub(1)
            .and_then(|i| self.levels.get(i as usize))
            .ok_or(LoadError::UnknownLevel {
                level: number,
                available: self.levels.len(),
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Level> {
        self.levels.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn minimal() -> LevelDef {
        serde_json::from_str(
            r#"{
                "home": { "x": 600, "y": 400, "width": 150, "height": 150 },
                "balls": [ { "x": [100, 200], "y": [100, 200], "vx": [1, 3], "vy": [1, 3] } ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = LevelCatalog::builtin().unwrap();
        assert!(!catalog.is_empty());
        for (level, number) in catalog.iter().zip(1u32..) {
            assert_eq!(level.number, number);
            assert!(!level.spawns.is_empty());
        }
    }

    #[test]
    fn test_unknown_level() {
        let catalog = LevelCatalog::builtin().unwrap();
        assert!(matches!(catalog.get(0), Err(LoadError::UnknownLevel { .. })));
        let past_end = catalog.len() as u32 + 1;
        assert!(matches!(catalog.get(past_end), Err(LoadError::UnknownLevel { .. })));
        assert!(catalog.get(1).is_ok());
    }

    #[test]
    fn test_defaults_fill_in() {
        let level = minimal().validate(1).unwrap();
        assert!(level.hazards.is_empty());
        assert!(level.barriers.is_empty());
        assert_eq!(level.home.size, Vec2::new(150.0, 150.0));
    }

    #[test]
    fn test_wormhole_requires_target() {
        let mut def = minimal();
        def.hazards.push(HazardDef {
            x: 300.0,
            y: 300.0,
            radius: 40.0,
            kind: HazardDefKind::Wormhole,
            target: None,
        });
        let err = def.validate(4).unwrap_err();
        assert!(matches!(err, LoadError::MissingWormholeTarget { level: 4, hazard: 0 }));
        assert!(err.to_string().contains("teleport target"));

        def.hazards[0].target = Some(Vec2::new(50.0, 50.0));
        let level = def.validate(4).unwrap();
        assert_eq!(
            level.hazards[0].kind,
            HazardKind::Wormhole {
                target: Vec2::new(50.0, 50.0)
            }
        );
    }

    #[test]
    fn test_black_hole_rejects_target() {
        let mut def = minimal();
        def.hazards.push(HazardDef {
            x: 300.0,
            y: 300.0,
            radius: 40.0,
            kind: HazardDefKind::BlackHole,
            target: Some(Vec2::ZERO),
        });
        assert!(matches!(def.validate(1), Err(LoadError::UnexpectedTarget { .. })));
    }

    #[test]
    fn test_inverted_range_fails_fast() {
        let mut def = minimal();
        def.balls[0].vx = [3.0, 1.0];
        let err = def.validate(2).unwrap_err();
        assert!(matches!(
            err,
            LoadError::InvalidRange {
                level: 2,
                ball: 0,
                axis: "vx",
                ..
            }
        ));
    }

    #[test]
    fn test_zero_range_rejected() {
        let mut def = minimal();
        def.balls[0].vy = [0.0, 0.0];
        assert!(matches!(def.validate(1), Err(LoadError::ZeroRange { axis: "vy", .. })));
    }

    #[test]
    fn test_degenerate_barrier_rejected() {
        let mut def = minimal();
        def.barriers.push(BarrierDef {
            from: Vec2::new(10.0, 10.0),
            to: Vec2::new(10.0, 10.0),
            kind: BarrierKind::Normal,
        });
        assert!(matches!(def.validate(1), Err(LoadError::DegenerateBarrier { barrier: 0, .. })));
    }

    #[test]
    fn test_no_balls_rejected() {
        let mut def = minimal();
        def.balls.clear();
        assert!(matches!(def.validate(1), Err(LoadError::NoBalls { level: 1 })));
    }

    #[test]
    fn test_bad_json_is_reported() {
        assert!(matches!(LevelCatalog::from_json("{ not json"), Err(LoadError::Json(_))));
    }

    #[test]
    fn test_spawn_samples_stay_in_range() {
        let level = minimal().validate(1).unwrap();
        let spawn = &level.spawns[0];
        assert_eq!((spawn.x.lo(), spawn.x.hi()), (100.0, 200.0));
        assert_eq!((spawn.vy.lo(), spawn.vy.hi()), (1.0, 3.0));

        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..200 {
            let (pos, vel) = spawn.sample(&mut rng);
            assert!((spawn.x.lo()..spawn.x.hi()).contains(&pos.x));
            assert!((spawn.y.lo()..spawn.y.hi()).contains(&pos.y));
            assert!((spawn.vx.lo()..spawn.vx.hi()).contains(&vel.x.abs()));
            assert!((spawn.vy.lo()..spawn.vy.hi()).contains(&vel.y.abs()));
        }
    }

    #[test]
    fn test_signed_range_spanning_zero_never_returns_zero() {
        let range = SpawnRange::parse([-1.0, 1.0], 1, 0, "vx").unwrap();
        assert_eq!((range.lo(), range.hi()), (-1.0, 1.0));
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..500 {
            assert_ne!(range.sample(&mut rng), 0.0);
        }
    }
}
