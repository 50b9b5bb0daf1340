//! Stand-in for the world's spawn trigger: weighted species and tier rolls.

use rand::distributions::{Distribution, WeightedError, WeightedIndex};
use rand::Rng;

use crate::combat::monster::{spawn_monster, Monster, Tier};

pub struct Spawner {
    names: Vec<String>,
    weights: WeightedIndex<u32>,
    boss_chance: f64,
    elite_chance: f64,
}

impl Spawner {
    /// Fails when the weights are empty or all zero.
    pub fn new(species_weights: &[(String, u32)], boss_chance: f64, elite_chance: f64) -> Result<Self, WeightedError> {
        let weights = WeightedIndex::new(species_weights.iter().map(|(_, w)| *w))?;
        Ok(Self {
            names: species_weights.iter().map(|(name, _)| name.clone()).collect(),
            weights,
            boss_chance,
            elite_chance,
        })
    }

    pub fn roll_tier(&self, rng: &mut impl Rng) -> Tier {
        let roll: f64 = rng.gen();
        if roll < self.boss_chance {
            Tier::Boss
        } else if roll < self.elite_chance {
            Tier::Elite
        } else {
            Tier::Normal
        }
    }

    /// A monster at the player's level.
    pub fn spawn(&self, level: u32, rng: &mut impl Rng) -> Monster {
        let name = &self.names[self.weights.sample(rng)];
        let tier = self.roll_tier(rng);
        spawn_monster(name, level, tier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::monster::Species;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashMap;

    fn weights() -> Vec<(String, u32)> {
        vec![
            ("史莱姆".to_string(), 40),
            ("哥布林".to_string(), 30),
            ("骷髅".to_string(), 20),
            ("蝙蝠".to_string(), 10),
        ]
    }

    #[test]
    fn test_species_follow_weights() {
        let spawner = Spawner::new(&weights(), 0.01, 0.1).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(12345);
        let mut counts: HashMap<Species, u32> = HashMap::new();
        for _ in 0..10_000 {
            *counts.entry(spawner.spawn(1, &mut rng).species).or_insert(0) += 1;
        }
        let slime = counts[&Species::Slime] as f64 / 10_000.0;
        let bat = counts[&Species::Bat] as f64 / 10_000.0;
        assert!((slime - 0.4).abs() < 0.03, "slime rate {slime}");
        assert!((bat - 0.1).abs() < 0.02, "bat rate {bat}");
    }

    #[test]
    fn test_tier_odds() {
        let spawner = Spawner::new(&weights(), 0.01, 0.1).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let mut elites = 0;
        let mut bosses = 0;
        for _ in 0..20_000 {
            match spawner.roll_tier(&mut rng) {
                Tier::Boss => bosses += 1,
                Tier::Elite => elites += 1,
                Tier::Normal => {}
            }
        }
        // Elites take the 0.01..0.1 band.
        assert!((elites as f64 / 20_000.0 - 0.09).abs() < 0.01);
        assert!((bosses as f64 / 20_000.0 - 0.01).abs() < 0.005);
    }

    #[test]
    fn test_zero_weights_rejected() {
        let weights = vec![("史莱姆".to_string(), 0)];
        assert!(Spawner::new(&weights, 0.01, 0.1).is_err());
        assert!(Spawner::new(&[], 0.01, 0.1).is_err());
    }
}
