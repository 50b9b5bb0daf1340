//! Pure combat arithmetic shared by the resolver, the skill book and the
//! simulator.
//!
//! Nothing here mutates state; callers apply the returned numbers.

use super::constants::MIN_DAMAGE;

/// Damage dealt by a hit after defense, never below [`MIN_DAMAGE`].
///
/// # Arguments
/// * `attack` - Attacker's effective attack (or a resolved skill magnitude)
/// * `defense` - Defender's effective defense
pub fn compute_damage(attack: u32, defense: u32) -> u32 {
    attack.saturating_sub(defense).max(MIN_DAMAGE)
}

/// HP remaining after taking `damage` (minimum 0).
pub fn apply_damage(current_hp: u32, damage: u32) -> u32 {
    current_hp.saturating_sub(damage)
}

/// HP after healing `amount`, capped at `max_hp`.
pub fn apply_heal(current_hp: u32, amount: u32, max_hp: u32) -> u32 {
    current_hp.saturating_add(amount).min(max_hp)
}

/// Scales a base value by a multiplier and floors it.
///
/// Negative or NaN products clamp to 0.
pub fn scale_floor(base: u32, multiplier: f64) -> u32 {
    let scaled = (base as f64 * multiplier).floor();
    if scaled.is_nan() || scaled <= 0.0 {
        0
    } else if scaled >= u32::MAX as f64 {
        u32::MAX
    } else {
        scaled as u32
    }
}

/// Pet assist bonus: a fraction of the player's hit, floored, never below
/// [`MIN_DAMAGE`].
pub fn assist_damage(player_damage: u32, ratio: f64) -> u32 {
    scale_floor(player_damage, ratio).max(MIN_DAMAGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_damage_subtracts_defense() {
        assert_eq!(compute_damage(15, 7), 8);
        assert_eq!(compute_damage(20, 0), 20);
    }

    #[test]
    fn test_compute_damage_floor_is_one() {
        assert_eq!(compute_damage(5, 10), 1);
        assert_eq!(compute_damage(0, 0), 1);
        assert_eq!(compute_damage(10, 10), 1);
        for atk in 0..50 {
            for def in 0..50 {
                assert!(compute_damage(atk, def) >= 1, "atk {atk} def {def}");
            }
        }
    }

    #[test]
    fn test_compute_damage_extremes() {
        assert_eq!(compute_damage(u32::MAX, 0), u32::MAX);
        assert_eq!(compute_damage(0, u32::MAX), 1);
    }

    #[test]
    fn test_apply_damage() {
        assert_eq!(apply_damage(100, 30), 70);
        assert_eq!(apply_damage(30, 100), 0); // Can't go negative
        assert_eq!(apply_damage(50, 0), 50);
    }

    #[test]
    fn test_apply_heal_caps_at_max() {
        assert_eq!(apply_heal(40, 50, 100), 90);
        assert_eq!(apply_heal(80, 50, 100), 100);
        assert_eq!(apply_heal(u32::MAX - 1, 10, u32::MAX), u32::MAX);
    }

    #[test]
    fn test_scale_floor() {
        assert_eq!(scale_floor(7, 1.5), 10);
        assert_eq!(scale_floor(70, 3.0), 210);
        assert_eq!(scale_floor(10, 0.0), 0);
        assert_eq!(scale_floor(10, -2.0), 0);
        assert_eq!(scale_floor(10, f64::NAN), 0);
    }

    #[test]
    fn test_assist_damage() {
        assert_eq!(assist_damage(8, 0.5), 4);
        assert_eq!(assist_damage(1, 0.5), 1);
        assert_eq!(assist_damage(9, 0.5), 4);
    }
}
