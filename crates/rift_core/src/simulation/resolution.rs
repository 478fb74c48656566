//! Set resolution.
//!
//! Turns the ledger and both teams' baseline strength into a set winner:
//!
//! ```text
//! diff   = (base_home + adj_home) - (base_away + adj_away)
//! p_home = clamp(1 / (1 + e^(-diff / scale)), min_p, 1 - min_p)
//! ```
//!
//! The logistic curve is odd-symmetric around 0.5, so swapping home and away
//! yields `1 - p_home`, and the band keeps every set winnable. The duration
//! draw is separate from the winner draw.

use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::StandardNormal;

use super::modifier::ModifierLedger;
use crate::config::{DurationParams, ResolutionParams, SimulationConfig};
use crate::data::TeamLookup;
use crate::error::Result;
use crate::models::{SetResult, Team, TeamId, TeamSide};

/// Effective strength of both sides going into the draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matchup {
    pub base_home: f64,
    pub adj_home: f64,
    pub base_away: f64,
    pub adj_away: f64,
}

impl Matchup {
    pub fn strength_diff(&self) -> f64 {
        (self.base_home + self.adj_home) - (self.base_away + self.adj_away)
    }

    pub fn swapped(&self) -> Self {
        Self {
            base_home: self.base_away,
            adj_home: self.adj_away,
            base_away: self.base_home,
            adj_away: self.adj_home,
        }
    }
}

/// Clamped logistic win probability for the side that is `diff` points stronger.
pub fn win_probability(diff: f64, params: &ResolutionParams) -> f64 {
    let min_p = params.min_probability;
    if diff.is_nan() {
        return 0.5;
    }
    let p = 1.0 / (1.0 + (-diff / params.logistic_scale).exp());
    p.clamp(min_p, params.max_probability())
}

pub fn home_win_probability(matchup: &Matchup, params: &ResolutionParams) -> f64 {
    win_probability(matchup.strength_diff(), params)
}

/// Set length in whole minutes, independent of who won.
pub fn draw_duration<R: Rng + ?Sized>(rng: &mut R, params: &DurationParams) -> u32 {
    let z: f64 = rng.sample(StandardNormal);
    let minutes = params.mean_minutes + params.std_dev_minutes * z;
    let min = params.min_minutes as f64;
    let max = params.max_minutes as f64;
    minutes.round().clamp(min, max) as u32
}

/// Rating-weighted pick from the winning roster.
pub fn pick_player_of_the_game<R: Rng + ?Sized>(team: &Team, rng: &mut R) -> Option<String> {
    team.players
        .choose_weighted(rng, |p| p.effective_rating().max(1.0))
        .ok()
        .map(|p| p.name.clone())
}

/// Resolve one set. Team lookups happen before any random draw, so a failed
/// lookup leaves `rng` untouched.
pub fn resolve_set<L, R>(
    lookup: &L,
    home: &TeamId,
    away: &TeamId,
    ledger: &ModifierLedger,
    set_number: u32,
    config: &SimulationConfig,
    rng: &mut R,
) -> Result<SetResult>
where
    L: TeamLookup + ?Sized,
    R: Rng + ?Sized,
{
    let home_team = lookup.require_team(home)?;
    let away_team = lookup.require_team(away)?;

    let matchup = Matchup {
        base_home: home_team.baseline_strength()?,
        adj_home: ledger.total_for(home),
        base_away: away_team.baseline_strength()?,
        adj_away: ledger.total_for(away),
    };
    let p_home = home_win_probability(&matchup, &config.resolution);

    let roll: f64 = rng.gen();
    let (winning_side, winning_team) =
        if roll < p_home { (TeamSide::Home, home_team) } else { (TeamSide::Away, away_team) };

    let duration_minutes = draw_duration(rng, &config.duration);
    let player_of_the_game = if config.award_player_of_the_game {
        pick_player_of_the_game(winning_team, rng)
    } else {
        None
    };

    tracing::debug!(
        set = set_number,
        p_home,
        roll,
        winner = %winning_team.id,
        duration_minutes,
        "set resolved"
    );

    Ok(SetResult {
        set_number,
        winner: winning_team.id.clone(),
        winning_side,
        duration_minutes,
        home_win_probability: p_home,
        home_adjustment: matchup.adj_home,
        away_adjustment: matchup.adj_away,
        player_of_the_game,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Roster;
    use crate::error::SimError;
    use crate::models::{Player, Role};
    use crate::simulation::modifier::WinRateModifier;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn params() -> ResolutionParams {
        ResolutionParams::default()
    }

    fn team(id: &str, rating: u8) -> Team {
        let roles = [Role::Top, Role::Jungle, Role::Mid, Role::Bot, Role::Support];
        Team::new(
            id,
            id,
            roles.iter().enumerate().map(|(i, r)| Player::new(format!("{id}{i}"), *r, rating)).collect(),
        )
    }

    fn roster() -> Roster {
        Roster::from_teams([team("blue", 70), team("red", 70)])
    }

    #[test]
    fn test_even_matchup_is_coin_flip() {
        assert!((win_probability(0.0, &params()) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_probability_is_monotonic() {
        let mut last = 0.0;
        for diff in -60..=60 {
            let p = win_probability(diff as f64, &params());
            assert!(p >= last);
            last = p;
        }
    }

    #[test]
    fn test_extreme_modifiers_stay_in_band() {
        let matchup = Matchup { base_home: 70.0, adj_home: 500.0, base_away: 70.0, adj_away: -500.0 };
        let p = home_win_probability(&matchup, &params());
        assert!((0.02..=0.98).contains(&p));
        let p = home_win_probability(&matchup.swapped(), &params());
        assert!((0.02..=0.98).contains(&p));
        assert_eq!(win_probability(f64::INFINITY, &params()), params().max_probability());
        assert_eq!(win_probability(f64::NEG_INFINITY, &params()), params().min_probability);
        assert_eq!(win_probability(f64::NAN, &params()), 0.5);
    }

    #[test]
    fn test_duration_within_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let params = DurationParams::default();
        for _ in 0..2_000 {
            let minutes = draw_duration(&mut rng, &params);
            assert!((25..=45).contains(&minutes));
        }
    }

    #[test]
    fn test_zero_spread_duration_is_mean() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let params = DurationParams { std_dev_minutes: 0.0, ..DurationParams::default() };
        assert_eq!(draw_duration(&mut rng, &params), 32);
    }

    #[test]
    fn test_resolve_set_is_deterministic_per_seed() {
        let roster = roster();
        let ledger = ModifierLedger::new();
        let config = SimulationConfig::default();
        let (blue, red) = (TeamId::new("blue"), TeamId::new("red"));

        let a = resolve_set(&roster, &blue, &red, &ledger, 1, &config, &mut ChaCha8Rng::seed_from_u64(9))
            .unwrap();
        let b = resolve_set(&roster, &blue, &red, &ledger, 1, &config, &mut ChaCha8Rng::seed_from_u64(9))
            .unwrap();
        assert_eq!(a, b);
        assert!(a.winner == blue || a.winner == red);
        assert!(a.player_of_the_game.unwrap().starts_with(a.winner.as_str()));
    }

    #[test]
    fn test_resolve_set_reports_ledger_sums() {
        let roster = roster();
        let (blue, red) = (TeamId::new("blue"), TeamId::new("red"));
        let mut ledger = ModifierLedger::new();
        ledger.push(WinRateModifier::new(blue.clone(), 12.0, "a", ""));
        ledger.push(WinRateModifier::new(red.clone(), -4.0, "b", ""));

        let result = resolve_set(
            &roster,
            &blue,
            &red,
            &ledger,
            2,
            &SimulationConfig::default(),
            &mut ChaCha8Rng::seed_from_u64(1),
        )
        .unwrap();
        assert_eq!(result.set_number, 2);
        assert_eq!(result.home_adjustment, 12.0);
        assert_eq!(result.away_adjustment, -4.0);
        let expected = win_probability(16.0, &params());
        assert!((result.home_win_probability - expected).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_team_leaves_rng_untouched() {
        let roster = roster();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let before = rng.clone();
        let err = resolve_set(
            &roster,
            &TeamId::new("blue"),
            &TeamId::new("ghost"),
            &ModifierLedger::new(),
            1,
            &SimulationConfig::default(),
            &mut rng,
        )
        .unwrap_err();
        assert_eq!(err, SimError::UnknownTeam(TeamId::new("ghost")));
        assert_eq!(rng, before);
    }

    #[test]
    fn test_stronger_side_wins_more_often() {
        let roster = Roster::from_teams([team("blue", 90), team("red", 60)]);
        let (blue, red) = (TeamId::new("blue"), TeamId::new("red"));
        let config = SimulationConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let ledger = ModifierLedger::new();
        let blue_wins = (0..500)
            .filter(|_| {
                resolve_set(&roster, &blue, &red, &ledger, 1, &config, &mut rng).unwrap().winner == blue
            })
            .count();
        // p_home ~= 0.92 for a 30 point gap
        assert!(blue_wins > 400, "blue won {blue_wins}/500");
    }

    #[test]
    fn test_player_of_the_game_can_be_disabled() {
        let roster = roster();
        let config = SimulationConfig { award_player_of_the_game: false, ..SimulationConfig::default() };
        let result = resolve_set(
            &roster,
            &TeamId::new("blue"),
            &TeamId::new("red"),
            &ModifierLedger::new(),
            1,
            &config,
            &mut ChaCha8Rng::seed_from_u64(2),
        )
        .unwrap();
        assert_eq!(result.player_of_the_game, None);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: swapping home and away inverts the probability
            #[test]
            fn prop_probability_symmetric(
                base_home in 0.0f64..100.0,
                base_away in 0.0f64..100.0,
                adj_home in -500.0f64..500.0,
                adj_away in -500.0f64..500.0,
            ) {
                let matchup = Matchup { base_home, adj_home, base_away, adj_away };
                let p = home_win_probability(&matchup, &params());
                let q = home_win_probability(&matchup.swapped(), &params());
                prop_assert!((p + q - 1.0).abs() < 1e-9);
            }

            /// Property: probability never leaves the safety band
            #[test]
            fn prop_probability_clamped(diff in -1.0e6f64..1.0e6) {
                let p = win_probability(diff, &params());
                prop_assert!(p >= 0.02 - 1e-12 && p <= 0.98 + 1e-12);
            }
        }
    }
}
