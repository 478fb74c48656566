//! Win-rate modifiers and the per-set ledger.
//!
//! Choices inject small signed effects on a team's win probability. The
//! ledger only stores and sums them; what the sums mean is decided by the
//! resolution step.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::TeamId;

pub const MODIFIER_LIMIT: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinRateModifier {
    team: TeamId,
    value: f64,
    source: String,
    description: String,
}

impl WinRateModifier {
    /// `value` is clamped into `[-MODIFIER_LIMIT, MODIFIER_LIMIT]`; non-finite becomes 0.
    pub fn new(
        team: TeamId,
        value: f64,
        source: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            team,
            value: clamp_finite(value, -MODIFIER_LIMIT, MODIFIER_LIMIT, 0.0),
            source: source.into(),
            description: description.into(),
        }
    }

    pub fn team(&self) -> &TeamId {
        &self.team
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

fn clamp_finite(value: f64, min: f64, max: f64, default: f64) -> f64 {
    if !value.is_finite() {
        return default;
    }
    value.clamp(min, max)
}

/// Which side of the matchup a catalog effect lands on, relative to the
/// team making the decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierTarget {
    Own,
    Opponent,
}

/// Catalog-side modifier, bound to concrete teams when a choice is submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModifierTemplate {
    pub target: ModifierTarget,
    pub value: f64,
    pub description: String,
    /// Distinguishes several effects of one choice on the same side
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl ModifierTemplate {
    pub fn own(value: f64, description: &str) -> Self {
        Self::targeting(ModifierTarget::Own, value, description)
    }

    pub fn opponent(value: f64, description: &str) -> Self {
        Self::targeting(ModifierTarget::Opponent, value, description)
    }

    fn targeting(target: ModifierTarget, value: f64, description: &str) -> Self {
        Self { target, value, description: description.to_string(), tag: None }
    }

    pub fn tagged(mut self, tag: &str) -> Self {
        self.tag = Some(tag.to_string());
        self
    }

    /// Ledger source for this effect: the choice id, plus `/tag` when tagged.
    pub fn source_for(&self, choice_id: &str) -> String {
        match &self.tag {
            Some(tag) => format!("{choice_id}/{tag}"),
            None => choice_id.to_string(),
        }
    }

    pub fn resolve(&self, own: &TeamId, opponent: &TeamId, source: &str) -> WinRateModifier {
        let team = match self.target {
            ModifierTarget::Own => own,
            ModifierTarget::Opponent => opponent,
        };
        WinRateModifier::new(team.clone(), self.value, source, self.description.clone())
    }
}

/// Modifiers applied during the set in progress, in application order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModifierLedger {
    entries: Vec<WinRateModifier>,
}

impl ModifierLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, modifier: WinRateModifier) {
        self.entries.push(modifier);
    }

    pub fn extend<I>(&mut self, modifiers: I)
    where
        I: IntoIterator<Item = WinRateModifier>,
    {
        self.entries.extend(modifiers);
    }

    pub fn contains(&self, source: &str, team: &TeamId) -> bool {
        self.entries.iter().any(|m| m.source == source && &m.team == team)
    }

    /// Sum of values targeting `team`; 0 when nothing targets it.
    pub fn total_for(&self, team: &TeamId) -> f64 {
        self.entries.iter().filter(|m| &m.team == team).map(|m| m.value).sum()
    }

    /// Per-team sums.
    pub fn totals(&self) -> BTreeMap<&TeamId, f64> {
        let mut totals: BTreeMap<&TeamId, f64> = BTreeMap::new();
        for modifier in &self.entries {
            *totals.entry(&modifier.team).or_default() += modifier.value;
        }
        totals
    }

    pub fn iter(&self) -> impl Iterator<Item = &WinRateModifier> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[WinRateModifier] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blue() -> TeamId {
        TeamId::new("blue")
    }

    fn red() -> TeamId {
        TeamId::new("red")
    }

    #[test]
    fn test_value_clamped_into_band() {
        assert_eq!(WinRateModifier::new(blue(), 80.0, "s", "d").value(), 50.0);
        assert_eq!(WinRateModifier::new(blue(), -80.0, "s", "d").value(), -50.0);
        assert_eq!(WinRateModifier::new(blue(), f64::NAN, "s", "d").value(), 0.0);
        assert_eq!(WinRateModifier::new(blue(), -7.5, "s", "d").value(), -7.5);
    }

    #[test]
    fn test_totals_partition_by_team() {
        let mut ledger = ModifierLedger::new();
        ledger.push(WinRateModifier::new(blue(), 5.0, "a", ""));
        ledger.push(WinRateModifier::new(red(), -3.0, "a", ""));
        ledger.push(WinRateModifier::new(blue(), 2.5, "b", ""));

        assert_eq!(ledger.total_for(&blue()), 7.5);
        assert_eq!(ledger.total_for(&red()), -3.0);
        assert_eq!(ledger.total_for(&TeamId::new("green")), 0.0);

        let totals = ledger.totals();
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[&blue()], 7.5);
    }

    #[test]
    fn test_keeps_application_order() {
        let mut ledger = ModifierLedger::new();
        ledger.extend([
            WinRateModifier::new(red(), 1.0, "first", ""),
            WinRateModifier::new(blue(), 1.0, "second", ""),
        ]);
        let sources: Vec<&str> = ledger.iter().map(WinRateModifier::source).collect();
        assert_eq!(sources, vec!["first", "second"]);
        assert!(ledger.contains("second", &blue()));
        assert!(!ledger.contains("second", &red()));
    }

    #[test]
    fn test_template_binds_to_side() {
        let own = ModifierTemplate::own(4.0, "tempo");
        let opp = ModifierTemplate::opponent(-2.0, "vision denied");

        let a = own.resolve(&blue(), &red(), "choice");
        let b = opp.resolve(&blue(), &red(), "choice");
        assert_eq!(a.team(), &blue());
        assert_eq!(b.team(), &red());
        assert_eq!(b.value(), -2.0);
        assert_eq!(b.source(), "choice");
        assert_eq!(b.description(), "vision denied");
    }

    #[test]
    fn test_tag_extends_source() {
        let plain = ModifierTemplate::own(4.0, "tempo");
        let tagged = ModifierTemplate::own(-2.0, "exposed").tagged("risk");
        assert_eq!(plain.source_for("late_baron_call"), "late_baron_call");
        assert_eq!(tagged.source_for("late_baron_call"), "late_baron_call/risk");

        let json = serde_json::to_value(&plain).unwrap();
        assert!(json.get("tag").is_none());
        let back: ModifierTemplate = serde_json::from_value(json).unwrap();
        assert_eq!(back, plain);
    }

    #[test]
    fn test_clear_empties_ledger() {
        let mut ledger = ModifierLedger::new();
        ledger.push(WinRateModifier::new(blue(), 1.0, "x", ""));
        ledger.clear();
        assert!(ledger.is_empty());
        assert_eq!(ledger.total_for(&blue()), 0.0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: any input lands inside the modifier band
            #[test]
            fn prop_value_always_in_band(value in proptest::num::f64::ANY) {
                let m = WinRateModifier::new(blue(), value, "s", "");
                prop_assert!(m.value().is_finite());
                prop_assert!(m.value().abs() <= MODIFIER_LIMIT);
            }

            /// Property: per-team totals add up to the whole ledger
            #[test]
            fn prop_totals_sum_to_ledger(values in proptest::collection::vec(-50.0f64..50.0, 0..20)) {
                let mut ledger = ModifierLedger::new();
                for (i, v) in values.iter().enumerate() {
                    let team = if i % 2 == 0 { blue() } else { red() };
                    ledger.push(WinRateModifier::new(team, *v, format!("s{i}"), ""));
                }
                let all: f64 = ledger.iter().map(WinRateModifier::value).sum();
                let split = ledger.total_for(&blue()) + ledger.total_for(&red());
                prop_assert!((all - split).abs() < 1e-9);
            }
        }
    }
}
