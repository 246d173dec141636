//! Timed buffs granted by abilities and consumed by combat rounds

use serde::{Deserialize, Serialize};

/// Buff kinds that modify basic attacks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusEffectKind {
    /// Doubles damage dealt by basic attacks
    Rage,
    /// Basic attacks are guaranteed critical hits
    Stealth,
}

impl StatusEffectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rage => "rage",
            Self::Stealth => "stealth",
        }
    }
}

/// An active buff with the number of attack rounds it still covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub kind: StatusEffectKind,
    pub remaining_turns: u32,
}

impl StatusEffect {
    pub fn new(kind: StatusEffectKind, remaining_turns: u32) -> Self {
        Self {
            kind,
            remaining_turns,
        }
    }
}

/// The set of buffs currently active on a character.
///
/// Holds at most one entry per kind; every entry has `remaining_turns > 0`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusEffects(Vec<StatusEffect>);

impl StatusEffects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self, kind: StatusEffectKind) -> bool {
        self.remaining(kind) > 0
    }

    /// Turns left on `kind`, 0 when it is not active
    pub fn remaining(&self, kind: StatusEffectKind) -> u32 {
        self.0
            .iter()
            .find(|e| e.kind == kind)
            .map(|e| e.remaining_turns)
            .unwrap_or(0)
    }

    /// Apply a buff; re-applying keeps the longer of the two durations
    pub fn apply(&mut self, effect: StatusEffect) {
        if effect.remaining_turns == 0 {
            return;
        }
        match self.0.iter_mut().find(|e| e.kind == effect.kind) {
            Some(existing) => {
                existing.remaining_turns = existing.remaining_turns.max(effect.remaining_turns)
            }
            None => self.0.push(effect),
        }
    }

    /// Consume one turn from every active buff, dropping the expired ones
    pub fn tick(&mut self) {
        for effect in &mut self.0 {
            effect.remaining_turns = effect.remaining_turns.saturating_sub(1);
        }
        self.0.retain(|e| e.remaining_turns > 0);
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.0.iter()
    }
}
