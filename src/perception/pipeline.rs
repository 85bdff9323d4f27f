use serde::Serialize;

use crate::calibration::{Calibration, FireMode, Resolution};
use crate::errors::HudScanResult;
use crate::perception::hud::HudReader;
use crate::perception::sampler::PixelSampler;

/// Outcome of one detection cycle.
///
/// Every aborted stage is an expected, terminal outcome distinguishable by
/// reason; infrastructure failures (missing profile, sampler errors)
/// surface as `Err` instead, keeping the two classes disjoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Detection {
    NotInGame,
    NoWeapon,
    UnsupportedMode,
    UnknownWeapon,
    Weapon { name: String, mode: FireMode },
}

/// Sequential gated decision over the classifiers, short-circuiting on the
/// first failing stage.
pub struct Pipeline<'a, S> {
    calibration: &'a Calibration,
    sampler: &'a S,
}

impl<'a, S: PixelSampler> Pipeline<'a, S> {
    pub fn new(calibration: &'a Calibration, sampler: &'a S) -> Self {
        Pipeline {
            calibration,
            sampler,
        }
    }

    /// Runs one detection cycle for the given display resolution.
    ///
    /// A full pass costs several 1–10 ms pixel samples, so callers must
    /// rate-limit invocations rather than poll continuously.
    pub fn detect(&self, resolution: Resolution) -> HudScanResult<Detection> {
        let profile = self.calibration.profile(resolution)?;
        let hud = HudReader::new(profile, self.sampler);

        if !hud.in_game()? {
            tracing::debug!("not in game");
            return Ok(Detection::NotInGame);
        }
        let Some((slot, ammo)) = hud.slot_and_ammo()? else {
            tracing::debug!("no weapon equipped");
            return Ok(Detection::NoWeapon);
        };
        let Some(mode) = hud.fire_mode()? else {
            tracing::debug!("not in full-auto or semi-auto mode");
            return Ok(Detection::UnsupportedMode);
        };
        let Some(rank) = hud.weapon_rank(slot, ammo)? else {
            tracing::debug!(?slot, %ammo, "weapon name did not resolve");
            return Ok(Detection::UnknownWeapon);
        };
        match self.calibration.weapon_name(ammo, rank) {
            Some(name) => {
                tracing::info!(name, %ammo, rank, %mode, "weapon detected");
                Ok(Detection::Weapon {
                    name: name.to_string(),
                    mode,
                })
            }
            None => {
                // Unreachable for stores that passed load validation; keep
                // the outcome typed if a hand-edited store slips through.
                tracing::warn!(%ammo, rank, "no weapon name for resolved rank");
                Ok(Detection::UnknownWeapon)
            }
        }
    }
}
