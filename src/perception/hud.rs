use serde::Serialize;

use crate::calibration::{AmmoClass, FireMode, Profile};
use crate::errors::HudScanResult;
use crate::perception::sampler::PixelSampler;

/// Which of the two equipment slots is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Primary,
    Secondary,
}

/// Transient reader answering HUD questions against one calibration
/// profile. Created fresh per detection cycle; holds no state between
/// calls and never mutates the profile.
pub struct HudReader<'a, S> {
    profile: &'a Profile,
    sampler: &'a S,
}

impl<'a, S: PixelSampler> HudReader<'a, S> {
    pub fn new(profile: &'a Profile, sampler: &'a S) -> Self {
        HudReader { profile, sampler }
    }

    /// True when every state checkpoint shows its calibrated color.
    /// Checkpoints are sampled in list order and the scan stops at the
    /// first mismatch to keep the sample count down.
    pub fn in_game(&self) -> HudScanResult<bool> {
        for check in &self.profile.state {
            if self.sampler.sample(check.x, check.y)? != check.color {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Active slot and loaded ammo class. `None` when the pack checkpoint
    /// shows its empty color (nothing equipped) or an unmapped color.
    pub fn slot_and_ammo(&self) -> HudScanResult<Option<(Slot, AmmoClass)>> {
        let pack = &self.profile.pack;
        let c0 = self.sampler.sample(pack.point.x, pack.point.y)?;
        if c0 == pack.empty {
            return Ok(None);
        }
        let Some(ammo) = pack.ammo.get(&c0).copied() else {
            tracing::debug!(color = %c0, "pack color not in calibration map");
            return Ok(None);
        };
        // The slot-1 marker extends one row below the pack checkpoint. The
        // comparison reads the pack point again instead of reusing c0; see
        // DESIGN.md on re-sampling an unstable primitive.
        let below = self.sampler.sample(pack.point.x, pack.point.y + 1)?;
        let fresh = self.sampler.sample(pack.point.x, pack.point.y)?;
        let slot = if below == fresh {
            Slot::Primary
        } else {
            Slot::Secondary
        };
        Ok(Some((slot, ammo)))
    }

    /// 1-based rank of the first name candidate showing the matched color,
    /// scanned in calibration order; `None` after an exhaustive scan.
    ///
    /// The secondary slot has no candidate table of its own: it reuses the
    /// primary list with every point shifted by `differ` on the x axis.
    pub fn weapon_rank(&self, slot: Slot, ammo: AmmoClass) -> HudScanResult<Option<usize>> {
        let names = &self.profile.names;
        let Some(candidates) = names.slots.get(&ammo) else {
            return Ok(None);
        };
        let dx = match slot {
            Slot::Primary => 0,
            Slot::Secondary => names.differ,
        };
        for (index, point) in candidates.iter().enumerate() {
            if self.sampler.sample(point.x + dx, point.y)? == names.matched {
                return Ok(Some(index + 1));
            }
        }
        Ok(None)
    }

    /// Fire mode shown on the HUD, or `None` for any color outside the
    /// calibrated full-auto/semi-auto table.
    pub fn fire_mode(&self) -> HudScanResult<Option<FireMode>> {
        let mode = &self.profile.mode;
        let color = self.sampler.sample(mode.point.x, mode.point.y)?;
        Ok(mode.map.get(&color).copied())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::calibration::{Color, ColorPoint, ModeCheck, NameTable, PackCheck, Point};
    use crate::perception::testing::FakeSampler;

    const EMPTY: Color = Color(0x454545);
    const LIGHT: Color = Color(0xd2a033);
    const MATCHED: Color = Color(0x9cdc40);
    const AUTO: Color = Color(0xdcdcdc);
    const OTHER: Color = Color(0x101010);

    fn profile() -> Profile {
        Profile {
            state: vec![
                ColorPoint { x: 10, y: 10, color: Color(0x111111) },
                ColorPoint { x: 20, y: 20, color: Color(0x222222) },
                ColorPoint { x: 30, y: 30, color: Color(0x333333) },
            ],
            pack: PackCheck {
                point: Point { x: 100, y: 200 },
                empty: EMPTY,
                ammo: BTreeMap::from([(LIGHT, AmmoClass::Light)]),
            },
            names: NameTable {
                matched: MATCHED,
                differ: -40,
                slots: BTreeMap::from([(
                    AmmoClass::Light,
                    vec![Point { x: 300, y: 50 }, Point { x: 300, y: 80 }],
                )]),
            },
            mode: ModeCheck {
                point: Point { x: 400, y: 200 },
                map: BTreeMap::from([(AUTO, FireMode::FullAuto)]),
            },
        }
    }

    fn sampler_for_state(colors: [Color; 3]) -> FakeSampler {
        let mut sampler = FakeSampler::new();
        sampler.set(10, 10, colors[0]);
        sampler.set(20, 20, colors[1]);
        sampler.set(30, 30, colors[2]);
        sampler
    }

    #[test]
    fn in_game_when_all_checkpoints_match() {
        let profile = profile();
        let sampler = sampler_for_state([Color(0x111111), Color(0x222222), Color(0x333333)]);
        let hud = HudReader::new(&profile, &sampler);
        assert!(hud.in_game().unwrap());
        assert_eq!(sampler.calls(), 3);
    }

    #[test]
    fn in_game_short_circuits_on_first_mismatch() {
        let profile = profile();
        let sampler = sampler_for_state([Color(0x111111), OTHER, Color(0x333333)]);
        let hud = HudReader::new(&profile, &sampler);
        assert!(!hud.in_game().unwrap());
        assert_eq!(sampler.calls(), 2);
    }

    #[test]
    fn empty_pack_means_no_weapon() {
        let profile = profile();
        let mut sampler = FakeSampler::new();
        sampler.set(100, 200, EMPTY);
        let hud = HudReader::new(&profile, &sampler);
        assert_eq!(hud.slot_and_ammo().unwrap(), None);
        assert_eq!(sampler.calls(), 1);
    }

    #[test]
    fn unmapped_pack_color_means_no_weapon() {
        let profile = profile();
        let mut sampler = FakeSampler::new();
        sampler.set(100, 200, OTHER);
        let hud = HudReader::new(&profile, &sampler);
        assert_eq!(hud.slot_and_ammo().unwrap(), None);
    }

    #[test]
    fn matching_below_pixel_selects_primary() {
        let profile = profile();
        let mut sampler = FakeSampler::new();
        sampler.set(100, 200, LIGHT);
        sampler.set(100, 201, LIGHT);
        let hud = HudReader::new(&profile, &sampler);
        assert_eq!(
            hud.slot_and_ammo().unwrap(),
            Some((Slot::Primary, AmmoClass::Light))
        );
        assert_eq!(sampler.calls(), 3);
    }

    #[test]
    fn differing_below_pixel_selects_secondary() {
        let profile = profile();
        let mut sampler = FakeSampler::new();
        sampler.set(100, 200, LIGHT);
        sampler.set(100, 201, OTHER);
        let hud = HudReader::new(&profile, &sampler);
        assert_eq!(
            hud.slot_and_ammo().unwrap(),
            Some((Slot::Secondary, AmmoClass::Light))
        );
    }

    #[test]
    fn slot_comparison_uses_fresh_pack_sample() {
        // The pack point flickers: first read identifies the ammo class,
        // the re-read agrees with the below pixel. Slot detection must use
        // the re-read, not the cached first sample.
        let profile = profile();
        let mut sampler = FakeSampler::new();
        sampler.script(100, 200, &[LIGHT, OTHER]);
        sampler.set(100, 201, OTHER);
        let hud = HudReader::new(&profile, &sampler);
        assert_eq!(
            hud.slot_and_ammo().unwrap(),
            Some((Slot::Primary, AmmoClass::Light))
        );
    }

    #[test]
    fn weapon_rank_returns_first_match() {
        let profile = profile();
        let mut sampler = FakeSampler::new();
        sampler.set(300, 50, OTHER);
        sampler.set(300, 80, MATCHED);
        let hud = HudReader::new(&profile, &sampler);
        assert_eq!(
            hud.weapon_rank(Slot::Primary, AmmoClass::Light).unwrap(),
            Some(2)
        );
    }

    #[test]
    fn weapon_rank_none_after_exhaustive_scan() {
        let profile = profile();
        let mut sampler = FakeSampler::new();
        sampler.set(300, 50, OTHER);
        sampler.set(300, 80, OTHER);
        let hud = HudReader::new(&profile, &sampler);
        assert_eq!(hud.weapon_rank(Slot::Primary, AmmoClass::Light).unwrap(), None);
        assert_eq!(sampler.calls(), 2);
    }

    #[test]
    fn secondary_rank_scans_shifted_candidates() {
        // Only the differ-shifted points are scripted: sampling the
        // unshifted list would fail, proving the secondary path reuses the
        // primary table under an x offset.
        let profile = profile();
        let mut sampler = FakeSampler::new();
        sampler.set(260, 50, OTHER);
        sampler.set(260, 80, MATCHED);
        let hud = HudReader::new(&profile, &sampler);
        assert_eq!(
            hud.weapon_rank(Slot::Secondary, AmmoClass::Light).unwrap(),
            Some(2)
        );
    }

    #[test]
    fn weapon_rank_without_candidates_is_none() {
        let profile = profile();
        let sampler = FakeSampler::new();
        let hud = HudReader::new(&profile, &sampler);
        assert_eq!(hud.weapon_rank(Slot::Primary, AmmoClass::Sniper).unwrap(), None);
        assert_eq!(sampler.calls(), 0);
    }

    #[test]
    fn fire_mode_maps_calibrated_colors() {
        let profile = profile();
        let mut sampler = FakeSampler::new();
        sampler.set(400, 200, AUTO);
        let hud = HudReader::new(&profile, &sampler);
        assert_eq!(hud.fire_mode().unwrap(), Some(FireMode::FullAuto));
    }

    #[test]
    fn fire_mode_none_for_unmapped_color() {
        let profile = profile();
        let mut sampler = FakeSampler::new();
        sampler.set(400, 200, OTHER);
        let hud = HudReader::new(&profile, &sampler);
        assert_eq!(hud.fire_mode().unwrap(), None);
    }
}
