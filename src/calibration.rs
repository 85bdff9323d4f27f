use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{HudScanError, HudScanResult};

/// Raw 24-bit pixel value as returned by the sampler.
///
/// Packing follows the GDI `COLORREF` layout (`r | g << 8 | b << 16`) so
/// values captured during calibration compare equal at runtime regardless of
/// which sampler backend produced them. Equality is exact; there is no
/// tolerance matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Color(pub u32);

impl Color {
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Color(r as u32 | (g as u32) << 8 | (b as u32) << 16)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:06x}", self.0)
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| format!("color {s:?} missing 0x prefix"))?;
        let value = u32::from_str_radix(digits, 16)
            .map_err(|_| format!("color {s:?} is not valid hex"))?;
        if value > 0x00ff_ffff {
            return Err(format!("color {s:?} exceeds 24 bits"));
        }
        Ok(Color(value))
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Calibrated pixel coordinate. Deserializes from a two-element `[x, y]`
/// array in calibration data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "[i32; 2]")]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl From<[i32; 2]> for Point {
    fn from(value: [i32; 2]) -> Self {
        Point {
            x: value[0],
            y: value[1],
        }
    }
}

/// A checkpoint paired with the color it must show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ColorPoint {
    pub x: i32,
    pub y: i32,
    pub color: Color,
}

/// Display resolution, the lookup key into the calibration store.
/// Rendered and parsed as `"{width}:{height}"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Resolution { width, height }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

impl FromStr for Resolution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(':')
            .ok_or_else(|| format!("resolution {s:?} is not \"width:height\""))?;
        let width = w
            .parse()
            .map_err(|_| format!("resolution {s:?} has an invalid width"))?;
        let height = h
            .parse()
            .map_err(|_| format!("resolution {s:?} has an invalid height"))?;
        Ok(Resolution { width, height })
    }
}

/// Ammunition class loaded into the active weapon.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AmmoClass {
    Light,
    Heavy,
    Energy,
    Sniper,
    Shotgun,
    Airdrop,
}

impl AmmoClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            AmmoClass::Light => "light",
            AmmoClass::Heavy => "heavy",
            AmmoClass::Energy => "energy",
            AmmoClass::Sniper => "sniper",
            AmmoClass::Shotgun => "shotgun",
            AmmoClass::Airdrop => "airdrop",
        }
    }
}

impl fmt::Display for AmmoClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AmmoClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(AmmoClass::Light),
            "heavy" => Ok(AmmoClass::Heavy),
            "energy" => Ok(AmmoClass::Energy),
            "sniper" => Ok(AmmoClass::Sniper),
            "shotgun" => Ok(AmmoClass::Shotgun),
            "airdrop" => Ok(AmmoClass::Airdrop),
            other => Err(format!("unknown ammo class {other:?}")),
        }
    }
}

/// Weapon trigger mode as shown on the HUD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FireMode {
    FullAuto,
    SemiAuto,
}

impl fmt::Display for FireMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FireMode::FullAuto => f.write_str("full_auto"),
            FireMode::SemiAuto => f.write_str("semi_auto"),
        }
    }
}

/// The ammo-pack checkpoint: `empty` is the color shown when nothing is
/// equipped; any other mapped color identifies the loaded ammo class.
#[derive(Debug, Clone)]
pub struct PackCheck {
    pub point: Point,
    pub empty: Color,
    pub ammo: BTreeMap<Color, AmmoClass>,
}

/// Name-resolution table: ordered slot-1 candidate points per ammo class,
/// the color a matching candidate shows, and the horizontal offset that maps
/// a slot-1 candidate onto its slot-2 position.
#[derive(Debug, Clone)]
pub struct NameTable {
    pub matched: Color,
    pub differ: i32,
    pub slots: BTreeMap<AmmoClass, Vec<Point>>,
}

/// The fire-mode checkpoint and its color-to-mode table.
#[derive(Debug, Clone)]
pub struct ModeCheck {
    pub point: Point,
    pub map: BTreeMap<Color, FireMode>,
}

/// Everything calibrated for one display resolution.
#[derive(Debug, Clone)]
pub struct Profile {
    /// Ordered overall-state checkpoints; all must match.
    pub state: Vec<ColorPoint>,
    pub pack: PackCheck,
    pub names: NameTable,
    pub mode: ModeCheck,
}

/// Immutable, resolution-keyed calibration database. Loaded once at startup
/// and shared by reference for the process lifetime; thread-safe by
/// construction since nothing mutates after load.
#[derive(Debug, Clone)]
pub struct Calibration {
    profiles: BTreeMap<Resolution, Profile>,
    weapons: BTreeMap<AmmoClass, Vec<String>>,
}

// On-disk shape. Map keys arrive as strings ("1920:1080", "0x2a2a2a",
// "light") and are parsed into their typed forms during conversion so that
// malformed entries fail at load, never mid-classification.

#[derive(Debug, Deserialize)]
struct RawCalibration {
    profiles: BTreeMap<String, RawProfile>,
    weapons: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawProfile {
    state: Vec<ColorPoint>,
    pack: RawPack,
    names: RawNames,
    mode: RawMode,
}

#[derive(Debug, Deserialize)]
struct RawPack {
    point: Point,
    empty: Color,
    ammo: BTreeMap<String, AmmoClass>,
}

#[derive(Debug, Deserialize)]
struct RawNames {
    matched: Color,
    differ: i32,
    slots: BTreeMap<String, Vec<Point>>,
}

#[derive(Debug, Deserialize)]
struct RawMode {
    point: Point,
    map: BTreeMap<String, FireMode>,
}

fn parse_keys<K, V>(raw: BTreeMap<String, V>, context: &str) -> HudScanResult<BTreeMap<K, V>>
where
    K: FromStr<Err = String> + Ord,
{
    let mut out = BTreeMap::new();
    for (key, value) in raw {
        let parsed = key
            .parse()
            .map_err(|e| HudScanError::Calibration(format!("{context}: {e}")))?;
        out.insert(parsed, value);
    }
    Ok(out)
}

impl Calibration {
    pub fn from_str(content: &str) -> HudScanResult<Self> {
        let raw: RawCalibration = toml::from_str(content)?;

        let mut profiles = BTreeMap::new();
        for (key, profile) in raw.profiles {
            let resolution: Resolution = key
                .parse()
                .map_err(HudScanError::Calibration)?;
            profiles.insert(resolution, convert_profile(resolution, profile)?);
        }
        let weapons = parse_keys(raw.weapons, "weapons")?;

        let calibration = Calibration { profiles, weapons };
        calibration.validate()?;
        Ok(calibration)
    }

    pub fn load(path: impl AsRef<Path>) -> HudScanResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let calibration = Self::from_str(&content)?;
        tracing::info!(
            path = %path.display(),
            profiles = calibration.profiles.len(),
            "calibration loaded"
        );
        Ok(calibration)
    }

    /// Profile lookup for the active resolution. There is no default
    /// profile; an unknown resolution is a hard failure.
    pub fn profile(&self, resolution: Resolution) -> HudScanResult<&Profile> {
        self.profiles
            .get(&resolution)
            .ok_or(HudScanError::ProfileNotFound(resolution))
    }

    /// Weapon identifier for an ammo class at a 1-based candidate rank.
    pub fn weapon_name(&self, ammo: AmmoClass, rank: usize) -> Option<&str> {
        self.weapons
            .get(&ammo)?
            .get(rank.checked_sub(1)?)
            .map(String::as_str)
    }

    pub fn resolutions(&self) -> impl Iterator<Item = Resolution> + '_ {
        self.profiles.keys().copied()
    }

    // Cross-reference checks that must hold before any detection runs: a
    // candidate list or weapon name missing for a reachable ammo class would
    // otherwise only surface mid-classification.
    fn validate(&self) -> HudScanResult<()> {
        for (resolution, profile) in &self.profiles {
            if profile.state.is_empty() {
                return Err(HudScanError::Calibration(format!(
                    "profile {resolution} has no state checkpoints"
                )));
            }
            for ammo in profile.pack.ammo.values() {
                let candidates = profile
                    .names
                    .slots
                    .get(ammo)
                    .filter(|list| !list.is_empty())
                    .ok_or_else(|| {
                        HudScanError::Calibration(format!(
                            "profile {resolution}: ammo class {ammo} has no name candidates"
                        ))
                    })?;
                let names = self.weapons.get(ammo).map_or(0, Vec::len);
                if names < candidates.len() {
                    return Err(HudScanError::Calibration(format!(
                        "weapon table for {ammo} has {names} names but profile \
                         {resolution} lists {} candidates",
                        candidates.len()
                    )));
                }
            }
        }
        Ok(())
    }
}

fn convert_profile(resolution: Resolution, raw: RawProfile) -> HudScanResult<Profile> {
    let context = format!("profile {resolution}");
    Ok(Profile {
        state: raw.state,
        pack: PackCheck {
            point: raw.pack.point,
            empty: raw.pack.empty,
            ammo: parse_keys(raw.pack.ammo, &context)?,
        },
        names: NameTable {
            matched: raw.names.matched,
            differ: raw.names.differ,
            slots: parse_keys(raw.names.slots, &context)?,
        },
        mode: ModeCheck {
            point: raw.mode.point,
            map: parse_keys(raw.mode.map, &context)?,
        },
    })
}

fn resolve_calibration_path() -> HudScanResult<PathBuf> {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(parent) = exe.parent() {
            let candidate = parent.join("calibration.toml");
            if candidate.exists() {
                tracing::debug!(path = %candidate.display(), "calibration found next to executable");
                return Ok(candidate);
            }
        }
    }

    let cwd = std::env::current_dir()?;
    let candidate = cwd.join("calibration.toml");
    if candidate.exists() {
        tracing::debug!(path = %candidate.display(), "calibration found in working directory");
        return Ok(candidate);
    }

    Err(HudScanError::Calibration(
        "calibration.toml not found next to executable or in working directory".into(),
    ))
}

/// Loads `calibration.toml` from next to the executable or the working
/// directory, in that order.
pub fn load_calibration() -> HudScanResult<Calibration> {
    Calibration::load(resolve_calibration_path()?)
}
