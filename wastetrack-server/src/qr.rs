//! Printable household QR codes.
//!
//! The encoded payload is the bare household id (`H001`), which is exactly
//! what the scanner page submits to `/collect`. Each code is written as
//! `<id>.png`.

use std::{
    fmt, fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::{Context, Result};
use image::{ImageBuffer, Luma};
use qrcode::QrCode;
use tracing::{info, warn};

use wastetrack_core::domain::HouseholdId;

pub const HOUSEHOLD_PREFIX: char = 'H';

const MIN_SIDE_PX: u32 = 256;

pub type QrImage = ImageBuffer<Luma<u8>, Vec<u8>>;

/// Inclusive numeric range of household ids, e.g. `1-100` for
/// `H001..=H100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HouseholdRange {
    first: u32,
    last: u32,
}

impl HouseholdRange {
    pub fn new(first: u32, last: u32) -> Result<Self, String> {
        if first == 0 || first > last {
            return Err(format!(
                "household range {first}-{last} must start at 1 and not run backwards"
            ));
        }
        Ok(Self { first, last })
    }

    pub fn ids(&self) -> Vec<HouseholdId> {
        (self.first..=self.last)
            .filter_map(|n| {
                HouseholdId::parse(&format!("{HOUSEHOLD_PREFIX}{n:03}")).ok()
            })
            .collect()
    }
}

impl FromStr for HouseholdRange {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (first, last) = raw
            .split_once('-')
            .ok_or_else(|| format!("expected FIRST-LAST, got `{raw}`"))?;
        let number = |bound: &str| {
            let digits = bound.trim();
            let digits = digits.strip_prefix(HOUSEHOLD_PREFIX).unwrap_or(digits);
            digits
                .parse::<u32>()
                .map_err(|_| format!("`{bound}` is not a household number"))
        };
        Self::new(number(first)?, number(last)?)
    }
}

impl fmt::Display for HouseholdRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.first, self.last)
    }
}

pub fn file_name(id: &HouseholdId) -> String {
    format!("{id}.png")
}

pub fn render(id: &HouseholdId) -> Result<QrImage> {
    let code = QrCode::new(id.as_str().as_bytes())
        .with_context(|| format!("household id {id} does not fit in a QR code"))?;
    Ok(code
        .render::<Luma<u8>>()
        .min_dimensions(MIN_SIDE_PX, MIN_SIDE_PX)
        .build())
}

/// Render every id into `out_dir`, creating it if needed. Returns the
/// written paths in input order.
pub fn write_codes(ids: &[HouseholdId], out_dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir).with_context(|| {
        format!("failed to create output directory {}", out_dir.display())
    })?;

    let mut written = Vec::with_capacity(ids.len());
    for id in ids {
        if id.as_str().contains(['/', '\\']) {
            warn!(household_id = %id, "skipping id that is not a valid file name");
            continue;
        }
        let path = out_dir.join(file_name(id));
        render(id)?
            .save(&path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        written.push(path);
    }

    info!(
        count = written.len(),
        dir = %out_dir.display(),
        "wrote household QR codes"
    );
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: &str) -> HouseholdId {
        HouseholdId::parse(raw).unwrap()
    }

    #[test]
    fn range_uses_zero_padded_ids() {
        let ids: Vec<String> = "1-3"
            .parse::<HouseholdRange>()
            .unwrap()
            .ids()
            .into_iter()
            .map(|id| id.to_string())
            .collect();
        assert_eq!(ids, ["H001", "H002", "H003"]);
    }

    #[test]
    fn range_accepts_prefixed_bounds() {
        let range: HouseholdRange = "H001-H100".parse().unwrap();
        assert_eq!(range, HouseholdRange::new(1, 100).unwrap());
        assert_eq!(range.ids().len(), 100);
    }

    #[test]
    fn malformed_ranges_are_rejected() {
        assert!("5-2".parse::<HouseholdRange>().is_err());
        assert!("0-3".parse::<HouseholdRange>().is_err());
        assert!("abc".parse::<HouseholdRange>().is_err());
        assert!("1-x".parse::<HouseholdRange>().is_err());
    }

    #[test]
    fn payload_is_the_bare_household_id() {
        let expected = QrCode::new(b"H001")
            .unwrap()
            .render::<Luma<u8>>()
            .min_dimensions(MIN_SIDE_PX, MIN_SIDE_PX)
            .build();

        let rendered = render(&id("H001")).unwrap();

        assert_eq!(rendered.dimensions(), expected.dimensions());
        assert_eq!(rendered.into_raw(), expected.into_raw());
    }

    #[test]
    fn codes_are_written_as_id_png() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("qrcodes");

        let written = write_codes(&[id("H001"), id("H002")], &out).unwrap();

        assert_eq!(written, [out.join("H001.png"), out.join("H002.png")]);
        let decoded = image::open(&written[0]).unwrap().to_luma8();
        assert_eq!(decoded.into_raw(), render(&id("H001")).unwrap().into_raw());
    }

    #[test]
    fn ids_with_path_separators_are_skipped() {
        let dir = tempfile::tempdir().unwrap();

        let written = write_codes(&[id("../H001")], dir.path()).unwrap();

        assert!(written.is_empty());
    }
}
