//! Astronomical helper math: angle wrapping, spectral type encoding, sky distances,
//! sidereal time and a low-precision lunar ephemeris.

use crate::catalog::EquatorialCoord;
use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::LazyLock;

/// Numeric value assigned to spectral types that cannot be parsed.
pub const INVALID_STYPE: u32 = 999;

/// Hot-to-cool spectral letter ordering.
const SPECTRAL_LETTERS: [char; 10] = ['O', 'B', 'A', 'F', 'G', 'K', 'M', 'L', 'T', 'Y'];

static STYPE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([OBAFGKMLTY])\s*(\d)").unwrap());

const J2000_JD: f64 = 2_451_545.0;
const UNIX_EPOCH_JD: f64 = 2_440_587.5;
const SECONDS_PER_DAY: f64 = 86_400.0;
const DAYS_PER_CENTURY: f64 = 36_525.0;

/// Wraps an angular offset into (−180°, 180°].
///
/// An apparent offset of 359° is really −1°; −181° is really 179°. Non-finite inputs are
/// passed through unchanged.
pub fn normalize_offset(deg: f64) -> f64 {
    if !deg.is_finite() {
        return deg;
    }
    let wrapped = deg.rem_euclid(360.0);
    if wrapped > 180.0 { wrapped - 360.0 } else { wrapped }
}

/// Offset `(ΔRA, ΔDec)` in degrees that moves `from` onto `to`, RA wrapped into (−180°, 180°].
pub fn offset_between(from: EquatorialCoord, to: EquatorialCoord) -> (f64, f64) {
    (
        normalize_offset(to.ra_deg() - from.ra_deg()),
        normalize_offset(to.dec_deg() - from.dec_deg()),
    )
}

/// Encodes a spectral type as `letter_rank * 10 + digit`, e.g. `"K0III"` → 50.
///
/// Returns [`INVALID_STYPE`] for missing or unparseable types.
#[allow(clippy::cast_possible_truncation)]
pub fn stype_to_number(stype: Option<&str>) -> u32 {
    let Some(caps) = stype.and_then(|s| STYPE_REGEX.captures(s)) else {
        return INVALID_STYPE;
    };
    let letter = caps[1].chars().next().and_then(|c| SPECTRAL_LETTERS.iter().position(|l| *l == c));
    let digit = caps[2].parse::<u32>().ok();
    match (letter, digit) {
        (Some(rank), Some(d)) => rank as u32 * 10 + d,
        _ => INVALID_STYPE,
    }
}

/// Flat distance in the RA/Dec plane, RA difference wrapped.
pub fn flat_distance(a: EquatorialCoord, b: EquatorialCoord) -> f64 {
    let (d_ra, d_dec) = offset_between(a, b);
    d_ra.hypot(d_dec)
}

/// Great-circle separation of two positions in degrees.
pub fn angular_separation(a: EquatorialCoord, b: EquatorialCoord) -> f64 {
    let (ra1, dec1) = (a.ra_deg().to_radians(), a.dec_deg().to_radians());
    let (ra2, dec2) = (b.ra_deg().to_radians(), b.dec_deg().to_radians());
    let hav = ((dec2 - dec1) / 2.0).sin().powi(2)
        + dec1.cos() * dec2.cos() * ((ra2 - ra1) / 2.0).sin().powi(2);
    (2.0 * hav.sqrt().min(1.0).asin()).to_degrees()
}

/// Julian date of an instant (UTC used as a stand-in for TT).
#[allow(clippy::cast_precision_loss)]
pub fn julian_date(t: DateTime<Utc>) -> f64 {
    let seconds = t.timestamp() as f64 + f64::from(t.timestamp_subsec_nanos()) * 1e-9;
    seconds / SECONDS_PER_DAY + UNIX_EPOCH_JD
}

/// Greenwich mean sidereal time in degrees, [0°, 360°).
pub fn gmst_deg(t: DateTime<Utc>) -> f64 {
    let d = julian_date(t) - J2000_JD;
    let c = d / DAYS_PER_CENTURY;
    (280.460_618_37 + 360.985_647_366_29 * d + 0.000_387_933 * c * c
        - c * c * c / 38_710_000.0)
        .rem_euclid(360.0)
}

/// Local hour angle of `target` in degrees, (−180°, 180°]; negative east of the meridian.
///
/// # Arguments
/// * `target` – Position of the object.
/// * `longitude_deg` – Site longitude, east positive.
/// * `t` – Instant of evaluation.
pub fn hour_angle_deg(target: EquatorialCoord, longitude_deg: f64, t: DateTime<Utc>) -> f64 {
    normalize_offset(gmst_deg(t) + longitude_deg - target.ra_deg())
}

/// Geocentric lunar position, accurate to a few tenths of a degree.
///
/// Uses the truncated series of the Astronomical Almanac for ecliptic longitude and
/// latitude and rotates the result by the mean obliquity.
pub fn moon_position(t: DateTime<Utc>) -> EquatorialCoord {
    let c = (julian_date(t) - J2000_JD) / DAYS_PER_CENTURY;
    let s = |deg: f64| deg.to_radians().sin();

    let lambda = 218.32 + 481_267.881 * c + 6.29 * s(135.0 + 477_198.87 * c)
        - 1.27 * s(259.3 - 413_335.36 * c)
        + 0.66 * s(235.7 + 890_534.22 * c)
        + 0.21 * s(269.9 + 954_397.74 * c)
        - 0.19 * s(357.5 + 35_999.05 * c)
        - 0.11 * s(186.5 + 966_404.03 * c);
    let beta = 5.13 * s(93.3 + 483_202.02 * c) + 0.28 * s(228.2 + 960_400.89 * c)
        - 0.28 * s(318.3 + 6_003.15 * c)
        - 0.17 * s(217.6 - 407_332.21 * c);
    let eps = (23.439_291 - 0.013_004_2 * c).to_radians();

    let (l, b) = (lambda.to_radians(), beta.to_radians());
    let ra = (l.sin() * eps.cos() - b.tan() * eps.sin()).atan2(l.cos());
    let dec = (b.sin() * eps.cos() + b.cos() * eps.sin() * l.sin()).asin();
    EquatorialCoord::new(ra.to_degrees().rem_euclid(360.0), dec.to_degrees())
}
