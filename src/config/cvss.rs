use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static VECTOR_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^CVSS:3\.[01](/[A-Za-z]{1,3}:[A-Za-z])+$").expect("valid regex")
});

#[derive(Debug, Error)]
#[error("invalid CVSS vector: {0}")]
pub struct CvssParseError(String);

/// Computes the CVSS v3.x base score (0.0–10.0, one decimal) from a vector
/// string such as "CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:U/C:H/I:H/A:H".
///
/// Only the eight base metrics are read; temporal and environmental metrics
/// are ignored if present.
pub fn base_score(vector: &str) -> Result<f64, CvssParseError> {
    if !VECTOR_SHAPE.is_match(vector) {
        return Err(CvssParseError(format!("malformed vector \"{vector}\"")));
    }

    let mut av = None;
    let mut ac = None;
    let mut pr = None;
    let mut ui = None;
    let mut scope_changed = None;
    let mut conf = None;
    let mut integ = None;
    let mut avail = None;

    for metric in vector.split('/').skip(1) {
        let (name, value) = metric
            .split_once(':')
            .ok_or_else(|| CvssParseError(format!("malformed metric \"{metric}\"")))?;
        let slot = match name {
            "AV" => &mut av,
            "AC" => &mut ac,
            "PR" => &mut pr,
            "UI" => &mut ui,
            "S" => &mut scope_changed,
            "C" => &mut conf,
            "I" => &mut integ,
            "A" => &mut avail,
            // Temporal/environmental metrics pass through unread.
            _ => continue,
        };
        if slot.replace(value).is_some() {
            return Err(CvssParseError(format!("metric {name} given twice")));
        }
    }

    let scope_changed = match require(scope_changed, "S")? {
        "U" => false,
        "C" => true,
        other => return Err(CvssParseError(format!("unknown S value \"{other}\""))),
    };

    let av = match require(av, "AV")? {
        "N" => 0.85,
        "A" => 0.62,
        "L" => 0.55,
        "P" => 0.2,
        other => return Err(CvssParseError(format!("unknown AV value \"{other}\""))),
    };
    let ac = match require(ac, "AC")? {
        "L" => 0.77,
        "H" => 0.44,
        other => return Err(CvssParseError(format!("unknown AC value \"{other}\""))),
    };
    let pr = match (require(pr, "PR")?, scope_changed) {
        ("N", _) => 0.85,
        ("L", false) => 0.62,
        ("L", true) => 0.68,
        ("H", false) => 0.27,
        ("H", true) => 0.5,
        (other, _) => return Err(CvssParseError(format!("unknown PR value \"{other}\""))),
    };
    let ui = match require(ui, "UI")? {
        "N" => 0.85,
        "R" => 0.62,
        other => return Err(CvssParseError(format!("unknown UI value \"{other}\""))),
    };

    let conf = cia_weight(require(conf, "C")?, "C")?;
    let integ = cia_weight(require(integ, "I")?, "I")?;
    let avail = cia_weight(require(avail, "A")?, "A")?;

    let iss = 1.0 - (1.0 - conf) * (1.0 - integ) * (1.0 - avail);
    let impact = if scope_changed {
        7.52 * (iss - 0.029) - 3.25 * (iss - 0.02).powi(15)
    } else {
        6.42 * iss
    };
    let exploitability = 8.22 * av * ac * pr * ui;

    if impact <= 0.0 {
        return Ok(0.0);
    }
    let raw = if scope_changed {
        (1.08 * (impact + exploitability)).min(10.0)
    } else {
        (impact + exploitability).min(10.0)
    };
    Ok(round_up(raw))
}

fn require<'a>(value: Option<&'a str>, name: &str) -> Result<&'a str, CvssParseError> {
    value.ok_or_else(|| CvssParseError(format!("missing required metric {name}")))
}

fn cia_weight(value: &str, name: &str) -> Result<f64, CvssParseError> {
    match value {
        "H" => Ok(0.56),
        "L" => Ok(0.22),
        "N" => Ok(0.0),
        other => Err(CvssParseError(format!("unknown {name} value \"{other}\""))),
    }
}

/// Specification "roundup": smallest number with one decimal place that is
/// at or above the input, computed over integers to dodge float artifacts.
fn round_up(value: f64) -> f64 {
    let scaled = (value * 100_000.0).round() as i64;
    if scaled % 10_000 == 0 {
        scaled as f64 / 100_000.0
    } else {
        ((scaled / 10_000) + 1) as f64 / 10.0
    }
}
