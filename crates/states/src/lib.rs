//! The 16 German federal states (Bundesländer) as they appear in the
//! register portal: two-letter codes, canonical German names, and a
//! lookup that accepts German or English names in common spelling
//! variants (umlauts spelled out, hyphens swapped for spaces).

use serde::{Deserialize, Serialize};

/// Two-letter state code used by the portal's advanced-search form.
///
/// Declaration order matches the portal's own listing and is the order
/// `ALL` and every listing endpoint reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateCode {
    BW,
    BY,
    BE,
    BR,
    HB,
    HH,
    HE,
    MV,
    NI,
    NW,
    RP,
    SL,
    SN,
    ST,
    SH,
    TH,
}

use StateCode::*;

impl StateCode {
    /// All 16 states in declaration order.
    pub const ALL: [StateCode; 16] = [
        BW, BY, BE, BR, HB, HH, HE, MV, NI, NW, RP, SL, SN, ST, SH, TH,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BW => "BW",
            BY => "BY",
            BE => "BE",
            BR => "BR",
            HB => "HB",
            HH => "HH",
            HE => "HE",
            MV => "MV",
            NI => "NI",
            NW => "NW",
            RP => "RP",
            SL => "SL",
            SN => "SN",
            ST => "ST",
            SH => "SH",
            TH => "TH",
        }
    }

    /// Canonical German name as the portal renders it.
    pub fn name_de(self) -> &'static str {
        match self {
            BW => "Baden-Württemberg",
            BY => "Bayern",
            BE => "Berlin",
            BR => "Brandenburg",
            HB => "Bremen",
            HH => "Hamburg",
            HE => "Hessen",
            MV => "Mecklenburg-Vorpommern",
            NI => "Niedersachsen",
            NW => "Nordrhein-Westfalen",
            RP => "Rheinland-Pfalz",
            SL => "Saarland",
            SN => "Sachsen",
            ST => "Sachsen-Anhalt",
            SH => "Schleswig-Holstein",
            TH => "Thüringen",
        }
    }

    /// Name of the per-state checkbox in the portal's advanced-search form.
    pub fn form_field(self) -> String {
        format!("bundesland{}", self.as_str())
    }

    /// Resolve a free-form state name or code to a `StateCode`.
    ///
    /// Input is trimmed and lowercased, then matched first against the
    /// two-letter codes and then against the alias table. Unresolved
    /// input yields `None` — there is no partial matching.
    pub fn resolve(input: &str) -> Option<StateCode> {
        let normalized = input.trim().to_lowercase();
        if normalized.is_empty() {
            return None;
        }
        for code in Self::ALL {
            if code.as_str().eq_ignore_ascii_case(&normalized) {
                return Some(code);
            }
        }
        ALIASES
            .iter()
            .find(|(name, _)| *name == normalized)
            .map(|&(_, code)| code)
    }
}

// ── Alias table ───────────────────────────────────────────────────────────────
// German names (with umlaut-ASCII and hyphen/space variants) and English
// names, all lowercase. Keep entries grouped per state.
static ALIASES: &[(&str, StateCode)] = &[
    ("baden-württemberg", BW),
    ("baden-wuerttemberg", BW),
    ("baden württemberg", BW),
    ("baden wuerttemberg", BW),
    ("bayern", BY),
    ("bavaria", BY),
    ("berlin", BE),
    ("brandenburg", BR),
    ("bremen", HB),
    ("hamburg", HH),
    ("hessen", HE),
    ("hesse", HE),
    ("mecklenburg-vorpommern", MV),
    ("mecklenburg vorpommern", MV),
    ("mecklenburg-western pomerania", MV),
    ("mecklenburg western pomerania", MV),
    ("niedersachsen", NI),
    ("lower saxony", NI),
    ("nordrhein-westfalen", NW),
    ("nordrhein westfalen", NW),
    ("north rhine-westphalia", NW),
    ("north rhine westphalia", NW),
    ("rheinland-pfalz", RP),
    ("rheinland pfalz", RP),
    ("rhineland-palatinate", RP),
    ("rhineland palatinate", RP),
    ("saarland", SL),
    ("sachsen", SN),
    ("saxony", SN),
    ("sachsen-anhalt", ST),
    ("sachsen anhalt", ST),
    ("saxony-anhalt", ST),
    ("saxony anhalt", ST),
    ("schleswig-holstein", SH),
    ("schleswig holstein", SH),
    ("thüringen", TH),
    ("thueringen", TH),
    ("thuringia", TH),
];
