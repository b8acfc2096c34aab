//! Display abbreviation resolution.
//!
//! Most order codes map 1:1 to a short display label. A few composite codes
//! bundle several sub-measurements under one order code; for those the item
//! name decides the label, matched against bilingual keyword sets. No match
//! means no abbreviation, and the renderer falls back to the raw item name.

/// Combined serum creatinine / estimated GFR panel.
pub const ORDER_CRE_GFR: &str = "3C015";
/// Urine protein / creatinine ratio panel.
pub const ORDER_URINE_PROTEIN_CRE: &str = "1A990";
/// Urine albumin / creatinine ratio panel.
pub const ORDER_URINE_ALBUMIN_CRE: &str = "1A991";
/// Complete blood count bundle.
pub const ORDER_BLOOD_COUNT: &str = "2A990";

pub const ORDER_GLUCOSE: &str = "3D010";
pub const ORDER_CRP: &str = "5C070";

/// Static 1:1 order-code table for the common single assays.
const STATIC_ABBREVIATIONS: &[(&str, &str)] = &[
    ("3B010", "TP"),
    ("3B015", "Alb"),
    ("3B035", "AST"),
    ("3B040", "ALT"),
    ("3B045", "LD"),
    ("3B070", "γGTP"),
    ("3B090", "ALP"),
    ("3C010", "UN"),
    ("3C020", "UA"),
    (ORDER_GLUCOSE, "Glu"),
    ("3D046", "HbA1c"),
    ("3F010", "T-Cho"),
    ("3F015", "TG"),
    ("3F070", "HDL-C"),
    ("3F077", "LDL-C"),
    ("3H010", "Na"),
    ("3H015", "K"),
    ("3H020", "Cl"),
    ("3H030", "Ca"),
    (ORDER_CRP, "CRP"),
];

/// The composite panels whose order code alone cannot pick a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CompositePanel {
    CreatinineGfr,
    UrineProteinRatio,
    UrineAlbuminRatio,
    BloodCount,
}

fn composite_panel(order_code: &str) -> Option<CompositePanel> {
    match order_code {
        ORDER_CRE_GFR => Some(CompositePanel::CreatinineGfr),
        ORDER_URINE_PROTEIN_CRE => Some(CompositePanel::UrineProteinRatio),
        ORDER_URINE_ALBUMIN_CRE => Some(CompositePanel::UrineAlbuminRatio),
        ORDER_BLOOD_COUNT => Some(CompositePanel::BloodCount),
        _ => None,
    }
}

/// Resolve the short display label for an order code, using the item name
/// to disambiguate composite panels.
pub fn resolve(order_code: &str, item_name: &str) -> Option<&'static str> {
    if let Some(panel) = composite_panel(order_code) {
        return resolve_composite(panel, item_name);
    }
    STATIC_ABBREVIATIONS
        .iter()
        .find(|(code, _)| *code == order_code)
        .map(|(_, abbr)| *abbr)
}

fn resolve_composite(panel: CompositePanel, item_name: &str) -> Option<&'static str> {
    match panel {
        CompositePanel::CreatinineGfr => {
            // GFR keywords first: eGFR item names usually mention
            // creatinine too.
            if contains_any(item_name, &["gfr", "糸球体濾過"]) {
                Some("GFR")
            } else if is_creatinine(item_name) {
                Some("Cr")
            } else {
                None
            }
        }
        CompositePanel::UrineProteinRatio => {
            if is_ratio(item_name) {
                Some("P/Cr")
            } else if contains_any(item_name, &["protein", "蛋白", "たんぱく"]) {
                Some("U-Pro")
            } else if is_creatinine(item_name) {
                Some("U-Cr")
            } else {
                None
            }
        }
        CompositePanel::UrineAlbuminRatio => {
            if is_ratio(item_name) {
                Some("ACR")
            } else if contains_any(item_name, &["albumin", "アルブミン"]) {
                Some("U-Alb")
            } else if is_creatinine(item_name) {
                Some("U-Cr")
            } else {
                None
            }
        }
        CompositePanel::BloodCount => {
            if contains_any(item_name, &["白血球"]) || has_token(item_name, "wbc") {
                Some("WBC")
            } else if contains_any(item_name, &["赤血球"]) || has_token(item_name, "rbc") {
                Some("RBC")
            } else if contains_any(item_name, &["ヘモグロビン", "血色素", "hemoglobin"])
                || has_token(item_name, "hb")
                || has_token(item_name, "hgb")
            {
                Some("Hb")
            } else if contains_any(item_name, &["ヘマトクリット", "hematocrit"])
                || has_token(item_name, "ht")
                || has_token(item_name, "hct")
            {
                Some("Ht")
            } else if contains_any(item_name, &["血小板", "platelet"]) || has_token(item_name, "plt")
            {
                Some("Plt")
            } else {
                None
            }
        }
    }
}

fn is_creatinine(item_name: &str) -> bool {
    contains_any(item_name, &["creatinine", "クレアチニン"]) || has_token(item_name, "cre")
}

fn is_ratio(item_name: &str) -> bool {
    contains_any(item_name, &["/cr", "比", "ratio"])
}

/// Case-insensitive substring match against any keyword.
fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    let lowered = haystack.to_lowercase();
    keywords.iter().any(|keyword| lowered.contains(keyword))
}

/// Case-insensitive exact-token match. Tokens split on anything that is not
/// alphanumeric, so `"Hb(血色素)"` has the token `hb` but `"HbA1c"` does not.
fn has_token(haystack: &str, token: &str) -> bool {
    haystack
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .any(|part| part == token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_lookup() {
        assert_eq!(resolve("3B035", "AST(GOT)"), Some("AST"));
        assert_eq!(resolve("3D046", "グリコヘモグロビン"), Some("HbA1c"));
        assert_eq!(resolve("9Z999", "anything"), None);
    }

    #[test]
    fn test_creatinine_gfr_panel_prefers_gfr() {
        assert_eq!(resolve(ORDER_CRE_GFR, "eGFR"), Some("GFR"));
        assert_eq!(
            resolve(ORDER_CRE_GFR, "eGFR (creatinine-based)"),
            Some("GFR")
        );
        assert_eq!(resolve(ORDER_CRE_GFR, "Creatinine"), Some("Cr"));
        assert_eq!(resolve(ORDER_CRE_GFR, "血清クレアチニン"), Some("Cr"));
        assert_eq!(resolve(ORDER_CRE_GFR, "推算糸球体濾過量"), Some("GFR"));
        assert_eq!(resolve(ORDER_CRE_GFR, "unrelated"), None);
    }

    #[test]
    fn test_urine_protein_panel() {
        assert_eq!(resolve(ORDER_URINE_PROTEIN_CRE, "尿蛋白"), Some("U-Pro"));
        assert_eq!(
            resolve(ORDER_URINE_PROTEIN_CRE, "蛋白/クレアチニン比"),
            Some("P/Cr")
        );
        assert_eq!(
            resolve(ORDER_URINE_PROTEIN_CRE, "尿中クレアチニン"),
            Some("U-Cr")
        );
    }

    #[test]
    fn test_urine_albumin_panel() {
        assert_eq!(resolve(ORDER_URINE_ALBUMIN_CRE, "尿中アルブミン"), Some("U-Alb"));
        assert_eq!(
            resolve(ORDER_URINE_ALBUMIN_CRE, "Albumin/Cr ratio"),
            Some("ACR")
        );
    }

    #[test]
    fn test_blood_count_bundle() {
        assert_eq!(resolve(ORDER_BLOOD_COUNT, "白血球数"), Some("WBC"));
        assert_eq!(resolve(ORDER_BLOOD_COUNT, "RBC"), Some("RBC"));
        assert_eq!(resolve(ORDER_BLOOD_COUNT, "Hb(血色素量)"), Some("Hb"));
        assert_eq!(resolve(ORDER_BLOOD_COUNT, "ヘマトクリット値"), Some("Ht"));
        assert_eq!(resolve(ORDER_BLOOD_COUNT, "血小板数"), Some("Plt"));
        assert_eq!(resolve(ORDER_BLOOD_COUNT, "好中球分画"), None);
    }

    #[test]
    fn test_token_matching_avoids_partial_words() {
        // "HbA1c" must not token-match "hb".
        assert!(!has_token("HbA1c", "hb"));
        assert!(has_token("Hb(血色素)", "hb"));
        assert_eq!(resolve(ORDER_BLOOD_COUNT, "HbA1c混入"), None);
    }
}
