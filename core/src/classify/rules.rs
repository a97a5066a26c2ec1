//! Name-matching rule tables.
//!
//! Classification is heuristic: substring and prefix matching over node
//! and material names as authored in the character assets. The tables are
//! data so a vocabulary change never touches the traversal code. All
//! matching here expects pre-lowercased input.

/// Tokens that mark a node or material name as clothing. Used both to
/// exclude nodes from the skin group and inside the skin "body" rule.
pub const GARMENT_VOCAB: &[&str] = &[
    "shirt", "tshirt", "top", "sweater", "jacket", "pant", "trouser", "bottom", "shoe", "boot",
    "sock", "collar", "sleeve", "dress",
];

/// Tokens that select nodes for the garment group.
pub const GARMENT_GROUP_VOCAB: &[&str] = &["tops", "sweater", "top", "tshirt", "shirt"];

/// Material-name token selecting the stock hair mesh. Tuned to one
/// character rig on purpose.
pub const HAIR_MATERIAL_TOKEN: &str = "ch31_hair001";

/// Where a skin rule token is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuleField {
    /// Node name only.
    Name,
    /// Node name or primary material name.
    NameOrMaterial,
}

/// One positive skin rule: `token` matches unless `veto` also appears in
/// the node name.
struct SkinRule {
    token: &'static str,
    field: RuleField,
    veto: Option<&'static str>,
}

const SKIN_RULES: &[SkinRule] = &[
    SkinRule {
        token: "skin",
        field: RuleField::NameOrMaterial,
        veto: None,
    },
    SkinRule {
        token: "face",
        field: RuleField::NameOrMaterial,
        veto: None,
    },
    SkinRule {
        token: "head",
        field: RuleField::Name,
        veto: Some("hair"),
    },
    SkinRule {
        token: "hand",
        field: RuleField::NameOrMaterial,
        veto: None,
    },
    SkinRule {
        token: "arm",
        field: RuleField::Name,
        veto: Some("sleeve"),
    },
    SkinRule {
        token: "leg",
        field: RuleField::Name,
        veto: Some("pant"),
    },
];

impl SkinRule {
    fn matches(&self, name: &str, material: &str) -> bool {
        let hit = match self.field {
            RuleField::Name => name.contains(self.token),
            RuleField::NameOrMaterial => name.contains(self.token) || material.contains(self.token),
        };
        match self.veto {
            Some(veto) => hit && !name.contains(veto),
            None => hit,
        }
    }
}

/// Whether the garment vocabulary classifies this node as clothing.
pub(crate) fn is_garment(name: &str, material: &str) -> bool {
    GARMENT_VOCAB
        .iter()
        .any(|token| name.contains(token) || material.contains(token))
}

/// Whether any skin rule selects this node. Callers must still apply the
/// garment exclusion; skin membership is skin AND NOT garment.
pub(crate) fn is_skin(name: &str, material: &str) -> bool {
    if SKIN_RULES.iter().any(|rule| rule.matches(name, material)) {
        return true;
    }
    if name.contains("body") && !is_garment(name, material) {
        return true;
    }
    has_numbered_prefix(name, "_body")
}

/// Whether the garment-group vocabulary selects this node. No exclusion
/// filter is applied here, unlike the skin side.
pub(crate) fn is_garment_group(name: &str, material: &str) -> bool {
    GARMENT_GROUP_VOCAB
        .iter()
        .any(|token| name.contains(token) || material.contains(token))
}

/// Whether this node is the stock hair mesh.
pub(crate) fn is_hair(name: &str, material: &str) -> bool {
    material.contains(HAIR_MATERIAL_TOKEN) || has_numbered_prefix(name, "_hair001")
}

/// Matches names of the form `ch<digits><suffix>...` from the start,
/// e.g. `ch31_body` for suffix `_body`. Input must be lowercased.
pub(crate) fn has_numbered_prefix(name: &str, suffix: &str) -> bool {
    let rest = match name.strip_prefix("ch") {
        Some(rest) => rest,
        None => return false,
    };
    let digit_count = rest.chars().take_while(|c| c.is_ascii_digit()).count();
    if digit_count == 0 {
        return false;
    }
    rest[digit_count..].starts_with(suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_prefix_matching() {
        assert!(has_numbered_prefix("ch31_hair001", "_hair001"));
        assert!(has_numbered_prefix("ch7_body", "_body"));
        assert!(has_numbered_prefix("ch31_body_extra", "_body"));
        assert!(!has_numbered_prefix("chair_top", "_top"));
        assert!(!has_numbered_prefix("ch_body", "_body"));
        assert!(!has_numbered_prefix("xch31_body", "_body"));
    }

    #[test]
    fn garment_tokens_match_either_field() {
        assert!(is_garment("shirt_default", ""));
        assert!(is_garment("outfit", "wool_sweater"));
        assert!(!is_garment("skin_body", "skin_mat"));
    }

    #[test]
    fn skin_rules_apply_vetoes() {
        assert!(is_skin("head_mesh", ""));
        assert!(!is_skin("hair_head", ""));
        assert!(is_skin("left_arm", ""));
        assert!(!is_skin("arm_sleeve", ""));
        assert!(is_skin("leg_lower", ""));
        assert!(!is_skin("leg_pants", ""));
    }

    #[test]
    fn body_rule_defers_to_garment_vocab() {
        assert!(is_skin("body_base", ""));
        assert!(!is_skin("bodysuit_top", ""));
        assert!(is_skin("ch31_body", ""));
    }

    #[test]
    fn hair_matches_material_token_or_prefix() {
        assert!(is_hair("", "ch31_hair001_mat"));
        assert!(is_hair("ch31_hair001", ""));
        assert!(!is_hair("hair_default", "hair_mat"));
    }
}
