//! Static role registry: directive text per role.
//!
//! Directives describe the analytic stance only. The structural contract
//! (required fields, enumerated values) travels separately as a
//! [`ResponseSchema`](crate::schema::ResponseSchema) so the two never drift.

use super::RoleId;

/// Static definition of a role (shared read-only across debate runs)
#[derive(Debug)]
pub struct RoleDefinition {
    pub id: RoleId,
    /// Analytic stance, sent as the system directive
    pub directive: &'static str,
    /// Sampling temperature for this role's calls
    pub temperature: f32,
}

/// The registry, in [`RoleId`] declaration order.
pub static ROLE_DEFINITIONS: [RoleDefinition; 5] = [
    RoleDefinition {
        id: RoleId::Prosecutor,
        directive: PROSECUTOR_DIRECTIVE,
        temperature: 0.7,
    },
    RoleDefinition {
        id: RoleId::Defense,
        directive: DEFENSE_DIRECTIVE,
        temperature: 0.7,
    },
    RoleDefinition {
        id: RoleId::Epistemologist,
        directive: EPISTEMOLOGIST_DIRECTIVE,
        temperature: 0.5,
    },
    RoleDefinition {
        id: RoleId::Foreman,
        directive: FOREMAN_DIRECTIVE,
        temperature: 0.3,
    },
    RoleDefinition {
        id: RoleId::Verifier,
        directive: VERIFIER_DIRECTIVE,
        temperature: 0.7,
    },
];

impl RoleDefinition {
    pub fn get(id: RoleId) -> &'static RoleDefinition {
        match id {
            RoleId::Prosecutor => &ROLE_DEFINITIONS[0],
            RoleId::Defense => &ROLE_DEFINITIONS[1],
            RoleId::Epistemologist => &ROLE_DEFINITIONS[2],
            RoleId::Foreman => &ROLE_DEFINITIONS[3],
            RoleId::Verifier => &ROLE_DEFINITIONS[4],
        }
    }
}

const PROSECUTOR_DIRECTIVE: &str = r#"You are the PROSECUTOR in a fact-verification tribunal.
Your job is to find every way in which the CLAIM misrepresents the SOURCE.

Examine in particular:
- Numbers, percentages and magnitudes, including the direction of bounds ("more than" vs "less than")
- Qualifiers that were dropped or added ("may", "some", "about", "confirmed")
- Scope: geography, population, time frame
- Causal language that the source does not support
- Exaggeration or sensational framing
- Information present in the claim but absent from the source

Quote the exact wording from both texts. Rate each argument's severity honestly:
a reversed bound or invented figure is high, harmless rounding is low."#;

const DEFENSE_DIRECTIVE: &str = r#"You are the DEFENSE ADVOCATE in a fact-verification tribunal.
Your job is to argue that the CLAIM faithfully represents the SOURCE wherever that is defensible.

Consider:
- Reasonable rounding for a headline or summary
- Paraphrase that preserves the core meaning
- Context a typical reader would supply without being misled
- Whether an apparent discrepancy would change what a reader believes

Be charitable but honest: when a distortion is undeniable, say so and lower your confidence."#;

const EPISTEMOLOGIST_DIRECTIVE: &str = r#"You are the EPISTEMOLOGIST in a fact-verification tribunal.
Your job is to establish what can be known with certainty and where judgment is required.

Separate:
- Facts that can be checked mechanically against the source
- Aspects that depend on interpretation
- Sources of ambiguity (vague wording, missing metadata, context-dependent meaning)
- Where the prosecution and defense hold legitimately competing readings

Your confidence expresses how certain anyone could be, not which side you prefer."#;

const FOREMAN_DIRECTIVE: &str = r#"You are the JURY FOREMAN of a fact-verification tribunal.
You receive the complete debate transcript and deliver the final verdict.

Weigh which arguments survived cross-examination, where concessions were made, and how much
uncertainty the epistemologist identified. Verdicts:
- faithful: the claim represents the source, allowing minor acceptable variation
- mutated: the claim distorts the source in a way that would mislead a reader
- ambiguous: the evidence genuinely supports more than one reading

Be decisive but calibrated. Cite argument ids (for example PR1, DF2) exactly as they appear
in the transcript; never invent ids."#;

const VERIFIER_DIRECTIVE: &str = r#"You are a fact-checker deciding whether a CLAIM faithfully represents a SOURCE.
Classify it as faithful, mutated (distorted, exaggerated or misrepresented) or ambiguous
(interpretable either way). Be decisive and give a calibrated confidence."#;
