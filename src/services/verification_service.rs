//! Verification Reconciliation
//!
//! The webhook reports plan verification in several shapes:
//!
//! - **Nested**: `verification: {feasibility: {...}, quality: {...}}`
//! - **Flat**: `verification: {passed, checks, warnings, ai_quality_pass}` with a
//!   sibling `ai_quality_review` object
//! - **Canonical**: `verification: {isFeasible, ...}` plus `qualityVerification`,
//!   i.e. a document this service already normalized
//!
//! [`VerificationShape::detect`] picks the variant from its discriminating
//! fields and each variant has its own converter to the canonical pair.

use serde_json::Value;

use crate::models::itinerary::{MatchingSummary, Percentage};
use crate::models::verification::{QualityVerification, ScoreValue, Verification};
use crate::services::field_resolver::{lookup, string_list, Chain, FromJson};

const IS_FEASIBLE: Chain = Chain {
    field: "isFeasible",
    paths: &["isFeasible", "is_feasible", "passed"],
};

const FEASIBILITY_SCORE: Chain = Chain {
    field: "score",
    paths: &["score"],
};

const CHECKS: Chain = Chain {
    field: "checks",
    paths: &["checks"],
};

const WARNINGS: Chain = Chain {
    field: "warnings",
    paths: &["warnings"],
};

const PASSES_QUALITY: Chain = Chain {
    field: "passesQuality",
    paths: &["passesQuality", "passes_quality", "is_valid"],
};

const QUALITY_SCORE: Chain = Chain {
    field: "qualityScore",
    paths: &["qualityScore", "quality_score", "score"],
};

const QUALITY_MATCH_RATE: Chain = Chain {
    field: "matchRate",
    paths: &["matchRate", "match_rate"],
};

const OVERALL_QUALITY: Chain = Chain {
    field: "overallQuality",
    paths: &["overallQuality", "overall_quality"],
};

const ISSUES: Chain = Chain {
    field: "issues",
    paths: &["issues"],
};

const ROUTE_EFFICIENCY: Chain = Chain {
    field: "routeEfficiencyScore",
    paths: &["routeEfficiencyScore", "route_efficiency_score"],
};

const DIVERSITY: Chain = Chain {
    field: "diversityScore",
    paths: &["diversityScore", "diversity_score"],
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VerificationShape<'a> {
    Canonical {
        feasibility: Option<&'a Value>,
        quality: Option<&'a Value>,
    },
    Nested {
        feasibility: &'a Value,
        quality: Option<&'a Value>,
    },
    Flat {
        verification: &'a Value,
        review: Option<&'a Value>,
    },
    Missing,
}

impl<'a> VerificationShape<'a> {
    pub fn detect(doc: &'a Value) -> Self {
        let verification = lookup(doc, "verification").filter(|v| v.is_object());
        let quality_verification = lookup(doc, "qualityVerification").filter(|v| v.is_object());

        if quality_verification.is_some()
            || verification.and_then(|v| lookup(v, "isFeasible")).is_some()
        {
            return VerificationShape::Canonical {
                feasibility: verification,
                quality: quality_verification,
            };
        }

        if let Some(verification) = verification {
            if let Some(feasibility) = lookup(verification, "feasibility") {
                return VerificationShape::Nested {
                    feasibility,
                    quality: lookup(verification, "quality"),
                };
            }
            if lookup(verification, "passed").is_some() {
                return VerificationShape::Flat {
                    verification,
                    review: lookup(doc, "ai_quality_review"),
                };
            }
        }

        // Some releases put the feasibility block at the top level.
        if let Some(feasibility) = lookup(doc, "feasibility") {
            return VerificationShape::Nested {
                feasibility,
                quality: verification.and_then(|v| lookup(v, "quality")),
            };
        }

        VerificationShape::Missing
    }

    pub fn reconcile(self, matching: &MatchingSummary) -> (Verification, QualityVerification) {
        match self {
            VerificationShape::Canonical {
                feasibility,
                quality,
            } => convert_blocks(feasibility, quality, matching),
            VerificationShape::Nested {
                feasibility,
                quality,
            } => convert_blocks(Some(feasibility), quality, matching),
            VerificationShape::Flat {
                verification,
                review,
            } => convert_flat(verification, review, matching),
            VerificationShape::Missing => convert_blocks(None, None, matching),
        }
    }
}

/// Detect the verification shape of `doc` and convert it.
pub fn reconcile(doc: &Value, matching: &MatchingSummary) -> (Verification, QualityVerification) {
    VerificationShape::detect(doc).reconcile(matching)
}

fn convert_blocks(
    feasibility: Option<&Value>,
    quality: Option<&Value>,
    matching: &MatchingSummary,
) -> (Verification, QualityVerification) {
    let verification = match feasibility {
        Some(block) => Verification {
            is_feasible: IS_FEASIBLE.first(block),
            score: FEASIBILITY_SCORE
                .first(block)
                .unwrap_or_else(ScoreValue::not_available),
            checks: checks(block),
            warnings: string_list(WARNINGS.value(block)),
        },
        None => Verification::default(),
    };

    let quality = quality_from_review(quality, None, matching);
    (verification, quality)
}

fn convert_flat(
    verification: &Value,
    review: Option<&Value>,
    matching: &MatchingSummary,
) -> (Verification, QualityVerification) {
    let ai_quality_pass = lookup(verification, "ai_quality_pass").and_then(bool::from_json);
    let score = if ai_quality_pass.unwrap_or(false) {
        "Pass"
    } else {
        "Fail"
    };

    let feasibility = Verification {
        is_feasible: lookup(verification, "passed").and_then(bool::from_json),
        score: ScoreValue::Label(score.to_string()),
        checks: checks(verification),
        warnings: string_list(WARNINGS.value(verification)),
    };

    // The flat shape carries no match rate of its own
    let mut quality = quality_from_review(review, ai_quality_pass, matching);
    quality.match_rate = matching.match_rate.clone();
    (feasibility, quality)
}

fn quality_from_review(
    review: Option<&Value>,
    fallback_pass: Option<bool>,
    matching: &MatchingSummary,
) -> QualityVerification {
    let empty = Value::Null;
    let review = review.unwrap_or(&empty);

    QualityVerification {
        passes_quality: PASSES_QUALITY.first(review).or(fallback_pass),
        quality_score: QUALITY_SCORE
            .first(review)
            .unwrap_or_else(ScoreValue::not_available),
        match_rate: QUALITY_MATCH_RATE
            .first::<Percentage>(review)
            .map(|rate| rate.0)
            .unwrap_or_else(|| matching.match_rate.clone()),
        overall_quality: OVERALL_QUALITY.first(review).unwrap_or_default(),
        issues: string_list(ISSUES.value(review)),
        route_efficiency_score: ROUTE_EFFICIENCY.first(review),
        diversity_score: DIVERSITY.first(review),
    }
}

fn checks(block: &Value) -> Vec<Value> {
    CHECKS.array(block).map(<[Value]>::to_vec).unwrap_or_default()
}
