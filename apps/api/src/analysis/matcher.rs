//! Resume-to-job matching by skill keyword overlap, adjusted for required experience.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::analysis::features::{
    estimate_experience, extract_skills, normalize_skill, parse_saturating,
};
use crate::analysis::rules::RuleSet;

const NO_SKILLS_FIT_SCORE: i64 = 50;
const EXPERIENCE_ADJUSTMENT: i64 = 10;
const MAX_MISSING_SKILLS: usize = 10;
const MAX_RECOMMENDED_SKILLS: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub fit_score: u32,
    pub matching_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub recommendations: Vec<String>,
    pub verdict: String,
}

/// Scores how well a resume covers a job description's skills.
///
/// fit = round(100 × |resume ∩ job| / |job|), or 50 when the job lists no known skills.
/// If the job asks for "N years", ±10 depending on whether the resume meets it. Clamped to
/// `[0, 100]`.
pub fn match_resume(rules: &RuleSet, resume: &str, job_description: &str) -> MatchResult {
    let resume_skills = folded_skills(rules, resume);
    let job_skills = folded_skills(rules, job_description);

    let matching: Vec<&String> = job_skills.intersection(&resume_skills).collect();
    let missing: Vec<&String> = job_skills.difference(&resume_skills).collect();

    let mut fit_score = if job_skills.is_empty() {
        NO_SKILLS_FIT_SCORE
    } else {
        (100.0 * matching.len() as f64 / job_skills.len() as f64).round() as i64
    };

    if let Some(required_years) = required_experience(rules, job_description) {
        if estimate_experience(rules, resume) >= required_years {
            fit_score += EXPERIENCE_ADJUSTMENT;
        } else {
            fit_score -= EXPERIENCE_ADJUSTMENT;
        }
    }
    let fit_score = fit_score.clamp(0, 100) as u32;

    let matching_skills: Vec<String> = matching.iter().map(|s| normalize_skill(s)).collect();
    let missing_skills: Vec<String> = missing
        .iter()
        .take(MAX_MISSING_SKILLS)
        .map(|s| normalize_skill(s))
        .collect();

    let recommendations = build_recommendations(fit_score, &missing_skills);

    MatchResult {
        fit_score,
        matching_skills,
        missing_skills,
        recommendations,
        verdict: verdict(fit_score).to_string(),
    }
}

fn folded_skills(rules: &RuleSet, text: &str) -> BTreeSet<String> {
    extract_skills(rules, text)
        .into_iter()
        .map(|s| s.to_lowercase())
        .collect()
}

/// The first "N years" mentioned in the job description.
fn required_experience(rules: &RuleSet, job_description: &str) -> Option<u32> {
    rules
        .job_years_pattern
        .captures(job_description)
        .and_then(|caps| caps.get(1))
        .map(|m| parse_saturating(m.as_str()))
}

fn build_recommendations(fit_score: u32, missing_skills: &[String]) -> Vec<String> {
    let mut recommendations = Vec::new();

    if !missing_skills.is_empty() {
        let top: Vec<&str> = missing_skills
            .iter()
            .take(MAX_RECOMMENDED_SKILLS)
            .map(String::as_str)
            .collect();
        recommendations.push(format!(
            "Consider gaining experience in: {}",
            top.join(", ")
        ));
    }
    if fit_score < 50 {
        recommendations.push("This role may require skills you don't have yet".to_string());
    }
    if fit_score >= 70 {
        recommendations.push("Customize your resume to emphasize matching skills".to_string());
    }

    if recommendations.is_empty() {
        recommendations.push("Tailor your application to the specific role".to_string());
    }
    recommendations
}

fn verdict(fit_score: u32) -> &'static str {
    match fit_score {
        s if s >= 80 => "Excellent match! Apply with confidence.",
        s if s >= 60 => "Good match. Highlight relevant experience in your application.",
        s if s >= 40 => "Moderate match. Consider upskilling or emphasizing transferable skills.",
        _ => "Low match. This role may require significant skill development.",
    }
}
