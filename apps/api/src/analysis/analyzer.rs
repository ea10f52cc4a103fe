//! Resume analysis — feature extraction plus fixed-rule scoring and canned feedback.

use serde::{Deserialize, Serialize};

use crate::analysis::features::{
    estimate_experience, extract_education, extract_skills, has_education,
};
use crate::analysis::rules::RuleSet;

const BASE_SCORE: u32 = 50;
const STRONG_CANDIDATE_SCORE: u32 = 70;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub skills: Vec<String>,
    pub experience_years: u32,
    pub education: Vec<String>,
    pub strengths: Vec<String>,
    pub gaps: Vec<String>,
    pub improvements: Vec<String>,
    pub overall_score: u32,
    pub summary: String,
}

/// Analyzes resume text. Callers are responsible for rejecting input that is too short.
pub fn analyze(rules: &RuleSet, text: &str) -> AnalysisResult {
    let skills = extract_skills(rules, text);
    let experience_years = estimate_experience(rules, text);
    let education = extract_education(rules, text);
    let length = text.chars().count();

    let score = compute_score(skills.len(), experience_years, has_education(&education), length);

    let mut strengths = Vec::new();
    let mut gaps = Vec::new();
    let mut improvements = Vec::new();

    if skills.len() >= 5 {
        strengths.push("Strong technical skill set".to_string());
    } else {
        gaps.push("Limited technical skills listed".to_string());
        improvements.push("Add more specific technical skills with proficiency levels".to_string());
    }

    if experience_years >= 3 {
        strengths.push(format!("Solid {experience_years} years of experience"));
    } else {
        improvements
            .push("Emphasize projects and achievements to compensate for experience".to_string());
    }

    if rules.leadership_pattern.is_match(text) {
        strengths.push("Leadership experience indicated".to_string());
    } else {
        gaps.push("No leadership experience mentioned".to_string());
        improvements.push("Highlight any team leadership or mentoring experience".to_string());
    }

    let lower = text.to_lowercase();
    if rules.achievement_verbs.iter().any(|verb| lower.contains(verb.as_str())) {
        strengths.push("Good use of action verbs and metrics".to_string());
    } else {
        gaps.push("Lacks quantifiable achievements".to_string());
        improvements
            .push("Add metrics: 'Increased X by Y%' or 'Reduced Z by N hours'".to_string());
    }

    if length < 300 {
        gaps.push("Resume appears too short".to_string());
        improvements
            .push("Expand with more details about responsibilities and achievements".to_string());
    }

    let closing = if score >= STRONG_CANDIDATE_SCORE {
        "Strong candidate for mid-senior roles."
    } else {
        "Good foundation, room for improvement."
    };
    let summary = format!(
        "Resume shows {experience_years} years of experience with {} key skills. {closing}",
        skills.len()
    );

    AnalysisResult {
        skills,
        experience_years,
        education,
        strengths: or_default(strengths, "Good foundation"),
        gaps: or_default(gaps, "None identified"),
        improvements: or_default(improvements, "Continue building experience"),
        overall_score: score,
        summary,
    }
}

/// 50 base, up to +20 for skills, up to +15 for experience, +5 each for education and
/// length above 500 and 1500 characters. Capped at 100.
fn compute_score(skill_count: usize, experience_years: u32, education: bool, length: usize) -> u32 {
    let skill_points = (skill_count as u32).saturating_mul(3).min(20);
    let experience_points = experience_years.saturating_mul(2).min(15);
    let education_points = if education { 5 } else { 0 };
    let length_points = match length {
        l if l > 1500 => 10,
        l if l > 500 => 5,
        _ => 0,
    };

    (BASE_SCORE + skill_points + experience_points + education_points + length_points).min(100)
}

fn or_default(items: Vec<String>, fallback: &str) -> Vec<String> {
    if items.is_empty() {
        vec![fallback.to_string()]
    } else {
        items
    }
}
