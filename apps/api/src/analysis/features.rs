//! Feature extractors: skills, years of experience, education. Pure functions over text.

use std::collections::HashSet;

use crate::analysis::rules::RuleSet;

pub const MAX_SKILLS: usize = 20;
const MAX_EDUCATION: usize = 3;
const MAX_EXPERIENCE_YEARS: u32 = 30;
const MAX_INFERRED_YEARS: u32 = 20;
const DEFAULT_EXPERIENCE_YEARS: u32 = 2;

pub const EDUCATION_NOT_SPECIFIED: &str = "Not specified";

/// Detected skills in first-seen order (group order, then position), deduplicated after
/// normalization. At most `MAX_SKILLS`.
pub fn extract_skills(rules: &RuleSet, text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut skills = Vec::new();

    for pattern in &rules.skill_patterns {
        for m in pattern.find_iter(text) {
            let skill = normalize_skill(m.as_str());
            if seen.insert(skill.clone()) {
                skills.push(skill);
                if skills.len() == MAX_SKILLS {
                    return skills;
                }
            }
        }
    }
    skills
}

/// Short tokens are treated as acronyms (`aws` → `AWS`); longer ones are titlecased.
pub fn normalize_skill(raw: &str) -> String {
    if raw.chars().count() > 3 {
        title_case(raw)
    } else {
        raw.to_uppercase()
    }
}

/// Uppercases the first letter of every alphabetic run and lowercases the rest,
/// e.g. `node.js` → `Node.Js`, `ci/cd` → `Ci/Cd`.
fn title_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_word = false;
    for c in raw.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// Estimated years of experience, always within `[1, 30]`.
///
/// 1. An explicit phrase ("5+ years of experience", "Experience: 7 years") wins, capped at 30.
/// 2. Otherwise the span between the earliest and latest `20xx` year, clamped to `[1, 20]`.
/// 3. Otherwise 2.
pub fn estimate_experience(rules: &RuleSet, text: &str) -> u32 {
    for pattern in &rules.experience_patterns {
        if let Some(years) = pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| parse_saturating(m.as_str()))
        {
            return years.clamp(1, MAX_EXPERIENCE_YEARS);
        }
    }

    let years: Vec<u32> = rules
        .year_pattern
        .find_iter(text)
        .filter_map(|m| m.as_str().parse().ok())
        .collect();

    if years.len() >= 2 {
        let earliest = years.iter().min().copied().unwrap_or_default();
        let latest = years.iter().max().copied().unwrap_or_default();
        return (latest - earliest).clamp(1, MAX_INFERRED_YEARS);
    }

    DEFAULT_EXPERIENCE_YEARS
}

/// Degree and institution mentions, at most three; `["Not specified"]` when none are found.
pub fn extract_education(rules: &RuleSet, text: &str) -> Vec<String> {
    let mut education = Vec::new();

    for pattern in &rules.education_patterns {
        for caps in pattern.captures_iter(text).take(MAX_EDUCATION) {
            let display = if caps.len() > 1 {
                caps.iter()
                    .skip(1)
                    .flatten()
                    .map(|m| m.as_str().trim())
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
                    .join(" ")
            } else {
                caps[0].trim().to_string()
            };
            if !display.is_empty() {
                education.push(display);
            }
        }
    }

    if education.is_empty() {
        return vec![EDUCATION_NOT_SPECIFIED.to_string()];
    }
    education.truncate(MAX_EDUCATION);
    education
}

pub fn has_education(education: &[String]) -> bool {
    education
        .first()
        .is_some_and(|first| first != EDUCATION_NOT_SPECIFIED)
}

/// Digit strings too long for `u32` saturate instead of failing.
pub(crate) fn parse_saturating(digits: &str) -> u32 {
    digits.parse().unwrap_or(u32::MAX)
}
