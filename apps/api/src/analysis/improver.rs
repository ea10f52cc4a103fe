//! Improvement suggestions assembled from a fixed checklist.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::analysis::features::{estimate_experience, extract_skills};
use crate::analysis::rules::RuleSet;

const SUMMARY_SKILL_COUNT: usize = 5;

const ACTION_ITEMS: [&str; 5] = [
    "Review each bullet point - does it show impact?",
    "Add 2-3 metrics to your most recent role",
    "Ensure contact info and LinkedIn are current",
    "Get a peer review before applying",
    "Customize for each application",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub section: String,
    pub issue: String,
    pub fix: String,
    pub example: String,
}

impl Suggestion {
    fn new(
        section: impl Into<String>,
        issue: impl Into<String>,
        fix: impl Into<String>,
        example: impl Into<String>,
    ) -> Self {
        Self {
            section: section.into(),
            issue: issue.into(),
            fix: fix.into(),
            example: example.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImproveResult {
    pub suggestions: Vec<Suggestion>,
    pub rewritten_sections: BTreeMap<String, String>,
    pub action_items: Vec<String>,
    pub priority_order: Vec<String>,
}

/// Runs the checklist against a resume. A blank `target_role` is treated as absent.
pub fn improve(rules: &RuleSet, resume: &str, target_role: Option<&str>) -> ImproveResult {
    let mut suggestions = Vec::new();
    let mut rewritten_sections = BTreeMap::new();
    let mut priority_order = Vec::new();

    let skills = extract_skills(rules, resume);

    if !rules.metric_pattern.is_match(resume) {
        suggestions.push(Suggestion::new(
            "Achievements",
            "Lacks quantifiable metrics",
            "Add numbers: percentages, dollar amounts, time saved",
            "Instead of 'Improved performance' -> 'Improved API response time by 40%'",
        ));
        priority_order.push("Add metrics to achievements".to_string());
    }

    if resume.chars().count() < 500 {
        suggestions.push(Suggestion::new(
            "Overall",
            "Resume is too brief",
            "Expand each role with 3-5 bullet points",
            "Include: scope, actions, results for each position",
        ));
        priority_order.push("Expand content".to_string());
    }

    let lower = resume.to_lowercase();
    if !rules.summary_keywords.iter().any(|k| lower.contains(k.as_str())) {
        suggestions.push(Suggestion::new(
            "Summary",
            "Missing professional summary",
            "Add a 2-3 sentence summary at the top",
            "Results-driven software engineer with X years of experience in Y, specializing in Z.",
        ));
        rewritten_sections.insert(
            "summary".to_string(),
            synthesize_summary(estimate_experience(rules, resume), &skills),
        );
        priority_order.push("Add professional summary".to_string());
    }

    if skills.len() < 5 {
        suggestions.push(Suggestion::new(
            "Skills",
            "Skills section needs expansion",
            "List 10-15 relevant skills, organized by category",
            "Languages: Python, JavaScript | Frameworks: React, FastAPI | Tools: Docker, AWS",
        ));
        priority_order.push("Expand skills section".to_string());
    }

    if let Some(role) = target_role.map(str::trim).filter(|r| !r.is_empty()) {
        suggestions.push(Suggestion::new(
            "Targeting",
            format!("Optimize for {role}"),
            format!("Research common requirements for {role} and align your experience"),
            format!("Use keywords from {role} job postings in your bullet points"),
        ));
    }

    if suggestions.is_empty() {
        suggestions.push(Suggestion::new(
            "General",
            "Resume looks solid",
            "Keep it updated",
            "Review quarterly",
        ));
    }
    if priority_order.is_empty() {
        priority_order.push("Maintain current quality".to_string());
    }

    ImproveResult {
        suggestions,
        rewritten_sections,
        action_items: ACTION_ITEMS.iter().map(|s| s.to_string()).collect(),
        priority_order,
    }
}

fn synthesize_summary(experience_years: u32, skills: &[String]) -> String {
    let mut summary =
        format!("Results-driven professional with {experience_years} years of experience.");
    if !skills.is_empty() {
        let top: Vec<&str> = skills
            .iter()
            .take(SUMMARY_SKILL_COUNT)
            .map(String::as_str)
            .collect();
        summary.push_str(&format!(" Skilled in {}.", top.join(", ")));
    }
    summary.push_str(" Proven track record of delivering impactful solutions.");
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thin_resume_triggers_every_check() {
        let resume = "Engineer at Acme working on internal tools and customer support requests.";
        let result = improve(&RuleSet::builtin(), resume, None);
        let sections: Vec<&str> = result.suggestions.iter().map(|s| s.section.as_str()).collect();
        assert_eq!(sections, vec!["Achievements", "Overall", "Summary", "Skills"]);
        assert_eq!(
            result.priority_order,
            vec![
                "Add metrics to achievements",
                "Expand content",
                "Add professional summary",
                "Expand skills section",
            ]
        );
        assert_eq!(
            result.rewritten_sections["summary"],
            "Results-driven professional with 2 years of experience. \
             Proven track record of delivering impactful solutions."
        );
    }

    #[test]
    fn test_summary_rewrite_lists_top_five_skills() {
        let resume = "Python, Java, Rust, Go, Ruby, Swift developer since 2015 until 2021 at Acme.";
        let result = improve(&RuleSet::builtin(), resume, None);
        assert_eq!(
            result.rewritten_sections["summary"],
            "Results-driven professional with 6 years of experience. \
             Skilled in Python, Java, Rust, GO, Ruby. \
             Proven track record of delivering impactful solutions."
        );
    }

    #[test]
    fn test_polished_resume_gets_default_suggestion() {
        let paragraph = "Summary: platform engineer using Python, Rust, Docker, Kubernetes and \
                         AWS. Cut deploy time by 45% and saved $120000 per year.\n";
        let resume = paragraph.repeat(5);
        let result = improve(&RuleSet::builtin(), &resume, None);
        assert_eq!(
            result.suggestions,
            vec![Suggestion::new(
                "General",
                "Resume looks solid",
                "Keep it updated",
                "Review quarterly"
            )]
        );
        assert_eq!(result.priority_order, vec!["Maintain current quality"]);
        assert!(result.rewritten_sections.is_empty());
    }

    #[test]
    fn test_target_role_adds_targeting_suggestion() {
        let resume = "Objective: data engineer, increased pipeline speed 3x using Python and AWS.";
        let result = improve(&RuleSet::builtin(), resume, Some("Data Scientist"));
        let targeting = result
            .suggestions
            .iter()
            .find(|s| s.section == "Targeting")
            .unwrap();
        assert_eq!(targeting.issue, "Optimize for Data Scientist");
        assert!(!result.rewritten_sections.contains_key("summary"));
    }

    #[test]
    fn test_blank_target_role_is_ignored() {
        let resume = "Objective: data engineer, increased pipeline speed 3x using Python and AWS.";
        let result = improve(&RuleSet::builtin(), resume, Some("   "));
        assert!(result.suggestions.iter().all(|s| s.section != "Targeting"));
    }

    #[test]
    fn test_action_items_are_fixed() {
        let a = improve(&RuleSet::builtin(), "short resume text about nothing at all really", None);
        let b = improve(&RuleSet::builtin(), &"Summary 50% ".repeat(100), Some("CTO"));
        assert_eq!(a.action_items, b.action_items);
        assert_eq!(a.action_items.len(), 5);
    }
}
