//! Rule tables — the keyword lists and patterns that drive every extractor.
//!
//! The tables are plain data (`RuleTable`, JSON on disk). `RuleSet` is the compiled form
//! handed to the extractors; it is built once at startup and shared through `AppState`.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

const BUILTIN_RULES_JSON: &str = include_str!("../../rules/default_rules.json");

static BUILTIN_RULES: Lazy<Arc<RuleSet>> = Lazy::new(|| {
    let table: RuleTable =
        serde_json::from_str(BUILTIN_RULES_JSON).expect("built-in rule table is valid JSON");
    Arc::new(RuleSet::compile(table).expect("built-in rule table compiles"))
});

/// A named list of skill keywords, matched case-insensitively as whole words.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillGroup {
    pub name: String,
    pub keywords: Vec<String>,
}

/// Serialized rule table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleTable {
    pub skill_groups: Vec<SkillGroup>,
    /// Each match contributes one display string built from its capture groups.
    pub education_patterns: Vec<String>,
    /// Tried in order; capture group 1 must be the year count.
    pub experience_patterns: Vec<String>,
    pub year_pattern: String,
    /// Capture group 1 is the years a job description asks for.
    pub job_years_pattern: String,
    pub metric_pattern: String,
    pub leadership_pattern: String,
    pub achievement_verbs: Vec<String>,
    pub summary_keywords: Vec<String>,
}

/// Compiled rule table.
#[derive(Debug)]
pub struct RuleSet {
    pub(crate) skill_patterns: Vec<Regex>,
    pub(crate) education_patterns: Vec<Regex>,
    pub(crate) experience_patterns: Vec<Regex>,
    pub(crate) year_pattern: Regex,
    pub(crate) job_years_pattern: Regex,
    pub(crate) metric_pattern: Regex,
    pub(crate) leadership_pattern: Regex,
    /// Lowercased.
    pub(crate) achievement_verbs: Vec<String>,
    /// Lowercased.
    pub(crate) summary_keywords: Vec<String>,
}

impl RuleSet {
    /// The rule table embedded in the binary.
    pub fn builtin() -> Arc<RuleSet> {
        Arc::clone(&BUILTIN_RULES)
    }

    /// Reads and compiles a JSON rule table from disk.
    pub fn load(path: &Path) -> Result<RuleSet> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read rule table '{}'", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("Invalid rule table '{}'", path.display()))
    }

    pub fn from_json(raw: &str) -> Result<RuleSet> {
        let table: RuleTable = serde_json::from_str(raw).context("Rule table is not valid JSON")?;
        Self::compile(table)
    }

    pub fn compile(table: RuleTable) -> Result<RuleSet> {
        let skill_patterns = table
            .skill_groups
            .iter()
            .filter(|g| g.keywords.iter().any(|k| !k.trim().is_empty()))
            .map(compile_skill_group)
            .collect::<Result<Vec<_>>>()?;

        let education_patterns = table
            .education_patterns
            .iter()
            .map(String::as_str)
            .map(compile)
            .collect::<Result<Vec<_>>>()?;

        let experience_patterns = table
            .experience_patterns
            .iter()
            .map(String::as_str)
            .map(compile_with_capture)
            .collect::<Result<Vec<_>>>()?;

        Ok(RuleSet {
            skill_patterns,
            education_patterns,
            experience_patterns,
            year_pattern: compile(&table.year_pattern)?,
            job_years_pattern: compile_with_capture(&table.job_years_pattern)?,
            metric_pattern: compile(&table.metric_pattern)?,
            leadership_pattern: compile(&table.leadership_pattern)?,
            achievement_verbs: lowercase_all(&table.achievement_verbs),
            summary_keywords: lowercase_all(&table.summary_keywords),
        })
    }
}

/// One alternation per group. Keywords are literals; a trailing `\b` is only added when the
/// keyword ends in a word character, so `C++` and `C#` still match before whitespace.
fn compile_skill_group(group: &SkillGroup) -> Result<Regex> {
    let alternatives: Vec<String> = group
        .keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .map(|k| {
            let tail = match k.chars().last() {
                Some(c) if c.is_alphanumeric() || c == '_' => r"\b",
                _ => "",
            };
            format!(r"\b{}{tail}", regex::escape(k))
        })
        .collect();

    let pattern = format!("(?i)(?:{})", alternatives.join("|"));
    Regex::new(&pattern)
        .with_context(|| format!("Skill group '{}' produced an invalid pattern", group.name))
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).with_context(|| format!("Invalid pattern: {pattern}"))
}

fn compile_with_capture(pattern: &str) -> Result<Regex> {
    let re = compile(pattern)?;
    if re.captures_len() < 2 {
        bail!("Pattern must have a capture group for the year count: {pattern}");
    }
    Ok(re)
}

fn lowercase_all(words: &[String]) -> Vec<String> {
    words
        .iter()
        .map(|w| w.trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn builtin_table() -> RuleTable {
        serde_json::from_str(BUILTIN_RULES_JSON).unwrap()
    }

    #[test]
    fn test_builtin_rules_compile() {
        let rules = RuleSet::builtin();
        assert_eq!(rules.skill_patterns.len(), 7);
        assert_eq!(rules.education_patterns.len(), 2);
        assert_eq!(rules.experience_patterns.len(), 2);
    }

    #[test]
    fn test_skill_group_matches_symbol_terminated_keywords() {
        let group = SkillGroup {
            name: "languages".to_string(),
            keywords: vec!["C++".to_string(), "C#".to_string(), "Go".to_string()],
        };
        let re = compile_skill_group(&group).unwrap();
        let found: Vec<&str> = re.find_iter("c++ and C# then go").map(|m| m.as_str()).collect();
        assert_eq!(found, vec!["c++", "C#", "go"]);
        // whole words only
        assert!(!re.is_match("google"));
    }

    #[test]
    fn test_load_from_file() {
        let mut table = builtin_table();
        table.skill_groups = vec![SkillGroup {
            name: "only".to_string(),
            keywords: vec!["Zig".to_string()],
        }];
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string(&table).unwrap().as_bytes())
            .unwrap();

        let rules = RuleSet::load(file.path()).unwrap();
        assert_eq!(rules.skill_patterns.len(), 1);
        assert!(rules.skill_patterns[0].is_match("I write zig"));
    }

    #[test]
    fn test_invalid_regex_is_rejected() {
        let mut table = builtin_table();
        table.metric_pattern = "(unclosed".to_string();
        let err = RuleSet::compile(table).unwrap_err();
        assert!(err.to_string().contains("Invalid pattern"));
    }

    #[test]
    fn test_experience_pattern_without_capture_is_rejected() {
        let mut table = builtin_table();
        table.experience_patterns = vec![r"\d+ years".to_string()];
        assert!(RuleSet::compile(table).is_err());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = RuleSet::load(Path::new("/nonexistent/rules.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/rules.json"));
    }

    #[test]
    fn test_empty_skill_groups_are_skipped() {
        let mut table = builtin_table();
        table.skill_groups.push(SkillGroup {
            name: "empty".to_string(),
            keywords: vec![" ".to_string()],
        });
        let rules = RuleSet::compile(table).unwrap();
        assert_eq!(rules.skill_patterns.len(), 7);
    }
}
