//! Project list exchange format: `• Advisor Online [Evolution] [AO107] - (2024-02-06-NO ENDING)`.
//! The name is everything before the last ` [`, the slug sits between it and `] - (`.

use crate::tracking::entities::Project;

const BULLET: &str = "• ";
const SLUG_END: &str = "] - (";
const SLUG_START: &str = " [";

/// Recovers projects from pasted text. Browsers sometimes turn newlines into spaces, so records
/// are delimited by bullets rather than lines. Records that don't parse are skipped.
pub fn parse_projects(text: &str) -> Vec<Project> {
    text.replace('\n', " ")
        .replace(BULLET, "\n")
        .split('\n')
        .filter(|v| !v.is_empty())
        .map(|v| format!("{BULLET}{v}").trim().to_owned())
        .filter_map(|line| parse_project_line(&line))
        .collect()
}

fn parse_project_line(line: &str) -> Option<Project> {
    let line = line.trim();
    let without_suffix = line.rsplit_once(SLUG_END).map_or(line, |(v, _)| v).trim();
    let record = without_suffix
        .split_once(BULLET)
        .map_or(without_suffix, |(_, v)| v)
        .trim();
    let (name, slug) = record.rsplit_once(SLUG_START)?;
    let (name, slug) = (name.trim(), slug.trim());
    if name.is_empty() || slug.is_empty() {
        return None;
    }
    Some(Project::new(name, slug))
}

/// Renders projects so that [parse_projects] reads them back.
pub fn projects_to_import_text(projects: &[Project]) -> String {
    projects
        .iter()
        .map(|p| format!("{BULLET}{} [{}{SLUG_END}NO ENDING)", p.name, p.slug))
        .collect::<Vec<_>>()
        .join("\n")
}
