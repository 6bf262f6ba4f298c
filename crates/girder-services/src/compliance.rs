//! Compliance scorecard engine.
//!
//! Reduces independently fetched record sets (already scoped to one
//! organization) into a rule-based scorecard. Pure function: no side effects,
//! nothing persisted, recomputed on demand.
//!
//! Rules run in a fixed order. Aggregate rules (safety, critical issues,
//! overdue tasks, checklists) always emit exactly one finding; entity-scoped
//! and advisory rules (budget, worker contact, project planning) emit zero or
//! more, so only the findings actually produced enter the score denominator.

use girder_core::models::{
    Inspection, InspectionStatus, Issue, IssueSeverity, IssueStatus, Project, ProjectStatus,
    SafetyIncident, Task, Worker,
};
use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Fail,
    Warning,
    Pass,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// One row of the compliance scorecard.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Finding {
    pub category: &'static str,
    pub rule: &'static str,
    pub status: CheckStatus,
    pub severity: Severity,
    pub details: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ComplianceReport {
    /// Findings sorted for display: fail, then warning, then pass; insertion
    /// order within each band.
    pub findings: Vec<Finding>,
    pub pass_count: usize,
    pub total_findings: usize,
    /// `round(100 * pass / total)`; 100 when no findings were produced.
    pub score: u8,
}

/// Record slices the engine evaluates, all pre-scoped to one organization.
#[derive(Debug, Clone, Copy)]
pub struct ComplianceInputs<'a> {
    pub projects: &'a [Project],
    pub tasks: &'a [Task],
    pub issues: &'a [Issue],
    pub incidents: &'a [SafetyIncident],
    pub inspections: &'a [Inspection],
    pub workers: &'a [Worker],
}

pub fn evaluate_compliance(inputs: ComplianceInputs<'_>, today: NaiveDate) -> ComplianceReport {
    let mut findings = Vec::new();

    budget_rule(inputs.projects, &mut findings);
    safety_rule(inputs.incidents, &mut findings);
    critical_issues_rule(inputs.issues, &mut findings);
    overdue_tasks_rule(inputs.tasks, today, &mut findings);
    checklist_rule(inputs.inspections, &mut findings);
    worker_contact_rule(inputs.workers, &mut findings);
    project_planning_rule(inputs.projects, &mut findings);

    // Stable sort keeps insertion order within each status band.
    findings.sort_by_key(|f| f.status);

    let total_findings = findings.len();
    let pass_count = findings
        .iter()
        .filter(|f| f.status == CheckStatus::Pass)
        .count();
    let score = if total_findings == 0 {
        100
    } else {
        ((100.0 * pass_count as f64 / total_findings as f64).round()) as u8
    };

    ComplianceReport {
        findings,
        pass_count,
        total_findings,
        score,
    }
}

fn round_percent(numerator: Decimal, denominator: Decimal) -> i64 {
    (numerator * Decimal::from(100) / denominator)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(0)
}

/// Rule 1: per-project budget check. Projects without a budget are exempt.
fn budget_rule(projects: &[Project], findings: &mut Vec<Finding>) {
    for project in projects {
        if project.budget <= Decimal::ZERO {
            continue;
        }

        if project.spent > project.budget {
            let over = round_percent(project.spent - project.budget, project.budget);
            findings.push(Finding {
                category: "budget",
                rule: "budget_overrun",
                status: CheckStatus::Fail,
                severity: Severity::Critical,
                details: format!("Project \"{}\" is {}% over budget", project.name, over),
            });
        } else if project.spent > project.budget * Decimal::new(9, 1) {
            let used = round_percent(project.spent, project.budget);
            findings.push(Finding {
                category: "budget",
                rule: "budget_nearly_exhausted",
                status: CheckStatus::Warning,
                severity: Severity::High,
                details: format!("Project \"{}\" has used {}% of its budget", project.name, used),
            });
        }
    }
}

/// Rule 2: one aggregate finding for unresolved safety incidents.
fn safety_rule(incidents: &[SafetyIncident], findings: &mut Vec<Finding>) {
    let unresolved = incidents.iter().filter(|i| i.status.is_unresolved()).count();

    if unresolved > 0 {
        findings.push(Finding {
            category: "safety",
            rule: "open_safety_incidents",
            status: CheckStatus::Fail,
            severity: Severity::Critical,
            details: format!("{} safety incident(s) open or under investigation", unresolved),
        });
    } else {
        findings.push(Finding {
            category: "safety",
            rule: "open_safety_incidents",
            status: CheckStatus::Pass,
            severity: Severity::Low,
            details: "No open safety incidents".to_string(),
        });
    }
}

/// Rule 3: one aggregate finding for unclosed critical issues.
fn critical_issues_rule(issues: &[Issue], findings: &mut Vec<Finding>) {
    let open_critical = issues
        .iter()
        .filter(|i| i.severity == IssueSeverity::Critical && i.status != IssueStatus::Closed)
        .count();

    if open_critical > 0 {
        findings.push(Finding {
            category: "issues",
            rule: "critical_issues_open",
            status: CheckStatus::Fail,
            severity: Severity::Critical,
            details: format!("{} critical issue(s) not closed", open_critical),
        });
    } else {
        findings.push(Finding {
            category: "issues",
            rule: "critical_issues_open",
            status: CheckStatus::Pass,
            severity: Severity::Low,
            details: "No open critical issues".to_string(),
        });
    }
}

/// Rule 4: overdue-task ratio. An empty task set passes outright (locked-in
/// policy; the ratio comparison is never evaluated against zero tasks).
fn overdue_tasks_rule(tasks: &[Task], today: NaiveDate, findings: &mut Vec<Finding>) {
    if tasks.is_empty() {
        findings.push(Finding {
            category: "schedule",
            rule: "overdue_tasks",
            status: CheckStatus::Pass,
            severity: Severity::Low,
            details: "No tasks recorded".to_string(),
        });
        return;
    }

    let overdue = tasks.iter().filter(|t| t.is_overdue(today)).count();

    // overdue/total > 20%, in integer arithmetic
    if overdue * 5 > tasks.len() {
        findings.push(Finding {
            category: "schedule",
            rule: "overdue_tasks",
            status: CheckStatus::Fail,
            severity: Severity::High,
            details: format!("{} of {} tasks are overdue", overdue, tasks.len()),
        });
    } else if overdue > 0 {
        findings.push(Finding {
            category: "schedule",
            rule: "overdue_tasks",
            status: CheckStatus::Warning,
            severity: Severity::Medium,
            details: format!("{} of {} tasks are overdue", overdue, tasks.len()),
        });
    } else {
        findings.push(Finding {
            category: "schedule",
            rule: "overdue_tasks",
            status: CheckStatus::Pass,
            severity: Severity::Low,
            details: "No overdue tasks".to_string(),
        });
    }
}

/// Rule 5: one aggregate finding for incomplete checklist inspections.
fn checklist_rule(inspections: &[Inspection], findings: &mut Vec<Finding>) {
    let incomplete = inspections
        .iter()
        .filter(|i| i.status != InspectionStatus::Completed)
        .count();

    if incomplete > 0 {
        findings.push(Finding {
            category: "checklists",
            rule: "incomplete_inspections",
            status: CheckStatus::Warning,
            severity: Severity::Medium,
            details: format!("{} inspection(s) not completed", incomplete),
        });
    } else {
        findings.push(Finding {
            category: "checklists",
            rule: "incomplete_inspections",
            status: CheckStatus::Pass,
            severity: Severity::Low,
            details: "All inspections completed".to_string(),
        });
    }
}

/// Rule 6: advisory; emits only when an active worker has no phone on file.
fn worker_contact_rule(workers: &[Worker], findings: &mut Vec<Finding>) {
    let missing = workers
        .iter()
        .filter(|w| w.active && w.phone.as_deref().map_or(true, |p| p.trim().is_empty()))
        .count();

    if missing > 0 {
        findings.push(Finding {
            category: "labour",
            rule: "missing_worker_contact",
            status: CheckStatus::Warning,
            severity: Severity::Low,
            details: format!("{} active worker(s) have no phone number", missing),
        });
    }
}

/// Rule 7: advisory; emits only when an active project has no end date.
fn project_planning_rule(projects: &[Project], findings: &mut Vec<Finding>) {
    let unplanned = projects
        .iter()
        .filter(|p| p.status == ProjectStatus::Active && p.end_date.is_none())
        .count();

    if unplanned > 0 {
        findings.push(Finding {
            category: "planning",
            rule: "missing_project_end_date",
            status: CheckStatus::Warning,
            severity: Severity::Low,
            details: format!("{} active project(s) have no end date", unplanned),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use girder_core::models::{IncidentStatus, TaskStatus};
    use uuid::Uuid;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn project(budget: i64, spent: i64) -> Project {
        Project {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            name: "Tower A".to_string(),
            status: ProjectStatus::Active,
            budget: Decimal::from(budget),
            spent: Decimal::from(spent),
            start_date: None,
            end_date: Some(today()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn task(status: TaskStatus, due: Option<NaiveDate>) -> Task {
        Task {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            title: "Slab casting".to_string(),
            status,
            due_date: due,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn empty<'a>() -> ComplianceInputs<'a> {
        ComplianceInputs {
            projects: &[],
            tasks: &[],
            issues: &[],
            incidents: &[],
            inspections: &[],
            workers: &[],
        }
    }

    fn budget_findings(projects: &[Project]) -> Vec<Finding> {
        let mut findings = Vec::new();
        budget_rule(projects, &mut findings);
        findings
    }

    #[test]
    fn budget_overrun_fails_with_percentage() {
        let findings = budget_findings(&[project(100_000, 150_000)]);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].status, CheckStatus::Fail);
        assert_eq!(findings[0].severity, Severity::Critical);
        assert!(findings[0].details.contains("50%"));
    }

    #[test]
    fn budget_nearly_exhausted_warns_with_percentage() {
        let findings = budget_findings(&[project(100_000, 95_000)]);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].status, CheckStatus::Warning);
        assert_eq!(findings[0].severity, Severity::High);
        assert!(findings[0].details.contains("95%"));
    }

    #[test]
    fn healthy_budget_produces_no_finding() {
        assert!(budget_findings(&[project(100_000, 50_000)]).is_empty());
    }

    #[test]
    fn zero_budget_is_exempt() {
        assert!(budget_findings(&[project(0, 10_000)]).is_empty());
    }

    #[test]
    fn overdue_tasks_rule_empty_set_passes() {
        let report = evaluate_compliance(empty(), today());
        let schedule = report
            .findings
            .iter()
            .find(|f| f.rule == "overdue_tasks")
            .unwrap();
        assert_eq!(schedule.status, CheckStatus::Pass);
    }

    #[test]
    fn overdue_ratio_above_twenty_percent_fails() {
        let overdue_date = Some(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        let tasks = vec![
            task(TaskStatus::Todo, overdue_date),
            task(TaskStatus::Todo, None),
            task(TaskStatus::Todo, None),
            task(TaskStatus::Todo, None),
        ];
        let mut findings = Vec::new();
        overdue_tasks_rule(&tasks, today(), &mut findings);
        assert_eq!(findings[0].status, CheckStatus::Fail);
        assert_eq!(findings[0].severity, Severity::High);
    }

    #[test]
    fn single_overdue_below_threshold_warns() {
        let overdue_date = Some(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        let mut tasks = vec![task(TaskStatus::Todo, overdue_date)];
        for _ in 0..9 {
            tasks.push(task(TaskStatus::Todo, None));
        }
        let mut findings = Vec::new();
        overdue_tasks_rule(&tasks, today(), &mut findings);
        assert_eq!(findings[0].status, CheckStatus::Warning);
        assert_eq!(findings[0].severity, Severity::Medium);
    }

    #[test]
    fn completed_overdue_tasks_do_not_count() {
        let overdue_date = Some(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        let tasks = vec![task(TaskStatus::Completed, overdue_date)];
        let mut findings = Vec::new();
        overdue_tasks_rule(&tasks, today(), &mut findings);
        assert_eq!(findings[0].status, CheckStatus::Pass);
    }

    #[test]
    fn open_incident_fails_safety_rule() {
        let incident = SafetyIncident {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            description: "Scaffold collapse near gate 2".to_string(),
            status: IncidentStatus::Investigating,
            occurred_on: today(),
            created_at: Utc::now(),
        };
        let inputs = ComplianceInputs {
            incidents: std::slice::from_ref(&incident),
            ..empty()
        };
        let report = evaluate_compliance(inputs, today());
        let safety = report
            .findings
            .iter()
            .find(|f| f.rule == "open_safety_incidents")
            .unwrap();
        assert_eq!(safety.status, CheckStatus::Fail);
        assert!(safety.details.contains('1'));
    }

    #[test]
    fn findings_sorted_fail_warning_pass() {
        let projects = vec![project(100_000, 95_000)];
        let incident = SafetyIncident {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            description: "Unfenced excavation".to_string(),
            status: IncidentStatus::Open,
            occurred_on: today(),
            created_at: Utc::now(),
        };
        let inputs = ComplianceInputs {
            projects: &projects,
            incidents: std::slice::from_ref(&incident),
            ..empty()
        };
        let report = evaluate_compliance(inputs, today());

        let statuses: Vec<CheckStatus> = report.findings.iter().map(|f| f.status).collect();
        let mut sorted = statuses.clone();
        sorted.sort();
        assert_eq!(statuses, sorted, "fail must sort before warning before pass");
        assert_eq!(report.findings[0].status, CheckStatus::Fail);
    }

    #[test]
    fn score_is_pass_ratio() {
        // Empty inputs: rules 2,3,4,5 each pass, rules 1,6,7 emit nothing.
        let report = evaluate_compliance(empty(), today());
        assert_eq!(report.total_findings, 4);
        assert_eq!(report.pass_count, 4);
        assert_eq!(report.score, 100);
    }

    #[test]
    fn score_rounds_to_nearest() {
        let incident = SafetyIncident {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            description: "Missing harness".to_string(),
            status: IncidentStatus::Open,
            occurred_on: today(),
            created_at: Utc::now(),
        };
        let inputs = ComplianceInputs {
            incidents: std::slice::from_ref(&incident),
            ..empty()
        };
        // 3 of 4 findings pass -> 75
        let report = evaluate_compliance(inputs, today());
        assert_eq!(report.score, 75);
    }
}
