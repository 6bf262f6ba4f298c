//! Daily progress digest.
//!
//! A point-in-time rollup for one organization and one date, optionally
//! narrowed to a single project. Like the compliance engine it is a pure
//! reduction over already-fetched slices and is recomputed per request.

use std::collections::HashMap;

use chrono::NaiveDate;
use girder_core::models::{
    AttendanceRecord, AttendanceStatus, Issue, IssueStatus, Task, TaskStatus, Worker,
};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::payroll::attendance_pay;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DailyProgressSummary {
    pub date: NaiveDate,
    pub project_id: Option<Uuid>,
    pub tasks_in_progress: usize,
    pub tasks_completed_today: usize,
    pub tasks_blocked: usize,
    pub open_issues: usize,
    pub workers_on_site: usize,
    /// Net labour cost for the date's attendance, deductions applied.
    pub labour_cost: Decimal,
}

/// Build the digest for `date`. Task and issue slices are narrowed to
/// `project_id` when given; attendance is organization-wide either way, since
/// the labour roster is not project-scoped.
pub fn daily_progress(
    date: NaiveDate,
    project_id: Option<Uuid>,
    tasks: &[Task],
    issues: &[Issue],
    workers: &[Worker],
    attendance: &[AttendanceRecord],
) -> DailyProgressSummary {
    let in_scope = |record_project: Uuid| project_id.map_or(true, |p| p == record_project);

    let mut tasks_in_progress = 0;
    let mut tasks_completed_today = 0;
    let mut tasks_blocked = 0;
    for task in tasks.iter().filter(|t| in_scope(t.project_id)) {
        match task.status {
            TaskStatus::InProgress => tasks_in_progress += 1,
            TaskStatus::Blocked => tasks_blocked += 1,
            TaskStatus::Completed if task.updated_at.date_naive() == date => {
                tasks_completed_today += 1
            }
            _ => {}
        }
    }

    let open_issues = issues
        .iter()
        .filter(|i| in_scope(i.project_id) && i.status != IssueStatus::Closed)
        .count();

    let rates: HashMap<Uuid, Option<Decimal>> =
        workers.iter().map(|w| (w.id, w.daily_rate)).collect();

    let mut workers_on_site = 0;
    let mut labour_cost = Decimal::ZERO;
    for record in attendance.iter().filter(|r| r.date == date) {
        if record.status != AttendanceStatus::Absent {
            workers_on_site += 1;
        }
        let rate = rates.get(&record.worker_id).copied().flatten();
        labour_cost += attendance_pay(rate, record) - record.deduction;
    }

    DailyProgressSummary {
        date,
        project_id,
        tasks_in_progress,
        tasks_completed_today,
        tasks_blocked,
        open_issues,
        workers_on_site,
        labour_cost,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use girder_core::models::IssueSeverity;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    fn task(project_id: Uuid, status: TaskStatus, updated: NaiveDate) -> Task {
        let updated_at = Utc
            .from_utc_datetime(&updated.and_hms_opt(12, 0, 0).unwrap());
        Task {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            project_id,
            title: "Column shuttering".to_string(),
            status,
            due_date: None,
            created_at: updated_at,
            updated_at,
        }
    }

    fn issue(project_id: Uuid, status: IssueStatus) -> Issue {
        Issue {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            project_id,
            title: "Rebar shortage".to_string(),
            severity: IssueSeverity::Medium,
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn worker(rate: Option<i64>) -> Worker {
        Worker {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            name: "Ravi Kumar".to_string(),
            trade: Some("Mason".to_string()),
            daily_rate: rate.map(Decimal::from),
            contractor: None,
            phone: None,
            active: true,
            created_at: Utc::now(),
        }
    }

    fn record(worker_id: Uuid, status: AttendanceStatus, deduction: i64) -> AttendanceRecord {
        AttendanceRecord {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            worker_id,
            date: date(),
            status,
            overtime_hours: None,
            deduction: Decimal::from(deduction),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn counts_task_states_and_same_day_completions() {
        let project = Uuid::new_v4();
        let yesterday = NaiveDate::from_ymd_opt(2024, 6, 9).unwrap();
        let tasks = vec![
            task(project, TaskStatus::InProgress, date()),
            task(project, TaskStatus::Blocked, date()),
            task(project, TaskStatus::Completed, date()),
            task(project, TaskStatus::Completed, yesterday),
            task(project, TaskStatus::Todo, date()),
        ];

        let summary = daily_progress(date(), None, &tasks, &[], &[], &[]);
        assert_eq!(summary.tasks_in_progress, 1);
        assert_eq!(summary.tasks_blocked, 1);
        assert_eq!(summary.tasks_completed_today, 1);
    }

    #[test]
    fn project_filter_narrows_tasks_and_issues() {
        let mine = Uuid::new_v4();
        let other = Uuid::new_v4();
        let tasks = vec![
            task(mine, TaskStatus::InProgress, date()),
            task(other, TaskStatus::InProgress, date()),
        ];
        let issues = vec![issue(mine, IssueStatus::Open), issue(other, IssueStatus::Open)];

        let summary = daily_progress(date(), Some(mine), &tasks, &issues, &[], &[]);
        assert_eq!(summary.tasks_in_progress, 1);
        assert_eq!(summary.open_issues, 1);
    }

    #[test]
    fn closed_issues_are_not_open() {
        let project = Uuid::new_v4();
        let issues = vec![
            issue(project, IssueStatus::Open),
            issue(project, IssueStatus::InProgress),
            issue(project, IssueStatus::Closed),
        ];
        let summary = daily_progress(date(), None, &[], &issues, &[], &[]);
        assert_eq!(summary.open_issues, 2);
    }

    #[test]
    fn labour_cost_sums_net_pay_for_the_date() {
        let mason = worker(Some(800));
        let helper = worker(Some(500));
        let records = vec![
            record(mason.id, AttendanceStatus::Present, 50),
            record(helper.id, AttendanceStatus::HalfDay, 0),
            record(helper.id, AttendanceStatus::Absent, 0),
        ];
        let workers = vec![mason, helper];

        let summary = daily_progress(date(), None, &[], &[], &workers, &records);
        assert_eq!(summary.workers_on_site, 2);
        assert_eq!(summary.labour_cost, Decimal::from(1000));
    }

    #[test]
    fn unknown_worker_in_attendance_costs_nothing() {
        let records = vec![record(Uuid::new_v4(), AttendanceStatus::Present, 0)];
        let summary = daily_progress(date(), None, &[], &[], &[], &records);
        assert_eq!(summary.labour_cost, Decimal::ZERO);
        assert_eq!(summary.workers_on_site, 1);
    }
}
