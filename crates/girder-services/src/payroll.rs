//! Labour payroll calculation.
//!
//! Pay is derived from attendance, never stored: present earns the daily rate,
//! half day earns half, overtime earns the rate plus `overtime_hours / 8` of
//! the rate, absent earns nothing. Each record's deduction is then subtracted.
//! Missing daily rates and missing overtime hours count as zero.

use girder_core::models::{AttendanceRecord, AttendanceStatus};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PayrollSummary {
    pub gross_pay: Decimal,
    pub total_deductions: Decimal,
    pub net_pay: Decimal,
}

/// Gross pay for a single attendance record, before its deduction.
pub fn attendance_pay(daily_rate: Option<Decimal>, record: &AttendanceRecord) -> Decimal {
    let rate = daily_rate.unwrap_or(Decimal::ZERO);

    match record.status {
        AttendanceStatus::Present => rate,
        AttendanceStatus::HalfDay => rate / Decimal::from(2),
        AttendanceStatus::Overtime => {
            let hours = record.overtime_hours.unwrap_or(Decimal::ZERO);
            rate + hours * rate / Decimal::from(8)
        }
        AttendanceStatus::Absent => Decimal::ZERO,
    }
}

/// Summarize one worker's pay over a set of attendance records.
pub fn payroll_summary(daily_rate: Option<Decimal>, records: &[AttendanceRecord]) -> PayrollSummary {
    let mut gross_pay = Decimal::ZERO;
    let mut total_deductions = Decimal::ZERO;

    for record in records {
        gross_pay += attendance_pay(daily_rate, record);
        total_deductions += record.deduction;
    }

    PayrollSummary {
        gross_pay,
        total_deductions,
        net_pay: gross_pay - total_deductions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn record(status: AttendanceStatus, overtime: Option<i64>, deduction: i64) -> AttendanceRecord {
        AttendanceRecord {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            worker_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            status,
            overtime_hours: overtime.map(Decimal::from),
            deduction: Decimal::from(deduction),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn present_earns_daily_rate() {
        let pay = attendance_pay(Some(Decimal::from(800)), &record(AttendanceStatus::Present, None, 0));
        assert_eq!(pay, Decimal::from(800));
    }

    #[test]
    fn half_day_earns_half_rate() {
        let pay = attendance_pay(Some(Decimal::from(800)), &record(AttendanceStatus::HalfDay, None, 0));
        assert_eq!(pay, Decimal::from(400));
    }

    #[test]
    fn absent_earns_nothing() {
        let pay = attendance_pay(Some(Decimal::from(800)), &record(AttendanceStatus::Absent, None, 0));
        assert_eq!(pay, Decimal::ZERO);
    }

    #[test]
    fn overtime_adds_hourly_fraction_of_rate() {
        let pay = attendance_pay(
            Some(Decimal::from(800)),
            &record(AttendanceStatus::Overtime, Some(4), 0),
        );
        assert_eq!(pay, Decimal::from(1200));
    }

    #[test]
    fn missing_rate_is_zero_not_null() {
        let pay = attendance_pay(None, &record(AttendanceStatus::Overtime, Some(4), 0));
        assert_eq!(pay, Decimal::ZERO);
    }

    #[test]
    fn missing_overtime_hours_is_zero() {
        let pay = attendance_pay(
            Some(Decimal::from(800)),
            &record(AttendanceStatus::Overtime, None, 0),
        );
        assert_eq!(pay, Decimal::from(800));
    }

    #[test]
    fn summary_present_plus_overtime_with_deduction() {
        // Rate 800: one present day plus one 4h-overtime day, 50 deducted.
        let records = vec![
            record(AttendanceStatus::Present, None, 0),
            record(AttendanceStatus::Overtime, Some(4), 50),
        ];
        let summary = payroll_summary(Some(Decimal::from(800)), &records);
        assert_eq!(summary.gross_pay, Decimal::from(2000));
        assert_eq!(summary.total_deductions, Decimal::from(50));
        assert_eq!(summary.net_pay, Decimal::from(1950));
    }

    #[test]
    fn empty_records_summarize_to_zero() {
        let summary = payroll_summary(Some(Decimal::from(800)), &[]);
        assert_eq!(summary.net_pay, Decimal::ZERO);
    }
}
