//! Calendar-aware tick stepping for date/time axes.
//!
//! Axis values are Unix seconds in UTC. Sub-day units step on exact multiples
//! of their length since the epoch; weeks, months and years step on calendar
//! boundaries.

use chrono::{DateTime, Datelike, Months, NaiveDate, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::primitives::{remove_noise, unix_seconds_to_datetime};
use crate::core::ticks::{TickRequest, TickSet, create_tick_values, nice_interval};

pub const SECONDS_PER_MINUTE: f64 = 60.0;
pub const SECONDS_PER_HOUR: f64 = 3_600.0;
pub const SECONDS_PER_DAY: f64 = 86_400.0;
pub const SECONDS_PER_WEEK: f64 = 7.0 * SECONDS_PER_DAY;
pub const SECONDS_PER_YEAR: f64 = 365.25 * SECONDS_PER_DAY;
pub const SECONDS_PER_MONTH: f64 = SECONDS_PER_YEAR / 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DateTimeIntervalType {
    #[default]
    Auto,
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
    Months,
    Years,
}

impl DateTimeIntervalType {
    /// Nominal length of one unit in seconds (months and years are averages).
    #[must_use]
    pub fn nominal_seconds(self) -> f64 {
        match self {
            Self::Auto | Self::Seconds => 1.0,
            Self::Minutes => SECONDS_PER_MINUTE,
            Self::Hours => SECONDS_PER_HOUR,
            Self::Days => SECONDS_PER_DAY,
            Self::Weeks => SECONDS_PER_WEEK,
            Self::Months => SECONDS_PER_MONTH,
            Self::Years => SECONDS_PER_YEAR,
        }
    }
}

/// How the first week of a year is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CalendarWeekRule {
    /// Week 1 contains January 1st.
    #[default]
    FirstDay,
    /// Week 1 is the first full week of the year.
    FirstFullWeek,
    /// Week 1 is the first week with at least four days in the year.
    FirstFourDayWeek,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateTimeAxisOptions {
    #[serde(default)]
    pub interval_type: DateTimeIntervalType,
    #[serde(default)]
    pub minor_interval_type: DateTimeIntervalType,
    #[serde(default = "default_first_day_of_week")]
    pub first_day_of_week: Weekday,
    #[serde(default)]
    pub calendar_week_rule: CalendarWeekRule,
}

fn default_first_day_of_week() -> Weekday {
    Weekday::Mon
}

impl Default for DateTimeAxisOptions {
    fn default() -> Self {
        Self {
            interval_type: DateTimeIntervalType::Auto,
            minor_interval_type: DateTimeIntervalType::Auto,
            first_day_of_week: default_first_day_of_week(),
            calendar_week_rule: CalendarWeekRule::FirstDay,
        }
    }
}

impl DateTimeAxisOptions {
    #[must_use]
    pub fn with_interval_type(mut self, interval_type: DateTimeIntervalType) -> Self {
        self.interval_type = interval_type;
        self
    }

    #[must_use]
    pub fn with_minor_interval_type(mut self, interval_type: DateTimeIntervalType) -> Self {
        self.minor_interval_type = interval_type;
        self
    }

    #[must_use]
    pub fn with_first_day_of_week(mut self, day: Weekday) -> Self {
        self.first_day_of_week = day;
        self
    }

    #[must_use]
    pub fn with_calendar_week_rule(mut self, rule: CalendarWeekRule) -> Self {
        self.calendar_week_rule = rule;
        self
    }
}

/// Calendar step: `count` units of `unit`. `count` is integral except for
/// sub-second steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DateStep {
    pub unit: DateTimeIntervalType,
    pub count: f64,
}

impl DateStep {
    #[must_use]
    pub const fn new(unit: DateTimeIntervalType, count: f64) -> Self {
        Self { unit, count }
    }

    #[must_use]
    pub fn approximate_seconds(self) -> f64 {
        self.count * self.unit.nominal_seconds()
    }
}

const GOOD_STEPS: [DateStep; 25] = [
    DateStep::new(DateTimeIntervalType::Seconds, 1.0),
    DateStep::new(DateTimeIntervalType::Seconds, 2.0),
    DateStep::new(DateTimeIntervalType::Seconds, 5.0),
    DateStep::new(DateTimeIntervalType::Seconds, 10.0),
    DateStep::new(DateTimeIntervalType::Seconds, 30.0),
    DateStep::new(DateTimeIntervalType::Minutes, 1.0),
    DateStep::new(DateTimeIntervalType::Minutes, 2.0),
    DateStep::new(DateTimeIntervalType::Minutes, 5.0),
    DateStep::new(DateTimeIntervalType::Minutes, 10.0),
    DateStep::new(DateTimeIntervalType::Minutes, 30.0),
    DateStep::new(DateTimeIntervalType::Hours, 1.0),
    DateStep::new(DateTimeIntervalType::Hours, 4.0),
    DateStep::new(DateTimeIntervalType::Hours, 8.0),
    DateStep::new(DateTimeIntervalType::Hours, 12.0),
    DateStep::new(DateTimeIntervalType::Days, 1.0),
    DateStep::new(DateTimeIntervalType::Days, 2.0),
    DateStep::new(DateTimeIntervalType::Days, 5.0),
    DateStep::new(DateTimeIntervalType::Weeks, 1.0),
    DateStep::new(DateTimeIntervalType::Weeks, 2.0),
    DateStep::new(DateTimeIntervalType::Months, 1.0),
    DateStep::new(DateTimeIntervalType::Months, 2.0),
    DateStep::new(DateTimeIntervalType::Months, 3.0),
    DateStep::new(DateTimeIntervalType::Months, 4.0),
    DateStep::new(DateTimeIntervalType::Months, 6.0),
    DateStep::new(DateTimeIntervalType::Years, 1.0),
];

/// Chooses the major calendar step for `[min, max]` (seconds).
#[must_use]
pub fn resolve_major_step(
    request: &TickRequest,
    min: f64,
    max: f64,
    options: &DateTimeAxisOptions,
) -> DateStep {
    let range = (max - min).abs();
    let max_intervals = request.max_intervals.max(1.0);
    let hint = request
        .major_step
        .filter(|step| step.is_finite() && *step > 0.0);

    if options.interval_type != DateTimeIntervalType::Auto {
        let unit = options.interval_type;
        let units = hint.unwrap_or_else(|| {
            nice_interval(range / unit.nominal_seconds(), max_intervals) * unit.nominal_seconds()
        }) / unit.nominal_seconds();
        return DateStep::new(unit, units.ceil().max(1.0));
    }

    let target = hint.unwrap_or(range / max_intervals);
    if target < 1.0 {
        return DateStep::new(
            DateTimeIntervalType::Seconds,
            hint.unwrap_or_else(|| nice_interval(range, max_intervals)),
        );
    }
    if let Some(step) = GOOD_STEPS
        .iter()
        .find(|step| step.approximate_seconds() >= target)
    {
        return *step;
    }
    let years = hint.map_or_else(
        || nice_interval(range / SECONDS_PER_YEAR, max_intervals),
        |hint| hint / SECONDS_PER_YEAR,
    );
    DateStep::new(DateTimeIntervalType::Years, years.ceil().max(1.0))
}

/// Minor step one calendar level below `major`.
#[must_use]
pub fn resolve_minor_step(major: DateStep, options: &DateTimeAxisOptions) -> DateStep {
    use DateTimeIntervalType as Unit;

    if options.minor_interval_type != Unit::Auto {
        return DateStep::new(options.minor_interval_type, 1.0);
    }
    let count = major.count;
    match major.unit {
        Unit::Years if count >= 5.0 => DateStep::new(Unit::Years, (count / 5.0).ceil()),
        Unit::Years if count >= 2.0 => DateStep::new(Unit::Years, 1.0),
        Unit::Years => DateStep::new(Unit::Months, 3.0),
        Unit::Months if count >= 3.0 => DateStep::new(Unit::Months, 1.0),
        Unit::Months => DateStep::new(Unit::Weeks, 1.0),
        Unit::Weeks if count >= 2.0 => DateStep::new(Unit::Weeks, 1.0),
        Unit::Weeks => DateStep::new(Unit::Days, 1.0),
        Unit::Days if count >= 2.0 => DateStep::new(Unit::Days, 1.0),
        Unit::Days => DateStep::new(Unit::Hours, 6.0),
        Unit::Hours if count >= 4.0 => DateStep::new(Unit::Hours, 1.0),
        Unit::Hours => DateStep::new(Unit::Minutes, 15.0),
        Unit::Minutes if count >= 5.0 => DateStep::new(Unit::Minutes, 1.0),
        Unit::Minutes => DateStep::new(Unit::Seconds, 15.0),
        Unit::Seconds | Unit::Auto if count >= 5.0 => DateStep::new(Unit::Seconds, 1.0),
        Unit::Seconds | Unit::Auto => DateStep::new(Unit::Seconds, remove_noise(count / 5.0)),
    }
}

pub(crate) fn date_time_ticks(
    request: &TickRequest,
    min: f64,
    max: f64,
    options: &DateTimeAxisOptions,
) -> TickSet {
    let major_step = resolve_major_step(request, min, max, options);
    let minor_step = resolve_minor_step(major_step, options);
    let max_ticks = request.max_ticks.max(1);

    let major = date_tick_values(min, max, major_step, options, max_ticks);
    let minor = if (max - min) / minor_step.approximate_seconds() > max_ticks as f64 {
        trace!(?minor_step, "minor step too small for range, minor ticks skipped");
        Vec::new()
    } else {
        date_tick_values(min, max, minor_step, options, max_ticks)
    };

    TickSet {
        labels: major.clone(),
        major,
        minor,
        major_step: major_step.approximate_seconds(),
        minor_step: minor_step.approximate_seconds(),
        date_step: Some(major_step),
    }
}

/// All calendar-aligned values of `step` within `[min, max]`.
#[must_use]
pub fn date_tick_values(
    min: f64,
    max: f64,
    step: DateStep,
    options: &DateTimeAxisOptions,
    max_ticks: usize,
) -> Vec<f64> {
    use DateTimeIntervalType as Unit;

    match step.unit {
        Unit::Auto | Unit::Seconds | Unit::Minutes | Unit::Hours | Unit::Days => {
            create_tick_values(min, max, step.approximate_seconds(), max_ticks)
        }
        Unit::Weeks | Unit::Months | Unit::Years => {
            let (Some(start), Some(end)) = (unix_seconds_to_datetime(min), unix_seconds_to_datetime(max))
            else {
                return Vec::new();
            };
            let count = step.count.max(1.0) as u32;
            let mut date = calendar_start(start.date_naive(), step.unit, count, options);
            let end = end.date_naive();
            let mut values = Vec::new();
            while date <= end && values.len() < max_ticks {
                let value = date_to_unix_seconds(date);
                if value >= min && value <= max {
                    values.push(value);
                }
                let Some(next) = calendar_advance(date, step.unit, count) else {
                    break;
                };
                date = next;
            }
            values
        }
    }
}

fn calendar_start(
    date: NaiveDate,
    unit: DateTimeIntervalType,
    count: u32,
    options: &DateTimeAxisOptions,
) -> NaiveDate {
    match unit {
        DateTimeIntervalType::Weeks => {
            let back = days_since_week_start(date.weekday(), options.first_day_of_week);
            date - chrono::Duration::days(i64::from(back))
        }
        DateTimeIntervalType::Months => {
            let month0 = date.month0() / count * count;
            NaiveDate::from_ymd_opt(date.year(), month0 + 1, 1).unwrap_or(date)
        }
        DateTimeIntervalType::Years => {
            let count = count as i32;
            let year = date.year().div_euclid(count) * count;
            NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(date)
        }
        _ => date,
    }
}

fn calendar_advance(date: NaiveDate, unit: DateTimeIntervalType, count: u32) -> Option<NaiveDate> {
    match unit {
        DateTimeIntervalType::Weeks => {
            date.checked_add_signed(chrono::Duration::days(7 * i64::from(count)))
        }
        DateTimeIntervalType::Months => date.checked_add_months(Months::new(count)),
        DateTimeIntervalType::Years => date.checked_add_months(Months::new(12 * count)),
        _ => date.succ_opt(),
    }
}

fn date_to_unix_seconds(date: NaiveDate) -> f64 {
    date.and_hms_opt(0, 0, 0)
        .map_or(f64::NAN, |midnight| midnight.and_utc().timestamp() as f64)
}

fn days_since_week_start(day: Weekday, first_day: Weekday) -> u32 {
    (day.num_days_from_monday() + 7 - first_day.num_days_from_monday()) % 7
}

/// First day of week 1 of `year`.
#[must_use]
pub fn first_week_start(year: i32, rule: CalendarWeekRule, first_day: Weekday) -> Option<NaiveDate> {
    let january_first = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let back = i64::from(days_since_week_start(january_first.weekday(), first_day));
    let previous_week_start = january_first - chrono::Duration::days(back);
    let next_week_start = january_first + chrono::Duration::days((7 - back) % 7);
    Some(match rule {
        CalendarWeekRule::FirstDay => previous_week_start,
        CalendarWeekRule::FirstFullWeek => next_week_start,
        CalendarWeekRule::FirstFourDayWeek if 7 - back >= 4 => previous_week_start,
        CalendarWeekRule::FirstFourDayWeek => next_week_start,
    })
}

/// Week number of `date`. Days before week 1 belong to the last week of the
/// previous year; late December never rolls over to week 1.
#[must_use]
pub fn week_of_year(date: NaiveDate, rule: CalendarWeekRule, first_day: Weekday) -> u32 {
    let start = match first_week_start(date.year(), rule, first_day) {
        Some(start) if start <= date => start,
        _ => match first_week_start(date.year() - 1, rule, first_day) {
            Some(start) => start,
            None => return 1,
        },
    };
    let days = (date - start).num_days().max(0);
    (days / 7 + 1) as u32
}

/// Default label text for a date/time tick.
#[must_use]
pub fn format_date_label(value: f64, step: DateStep, options: &DateTimeAxisOptions) -> String {
    let Some(time) = unix_seconds_to_datetime(value) else {
        return format!("{value}");
    };
    match step.unit {
        DateTimeIntervalType::Years => time.format("%Y").to_string(),
        DateTimeIntervalType::Months => time.format("%Y-%m").to_string(),
        DateTimeIntervalType::Weeks => format!(
            "W{:02}",
            week_of_year(
                time.date_naive(),
                options.calendar_week_rule,
                options.first_day_of_week
            )
        ),
        DateTimeIntervalType::Days => time.format("%Y-%m-%d").to_string(),
        DateTimeIntervalType::Hours | DateTimeIntervalType::Minutes => {
            time.format("%H:%M").to_string()
        }
        DateTimeIntervalType::Seconds | DateTimeIntervalType::Auto => format_seconds(time, step),
    }
}

fn format_seconds(time: DateTime<Utc>, step: DateStep) -> String {
    if step.count.fract() != 0.0 || time.nanosecond() != 0 {
        time.format("%H:%M:%S%.3f").to_string()
    } else {
        time.format("%H:%M:%S").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    fn seconds(year: i32, month: u32, day: u32) -> f64 {
        date_to_unix_seconds(ymd(year, month, day))
    }

    #[test]
    fn hour_range_selects_minutes() {
        let request = TickRequest::new(0.0, 3_600.0).with_max_intervals(6.0);
        let step = resolve_major_step(&request, 0.0, 3_600.0, &DateTimeAxisOptions::default());
        assert_eq!(step, DateStep::new(DateTimeIntervalType::Minutes, 10.0));
        assert_eq!(
            resolve_minor_step(step, &DateTimeAxisOptions::default()),
            DateStep::new(DateTimeIntervalType::Minutes, 1.0)
        );
    }

    #[test]
    fn multi_decade_range_uses_nice_years() {
        let min = seconds(1900, 1, 1);
        let max = seconds(2000, 1, 1);
        let request = TickRequest::new(min, max).with_max_intervals(10.0);
        let step = resolve_major_step(&request, min, max, &DateTimeAxisOptions::default());
        assert_eq!(step, DateStep::new(DateTimeIntervalType::Years, 10.0));
    }

    #[test]
    fn month_ticks_start_on_first_day() {
        let min = seconds(2024, 1, 15);
        let max = seconds(2024, 6, 20);
        let step = DateStep::new(DateTimeIntervalType::Months, 1.0);
        let values = date_tick_values(min, max, step, &DateTimeAxisOptions::default(), 100);
        assert_eq!(
            values,
            vec![
                seconds(2024, 2, 1),
                seconds(2024, 3, 1),
                seconds(2024, 4, 1),
                seconds(2024, 5, 1),
                seconds(2024, 6, 1),
            ]
        );
    }

    #[test]
    fn week_ticks_honor_first_day_of_week() {
        // 2024-01-01 is a Monday.
        let min = seconds(2024, 1, 1);
        let max = seconds(2024, 1, 20);
        let options = DateTimeAxisOptions::default().with_first_day_of_week(Weekday::Sun);
        let step = DateStep::new(DateTimeIntervalType::Weeks, 1.0);
        let values = date_tick_values(min, max, step, &options, 100);
        assert_eq!(values, vec![seconds(2024, 1, 7), seconds(2024, 1, 14)]);
    }

    #[test]
    fn week_numbers_follow_rule() {
        // 2021-01-01 is a Friday.
        let date = ymd(2021, 1, 1);
        assert_eq!(week_of_year(date, CalendarWeekRule::FirstDay, Weekday::Mon), 1);
        assert_eq!(
            week_of_year(date, CalendarWeekRule::FirstFourDayWeek, Weekday::Mon),
            53
        );
        assert_eq!(
            week_of_year(ymd(2021, 1, 4), CalendarWeekRule::FirstFourDayWeek, Weekday::Mon),
            1
        );
        assert_eq!(
            week_of_year(ymd(2021, 1, 3), CalendarWeekRule::FirstFullWeek, Weekday::Mon),
            52
        );
    }

    #[test]
    fn dense_forced_minor_unit_is_dropped() {
        let min = seconds(2023, 1, 1);
        let max = seconds(2024, 1, 1);
        let options =
            DateTimeAxisOptions::default().with_minor_interval_type(DateTimeIntervalType::Seconds);
        let request = TickRequest::new(min, max).with_max_intervals(10.0);
        let ticks = date_time_ticks(&request, min, max, &options);
        assert!(!ticks.major.is_empty());
        assert!(ticks.minor.is_empty());

        let options =
            DateTimeAxisOptions::default().with_minor_interval_type(DateTimeIntervalType::Months);
        let ticks = date_time_ticks(&request, min, max, &options);
        assert_eq!(ticks.minor.len(), 13);
    }

    #[test]
    fn labels_match_unit() {
        let value = seconds(2024, 3, 9) + 13.0 * SECONDS_PER_HOUR + 5.0 * SECONDS_PER_MINUTE;
        let options = DateTimeAxisOptions::default();
        let label = |unit, count| format_date_label(value, DateStep::new(unit, count), &options);
        assert_eq!(label(DateTimeIntervalType::Years, 1.0), "2024");
        assert_eq!(label(DateTimeIntervalType::Months, 1.0), "2024-03");
        assert_eq!(label(DateTimeIntervalType::Days, 1.0), "2024-03-09");
        assert_eq!(label(DateTimeIntervalType::Hours, 1.0), "13:05");
        assert_eq!(label(DateTimeIntervalType::Seconds, 0.5), "13:05:00.000");
        assert_eq!(label(DateTimeIntervalType::Weeks, 1.0), "W10");
    }
}
