use chrono::{Datelike, NaiveDate, Weekday};
use egui::{Pos2, Rect, Vec2};

use super::LayoutConfig;
use crate::model::TimeWindow;

/// One calendar month of the timeline header (top row).
#[derive(Debug, Clone, PartialEq)]
pub struct MonthSegment {
    pub year: i32,
    pub month: u32,
    pub label: String,
    /// Index of the first day column of this month.
    pub first_day: usize,
    pub day_count: usize,
    /// Label anchor, centered over the month's days.
    pub label_pos: Pos2,
    /// Vertical line at the month's right boundary.
    pub separator: [Pos2; 2],
}

/// One day column of the timeline header (rows two and three).
#[derive(Debug, Clone, PartialEq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub weekday: String,
    pub day: u32,
    pub is_weekend: bool,
    pub weekday_pos: Pos2,
    pub day_pos: Pos2,
    pub rect: Rect,
    pub separator: [Pos2; 2],
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineGeometry {
    pub width: f32,
    pub height: f32,
    pub months: Vec<MonthSegment>,
    pub days: Vec<DayCell>,
    /// Horizontal rules between the month row and the two day rows.
    pub rules: Vec<[Pos2; 2]>,
}

pub(crate) fn build(window: TimeWindow, config: &LayoutConfig) -> TimelineGeometry {
    let cw = config.cell_width;
    let ch = config.cell_height;
    let width = window.days() as f32 * cw;

    let mut days = Vec::with_capacity(window.days().max(0) as usize);
    let mut months: Vec<MonthSegment> = Vec::new();

    for (idx, date) in window.iter_days().enumerate() {
        let x = idx as f32 * cw;
        let is_weekend = matches!(date.weekday(), Weekday::Sat | Weekday::Sun);
        days.push(DayCell {
            date,
            weekday: date.format("%a").to_string(),
            day: date.day(),
            is_weekend,
            weekday_pos: Pos2::new(x + cw * 0.5, ch * 1.5),
            day_pos: Pos2::new(x + cw * 0.5, ch * 2.5),
            rect: Rect::from_min_size(Pos2::new(x, ch), Vec2::new(cw, ch * 2.0)),
            separator: [Pos2::new(x + cw + 0.5, ch), Pos2::new(x + cw + 0.5, ch * 3.0)],
        });

        let same_month = months
            .last()
            .map(|m| m.year == date.year() && m.month == date.month())
            .unwrap_or(false);
        if same_month {
            if let Some(current) = months.last_mut() {
                current.day_count += 1;
            }
        } else {
            months.push(MonthSegment {
                year: date.year(),
                month: date.month(),
                label: date.format("%b %Y").to_string(),
                first_day: idx,
                day_count: 1,
                label_pos: Pos2::ZERO,
                separator: [Pos2::ZERO; 2],
            });
        }
    }

    for month in &mut months {
        let start_x = month.first_day as f32 * cw;
        let span = month.day_count as f32 * cw;
        month.label_pos = Pos2::new(start_x + span * 0.5, ch * 0.5);
        month.separator = [
            Pos2::new(start_x + span + 0.5, 0.0),
            Pos2::new(start_x + span + 0.5, ch),
        ];
    }

    let rules = vec![
        [Pos2::new(0.0, ch + 0.5), Pos2::new(width, ch + 0.5)],
        [Pos2::new(0.0, ch * 2.0 + 0.5), Pos2::new(width, ch * 2.0 + 0.5)],
    ];

    TimelineGeometry {
        width,
        height: config.header_height(),
        months,
        days,
        rules,
    }
}
