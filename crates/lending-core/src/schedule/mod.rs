pub mod calendar;
pub mod generator;

pub use calendar::{due_date, due_dates};
pub use generator::{
    build_schedule, generate_schedule, generate_schedule_from, reclassify, summarize, withhold,
    ScheduleEntry, ScheduleOutput, ScheduleRequest, ScheduleSummary,
};
