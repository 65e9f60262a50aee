pub mod escape_time;
pub mod julia;
pub mod recurrence;
