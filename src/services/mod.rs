pub mod calendar;
pub mod holiday;
pub mod scheduling;
pub mod validation;
