mod month_key;
mod month_record;
mod movement;

pub(crate) use month_key::{format_month, sort_keys, MonthKey};
pub(crate) use month_record::MonthRecord;
pub(crate) use movement::{Movement, MovementKind};
