mod tilda_way;
mod translated;

pub use tilda_way::{Side, SideTags, TildaWay};
pub use translated::{ManualAction, TranslatedWay};
