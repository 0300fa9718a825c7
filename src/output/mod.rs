pub mod formatter;

pub use formatter::{
    format_age, format_count, format_pro, format_report, format_score_detail, should_use_colors,
};
