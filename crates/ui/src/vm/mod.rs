mod history_vm;
mod report_vm;
mod start_vm;
mod test_vm;
mod time_fmt;

pub use history_vm::{AttemptCardVm, map_attempt_cards};
pub use report_vm::{ReportVm, ReviewEntryVm, filter_entries};
pub use start_vm::StartVm;
pub use test_vm::{
    NavItemVm, NavigatorVm, OptionVm, QuestionVm, TimerVm, ViolationBannerVm, violation_banner,
};
pub use time_fmt::{format_date, format_datetime};
