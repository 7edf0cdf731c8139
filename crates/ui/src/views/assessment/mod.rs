mod dialog;
mod result;
mod start;
mod test_screen;
mod view;

pub use view::AssessmentView;

#[cfg(test)]
pub(crate) use view::AssessmentTestHandles;
