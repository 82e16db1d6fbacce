use roster_core::Period;
use roster_sync::source::synthetic::SyntheticSource;

use super::print_json;
use crate::MonthArgs;

pub(crate) fn cmd_mock(month: &MonthArgs, seed: Option<u64>) -> Result<(), String> {
    let period = Period::new(month.year, month.month).map_err(|e| e.to_string())?;
    let source = match seed {
        Some(seed) => SyntheticSource::seeded(seed),
        None => SyntheticSource::random(),
    };
    print_json(&source.generate(&month.employee, period))
}
