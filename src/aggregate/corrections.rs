use crate::source::catalog::CorrectionRecord;
use crate::types::aggregate::CorrectionTally;

/// Count correction records per year. Years iterate in ascending order.
pub fn tally_corrections(records: &[CorrectionRecord]) -> CorrectionTally {
    records.iter().fold(CorrectionTally::new(), |mut tally, record| {
        tally.record(record.year);
        tally
    })
}
