mod summary;

pub(crate) use summary::{PlainTextSummaryFormatter, SummaryFormatter};
