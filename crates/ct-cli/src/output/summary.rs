use ct_operations::operations::TestResults;

const SEPARATOR: &str = "------------------------------------------------------------------------------------------------------------------------";

pub(crate) trait SummaryFormatter {
    fn format(&self, results: &TestResults) -> String;
}

/// One line per chart between separators, with the failure reason after `>`.
pub(crate) struct PlainTextSummaryFormatter;

impl SummaryFormatter for PlainTextSummaryFormatter {
    fn format(&self, results: &TestResults) -> String {
        let mut output = String::new();
        output.push_str(SEPARATOR);
        output.push('\n');

        if results.is_empty() {
            output.push_str("No chart changes detected.\n");
        } else {
            for result in &results.results {
                match &result.error {
                    Some(error) => {
                        output.push_str(&format!(" ✖︎ {} > {}\n", result.chart, error_chain(error)));
                    }
                    None => output.push_str(&format!(" ✔︎ {}\n", result.chart)),
                }
            }
        }

        output.push_str(SEPARATOR);
        output.push('\n');

        if !results.is_empty() {
            if results.overall_success {
                output.push_str("All charts passed\n");
            } else {
                output.push_str("Some charts failed\n");
            }
        }

        output
    }
}

fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
