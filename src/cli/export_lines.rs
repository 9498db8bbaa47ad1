//! Decision-record export operation.

use std::fs::File;
use std::io::{self, Write};

use stockwell::export::{ExportFormat, ExportedLine, sort_lines, write_jsonl, write_markdown};
use stockwell::telemetry::{TelemetryEvent, TelemetrySink};
use stockwell::{
    ApiToken, ApprovalError, HttpRequestGateway, RequestIntake, RequestLocator, StockwellConfig,
};

use super::output::io_error;

/// Exports a request's decision record to the configured path.
///
/// The path `-` writes to stdout. Line items are sorted into stable export
/// order before formatting.
///
/// # Errors
///
/// Returns configuration errors for a missing URL, token, or path, and
/// propagates gateway and I/O failures.
pub async fn run(
    config: &StockwellConfig,
    sink: &dyn TelemetrySink,
) -> Result<(), ApprovalError> {
    let request_url = config.require_request_url()?;
    let token = ApiToken::new(config.resolve_token()?)?;
    let format = config.export_format()?;
    let path = config
        .export_path
        .as_ref()
        .ok_or_else(|| ApprovalError::Configuration {
            message: "export path is required (use --export-path)".to_owned(),
        })?;

    let locator = RequestLocator::parse(request_url)?;
    let gateway = HttpRequestGateway::for_token(&token)?;
    let details = RequestIntake::new(&gateway).load(&locator).await?;

    let mut lines: Vec<ExportedLine> = details.lines.iter().map(ExportedLine::from).collect();
    sort_lines(&mut lines);

    if path == "-" {
        let mut stdout = io::stdout().lock();
        write_formatted(&mut stdout, format, &lines, &locator.label())?;
    } else {
        let mut file = File::create(path).map_err(|e| io_error(&e))?;
        write_formatted(&mut file, format, &lines, &locator.label())?;
    }

    sink.record(TelemetryEvent::ExportCompleted {
        format: format.to_string(),
        entry_count: lines.len(),
    });
    Ok(())
}

fn write_formatted<W: Write>(
    writer: &mut W,
    format: ExportFormat,
    lines: &[ExportedLine],
    request_label: &str,
) -> Result<(), ApprovalError> {
    match format {
        ExportFormat::Markdown => write_markdown(writer, lines, request_label),
        ExportFormat::Jsonl => write_jsonl(writer, lines),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use stockwell::erp::models::test_support::minimal_line;
    use stockwell::export::{ExportFormat, ExportedLine};

    use super::write_formatted;

    #[test]
    fn markdown_export_round_trips_through_a_file() {
        let lines: Vec<ExportedLine> = [minimal_line(301, 50)]
            .iter()
            .map(ExportedLine::from)
            .collect();

        let mut file = tempfile::tempfile().expect("temp file should open");
        write_formatted(&mut file, ExportFormat::Markdown, &lines, "MIF #42")
            .expect("export should write");

        use std::io::Seek;
        file.rewind().expect("file should rewind");
        let mut written = String::new();
        file.read_to_string(&mut written).expect("file should read");

        assert!(written.contains("# Decision Record: MIF #42"), "{written}");
        assert!(written.contains("Component 301"), "{written}");
    }
}
