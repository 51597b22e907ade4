use std::io::{self, Write};

use buffett_core::report::render_table;
use buffett_core::{Envelope, EnvelopeMeta, ScreeningReport, SCHEMA_VERSION};

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::metadata::RequestId;

pub fn render(report: &ScreeningReport, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut writer = stdout.lock();
    write_report(&mut writer, report, format, pretty)?;
    writer.flush()?;
    Ok(())
}

fn write_report<W: Write>(
    writer: &mut W,
    report: &ScreeningReport,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Table => render_table(writer, report)?,
        OutputFormat::Json => {
            let envelope = envelope(report)?;
            let payload = if pretty {
                serde_json::to_string_pretty(&envelope)?
            } else {
                serde_json::to_string(&envelope)?
            };
            writeln!(writer, "{payload}")?;
        }
    }

    Ok(())
}

fn envelope(report: &ScreeningReport) -> Result<Envelope<&ScreeningReport>, CliError> {
    let mut meta = EnvelopeMeta::new(RequestId::new_v4().to_string(), SCHEMA_VERSION, report.source)?;
    for note in &report.notes {
        meta.push_warning(note.as_str());
    }
    Ok(Envelope::new(meta, report))
}
