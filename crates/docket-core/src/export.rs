use std::io::Write;

use crate::views::VisibleRecord;

const HEADER: &str = "date,client,owner,title,status,completed";

/// Serializes the visible, sorted set. Callers decide what is visible; this
/// writer takes whatever view it is handed.
pub fn write_csv<W: Write>(mut writer: W, rows: &[VisibleRecord<'_>]) -> anyhow::Result<()> {
    writeln!(writer, "{HEADER}")?;

    for row in rows {
        let record = row.record;
        writeln!(
            writer,
            "{},{},{},{},{},{}",
            escape(&record.date),
            escape(&record.client),
            escape(&record.owner),
            escape(&record.title),
            record.status.wire_name(),
            record.completed
        )?;
    }

    Ok(())
}

fn escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
