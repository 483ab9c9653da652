use std::io::Write;

use csv::WriterBuilder;
use log::debug;

use crate::error::EvoResult;
use crate::metrics::pairwise::DistanceTable;
use crate::phylo::DistanceMatrix;

/// One row per pair and metric: `metric,id1,id2,value`. Not-applicable pairs
/// keep their marker text in the value column.
pub fn write_distance_table<W: Write>(table: &DistanceTable, writer: W) -> EvoResult<()> {
    let mut out = WriterBuilder::new().has_headers(false).from_writer(writer);
    out.write_record(["metric", "id1", "id2", "value"])?;

    let mut rows = 0usize;
    for (metric, results) in table.iter() {
        for r in results {
            let value = r.display_value();
            let record: [&str; 4] = [metric.name(), &r.id1, &r.id2, &value];
            out.write_record(record)?;
            rows += 1;
        }
    }
    out.flush()?;
    debug!("wrote {} distance rows", rows);
    Ok(())
}

/// Full square matrix with a header row of labels and the label in the first
/// column of every row.
pub fn write_distance_matrix<W: Write>(dm: &DistanceMatrix, writer: W) -> EvoResult<()> {
    let mut out = WriterBuilder::new()
        .has_headers(false)
        .flexible(false)
        .from_writer(writer);

    let mut header = Vec::with_capacity(dm.n() + 1);
    header.push("");
    header.extend(dm.labels().iter().map(|l| l.as_ref()));
    out.write_record(&header)?;

    for (i, label) in dm.labels().iter().enumerate() {
        let mut row = Vec::with_capacity(dm.n() + 1);
        row.push(label.to_string());
        row.extend((0..dm.n()).map(|j| dm.get(i, j).to_string()));
        out.write_record(&row)?;
    }
    out.flush()?;
    Ok(())
}
