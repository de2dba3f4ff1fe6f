//! CSV export for sweep results: one header row, one record per result,
//! written through `csv::Writer`.

use std::io::Write;

use crate::SweepResult;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub fn write_csv<W: Write>(writer: W, results: &[SweepResult]) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record([
        "value",
        "seed",
        "final_vehicle_count",
        "final_price",
        "mean_wait",
        "mean_ride",
        "mean_fare",
        "completed_trips",
    ])?;

    for result in results {
        wtr.write_record([
            result.value.to_string(),
            result.seed.to_string(),
            result.final_vehicle_count.to_string(),
            result.final_price.to_string(),
            result.mean_wait.to_string(),
            result.mean_ride.to_string(),
            result.mean_fare.to_string(),
            result.completed_trips.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_one_row_per_result_plus_header() {
        let results = vec![
            SweepResult {
                value: 1.0,
                seed: 10,
                final_vehicle_count: 5,
                final_price: 1.2,
                mean_wait: 2.0,
                mean_ride: 3.0,
                mean_fare: 4.0,
                completed_trips: 7,
            },
            SweepResult {
                value: 2.0,
                seed: 20,
                final_vehicle_count: 6,
                final_price: 1.3,
                mean_wait: 2.1,
                mean_ride: 3.1,
                mean_fare: 4.1,
                completed_trips: 9,
            },
        ];
        let mut buf = Vec::new();
        write_csv(&mut buf, &results).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.starts_with("value,seed,"));
    }
}
