//! Tab-separated text output, ready to paste into a spreadsheet.

use std::fmt::Write;

use sia::{BatchOutcome, ErrorResult, ScanReport};

fn decimals(precision: u32) -> usize {
    precision as usize
}

pub fn format_error(label: &str, error: &ErrorResult, precision: u32) -> String {
    let p = decimals(precision);
    match error.oriented_axis() {
        Some(axis) => format!("{label}: {:.p$} D @ {axis:.1}°\n", error.magnitude),
        None => format!("{label}: {:.p$} D\n", error.magnitude),
    }
}

pub fn format_scan(report: &ScanReport, precision: u32) -> String {
    let p = decimals(precision);
    let mut out = String::from("Assumed SIA (D)\tVectorial Error (D)\n");
    for candidate in &report.table {
        let _ = writeln!(
            out,
            "{:.2}\t{:.p$}",
            candidate.assumed_magnitude, candidate.error
        );
    }
    let _ = writeln!(
        out,
        "Least error at SIA = {:.2} D",
        report.best().assumed_magnitude
    );
    let _ = writeln!(
        out,
        "Most error at SIA = {:.2} D",
        report.worst().assumed_magnitude
    );
    out
}

pub fn format_batch(outcome: &BatchOutcome<ScanReport>, precision: u32) -> String {
    let mut out = String::new();
    for (index, row) in outcome.rows.iter().enumerate() {
        let _ = writeln!(out, "# Row {}", index + 1);
        match row {
            Ok(report) => out.push_str(&format_scan(report, precision)),
            Err(err) => {
                let _ = writeln!(out, "FAILED: {}", err.fault);
            }
        }
    }
    out.push_str(&format_summary(outcome.len(), outcome.failures().count(), outcome.cancelled));
    out
}

pub fn format_batch_errors(outcome: &BatchOutcome<f64>, precision: u32) -> String {
    let p = decimals(precision);
    let mut out = String::from("Row\tSIA Error (D)\n");
    for (index, row) in outcome.rows.iter().enumerate() {
        match row {
            Ok(error) => {
                let _ = writeln!(out, "{}\t{error:.p$}", index + 1);
            }
            Err(err) => {
                let _ = writeln!(out, "{}\tFAILED: {}", index + 1, err.fault);
            }
        }
    }
    out.push_str(&format_summary(outcome.len(), outcome.failures().count(), outcome.cancelled));
    out
}

fn format_summary(evaluated: usize, failed: usize, cancelled: bool) -> String {
    let mut out = format!("{evaluated} rows evaluated, {failed} failed\n");
    if cancelled {
        out.push_str("Cancelled before all rows were evaluated\n");
    }
    out
}
