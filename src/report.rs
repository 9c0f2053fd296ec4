use crate::binning::ScaleMode;
use crate::pipeline::WindroseChart;

/// Plain-text rendering of a wind rose, one line per non-empty direction bucket.
/// Directions with no samples only show up in the footer count.
pub fn summary(chart: &WindroseChart) -> String {
    let grand_total = chart.grand_total();
    let total_buckets = chart.rows.len();
    let active_buckets = chart.rows.iter().filter(|r| r.total > 0.0).count();
    let band = if total_buckets > 0 { 360.0 / total_buckets as f64 } else { 0.0 };

    let samples = match chart.scale {
        ScaleMode::Absolute => format!("{}", grand_total),
        ScaleMode::Percent => "100%".to_string(),
    };
    let mut report = format!(
        "Wind rose ({} directions x {} speed buckets, {}) | Total: {}\n",
        total_buckets,
        chart.labels.len(),
        chart.unit,
        samples
    );

    for row in chart.rows.iter().filter(|r| r.total > 0.0) {
        let share = if grand_total > 0.0 { row.total / grand_total * 100.0 } else { 0.0 };

        // 1 character per 2% of the grand total.
        let bar = "#".repeat((share / 2.0).round() as usize);

        // Dominant speed band for this direction.
        let dominant = row
            .counts
            .iter()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(label, _)| label.as_str())
            .unwrap_or("-");

        let label = format!("{:.1}-{:.1}", row.angle_start, row.angle_start + band);
        report.push_str(&format!("{:<12}: {:<50} ({:.1}%) peak {}\n", label, bar, share, dominant));
    }

    if active_buckets == 0 {
        report.push_str("   (No wind data in this snapshot)\n");
    } else {
        let hidden = total_buckets - active_buckets;
        if hidden > 0 {
            report.push_str(&format!("{} empty directions hidden\n", hidden));
        }
    }

    report
}
