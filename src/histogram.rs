use std::fmt::Write;

const BAR_WIDTH: usize = 32;

/// Render a text histogram with a kernel-smoothed density column for one
/// score distribution. Input values are already null-filtered; an empty
/// slice renders a placeholder line instead of failing.
pub fn render(values: &[f64], title: &str, bins: Option<usize>) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "{title}");

    if values.is_empty() {
        let _ = writeln!(output, "  (no numeric values to plot)");
        return output;
    }

    let bin_count = bins.unwrap_or_else(|| sturges(values.len())).max(1);
    let minimum = values.iter().copied().fold(f64::INFINITY, f64::min);
    let maximum = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    // Degenerate spread still gets one full-width bin.
    let span = if maximum > minimum { maximum - minimum } else { 1.0 };
    let width = span / bin_count as f64;

    let mut counts = vec![0usize; bin_count];
    for &value in values {
        let index = (((value - minimum) / width) as usize).min(bin_count - 1);
        counts[index] += 1;
    }

    let bandwidth = silverman_bandwidth(values);
    let tallest = counts.iter().copied().max().unwrap_or(1).max(1);

    for (index, &count) in counts.iter().enumerate() {
        let low = minimum + index as f64 * width;
        let high = low + width;
        let bar = "\u{2588}".repeat(count * BAR_WIDTH / tallest);
        let center = low + width / 2.0;

        let _ = write!(
            output,
            "  {low:>7.2} .. {high:>7.2} | {bar:<width$} {count:>4}",
            width = BAR_WIDTH
        );
        if let Some(h) = bandwidth {
            let _ = write!(output, "  density {:.4}", kernel_density(values, center, h));
        }
        let _ = writeln!(output);
    }

    output
}

fn sturges(n: usize) -> usize {
    (n as f64).log2().ceil() as usize + 1
}

/// Silverman's rule of thumb. None when the sample has no spread, in which
/// case the density column is omitted.
fn silverman_bandwidth(values: &[f64]) -> Option<f64> {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let stddev = variance.sqrt();
    if stddev > 0.0 {
        Some(1.06 * stddev * n.powf(-0.2))
    } else {
        None
    }
}

fn kernel_density(values: &[f64], at: f64, bandwidth: f64) -> f64 {
    let n = values.len() as f64;
    let norm = (2.0 * std::f64::consts::PI).sqrt();
    values
        .iter()
        .map(|&v| {
            let t = (at - v) / bandwidth;
            (-0.5 * t * t).exp() / norm
        })
        .sum::<f64>()
        / (n * bandwidth)
}
