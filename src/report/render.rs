//! Terminal rendering of an `AnalysisReport`
//!
//! Charts are drawn with block glyphs and ANSI colors straight to the
//! writer; nothing touches the filesystem.

use super::aggregate::{CorrelationMatrix, Histogram, RateBucket, TopCount};
use super::text::Text;
use super::{AnalysisReport, Summary};
use crate::error::Result;
use crate::types::Locale;
use colored::Colorize;
use std::io::Write;

const LINE_CHART_HEIGHT: usize = 10;
const MAX_LABEL_WIDTH: usize = 24;

/// Draws reports as text charts
#[derive(Debug, Clone)]
pub struct Renderer {
    /// Width of the longest bar, in characters
    width: usize,
    text: &'static Text,
}

fn scale(value: f64, max: f64, width: usize) -> usize {
    if max <= 0.0 || !value.is_finite() {
        return 0;
    }
    ((value / max) * width as f64).round().clamp(0.0, width as f64) as usize
}

fn format_usd(value: f64) -> String {
    if value >= 1000.0 {
        format!("{:.0}", value)
    } else if value >= 1.0 {
        format!("{:.2}", value)
    } else {
        format!("{:.4}", value)
    }
}

fn truncate(label: &str, width: usize) -> String {
    if label.chars().count() <= width {
        label.to_string()
    } else {
        let mut short: String = label.chars().take(width.saturating_sub(1)).collect();
        short.push('…');
        short
    }
}

/// White-to-red for positive values, white-to-blue for negative ones
fn heat_color(value: f64) -> (u8, u8, u8) {
    let v = value.clamp(-1.0, 1.0);
    let fade = (255.0 * (1.0 - v.abs())).round() as u8;
    if v >= 0.0 {
        (255, fade, fade)
    } else {
        (fade, fade, 255)
    }
}

impl Renderer {
    pub fn new(width: usize, locale: Locale) -> Self {
        Self {
            width: width.max(1),
            text: Text::for_locale(locale),
        }
    }

    /// Summary lines followed by all six charts
    pub fn render<W: Write>(&self, report: &AnalysisReport, out: &mut W) -> Result<()> {
        self.summary(&report.summary, out)?;
        self.histogram(report.histogram.as_ref(), out)?;
        self.heatmap(&report.correlation, out)?;
        self.bar_chart(
            &self.text.top_ips(report.top_n),
            self.text.ip_address,
            &report.top_ips,
            out,
        )?;
        self.bar_chart(
            &self.text.top_devices(report.top_n),
            self.text.device,
            &report.top_devices,
            out,
        )?;
        self.line_chart(self.text.hourly_title, self.text.hour_axis, &report.hourly, out)?;
        self.line_chart(
            self.text.weekday_title,
            self.text.weekday_axis,
            &report.weekday,
            out,
        )?;
        out.flush()?;
        Ok(())
    }

    pub fn summary<W: Write>(&self, summary: &Summary, out: &mut W) -> Result<()> {
        writeln!(out, "{}: {:.2} MB", self.text.memory, summary.memory_mb)?;
        writeln!(
            out,
            "{}: {:.2}%",
            self.text.fraud_rate,
            summary.fraud_rate * 100.0
        )?;
        Ok(())
    }

    fn title<W: Write>(&self, title: &str, out: &mut W) -> Result<()> {
        writeln!(out)?;
        writeln!(out, "{}", title.bold())?;
        Ok(())
    }

    /// Paired horizontal bars per log-spaced bin
    pub fn histogram<W: Write>(&self, histogram: Option<&Histogram>, out: &mut W) -> Result<()> {
        self.title(self.text.histogram_title, out)?;
        let Some(h) = histogram else {
            writeln!(out, "  ({})", self.text.no_amounts.dimmed())?;
            return Ok(());
        };

        let half = (self.width / 2).max(1);
        let max = h
            .legit
            .iter()
            .chain(h.fraud.iter())
            .fold(0.0f64, |acc, &v| acc.max(v));

        writeln!(
            out,
            "{:>10}  {} {}   {} {}",
            "",
            "█".blue(),
            self.text.legend_legit,
            "█".red(),
            self.text.legend_fraud
        )?;
        for i in 0..h.bins() {
            let legit = scale(h.legit[i], max, half);
            let fraud = scale(h.fraud[i], max, half);
            writeln!(
                out,
                "{:>10} │{}{} {}",
                format_usd(h.bin_edges[i]),
                "█".repeat(legit).as_str().blue(),
                " ".repeat(half - legit),
                "█".repeat(fraud).as_str().red()
            )?;
        }
        writeln!(
            out,
            "{:>10} └ {} ({}: {:.4})",
            format_usd(h.bin_edges[h.bins()]),
            self.text.histogram_x,
            self.text.histogram_y,
            max
        )?;
        Ok(())
    }

    /// Annotated correlation grid
    pub fn heatmap<W: Write>(&self, matrix: &CorrelationMatrix, out: &mut W) -> Result<()> {
        self.title(self.text.correlation_title, out)?;
        let label_width = matrix
            .labels
            .iter()
            .map(|l| l.chars().count())
            .max()
            .unwrap_or(0);

        write!(out, "{:>w$} ", "", w = label_width)?;
        for label in &matrix.labels {
            write!(out, " {:>7}", truncate(label, 7))?;
        }
        writeln!(out)?;

        for (label, row) in matrix.labels.iter().zip(&matrix.values) {
            write!(out, "{:>w$} ", label, w = label_width)?;
            for value in row {
                let cell = match value {
                    Some(v) => {
                        let (r, g, b) = heat_color(*v);
                        format!(" {:>6.2} ", v)
                            .as_str()
                            .truecolor(0, 0, 0)
                            .on_truecolor(r, g, b)
                            .to_string()
                    }
                    None => format!(" {:>6} ", "nan").as_str().dimmed().to_string(),
                };
                write!(out, "{}", cell)?;
            }
            writeln!(out)?;
        }
        Ok(())
    }

    /// Horizontal bars, largest first
    pub fn bar_chart<W: Write>(
        &self,
        title: &str,
        axis: &str,
        entries: &[TopCount],
        out: &mut W,
    ) -> Result<()> {
        self.title(title, out)?;
        let label_width = entries
            .iter()
            .map(|e| e.label.chars().count())
            .chain(std::iter::once(axis.chars().count()))
            .max()
            .unwrap_or(0)
            .min(MAX_LABEL_WIDTH);
        let max = entries.iter().map(|e| e.count).max().unwrap_or(0) as f64;

        writeln!(out, "{:>w$}", axis.dimmed(), w = label_width)?;
        for entry in entries {
            let bar = scale(entry.count as f64, max, self.width);
            writeln!(
                out,
                "{:>w$} │{} {}",
                truncate(&entry.label, label_width),
                "█".repeat(bar).as_str().red(),
                entry.count,
                w = label_width
            )?;
        }
        writeln!(
            out,
            "{:>w$} └ {}",
            "",
            self.text.fraud_count.dimmed(),
            w = label_width
        )?;
        Ok(())
    }

    /// Marker plot of fraud share per bucket; empty buckets are left blank
    pub fn line_chart<W: Write>(
        &self,
        title: &str,
        axis: &str,
        buckets: &[RateBucket],
        out: &mut W,
    ) -> Result<()> {
        self.title(title, out)?;
        let column = buckets
            .iter()
            .map(|b| b.label.chars().count())
            .max()
            .unwrap_or(1)
            .max(2)
            + 1;
        let max = buckets.iter().map(|b| b.rate).fold(0.0f64, f64::max);
        let top = if max > 0.0 { max } else { 1.0 };

        let levels: Vec<Option<usize>> = buckets
            .iter()
            .map(|b| (b.transactions > 0).then(|| scale(b.rate, top, LINE_CHART_HEIGHT)))
            .collect();

        writeln!(out, "{}", self.text.fraud_share.dimmed())?;
        for level in (0..=LINE_CHART_HEIGHT).rev() {
            let tick = if level == LINE_CHART_HEIGHT || level == 0 || level == LINE_CHART_HEIGHT / 2
            {
                format!("{:>7.4}", top * level as f64 / LINE_CHART_HEIGHT as f64)
            } else {
                " ".repeat(7)
            };
            write!(out, "{} ┤", tick)?;
            for l in &levels {
                let cell = if *l == Some(level) {
                    format!("{:^w$}", "o", w = column).as_str().red().to_string()
                } else {
                    " ".repeat(column)
                };
                write!(out, "{}", cell)?;
            }
            writeln!(out)?;
        }

        writeln!(out, "{} └{}", " ".repeat(7), "─".repeat(column * buckets.len()))?;
        write!(out, "{}  ", " ".repeat(7))?;
        for bucket in buckets {
            write!(out, "{:^w$}", bucket.label, w = column)?;
        }
        writeln!(out)?;
        writeln!(out, "{}  {}", " ".repeat(7), axis.dimmed())?;
        Ok(())
    }
}
