//! Counters and latency histograms with dynamic labels.
//!
//! Values are atomics keyed by a sorted label vector in a `DashMap`, rendered
//! in the Prometheus text format. Histogram buckets are integer microseconds.

use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use dashmap::DashMap;

type LabelKey = Vec<(String, String)>;

fn label_key(labels: &[(&str, &str)]) -> LabelKey {
    let mut key: LabelKey = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn render_labels(key: &LabelKey) -> String {
    key.iter()
        .map(|(k, v)| format!("{k}=\"{}\"", escape_label(v)))
        .collect::<Vec<_>>()
        .join(",")
}

fn series(name: &str, labels: &str) -> String {
    if labels.is_empty() {
        name.to_string()
    } else {
        format!("{name}{{{labels}}}")
    }
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<LabelKey, AtomicU64>,
}

impl CounterVec {
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    pub fn add(&self, labels: &[(&str, &str)], v: u64) {
        self.map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(v, Ordering::Relaxed);
    }

    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {name} counter");
        for r in self.map.iter() {
            let labels = render_labels(r.key());
            let _ = writeln!(out, "{} {}", series(name, &labels), r.value().load(Ordering::Relaxed));
        }
    }
}

// 100us, 500us, 1ms, 5ms, 10ms, 50ms, 100ms, 500ms, 1s
const BUCKETS_MICROS: [u64; 9] = [100, 500, 1_000, 5_000, 10_000, 50_000, 100_000, 500_000, 1_000_000];

#[derive(Default)]
struct AtomicHistogram {
    count: AtomicU64,
    sum: AtomicU64,
    buckets: [AtomicU64; 9],
}

#[derive(Default)]
pub struct HistogramVec {
    map: DashMap<LabelKey, AtomicHistogram>,
}

impl HistogramVec {
    pub fn observe(&self, labels: &[(&str, &str)], elapsed: Duration) {
        let hist = self.map.entry(label_key(labels)).or_default();
        let micros = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);

        hist.count.fetch_add(1, Ordering::Relaxed);
        hist.sum.fetch_add(micros, Ordering::Relaxed);
        for (bucket, &le) in hist.buckets.iter().zip(BUCKETS_MICROS.iter()) {
            if micros <= le {
                bucket.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    pub fn count(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|h| h.count.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {name} histogram");
        for r in self.map.iter() {
            let labels = render_labels(r.key());
            let hist = r.value();
            let sep = if labels.is_empty() { "" } else { "," };

            for (bucket, le) in hist.buckets.iter().zip(BUCKETS_MICROS.iter()) {
                let _ = writeln!(
                    out,
                    "{name}_bucket{{{labels}{sep}le=\"{le}\"}} {}",
                    bucket.load(Ordering::Relaxed)
                );
            }
            let count = hist.count.load(Ordering::Relaxed);
            let _ = writeln!(out, "{name}_bucket{{{labels}{sep}le=\"+Inf\"}} {count}");
            let _ = writeln!(
                out,
                "{} {}",
                series(&format!("{name}_sum"), &labels),
                hist.sum.load(Ordering::Relaxed)
            );
            let _ = writeln!(out, "{} {count}", series(&format!("{name}_count"), &labels));
        }
    }
}

#[derive(Default)]
pub struct BotMetrics {
    /// Handled prefixed commands, by name.
    pub commands: CounterVec,
    /// Denial replies, by code.
    pub denials: CounterVec,
    /// Records upgraded by the normalizer on load.
    pub migrations: CounterVec,
    /// Store failures, by op (`load` / `save`).
    pub store_errors: CounterVec,
    pub dispatch_duration: HistogramVec,
}

impl BotMetrics {
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.commands.render("tiergate_commands_total", &mut out);
        self.denials.render("tiergate_denials_total", &mut out);
        self.migrations.render("tiergate_migrations_total", &mut out);
        self.store_errors.render("tiergate_store_errors_total", &mut out);
        self.dispatch_duration.render("tiergate_dispatch_duration_micros", &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_labels_are_order_insensitive() {
        let c = CounterVec::default();
        c.inc(&[("a", "1"), ("b", "2")]);
        c.inc(&[("b", "2"), ("a", "1")]);
        assert_eq!(c.get(&[("a", "1"), ("b", "2")]), 2);
        assert_eq!(c.get(&[("a", "9")]), 0);
    }

    #[test]
    fn unlabeled_series_render_without_braces() {
        let m = BotMetrics::default();
        m.migrations.inc(&[]);
        m.denials.inc(&[("code", "NO_ACCESS")]);
        let text = m.render();
        assert!(text.contains("tiergate_migrations_total 1\n"));
        assert!(text.contains("tiergate_denials_total{code=\"NO_ACCESS\"} 1\n"));
    }

    #[test]
    fn histogram_buckets_are_cumulative() {
        let h = HistogramVec::default();
        h.observe(&[("command", "ban")], Duration::from_micros(700));
        let mut out = String::new();
        h.render("lat", &mut out);
        assert!(out.contains("lat_bucket{command=\"ban\",le=\"500\"} 0"));
        assert!(out.contains("lat_bucket{command=\"ban\",le=\"1000\"} 1"));
        assert!(out.contains("lat_bucket{command=\"ban\",le=\"+Inf\"} 1"));
        assert!(out.contains("lat_count{command=\"ban\"} 1"));
        assert_eq!(h.count(&[("command", "ban")]), 1);
    }

    #[test]
    fn label_values_are_escaped() {
        let c = CounterVec::default();
        c.inc(&[("command", "a\"b")]);
        let mut out = String::new();
        c.render("x", &mut out);
        assert!(out.contains("x{command=\"a\\\"b\"} 1"));
    }
}
