use instant::Instant;

use crate::{prettyprint_usize, PROGRESS_FREQUENCY_SECONDS};

pub fn elapsed_seconds(since: Instant) -> f64 {
    let dt = since.elapsed();
    (dt.as_secs() as f64) + (f64::from(dt.subsec_nanos()) * 1e-9)
}

pub fn prettyprint_time(seconds: f64) -> String {
    format!("{:.4}s", seconds)
}

struct Progress {
    label: String,
    processed_items: usize,
    total_items: usize,
    started_at: Instant,
    last_printed_at: Instant,
}

impl Progress {
    fn new(label: String, total_items: usize) -> Progress {
        Progress {
            label,
            processed_items: 0,
            total_items,
            started_at: Instant::now(),
            last_printed_at: Instant::now(),
        }
    }

    // Returns when done
    fn next(&mut self) -> Option<(f64, String)> {
        self.processed_items += 1;
        if self.processed_items > self.total_items {
            panic!(
                "{} is too few items for {} progress",
                prettyprint_usize(self.total_items),
                self.label
            );
        }

        if self.processed_items == self.total_items {
            let elapsed = elapsed_seconds(self.started_at);
            let line = format!(
                "{} ({})... {}",
                self.label,
                prettyprint_usize(self.total_items),
                prettyprint_time(elapsed)
            );
            info!("{}", line);
            return Some((elapsed, line));
        } else if elapsed_seconds(self.last_printed_at) >= PROGRESS_FREQUENCY_SECONDS {
            self.last_printed_at = Instant::now();
            info!(
                "{}: {}/{}... {}",
                self.label,
                prettyprint_usize(self.processed_items),
                prettyprint_usize(self.total_items),
                prettyprint_time(elapsed_seconds(self.started_at))
            );
        }
        None
    }
}

enum StackEntry {
    TimerSpan(TimerSpan),
    Progress(Progress),
}

struct TimerSpan {
    name: String,
    started_at: Instant,
    nested_results: Vec<String>,
    nested_time: f64,
}

/// Hierarchial timing and progress reporting. Everything goes through `log`; a summary of spans,
/// notes, and warnings is logged when the Timer is dropped.
pub struct Timer {
    results: Vec<String>,
    stack: Vec<StackEntry>,

    outermost_name: String,

    notes: Vec<String>,
    warnings: Vec<String>,
}

impl Timer {
    pub fn new<S: Into<String>>(name: S) -> Timer {
        let name = name.into();
        let mut t = Timer {
            results: Vec::new(),
            stack: Vec::new(),
            outermost_name: name.clone(),
            notes: Vec::new(),
            warnings: Vec::new(),
        };
        t.start(name);
        t
    }

    // TODO Shouldn't use this much.
    pub fn throwaway() -> Timer {
        Timer::new("throwaway")
    }

    /// Log immediately, but also repeat at the end, to avoid having to scroll up and find
    /// interesting debug stuff.
    pub fn note(&mut self, line: String) {
        info!("{}", line);
        self.notes.push(line);
    }

    /// Only logged in the final summary.
    pub fn warn(&mut self, line: String) {
        self.warnings.push(line);
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn start<S: Into<String>>(&mut self, name: S) {
        let name = name.into();
        info!("{}...", name);
        self.stack.push(StackEntry::TimerSpan(TimerSpan {
            name,
            started_at: Instant::now(),
            nested_results: Vec::new(),
            nested_time: 0.0,
        }));
    }

    pub fn stop<S: Into<String>>(&mut self, name: S) {
        let name = name.into();
        let span = match self.stack.pop() {
            Some(StackEntry::TimerSpan(s)) if s.name == name => s,
            _ => panic!("Timer::stop({}) doesn't match the innermost open span", name),
        };
        let elapsed = elapsed_seconds(span.started_at);
        let line = format!("{} took {}", name, prettyprint_time(elapsed));
        info!("{}", line);

        let padding = "  ".repeat(self.stack.len());
        let mut lines = vec![format!("{}- {}", padding, line)];
        lines.extend(span.nested_results);
        if span.nested_time != 0.0 {
            lines.push(format!(
                "{}  - ... plus {}",
                padding,
                prettyprint_time(elapsed - span.nested_time)
            ));
        }
        self.record(elapsed, lines);
    }

    pub fn start_iter<S: Into<String>>(&mut self, name: S, total_items: usize) {
        if total_items == 0 {
            return;
        }
        let name = name.into();
        if let Some(StackEntry::Progress(p)) = self.stack.last() {
            panic!(
                "Can't start_iter({}) while Progress({}) is top of the stack",
                name, p.label
            );
        }

        self.stack
            .push(StackEntry::Progress(Progress::new(name, total_items)));
    }

    pub fn next(&mut self) {
        let maybe_result =
            if let Some(StackEntry::Progress(ref mut progress)) = self.stack.last_mut() {
                progress.next()
            } else {
                panic!("Can't next() while a TimerSpan is top of the stack");
            };
        if let Some((elapsed, result)) = maybe_result {
            self.stack.pop();
            let padding = "  ".repeat(self.stack.len());
            self.record(elapsed, vec![format!("{}- {}", padding, result)]);
        }
    }

    /// Attributes finished work to the enclosing span, or to the summary at the top level. Work
    /// finished inside one iteration of a progress loop only shows up in the loop's total.
    fn record(&mut self, elapsed: f64, lines: Vec<String>) {
        match self.stack.last_mut() {
            Some(StackEntry::TimerSpan(ref mut s)) => {
                s.nested_results.extend(lines);
                s.nested_time += elapsed;
            }
            Some(StackEntry::Progress(_)) => {}
            None => {
                self.results.extend(lines);
            }
        }
    }

    /// Runs `cb` over every request on a thread pool. Results come back in the same order as the
    /// requests, regardless of which finishes first.
    pub fn parallelize<I, O, F: Fn(I) -> O>(
        &mut self,
        timer_name: &str,
        requests: Vec<I>,
        cb: F,
    ) -> Vec<O>
    where
        I: Send,
        O: Send,
        F: Send + Clone + Copy,
    {
        scoped_threadpool::Pool::new(num_cpus::get() as u32).scoped(|scope| {
            let (tx, rx) = std::sync::mpsc::channel();
            let mut results: Vec<Option<O>> = std::iter::repeat_with(|| None)
                .take(requests.len())
                .collect();
            for (idx, req) in requests.into_iter().enumerate() {
                let tx = tx.clone();
                scope.execute(move || {
                    // The receiver outlives every worker
                    let _ = tx.send((idx, cb(req)));
                });
            }
            drop(tx);

            self.start_iter(timer_name, results.len());
            for (idx, result) in rx.iter() {
                self.next();
                results[idx] = Some(result);
            }
            results.into_iter().flatten().collect()
        })
    }
}

impl std::ops::Drop for Timer {
    fn drop(&mut self) {
        // If we're in the middle of unwinding a panic, don't further blow up.
        if std::thread::panicking() {
            return;
        }
        match self.stack.last() {
            Some(StackEntry::TimerSpan(ref s)) if s.name == self.outermost_name => {}
            _ => {
                warn!("dropping Timer {} with unfinished spans", self.outermost_name);
                return;
            }
        }

        let stop_name = self.outermost_name.clone();
        self.stop(stop_name);
        for line in &self.results {
            info!("{}", line);
        }

        if !self.notes.is_empty() {
            info!("{} notes:", self.notes.len());
            for line in &self.notes {
                info!("{}", line);
            }
        }

        if !self.warnings.is_empty() {
            warn!("{} warnings:", self.warnings.len());
            for line in &self.warnings {
                warn!("{}", line);
            }
        }
    }
}
