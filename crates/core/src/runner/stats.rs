use std::collections::HashMap;
use std::time::Duration;

/// Counters and output-equality groups for one document run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStatistics {
    pub total_runs: usize,
    pub successful_runs: usize,
    /// Run numbers per distinct output, in first-seen order
    groups: Vec<Vec<usize>>,
    group_index: HashMap<String, usize>,
}

impl RunStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number the next run and count it
    pub fn record_run(&mut self, success: bool) -> usize {
        self.total_runs += 1;
        if success {
            self.successful_runs += 1;
        }
        self.total_runs
    }

    /// File `run_number` under the group of runs that printed `output`
    pub fn record_output(&mut self, run_number: usize, output: &str) {
        match self.group_index.get(output) {
            Some(&index) => self.groups[index].push(run_number),
            None => {
                self.group_index.insert(output.to_string(), self.groups.len());
                self.groups.push(vec![run_number]);
            }
        }
    }

    pub fn failed_runs(&self) -> usize {
        self.total_runs - self.successful_runs
    }

    /// Equal-output groups by ascending size, ties in first-seen order
    pub fn equal_groups(&self) -> Vec<&[usize]> {
        let mut groups: Vec<&[usize]> = self.groups.iter().map(Vec::as_slice).collect();
        groups.sort_by_key(|group| group.len());
        groups
    }

    pub fn biggest_group(&self) -> usize {
        self.groups.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// `S/T programs successfully run[ in X.XXXs]` ending in `!` or the failure count
    pub fn summary_line(&self, elapsed: Option<Duration>) -> String {
        let plural = if self.total_runs == 1 { "" } else { "s" };
        let timer = elapsed
            .map(|elapsed| format!(" in {:.3}s", elapsed.as_secs_f64()))
            .unwrap_or_default();
        let end = if self.successful_runs < self.total_runs {
            format!(
                ". {} failed due to non-zero exit code or timeout.",
                self.failed_runs()
            )
        } else {
            "!".to_string()
        };
        format!(
            "{}/{} program{plural} successfully run{timer}{end}",
            self.successful_runs, self.total_runs
        )
    }

    /// `B/T had the exact same stdout` ending in `!` or the listed groups
    pub fn equal_line(&self) -> String {
        let biggest = self.biggest_group();
        let end = if biggest == self.total_runs {
            "!".to_string()
        } else {
            let groups: Vec<String> = self
                .equal_groups()
                .iter()
                .map(|group| {
                    let numbers: Vec<String> = group.iter().map(usize::to_string).collect();
                    format!("[{}]", numbers.join(" "))
                })
                .collect();
            format!(". Equal runs grouped: {}", groups.join(" "))
        };
        format!("{biggest}/{} had the exact same stdout{end}", self.total_runs)
    }
}
