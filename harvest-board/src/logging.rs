//! Formatting helpers for tracing output

use crate::types::BoardView;
use serde::Serialize;
use std::fmt;

/// Renders a serializable value as an indented YAML block in a log line.
///
/// ```ignore
/// debug!(task = %id, "applying move{}", Pretty(&patch));
/// ```
///
/// Falls back to `{:#?}` when the value can't be rendered as YAML.
pub struct Pretty<T>(pub T);

impl<T: Serialize + fmt::Debug> fmt::Display for Pretty<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Ok(yaml) = serde_yaml_ng::to_string(&self.0) else {
            return write!(f, "\n{:#?}", self.0);
        };
        for line in yaml.lines() {
            write!(f, "\n  {}", line)?;
        }
        Ok(())
    }
}

impl<T: Serialize + fmt::Debug> fmt::Debug for Pretty<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// One-line lane sizes, e.g. `to_do=2 in_progress=1 completed=0 overdue=0`
pub struct LaneCounts<'a>(pub &'a BoardView);

impl fmt::Display for LaneCounts<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (lane, count) in self.0.counts() {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{}={}", lane, count)?;
            first = false;
        }
        Ok(())
    }
}
