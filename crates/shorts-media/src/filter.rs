//! Typed construction of FFmpeg filter-graph text.
//!
//! Builders describe each filter as a name plus an ordered argument list and
//! serialize once, so quoting and separators are decided in one place:
//!
//! ```ignore
//! let crop = Filter::new("crop").arg("iw").arg("ih-40").arg(0).expr_arg("40*abs(sin(t))");
//! assert_eq!(crop.to_string(), "crop=iw:ih-40:0:'40*abs(sin(t))'");
//! ```

use std::fmt;

/// Format a number for filter arguments.
///
/// Rounds to six decimals and prints the shortest form (`1.25`, `3`, `0.5`),
/// never `-0` and never an exponent.
pub fn num(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let rounded = (value * 1e6).round() / 1e6;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        format!("{rounded}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Arg {
    Positional(String),
    Named(&'static str, String),
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Positional(value) => write!(f, "{value}"),
            Arg::Named(key, value) => write!(f, "{key}={value}"),
        }
    }
}

/// One filter invocation, e.g. `fade=t=in:st=0:d=0.5`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    name: &'static str,
    args: Vec<Arg>,
}

impl Filter {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            args: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Append a positional argument.
    pub fn arg(mut self, value: impl fmt::Display) -> Self {
        self.args.push(Arg::Positional(value.to_string()));
        self
    }

    /// Append a `key=value` argument.
    pub fn opt(mut self, key: &'static str, value: impl fmt::Display) -> Self {
        self.args.push(Arg::Named(key, value.to_string()));
        self
    }

    /// Append a positional expression, single-quoted.
    pub fn expr_arg(self, expr: impl fmt::Display) -> Self {
        self.arg(quote(expr))
    }

    /// Append a `key='expr'` argument.
    pub fn expr_opt(self, key: &'static str, expr: impl fmt::Display) -> Self {
        self.opt(key, quote(expr))
    }
}

fn quote(expr: impl fmt::Display) -> String {
    format!("'{expr}'")
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)?;
        for (i, arg) in self.args.iter().enumerate() {
            f.write_str(if i == 0 { "=" } else { ":" })?;
            write!(f, "{arg}")?;
        }
        Ok(())
    }
}

/// A labelled filter chain inside a graph: `[in]f1,f2[out]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segment {
    inputs: Vec<String>,
    filters: Vec<Filter>,
    outputs: Vec<String>,
}

impl Segment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(mut self, label: impl Into<String>) -> Self {
        self.inputs.push(label.into());
        self
    }

    pub fn then(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn then_all(mut self, filters: impl IntoIterator<Item = Filter>) -> Self {
        self.filters.extend(filters);
        self
    }

    pub fn output(mut self, label: impl Into<String>) -> Self {
        self.outputs.push(label.into());
        self
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for label in &self.inputs {
            write!(f, "[{label}]")?;
        }
        for (i, filter) in self.filters.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{filter}")?;
        }
        for label in &self.outputs {
            write!(f, "[{label}]")?;
        }
        Ok(())
    }
}

/// A serialized piece of filter graph, ready to be joined into a chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fragment(String);

impl Fragment {
    /// A fragment of one filter.
    pub fn filter(filter: Filter) -> Self {
        Self(filter.to_string())
    }

    /// Filters applied one after another (`,`-joined).
    pub fn chain(filters: impl IntoIterator<Item = Filter>) -> Self {
        Self(join(filters, ","))
    }

    /// Labelled segments forming a branching graph (`;`-joined).
    ///
    /// The first segment's unlabelled input takes the stream produced by
    /// whatever precedes the fragment in a chain; the last segment's
    /// unlabelled output feeds whatever follows.
    pub fn graph(segments: impl IntoIterator<Item = Segment>) -> Self {
        Self(join(segments, ";"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Filter> for Fragment {
    fn from(filter: Filter) -> Self {
        Self::filter(filter)
    }
}

/// Join fragments into one filter chain.
pub fn join_chain<'a>(fragments: impl IntoIterator<Item = &'a Fragment>) -> String {
    join(fragments, ",")
}

fn join<T: fmt::Display>(items: impl IntoIterator<Item = T>, sep: &str) -> String {
    items
        .into_iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(sep)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_num_formatting() {
        assert_eq!(num(1.25), "1.25");
        assert_eq!(num(3.0), "3");
        assert_eq!(num(0.1 + 0.2), "0.3");
        assert_eq!(num(1.0 / 3.0), "0.333333");
        assert_eq!(num(-0.0), "0");
        assert_eq!(num(-1e-9), "0");
        assert_eq!(num(f64::INFINITY), "0");
    }

    #[test]
    fn test_filter_display() {
        assert_eq!(Filter::new("hflip").to_string(), "hflip");
        assert_eq!(
            Filter::new("fade").opt("t", "in").opt("st", 0).opt("d", num(0.5)).to_string(),
            "fade=t=in:st=0:d=0.5"
        );
        assert_eq!(
            Filter::new("crop")
                .arg("iw")
                .arg("ih-40")
                .arg(0)
                .expr_arg("40*abs(sin(t))")
                .to_string(),
            "crop=iw:ih-40:0:'40*abs(sin(t))'"
        );
        assert_eq!(
            Filter::new("rotate").expr_arg("sin(t)*0.2").opt("c", "none").to_string(),
            "rotate='sin(t)*0.2':c=none"
        );
    }

    #[test]
    fn test_segment_and_graph() {
        let graph = Fragment::graph([
            Segment::new().then(Filter::new("split").arg(2)).output("a").output("b"),
            Segment::new().input("a").then(Filter::new("hflip")).output("a1"),
            Segment::new().input("a1").input("b").then(Filter::new("hstack")),
        ]);
        assert_eq!(graph.as_str(), "split=2[a][b];[a]hflip[a1];[a1][b]hstack");
    }

    #[test]
    fn test_join_chain() {
        let parts = [
            Fragment::filter(Filter::new("hflip")),
            Fragment::chain([Filter::new("vflip"), Filter::new("null")]),
        ];
        assert_eq!(join_chain(&parts), "hflip,vflip,null");
    }
}
