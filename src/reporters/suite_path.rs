/// Indentation added per suite level.
pub const INDENT_UNIT: &str = "  ";

/// Output of a suite-path render: the header lines to print (without
/// trailing newlines) and the indent to use for the spec line itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRender {
    pub lines: Vec<String>,
    pub spec_indent: String,
}

/// Index where `next` stops matching `previous`, or `None` when every
/// suite in `next` is already printed.
pub fn divergence_index(previous: &[String], next: &[String]) -> Option<usize> {
    next.iter()
        .zip(previous)
        .position(|(new, old)| new != old)
        .or_else(|| (next.len() > previous.len()).then_some(previous.len()))
}

/// Compute the header lines needed to move from `previous` to `next`.
///
/// Everything from the first diverging level down is printed again, since
/// the visible hierarchy has to match `next`'s full ancestry. A divergence
/// at the top level gets a blank separator line first.
pub fn render(previous: &[String], next: &[String], indent_unit: &str) -> (PathRender, Vec<String>) {
    let mut lines = Vec::new();

    if let Some(start) = divergence_index(previous, next) {
        if start == 0 {
            lines.push(String::new());
        }
        for (depth, name) in next.iter().enumerate().skip(start) {
            lines.push(format!("{}{}", indent_unit.repeat(depth + 1), name));
        }
    }

    let spec_indent = indent_unit.repeat(next.len() + 1);
    (PathRender { lines, spec_indent }, next.to_vec())
}

/// The most recently printed suite hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuitePath {
    names: Vec<String>,
}

impl SuitePath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render headers for `next` and remember it as the current path.
    pub fn advance(&mut self, next: &[String]) -> PathRender {
        let (rendered, updated) = render(&self.names, next, INDENT_UNIT);
        self.names = updated;
        rendered
    }

    pub fn reset(&mut self) {
        self.names.clear();
    }

    pub fn as_slice(&self) -> &[String] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
