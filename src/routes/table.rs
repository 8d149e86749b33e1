use http::Method;

use crate::pipeline::CompiledPipeline;

/// One element of a route path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Literal(String),
    Param(String),
}

/// Parameter syntax of the hosting router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamStyle {
    /// `/tasks/:id`
    #[default]
    Colon,
    /// `/tasks/{id}`
    Braces,
}

/// Segment list of one route, from the root down.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutePath {
    segments: Vec<PathSegment>,
}

impl RoutePath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn child(&self, segment: PathSegment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Render the path template in the hosting router's parameter syntax.
    /// The root path renders as `/`.
    pub fn template(&self, style: ParamStyle) -> String {
        if self.segments.is_empty() {
            return "/".to_string();
        }
        let mut out = String::new();
        for segment in &self.segments {
            out.push('/');
            match segment {
                PathSegment::Literal(name) => out.push_str(name),
                PathSegment::Param(name) => match style {
                    ParamStyle::Colon => {
                        out.push(':');
                        out.push_str(name);
                    }
                    ParamStyle::Braces => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                },
            }
        }
        out
    }
}

/// One compiled route: path, method, stage sequence.
#[derive(Debug, Clone)]
pub struct RouteTableEntry {
    pub path: RoutePath,
    pub method: Method,
    pub pipeline: CompiledPipeline,
}

/// All compiled routes of one run, in traversal order.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    entries: Vec<RouteTableEntry>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: RouteTableEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[RouteTableEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RouteTableEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a RouteTable {
    type Item = &'a RouteTableEntry;
    type IntoIter = std::slice::Iter<'a, RouteTableEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
